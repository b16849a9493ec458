#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use tally::{QueryId, QueryRegistry, ResultSet, StaticDataSource, Value};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A console sink the test can read back after the pipeline wrote to it.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn dec(units: i64) -> Value {
    Value::Decimal(Decimal::from(units))
}

/// Two-decimal value: `cents(12345)` is 123.45.
pub fn cents(cents: i64) -> Value {
    Value::Decimal(Decimal::new(cents, 2))
}

pub fn table(columns: &[&str], rows: Vec<Vec<Value>>) -> ResultSet {
    ResultSet::from_rows(columns.iter().copied(), rows).expect("well-formed fixture")
}

/// Category totals A:100 .. L:3.
pub fn category_gmv() -> ResultSet {
    let totals = [
        ("A", 100),
        ("B", 90),
        ("C", 80),
        ("D", 70),
        ("E", 60),
        ("F", 50),
        ("G", 40),
        ("H", 30),
        ("I", 20),
        ("J", 10),
        ("K", 5),
        ("L", 3),
    ];
    table(
        &["category", "gmv"],
        totals
            .iter()
            .map(|(label, value)| vec![Value::from(*label), dec(*value)])
            .collect(),
    )
}

pub fn fixture(id: QueryId) -> ResultSet {
    match id {
        QueryId::PieGmvByCategory => category_gmv(),
        QueryId::BarTopStatesGmv => table(
            &["state", "gmv"],
            vec![
                vec![Value::from("SP"), cents(595_912_311)],
                vec![Value::from("RJ"), cents(214_474_842)],
                vec![Value::from("MG"), cents(186_330_412)],
            ],
        ),
        QueryId::BarhTopSellersGmv => table(
            &["seller_id", "gmv"],
            vec![
                vec![Value::from("4869f7a5dfa277a7dca6462dcf3b52b2"), cents(22_901_612)],
                vec![Value::from("53243585a1d6dc2643021fd1853d8905"), cents(22_254_140)],
            ],
        ),
        QueryId::LineMonthlyGmv => table(
            &["month", "gmv"],
            vec![
                vec![Value::Date(date(2017, 1, 1)), cents(12_000_050)],
                vec![Value::Date(date(2017, 3, 1)), cents(35_999_925)],
            ],
        ),
        QueryId::HistDeliveryDelayDays => table(
            &["delay_days"],
            vec![
                vec![cents(-1_050)],
                vec![cents(-300)],
                vec![cents(0)],
                vec![Value::Null],
                vec![cents(725)],
            ],
        ),
        QueryId::ScatterItemsVsPayment => table(
            &["order_id", "n_items", "items_value", "pay_total"],
            vec![
                vec![Value::from("o1"), Value::Int(1), cents(5_990), cents(7_245)],
                vec![Value::from("o2"), Value::Int(3), cents(17_970), cents(19_010)],
                vec![Value::from("o3"), Value::Int(2), cents(4_000), cents(4_999)],
            ],
        ),
        QueryId::MonthlyCategoryGmv => table(
            &["month", "category", "gmv"],
            vec![
                vec![Value::Date(date(2017, 1, 1)), Value::from("bed_bath_table"), dec(500)],
                vec![Value::Date(date(2017, 1, 1)), Value::from("toys"), dec(120)],
                vec![Value::Date(date(2017, 2, 1)), Value::from("bed_bath_table"), dec(650)],
                vec![Value::Date(date(2017, 2, 1)), Value::from("watches_gifts"), dec(80)],
            ],
        ),
        QueryId::MonthlyRevenue => table(
            &["month", "revenue"],
            vec![
                vec![Value::Date(date(2017, 1, 1)), cents(13_888_850)],
                vec![Value::Date(date(2017, 2, 1)), cents(29_168_922)],
            ],
        ),
        QueryId::PaymentMix => table(
            &["payment_type", "cnt", "pct"],
            vec![
                vec![Value::from("credit_card"), Value::Int(76_795), cents(7_392)],
                vec![Value::from("boleto"), Value::Int(19_784), cents(1_904)],
                vec![Value::from("voucher"), Value::Int(5_775), cents(556)],
            ],
        ),
        QueryId::TopCategories => table(
            &["category", "revenue"],
            vec![
                vec![Value::from("health_beauty"), cents(125_887_082)],
                vec![Value::from("watches_gifts"), cents(120_508_764)],
            ],
        ),
    }
}

/// A source answering every registered query with its fixture.
pub fn seeded_source() -> StaticDataSource {
    seeded_source_with(fixture)
}

/// A source answering every registered query with `results(id)`.
pub fn seeded_source_with(results: impl Fn(QueryId) -> ResultSet) -> StaticDataSource {
    let registry = QueryRegistry::builtin();
    let mut source = StaticDataSource::new();
    for id in QueryId::ALL {
        source.insert(registry.definition(id).sql, results(id));
    }
    source
}
