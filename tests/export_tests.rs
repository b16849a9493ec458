mod common;

use calamine::{Data, Reader, Xlsx, open_workbook};
use common::{TestResult, cents, date, fixture, table};
use std::fs;
use std::io::Read;
use std::path::Path;
use tally::export::{ExportOptions, ReportBundle, plan_sheet};
use tally::{NumericDetection, QueryId, Value, export};

fn read_sheet(path: &Path, sheet: &str) -> Result<Vec<Vec<Data>>, Box<dyn std::error::Error>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook.worksheet_range(sheet)?;
    Ok(range.rows().map(|row| row.to_vec()).collect())
}

/// Raw XML of one worksheet part, e.g. `xl/worksheets/sheet1.xml`.
fn sheet_xml(path: &Path, part: &str) -> Result<String, Box<dyn std::error::Error>> {
    let mut archive = zip::ZipArchive::new(fs::File::open(path)?)?;
    let mut xml = String::new();
    archive.by_name(part)?.read_to_string(&mut xml)?;
    Ok(xml)
}

fn sample_bundle() -> ReportBundle {
    let mut bundle = ReportBundle::new();
    for id in [
        QueryId::PieGmvByCategory,
        QueryId::BarTopStatesGmv,
        QueryId::PaymentMix,
    ] {
        bundle.insert(id.name(), fixture(id));
    }
    bundle
}

#[test]
fn sheets_read_back_with_headers_rows_and_values() -> TestResult {
    common::init_logger();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("summary.xlsx");

    let mut bundle = ReportBundle::new();
    bundle.insert(
        "monthly_revenue",
        table(
            &["month", "note", "revenue"],
            vec![
                vec![Value::Date(date(2017, 1, 1)), Value::Null, cents(13_888_850)],
                vec![Value::Date(date(2017, 2, 1)), Value::from("peak"), cents(29_168_922)],
            ],
        ),
    );

    let summary = export(&bundle, &path, &ExportOptions::default())?;
    assert_eq!(summary.sheet_count, 1);
    assert_eq!(summary.total_rows, 2);

    let rows = read_sheet(&path, "monthly_revenue")?;
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows[0],
        vec![
            Data::String("month".into()),
            Data::String("note".into()),
            Data::String("revenue".into())
        ]
    );
    match &rows[1][0] {
        // 2017-01-01 as a spreadsheet serial date
        Data::DateTime(dt) => assert_eq!(dt.as_f64(), 42736.0),
        other => panic!("expected a date cell, got {:?}", other),
    }
    assert_eq!(rows[1][1], Data::Empty);
    assert_eq!(rows[1][2], Data::Float(138_888.50));
    assert_eq!(rows[2][1], Data::String("peak".into()));
    match rows[2][2] {
        Data::Float(v) => assert!((v - 291_689.22).abs() < 1e-6),
        ref other => panic!("expected a number, got {:?}", other),
    }
    Ok(())
}

#[test]
fn sheet_order_follows_insertion() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("summary.xlsx");
    export(&sample_bundle(), &path, &ExportOptions::default())?;

    let workbook: Xlsx<_> = open_workbook(&path)?;
    assert_eq!(
        workbook.sheet_names(),
        vec!["pie_gmv_by_category", "bar_top_states_gmv", "payment_mix"]
    );
    Ok(())
}

#[test]
fn exporting_twice_yields_identical_cells() -> TestResult {
    let dir = tempfile::tempdir()?;
    let first = dir.path().join("first.xlsx");
    let second = dir.path().join("second.xlsx");
    let bundle = sample_bundle();

    export(&bundle, &first, &ExportOptions::default())?;
    export(&bundle, &second, &ExportOptions::default())?;

    for (sheet, _) in bundle.iter() {
        assert_eq!(read_sheet(&first, sheet)?, read_sheet(&second, sheet)?);
    }
    Ok(())
}

#[test]
fn long_sheet_names_are_truncated_and_first_write_wins() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("summary.xlsx");
    let long_a = "a_very_long_query_name_that_overflows_one";
    let long_b = "a_very_long_query_name_that_overflows_two";

    let mut bundle = ReportBundle::new();
    assert!(bundle.insert(long_a, fixture(QueryId::BarTopStatesGmv)));
    assert!(!bundle.insert(long_b, fixture(QueryId::PaymentMix)));

    let summary = export(&bundle, &path, &ExportOptions::default())?;
    assert_eq!(summary.sheet_count, 1);

    let truncated: String = long_a.chars().take(31).collect();
    let rows = read_sheet(&path, &truncated)?;
    assert_eq!(rows[0][0], Data::String("state".into()));
    Ok(())
}

#[test]
fn color_scale_follows_the_first_data_row_only() {
    // Text first, numbers later: no scale. This mirrors how the report has
    // always behaved and is kept on purpose.
    let mixed = table(
        &["seller", "gmv", "orders"],
        vec![
            vec![Value::from("s1"), Value::from("n/a"), Value::Int(4)],
            vec![Value::from("s2"), cents(10_000), Value::Int(9)],
            vec![Value::from("s3"), cents(20_000), Value::Int(1)],
        ],
    );
    let plan = plan_sheet("sellers", &mixed, NumericDetection::FirstRow);
    assert_eq!(plan.color_scale_columns, vec![2]);

    let strict = plan_sheet("sellers", &mixed, NumericDetection::FullColumn);
    assert_eq!(strict.color_scale_columns, vec![2]);
}

#[test]
fn failed_export_leaves_no_file_behind() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("summary.xlsx");

    let mut bundle = sample_bundle();
    bundle.insert("invalid:name", fixture(QueryId::TopCategories));

    assert!(export(&bundle, &path, &ExportOptions::default()).is_err());
    assert!(!path.exists());
    assert_eq!(fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

#[test]
fn sheets_carry_frozen_panes_filters_and_color_scales() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("formatted.xlsx");

    let mut bundle = ReportBundle::new();
    bundle.insert("payment_mix", fixture(QueryId::PaymentMix));
    bundle.insert(
        "one_row",
        table(&["state", "gmv"], vec![vec![Value::from("SP"), cents(100)]]),
    );
    export(&bundle, &path, &ExportOptions::default())?;

    let mix = sheet_xml(&path, "xl/worksheets/sheet1.xml")?;
    assert!(mix.contains(r#"<pane xSplit="1" ySplit="1" topLeftCell="B2""#));
    assert!(mix.contains(r#"<autoFilter ref="A1:C4""#));
    assert!(mix.contains(r#"<conditionalFormatting sqref="B2:B4">"#));
    assert!(mix.contains(r#"<conditionalFormatting sqref="C2:C4">"#));
    assert!(!mix.contains(r#"sqref="A2:A4""#));
    assert!(mix.contains("<colorScale>"));

    let single = sheet_xml(&path, "xl/worksheets/sheet2.xml")?;
    assert!(single.contains(r#"<pane xSplit="1" ySplit="1""#));
    assert!(single.contains(r#"<autoFilter ref="A1:B2""#));
    assert!(!single.contains("<conditionalFormatting"));
    Ok(())
}
