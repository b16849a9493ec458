//! Tolerant date coercion for time axes.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tally_types::Value;

/// Coerces a cell to a calendar date.
///
/// Timestamps keep their date part. Text is tried as `YYYY-MM-DD`,
/// `YYYY-MM`, `YYYY-MM-DD HH:MM:SS` and RFC 3339. Anything else, including
/// numbers, yields `None`.
pub fn coerce_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Timestamp(ts) => Some(ts.date()),
        Value::Text(s) => parse_date_text(s.trim()),
        _ => None,
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    // chrono needs a day to build a date
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(ts.date());
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|ts| ts.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn accepts_dates_and_timestamps() {
        let ts = date(2017, 3, 4).and_hms_opt(12, 30, 0).unwrap();
        assert_eq!(coerce_date(&Value::Date(date(2017, 1, 1))), Some(date(2017, 1, 1)));
        assert_eq!(coerce_date(&Value::Timestamp(ts)), Some(date(2017, 3, 4)));
    }

    #[test]
    fn parses_common_text_forms() {
        assert_eq!(coerce_date(&Value::from("2017-02-15")), Some(date(2017, 2, 15)));
        assert_eq!(coerce_date(&Value::from("2017-02")), Some(date(2017, 2, 1)));
        assert_eq!(
            coerce_date(&Value::from("2017-02-15 08:00:00")),
            Some(date(2017, 2, 15))
        );
        assert_eq!(
            coerce_date(&Value::from("2017-02-15T08:00:00+03:00")),
            Some(date(2017, 2, 15))
        );
    }

    #[test]
    fn unparseable_cells_become_none() {
        assert_eq!(coerce_date(&Value::from("last spring")), None);
        assert_eq!(coerce_date(&Value::from("")), None);
        assert_eq!(coerce_date(&Value::Int(20170101)), None);
        assert_eq!(coerce_date(&Value::Null), None);
    }
}
