//! Coercion of loosely typed JSON scalars into dates and numbers.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

// ISO dates are the norm. Slashed and dashed US-style dates are read
// month-first; day-first only matches when the first field cannot be a month.
const DATE_FMTS: [&str; 6] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%m-%d-%Y", "%d-%m-%Y"];
const DATETIME_FMTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a calendar date; timestamps keep only their date part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    // HTTP-date style, e.g. `Fri, 05 Jan 2024 00:00:00 GMT`.
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Date from a record field (`None` = field absent).
pub fn date_from_value(value: Option<&Value>) -> Result<NaiveDate, String> {
    match value {
        None | Some(Value::Null) => Err("missing date".to_string()),
        Some(Value::String(s)) => parse_date(s).ok_or_else(|| format!("invalid date '{s}'")),
        Some(other) => Err(format!("date is not a string: {other}")),
    }
}

/// Finite number from a JSON number or numeric string (`None` = field absent).
pub fn number_from_value(value: Option<&Value>) -> Result<f64, String> {
    let parsed = match value {
        None | Some(Value::Null) => return Err("missing value".to_string()),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(format!("non-numeric value: {}", value.map(Value::to_string).unwrap_or_default())),
    }
}

/// Round to the nearest whole ticket count, halves away from zero.
pub fn round_value(value: f64) -> f64 {
    value.round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn accepts_common_date_layouts() {
        assert_eq!(parse_date("2024-01-05"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date(" 2024/01/05 "), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("01/05/2024"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("01-05-2024"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T00:00:00Z"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T23:30:00+02:00"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05 08:30:00"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T08:30:00.250"), Some(d(2024, 1, 5)));
    }

    #[test]
    fn slashed_dates_are_month_first() {
        assert_eq!(parse_date("02/01/2024"), Some(d(2024, 2, 1)));
        assert_eq!(parse_date("01/13/2024"), Some(d(2024, 1, 13)));
        // Only day-first can make sense of a 13th "month".
        assert_eq!(parse_date("13/01/2024"), Some(d(2024, 1, 13)));
        assert_eq!(parse_date("13-01-2024"), Some(d(2024, 1, 13)));
    }

    #[test]
    fn http_dates_are_accepted() {
        assert_eq!(parse_date("Fri, 05 Jan 2024 00:00:00 GMT"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("Sat, 06 Jan 2024 12:00:00 +0000"), Some(d(2024, 1, 6)));
        assert_eq!(
            date_from_value(Some(&json!("Mon, 01 Jul 2024 00:00:00 GMT"))),
            Ok(d(2024, 7, 1))
        );
    }

    #[test]
    fn rejects_non_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("tomorrow"), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn numbers_from_json() {
        assert_eq!(number_from_value(Some(&json!(3))), Ok(3.0));
        assert_eq!(number_from_value(Some(&json!(3.7))), Ok(3.7));
        assert_eq!(number_from_value(Some(&json!(" 12.5 "))), Ok(12.5));
        assert_eq!(number_from_value(None), Err("missing value".to_string()));
        assert_eq!(number_from_value(Some(&json!(null))), Err("missing value".to_string()));
        assert!(number_from_value(Some(&json!("lots"))).is_err());
        assert!(number_from_value(Some(&json!("NaN"))).is_err());
        assert!(number_from_value(Some(&json!([1]))).is_err());
    }

    #[test]
    fn dates_from_json() {
        assert_eq!(date_from_value(Some(&json!("2024-01-01"))), Ok(d(2024, 1, 1)));
        assert_eq!(date_from_value(None), Err("missing date".to_string()));
        assert_eq!(date_from_value(Some(&json!("soon"))), Err("invalid date 'soon'".to_string()));
        assert!(date_from_value(Some(&json!(20240101))).is_err());
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_value(3.7), 4.0);
        assert_eq!(round_value(2.5), 3.0);
        assert_eq!(round_value(-2.5), -3.0);
        assert_eq!(round_value(2.4), 2.0);
    }
}
