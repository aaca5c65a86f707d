//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - handed from the normalizer to the presenters
//! - exported to JSON/CSV
//! - dumped into debug bundles

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ErrorReason;

/// Canonical unit of a forecast: one date, one ticket volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl PredictionPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Which payload layout the normalizer recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadShape {
    /// `{"2024-01-01": 10, ...}`
    Mapping,
    /// `[{"date": ..., "value": ...}, ...]`
    Records,
    /// `[10, 12, 9]`, dated from today onwards.
    Numbers,
}

impl PayloadShape {
    pub fn display_name(self) -> &'static str {
        match self {
            PayloadShape::Mapping => "date mapping",
            PayloadShape::Records => "list of records",
            PayloadShape::Numbers => "list of numbers",
        }
    }
}

/// Field names chosen for a list-of-records payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMapping {
    pub date_field: Option<String>,
    pub value_field: Option<String>,
}

/// An input element the normalizer dropped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    /// Position in the candidate collection (entry order for mappings).
    pub index: usize,
    pub reason: String,
}

/// Normalized forecast: points sorted ascending by date, plus how they were found.
///
/// Duplicate dates are kept in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionSeries {
    pub points: Vec<PredictionPoint>,
    pub shape: PayloadShape,
    /// Only set for `PayloadShape::Records`.
    pub fields: Option<FieldMapping>,
    pub skipped: Vec<SkippedRecord>,
}

impl PredictionSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }
}

/// A value together with the date it occurs on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DatedValue {
    pub value: f64,
    pub date: NaiveDate,
}

/// Summary statistics of a non-empty series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub max: DatedValue,
    pub min: DatedValue,
}

/// Inclusive date window with `end >= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ErrorReason> {
        if end < start {
            return Err(ErrorReason::InvalidDateRange(
                "End date must be after start date".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn date_range_rejects_end_before_start() {
        let err = DateRange::new(d(2024, 6, 12), d(2024, 6, 11)).unwrap_err();
        assert!(matches!(err, ErrorReason::InvalidDateRange(_)));
    }

    #[test]
    fn date_range_allows_single_day() {
        let range = DateRange::new(d(2024, 6, 12), d(2024, 6, 12)).unwrap();
        assert_eq!(range.days(), 1);
        assert_eq!(range.to_string(), "2024-06-12 - 2024-06-12");
    }
}
