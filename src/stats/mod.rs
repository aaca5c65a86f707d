//! Summary statistics over a normalized series.

use crate::domain::{DatedValue, PredictionSeries, Summary};
use crate::error::ErrorReason;

/// Reduce a series to total, mean, and the first occurrences of max and min.
pub fn summarize(series: &PredictionSeries) -> Result<Summary, ErrorReason> {
    let mut points = series.points.iter();
    let first = points.next().ok_or(ErrorReason::EmptySeries)?;

    let mut total = first.value;
    let mut max = DatedValue {
        value: first.value,
        date: first.date,
    };
    let mut min = max;

    for p in points {
        total += p.value;
        // Strict comparisons keep the earliest index on ties.
        if p.value > max.value {
            max = DatedValue {
                value: p.value,
                date: p.date,
            };
        }
        if p.value < min.value {
            min = DatedValue {
                value: p.value,
                date: p.date,
            };
        }
    }

    let count = series.len();
    Ok(Summary {
        count,
        total,
        mean: total / count as f64,
        max,
        min,
    })
}

/// Index of the first point holding the max and min values, for highlighting.
pub fn extreme_indices(series: &PredictionSeries) -> Option<(usize, usize)> {
    let mut points = series.points.iter().enumerate();
    let (_, first) = points.next()?;
    let (mut max_idx, mut max_val) = (0, first.value);
    let (mut min_idx, mut min_val) = (0, first.value);
    for (idx, p) in points {
        if p.value > max_val {
            max_idx = idx;
            max_val = p.value;
        }
        if p.value < min_val {
            min_idx = idx;
            min_val = p.value;
        }
    }
    Some((max_idx, min_idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::{PayloadShape, PredictionPoint};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series(values: &[(NaiveDate, f64)]) -> PredictionSeries {
        PredictionSeries {
            points: values.iter().map(|&(date, value)| PredictionPoint::new(date, value)).collect(),
            shape: PayloadShape::Mapping,
            fields: None,
            skipped: Vec::new(),
        }
    }

    #[test]
    fn two_day_summary() {
        let s = series(&[(d(2024, 1, 1), 10.0), (d(2024, 1, 2), 5.0)]);
        let summary = summarize(&s).unwrap();
        assert_eq!(summary.total, 15.0);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.mean, 7.5);
        assert_eq!(summary.max, DatedValue { value: 10.0, date: d(2024, 1, 1) });
        assert_eq!(summary.min, DatedValue { value: 5.0, date: d(2024, 1, 2) });
    }

    #[test]
    fn ties_resolve_to_first_occurrence() {
        let s = series(&[
            (d(2024, 1, 1), 4.0),
            (d(2024, 1, 2), 9.0),
            (d(2024, 1, 3), 4.0),
            (d(2024, 1, 4), 9.0),
        ]);
        let summary = summarize(&s).unwrap();
        assert_eq!(summary.max.date, d(2024, 1, 2));
        assert_eq!(summary.min.date, d(2024, 1, 1));
        assert_eq!(extreme_indices(&s), Some((1, 0)));
    }

    #[test]
    fn extremes_bound_every_point() {
        let s = series(&[
            (d(2024, 1, 1), 12.0),
            (d(2024, 1, 2), -3.0),
            (d(2024, 1, 3), 40.0),
            (d(2024, 1, 4), 0.0),
            (d(2024, 1, 5), 17.0),
        ]);
        let summary = summarize(&s).unwrap();
        assert_eq!(summary.total, s.values().sum::<f64>());
        for p in &s.points {
            assert!(summary.max.value >= p.value);
            assert!(summary.min.value <= p.value);
        }
        assert!(s.dates().any(|date| date == summary.max.date));
        assert!(s.dates().any(|date| date == summary.min.date));
    }

    #[test]
    fn single_point_is_both_extremes() {
        let s = series(&[(d(2024, 1, 1), 3.0)]);
        let summary = summarize(&s).unwrap();
        assert_eq!(summary.max, summary.min);
        assert_eq!(extreme_indices(&s), Some((0, 0)));
    }

    #[test]
    fn empty_series_fails() {
        let s = series(&[]);
        assert_eq!(summarize(&s), Err(ErrorReason::EmptySeries));
        assert_eq!(extreme_indices(&s), None);
    }
}
