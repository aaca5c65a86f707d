//! Prediction payload normalization.
//!
//! This module is responsible for turning whatever the prediction API returned
//! into a clean, date-sorted `PredictionSeries`.
//!
//! Design goals:
//! - **One dispatch point**: payload layout is classified once (`payload`)
//! - **Record-level tolerance** (skip bad records, but report what happened)
//! - **Deterministic behavior** (the reference date is injectable)
//! - **Separation of concerns**: no I/O here

use chrono::{Days, Local, NaiveDate};
use serde_json::{Map, Value};

use crate::domain::{FieldMapping, PayloadShape, PredictionPoint, PredictionSeries, SkippedRecord};
use crate::error::ErrorReason;

pub mod coerce;
pub mod fields;
pub mod payload;

pub use fields::infer_fields;
pub use payload::RawPayload;

use coerce::{date_from_value, number_from_value, parse_date, round_value};

/// Normalize a payload, dating bare-number lists from the local current date.
pub fn normalize(raw: &Value) -> Result<PredictionSeries, ErrorReason> {
    normalize_at(raw, Local::now().date_naive())
}

/// Normalize a payload with an explicit reference date.
pub fn normalize_at(raw: &Value, today: NaiveDate) -> Result<PredictionSeries, ErrorReason> {
    let series = normalize_payload(RawPayload::from_value(raw), today)?;

    tracing::debug!(
        shape = series.shape.display_name(),
        points = series.len(),
        skipped = series.skipped_count(),
        "normalized prediction payload"
    );
    if !series.skipped.is_empty() {
        tracing::warn!(
            skipped = series.skipped_count(),
            first_reason = %series.skipped[0].reason,
            "dropped malformed prediction records"
        );
    }

    Ok(series)
}

/// Normalize an already-classified payload.
pub fn normalize_payload(payload: RawPayload<'_>, today: NaiveDate) -> Result<PredictionSeries, ErrorReason> {
    match payload {
        RawPayload::Failure { message } => Err(ErrorReason::UpstreamError(message)),
        RawPayload::Mapping(map) => Ok(from_mapping(map)),
        RawPayload::Records(rows) => Ok(from_records(rows)),
        RawPayload::Numbers(values) => Ok(from_numbers(&values, today)),
        RawPayload::Unsupported => Err(ErrorReason::UnparseablePayload),
    }
}

fn from_mapping(map: &Map<String, Value>) -> PredictionSeries {
    let mut points = Vec::with_capacity(map.len());
    let mut skipped = Vec::new();

    for (index, (key, value)) in map.iter().enumerate() {
        let parsed = parse_date(key)
            .ok_or_else(|| format!("key '{key}' is not a date"))
            .and_then(|date| number_from_value(Some(value)).map(|v| PredictionPoint::new(date, v)));
        match parsed {
            Ok(point) => points.push(point),
            Err(reason) => skipped.push(SkippedRecord { index, reason }),
        }
    }

    sort_by_date(&mut points);
    PredictionSeries {
        points,
        shape: PayloadShape::Mapping,
        fields: None,
        skipped,
    }
}

fn from_records(rows: &[Value]) -> PredictionSeries {
    let fields = rows
        .first()
        .and_then(Value::as_object)
        .map(|first| infer_fields(first.keys().map(String::as_str)))
        .unwrap_or(FieldMapping {
            date_field: None,
            value_field: None,
        });

    let mut points = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        match extract_record(row, &fields) {
            Ok(point) => points.push(point),
            Err(reason) => skipped.push(SkippedRecord { index, reason }),
        }
    }

    sort_by_date(&mut points);
    PredictionSeries {
        points,
        shape: PayloadShape::Records,
        fields: Some(fields),
        skipped,
    }
}

fn extract_record(row: &Value, fields: &FieldMapping) -> Result<PredictionPoint, String> {
    let record = row
        .as_object()
        .ok_or_else(|| format!("element is not a record: {row}"))?;

    let lookup = |field: &Option<String>| field.as_deref().and_then(|name| record.get(name));

    let date = date_from_value(lookup(&fields.date_field))?;
    let value = number_from_value(lookup(&fields.value_field))?;
    Ok(PredictionPoint::new(date, round_value(value)))
}

fn from_numbers(values: &[f64], today: NaiveDate) -> PredictionSeries {
    let mut points = Vec::with_capacity(values.len());
    let mut skipped = Vec::new();

    for (index, &value) in values.iter().enumerate() {
        match today.checked_add_days(Days::new(index as u64)) {
            Some(date) => points.push(PredictionPoint::new(date, round_value(value))),
            None => skipped.push(SkippedRecord {
                index,
                reason: format!("no calendar date {index} days after {today}"),
            }),
        }
    }

    PredictionSeries {
        points,
        shape: PayloadShape::Numbers,
        fields: None,
        skipped,
    }
}

// Stable: duplicate dates keep payload order.
fn sort_by_date(points: &mut [PredictionPoint]) {
    points.sort_by_key(|p| p.date);
}
