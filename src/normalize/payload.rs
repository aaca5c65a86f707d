//! Classification of an untyped JSON payload into a closed set of layouts.
//!
//! All "where are the predictions?" probing happens here once; the normalizer
//! then matches exhaustively on [`RawPayload`].

use serde_json::{Map, Value};

/// Message used when the payload carries no data and no error text.
pub const NO_DATA_MESSAGE: &str = "No data";

/// A payload after envelope unwrapping.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload<'a> {
    /// Empty payload or an `{"error": ...}` wrapper.
    Failure { message: String },
    /// Date-like keys mapped to values.
    Mapping(&'a Map<String, Value>),
    /// Non-empty array whose first element is an object.
    Records(&'a [Value]),
    /// Non-empty array of bare numbers.
    Numbers(Vec<f64>),
    /// No usable layout (empty array, mixed elements, scalars, null candidate).
    Unsupported,
}

impl<'a> RawPayload<'a> {
    /// Locate the candidate collection inside `raw` and classify it.
    ///
    /// Envelope order: error/empty check, then `data.predictions`, then
    /// `predictions`, then the payload itself.
    pub fn from_value(raw: &'a Value) -> Self {
        if is_empty(raw) {
            return RawPayload::Failure {
                message: NO_DATA_MESSAGE.to_string(),
            };
        }
        if let Some(error) = raw.as_object().and_then(|map| map.get("error")) {
            return RawPayload::Failure {
                message: error_message(error),
            };
        }

        classify(candidate(raw))
    }
}

fn is_empty(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn error_message(error: &Value) -> String {
    match error {
        Value::Null => NO_DATA_MESSAGE.to_string(),
        Value::String(s) if s.trim().is_empty() => NO_DATA_MESSAGE.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn candidate(raw: &Value) -> &Value {
    let Some(map) = raw.as_object() else {
        return raw;
    };

    if let Some(nested) = map
        .get("data")
        .and_then(Value::as_object)
        .and_then(|data| data.get("predictions"))
    {
        return nested;
    }

    map.get("predictions").unwrap_or(raw)
}

fn classify(candidate: &Value) -> RawPayload<'_> {
    match candidate {
        Value::Object(map) => RawPayload::Mapping(map),
        Value::Array(items) => match items.first() {
            None => RawPayload::Unsupported,
            Some(first) if first.is_object() => RawPayload::Records(items),
            Some(_) => items
                .iter()
                .map(Value::as_f64)
                .collect::<Option<Vec<f64>>>()
                .map(RawPayload::Numbers)
                .unwrap_or(RawPayload::Unsupported),
        },
        _ => RawPayload::Unsupported,
    }
}
