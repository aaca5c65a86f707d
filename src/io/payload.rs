//! Read saved prediction payloads (for offline normalization).

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;

use crate::error::AppError;

/// Read a JSON payload file as returned by the prediction API.
pub fn read_payload_json(path: &Path) -> Result<Value, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open payload JSON '{}': {e}", path.display())))?;
    let payload: Value = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid payload JSON '{}': {e}", path.display())))?;
    Ok(payload)
}
