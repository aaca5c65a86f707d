//! Debug bundle writer for inspecting raw payloads and how they were normalized.

use std::fmt::Write as _;
use std::fs::{create_dir_all, write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::app::pipeline::PredictionRun;
use crate::error::AppError;
use crate::report::{describe_payload, fmt_volume};

pub const DEBUG_DIR: &str = "debug";

/// Write a markdown bundle for `run` under `dir` and return its path.
pub fn write_debug_bundle(run: &PredictionRun, dir: &Path) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S%.3f");
    let path = dir.join(format!("tickets_debug_{ts}.md"));

    let body = render_debug_bundle(run)
        .map_err(|e| AppError::new(4, format!("Failed to render debug bundle: {e}")))?;
    write(&path, body).map_err(|e| AppError::new(4, format!("Failed to write debug file: {e}")))?;

    tracing::info!(path = %path.display(), "wrote debug bundle");
    Ok(path)
}

fn render_debug_bundle(run: &PredictionRun) -> Result<String, std::fmt::Error> {
    let mut out = String::new();

    writeln!(out, "# tickets debug bundle")?;
    writeln!(out, "- generated: {}", Local::now().to_rfc3339())?;
    writeln!(out, "- fetched_at: {}", run.fetched_at.to_rfc3339())?;
    writeln!(out, "- title: {}", run.title)?;
    match &run.query {
        Some(query) => {
            let request = query.request();
            writeln!(out, "- request_path: {}", request.path)?;
            for (key, value) in &request.params {
                writeln!(out, "- param: {key}={value}")?;
            }
        }
        None => writeln!(out, "- request_path: (offline payload)")?,
    }
    if let Some(range) = &run.range {
        writeln!(out, "- range: {range}")?;
    }
    writeln!(out, "- payload: {}", describe_payload(&run.series))?;
    writeln!(out, "- points: {}", run.series.len())?;
    writeln!(out, "- skipped: {}", run.series.skipped_count())?;

    if let Some(summary) = &run.summary {
        writeln!(out, "\n## Summary")?;
        writeln!(out, "| metric | value |")?;
        writeln!(out, "| - | - |")?;
        writeln!(out, "| total | {} |", fmt_volume(summary.total))?;
        writeln!(out, "| max | {} ({}) |", fmt_volume(summary.max.value), summary.max.date)?;
        writeln!(out, "| min | {} ({}) |", fmt_volume(summary.min.value), summary.min.date)?;
        writeln!(out, "| mean | {:.3} |", summary.mean)?;
    }

    if !run.series.skipped.is_empty() {
        writeln!(out, "\n## Skipped records")?;
        writeln!(out, "| index | reason |")?;
        writeln!(out, "| - | - |")?;
        for s in &run.series.skipped {
            writeln!(out, "| {} | {} |", s.index, s.reason.replace('|', "\\|"))?;
        }
    }

    writeln!(out, "\n## Series")?;
    writeln!(out, "| date | value |")?;
    writeln!(out, "| - | - |")?;
    for p in &run.series.points {
        writeln!(out, "| {} | {} |", p.date, fmt_volume(p.value))?;
    }

    writeln!(out, "\n## Raw payload")?;
    writeln!(out, "```json")?;
    let raw = serde_json::to_string_pretty(&run.payload).unwrap_or_else(|_| run.payload.to_string());
    writeln!(out, "{raw}")?;
    writeln!(out, "```")?;

    Ok(out)
}
