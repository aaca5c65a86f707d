//! Command-line parsing for the ticket forecast dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the normalization code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::config::{ApiOverrides, LogConfig};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "tickets", version, about = "Ticket volume forecast dashboard")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch predictions for a quick preset (e.g. `next-7-days` or "Next 7 Days").
    Quick(QuickArgs),
    /// Fetch predictions for an explicit date range.
    Range(RangeArgs),
    /// Fetch predictions for today through today + N days (1-365).
    Days(DaysArgs),
    /// Normalize a saved payload JSON file without contacting the API.
    Parse(ParseArgs),
    /// List the quick presets and the date windows they cover today.
    Presets,
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as the one-shot commands, but
    /// renders results in a terminal UI using Ratatui.
    Tui,
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone, Default)]
pub struct GlobalArgs {
    /// Prediction API base URL (overrides TICKETS_API_BASE).
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,

    /// Request timeout in seconds (overrides TICKETS_API_TIMEOUT_SECS).
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Append logs to this file (required to see logs from the TUI).
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `ticket_forecast=trace` (overrides TICKETS_LOG).
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_filter: Option<String>,
}

impl GlobalArgs {
    pub fn api_overrides(&self) -> ApiOverrides {
        ApiOverrides {
            base_url: self.api_base.clone(),
            timeout_secs: self.timeout,
        }
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            file: self.log_file.clone(),
            filter: self.log_filter.clone(),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct QuickArgs {
    /// Preset name: tomorrow, next-2-days, next-7-days, this-week, this-month, next-30-days.
    pub preset: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct RangeArgs {
    /// First day (YYYY-MM-DD).
    #[arg(long)]
    pub start: NaiveDate,

    /// Last day (YYYY-MM-DD), not before --start.
    #[arg(long)]
    pub end: NaiveDate,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct DaysArgs {
    /// Number of days after today.
    pub days: u32,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ParseArgs {
    /// Payload JSON file as returned by the prediction API.
    #[arg(value_name = "JSON")]
    pub file: PathBuf,

    /// Reference date for bare-number payloads (defaults to today).
    #[arg(long)]
    pub today: Option<NaiveDate>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Presentation and export options for one-shot commands.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Bar chart width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Disable the terminal bar chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Also print one row per date.
    #[arg(long)]
    pub table: bool,

    /// Export the series to CSV (`date,value`).
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the run (points, summary, skipped records) to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Write a markdown debug bundle under ./debug.
    #[arg(long)]
    pub debug: bool,
}
