//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - resolves the user's query (preset, range, day count, saved payload)
//! - runs the fetch/normalize/summarize pipeline
//! - prints reports/plots
//! - writes optional exports

use std::path::Path;

use chrono::Local;
use clap::Parser;

use crate::cli::{Command, DaysArgs, GlobalArgs, OutputArgs, ParseArgs, QuickArgs, RangeArgs};
use crate::config::ApiConfig;
use crate::data::PredictionClient;
use crate::domain::{DateRange, PredictionQuery, QuickPreset, map_preset, next_days};
use crate::error::AppError;

pub mod pipeline;

use pipeline::PredictionRun;

/// Entry point for the `tickets` binary.
pub fn run() -> Result<(), AppError> {
    // We want `tickets` and `tickets --api-base URL` to behave like `tickets tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // `.env` is loaded exactly once, here, so `TICKETS_LOG` reaches the
    // subscriber and `TICKETS_API_*` reach `ApiConfig::load`.
    dotenvy::dotenv().ok();
    let interactive = matches!(cli.command, Command::Tui);
    crate::logging::init(&cli.global.log_config(), interactive)?;

    match cli.command {
        Command::Quick(args) => handle_quick(&cli.global, args),
        Command::Range(args) => handle_range(&cli.global, args),
        Command::Days(args) => handle_days(&cli.global, args),
        Command::Parse(args) => handle_parse(args),
        Command::Presets => handle_presets(),
        Command::Tui => handle_tui(&cli.global),
    }
}

fn handle_quick(global: &GlobalArgs, args: QuickArgs) -> Result<(), AppError> {
    let preset = QuickPreset::from_name(&args.preset)?;
    execute_query(global, &PredictionQuery::Preset(preset), &args.output)
}

fn handle_range(global: &GlobalArgs, args: RangeArgs) -> Result<(), AppError> {
    let range = DateRange::new(args.start, args.end)?;
    execute_query(global, &PredictionQuery::Range(range), &args.output)
}

fn handle_days(global: &GlobalArgs, args: DaysArgs) -> Result<(), AppError> {
    let range = next_days(args.days, Local::now().date_naive())?;
    execute_query(global, &PredictionQuery::Range(range), &args.output)
}

fn execute_query(global: &GlobalArgs, query: &PredictionQuery, output: &OutputArgs) -> Result<(), AppError> {
    let config = ApiConfig::load(&global.api_overrides())?;
    let client = PredictionClient::new(&config)?;
    let run = pipeline::run_query(&client, query, Local::now().date_naive())?;
    present(&run, output)
}

fn handle_parse(args: ParseArgs) -> Result<(), AppError> {
    let payload = crate::io::read_payload_json(&args.file)?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let title = format!("Payload: {}", args.file.display());
    let run = pipeline::run_payload(title, payload, today)?;
    present(&run, &args.output)
}

fn handle_presets() -> Result<(), AppError> {
    let today = Local::now().date_naive();
    println!("Presets as of {today}:");
    for preset in QuickPreset::ALL {
        let (start, end) = map_preset(preset.display_name(), today)?;
        println!(
            "  {:<13} {:<13} {start} .. {end}  ({})",
            preset.slug(),
            preset.display_name(),
            preset.api_path()
        );
    }
    Ok(())
}

fn handle_tui(global: &GlobalArgs) -> Result<(), AppError> {
    let config = ApiConfig::load(&global.api_overrides())?;
    crate::tui::run(&config)
}

fn present(run: &PredictionRun, output: &OutputArgs) -> Result<(), AppError> {
    println!("{}", crate::report::format_run_summary(run));

    match &run.summary {
        None => println!("No prediction data to plot"),
        Some(summary) => {
            println!("{}", crate::report::format_summary_table(summary));
            if output.table {
                println!("{}", crate::report::format_series_table(&run.series));
            }
            if !output.no_plot {
                println!("{}", crate::plot::render_bar_chart(&run.series, output.width));
            }
        }
    }

    // Optional exports.
    if let Some(path) = &output.export {
        crate::io::write_series_csv(path, &run.series)?;
        println!("Wrote {}", path.display());
    }
    if let Some(path) = &output.export_json {
        crate::io::write_run_json(path, run)?;
        println!("Wrote {}", path.display());
    }
    if output.debug {
        let path = crate::debug::write_debug_bundle(run, Path::new(crate::debug::DEBUG_DIR))?;
        println!("Wrote debug bundle: {}", path.display());
    }

    Ok(())
}

/// Rewrite argv so `tickets` defaults to `tickets tui`.
///
/// Rules:
/// - `tickets`                         -> `tickets tui`
/// - `tickets --api-base URL ...`      -> `tickets tui --api-base URL ...`
/// - `tickets --help/--version/-h`     -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "quick" | "range" | "days" | "parse" | "presets" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_launches_tui() {
        assert_eq!(rewrite_args(argv(&["tickets"])), argv(&["tickets", "tui"]));
    }

    #[test]
    fn leading_flags_go_to_tui() {
        assert_eq!(
            rewrite_args(argv(&["tickets", "--api-base", "http://x"])),
            argv(&["tickets", "tui", "--api-base", "http://x"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for args in [
            vec!["tickets", "quick", "tomorrow"],
            vec!["tickets", "--help"],
            vec!["tickets", "presets"],
        ] {
            assert_eq!(rewrite_args(argv(&args)), argv(&args));
        }
    }
}
