//! `ticket-forecast` library crate.
//!
//! The binary (`tickets`) is a thin wrapper around this library so that:
//!
//! - payload normalization is testable without spawning processes or servers
//! - modules are reusable (e.g., a future web front-end or batch exporter)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod normalize;
pub mod plot;
pub mod report;
pub mod stats;
pub mod tui;
