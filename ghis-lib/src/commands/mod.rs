//! Command-line interface and orchestration for ghis
//!
//! This module parses arguments, loads configuration, and drives the other
//! modules end to end.
//!
//! # Commands
//!
//! - **fetch**: Download a repository's issues, labels and milestones from the
//!   GitHub REST API (or read them from a github-backup export) and write them
//!   as `issues.csv`, `labels.csv` and `milestones.csv`
//! - **chart**: Load those tables, count issues over time per category with the
//!   series builder, and render the stacked chart in the requested formats
//! - **init**: Generate a default configuration file
//! - **validate**: Check a configuration file
//!
//! Configuration lives in `ghis.toml` and supplies the defaults of the chart
//! command: data directory, category field and selection, label filter
//! prefixes, and which transitions are counted.

mod chart;
mod common;
mod config;
mod fetch;
mod host;
mod init;
mod progress_reporter;
mod run;
mod validate;

#[cfg(debug_assertions)]
pub use config::{CategoryField, Config};

pub use chart::{ChartArgs, Transition, chart_issues};
pub use common::{ColorMode, LogLevel};
pub use fetch::{FetchArgs, fetch_issues};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use progress_reporter::ProgressReporter;
pub use run::run;
pub use validate::{ValidateArgs, validate_config};
