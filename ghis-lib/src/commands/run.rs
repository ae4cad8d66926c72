//! Command dispatch logic for ghis

use super::{ChartArgs, FetchArgs, InitArgs, ValidateArgs, chart_issues, fetch_issues, init_config, validate_config};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "ghis", author, version, long_about = None)]
#[command(about = "Chart how many GitHub issues were open over time")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: GhisSubcommand,
}

#[derive(Subcommand, Debug)]
enum GhisSubcommand {
    /// Download issues, labels and milestones into CSV tables
    Fetch(Box<FetchArgs>),
    /// Chart issue counts over time from fetched tables
    Chart(Box<ChartArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// # Errors
///
/// Returns an error if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        GhisSubcommand::Fetch(fetch_args) => fetch_issues(host, fetch_args).await,
        GhisSubcommand::Chart(chart_args) => chart_issues(host, chart_args),
        GhisSubcommand::Init(init_args) => init_config(host, init_args),
        GhisSubcommand::Validate(validate_args) => validate_config(host, validate_args),
    }
}
