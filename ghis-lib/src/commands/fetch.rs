use super::Host;
use super::ProgressReporter;
use super::common::{ColorMode, LogLevel, init_logging};
use crate::Result;
use crate::fetch::{Client, DEFAULT_API_URL, DEFAULT_CLOSE_REGEX, DEFAULT_CREATOR_REGEX, Progress, RowOptions, fetch_repo, read_export, resolve_token};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::io::Write;

const LOG_TARGET: &str = "     fetch";

#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Repository to fetch, as `owner/name`, or the directory of a github-backup export
    #[arg(value_name = "REPO")]
    pub repo: String,

    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Regex searched in issue bodies whose first group overrides the close time (empty to disable)
    #[arg(long, value_name = "REGEX", default_value = DEFAULT_CLOSE_REGEX)]
    pub close_regex: String,

    /// Regex searched in issue bodies whose first group overrides the creator (empty to disable)
    #[arg(long, value_name = "REGEX", default_value = DEFAULT_CREATOR_REGEX)]
    pub creator_regex: String,

    /// Directory receiving issues.csv, labels.csv and milestones.csv
    #[arg(long, short = 'o', value_name = "PATH", default_value = "data")]
    pub output_dir: Utf8PathBuf,

    /// Base URL of the GitHub REST API
    #[arg(long, value_name = "URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

pub async fn fetch_issues<H: Host>(host: &mut H, args: &FetchArgs) -> Result<()> {
    init_logging(args.log_level);

    let options = RowOptions::new(&args.close_regex, &args.creator_regex)?;

    let export_dir = Utf8Path::new(&args.repo);
    let data = if args.token.is_none() && export_dir.is_dir() {
        log::info!(target: LOG_TARGET, "Reading issue export from '{export_dir}'");
        read_export(export_dir, &options)?
    } else {
        let token = resolve_token(args.token.as_deref())?;
        let client = Client::new(&token, args.api_url.as_str())?;
        let progress = ProgressReporter::new(args.log_level.progress_delay(), args.color.use_colors(&std::io::stderr()));

        log::info!(target: LOG_TARGET, "Fetching '{}' from {}", args.repo, client.base_url());
        let result = fetch_repo(&client, &args.repo, &options, &progress).await;
        progress.done();
        result?
    };

    data.write_to(&args.output_dir)?;

    let _ = writeln!(
        host.output(),
        "Wrote {} issue row(s), {} label(s) and {} milestone(s) to {}",
        data.issues.len(),
        data.labels.len(),
        data.milestones.len(),
        args.output_dir
    );

    Ok(())
}
