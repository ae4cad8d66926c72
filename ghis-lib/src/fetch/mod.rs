//! Issue data acquisition
//!
//! Issues, labels and milestones are read either from the GitHub REST API or
//! from a local github-backup style export, flattened into the three tables of
//! [`crate::dataset`], and written out as CSV.

mod client;
mod export;
mod model;
mod progress;
mod rows;
mod token;

pub use client::{Client, DEFAULT_API_URL};
pub use export::read_export;
pub use progress::Progress;
pub use rows::{DEFAULT_CLOSE_REGEX, DEFAULT_CREATOR_REGEX, RowOptions, issue_rows};
pub use token::resolve_token;

use crate::Result;
use crate::dataset::tables::{self, ISSUES_FILE, LABELS_FILE, MILESTONES_FILE};
use crate::dataset::{IssueRecord, LabelColor, Milestone};
use camino::Utf8Path;
use ohno::IntoAppError;
use std::fs;

const LOG_TARGET: &str = "     fetch";

/// The flattened tables of one repository.
#[derive(Debug, Clone, Default)]
pub struct FetchedData {
    pub issues: Vec<IssueRecord>,
    pub labels: Vec<LabelColor>,
    pub milestones: Vec<Milestone>,
}

impl FetchedData {
    /// Write the three tables into `dir`, creating it if needed.
    pub fn write_to(&self, dir: &Utf8Path) -> Result<()> {
        fs::create_dir_all(dir).into_app_err_with(|| format!("could not create output directory '{dir}'"))?;

        tables::write_issues(&dir.join(ISSUES_FILE), &self.issues)?;
        tables::write_labels(&dir.join(LABELS_FILE), &self.labels)?;
        tables::write_milestones(&dir.join(MILESTONES_FILE), &self.milestones)?;

        log::info!(
            target: LOG_TARGET,
            "Wrote {} issue row(s), {} label(s), {} milestone(s) to '{dir}'",
            self.issues.len(),
            self.labels.len(),
            self.milestones.len()
        );
        Ok(())
    }
}

/// Fetch every issue, label and milestone of `repo` (`owner/name`).
pub async fn fetch_repo(client: &Client, repo: &str, options: &RowOptions, progress: &dyn Progress) -> Result<FetchedData> {
    let base = format!("/repos/{}", repo.trim_matches('/'));

    progress.set_phase("Issues");
    let raw_issues: Vec<model::Issue> = client.get_all(&format!("{base}/issues?per_page=100&state=all"), progress).await?;
    let issues = raw_issues.iter().flat_map(|issue| issue_rows(issue, options)).collect();

    progress.set_phase("Labels");
    let raw_labels: Vec<model::Label> = client.get_all(&format!("{base}/labels?per_page=100"), progress).await?;

    progress.set_phase("Milestones");
    let raw_milestones: Vec<model::Milestone> = client.get_all(&format!("{base}/milestones?per_page=100&state=all"), progress).await?;

    log::info!(
        target: LOG_TARGET,
        "Fetched {} issue(s), {} label(s), {} milestone(s) from '{repo}'",
        raw_issues.len(),
        raw_labels.len(),
        raw_milestones.len()
    );

    Ok(FetchedData {
        issues,
        labels: rows::label_colors(&raw_labels),
        milestones: rows::milestones(&raw_milestones),
    })
}
