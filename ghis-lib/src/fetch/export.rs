use super::rows::{self, RowOptions};
use super::{FetchedData, model};
use crate::Result;
use camino::Utf8Path;
use ohno::IntoAppError;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "    export";

/// Read a github-backup style export rooted at `root`.
///
/// `issues/` must exist and hold one JSON file per issue. `labels/labels.json`
/// and `milestones/*.json` are read when present.
pub fn read_export(root: &Utf8Path, options: &RowOptions) -> Result<FetchedData> {
    let issues_dir = root.join("issues");
    if !issues_dir.is_dir() {
        return Err(ohno::app_err!("'{root}' is not an issue export: missing directory '{issues_dir}'"));
    }

    let mut issues = Vec::new();
    for path in json_files(issues_dir.as_std_path())? {
        let issue: model::Issue = read_json(&path)?;
        issues.extend(rows::issue_rows(&issue, options));
    }
    issues.sort_by_key(|r| r.issue);

    let labels_file = root.join("labels").join("labels.json");
    let labels = if labels_file.is_file() {
        let labels: Vec<model::Label> = read_json(labels_file.as_std_path())?;
        rows::label_colors(&labels)
    } else {
        log::warn!(target: LOG_TARGET, "No label file at '{labels_file}', label colors will be empty");
        Vec::new()
    };

    let milestones_dir = root.join("milestones");
    let milestones = if milestones_dir.is_dir() {
        let mut raw = Vec::new();
        for path in json_files(milestones_dir.as_std_path())? {
            raw.push(read_json::<model::Milestone>(&path)?);
        }
        rows::milestones(&raw)
    } else {
        log::warn!(target: LOG_TARGET, "No milestone directory at '{milestones_dir}', milestones will be empty");
        Vec::new()
    };

    log::info!(target: LOG_TARGET, "Read {} issue row(s) from export '{root}'", issues.len());
    Ok(FetchedData { issues, labels, milestones })
}

/// The `.json` files directly inside `dir`, sorted by name.
fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry_result in walkdir::WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(false) {
        let entry = entry_result.into_app_err_with(|| format!("could not walk directory '{}'", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let is_json = entry.path().extension().and_then(|s| s.to_str()).is_some_and(|ext| ext == "json");
        if is_json {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).into_app_err_with(|| format!("could not read '{}'", path.display()))?;
    serde_json::from_str(&text).into_app_err_with(|| format!("could not parse '{}'", path.display()))
}
