//! Delimited-text storage for the issue, label and milestone tables.

use super::{IssueRecord, LabelColor, Milestone};
use crate::Result;
use camino::Utf8Path;
use ohno::IntoAppError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const LOG_TARGET: &str = "    tables";

pub const ISSUES_FILE: &str = "issues.csv";
pub const LABELS_FILE: &str = "labels.csv";
pub const MILESTONES_FILE: &str = "milestones.csv";

pub fn read_issues(path: &Utf8Path) -> Result<Vec<IssueRecord>> {
    read_rows(path)
}

/// A label row before its color is checked.
#[derive(Debug, Deserialize)]
struct RawLabel {
    label: String,
    color: String,
}

/// Read the label table, skipping labels whose color is missing or malformed.
pub fn read_labels(path: &Utf8Path) -> Result<Vec<LabelColor>> {
    let rows: Vec<RawLabel> = read_rows(path)?;

    Ok(rows
        .into_iter()
        .filter_map(|row| match row.color.parse() {
            Ok(color) => Some(LabelColor { label: row.label, color }),
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Skipping label '{}' in '{path}': {e}", row.label);
                None
            }
        })
        .collect())
}

pub fn read_milestones(path: &Utf8Path) -> Result<Vec<Milestone>> {
    read_rows(path)
}

pub fn write_issues(path: &Utf8Path, rows: &[IssueRecord]) -> Result<()> {
    write_rows(path, rows)
}

pub fn write_labels(path: &Utf8Path, rows: &[LabelColor]) -> Result<()> {
    write_rows(path, rows)
}

pub fn write_milestones(path: &Utf8Path, rows: &[Milestone]) -> Result<()> {
    write_rows(path, rows)
}

fn read_rows<T: DeserializeOwned>(path: &Utf8Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path).into_app_err_with(|| format!("unable to open '{path}'"))?;

    let mut rows = Vec::new();
    for (index, row) in reader.deserialize().enumerate() {
        // +2 accounts for the header line and 1-based numbering
        let row: T = row.into_app_err_with(|| format!("malformed row {} in '{path}'", index + 2))?;
        rows.push(row);
    }

    log::debug!(target: LOG_TARGET, "Read {} row(s) from '{path}'", rows.len());
    Ok(rows)
}

fn write_rows<T: Serialize>(path: &Utf8Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).into_app_err_with(|| format!("unable to create '{path}'"))?;

    for row in rows {
        writer.serialize(row).into_app_err_with(|| format!("unable to write a row to '{path}'"))?;
    }

    writer.flush().into_app_err_with(|| format!("unable to flush '{path}'"))?;
    log::debug!(target: LOG_TARGET, "Wrote {} row(s) to '{path}'", rows.len());
    Ok(())
}
