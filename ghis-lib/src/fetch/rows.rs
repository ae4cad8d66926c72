use super::model;
use crate::Result;
use crate::dataset::{IssueRecord, LabelColor, Milestone, parse_timestamp, still_open};
use ohno::IntoAppError;
use regex::Regex;

const LOG_TARGET: &str = "      rows";

/// Default pattern locating the close time of issues migrated from Trac.
pub const DEFAULT_CLOSE_REGEX: &str = r#""changetime": "([^"]*)""#;

/// Default pattern locating the original reporter of issues migrated from Trac.
pub const DEFAULT_CREATOR_REGEX: &str = r#""reporter": "([^"]*)""#;

/// How issue JSON is flattened into table rows.
#[derive(Debug, Clone)]
pub struct RowOptions {
    close_regex: Option<Regex>,
    creator_regex: Option<Regex>,
}

impl RowOptions {
    /// Compile the body patterns; an empty pattern disables the override.
    pub fn new(close_regex: &str, creator_regex: &str) -> Result<Self> {
        Ok(Self {
            close_regex: compile(close_regex, "--close-regex")?,
            creator_regex: compile(creator_regex, "--creator-regex")?,
        })
    }

    /// No body overrides at all.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            close_regex: None,
            creator_regex: None,
        }
    }
}

impl Default for RowOptions {
    fn default() -> Self {
        Self::new(DEFAULT_CLOSE_REGEX, DEFAULT_CREATOR_REGEX).unwrap_or_else(|_| Self::plain())
    }
}

fn compile(pattern: &str, option: &str) -> Result<Option<Regex>> {
    if pattern.is_empty() {
        return Ok(None);
    }

    Regex::new(pattern)
        .map(Some)
        .into_app_err_with(|| format!("invalid {option} pattern '{pattern}'"))
}

fn first_capture<'h>(regex: Option<&Regex>, haystack: &'h str) -> Option<&'h str> {
    regex?.captures(haystack)?.get(1).map(|m| m.as_str())
}

/// One row per label x assignee of `issue`.
#[must_use]
pub fn issue_rows(issue: &model::Issue, options: &RowOptions) -> Vec<IssueRecord> {
    let body = issue.body.as_deref().unwrap_or_default();

    let mut closed_at = issue.closed_at.unwrap_or_else(still_open);
    if let Some(text) = first_capture(options.close_regex.as_ref(), body) {
        match parse_timestamp(text) {
            Some(t) => closed_at = t,
            None => log::warn!(target: LOG_TARGET, "Ignoring unparseable close time '{text}' in issue #{}", issue.number),
        }
    }

    let creator = first_capture(options.creator_regex.as_ref(), body).unwrap_or(&issue.user.login);
    let issue_type = issue.issue_type.as_ref().and_then(|t| t.name.clone());

    let labels: Vec<Option<&str>> = if issue.labels.is_empty() {
        vec![None]
    } else {
        issue.labels.iter().map(|l| Some(l.name.as_str())).collect()
    };
    let assignees: Vec<Option<&str>> = if issue.assignees.is_empty() {
        vec![None]
    } else {
        issue.assignees.iter().map(|a| Some(a.login.as_str())).collect()
    };

    let mut rows = Vec::with_capacity(labels.len() * assignees.len());
    for label in &labels {
        for assignee in &assignees {
            rows.push(IssueRecord {
                issue: issue.number,
                opened_at: issue.created_at,
                closed_at,
                creator: creator.to_string(),
                issue_type: issue_type.clone(),
                label: label.map(str::to_string),
                assignee: assignee.map(str::to_string),
            });
        }
    }

    rows
}

/// Label colors, skipping labels whose color is missing or malformed.
#[must_use]
pub fn label_colors(labels: &[model::Label]) -> Vec<LabelColor> {
    labels
        .iter()
        .filter_map(|label| {
            let raw = label.color.as_deref().unwrap_or_default();
            match raw.parse() {
                Ok(color) => Some(LabelColor {
                    label: label.name.clone(),
                    color,
                }),
                Err(e) => {
                    log::warn!(target: LOG_TARGET, "Skipping label '{}': {e}", label.name);
                    None
                }
            }
        })
        .collect()
}

/// Milestone due dates.
///
/// A milestone that was never reopened (`closed_at == created_at`) uses its
/// planned `due_on`; otherwise the actual close time is the due date.
#[must_use]
pub fn milestones(milestones: &[model::Milestone]) -> Vec<Milestone> {
    milestones
        .iter()
        .map(|m| {
            let due = match m.due_on {
                Some(due_on) if m.closed_at == m.created_at => Some(due_on),
                _ => m.closed_at,
            };
            Milestone { title: m.title.clone(), due }
        })
        .collect()
}
