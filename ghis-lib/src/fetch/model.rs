//! The subset of GitHub's issue, label and milestone JSON that gets flattened into tables
//!
//! The same shapes are used by the REST API and by github-backup style exports.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub body: Option<String>,

    pub user: User,

    #[serde(default, rename = "type")]
    pub issue_type: Option<IssueType>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub labels: Vec<Label>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub assignees: Vec<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueType {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,

    /// Hex color without the leading `#`.
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Milestone {
    pub title: String,
    pub created_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub due_on: Option<DateTime<Utc>>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
