use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Seconds since the epoch of `2222-01-01T00:00:00Z`.
const STILL_OPEN_SECS: i64 = 7_952_342_400;

/// The close time recorded for issues that have not been closed.
#[must_use]
pub fn still_open() -> DateTime<Utc> {
    DateTime::from_timestamp(STILL_OPEN_SECS, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a timestamp as written by GitHub or by Trac exports.
///
/// Values without an offset are taken as UTC.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{s}'")))
}

/// One exported row: an issue fanned out over a single label and a single assignee.
///
/// An issue with N labels and M assignees produces N x M rows sharing the same
/// `issue`, `opened_at` and `closed_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub issue: u64,

    #[serde(rename = "time", deserialize_with = "deserialize_timestamp")]
    pub opened_at: DateTime<Utc>,

    /// Close time, or [`still_open`] for open issues.
    #[serde(rename = "closed", deserialize_with = "deserialize_timestamp")]
    pub closed_at: DateTime<Utc>,

    pub creator: String,

    #[serde(rename = "type")]
    pub issue_type: Option<String>,

    pub label: Option<String>,

    pub assignee: Option<String>,
}

/// A record attribute that predicates and filters can inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecordField {
    Type,
    Label,
    Creator,
    Assignee,
}

/// The identity of an issue's lifetime, shared by all rows of the issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IssueLifetime {
    pub issue: u64,
    pub opened_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
}

impl IssueRecord {
    /// Value of `field` for this row, `None` when the row has no such value.
    #[must_use]
    pub fn field(&self, field: RecordField) -> Option<&str> {
        match field {
            RecordField::Type => self.issue_type.as_deref(),
            RecordField::Label => self.label.as_deref(),
            RecordField::Creator => Some(self.creator.as_str()),
            RecordField::Assignee => self.assignee.as_deref(),
        }
    }

    #[must_use]
    pub const fn lifetime(&self) -> IssueLifetime {
        IssueLifetime {
            issue: self.issue,
            opened_at: self.opened_at,
            closed_at: self.closed_at,
        }
    }
}

impl IssueLifetime {
    /// Whether the issue had been closed strictly before `cutoff`.
    #[must_use]
    pub fn closed_before(&self, cutoff: DateTime<Utc>) -> bool {
        self.closed_at < cutoff
    }
}
