use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A milestone drawn as a vertical marker on the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    #[serde(rename = "milestone")]
    pub title: String,

    /// Closing time, or the due date for milestones that were never worked on.
    /// Milestones without a date are not drawn.
    pub due: Option<DateTime<Utc>>,
}
