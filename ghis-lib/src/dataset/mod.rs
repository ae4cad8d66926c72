//! The tabular issue data every chart is computed from
//!
//! Issues are stored one row per issue x label x assignee, next to a label color
//! table and a milestone table. All three are plain CSV files produced by the
//! `fetch` command and loaded once into an immutable [`Dataset`].

#[expect(clippy::module_inception, reason = "the module is named after its main type")]
mod dataset;
mod issue_record;
mod label_colors;
mod label_groups;
mod milestone;
pub mod tables;

pub use dataset::Dataset;
pub use issue_record::{IssueLifetime, IssueRecord, RecordField, parse_timestamp, still_open};
pub use label_colors::{Color, LabelColor, LabelColorMap};
pub use label_groups::{LabelGroup, OTHER_GROUP, partition_labels};
pub use milestone::Milestone;
