use crate::dataset::{IssueLifetime, IssueRecord, RecordField};
use std::collections::HashSet;

/// Constraints applied uniformly to every series of a chart.
///
/// Each group is a list of accepted values for one field. An issue passes a
/// group when any of its rows carries one of the values, so an issue labeled
/// both `bug` and `ui` passes a `ui` group even when it is counted in the
/// `bug` series. Groups are combined with AND; an empty group is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossFilters {
    groups: Vec<(RecordField, Vec<String>)>,
}

impl CrossFilters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep issues opened by one of `creators`.
    #[must_use]
    pub fn with_creators(mut self, creators: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.groups.push((RecordField::Creator, creators.into_iter().map(Into::into).collect()));
        self
    }

    /// Keep issues carrying at least one of `labels`.
    #[must_use]
    pub fn with_label_group(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.groups.push((RecordField::Label, labels.into_iter().map(Into::into).collect()));
        self
    }

    /// Whether no group restricts anything.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.groups.iter().all(|(_, values)| values.is_empty())
    }

    /// Issue lifetimes passing every non-empty group, or `None` when nothing is filtered.
    #[must_use]
    pub fn admitted(&self, records: &[IssueRecord]) -> Option<HashSet<IssueLifetime>> {
        let mut admitted: Option<HashSet<IssueLifetime>> = None;

        for (field, values) in &self.groups {
            if values.is_empty() {
                continue;
            }

            let passing: HashSet<IssueLifetime> = records
                .iter()
                .filter(|r| r.field(*field).is_some_and(|v| values.iter().any(|accepted| accepted == v)))
                .map(IssueRecord::lifetime)
                .collect();

            admitted = Some(match admitted {
                Some(previous) => previous.intersection(&passing).copied().collect(),
                None => passing,
            });
        }

        admitted
    }
}
