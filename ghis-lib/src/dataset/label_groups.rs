use serde::Serialize;

/// Name of the group holding labels that match no prefix.
pub const OTHER_GROUP: &str = "other";

/// Labels offered together as one filter group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelGroup {
    pub name: String,
    pub labels: Vec<String>,
}

/// Split `labels` into one group per prefix, in prefix order, then a group of the rest.
///
/// A label goes to the first prefix it starts with. Groups that end up empty are dropped.
#[must_use]
pub fn partition_labels<'a>(labels: impl IntoIterator<Item = &'a str>, prefixes: &[String]) -> Vec<LabelGroup> {
    let mut groups: Vec<LabelGroup> = prefixes
        .iter()
        .map(|prefix| LabelGroup {
            name: prefix.clone(),
            labels: Vec::new(),
        })
        .collect();
    let mut other = LabelGroup {
        name: OTHER_GROUP.to_string(),
        labels: Vec::new(),
    };

    for label in labels {
        let target = prefixes
            .iter()
            .position(|prefix| label.starts_with(prefix.as_str()))
            .and_then(|index| groups.get_mut(index))
            .unwrap_or(&mut other);
        target.labels.push(label.to_string());
    }

    groups.push(other);
    groups.retain(|g| !g.labels.is_empty());
    groups
}
