use crate::dataset::{IssueRecord, RecordField};

/// A boolean test over a single issue row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Matches every row.
    Any,

    /// Matches rows whose `field` equals one of `values`.
    ///
    /// A row without a value for `field` compares as the empty string, so an
    /// unlabeled row belongs to the `""` category.
    OneOf { field: RecordField, values: Vec<String> },

    /// Matches rows satisfying every inner predicate.
    All(Vec<Self>),
}

impl Predicate {
    #[must_use]
    pub fn equals(field: RecordField, value: impl Into<String>) -> Self {
        Self::OneOf {
            field,
            values: vec![value.into()],
        }
    }

    #[must_use]
    pub fn matches(&self, record: &IssueRecord) -> bool {
        match self {
            Self::Any => true,
            Self::OneOf { field, values } => {
                let value = record.field(*field).unwrap_or("");
                values.iter().any(|v| v == value)
            }
            Self::All(predicates) => predicates.iter().all(|p| p.matches(record)),
        }
    }
}

/// A named predicate choosing the rows of one stacked series.
///
/// Whether the name refers to a label, an issue type or a creator is entirely
/// up to the predicate; the series machinery only sees the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    name: String,
    predicate: Predicate,
}

impl Selector {
    #[must_use]
    pub fn new(name: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            name: name.into(),
            predicate,
        }
    }

    /// A selector named `value` matching rows whose `field` equals `value`.
    #[must_use]
    pub fn field(field: RecordField, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            predicate: Predicate::equals(field, value.clone()),
            name: value,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::still_open;
    use chrono::{TimeZone, Utc};

    fn record(issue_type: Option<&str>, label: Option<&str>, creator: &str) -> IssueRecord {
        IssueRecord {
            issue: 1,
            opened_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            closed_at: still_open(),
            creator: creator.to_string(),
            issue_type: issue_type.map(str::to_string),
            label: label.map(str::to_string),
            assignee: None,
        }
    }

    #[test]
    fn test_any_matches_everything() {
        assert!(Predicate::Any.matches(&record(None, None, "x")));
    }

    #[test]
    fn test_equals_on_label() {
        let p = Predicate::equals(RecordField::Label, "bug");
        assert!(p.matches(&record(None, Some("bug"), "x")));
        assert!(!p.matches(&record(None, Some("enhancement"), "x")));
        assert!(!p.matches(&record(None, None, "x")));
    }

    #[test]
    fn test_missing_value_is_empty_category() {
        let p = Predicate::equals(RecordField::Type, "");
        assert!(p.matches(&record(None, Some("bug"), "x")));
        assert!(!p.matches(&record(Some("Bug"), None, "x")));
    }

    #[test]
    fn test_one_of() {
        let p = Predicate::OneOf {
            field: RecordField::Creator,
            values: vec!["alice".to_string(), "bob".to_string()],
        };
        assert!(p.matches(&record(None, None, "bob")));
        assert!(!p.matches(&record(None, None, "carol")));
    }

    #[test]
    fn test_all_is_conjunction() {
        let p = Predicate::All(vec![
            Predicate::equals(RecordField::Type, "Bug"),
            Predicate::equals(RecordField::Creator, "alice"),
        ]);
        assert!(p.matches(&record(Some("Bug"), None, "alice")));
        assert!(!p.matches(&record(Some("Bug"), None, "bob")));
        assert!(Predicate::All(Vec::new()).matches(&record(None, None, "bob")));
    }

    #[test]
    fn test_field_selector_is_named_after_value() {
        let s = Selector::field(RecordField::Type, "Feature");
        assert_eq!(s.name(), "Feature");
        assert_eq!(s.predicate(), &Predicate::equals(RecordField::Type, "Feature"));
    }
}
