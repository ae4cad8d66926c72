use super::tables::{self, ISSUES_FILE, LABELS_FILE, MILESTONES_FILE};
use super::{IssueRecord, LabelColorMap, Milestone, RecordField};
use crate::Result;
use camino::Utf8Path;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

const LOG_TARGET: &str = "   dataset";

/// The immutable in-memory snapshot every chart is computed from.
///
/// Cloning is cheap; all tables are shared.
#[derive(Debug, Clone)]
pub struct Dataset {
    issues: Arc<[IssueRecord]>,
    label_colors: Arc<LabelColorMap>,
    milestones: Arc<[Milestone]>,
}

impl Dataset {
    #[must_use]
    pub fn new(issues: Vec<IssueRecord>, label_colors: LabelColorMap, milestones: Vec<Milestone>) -> Self {
        Self {
            issues: issues.into(),
            label_colors: Arc::new(label_colors),
            milestones: milestones.into(),
        }
    }

    /// Load `issues.csv`, `labels.csv` and `milestones.csv` from `dir`.
    pub fn load(dir: &Utf8Path) -> Result<Self> {
        let issues = tables::read_issues(&dir.join(ISSUES_FILE))?;
        let label_colors = tables::read_labels(&dir.join(LABELS_FILE))?.into_iter().collect();
        let milestones = tables::read_milestones(&dir.join(MILESTONES_FILE))?;

        let dataset = Self::new(issues, label_colors, milestones);
        log::info!(
            target: LOG_TARGET,
            "Loaded {} issue row(s) covering {} issue(s), {} label color(s), {} milestone(s) from '{dir}'",
            dataset.issues.len(),
            dataset.issue_count(),
            dataset.label_colors.len(),
            dataset.milestones.len()
        );

        Ok(dataset)
    }

    #[must_use]
    pub fn issues(&self) -> &[IssueRecord] {
        &self.issues
    }

    #[must_use]
    pub fn label_colors(&self) -> &LabelColorMap {
        &self.label_colors
    }

    #[must_use]
    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    /// Number of distinct issues, as opposed to rows.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.issues.iter().map(|r| r.issue).collect::<HashSet<_>>().len()
    }

    /// Distinct non-empty values of `field`, sorted.
    #[must_use]
    pub fn distinct_values(&self, field: RecordField) -> Vec<&str> {
        self.issues
            .iter()
            .filter_map(|r| r.field(field))
            .filter(|v| !v.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Labels carried by at least one issue.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.distinct_values(RecordField::Label)
    }

    /// Issue types carried by at least one issue.
    #[must_use]
    pub fn types(&self) -> Vec<&str> {
        self.distinct_values(RecordField::Type)
    }

    /// The `limit` creators with the most distinct issues, busiest first, ties by name.
    #[must_use]
    pub fn top_creators(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut issues_by_creator: HashMap<&str, HashSet<u64>> = HashMap::new();
        for record in &*self.issues {
            let _ = issues_by_creator.entry(record.creator.as_str()).or_default().insert(record.issue);
        }

        let mut ranked: Vec<(&str, usize)> = issues_by_creator.into_iter().map(|(creator, issues)| (creator, issues.len())).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }
}
