use super::{CountSeries, CrossFilters, EventExtractor, EventOptions, Predicate, Selector, UnitEvent};
use crate::dataset::IssueRecord;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashSet};

const LOG_TARGET: &str = "    series";

/// Builds the stacked count series of a chart over one snapshot of the issue table.
///
/// The close cutoff is fixed when the builder is created, so every category of
/// every build agrees on which issues count as closed.
#[derive(Debug)]
pub struct SeriesBuilder<'a> {
    extractor: EventExtractor<'a>,
}

/// Event tables built so far, in category order, plus every real event seen so far.
#[derive(Debug, Default)]
struct Stack {
    tables: Vec<(String, Vec<UnitEvent>)>,
    accumulated: Vec<UnitEvent>,
}

impl Stack {
    /// Add a category on top of the stack.
    ///
    /// The new table inherits every timestamp used so far as an anchor, and
    /// every existing table gains the new category's timestamps as anchors, so
    /// all tables end up on a common time axis.
    fn push(self, name: String, own: Vec<UnitEvent>) -> Self {
        let own_anchors: Vec<UnitEvent> = own.iter().map(|e| e.anchor()).collect();

        let mut tables: Vec<(String, Vec<UnitEvent>)> = self
            .tables
            .into_iter()
            .map(|(label, mut events)| {
                events.extend_from_slice(&own_anchors);
                (label, events)
            })
            .collect();

        let mut table = own.clone();
        table.extend(self.accumulated.iter().map(|e| e.anchor()));
        tables.push((name, table));

        let mut accumulated = self.accumulated;
        accumulated.extend(own);

        Self { tables, accumulated }
    }

    fn into_series(self) -> SeriesSet {
        SeriesSet {
            series: self
                .tables
                .into_iter()
                .map(|(label, events)| CountSeries::accumulate(Some(label), events))
                .collect(),
        }
    }
}

impl<'a> SeriesBuilder<'a> {
    #[must_use]
    pub fn new(records: &'a [IssueRecord], filters: &CrossFilters, options: EventOptions, cutoff: DateTime<Utc>) -> Self {
        Self {
            extractor: EventExtractor::new(records, filters, options, cutoff),
        }
    }

    #[must_use]
    pub const fn cutoff(&self) -> DateTime<Utc> {
        self.extractor.cutoff()
    }

    /// One series per selector, in selector order.
    ///
    /// With no selectors, a single unlabeled series covers every issue passing
    /// the cross filters. A selector repeating an earlier name is skipped.
    #[must_use]
    pub fn build(&self, selectors: &[Selector]) -> SeriesSet {
        if selectors.is_empty() {
            let events = self.extractor.extract(&Predicate::Any);
            log::debug!(target: LOG_TARGET, "Built uncategorized series from {} event(s)", events.len());
            return SeriesSet {
                series: vec![CountSeries::accumulate(None, events)],
            };
        }

        let mut seen = HashSet::new();
        let mut stack = Stack::default();
        for selector in selectors {
            if !seen.insert(selector.name()) {
                log::debug!(target: LOG_TARGET, "Skipping repeated category '{}'", selector.name());
                continue;
            }

            let own = self.extractor.extract(selector.predicate());
            log::debug!(target: LOG_TARGET, "Category '{}' contributes {} event(s)", selector.name(), own.len());
            stack = stack.push(selector.name().to_string(), own);
        }

        stack.into_series()
    }
}

/// The ordered result of one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSet {
    series: Vec<CountSeries>,
}

impl SeriesSet {
    #[must_use]
    pub fn series(&self) -> &[CountSeries] {
        &self.series
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&CountSeries> {
        self.series.iter().find(|s| s.label() == Some(label))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Whether no series has a single point.
    #[must_use]
    pub fn has_no_points(&self) -> bool {
        self.series.iter().all(CountSeries::is_empty)
    }

    /// Every distinct timestamp of every series, ascending.
    #[must_use]
    pub fn time_axis(&self) -> Vec<DateTime<Utc>> {
        self.series
            .iter()
            .flat_map(CountSeries::times)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
