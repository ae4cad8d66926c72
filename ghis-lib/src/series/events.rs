use super::{CrossFilters, Predicate};
use crate::dataset::{IssueLifetime, IssueRecord};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashSet};

/// A signed step in a running count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitEvent {
    pub time: DateTime<Utc>,

    /// +1 or -1 for a real event, 0 for an anchor that only contributes its timestamp.
    pub delta: i8,
}

impl UnitEvent {
    #[must_use]
    pub const fn new(time: DateTime<Utc>, delta: i8) -> Self {
        Self { time, delta }
    }

    /// The same timestamp with no effect on the count.
    #[must_use]
    pub const fn anchor(self) -> Self {
        Self { time: self.time, delta: 0 }
    }
}

/// Which issue transitions are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventOptions {
    pub include_open: bool,
    pub include_closed: bool,
}

impl EventOptions {
    /// Count currently-open issues: +1 on open, -1 on close.
    pub const OPEN_ISSUES: Self = Self {
        include_open: true,
        include_closed: true,
    };

    /// Weight of the open event, and of the close event if one is emitted.
    ///
    /// | open | closed | open weight | close weight |
    /// |------|--------|-------------|--------------|
    /// | yes  | yes    | +1          | -1           |
    /// | yes  | no     | +1          | none         |
    /// | no   | yes    | 0           | +1           |
    /// | no   | no     | 0           | 0            |
    #[must_use]
    pub const fn weights(self) -> (i8, Option<i8>) {
        match (self.include_open, self.include_closed) {
            (true, true) => (1, Some(-1)),
            (true, false) => (1, None),
            (false, true) => (0, Some(1)),
            (false, false) => (0, Some(0)),
        }
    }
}

/// Turn issue lifetimes into unsorted unit events.
///
/// A close event is only emitted for issues closed before `cutoff`.
#[must_use]
pub fn unit_events<'a>(lifetimes: impl IntoIterator<Item = &'a IssueLifetime>, options: EventOptions, cutoff: DateTime<Utc>) -> Vec<UnitEvent> {
    let (open_weight, close_weight) = options.weights();
    let lifetimes = lifetimes.into_iter();
    let mut events = Vec::with_capacity(lifetimes.size_hint().0 * 2);

    for lifetime in lifetimes {
        events.push(UnitEvent::new(lifetime.opened_at, open_weight));
        if let Some(weight) = close_weight
            && lifetime.closed_before(cutoff)
        {
            events.push(UnitEvent::new(lifetime.closed_at, weight));
        }
    }

    events
}

/// Extracts the unit events of any predicate under a fixed set of cross filters.
#[derive(Debug)]
pub struct EventExtractor<'a> {
    records: &'a [IssueRecord],
    admitted: Option<HashSet<IssueLifetime>>,
    options: EventOptions,
    cutoff: DateTime<Utc>,
}

impl<'a> EventExtractor<'a> {
    #[must_use]
    pub fn new(records: &'a [IssueRecord], filters: &CrossFilters, options: EventOptions, cutoff: DateTime<Utc>) -> Self {
        Self {
            records,
            admitted: filters.admitted(records),
            options,
            cutoff,
        }
    }

    #[must_use]
    pub const fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    /// Deduplicated lifetimes of the issues matching `predicate` and the cross filters.
    #[must_use]
    pub fn lifetimes(&self, predicate: &Predicate) -> BTreeSet<IssueLifetime> {
        self.records
            .iter()
            .filter(|r| predicate.matches(r))
            .map(IssueRecord::lifetime)
            .filter(|l| self.admitted.as_ref().is_none_or(|admitted| admitted.contains(l)))
            .collect()
    }

    #[must_use]
    pub fn extract(&self, predicate: &Predicate) -> Vec<UnitEvent> {
        unit_events(&self.lifetimes(predicate), self.options, self.cutoff)
    }
}
