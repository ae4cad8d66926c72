use super::UnitEvent;
use chrono::{DateTime, Utc};
use core::cmp::Ordering;
use serde::Serialize;

/// The running count right after one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountPoint {
    pub time: DateTime<Utc>,
    pub count: i64,
}

/// A cumulative count over time, one point per event.
///
/// Several points may share a timestamp; the last one holds the count once
/// every event at that instant has been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountSeries {
    label: Option<String>,
    points: Vec<CountPoint>,
}

/// Event order: by time, and at equal times increments before anchors before decrements.
fn event_order(a: &UnitEvent, b: &UnitEvent) -> Ordering {
    a.time.cmp(&b.time).then_with(|| b.delta.cmp(&a.delta))
}

impl CountSeries {
    /// Sort `events` and take their running sum.
    #[must_use]
    pub fn accumulate(label: Option<String>, mut events: Vec<UnitEvent>) -> Self {
        events.sort_by(event_order);

        let mut count = 0i64;
        let points = events
            .into_iter()
            .map(|event| {
                count += i64::from(event.delta);
                CountPoint { time: event.time, count }
            })
            .collect();

        Self { label, points }
    }

    /// The series name, `None` for the single series of an uncategorized chart.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[must_use]
    pub fn points(&self) -> &[CountPoint] {
        &self.points
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Count once every event up to and including `time` has been applied.
    #[must_use]
    pub fn count_at(&self, time: DateTime<Utc>) -> i64 {
        let after = self.points.partition_point(|p| p.time <= time);
        after.checked_sub(1).and_then(|i| self.points.get(i)).map_or(0, |p| p.count)
    }

    /// Smallest count observed at exactly `time`, `None` if no event happened then.
    #[must_use]
    pub fn min_count_at(&self, time: DateTime<Utc>) -> Option<i64> {
        self.points.iter().filter(|p| p.time == time).map(|p| p.count).min()
    }

    #[must_use]
    pub fn final_count(&self) -> i64 {
        self.points.last().map_or(0, |p| p.count)
    }

    /// Highest count reached once all events of an instant are applied.
    #[must_use]
    pub fn peak(&self) -> i64 {
        self.points
            .chunk_by(|a, b| a.time == b.time)
            .filter_map(<[CountPoint]>::last)
            .map(|p| p.count)
            .max()
            .unwrap_or(0)
    }

    pub fn times(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.points.iter().map(|p| p.time)
    }
}
