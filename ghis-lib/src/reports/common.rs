//! Common utilities shared across report generators.

use super::ChartData;
use chrono::{DateTime, Utc};

/// Cumulative layers of a stacked chart.
///
/// `layers[i][j]` is the sum of the counts of series `0..=i` at `axis[j]`, taken
/// once every event at that instant has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stacked {
    pub axis: Vec<DateTime<Utc>>,
    pub layers: Vec<Vec<i64>>,
}

impl Stacked {
    pub fn new(data: &ChartData) -> Self {
        let axis = data.series.time_axis();
        let mut layers: Vec<Vec<i64>> = Vec::with_capacity(data.series.len());

        for series in data.series.series() {
            let below = layers.last();
            let layer = axis
                .iter()
                .enumerate()
                .map(|(j, &time)| below.and_then(|b| b.get(j)).copied().unwrap_or(0) + series.count_at(time))
                .collect();
            layers.push(layer);
        }

        Self { axis, layers }
    }

    /// Lowest and highest stacked value, always spanning zero.
    pub fn range(&self) -> (i64, i64) {
        let values = self.layers.iter().flatten().copied();
        let low = values.clone().min().unwrap_or(0).min(0);
        let high = values.max().unwrap_or(0).max(0);
        (low, high)
    }
}

/// Milestones to draw: due dates inside the time axis, when milestones are enabled.
pub fn visible_milestones<'a>(data: &'a ChartData, axis: &[DateTime<Utc>]) -> Vec<(&'a str, DateTime<Utc>)> {
    let (Some(&first), Some(&last)) = (axis.first(), axis.last()) else {
        return Vec::new();
    };
    if !data.show_milestones {
        return Vec::new();
    }

    let mut visible: Vec<(&str, DateTime<Utc>)> = data
        .milestones
        .iter()
        .filter_map(|m| m.due.map(|due| (m.title.as_str(), due)))
        .filter(|(_, due)| (first..=last).contains(due))
        .collect();
    visible.sort_by_key(|&(_, due)| due);
    visible
}

/// Timestamp as written to CSV, JSON and Excel.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Date as shown on axes and in the console.
pub fn format_date(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d").to_string()
}
