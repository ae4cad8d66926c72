use crate::dataset::{Color, LabelColorMap, LabelGroup, Milestone};
use crate::series::{CountSeries, SeriesSet};

/// Name shown for the single series of an uncategorized chart.
pub const TOTAL_SERIES_NAME: &str = "All issues";

/// Everything a report needs to render one chart.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub title: String,
    pub series: SeriesSet,
    pub label_colors: LabelColorMap,
    pub milestones: Vec<Milestone>,
    pub show_milestones: bool,
    pub top_creators: Vec<(String, usize)>,
    pub label_groups: Vec<LabelGroup>,
}

impl ChartData {
    #[must_use]
    pub fn new(title: impl Into<String>, series: SeriesSet, label_colors: LabelColorMap) -> Self {
        Self {
            title: title.into(),
            series,
            label_colors,
            milestones: Vec::new(),
            show_milestones: false,
            top_creators: Vec::new(),
            label_groups: Vec::new(),
        }
    }

    /// Color of the series at `index`.
    #[must_use]
    pub fn color_of(&self, index: usize) -> Color {
        let label = self.series.series().get(index).and_then(CountSeries::label);
        self.label_colors.color_or_fallback(label, index)
    }
}

/// Display name of a series.
#[must_use]
pub fn series_name(series: &CountSeries) -> &str {
    series.label().unwrap_or(TOTAL_SERIES_NAME)
}
