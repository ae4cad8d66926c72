//! Multi-format rendering of stacked issue-count charts
//!
//! Every generator consumes the same [`ChartData`]: a [`SeriesSet`](crate::series::SeriesSet)
//! in stacking order, plus the label colors, milestones and summary tables that
//! accompany it. Five formats are provided, each through a `generate` function:
//! - **Console**: title, date range and per-series summary, optionally colored
//! - **CSV**: one `time,count,label` row per point
//! - **HTML**: self-contained page with an inline SVG stacked area chart
//! - **Excel**: raw counts plus a per-series summary sheet
//! - **JSON**: machine-readable series and milestones
//!
//! Series are stacked in the order they appear in the set: the first one sits at
//! the bottom of the chart and is listed last in legends.

mod chart_data;
mod common;
mod console;
mod csv;
mod excel;
mod html;
mod json;

pub use chart_data::{ChartData, TOTAL_SERIES_NAME, series_name};
pub use console::generate as generate_console;
pub use csv::generate as generate_csv;
pub use excel::generate as generate_xlsx;
pub use html::generate as generate_html;
pub use json::generate as generate_json;
