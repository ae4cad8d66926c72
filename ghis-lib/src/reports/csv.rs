use super::{ChartData, common};
use crate::Result;
use core::fmt::Write;
use std::borrow::Cow;

/// One `time,count,label` row per point of every series, series in stacking order.
pub fn generate<W: Write>(data: &ChartData, writer: &mut W) -> Result<()> {
    writeln!(writer, "time,count,label")?;

    for series in data.series.series() {
        let label = escape_csv(series.label().unwrap_or_default());
        for point in series.points() {
            writeln!(writer, "{},{},{label}", common::format_time(point.time), point.count)?;
        }
    }

    Ok(())
}

/// Escape a value for RFC compliant CSV output.
///
/// Wraps the value in double quotes if it contains commas, newlines, or double quotes.
/// Internal double quotes are doubled per the RFC.
fn escape_csv(s: &str) -> Cow<'_, str> {
    if s.contains('"') {
        Cow::Owned(format!("\"{}\"", s.replace('"', "\"\"")))
    } else if s.contains(',') || s.contains('\n') || s.contains('\r') {
        Cow::Owned(format!("\"{s}\""))
    } else {
        Cow::Borrowed(s)
    }
}
