use super::{ChartData, common};
use crate::Result;
use core::fmt::Write;
use serde_json::json;

pub fn generate<W: Write>(data: &ChartData, writer: &mut W) -> Result<()> {
    let series: Vec<serde_json::Value> = data
        .series
        .series()
        .iter()
        .enumerate()
        .map(|(index, series)| {
            let points: Vec<serde_json::Value> = series
                .points()
                .iter()
                .map(|p| json!({ "time": common::format_time(p.time), "count": p.count }))
                .collect();

            json!({
                "label": series.label(),
                "color": data.color_of(index).to_string(),
                "points": points,
            })
        })
        .collect();

    let axis = data.series.time_axis();
    let milestones: Vec<serde_json::Value> = common::visible_milestones(data, &axis)
        .into_iter()
        .map(|(title, due)| json!({ "title": title, "due": common::format_time(due) }))
        .collect();

    let output = json!({
        "title": data.title,
        "series": series,
        "milestones": milestones,
    });

    write!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}
