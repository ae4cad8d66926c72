use super::common::{self, Stacked};
use super::{ChartData, chart_data};
use crate::Result;
use chrono::{DateTime, Local, Utc};
use core::fmt::Write;

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 28.0;
const MARGIN_BOTTOM: f64 = 40.0;

const X_TICKS: i64 = 6;
const Y_TICKS: i64 = 5;

pub fn generate<W: Write>(data: &ChartData, timestamp: DateTime<Local>, writer: &mut W) -> Result<()> {
    let title = html_escape(&data.title);

    writeln!(writer, "<!DOCTYPE html>")?;
    writeln!(writer, "<html>")?;
    writeln!(writer, "<head>")?;
    writeln!(writer, "  <meta charset=\"UTF-8\">")?;
    writeln!(writer, "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">")?;
    writeln!(writer, "  <title>{title}</title>")?;
    write_styles(writer)?;
    writeln!(writer, "</head>")?;
    writeln!(writer, "<body>")?;

    writeln!(writer, "  <div class=\"header\">")?;
    writeln!(writer, "    <h1>{title}</h1>")?;
    writeln!(
        writer,
        "    <p class=\"subtitle\">Produced by ghis {} on {}</p>",
        env!("CARGO_PKG_VERSION"),
        timestamp.format("%Y-%m-%d")
    )?;
    writeln!(writer, "  </div>")?;

    let stacked = Stacked::new(data);
    writeln!(writer, "  <div class=\"card\">")?;
    if stacked.axis.is_empty() {
        writeln!(writer, "    <p class=\"empty\">No issues match the current selection.</p>")?;
    } else {
        write_chart(writer, data, &stacked)?;
    }
    write_legend(writer, data)?;
    writeln!(writer, "  </div>")?;

    writeln!(writer, "</body>")?;
    writeln!(writer, "</html>")?;

    Ok(())
}

fn write_styles<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "  <style>")?;
    writeln!(writer, "    :root {{")?;
    writeln!(writer, "      --bg-color: #f0f2f5;")?;
    writeln!(writer, "      --card-bg: #ffffff;")?;
    writeln!(writer, "      --text-color: #1a202c;")?;
    writeln!(writer, "      --text-secondary: #64748b;")?;
    writeln!(writer, "      --border-color: #e2e8f0;")?;
    writeln!(writer, "      --shadow: 0 1px 3px rgba(0,0,0,0.08), 0 4px 16px rgba(0,0,0,0.04);")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "    @media (prefers-color-scheme: dark) {{")?;
    writeln!(writer, "      :root {{")?;
    writeln!(writer, "        --bg-color: #0f172a;")?;
    writeln!(writer, "        --card-bg: #1e293b;")?;
    writeln!(writer, "        --text-color: #e2e8f0;")?;
    writeln!(writer, "        --text-secondary: #94a3b8;")?;
    writeln!(writer, "        --border-color: #334155;")?;
    writeln!(writer, "        --shadow: 0 1px 3px rgba(0,0,0,0.3), 0 4px 16px rgba(0,0,0,0.2);")?;
    writeln!(writer, "      }}")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "    * {{ box-sizing: border-box; }}")?;
    writeln!(writer, "    body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; margin: 0; padding: 32px; background: var(--bg-color); color: var(--text-color); line-height: 1.5; }}")?;
    writeln!(writer, "    .header {{ margin-bottom: 24px; }}")?;
    writeln!(writer, "    h1 {{ margin: 0 0 2px 0; font-size: 26px; font-weight: 700; letter-spacing: -0.5px; }}")?;
    writeln!(writer, "    .subtitle {{ margin: 0; font-size: 13px; color: var(--text-secondary); }}")?;
    writeln!(writer, "    .card {{ background: var(--card-bg); border-radius: 12px; box-shadow: var(--shadow); border: 1px solid var(--border-color); padding: 20px; display: flex; gap: 24px; flex-wrap: wrap; }}")?;
    writeln!(writer, "    .chart {{ flex: 1 1 640px; max-width: 100%; height: auto; }}")?;
    writeln!(writer, "    .chart .axis {{ stroke: var(--border-color); stroke-width: 1; }}")?;
    writeln!(writer, "    .chart .grid {{ stroke: var(--border-color); stroke-width: 1; stroke-dasharray: 2 4; }}")?;
    writeln!(writer, "    .chart text {{ fill: var(--text-secondary); font-size: 11px; }}")?;
    writeln!(writer, "    .chart .layer {{ stroke: var(--card-bg); stroke-width: 0.5; }}")?;
    writeln!(writer, "    .chart .milestone {{ stroke: var(--text-color); stroke-width: 1; stroke-dasharray: 6 3; opacity: 0.6; }}")?;
    writeln!(writer, "    .chart .milestone-title {{ fill: var(--text-color); font-weight: 600; }}")?;
    writeln!(writer, "    .legend {{ list-style: none; margin: 0; padding: 0; font-size: 13px; min-width: 160px; }}")?;
    writeln!(writer, "    .legend li {{ display: flex; align-items: center; gap: 8px; padding: 2px 0; }}")?;
    writeln!(writer, "    .legend .swatch {{ width: 12px; height: 12px; border-radius: 3px; flex-shrink: 0; }}")?;
    writeln!(writer, "    .legend .count {{ margin-left: auto; color: var(--text-secondary); font-variant-numeric: tabular-nums; }}")?;
    writeln!(writer, "    .empty {{ color: var(--text-secondary); font-style: italic; }}")?;
    writeln!(writer, "  </style>")?;
    Ok(())
}

/// Maps timestamps and counts onto SVG coordinates.
#[derive(Debug, Clone, Copy)]
struct Plot {
    first: i64,
    last: i64,
    low: i64,
    high: i64,
}

impl Plot {
    fn new(stacked: &Stacked) -> Self {
        let first = stacked.axis.first().map_or(0, DateTime::timestamp);
        let last = stacked.axis.last().map_or(0, DateTime::timestamp);
        let (low, high) = stacked.range();
        Self {
            first,
            last,
            low,
            high: high.max(low + 1),
        }
    }

    const fn left() -> f64 {
        MARGIN_LEFT
    }

    const fn right() -> f64 {
        WIDTH - MARGIN_RIGHT
    }

    const fn top() -> f64 {
        MARGIN_TOP
    }

    const fn bottom() -> f64 {
        HEIGHT - MARGIN_BOTTOM
    }

    #[expect(clippy::cast_precision_loss, reason = "timestamps only need pixel precision")]
    fn x(&self, time: DateTime<Utc>) -> f64 {
        if self.last == self.first {
            return Self::left();
        }
        let fraction = (time.timestamp() - self.first) as f64 / (self.last - self.first) as f64;
        Self::left() + fraction * (Self::right() - Self::left())
    }

    #[expect(clippy::cast_precision_loss, reason = "counts only need pixel precision")]
    fn y(&self, value: i64) -> f64 {
        let fraction = (self.high - value) as f64 / (self.high - self.low) as f64;
        Self::top() + fraction * (Self::bottom() - Self::top())
    }
}

fn write_chart<W: Write>(writer: &mut W, data: &ChartData, stacked: &Stacked) -> Result<()> {
    let plot = Plot::new(stacked);

    writeln!(
        writer,
        "    <svg class=\"chart\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" xmlns=\"http://www.w3.org/2000/svg\" role=\"img\" aria-label=\"{}\">",
        html_escape(&data.title)
    )?;

    write_y_axis(writer, &plot)?;
    write_x_axis(writer, &plot)?;

    let zeros = vec![0; stacked.axis.len()];
    for (index, upper) in stacked.layers.iter().enumerate() {
        let lower = index.checked_sub(1).and_then(|i| stacked.layers.get(i)).unwrap_or(&zeros);
        let name = data.series.series().get(index).map_or("", chart_data::series_name);
        writeln!(
            writer,
            "      <path class=\"layer\" fill=\"{}\" d=\"{}\"><title>{}</title></path>",
            data.color_of(index),
            layer_path(&plot, &stacked.axis, upper, lower),
            html_escape(name)
        )?;
    }

    for (title, due) in common::visible_milestones(data, &stacked.axis) {
        let x = plot.x(due);
        writeln!(
            writer,
            "      <line class=\"milestone\" x1=\"{x:.1}\" y1=\"{:.1}\" x2=\"{x:.1}\" y2=\"{:.1}\"/>",
            Plot::top(),
            Plot::bottom()
        )?;
        writeln!(
            writer,
            "      <text class=\"milestone-title\" x=\"{:.1}\" y=\"{:.1}\">{}</text>",
            x + 3.0,
            Plot::top() - 8.0,
            html_escape(title)
        )?;
    }

    writeln!(writer, "    </svg>")?;
    Ok(())
}

/// Closed step-shaped outline between the `upper` and `lower` boundaries of one layer.
fn layer_path(plot: &Plot, axis: &[DateTime<Utc>], upper: &[i64], lower: &[i64]) -> String {
    let mut d = String::new();
    let (Some(&first_time), Some(&first_upper)) = (axis.first(), upper.first()) else {
        return d;
    };

    let _ = write!(d, "M{:.1},{:.1}", plot.x(first_time), plot.y(first_upper));
    for (time, value) in axis.iter().zip(upper).skip(1) {
        let _ = write!(d, " H{:.1} V{:.1}", plot.x(*time), plot.y(*value));
    }
    let _ = write!(d, " H{:.1}", Plot::right());

    let last_lower = lower.last().copied().unwrap_or(0);
    let _ = write!(d, " V{:.1}", plot.y(last_lower));
    for j in (1..axis.len()).rev() {
        let below = lower.get(j - 1).copied().unwrap_or(0);
        let _ = write!(d, " H{:.1} V{:.1}", plot.x(axis[j]), plot.y(below));
    }
    let _ = write!(d, " H{:.1} Z", plot.x(first_time));

    d
}

fn write_y_axis<W: Write>(writer: &mut W, plot: &Plot) -> Result<()> {
    let step = ((plot.high - plot.low) / Y_TICKS).max(1);
    let mut value = plot.low - plot.low.rem_euclid(step);
    while value <= plot.high {
        if value >= plot.low {
            let y = plot.y(value);
            let class = if value == 0 { "axis" } else { "grid" };
            writeln!(
                writer,
                "      <line class=\"{class}\" x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\"/>",
                Plot::left(),
                Plot::right()
            )?;
            writeln!(
                writer,
                "      <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\">{value}</text>",
                Plot::left() - 6.0,
                y + 4.0
            )?;
        }
        value += step;
    }
    Ok(())
}

fn write_x_axis<W: Write>(writer: &mut W, plot: &Plot) -> Result<()> {
    writeln!(
        writer,
        "      <line class=\"axis\" x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\"/>",
        Plot::left(),
        Plot::bottom(),
        Plot::right(),
        Plot::bottom()
    )?;

    let span = plot.last - plot.first;
    let ticks = if span == 0 { 0 } else { X_TICKS };
    let mut previous = None;
    for i in 0..=ticks {
        let Some(time) = DateTime::from_timestamp(plot.first + span * i / X_TICKS, 0) else {
            continue;
        };
        let label = common::format_date(time);
        if previous.as_ref() == Some(&label) {
            continue;
        }

        let anchor = match i {
            0 => "start",
            i if i == X_TICKS => "end",
            _ => "middle",
        };
        writeln!(
            writer,
            "      <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"{anchor}\">{label}</text>",
            plot.x(time),
            Plot::bottom() + 18.0
        )?;
        previous = Some(label);
    }

    Ok(())
}

fn write_legend<W: Write>(writer: &mut W, data: &ChartData) -> Result<()> {
    writeln!(writer, "    <ul class=\"legend\">")?;
    for (index, series) in data.series.series().iter().enumerate().rev() {
        writeln!(
            writer,
            "      <li><span class=\"swatch\" style=\"background: {}\"></span>{}<span class=\"count\">{}</span></li>",
            data.color_of(index),
            html_escape(chart_data::series_name(series)),
            series.final_count()
        )?;
    }
    writeln!(writer, "    </ul>")?;
    Ok(())
}

fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{IssueRecord, LabelColor, LabelColorMap, Milestone, RecordField, still_open};
    use crate::series::{CrossFilters, EventOptions, SeriesBuilder, Selector};
    use chrono::TimeZone;

    fn test_timestamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    fn t(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn row(issue: u64, opened: u32, closed: Option<u32>, label: &str) -> IssueRecord {
        IssueRecord {
            issue,
            opened_at: t(opened),
            closed_at: closed.map_or_else(still_open, t),
            creator: "octocat".to_string(),
            issue_type: None,
            label: Some(label.to_string()),
            assignee: None,
        }
    }

    fn chart(labels: &[&str]) -> ChartData {
        let records = [row(1, 1, Some(9), "bug"), row(2, 3, None, "<ui>"), row(3, 5, None, "bug")];
        let builder = SeriesBuilder::new(&records, &CrossFilters::new(), EventOptions::OPEN_ISSUES, still_open());
        let selectors: Vec<Selector> = labels.iter().map(|l| Selector::field(RecordField::Label, *l)).collect();
        let colors = [LabelColor {
            label: "bug".to_string(),
            color: "#d73a4a".parse().unwrap(),
        }];
        ChartData::new("Open issues & more", builder.build(&selectors), colors.into_iter().collect())
    }

    #[test]
    fn test_html_escape_all_special_chars() {
        assert_eq!(html_escape("<a href=\"x\">'&'</a>"), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn test_generate_document() {
        let mut output = String::new();
        generate(&chart(&["bug", "<ui>"]), test_timestamp(), &mut output).unwrap();

        assert!(output.starts_with("<!DOCTYPE html>"));
        assert!(output.contains("<title>Open issues &amp; more</title>"));
        assert!(output.contains("on 2024-01-15"));
        assert!(output.contains("<svg class=\"chart\""));
        assert_eq!(output.matches("class=\"layer\"").count(), 2);
        assert!(output.contains("fill=\"#d73a4a\""));
        assert!(output.contains("&lt;ui&gt;"));
        assert!(!output.contains("<ui>"));
        assert!(output.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_legend_lists_top_layer_first() {
        let mut output = String::new();
        generate(&chart(&["bug", "<ui>"]), test_timestamp(), &mut output).unwrap();

        let legend = &output[output.find("class=\"legend\"").unwrap()..];
        assert!(legend.find("&lt;ui&gt;").unwrap() < legend.find("bug").unwrap());
    }

    #[test]
    fn test_milestones_drawn_only_when_enabled() {
        let mut data = chart(&["bug"]);
        data.milestones = vec![Milestone { title: "v1.0".to_string(), due: Some(t(4)) }];

        let mut output = String::new();
        generate(&data, test_timestamp(), &mut output).unwrap();
        assert!(!output.contains("class=\"milestone\""));

        data.show_milestones = true;
        let mut output = String::new();
        generate(&data, test_timestamp(), &mut output).unwrap();
        assert!(output.contains("class=\"milestone\""));
        assert!(output.contains(">v1.0</text>"));
    }

    #[test]
    fn test_empty_chart() {
        let series = SeriesBuilder::new(&[], &CrossFilters::new(), EventOptions::OPEN_ISSUES, still_open()).build(&[]);
        let data = ChartData::new("Nothing", series, LabelColorMap::default());
        let mut output = String::new();
        generate(&data, test_timestamp(), &mut output).unwrap();

        assert!(output.contains("No issues match the current selection."));
        assert!(!output.contains("<svg class=\"chart\""));
        assert!(output.contains("All issues"));
    }

    #[test]
    fn test_layer_path_is_step_shaped() {
        let stacked = Stacked {
            axis: vec![t(1), t(3)],
            layers: vec![vec![1, 2]],
        };
        let plot = Plot::new(&stacked);
        let d = layer_path(&plot, &stacked.axis, &stacked.layers[0], &[0, 0]);

        let y1 = plot.y(1);
        let y2 = plot.y(2);
        let y0 = plot.y(0);
        assert_eq!(
            d,
            format!(
                "M{:.1},{y1:.1} H{:.1} V{y2:.1} H{:.1} V{y0:.1} H{:.1} V{y0:.1} H{:.1} Z",
                MARGIN_LEFT,
                WIDTH - MARGIN_RIGHT,
                WIDTH - MARGIN_RIGHT,
                WIDTH - MARGIN_RIGHT,
                MARGIN_LEFT
            )
        );
    }

    #[test]
    fn test_plot_maps_range_to_margins() {
        let stacked = Stacked {
            axis: vec![t(1), t(11)],
            layers: vec![vec![0, 4]],
        };
        let plot = Plot::new(&stacked);
        assert!((plot.x(t(1)) - MARGIN_LEFT).abs() < f64::EPSILON);
        assert!((plot.x(t(11)) - (WIDTH - MARGIN_RIGHT)).abs() < 1e-9);
        assert!((plot.y(4) - MARGIN_TOP).abs() < 1e-9);
        assert!((plot.y(0) - (HEIGHT - MARGIN_BOTTOM)).abs() < 1e-9);
    }
}
