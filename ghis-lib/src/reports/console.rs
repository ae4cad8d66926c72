use super::{ChartData, chart_data, common};
use crate::Result;
use core::fmt::Write;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

pub fn generate<W: Write>(data: &ChartData, use_colors: bool, writer: &mut W) -> Result<()> {
    if use_colors {
        writeln!(writer, "{}", data.title.bold())?;
    } else {
        writeln!(writer, "{}", data.title)?;
    }

    let axis = data.series.time_axis();
    match (axis.first(), axis.last()) {
        (Some(&first), Some(&last)) => writeln!(writer, "{} to {}", common::format_date(first), common::format_date(last))?,
        _ => writeln!(writer, "No issues match the current selection")?,
    }

    write_series(writer, data, use_colors)?;

    let milestones = common::visible_milestones(data, &axis);
    if !milestones.is_empty() {
        write_heading(writer, "Milestones", use_colors)?;
        for (title, due) in milestones {
            writeln!(writer, "  {}  {title}", common::format_date(due))?;
        }
    }

    if !data.top_creators.is_empty() {
        write_heading(writer, "Top creators", use_colors)?;
        let max_name_len = data.top_creators.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        for (name, count) in &data.top_creators {
            writeln!(writer, "  {name:<max_name_len$} : {count}")?;
        }
    }

    if !data.label_groups.is_empty() {
        write_heading(writer, "Label filters", use_colors)?;
        let max_name_len = data.label_groups.iter().map(|g| g.name.len()).max().unwrap_or(0);
        let term_width = get_terminal_width();
        // "  " + group name + " : "
        let value_indent = 2 + max_name_len + 3;

        for group in &data.label_groups {
            let wrapped_lines = wrap_text(&group.labels.join(" "), term_width, value_indent);
            if let Some(first_line) = wrapped_lines.first() {
                writeln!(writer, "  {:<width$} : {first_line}", group.name, width = max_name_len)?;
                for line in wrapped_lines.iter().skip(1) {
                    writeln!(writer, "{line}")?;
                }
            }
        }
    }

    Ok(())
}

fn write_series<W: Write>(writer: &mut W, data: &ChartData, use_colors: bool) -> Result<()> {
    write_heading(writer, "Series", use_colors)?;

    let series = data.series.series();
    let max_name_len = series.iter().map(|s| chart_data::series_name(s).len()).max().unwrap_or(0);

    // top of the stack first, matching the chart legend
    for (index, s) in series.iter().enumerate().rev() {
        let name = chart_data::series_name(s);
        if use_colors {
            let color = data.color_of(index).0;
            write!(writer, "  {} ", "■".truecolor(color.red, color.green, color.blue))?;
        } else {
            write!(writer, "  ")?;
        }
        writeln!(writer, "{name:<max_name_len$} : {} now, {} at peak", s.final_count(), s.peak())?;
    }

    Ok(())
}

fn write_heading<W: Write>(writer: &mut W, heading: &str, use_colors: bool) -> Result<()> {
    writeln!(writer)?;
    if use_colors {
        writeln!(writer, "{}", heading.bold())?;
    } else {
        writeln!(writer, "{heading}")?;
    }
    Ok(())
}

/// Get the terminal width, defaulting to 80 if not detectable
fn get_terminal_width() -> usize {
    terminal_size().map_or(80, |(Width(w), _)| w as usize)
}

/// Word-wrap text to fit within a given width, with indentation for continuation lines
fn wrap_text(text: &str, width: usize, indent: usize) -> Vec<String> {
    if width <= indent {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        let line_width = if lines.is_empty() { indent + current_line.len() } else { current_line.len() };
        let separator_len = usize::from(!current_line.is_empty());

        if !current_line.is_empty() && line_width + separator_len + word.len() > width {
            lines.push(core::mem::take(&mut current_line));
            current_line = format!("{:indent$}{word}", "");
        } else {
            if !current_line.is_empty() {
                current_line.push(' ');
            }
            current_line.push_str(word);
        }
    }

    if !current_line.is_empty() || lines.is_empty() {
        lines.push(current_line);
    }

    lines
}
