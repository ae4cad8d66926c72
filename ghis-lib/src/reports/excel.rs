use super::{ChartData, chart_data, common};
use crate::Result;
use rust_xlsxwriter::{Color, DocProperties, Format, FormatAlign, Workbook, Worksheet};
use std::io::Write;

#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
pub fn generate<W: Write>(data: &ChartData, writer: &mut W) -> Result<()> {
    let mut workbook = Workbook::new();

    let properties = DocProperties::new().set_author("ghis").set_title(&data.title);
    workbook.set_properties(&properties);

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x00FE_D7AA))
        .set_align(FormatAlign::Left);

    let counts = workbook.add_worksheet().set_name("Counts")?;
    write_header(counts, &["time", "count", "label"], &header_format)?;

    let mut row = 1u32;
    for series in data.series.series() {
        let label = series.label().unwrap_or_default();
        for point in series.points() {
            counts.write_string(row, 0, common::format_time(point.time))?;
            #[expect(clippy::cast_precision_loss, reason = "Intentional conversion to f64 for Excel output")]
            counts.write_number(row, 1, point.count as f64)?;
            counts.write_string(row, 2, label)?;
            row += 1;
        }
    }
    counts.set_freeze_panes(1, 0)?;
    counts.autofit();

    let summary = workbook.add_worksheet().set_name("Series")?;
    write_header(summary, &["series", "color", "final", "peak"], &header_format)?;

    for (index, series) in data.series.series().iter().enumerate() {
        let color = data.color_of(index);
        let swatch = Format::new().set_background_color(Color::RGB(
            (u32::from(color.0.red) << 16) | (u32::from(color.0.green) << 8) | u32::from(color.0.blue),
        ));

        #[expect(clippy::cast_possible_truncation, reason = "Series count is far below Excel's row limit")]
        let row = index as u32 + 1;
        summary.write_string(row, 0, chart_data::series_name(series))?;
        summary.write_string_with_format(row, 1, color.to_string(), &swatch)?;
        #[expect(clippy::cast_precision_loss, reason = "Intentional conversion to f64 for Excel output")]
        summary.write_number(row, 2, series.final_count() as f64)?;
        #[expect(clippy::cast_precision_loss, reason = "Intentional conversion to f64 for Excel output")]
        summary.write_number(row, 3, series.peak() as f64)?;
    }
    summary.autofit();

    let data_bytes = workbook.save_to_buffer()?;
    writer.write_all(&data_bytes)?;

    Ok(())
}

#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
fn write_header(worksheet: &mut Worksheet, titles: &[&str], format: &Format) -> Result<()> {
    for (col, title) in (0u16..).zip(titles) {
        worksheet.write_string_with_format(0, col, *title, format)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{IssueRecord, LabelColorMap, still_open};
    use crate::series::{CrossFilters, EventOptions, SeriesBuilder};
    use chrono::{TimeZone, Utc};
    use std::io::Cursor;

    #[test]
    fn test_generate_produces_workbook() {
        let records = [IssueRecord {
            issue: 1,
            opened_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            closed_at: still_open(),
            creator: "octocat".to_string(),
            issue_type: None,
            label: None,
            assignee: None,
        }];
        let series = SeriesBuilder::new(&records, &CrossFilters::new(), EventOptions::OPEN_ISSUES, still_open()).build(&[]);
        let data = ChartData::new("Open issues", series, LabelColorMap::default());

        let mut output = Cursor::new(Vec::new());
        generate(&data, &mut output).unwrap();

        let bytes = output.into_inner();
        assert!(bytes.len() > 1000, "Excel output should be substantial");
        assert_eq!(&bytes[0..2], b"PK", "Excel file should be a valid ZIP archive");
    }
}
