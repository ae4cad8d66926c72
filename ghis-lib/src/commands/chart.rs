use super::Host;
use super::common::{ColorMode, LogLevel, init_logging};
use super::config::{CategoryField, Config};
use crate::Result;
use crate::dataset::{Dataset, RecordField, parse_timestamp, partition_labels, still_open};
use crate::reports::{ChartData, generate_console, generate_csv, generate_html, generate_json, generate_xlsx};
use crate::series::{CrossFilters, EventOptions, SeriesBuilder, Selector};
use camino::Utf8PathBuf;
use chrono::{DateTime, Local, Utc};
use clap::{Parser, ValueEnum};
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;

const LOG_TARGET: &str = "     chart";

/// Issue transition that can be counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transition {
    /// Issue openings
    Open,

    /// Issue closings
    Closed,
}

#[derive(Parser, Debug)]
pub struct ChartArgs {
    /// Directory holding issues.csv, labels.csv and milestones.csv (default from configuration)
    #[arg(long, value_name = "PATH")]
    pub data_dir: Option<Utf8PathBuf>,

    /// Path to configuration file (default is `ghis.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Attribute that splits issues into stacked series (default from configuration)
    #[arg(long, value_name = "FIELD")]
    pub by: Option<CategoryField>,

    /// Category to chart, bottom of the stack first; repeat for more
    #[arg(long = "category", value_name = "NAME", conflicts_with = "total")]
    pub categories: Vec<String>,

    /// Chart a single series of all matching issues
    #[arg(long)]
    pub total: bool,

    /// Only count issues opened by this user; repeat for more
    #[arg(long = "creator", value_name = "LOGIN")]
    pub creators: Vec<String>,

    /// Only count issues carrying one of these comma-separated labels; each occurrence adds a group that must also match
    #[arg(long = "label-filter", value_name = "LABELS")]
    pub label_filters: Vec<String>,

    /// Transitions to count, comma-separated; give the option without a value to count none
    #[arg(long, value_name = "TRANSITIONS", value_delimiter = ',', num_args = 0..=1)]
    pub include: Option<Vec<Transition>>,

    /// Draw milestone due dates (default from configuration)
    #[arg(long, value_name = "BOOL")]
    pub milestones: Option<bool>,

    /// Issues closed at or after this instant count as still open
    #[arg(long, value_name = "RFC3339", value_parser = parse_cutoff)]
    pub cutoff: Option<DateTime<Utc>>,

    /// Chart title (default describes what is counted)
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,

    /// Output the chart to an Excel spreadsheet file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub excel: Option<Utf8PathBuf>,

    /// Output the chart to an HTML file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub html: Option<Utf8PathBuf>,

    /// Output the chart points to a CSV file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub csv: Option<Utf8PathBuf>,

    /// Output the chart points to a JSON file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub json: Option<Utf8PathBuf>,

    /// Output a summary to the console. If omitted, it is shown only when no other reports are generated.
    #[arg(long, help_heading = "Report Output")]
    pub console: bool,
}

fn parse_cutoff(value: &str) -> core::result::Result<DateTime<Utc>, String> {
    parse_timestamp(value).ok_or_else(|| format!("'{value}' is not an RFC 3339 timestamp"))
}

pub fn chart_issues<H: Host>(host: &mut H, args: &ChartArgs) -> Result<()> {
    init_logging(args.log_level);

    let config = Config::load(&Utf8PathBuf::from("."), args.config.as_ref())?;
    let data_dir = args.data_dir.as_ref().unwrap_or(&config.data_dir);
    let dataset = Dataset::load(data_dir)?;
    log::debug!(
        target: LOG_TARGET,
        "Types present: [{}], labels present: [{}]",
        dataset.types().join(", "),
        dataset.labels().join(", ")
    );

    let category_field = args.by.unwrap_or(config.category_field);
    let categories = chosen_categories(args, &config);
    warn_unknown(&dataset, category_field.record_field(), &categories, "category");

    let filters = cross_filters(&dataset, args);
    let options = args.include.as_ref().map_or_else(
        || config.event_options(),
        |transitions| EventOptions {
            include_open: transitions.contains(&Transition::Open),
            include_closed: transitions.contains(&Transition::Closed),
        },
    );
    let cutoff = args.cutoff.unwrap_or_else(still_open);

    let selectors: Vec<Selector> = categories
        .iter()
        .map(|category| Selector::field(category_field.record_field(), category.as_str()))
        .collect();

    if !filters.is_unrestricted() {
        log::debug!(target: LOG_TARGET, "Cross filters restrict the counted issues");
    }

    let builder = SeriesBuilder::new(dataset.issues(), &filters, options, cutoff);
    let series = builder.build(&selectors);
    log::info!(
        target: LOG_TARGET,
        "Built {} series over {} instant(s), counting closings before {}",
        series.len(),
        series.time_axis().len(),
        builder.cutoff()
    );
    if series.has_no_points() {
        log::warn!(target: LOG_TARGET, "No issue matches the current selection");
    }

    let title = args
        .title
        .clone()
        .unwrap_or_else(|| default_title(options, (!categories.is_empty()).then_some(category_field)));

    let mut data = ChartData::new(title, series, dataset.label_colors().clone());
    data.milestones = dataset.milestones().to_vec();
    data.show_milestones = args.milestones.unwrap_or(config.show_milestones);
    data.top_creators = dataset
        .top_creators(config.top_creator_count)
        .into_iter()
        .map(|(creator, count)| (creator.to_string(), count))
        .collect();
    data.label_groups = partition_labels(known_labels(&dataset).iter().copied(), &config.label_filter_prefixes);

    write_reports(host, args, &data)
}

/// Categories from the command line, else the configured selection. Empty means one total series.
fn chosen_categories(args: &ChartArgs, config: &Config) -> Vec<String> {
    if args.total {
        Vec::new()
    } else if args.categories.is_empty() {
        config.selected_categories.clone()
    } else {
        args.categories.clone()
    }
}

fn cross_filters(dataset: &Dataset, args: &ChartArgs) -> CrossFilters {
    let mut filters = CrossFilters::new();

    if !args.creators.is_empty() {
        warn_unknown(dataset, RecordField::Creator, &args.creators, "creator");
        filters = filters.with_creators(args.creators.iter().map(String::as_str));
    }

    let known = known_labels(dataset);
    for group in &args.label_filters {
        let labels: Vec<&str> = group.split(',').map(str::trim).filter(|l| !l.is_empty()).collect();
        for label in labels.iter().filter(|l| !known.contains(*l)) {
            log::warn!(target: LOG_TARGET, "Label filter '{label}' matches no known label");
        }
        filters = filters.with_label_group(labels);
    }

    filters
}

/// Labels from the label table and from issue rows.
fn known_labels(dataset: &Dataset) -> BTreeSet<&str> {
    dataset
        .label_colors()
        .names()
        .into_iter()
        .chain(dataset.labels())
        .collect()
}

fn warn_unknown(dataset: &Dataset, field: RecordField, values: &[String], what: &str) {
    let present = dataset.distinct_values(field);
    for value in values.iter().filter(|v| !present.contains(&v.as_str())) {
        log::warn!(target: LOG_TARGET, "No issue has {field} '{value}', the {what} will chart as empty");
    }
}

fn default_title(options: EventOptions, category_field: Option<CategoryField>) -> String {
    let counted = match (options.include_open, options.include_closed) {
        (true, true) => "Open issues",
        (true, false) => "Opened issues",
        (false, true) => "Closed issues",
        (false, false) => "Issues",
    };

    match category_field {
        Some(field) => format!("{counted} by {field}"),
        None => counted.to_string(),
    }
}

fn write_reports<H: Host>(host: &mut H, args: &ChartArgs, data: &ChartData) -> Result<()> {
    let generating_reports = args.html.is_some() || args.excel.is_some() || args.csv.is_some() || args.json.is_some();

    if args.console || !generating_reports {
        let mut console_output = String::new();
        let use_colors = args.color.use_colors(&std::io::stdout());
        generate_console(data, use_colors, &mut console_output)?;
        let _ = write!(host.output(), "{console_output}");
    }

    if let Some(filename) = &args.html {
        let mut html = String::new();
        generate_html(data, Local::now(), &mut html)?;
        fs::write(filename, html)?;
    }

    if let Some(filename) = &args.excel {
        let mut file = fs::File::create(filename)?;
        generate_xlsx(data, &mut file)?;
    }

    if let Some(filename) = &args.csv {
        let mut csv_output = String::new();
        generate_csv(data, &mut csv_output)?;
        fs::write(filename, csv_output)?;
    }

    if let Some(filename) = &args.json {
        let mut json_output = String::new();
        generate_json(data, &mut json_output)?;
        fs::write(filename, json_output)?;
    }

    Ok(())
}
