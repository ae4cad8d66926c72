//! Integration tests for the `chart` command.
//!
//! Each test writes a small issue table set into a temporary directory and runs
//! the command end to end through `ghis_lib::run`.

use camino::{Utf8Path, Utf8PathBuf};
use ghis_lib::Host;
use std::fs;

/// Test host that captures output to in-memory buffers.
struct TestHost {
    output_buf: Vec<u8>,
    error_buf: Vec<u8>,
}

impl TestHost {
    const fn new() -> Self {
        Self {
            output_buf: Vec::new(),
            error_buf: Vec::new(),
        }
    }

    fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl std::io::Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl std::io::Write {
        &mut self.error_buf
    }

    fn exit(&mut self, _code: i32) {}
}

const ISSUES: &str = "\
issue,time,closed,creator,type,label,assignee
1,2024-01-01T00:00:00Z,2024-01-10T00:00:00Z,alice,Bug,bug,
2,2024-01-05T00:00:00Z,2222-01-01T00:00:00Z,bob,Feature,enhancement,carol
2,2024-01-05T00:00:00Z,2222-01-01T00:00:00Z,bob,Feature,a:ui,carol
3,2024-01-10T00:00:00Z,2024-01-10T00:00:00Z,alice,Bug,bug,
";

const LABELS: &str = "\
label,color
bug,#d73a4a
enhancement,#a2eeef
a:ui,#00ff00
";

const MILESTONES: &str = "\
milestone,due
v1,2024-01-07T00:00:00Z
someday,
";

/// A data directory with the three tables plus an empty configuration file.
struct Fixture {
    _tmp: tempfile::TempDir,
    root: Utf8PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();

        let data = root.join("data");
        fs::create_dir(&data).unwrap();
        fs::write(data.join("issues.csv"), ISSUES).unwrap();
        fs::write(data.join("labels.csv"), LABELS).unwrap();
        fs::write(data.join("milestones.csv"), MILESTONES).unwrap();
        fs::write(root.join("ghis.toml"), "").unwrap();

        Self { _tmp: tmp, root }
    }

    fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    async fn chart(&self, extra: &[&str]) -> (TestHost, ghis_lib::Result<()>) {
        let data_dir = self.path("data");
        let config = self.path("ghis.toml");
        let mut args = vec!["ghis", "chart", "--data-dir", data_dir.as_str(), "--config", config.as_str(), "--color", "never"];
        args.extend_from_slice(extra);

        let mut host = TestHost::new();
        let result = ghis_lib::run(&mut host, args).await;
        (host, result)
    }

    async fn chart_csv(&self, extra: &[&str]) -> String {
        let out = self.path("out.csv");
        let mut args = vec!["--csv", out.as_str()];
        args.extend_from_slice(extra);

        let (host, result) = self.chart(&args).await;
        result.unwrap();
        assert!(host.output_buf.is_empty(), "console output is off when a file report is requested");
        read(&out)
    }
}

fn read(path: &Utf8Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
async fn test_total_series_counts_every_event() {
    let fixture = Fixture::new();
    let csv = fixture.chart_csv(&["--total"]).await;

    assert_eq!(
        csv,
        "time,count,label\n\
         2024-01-01T00:00:00Z,1,\n\
         2024-01-05T00:00:00Z,2,\n\
         2024-01-10T00:00:00Z,3,\n\
         2024-01-10T00:00:00Z,2,\n\
         2024-01-10T00:00:00Z,1,\n"
    );
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
async fn test_console_summary_by_type() {
    let fixture = Fixture::new();
    let (host, result) = fixture
        .chart(&["--by", "type", "--category", "Bug", "--category", "Feature"])
        .await;
    result.unwrap();

    let output = host.output_str();
    assert!(output.starts_with("Open issues by type\n2024-01-01 to 2024-01-10\n"), "{output}");
    assert!(output.contains("  Feature : 1 now, 1 at peak\n"), "{output}");
    assert!(output.contains("  Bug     : 0 now, 1 at peak\n"), "{output}");
    assert!(output.contains("Top creators\n  alice : 2\n  bob   : 1\n"), "{output}");
    assert!(output.contains("Label filters\n  other : a:ui bug enhancement\n"), "{output}");
    assert!(!output.contains("Milestones"), "milestones are off by default");
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
async fn test_categories_from_configuration() {
    let fixture = Fixture::new();
    fs::write(
        fixture.path("ghis.toml"),
        "category_field = \"label\"\ncategories = [\"bug\", \"enhancement\"]\nselected_categories = [\"bug\", \"enhancement\"]\nlabel_filter_prefixes = [\"a:\"]\nshow_milestones = true\n",
    )
    .unwrap();

    let (host, result) = fixture.chart(&[]).await;
    result.unwrap();

    let output = host.output_str();
    assert!(output.starts_with("Open issues by label\n"), "{output}");
    assert!(output.contains("  enhancement : 1 now, 1 at peak\n"), "{output}");
    assert!(output.contains("  bug         : 0 now, 1 at peak\n"), "{output}");
    assert!(output.contains("Milestones\n  2024-01-07  v1\n"), "{output}");
    assert!(output.contains("  a:    : a:ui\n  other : bug enhancement\n"), "{output}");
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
async fn test_creator_filter_applies_to_every_category() {
    let fixture = Fixture::new();
    let csv = fixture
        .chart_csv(&["--by", "label", "--category", "bug", "--category", "enhancement", "--creator", "bob"])
        .await;

    assert_eq!(
        csv,
        "time,count,label\n\
         2024-01-05T00:00:00Z,0,bug\n\
         2024-01-05T00:00:00Z,1,enhancement\n"
    );
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
async fn test_label_filter_group() {
    let fixture = Fixture::new();
    let csv = fixture.chart_csv(&["--total", "--label-filter", "a:ui, nonexistent"]).await;

    assert_eq!(csv, "time,count,label\n2024-01-05T00:00:00Z,1,\n");
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
async fn test_label_filter_groups_are_combined() {
    let fixture = Fixture::new();
    let csv = fixture
        .chart_csv(&["--total", "--label-filter", "bug,a:ui", "--label-filter", "enhancement"])
        .await;

    assert_eq!(csv, "time,count,label\n2024-01-05T00:00:00Z,1,\n");
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
async fn test_counting_closings_only() {
    let fixture = Fixture::new();
    let csv = fixture.chart_csv(&["--total", "--include", "closed"]).await;

    assert_eq!(csv.lines().last(), Some("2024-01-10T00:00:00Z,2,"));
    assert!(csv.lines().skip(1).all(|line| !line.contains(",-")), "closings only ever add");
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
async fn test_counting_nothing() {
    let fixture = Fixture::new();
    let csv = fixture.chart_csv(&["--total", "--include"]).await;

    assert!(csv.lines().skip(1).all(|line| line.ends_with(",0,")), "{csv}");
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
async fn test_cutoff_treats_later_closings_as_open() {
    let fixture = Fixture::new();
    let csv = fixture.chart_csv(&["--total", "--cutoff", "2024-01-10T00:00:00Z"]).await;

    assert_eq!(
        csv,
        "time,count,label\n\
         2024-01-01T00:00:00Z,1,\n\
         2024-01-05T00:00:00Z,2,\n\
         2024-01-10T00:00:00Z,3,\n"
    );
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
async fn test_all_file_reports() {
    let fixture = Fixture::new();
    let html = fixture.path("chart.html");
    let json = fixture.path("chart.json");
    let excel = fixture.path("chart.xlsx");

    let (host, result) = fixture
        .chart(&[
            "--by",
            "label",
            "--category",
            "bug",
            "--category",
            "enhancement",
            "--milestones",
            "true",
            "--title",
            "Demo",
            "--html",
            html.as_str(),
            "--json",
            json.as_str(),
            "--excel",
            excel.as_str(),
            "--console",
        ])
        .await;
    result.unwrap();

    assert!(host.output_str().starts_with("Demo\n"));

    let html = read(&html);
    assert!(html.contains("<title>Demo</title>"));
    assert!(html.contains("fill=\"#d73a4a\""));
    assert!(html.contains(">v1</text>"));

    let value: serde_json::Value = serde_json::from_str(&read(&json)).unwrap();
    assert_eq!(value["title"], "Demo");
    assert_eq!(value["series"][0]["label"], "bug");
    assert_eq!(value["series"][0]["color"], "#d73a4a");
    assert_eq!(value["series"][1]["label"], "enhancement");
    assert_eq!(value["milestones"][0]["title"], "v1");

    let bytes = fs::read(&excel).unwrap();
    assert_eq!(&bytes[0..2], b"PK");
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
async fn test_missing_data_dir_fails() {
    let fixture = Fixture::new();
    fs::remove_file(fixture.path("data").join("issues.csv")).unwrap();

    let (_host, result) = fixture.chart(&["--total"]).await;
    let err = result.unwrap_err();
    assert!(err.to_string().contains("issues.csv"), "{err}");
}
