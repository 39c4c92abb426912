use flate2::write::GzEncoder;
use flate2::Compression;
use log_analyzer::{
    AnalyzerConfig, AnalyzerError, EtlEngine, LocalStorage, LogAnalyzerPipeline, RunOutcome,
    UrlStat,
};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

const URL: &str =
    "/api/v2/group/7820986/statistic/sites/?date_type=day&date_from=2017-06-28&date_to=2017-06-28";

fn log_line(url: &str, request_time: &str) -> String {
    format!(
        r#"1.194.135.240 -  - [29/Jun/2017:04:08:35 +0300] "GET {} HTTP/1.1" 200 110 "-" "python-requests/2.13.0" "-" "1498698515-3979856266-4707-9836344" "8a7741a54297568b" {}"#,
        url, request_time
    )
}

struct Workspace {
    _temp_dir: TempDir,
    config: AnalyzerConfig,
}

impl Workspace {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("log")).unwrap();
        fs::write(
            root.join("report.html"),
            "<html><script>var table = $table_json;</script></html>",
        )
        .unwrap();

        let config = AnalyzerConfig {
            log_dir: root.join("log"),
            report_dir: root.join("reports"),
            report_template: root.join("report.html"),
            error_limit: 0.6,
            ..AnalyzerConfig::default()
        };

        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    fn write_log(&self, name: &str, content: &str) {
        fs::write(self.config.log_dir.join(name), content).unwrap();
    }

    fn write_gzip_log(&self, name: &str, content: &str) {
        let file = fs::File::create(self.config.log_dir.join(name)).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(content.as_bytes()).unwrap();
        encoder.finish().unwrap();
    }

    fn engine(&self) -> EtlEngine<LogAnalyzerPipeline<LocalStorage, AnalyzerConfig>> {
        EtlEngine::new(LogAnalyzerPipeline::new(
            LocalStorage::default(),
            self.config.clone(),
        ))
    }
}

fn read_rows(report_path: &Path) -> Vec<UrlStat> {
    let html = fs::read_to_string(report_path).unwrap();
    let json = html
        .trim_start_matches("<html><script>var table = ")
        .trim_end_matches(";</script></html>");
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_single_record_end_to_end() {
    let workspace = Workspace::new();
    workspace.write_log(
        "nginx-access-ui.log-20170630",
        &format!("{}\n", log_line(URL, "0.072")),
    );

    let outcome = workspace.engine().run().unwrap();
    let report_path = workspace.config.report_dir.join("report_2017.06.30.html");
    assert_eq!(outcome, RunOutcome::Rendered(report_path.clone()));

    let rows = read_rows(&report_path);
    assert_eq!(
        rows,
        vec![UrlStat {
            count: 1,
            time_avg: 0.072,
            time_max: 0.072,
            time_sum: 0.072,
            url: URL.to_string(),
            time_med: 0.072,
            time_share: 1.0,
            count_share: 1.0,
        }]
    );
}

#[test]
fn test_latest_gzip_log_is_analyzed() {
    let workspace = Workspace::new();
    workspace.write_log(
        "nginx-access-ui.log-20170628",
        &format!("{}\n", log_line("/old", "9.0")),
    );
    let content: String = [
        ("/a", "0.1"),
        ("/b", "0.3"),
        ("/a", "0.2"),
        ("/c", "0.4"),
        ("/b", "0.5"),
        ("/a", "0.5"),
    ]
    .iter()
    .map(|(url, time)| log_line(url, time) + "\n")
    .collect();
    workspace.write_gzip_log("nginx-access-ui.log-20170630.gz", &content);
    workspace.write_log(
        "nginx-access-ui.log-20170629",
        &format!("{}\n", log_line("/old", "9.0")),
    );

    let outcome = workspace.engine().run().unwrap();
    let rows = read_rows(outcome.report_path());

    assert!(rows.iter().all(|row| row.url != "/old"));
    assert_eq!(
        rows.iter().map(|row| row.url.as_str()).collect::<Vec<_>>(),
        vec!["/a", "/b", "/c"]
    );

    let count_total: f64 = rows.iter().map(|row| row.count_share).sum();
    let time_total: f64 = rows.iter().map(|row| row.time_share).sum();
    assert!((count_total - 1.0).abs() <= 1e-3);
    assert!((time_total - 1.0).abs() <= 1e-3);

    for row in &rows {
        assert!(row.time_max <= row.time_sum);
        assert!(row.time_med <= row.time_max);
    }
}

#[test]
fn test_existing_report_is_not_regenerated() {
    let workspace = Workspace::new();
    workspace.write_log(
        "nginx-access-ui.log-20170630",
        &format!("{}\n", log_line(URL, "0.072")),
    );

    let first = workspace.engine().run().unwrap();
    let report_path = first.report_path().to_path_buf();
    fs::write(&report_path, "kept as is").unwrap();

    let second = workspace.engine().run().unwrap();
    assert_eq!(second, RunOutcome::AlreadyRendered(report_path.clone()));
    assert_eq!(fs::read_to_string(&report_path).unwrap(), "kept as is");
}

#[test]
fn test_error_budget_aborts_run() {
    let workspace = Workspace::new();
    workspace.write_log(
        "nginx-access-ui.log-20170630",
        &format!("{}\nkjsdslj\nkjk\nk\nkjkj\n", log_line(URL, "0.072")),
    );

    let err = workspace.engine().run().unwrap_err();
    assert!(matches!(
        err,
        AnalyzerError::ErrorBudgetExceeded {
            malformed: 4,
            total: 5,
            ..
        }
    ));
    assert!(!workspace.config.report_dir.exists());
}

#[test]
fn test_no_logs_found() {
    let workspace = Workspace::new();
    workspace.write_log("nginx-access-api.log-20170630", "");

    let err = workspace.engine().run().unwrap_err();
    assert!(matches!(err, AnalyzerError::NotFound { .. }));
}

#[test]
fn test_empty_log_fails() {
    let workspace = Workspace::new();
    workspace.write_log("nginx-access-ui.log-20170630", "");

    let err = workspace.engine().run().unwrap_err();
    assert!(matches!(err, AnalyzerError::EmptyLog));
}

#[test]
fn test_missing_template_leaves_no_report() {
    let mut workspace = Workspace::new();
    workspace.config.report_template = workspace.config.log_dir.join("missing.html");
    workspace.write_log(
        "nginx-access-ui.log-20170630",
        &format!("{}\n", log_line(URL, "0.072")),
    );

    let err = workspace.engine().run().unwrap_err();
    assert!(matches!(err, AnalyzerError::TemplateMissing { .. }));
    assert!(!workspace
        .config
        .report_dir
        .join("report_2017.06.30.html")
        .exists());
}
