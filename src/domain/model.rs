use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A discovered access log, identified by the date embedded in its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub date: NaiveDate,
    pub path: PathBuf,
}

impl LogFile {
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    pub fn is_gzip(&self) -> bool {
        is_gzip_path(&self.path)
    }
}

pub fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// One parsed request: the URL and its request time in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub url: String,
    pub duration: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub total_lines: usize,
    pub malformed_lines: usize,
}

impl ParseStats {
    pub fn error_ratio(&self) -> f64 {
        if self.total_lines == 0 {
            return 0.0;
        }
        self.malformed_lines as f64 / self.total_lines as f64
    }
}

/// A report row. Field order and names are the report's JSON schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlStat {
    pub count: usize,
    pub time_avg: f64,
    pub time_max: f64,
    pub time_sum: f64,
    pub url: String,
    pub time_med: f64,
    #[serde(rename = "time_perc")]
    pub time_share: f64,
    #[serde(rename = "count_perc")]
    pub count_share: f64,
}

pub type Report = Vec<UrlStat>;

/// What the engine decided for the latest log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub log: LogFile,
    pub report_path: PathBuf,
    pub render: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Rendered(PathBuf),
    AlreadyRendered(PathBuf),
}

impl RunOutcome {
    pub fn report_path(&self) -> &Path {
        match self {
            Self::Rendered(path) | Self::AlreadyRendered(path) => path,
        }
    }
}
