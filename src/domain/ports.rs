use crate::domain::model::{LogFile, LogRecord, Report, RunPlan};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

pub trait Storage {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
    fn remove_file(&self, path: &Path) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
}

pub trait ConfigProvider {
    fn log_dir(&self) -> &Path;
    fn report_dir(&self) -> &Path;
    fn report_template(&self) -> &Path;
    fn log_marker(&self) -> &str;
    fn report_size(&self) -> usize;
    fn error_limit(&self) -> f64;
}

pub trait Pipeline {
    /// Lazy, single-pass source of parsed records. A trailing `Err` aborts the run.
    type Records: Iterator<Item = Result<LogRecord>>;

    /// Locate the newest log and decide whether its report still has to be produced.
    fn plan(&self) -> Result<RunPlan>;
    fn extract(&self, log: &LogFile) -> Result<Self::Records>;
    fn transform(&self, records: Self::Records) -> Result<Report>;
    fn load(&self, plan: &RunPlan, report: Report) -> Result<PathBuf>;
}
