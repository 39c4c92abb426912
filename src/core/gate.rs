use crate::domain::model::LogFile;
use crate::domain::ports::Storage;
use std::path::Path;

/// Report file name for a log, e.g. `report_2017.06.30.html`.
pub fn report_name(log: &LogFile) -> String {
    format!("report_{}.html", log.date.format("%Y.%m.%d"))
}

/// True unless a report with this exact name is already in `report_dir`.
///
/// Only existence is checked; a truncated report left by someone else still counts as rendered.
pub fn should_render<S: Storage>(storage: &S, report_dir: &Path, report_name: &str) -> bool {
    !storage.exists(&report_dir.join(report_name))
}
