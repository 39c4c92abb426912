use crate::core::aggregate::{aggregate, rank_top};
use crate::core::gate::{report_name, should_render};
use crate::core::locator::find_latest;
use crate::core::report::ReportRenderer;
use crate::core::stream::{LogStream, RecordStream};
use crate::core::{ConfigProvider, LogFile, Pipeline, Report, RunPlan, Storage};
use crate::utils::error::Result;
use std::path::PathBuf;

/// Latest nginx log → per-URL request time report.
pub struct LogAnalyzerPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> LogAnalyzerPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for LogAnalyzerPipeline<S, C> {
    type Records = RecordStream;

    fn plan(&self) -> Result<RunPlan> {
        let log = find_latest(self.config.log_marker(), self.config.log_dir())?;
        let name = report_name(&log);
        let render = should_render(&self.storage, self.config.report_dir(), &name);

        Ok(RunPlan {
            report_path: self.config.report_dir().join(name),
            log,
            render,
        })
    }

    fn extract(&self, log: &LogFile) -> Result<RecordStream> {
        tracing::debug!(
            "Opening {} (gzip: {})",
            log.path.display(),
            log.is_gzip()
        );
        LogStream::open(&log.path, self.config.error_limit())
    }

    fn transform(&self, mut records: RecordStream) -> Result<Report> {
        let report = aggregate(records.by_ref())?;

        let stats = records.stats();
        tracing::info!(
            "Parsed {} lines, {} malformed, {} distinct urls",
            stats.total_lines,
            stats.malformed_lines,
            report.len()
        );

        Ok(rank_top(report, self.config.report_size()))
    }

    fn load(&self, plan: &RunPlan, report: Report) -> Result<PathBuf> {
        ReportRenderer::new(&self.storage, self.config.report_template())
            .render(&report, &plan.report_path)
    }
}
