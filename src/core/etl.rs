use crate::core::{Pipeline, RunOutcome};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn run(&self) -> Result<RunOutcome> {
        let plan = self.pipeline.plan()?;
        self.monitor.log_stats("Plan");

        if !plan.render {
            tracing::info!("Report {} already exists", plan.report_path.display());
            return Ok(RunOutcome::AlreadyRendered(plan.report_path));
        }

        // Extract
        tracing::info!("Latest log: {}", plan.log.path.display());
        let records = self.pipeline.extract(&plan.log)?;

        // Transform
        let report = self.pipeline.transform(records)?;
        tracing::info!("Report data has been generated: {} rows", report.len());
        self.monitor.log_stats("Aggregate");

        // Load
        let output_path = self.pipeline.load(&plan, report)?;
        self.monitor.log_stats("Render");
        self.monitor.log_final_stats();

        Ok(RunOutcome::Rendered(output_path))
    }
}
