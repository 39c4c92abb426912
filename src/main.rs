use anyhow::Context;
use clap::Parser;
use log_analyzer::core::Pipeline;
use log_analyzer::utils::{logger, validation::Validate};
use log_analyzer::{
    AnalyzerConfig, CliArgs, EtlEngine, LocalStorage, LogAnalyzerPipeline, RunOutcome,
};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => AnalyzerConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path.display()))?,
        None => AnalyzerConfig::default(),
    };

    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    logger::init_cli_logger(args.verbose, args.json_logs, config.logging.as_deref())
        .context("Failed to set up logging")?;

    tracing::info!("Starting log-analyzer");
    tracing::debug!("Config: {:?}", config);

    if args.monitor {
        tracing::info!("System monitoring enabled");
    }

    let pipeline = LogAnalyzerPipeline::new(LocalStorage::default(), config);
    let engine = EtlEngine::new_with_monitoring(pipeline, args.monitor);

    let result = if args.dry_run {
        engine.pipeline().plan().map(|plan| {
            println!("Latest log: {} ({})", plan.log.path.display(), plan.log.date);
            println!("Report:     {}", plan.report_path.display());
            if plan.render {
                println!("Report would be generated");
                RunOutcome::Rendered(plan.report_path)
            } else {
                println!("Report already exists, nothing to do");
                RunOutcome::AlreadyRendered(plan.report_path)
            }
        })
    } else {
        engine.run()
    };

    match result {
        Ok(RunOutcome::Rendered(path)) if !args.dry_run => {
            tracing::info!("Report saved to: {}", path.display());
        }
        Ok(RunOutcome::AlreadyRendered(path)) => {
            tracing::info!("Nothing to do, {} is up to date", path.display());
        }
        Ok(_) => {}
        Err(e) => {
            tracing::error!(
                "Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            std::process::exit(e.severity().exit_code());
        }
    }

    Ok(())
}
