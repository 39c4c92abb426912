pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;
pub use config::{cli::LocalStorage, AnalyzerConfig};

pub use crate::core::{etl::EtlEngine, pipeline::LogAnalyzerPipeline};
pub use domain::model::{LogFile, LogRecord, ParseStats, Report, RunOutcome, RunPlan, UrlStat};
pub use utils::error::{AnalyzerError, Result};
