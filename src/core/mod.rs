pub mod aggregate;
pub mod etl;
pub mod gate;
pub mod locator;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod stream;

pub use crate::domain::model::{LogFile, LogRecord, Report, RunOutcome, RunPlan, UrlStat};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
