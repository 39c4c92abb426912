use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("No '{marker}' logs found in {}", .dir.display())]
    NotFound { marker: String, dir: PathBuf },

    #[error("Error limit exceeded: {malformed} of {total} lines malformed (limit {limit})")]
    ErrorBudgetExceeded {
        malformed: usize,
        total: usize,
        limit: f64,
    },

    #[error("No parseable records in log")]
    EmptyLog,

    #[error("Report template not found: {}", .path.display())]
    TemplateMissing { path: PathBuf },

    #[error("Failed to write report {}: {message}", .path.display())]
    ArtifactWrite { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Output,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code; every severity is a failure, so it is never 0.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Medium => 2,
            Self::High => 1,
            Self::Critical => 3,
        }
    }
}

impl AnalyzerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::Input,
            Self::ErrorBudgetExceeded { .. } | Self::EmptyLog => ErrorCategory::Data,
            Self::TemplateMissing { .. } | Self::ArtifactWrite { .. } => ErrorCategory::Output,
            Self::SerializationError(_) => ErrorCategory::Output,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    /// Severity drives the process exit code, see [`ErrorSeverity::exit_code`].
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // a later scheduler run may find a fresh log
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Output => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::NotFound { marker, dir } => format!(
                "Check that {} contains files named {}.log-YYYYMMDD[.gz]",
                dir.display(),
                marker
            ),
            Self::ErrorBudgetExceeded { .. } => {
                "Inspect the log format or raise ERROR_LIMIT in the config".to_string()
            }
            Self::EmptyLog => "Make sure the latest log is not empty or truncated".to_string(),
            Self::TemplateMissing { .. } => {
                "Point REPORT_TEMPLATE at an existing HTML template".to_string()
            }
            Self::ArtifactWrite { .. } => {
                "Check that REPORT_DIR exists and is writable".to_string()
            }
            Self::IoError(_) => "Check file permissions and available disk space".to_string(),
            Self::SerializationError(_) => "Report rows could not be encoded as JSON".to_string(),
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration file and run again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NotFound { .. } => format!("Nothing to analyze: {}", self),
            Self::ErrorBudgetExceeded { malformed, total, .. } => format!(
                "Log looks unreliable: {} of {} lines could not be parsed",
                malformed, total
            ),
            Self::EmptyLog => "The latest log has no usable requests".to_string(),
            Self::TemplateMissing { path } => {
                format!("Report template {} is missing", path.display())
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
