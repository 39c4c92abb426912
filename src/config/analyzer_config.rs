use crate::core::ConfigProvider;
use crate::utils::error::{AnalyzerError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Run settings. Keys missing from a config file keep their defaults; unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AnalyzerConfig {
    /// Maximum number of report rows, slowest URLs first.
    pub report_size: usize,
    pub report_dir: PathBuf,
    pub log_dir: PathBuf,
    /// Tolerated fraction of malformed lines, in [0, 1].
    pub error_limit: f64,
    /// Log file; stderr when unset.
    pub logging: Option<PathBuf>,
    pub log_marker: String,
    pub report_template: PathBuf,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            report_size: 1000,
            report_dir: PathBuf::from("./reports"),
            log_dir: PathBuf::from("./log"),
            error_limit: 0.2,
            logging: None,
            log_marker: "nginx-access-ui".to_string(),
            report_template: PathBuf::from("./report.html"),
        }
    }
}

impl AnalyzerConfig {
    /// Loads a config file; `.json` files are read as JSON, anything else as TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(AnalyzerError::IoError)?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AnalyzerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        serde_json::from_str(&processed_content).map_err(|e| AnalyzerError::ConfigError {
            message: format!("JSON parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left untouched.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AnalyzerError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for AnalyzerConfig {
    fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    fn report_template(&self) -> &Path {
        &self.report_template
    }

    fn log_marker(&self) -> &str {
        &self.log_marker
    }

    fn report_size(&self) -> usize {
        self.report_size
    }

    fn error_limit(&self) -> f64 {
        self.error_limit
    }
}

impl Validate for AnalyzerConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_range("ERROR_LIMIT", self.error_limit, 0.0, 1.0)?;
        validation::validate_positive_number("REPORT_SIZE", self.report_size, 1)?;
        validation::validate_path("LOG_DIR", &self.log_dir)?;
        validation::validate_path("REPORT_DIR", &self.report_dir)?;
        validation::validate_path("REPORT_TEMPLATE", &self.report_template)?;
        if let Some(logging) = &self.logging {
            validation::validate_path("LOGGING", logging)?;
        }
        validation::validate_non_empty_string("LOG_MARKER", &self.log_marker)?;
        Ok(())
    }
}
