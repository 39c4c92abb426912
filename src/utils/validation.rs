use crate::utils::error::{AnalyzerError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let raw = path.to_string_lossy();
    if raw.is_empty() {
        return Err(AnalyzerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: raw.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if raw.contains('\0') {
        return Err(AnalyzerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: raw.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(AnalyzerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AnalyzerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN is out of range
    if !(value >= min && value <= max) {
        return Err(AnalyzerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("LOG_DIR", Path::new("./log")).is_ok());
        assert!(validate_path("LOG_DIR", Path::new("")).is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("REPORT_SIZE", 5, 1).is_ok());
        assert!(validate_positive_number("REPORT_SIZE", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("ERROR_LIMIT", 0.0, 0.0, 1.0).is_ok());
        assert!(validate_range("ERROR_LIMIT", 1.0, 0.0, 1.0).is_ok());
        assert!(validate_range("ERROR_LIMIT", -0.1, 0.0, 1.0).is_err());
        assert!(validate_range("ERROR_LIMIT", f64::NAN, 0.0, 1.0).is_err());
    }
}
