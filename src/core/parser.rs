use crate::domain::model::LogRecord;
use thiserror::Error;

/// Why a line was rejected. Counted by the stream, never propagated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LineError {
    #[error("no quoted request field")]
    MissingRequest,

    #[error("request field has no url")]
    MissingUrl,

    #[error("invalid request time '{0}'")]
    InvalidDuration(String),
}

/// Extracts the URL and request time from one access log line.
///
/// Expects the nginx `ui_short` layout: the URL is the second space separated token of the
/// first quoted field, and `$request_time` is the last token of the line.
pub fn parse_line(line: &str) -> Result<LogRecord, LineError> {
    let request = line.split('"').nth(1).ok_or(LineError::MissingRequest)?;
    let url = request
        .split(' ')
        .nth(1)
        .filter(|url| !url.is_empty())
        .ok_or(LineError::MissingUrl)?;

    let raw = line
        .split_whitespace()
        .next_back()
        .ok_or_else(|| LineError::InvalidDuration(String::new()))?;
    let duration = raw
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| LineError::InvalidDuration(raw.to_string()))?;

    Ok(LogRecord {
        url: url.to_string(),
        duration,
    })
}
