use crate::domain::model::LogFile;
use crate::utils::error::{AnalyzerError, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Finds the most recent `<marker>.log-YYYYMMDD[.gz]` file under `dir`, subdirectories included.
///
/// Names that contain the marker but carry an impossible date are skipped. When two files share
/// the newest date, the lexicographically smallest path wins.
pub fn find_latest(marker: &str, dir: &Path) -> Result<LogFile> {
    let pattern = Regex::new(&format!(r"^{}\.log-(\d{{8}})(\.gz)?$", regex::escape(marker)))
        .map_err(|e| AnalyzerError::ConfigError {
            message: format!("Invalid log marker '{}': {}", marker, e),
        })?;

    let mut files = Vec::new();
    collect_files(dir, &mut files, true)?;

    let mut latest: Option<LogFile> = None;
    for path in files {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if !name.contains(marker) {
            continue;
        }
        let Some(date) = pattern
            .captures(name)
            .and_then(|caps| NaiveDate::parse_from_str(&caps[1], "%Y%m%d").ok())
        else {
            tracing::debug!("Skipping {}: no valid date in name", path.display());
            continue;
        };

        let newer = match &latest {
            None => true,
            Some(current) => date > current.date || (date == current.date && path < current.path),
        };
        if newer {
            latest = Some(LogFile { date, path });
        }
    }

    latest.ok_or_else(|| AnalyzerError::NotFound {
        marker: marker.to_string(),
        dir: dir.to_path_buf(),
    })
}

/// Lists files under `dir`. Only an unreadable top-level `dir` is an error; unreadable
/// subdirectories and entries are logged and skipped.
fn collect_files(dir: &Path, out: &mut Vec<PathBuf>, top_level: bool) -> Result<()> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if !top_level => {
            tracing::warn!("Skipping unreadable directory {}: {}", dir.display(), e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => collect_files(&path, out, false)?,
            Ok(_) => out.push(path),
            Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
        }
    }
    Ok(())
}
