use crate::domain::model::Report;
use crate::domain::ports::Storage;
use crate::utils::error::{AnalyzerError, Result};
use std::path::{Path, PathBuf};

pub const TABLE_PLACEHOLDER: &str = "$table_json";

/// Renders report rows into an HTML template.
pub struct ReportRenderer<'a, S: Storage> {
    storage: &'a S,
    template: &'a Path,
}

impl<'a, S: Storage> ReportRenderer<'a, S> {
    pub fn new(storage: &'a S, template: &'a Path) -> Self {
        Self { storage, template }
    }

    /// Writes `temp_<name>` next to `report_path`, then renames it into place so a
    /// half-written report is never visible under the final name.
    pub fn render(&self, report: &Report, report_path: &Path) -> Result<PathBuf> {
        let template = self.storage.read_to_string(self.template).map_err(|e| {
            tracing::error!("Failed to read report template: {}", e);
            AnalyzerError::TemplateMissing {
                path: self.template.to_path_buf(),
            }
        })?;

        let table = script_safe_json(report)?;
        let html = template.replace(TABLE_PLACEHOLDER, &table);

        let file_name = report_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| AnalyzerError::ArtifactWrite {
                path: report_path.to_path_buf(),
                message: "report path has no file name".to_string(),
            })?;
        let temp_path = report_path.with_file_name(format!("temp_{}", file_name));

        tracing::debug!("Writing {} bytes to {}", html.len(), temp_path.display());
        if let Err(e) = self
            .storage
            .write_file(&temp_path, html.as_bytes())
            .and_then(|_| self.storage.rename(&temp_path, report_path))
        {
            if let Err(cleanup) = self.storage.remove_file(&temp_path) {
                tracing::debug!("Could not remove {}: {}", temp_path.display(), cleanup);
            }
            return Err(AnalyzerError::ArtifactWrite {
                path: report_path.to_path_buf(),
                message: e.to_string(),
            });
        }

        tracing::info!("New report has been generated: {}", report_path.display());
        Ok(report_path.to_path_buf())
    }
}

/// JSON for embedding inside `<script>`: `<`, `>` and `&` become unicode escapes, so a logged
/// URL can never close the script element. The output is still valid JSON.
fn script_safe_json(report: &Report) -> Result<String> {
    let json = serde_json::to_string(report)?;
    let mut escaped = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            _ => escaped.push(ch),
        }
    }
    Ok(escaped)
}
