use super::xml_parser::parse_document;
use crate::errors::{AppError, AppResult};
use crate::models::SanctionEntry;
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Reads a locally saved sanctions export from disk.
///
/// Only files with an `.xml` extension are accepted.
///
/// # Errors
///
/// Returns `InvalidInput` for non-XML paths and `IoError` when the file cannot be read.
pub async fn load_document_file(path: &Path) -> AppResult<Vec<u8>> {
    let is_xml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
    if !is_xml {
        return Err(AppError::InvalidInput(format!(
            "Expected an .xml export file, got {}",
            path.display()
        )));
    }

    let content = fs::read(path).await.map_err(|e| {
        AppError::IoError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    info!(path = %path.display(), bytes = content.len(), "Loaded sanctions document from disk");
    Ok(content)
}

/// Reads and parses a local sanctions export.
pub async fn parse_document_file(path: &Path) -> AppResult<Vec<SanctionEntry>> {
    let content = load_document_file(path).await?;
    parse_document(&content)
}
