//! CSV export of sanction entries.

use crate::constants::CSV_HEADERS;
use crate::errors::{AppError, AppResult};
use crate::models::SanctionEntry;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Writes `entries` as CSV: one header row, then one row per entry in input order.
///
/// Column order is always `name, type, country, publicationDate, program, remarks,
/// publicationUrl`. Values containing commas, quotes or line breaks are quoted.
///
/// Returns the number of data rows written.
pub fn write_csv<'a, W, I>(writer: W, entries: I) -> AppResult<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a SanctionEntry>,
{
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADERS)?;

    let mut rows = 0;
    for entry in entries {
        let date = entry.publication_date_text();
        wtr.write_record([
            entry.name.as_str(),
            entry.entry_type.display_name(),
            entry.country.as_str(),
            date.as_str(),
            entry.program.as_str(),
            entry.remarks.as_str(),
            entry.publication_url.as_str(),
        ])?;
        rows += 1;
    }

    wtr.flush()
        .map_err(|e| AppError::ExportError(format!("Failed to flush CSV output: {e}")))?;
    Ok(rows)
}

/// Renders `entries` as a CSV string.
pub fn to_csv_string<'a>(entries: impl IntoIterator<Item = &'a SanctionEntry>) -> AppResult<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, entries)?;
    String::from_utf8(buf)
        .map_err(|e| AppError::ExportError(format!("CSV output is not valid UTF-8: {e}")))
}

/// Writes `entries` as a UTF-8 CSV file at `path`, replacing any existing file.
pub fn export_to_path<'a>(
    path: &Path,
    entries: impl IntoIterator<Item = &'a SanctionEntry>,
) -> AppResult<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::IoError(format!("Failed to create directory {}: {}", parent.display(), e))
        })?;
    }
    let file = File::create(path).map_err(|e| {
        AppError::IoError(format!("Failed to create {}: {}", path.display(), e))
    })?;
    let rows = write_csv(BufWriter::new(file), entries)?;
    info!(path = %path.display(), rows, "CSV export written");
    Ok(rows)
}
