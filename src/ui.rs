use crate::errors::{AppError, AppResult};
use crate::filter::EntryCounts;
use crate::models::{EntryType, SanctionEntry};
use crate::utils::{format_count, truncate_chars};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::Duration;

const REFERENCE_WIDTH: usize = 12;
const NAME_WIDTH: usize = 40;
const COUNTRY_WIDTH: usize = 24;

/// Creates a spinner with the standard application styling.
///
/// Used while the sanctions document is downloaded and parsed, where the total
/// amount of work is unknown.
///
/// # Example
///
/// ```no_run
/// use eu_sanctions_cli::ui;
///
/// # fn main() -> Result<(), eu_sanctions_cli::errors::AppError> {
/// let spinner = ui::create_spinner("Loading XML data...")?;
/// spinner.finish_and_clear();
/// # Ok(())
/// # }
/// ```
pub fn create_spinner(message: &str) -> AppResult<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .map_err(|e| AppError::IoError(format!("Failed to create spinner template: {e}")))?,
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    Ok(pb)
}

/// Writes the per-type counts followed by the total.
pub fn render_summary<W: Write>(out: &mut W, counts: &EntryCounts) -> io::Result<()> {
    for entry_type in EntryType::ALL {
        writeln!(
            out,
            "{:<10} {:>9}",
            entry_type.display_name(),
            format_count(counts.get(entry_type))
        )?;
    }
    writeln!(out, "{:<10} {:>9}", "Total", format_count(counts.total()))
}

/// Writes a numbered table of entries, starting at 1, led by the EU reference number.
///
/// `limit` caps the number of rows; a closing line mentions how many were left out.
pub fn render_table<'a, W: Write>(
    out: &mut W,
    entries: &[&'a SanctionEntry],
    limit: Option<usize>,
) -> io::Result<()> {
    writeln!(
        out,
        "{:>6}  {:<ref_w$}  {:<name_w$}  {:<6}  {:<country_w$}  {:<10}  {}",
        "Nr",
        "Reference",
        "Name",
        "Type",
        "Country",
        "Published",
        "Programme",
        ref_w = REFERENCE_WIDTH,
        name_w = NAME_WIDTH,
        country_w = COUNTRY_WIDTH,
    )?;

    let shown = limit.unwrap_or(entries.len()).min(entries.len());
    for (i, entry) in entries.iter().take(shown).enumerate() {
        writeln!(
            out,
            "{:>6}  {:<ref_w$}  {:<name_w$}  {:<6}  {:<country_w$}  {:<10}  {}",
            i + 1,
            truncate_chars(&entry.eu_reference_number, REFERENCE_WIDTH),
            truncate_chars(&entry.name, NAME_WIDTH),
            entry.entry_type.display_name(),
            truncate_chars(&entry.country, COUNTRY_WIDTH),
            entry.publication_date_text(),
            entry.program,
            ref_w = REFERENCE_WIDTH,
            name_w = NAME_WIDTH,
            country_w = COUNTRY_WIDTH,
        )?;
    }

    if shown < entries.len() {
        writeln!(
            out,
            "… {} more entries not shown",
            format_count(entries.len() - shown)
        )?;
    }
    Ok(())
}

/// Writes one line per country with its entry count.
pub fn render_countries<W: Write>(out: &mut W, countries: &BTreeMap<String, usize>) -> io::Result<()> {
    for (country, count) in countries {
        writeln!(out, "{country:<40} {:>7}", format_count(*count))?;
    }
    Ok(())
}
