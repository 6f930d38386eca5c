//! Interactive session over one loaded sanctions list.
//!
//! The list is loaded once and reused for every command until it goes stale or the
//! user asks for a refresh. Errors are reported and the session keeps running.

use crate::cli::{load_snapshot, report_filter_hints, write_result_header};
use crate::config::ResolvedConfig;
use crate::errors::{AppError, AppResult};
use crate::exporter::export_to_path;
use crate::filter::{apply_filter, distinct_countries, parse_type_filter, FilterSpec};
use crate::models::EntryType;
use crate::session::{DocumentSource, Session, Snapshot};
use crate::ui;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, warn};

const PROMPT: &str = "sanctions> ";
const DEFAULT_SHOW_LIMIT: usize = 50;

const HELP_TEXT: &str = "\
Commands:
  country <name>   add a country to the filter (repeatable)
  country          clear the country filter
  type <t>         person, entity or all
  name <query>     name search, at least 3 characters
  name             clear the name search
  reset            clear all filters
  show [n]         list matching entries (default 50)
  summary          counts of matching entries
  countries        countries present in the list
  export [path]    write matching entries as CSV
  refresh          download the list again
  help             this text
  quit             leave the shell";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Add a country, or clear the selection with `None`
    Country(Option<String>),
    Type(Option<EntryType>),
    Name(String),
    Reset,
    Show(Option<usize>),
    Summary,
    Countries,
    Export(Option<PathBuf>),
    Refresh,
    Help,
    Quit,
    Empty,
}

impl ShellCommand {
    /// Parses a command line; arguments run to the end of the line so country names
    /// and search terms may contain spaces and commas.
    pub fn parse(line: &str) -> AppResult<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let argument = (!rest.is_empty()).then(|| rest.to_string());

        let command = match word.to_lowercase().as_str() {
            "" => Self::Empty,
            "country" | "c" => Self::Country(argument),
            "type" | "t" => Self::Type(parse_type_filter(rest)?),
            "name" | "n" => Self::Name(rest.to_string()),
            "reset" => Self::Reset,
            "show" | "list" => Self::Show(
                argument
                    .map(|n| {
                        n.parse::<usize>().map_err(|e| {
                            AppError::InvalidInput(format!("Invalid row count '{n}': {e}"))
                        })
                    })
                    .transpose()?,
            ),
            "summary" => Self::Summary,
            "countries" => Self::Countries,
            "export" => Self::Export(argument.map(PathBuf::from)),
            "refresh" => Self::Refresh,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => {
                return Err(AppError::InvalidInput(format!(
                    "Unknown command '{other}', type 'help' for a list"
                )))
            }
        };
        Ok(command)
    }

    /// Applies a filter-changing command to `spec`. Returns false for other commands.
    pub fn update_filter(&self, spec: &mut FilterSpec) -> bool {
        match self {
            Self::Country(Some(country)) => {
                if !spec
                    .countries
                    .iter()
                    .any(|c| c.trim().to_lowercase() == country.trim().to_lowercase())
                {
                    spec.countries.push(country.clone());
                }
            }
            Self::Country(None) => spec.countries.clear(),
            Self::Type(entry_type) => spec.entry_type = *entry_type,
            Self::Name(query) => spec.name_query = query.clone(),
            Self::Reset => *spec = FilterSpec::default(),
            _ => return false,
        }
        true
    }
}

/// Runs the interactive loop until `quit` or end of input.
pub async fn run_shell(
    session: &mut Session,
    source: &DocumentSource,
    config: &ResolvedConfig,
    initial: FilterSpec,
) -> AppResult<()> {
    let mut spec = initial;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // Load up front so a broken feed is reported before the first prompt.
    if let Err(err) = load_snapshot(session, source, false).await {
        error!(category = err.category(), "{err}");
    }
    println!("{HELP_TEXT}");

    loop {
        print!("{PROMPT}");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                error!("{err}");
                continue;
            }
        };

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Empty => {}
            ShellCommand::Help => println!("{HELP_TEXT}"),
            command => {
                if let Err(err) = execute(&command, &mut spec, session, source, config).await {
                    error!(category = err.category(), "{err}");
                }
            }
        }
    }

    Ok(())
}

async fn execute(
    command: &ShellCommand,
    spec: &mut FilterSpec,
    session: &mut Session,
    source: &DocumentSource,
    config: &ResolvedConfig,
) -> AppResult<()> {
    if let ShellCommand::Refresh = command {
        load_snapshot(session, source, true).await?;
        return Ok(());
    }

    let filter_changed = command.update_filter(spec);
    let snapshot = current_snapshot(session, source).await?;
    let entries = snapshot.entries();
    let result = apply_filter(entries, spec);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if filter_changed {
        report_filter_hints(spec, entries);
        write_result_header(&mut out, &result)?;
        return Ok(());
    }

    match command {
        ShellCommand::Show(limit) => {
            write_refresh_status(&mut out, session)?;
            ui::render_table(&mut out, result.entries(), Some(limit.unwrap_or(DEFAULT_SHOW_LIMIT)))?
        }
        ShellCommand::Summary => {
            write_refresh_status(&mut out, session)?;
            write_result_header(&mut out, &result)?
        }
        ShellCommand::Countries => ui::render_countries(&mut out, &distinct_countries(entries))?,
        ShellCommand::Export(path) => {
            let path = path.clone().unwrap_or_else(|| config.export_path.clone());
            let rows = export_to_path(&path, result.iter())?;
            writeln!(out, "Wrote {rows} rows to {}", path.display())?;
        }
        _ => {}
    }
    Ok(())
}

/// Mentions the failed reload when the data shown comes from an earlier load.
fn write_refresh_status<W: Write>(out: &mut W, session: &Session) -> io::Result<()> {
    if let Some(err) = session.last_error() {
        writeln!(out, "Showing previously loaded data, last refresh failed: {err}")?;
    }
    Ok(())
}

/// Fresh data when possible; stale data with a warning when a reload fails.
async fn current_snapshot(session: &mut Session, source: &DocumentSource) -> AppResult<Arc<Snapshot>> {
    match load_snapshot(session, source, false).await {
        Ok(snapshot) => Ok(snapshot),
        Err(err) => match session.snapshot() {
            Some(stale) => {
                warn!(error = %err, "Using previously loaded data");
                Ok(stale)
            }
            None => Err(err),
        },
    }
}
