use crate::config::{FilterDefaults, ResolvedConfig};
use crate::downloader::{build_client, RemoteFeed};
use crate::errors::{AppError, AppResult};
use crate::exporter::{export_to_path, write_csv};
use crate::filter::{
    apply_filter, available_types, count_by_type, distinct_countries, parse_type_filter,
    FilterResult, FilterSpec,
};
use crate::models::SanctionEntry;
use crate::session::{DocumentSource, Session, Snapshot};
use crate::shell::run_shell;
use crate::ui;
use crate::utils::{format_count, format_duration};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

const STDOUT_PATH: &str = "-";

/// Builds the command-line definition.
///
/// Subcommands:
/// - `list`: show the filtered entries as a numbered table with counts
/// - `export`: write the filtered entries as CSV
/// - `countries`: list the countries present in the data
/// - `summary`: per-type and total counts of the full list
/// - `shell`: interactive session that loads the data once and filters it repeatedly
pub fn build_command() -> Command<'static> {
    Command::new("eu-sanctions-cli")
        .version(APP_VERSION)
        .about(APP_ABOUT)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to a TOML configuration file")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .global(true)
                .help("Read a saved XML export instead of downloading it")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("list")
                .about("Show matching entries with per-type counts")
                .after_help("Example:\n  eu-sanctions-cli list -c France -t person -n doe")
                .args(filter_args())
                .arg(
                    Arg::new("limit")
                        .short('l')
                        .long("limit")
                        .help("Show at most this many rows")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write matching entries as CSV")
                .after_help("Example:\n  eu-sanctions-cli export -c Iran -o iran.csv")
                .args(filter_args())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Destination file, '-' for standard output")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(Command::new("countries").about("List countries with their number of entries"))
        .subcommand(Command::new("summary").about("Show per-type and total counts"))
        .subcommand(
            Command::new("shell")
                .about("Interactive session: load once, filter and export repeatedly")
                .args(filter_args()),
        )
}

fn filter_args() -> Vec<Arg<'static>> {
    vec![
        Arg::new("country")
            .short('c')
            .long("country")
            .help("Keep entries of this country; repeat for several countries")
            .action(ArgAction::Append),
        Arg::new("type")
            .short('t')
            .long("type")
            .help("Entry type: 'person' (p), 'entity' (e) or 'all'")
            .action(ArgAction::Set),
        Arg::new("name")
            .short('n')
            .long("name")
            .help("Case-insensitive name search (at least 3 characters)")
            .action(ArgAction::Set),
    ]
}

/// Parses command-line arguments and runs the selected subcommand.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the sanctions document cannot be
/// fetched or parsed, or output cannot be written.
pub async fn cli() -> AppResult<()> {
    let cmd = build_command();
    let mut cmd_for_help = cmd.clone();
    let matches = cmd.get_matches();

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ResolvedConfig::from_toml_file(path)?,
        None => ResolvedConfig::default(),
    };
    let source = document_source(&config, matches.get_one::<PathBuf>("input"))?;
    let mut session = Session::new(config.cache_ttl());

    match matches.subcommand() {
        Some(("list", sub)) => {
            let spec = filter_spec_from_matches(sub, &config.filters)?;
            let limit = sub.get_one::<usize>("limit").copied();
            let snapshot = load_snapshot(&mut session, &source, false).await?;
            run_list(&snapshot, &spec, limit)?;
        }
        Some(("export", sub)) => {
            let spec = filter_spec_from_matches(sub, &config.filters)?;
            let output = sub
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| config.export_path.clone());
            let snapshot = load_snapshot(&mut session, &source, false).await?;
            run_export(&snapshot, &spec, &output)?;
        }
        Some(("countries", _)) => {
            let snapshot = load_snapshot(&mut session, &source, false).await?;
            ui::render_countries(&mut io::stdout().lock(), &distinct_countries(snapshot.entries()))?;
        }
        Some(("summary", _)) => {
            let snapshot = load_snapshot(&mut session, &source, false).await?;
            ui::render_summary(&mut io::stdout().lock(), &count_by_type(snapshot.entries()))?;
        }
        Some(("shell", sub)) => {
            let spec = filter_spec_from_matches(sub, &config.filters)?;
            run_shell(&mut session, &source, &config, spec).await?;
        }
        _ => {
            cmd_for_help
                .print_help()
                .map_err(|e| AppError::IoError(format!("Failed to print help: {e}")))?;
        }
    }

    Ok(())
}

/// Chooses between a local file and the remote feed.
pub fn document_source(config: &ResolvedConfig, input: Option<&PathBuf>) -> AppResult<DocumentSource> {
    match input {
        Some(path) => Ok(DocumentSource::File(path.clone())),
        None => {
            let client = build_client(config)?;
            Ok(DocumentSource::Remote(RemoteFeed::new(client, config)?))
        }
    }
}

/// Builds the filter from subcommand arguments, falling back to the configured defaults
/// for every criterion not given on the command line.
pub fn filter_spec_from_matches(sub: &ArgMatches, defaults: &FilterDefaults) -> AppResult<FilterSpec> {
    let countries = match sub.get_many::<String>("country") {
        Some(values) => values.cloned().collect(),
        None => defaults.countries.clone(),
    };
    let entry_type = match sub.get_one::<String>("type").or(defaults.entry_type.as_ref()) {
        Some(value) => parse_type_filter(value)?,
        None => None,
    };
    let name_query = sub
        .get_one::<String>("name")
        .or(defaults.name.as_ref())
        .cloned()
        .unwrap_or_default();

    Ok(FilterSpec {
        countries,
        entry_type,
        name_query,
    })
}

/// Returns a loaded snapshot, fetching a new one when `force` is set or the
/// session has nothing fresh. A spinner is shown while loading.
pub(crate) async fn load_snapshot(
    session: &mut Session,
    source: &DocumentSource,
    force: bool,
) -> AppResult<Arc<Snapshot>> {
    if !force && !session.needs_refresh(Instant::now()) {
        return session.ensure_loaded(source).await;
    }

    info!(source = source.describe().as_str(), "Loading sanctions data");
    let started = Instant::now();
    let spinner = ui::create_spinner("Loading XML data...")?;
    let result = if force {
        session.refresh(source).await
    } else {
        session.ensure_loaded(source).await
    };
    spinner.finish_and_clear();

    if let Ok(ref snapshot) = result {
        info!(
            entries = snapshot.len(),
            elapsed = format_duration(started.elapsed()).as_str(),
            "Sanctions data ready"
        );
        if snapshot.is_empty() {
            warn!("The sanctions document contains no entries");
        }
    }
    result
}

/// Logs hints about filter settings that will not behave as the user may expect.
pub(crate) fn report_filter_hints(spec: &FilterSpec, entries: &[SanctionEntry]) {
    if spec.name_query_too_short() {
        warn!(
            query = spec.name_query.as_str(),
            "Name search needs at least 3 characters, ignoring it"
        );
    }
    if let Some(entry_type) = spec.entry_type {
        if !spec.countries.is_empty()
            && !available_types(entries, &spec.countries).contains(&entry_type)
        {
            warn!(
                entry_type = entry_type.display_name(),
                "No entries of this type for the selected countries"
            );
        }
    }
}

/// Writes the headline count and per-type summary of a filtered view.
pub(crate) fn write_result_header<W: Write>(out: &mut W, result: &FilterResult) -> io::Result<()> {
    writeln!(out, "Found entries: {}", format_count(result.len()))?;
    ui::render_summary(out, &result.counts())
}

fn run_list(snapshot: &Snapshot, spec: &FilterSpec, limit: Option<usize>) -> AppResult<()> {
    report_filter_hints(spec, snapshot.entries());
    let result = apply_filter(snapshot.entries(), spec);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_result_header(&mut out, &result)?;
    writeln!(out)?;
    ui::render_table(&mut out, result.entries(), limit)?;
    Ok(())
}

fn run_export(snapshot: &Snapshot, spec: &FilterSpec, output: &Path) -> AppResult<()> {
    report_filter_hints(spec, snapshot.entries());
    let result = apply_filter(snapshot.entries(), spec);

    if output.as_os_str() == STDOUT_PATH {
        let rows = write_csv(io::stdout().lock(), result.iter())?;
        info!(rows, "CSV written to standard output");
    } else {
        export_to_path(output, result.iter())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryType;

    #[test]
    fn command_definition_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn list_parses_repeated_countries() {
        let matches = build_command()
            .try_get_matches_from(vec![
                "eu-sanctions-cli",
                "list",
                "-c",
                "France",
                "--country",
                "Korea, Democratic People's Republic Of",
                "-t",
                "person",
                "-n",
                "doe",
            ])
            .unwrap();
        let sub = matches.subcommand_matches("list").unwrap();
        let spec = filter_spec_from_matches(sub, &FilterDefaults::default()).unwrap();
        assert_eq!(
            spec.countries,
            vec!["France", "Korea, Democratic People's Republic Of"]
        );
        assert_eq!(spec.entry_type, Some(EntryType::Person));
        assert_eq!(spec.name_query, "doe");
    }

    #[test]
    fn config_defaults_fill_missing_filters() {
        let defaults = FilterDefaults {
            countries: vec!["Iran".to_string()],
            entry_type: Some("entity".to_string()),
            name: Some("bank".to_string()),
        };
        let matches = build_command()
            .try_get_matches_from(vec!["eu-sanctions-cli", "export", "-t", "all"])
            .unwrap();
        let sub = matches.subcommand_matches("export").unwrap();
        let spec = filter_spec_from_matches(sub, &defaults).unwrap();
        assert_eq!(spec.countries, vec!["Iran"]);
        assert_eq!(spec.entry_type, None);
        assert_eq!(spec.name_query, "bank");
    }

    #[test]
    fn invalid_type_is_rejected() {
        let matches = build_command()
            .try_get_matches_from(vec!["eu-sanctions-cli", "list", "-t", "vessel"])
            .unwrap();
        let sub = matches.subcommand_matches("list").unwrap();
        assert!(filter_spec_from_matches(sub, &FilterDefaults::default()).is_err());
    }

    #[test]
    fn global_input_is_accepted_after_subcommand() {
        let matches = build_command()
            .try_get_matches_from(vec!["eu-sanctions-cli", "summary", "--input", "export.xml"])
            .unwrap();
        let sub = matches.subcommand_matches("summary").unwrap();
        assert_eq!(
            sub.get_one::<PathBuf>("input"),
            Some(&PathBuf::from("export.xml"))
        );
    }

    #[test]
    fn document_source_prefers_input_file() {
        let path = PathBuf::from("saved.xml");
        let source = document_source(&ResolvedConfig::default(), Some(&path)).unwrap();
        assert!(matches!(source, DocumentSource::File(_)));
        assert_eq!(source.describe(), "saved.xml");
    }
}
