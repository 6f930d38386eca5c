//! eu-sanctions-cli library
//!
//! This crate provides the core functionality for the `eu-sanctions-cli` binary.
//! The crate root only declares modules; implementation and tests live in the modules.
//!
//! ## Overview
//!
//! The library is organized into modules that follow the data from the feed to the user:
//!
//! - [`downloader`] - Reads the EU sanctions RSS feed and downloads the XML export it announces
//! - [`parser`] - Parses the XML export into [`models::SanctionEntry`] records
//! - [`session`] - Holds the loaded entries as an immutable snapshot and refreshes it
//! - [`filter`] - Narrows entries by country, type and name, and counts the result
//! - [`exporter`] - Writes entries as CSV
//! - [`cli`] and [`shell`] - Command-line and interactive front ends
//! - [`models`] - Data structures representing sanction entries
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use eu_sanctions_cli::config::ResolvedConfig;
//! use eu_sanctions_cli::downloader::{build_client, RemoteFeed};
//! use eu_sanctions_cli::filter::{apply_filter, FilterSpec};
//! use eu_sanctions_cli::models::EntryType;
//! use eu_sanctions_cli::{errors::AppResult, exporter, parser};
//!
//! # async fn example() -> AppResult<()> {
//! let config = ResolvedConfig::default();
//! let feed = RemoteFeed::new(build_client(&config)?, &config)?;
//! let entries = parser::parse_document(&feed.fetch().await?)?;
//!
//! let spec = FilterSpec {
//!     countries: vec!["Russian Federation".to_string()],
//!     entry_type: Some(EntryType::Person),
//!     ..FilterSpec::default()
//! };
//! let result = apply_filter(&entries, &spec);
//! println!("{} persons", result.counts().persons);
//! print!("{}", exporter::to_csv_string(result.iter())?);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod downloader;
pub mod errors;
pub mod exporter;
pub mod filter;
pub mod models;
pub mod parser;
pub mod session;
pub mod shell;
pub mod ui;
pub mod utils;
