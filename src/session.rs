//! Loaded sanctions data and its lifecycle.
//!
//! A [`Snapshot`] holds the full entry sequence from one successful fetch and never
//! changes. The [`Session`] owns the current snapshot, decides when it is stale,
//! and replaces it wholesale on refresh. A failed refresh keeps the previous
//! snapshot.

use crate::downloader::RemoteFeed;
use crate::errors::{AppError, AppResult};
use crate::models::SanctionEntry;
use crate::parser::{load_document_file, parse_document};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Immutable result of one fetch-and-parse cycle.
#[derive(Debug)]
pub struct Snapshot {
    entries: Vec<SanctionEntry>,
    loaded_at: Instant,
    source: String,
}

impl Snapshot {
    pub fn new(entries: Vec<SanctionEntry>, source: impl Into<String>) -> Self {
        Self::with_load_time(entries, source, Instant::now())
    }

    pub fn with_load_time(entries: Vec<SanctionEntry>, source: impl Into<String>, at: Instant) -> Self {
        Self {
            entries,
            loaded_at: at,
            source: source.into(),
        }
    }

    pub fn entries(&self) -> &[SanctionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Where the entries were read from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.loaded_at)
    }

    pub fn is_stale(&self, ttl: Duration, now: Instant) -> bool {
        self.age(now) >= ttl
    }
}

/// Where sanctions documents are read from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    Remote(RemoteFeed),
    File(PathBuf),
}

impl DocumentSource {
    pub async fn read(&self) -> AppResult<Vec<u8>> {
        match self {
            DocumentSource::Remote(feed) => feed.fetch().await,
            DocumentSource::File(path) => load_document_file(path).await,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DocumentSource::Remote(feed) => feed.describe(),
            DocumentSource::File(path) => path.display().to_string(),
        }
    }

    /// Reads and parses one document into a fresh snapshot.
    pub async fn load_snapshot(&self) -> AppResult<Snapshot> {
        let content = self.read().await?;
        let entries = parse_document(&content)?;
        Ok(Snapshot::new(entries, self.describe()))
    }
}

/// Owner of the current snapshot.
#[derive(Debug)]
pub struct Session {
    snapshot: Option<Arc<Snapshot>>,
    last_error: Option<AppError>,
    ttl: Duration,
}

impl Session {
    pub fn new(ttl: Duration) -> Self {
        Self {
            snapshot: None,
            last_error: None,
            ttl,
        }
    }

    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.clone()
    }

    /// Error of the most recent failed load, cleared by the next successful one.
    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    /// True when nothing is loaded yet or the snapshot outlived the TTL.
    pub fn needs_refresh(&self, now: Instant) -> bool {
        self.snapshot
            .as_ref()
            .map_or(true, |s| s.is_stale(self.ttl, now))
    }

    /// Records the outcome of a load attempt.
    ///
    /// A new snapshot replaces the current one entirely. On error the current
    /// snapshot, if any, stays in place and the error is returned to the caller.
    pub fn install(&mut self, outcome: AppResult<Snapshot>) -> AppResult<Arc<Snapshot>> {
        match outcome {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                info!(
                    entries = snapshot.len(),
                    source = snapshot.source(),
                    "Sanctions snapshot loaded"
                );
                self.snapshot = Some(Arc::clone(&snapshot));
                self.last_error = None;
                Ok(snapshot)
            }
            Err(err) => {
                if let Some(ref previous) = self.snapshot {
                    warn!(
                        error = %err,
                        kept_entries = previous.len(),
                        "Refresh failed, keeping previously loaded data"
                    );
                }
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Loads a new snapshot from `source`, whether or not the current one is stale.
    pub async fn refresh(&mut self, source: &DocumentSource) -> AppResult<Arc<Snapshot>> {
        let outcome = source.load_snapshot().await;
        self.install(outcome)
    }

    /// Returns the current snapshot, loading a new one first when it is missing or stale.
    pub async fn ensure_loaded(&mut self, source: &DocumentSource) -> AppResult<Arc<Snapshot>> {
        if !self.needs_refresh(Instant::now()) {
            if let Some(ref snapshot) = self.snapshot {
                return Ok(Arc::clone(snapshot));
            }
        }
        self.refresh(source).await
    }
}
