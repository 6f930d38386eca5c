use super::feed_resolver::parse_enclosure_url;
use crate::config::ResolvedConfig;
use crate::constants::USER_AGENT;
use crate::errors::{AppError, AppResult};
use std::time::Instant;
use tracing::{debug, info};
use url::Url;

/// Builds the HTTP client used for every request, with the configured timeout.
pub fn build_client(config: &ResolvedConfig) -> AppResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Remote location of the sanctions export.
///
/// By default the RSS feed is read first to find the current XML file. When a
/// `document_url` is configured the export is downloaded directly.
#[derive(Debug, Clone)]
pub struct RemoteFeed {
    client: reqwest::Client,
    feed_url: Url,
    document_url: Option<Url>,
}

impl RemoteFeed {
    pub fn new(client: reqwest::Client, config: &ResolvedConfig) -> AppResult<Self> {
        let feed_url = Url::parse(&config.feed_url)?;
        let document_url = config
            .document_url
            .as_deref()
            .map(Url::parse)
            .transpose()?;
        Ok(Self {
            client,
            feed_url,
            document_url,
        })
    }

    /// Human-readable description of where documents come from.
    pub fn describe(&self) -> String {
        match self.document_url {
            Some(ref url) => url.to_string(),
            None => self.feed_url.to_string(),
        }
    }

    /// Downloads the current sanctions export.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if any request fails, times out or answers with a
    /// non-success status, or when the RSS feed lists no XML export. Nothing is
    /// returned on partial failure.
    pub async fn fetch(&self) -> AppResult<Vec<u8>> {
        let started = Instant::now();

        let document_url = match self.document_url {
            Some(ref url) => url.clone(),
            None => self.resolve_document_url().await?,
        };

        let body = fetch_bytes(&self.client, &document_url).await?;
        info!(
            url = %document_url,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Sanctions document downloaded"
        );
        Ok(body)
    }

    async fn resolve_document_url(&self) -> AppResult<Url> {
        info!(url = %self.feed_url, "Reading sanctions RSS feed");
        let feed = fetch_bytes(&self.client, &self.feed_url).await?;
        let url = parse_enclosure_url(&feed, &self.feed_url)?;
        debug!(url = %url, "Resolved XML export from feed");
        Ok(url)
    }
}

/// Performs a single GET and returns the whole body.
pub async fn fetch_bytes(client: &reqwest::Client, url: &Url) -> AppResult<Vec<u8>> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| AppError::FetchError(format!("Request to {url} failed: {e}")))?;

    let status = response.status();
    let response = response.error_for_status().map_err(|e| {
        AppError::FetchError(format!("HTTP {}: request to {url} failed: {e}", status.as_u16()))
    })?;

    let body = response
        .bytes()
        .await
        .map_err(|e| AppError::FetchError(format!("Failed to read body from {url}: {e}")))?;
    Ok(body.to_vec())
}
