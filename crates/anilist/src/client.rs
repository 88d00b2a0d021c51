//! HTTP client for the AniList GraphQL API.
//!
//! Fetches complete user media lists. It handles:
//! - Chunked pagination of `MediaListCollection` responses
//! - Fetching anime and manga lists in one call
//! - Rate-limit backoff (HTTP 429, honoring `Retry-After`) and retries
//! - Mapping transport, HTTP, and GraphQL-level failures to typed errors

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{AnilistError, Result};
use crate::query;
use crate::types::{ListEntry, MediaListCollection, MediaType};

/// Public AniList GraphQL endpoint.
pub const API_URL: &str = "https://graphql.anilist.co";

/// Retries per chunk before giving up.
const MAX_RETRIES: u32 = 3;

/// Per-request timeout. Large lists produce slow responses.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Wait when rate limited and the server sent no `Retry-After`.
const RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

/// Wait before retrying other transient failures.
const TRANSIENT_WAIT: Duration = Duration::from_secs(10);

/// Outer envelope of every GraphQL response.
#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<u16>,
}

/// `data` payload of the list query.
#[derive(Debug, Deserialize)]
struct ListData {
    #[serde(rename = "MediaListCollection")]
    media_list_collection: Option<MediaListCollection>,
}

/// Client for fetching user media lists from AniList.
pub struct AnilistClient {
    http: reqwest::Client,
    endpoint: String,
    max_retries: u32,
}

impl AnilistClient {
    /// Creates a client against the public AniList endpoint.
    pub fn new() -> Self {
        Self::with_endpoint(API_URL)
    }

    /// Creates a client against a custom endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        AnilistClient {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            max_retries: MAX_RETRIES,
        }
    }

    /// Overrides the per-chunk retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Fetches a user's complete rated list: every anime chunk, then every
    /// manga chunk, concatenated in fetch order.
    ///
    /// # Arguments
    /// * `user_name` - AniList user name to fetch
    ///
    /// # Returns
    /// All list entries outside custom lists, planning entries excluded
    /// server-side
    #[instrument(skip(self))]
    pub async fn fetch_user_list(&self, user_name: &str) -> Result<Vec<ListEntry>> {
        info!("Fetching AniList data for user {}", user_name);
        let mut entries = Vec::new();
        for media_type in MediaType::ALL {
            entries.extend(self.fetch_media_type(user_name, media_type).await?);
        }
        info!(entries = entries.len(), "Finished fetching for {}", user_name);
        Ok(entries)
    }

    /// Fetches every chunk of one media type's list.
    async fn fetch_media_type(
        &self,
        user_name: &str,
        media_type: MediaType,
    ) -> Result<Vec<ListEntry>> {
        debug!("Fetching {} list for {}", media_type, user_name);
        let mut entries = Vec::new();
        let mut chunk = 1;
        loop {
            let collection = self
                .fetch_chunk_with_retry(user_name, media_type, chunk)
                .await?;
            let has_next = collection.has_next_chunk;
            entries.extend(collection.into_entries());
            if !has_next {
                break;
            }
            chunk += 1;
        }
        Ok(entries)
    }

    /// Fetches one chunk, retrying transient failures with backoff.
    async fn fetch_chunk_with_retry(
        &self,
        user_name: &str,
        media_type: MediaType,
        chunk: u32,
    ) -> Result<MediaListCollection> {
        let mut attempt = 0;
        loop {
            match self.fetch_chunk(user_name, media_type, chunk).await {
                Ok(collection) => return Ok(collection),
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let wait = retry_wait(&err);
                    warn!(
                        attempt,
                        wait_secs = wait.as_secs(),
                        "Chunk {} of the {} list failed ({}), retrying",
                        chunk,
                        media_type,
                        err
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(err) => {
                    error!(
                        "Giving up on chunk {} of the {} list for {}: {}",
                        chunk, media_type, user_name, err
                    );
                    return Err(err);
                }
            }
        }
    }

    /// Performs one GraphQL POST and maps every failure mode.
    async fn fetch_chunk(
        &self,
        user_name: &str,
        media_type: MediaType,
        chunk: u32,
    ) -> Result<MediaListCollection> {
        debug!("Fetching chunk #{} of the {} list", chunk, media_type);
        let body = query::user_list_request(user_name, media_type, chunk);
        let response = self
            .http
            .post(&self.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(AnilistError::RateLimited { retry_after });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(AnilistError::UserNotFound(user_name.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AnilistError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: GraphQlResponse<ListData> = response.json().await?;
        if let Some(first) = envelope.errors.first() {
            // AniList sometimes reports 404 and 429 inside the GraphQL
            // errors array rather than on the HTTP status line.
            return Err(match first.status {
                Some(404) => AnilistError::UserNotFound(user_name.to_string()),
                Some(429) => AnilistError::RateLimited { retry_after: None },
                _ => AnilistError::GraphQl(first.message.clone()),
            });
        }

        // A null collection with no errors means the user has no list of
        // this media type.
        Ok(envelope
            .data
            .and_then(|d| d.media_list_collection)
            .unwrap_or_default())
    }
}

impl Default for AnilistClient {
    fn default() -> Self {
        Self::new()
    }
}

/// How long to back off before retrying a failed chunk.
fn retry_wait(err: &AnilistError) -> Duration {
    match err {
        AnilistError::RateLimited {
            retry_after: Some(secs),
        } => Duration::from_secs(*secs),
        AnilistError::RateLimited { retry_after: None } => RATE_LIMIT_WAIT,
        _ => TRANSIENT_WAIT,
    }
}
