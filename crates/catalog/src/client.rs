use std::time::Duration;

use journal_tracker_core::{Issn, TrackerConfig};

use crate::error::CatalogError;
use crate::types::{CatalogJournal, SearchResponse};

/// Request timeout for a single search call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
/// Retries after the first attempt for transient failures.
pub const MAX_RETRIES: usize = 3;

/// Client for the library catalog search API.
pub struct CatalogClient {
    pub(crate) client: reqwest::Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) library_id: u32,
    pub(crate) batch_size: usize,
    pub(crate) backoff: Duration,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("client", &self.client)
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("library_id", &self.library_id)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl CatalogClient {
    /// Creates a client for `library_id` at `base_url`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(api_key: String, base_url: &str, library_id: u32) -> Result<Self, CatalogError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CatalogError::ClientInit(e.to_string()))?;
        Ok(Self {
            client,
            api_key,
            base_url,
            library_id,
            batch_size: journal_tracker_core::constants::DEFAULT_BATCH_SIZE,
            backoff: Duration::from_secs(1),
        })
    }

    /// Client configured from [`TrackerConfig`].
    ///
    /// # Errors
    /// Returns [`CatalogError::MissingApiKey`] when no key is configured.
    pub fn from_config(config: &TrackerConfig) -> Result<Self, CatalogError> {
        let api_key = config.catalog_api_key.clone().ok_or(CatalogError::MissingApiKey)?;
        Ok(Self::new(api_key, &config.catalog_base_url, config.library_id)?
            .with_batch_size(config.batch_size))
    }

    /// ISSNs per request. Zero is treated as one.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Base delay between retries; attempt `n` waits `backoff * 2^(n-1)`.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn search_url(&self) -> String {
        format!("{}/public/v1/libraries/{}/search", self.base_url, self.library_id)
    }

    /// Search one batch of ISSNs, retrying transient failures.
    ///
    /// # Errors
    /// Returns an error on a non-transient HTTP status, an undecodable body,
    /// or when every retry failed.
    pub async fn search_batch(&self, issns: &[Issn]) -> Result<Vec<CatalogJournal>, CatalogError> {
        let joined = issns.iter().map(Issn::as_str).collect::<Vec<_>>().join(",");
        let mut last_error: Option<CatalogError> = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let delay = self.backoff.saturating_mul(1_u32 << (attempt - 1));
                tokio::time::sleep(delay).await;
                tracing::warn!(
                    batch = %joined,
                    "catalog retry attempt {attempt}/{MAX_RETRIES} after {delay:?}"
                );
            }

            let response_result = self
                .client
                .get(self.search_url())
                .query(&[("issns", joined.as_str()), ("access_token", self.api_key.as_str())])
                .send()
                .await;

            let response = match response_result {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(CatalogError::HttpRequest(e));
                    continue;
                },
            };

            let status = response.status();
            if status.is_success() {
                let body = match response.text().await {
                    Ok(b) => b,
                    Err(e) => {
                        last_error = Some(CatalogError::HttpRequest(e));
                        continue;
                    },
                };
                return parse_search_body(&joined, &body);
            }

            let body =
                response.text().await.unwrap_or_else(|_| "Could not read error body".to_owned());
            let err = CatalogError::HttpStatus { code: status.as_u16(), body };
            if err.is_transient() {
                last_error = Some(err);
                continue;
            }
            return Err(err);
        }

        Err(CatalogError::RetriesExhausted(Box::new(
            last_error.unwrap_or_else(|| CatalogError::ClientInit("no attempt made".to_owned())),
        )))
    }
}

fn parse_search_body(batch: &str, body: &str) -> Result<Vec<CatalogJournal>, CatalogError> {
    let response: SearchResponse = serde_json::from_str(body).map_err(|e| {
        CatalogError::JsonParse {
            context: format!("search response (body: {})", truncate(body, 200)),
            source: e,
        }
    })?;
    let serde_json::Value::Array(entries) = response.data else {
        tracing::warn!(batch, "catalog response has no data array, skipping batch");
        return Ok(Vec::new());
    };
    let total = entries.len();
    let journals: Vec<CatalogJournal> =
        entries.into_iter().filter_map(CatalogJournal::from_entry).collect();
    if journals.len() < total {
        tracing::debug!(
            batch,
            dropped = total - journals.len(),
            "ignored entries without ISSN or title"
        );
    }
    Ok(journals)
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}
