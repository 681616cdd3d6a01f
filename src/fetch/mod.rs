mod basic;
mod cache;
mod client;
mod retry;
pub mod auth;

pub use basic::BasicClient;
pub use cache::{DEFAULT_CACHE_DIR, DEFAULT_CACHE_TTL, ResponseCache};
pub use client::HttpClient;
pub use retry::{Retry, RetryConfig};

use crate::error::FetchError;
use bytes::Bytes;
use tracing::{debug, warn};

/// Issues a GET for `url` and returns the body of a successful response.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Bytes, FetchError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client.execute(req).await.map_err(|source| FetchError::Network {
        url: url.to_string(),
        source,
    })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    resp.bytes().await.map_err(|source| FetchError::Network {
        url: url.to_string(),
        source,
    })
}

/// An [`HttpClient`] paired with an optional [`ResponseCache`].
///
/// Construct one per process and pass it to whatever needs to fetch; the
/// retry policy lives in the client (see [`Retry`]).
pub struct Fetcher<C> {
    client: C,
    cache: Option<ResponseCache>,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns the body for `url`, served from the cache when a fresh entry
    /// exists. Only successful responses are stored.
    ///
    /// Cache I/O failures are logged and otherwise ignored; only the network
    /// fetch can fail the request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, url: &str) -> Result<Bytes, FetchError> {
        if let Some(cache) = &self.cache {
            match cache.get(url).await {
                Ok(Some(body)) => return Ok(body),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Cache read failed, fetching from network"),
            }
        }

        let body = fetch_bytes(&self.client, url).await?;
        debug!(bytes = body.len(), "Fetched response body");

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(url, &body).await {
                warn!(error = %e, "Cache write failed");
            }
        }

        Ok(body)
    }
}
