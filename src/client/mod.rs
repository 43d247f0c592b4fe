//! Cache Client Module
//!
//! A small async client for the cache server's HTTP API.
//!
//! ```rust,no_run
//! use lru_kv::client::CacheClient;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lru_kv::client::ClientError> {
//!     let client = CacheClient::new("http://127.0.0.1:3000")?;
//!
//!     client.set("greeting", "hello", Duration::from_secs(60)).await?;
//!     if let Some(value) = client.get("greeting").await? {
//!         println!("{}", String::from_utf8_lossy(&value));
//!     }
//!     client.delete("greeting").await?;
//!     Ok(())
//! }
//! ```

mod error;

use std::time::Duration;

use reqwest::{StatusCode, Url};

use crate::api::TIMEOUT_HEADER;
use crate::models::{DeleteResponse, StatsResponse};

pub use error::ClientError;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for a running cache server.
#[derive(Debug, Clone)]
pub struct CacheClient {
    http: reqwest::Client,
    base: Url,
    timeout: Duration,
}

impl CacheClient {
    /// Creates a client for the server at `base_url` with [`DEFAULT_TIMEOUT`].
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client whose requests give up after `timeout`. The server
    /// is given a slightly shorter deadline, so a slow cache surfaces as its
    /// 504 rather than as a client-side timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base = Url::parse(base_url).map_err(|err| ClientError::InvalidUrl(format!("{base_url}: {err}")))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base,
            timeout,
        })
    }

    /// Fetches a value. `Ok(None)` means the key is absent or expired.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ClientError> {
        let response = self
            .http
            .get(self.endpoint(&["get", key])?)
            .header(TIMEOUT_HEADER, self.server_deadline_ms())
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.bytes().await?.to_vec())),
            _ => Err(ClientError::from_response(response).await),
        }
    }

    /// Stores a value. A zero `ttl` never expires; any other TTL is rounded
    /// up to whole seconds, so it never becomes zero on the wire.
    pub async fn set(
        &self,
        key: &str,
        value: impl Into<Vec<u8>>,
        ttl: Duration,
    ) -> Result<(), ClientError> {
        let response = self
            .http
            .put(self.endpoint(&["set", key])?)
            .query(&[("ttl", ttl_secs(ttl))])
            .header(TIMEOUT_HEADER, self.server_deadline_ms())
            .body(value.into())
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ClientError::from_response(response).await)
        }
    }

    /// Deletes a key. Returns whether it was present.
    pub async fn delete(&self, key: &str) -> Result<bool, ClientError> {
        let response = self
            .http
            .delete(self.endpoint(&["del", key])?)
            .header(TIMEOUT_HEADER, self.server_deadline_ms())
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json::<DeleteResponse>().await?.deleted)
        } else {
            Err(ClientError::from_response(response).await)
        }
    }

    pub async fn stats(&self) -> Result<StatsResponse, ClientError> {
        let response = self
            .http
            .get(self.endpoint(&["stats"])?)
            .header(TIMEOUT_HEADER, self.server_deadline_ms())
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(ClientError::from_response(response).await)
        }
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Deadline forwarded in `x-timeout-ms`: the client timeout less a
    /// tenth, capped at 250 ms of headroom.
    fn server_deadline_ms(&self) -> String {
        let headroom = (self.timeout / 10).min(SERVER_DEADLINE_HEADROOM);
        self.timeout.saturating_sub(headroom).as_millis().to_string()
    }
}

/// Most the server deadline is shortened by, relative to the client timeout.
const SERVER_DEADLINE_HEADROOM: Duration = Duration::from_millis(250);

/// Whole seconds for the `ttl` query parameter, rounding any fraction up.
fn ttl_secs(ttl: Duration) -> u64 {
    let secs = ttl.as_secs();
    if ttl.subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs
    }
}
