//! Verification client: cache, buckets, and the request protocol.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{StatusCode, header};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::cache::{CachedLookup, LookupCache};
use crate::clock::{Clock, SystemClock};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::ratelimit::RateLimitBucket;

/// Requests per window shared by every endpoint; matches the remote policy.
const GLOBAL_LIMIT: u32 = 60;
/// Requests per window on the stricter reverse endpoint.
const REVERSE_LIMIT: u32 = 30;
/// Window length for both buckets.
const WINDOW: Duration = Duration::from_secs(60);
/// Back-off applied when a 429 response carries no retry hint.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(3000);

/// Async client for the verification API.
///
/// Resolves Discord ids to Roblox ids and back. Every answer, including
/// not-found, is cached for the configured TTL, and requests are paced
/// through two fixed-window buckets so the remote limits are not tripped
/// blind. A remote 429 arms the shared bucket, so follow-up lookups fail
/// fast without touching the network.
pub struct VerificationClient {
    http: reqwest::Client,
    base_url: Url,
    config: ClientConfig,
    cache: LookupCache,
    global_bucket: RateLimitBucket,
    reverse_bucket: RateLimitBucket,
    forward_gate: Mutex<()>,
    reverse_gate: Mutex<()>,
}

impl std::fmt::Debug for VerificationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationClient")
            .field("base_url", &self.base_url)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl VerificationClient {
    /// Build a client from `config`.
    ///
    /// Fails when the base URL does not parse or the HTTP client cannot be
    /// constructed.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let cache = LookupCache::new(Duration::from_secs(config.cache_ttl_secs), Arc::clone(&clock));
        let global_bucket = RateLimitBucket::new(GLOBAL_LIMIT, WINDOW, Arc::clone(&clock));
        let reverse_bucket = RateLimitBucket::new(REVERSE_LIMIT, WINDOW, clock);

        Ok(Self {
            http,
            base_url,
            config,
            cache,
            global_bucket,
            reverse_bucket,
            forward_gate: Mutex::new(()),
            reverse_gate: Mutex::new(()),
        })
    }

    /// Resolve the Roblox id verified for `discord_id`.
    ///
    /// `Ok(None)` means the remote service has no verification on record for
    /// this id; that answer is cached like a positive one.
    pub async fn lookup_forward(&self, discord_id: u64) -> Result<Option<u64>> {
        let key = format!("d-{discord_id}");
        if let Some(hit) = self.cache.get(&key) {
            debug!("cache hit for {key}");
            return Ok(hit);
        }

        let _gate = self.forward_gate.lock().await;
        // another caller may have populated the key while we waited
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        self.global_bucket.run()?;
        let resolved = self
            .request(&format!("api/roblox/{discord_id}"), "robloxId")
            .await?;
        self.cache.set(key, resolved);
        Ok(resolved)
    }

    /// Resolve the Discord id whose verification points at `roblox_id`.
    ///
    /// Same contract as [`lookup_forward`](Self::lookup_forward), paced by
    /// the stricter reverse bucket.
    pub async fn lookup_reverse(&self, roblox_id: u64) -> Result<Option<u64>> {
        let key = format!("r-{roblox_id}");
        if let Some(hit) = self.cache.get(&key) {
            debug!("cache hit for {key}");
            return Ok(hit);
        }

        let _gate = self.reverse_gate.lock().await;
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        self.reverse_bucket.run()?;
        let resolved = self
            .request(&format!("api/reverse/{roblox_id}"), "discordId")
            .await?;
        self.cache.set(key, resolved);
        Ok(resolved)
    }

    /// Issue one GET and interpret the response per the API's conventions.
    async fn request(&self, path: &str, id_field: &str) -> Result<CachedLookup> {
        let url = self.base_url.join(path)?;
        if self.config.log_requests {
            debug!("GET {url}");
        }

        let mut request = self.http.get(url);
        if let Some(token) = &self.config.auth_token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await?;
        let status = response.status();
        // the API answers JSON on every status, errors included
        let body: Value = response.json().await?;

        if status.is_success() {
            let id = extract_id(&body, id_field).ok_or_else(|| Error::Api {
                status: status.as_u16(),
                message: format!("response is missing `{id_field}`"),
            })?;
            return Ok(Some(id));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = remote_retry_after(&body).unwrap_or(DEFAULT_RETRY_AFTER);
            warn!(
                "remote rate limit hit, backing off for {}s",
                retry_after.as_secs()
            );
            // remote throttling arms the shared bucket, whichever endpoint
            // tripped it
            self.global_bucket.trigger(retry_after);
            return Err(Error::RateLimited {
                retry_after,
                local: false,
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if let Some(message) = error_message(&body) {
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        Err(Error::UnexpectedStatus {
            status: status.as_u16(),
            body: body.to_string(),
        })
    }
}

/// Pull the resolved id out of a success payload. The API serializes ids as
/// numbers or as decimal strings depending on their size.
fn extract_id(body: &Value, field: &str) -> Option<u64> {
    let value = body.get(field)?;
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

/// Retry hint from a 429 payload, in seconds.
fn remote_retry_after(body: &Value) -> Option<Duration> {
    body.get("error")
        .and_then(|e| e.get("retryAfter"))
        .or_else(|| body.get("retryAfter"))
        .and_then(Value::as_u64)
        .map(Duration::from_secs)
}

/// Best-effort error message from the payload shapes the API is known to use.
fn error_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .or_else(|| body.get("error").and_then(Value::as_str))
        .or_else(|| body.get("message").and_then(Value::as_str))
        .map(str::to_string)
}
