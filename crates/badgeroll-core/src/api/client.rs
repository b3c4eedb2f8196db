//! API client for the hosted `members` table.
//!
//! This module provides the `ApiClient` struct, which speaks the PostgREST
//! dialect exposed by Supabase projects under `/rest/v1`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::RemoteSettings;
use crate::models::{Member, MemberPatch, SortOrder};

use super::{ApiError, MemberDirectory};

// ============================================================================
// Constants
// ============================================================================

/// Path of the member table below the project URL
const MEMBERS_PATH: &str = "rest/v1/members";

/// Maximum number of retries for rate-limited (429) requests.
/// 3 retries with exponential backoff usually succeeds without excessive delay.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Ask PostgREST to echo affected rows so writes can report what changed
const PREFER_REPRESENTATION: &str = "return=representation";

/// Upsert: merge on primary key instead of failing on conflict
const PREFER_UPSERT: &str = "resolution=merge-duplicates,return=representation";

/// API client for the member table.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    members_url: String,
    headers: header::HeaderMap,
    initial_backoff: Duration,
}

impl ApiClient {
    /// Create a client for the given remote
    pub fn new(settings: &RemoteSettings) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            client,
            members_url: Self::members_url(&settings.url),
            headers: Self::auth_headers(&settings.api_key)?,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
        })
    }

    fn members_url(base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), MEMBERS_PATH)
    }

    fn auth_headers(api_key: &str) -> Result<header::HeaderMap, ApiError> {
        let invalid = |_| ApiError::InvalidConfig("access key contains invalid characters".to_string());

        let mut headers = header::HeaderMap::new();
        headers.insert("apikey", header::HeaderValue::from_str(api_key).map_err(invalid)?);
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(invalid)?,
        );
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn id_filter(id: &str) -> (&'static str, String) {
        ("id", format!("eq.{}", id))
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>, ApiError> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            // Rate limited - signal to retry
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Send a request built by `build`, retrying on rate limiting, and decode
    /// the JSON body.
    async fn send<T, F>(&self, method: Method, build: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let mut retries = 0;
        let mut backoff = self.initial_backoff;

        loop {
            let request = self
                .client
                .request(method.clone(), &self.members_url)
                .headers(self.headers.clone());

            let response = build(request).send().await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => return Ok(response.json().await?),
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited);
                    }
                    warn!(method = %method, retry = retries, backoff_ms = backoff.as_millis() as u64, "Rate limited, backing off");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2; // Exponential backoff
                }
            }
        }
    }
}

#[async_trait]
impl MemberDirectory for ApiClient {
    async fn select(&self, order: SortOrder) -> Result<Vec<Member>, ApiError> {
        let order = order.as_query();
        let members: Vec<Member> = self
            .send(Method::GET, |req| req.query(&[("select", "*"), ("order", order.as_str())]))
            .await?;
        debug!(count = members.len(), "Fetched members");
        Ok(members)
    }

    async fn insert(&self, member: &Member) -> Result<Member, ApiError> {
        let body = [member];
        let rows: Vec<Member> = self
            .send(Method::POST, |req| {
                req.header("Prefer", PREFER_REPRESENTATION).json(&body)
            })
            .await?;
        debug!(id = %member.id, "Inserted member");
        Ok(rows.into_iter().next().unwrap_or_else(|| member.clone()))
    }

    async fn update(&self, id: &str, patch: &MemberPatch) -> Result<Option<Member>, ApiError> {
        let filter = Self::id_filter(id);
        let rows: Vec<Member> = self
            .send(Method::PATCH, |req| {
                req.query(&[(filter.0, filter.1.as_str())])
                    .header("Prefer", PREFER_REPRESENTATION)
                    .json(patch)
            })
            .await?;
        debug!(id = id, updated = rows.len(), "Updated member");
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, id: &str) -> Result<bool, ApiError> {
        let filter = Self::id_filter(id);
        let rows: Vec<Member> = self
            .send(Method::DELETE, |req| {
                req.query(&[(filter.0, filter.1.as_str())])
                    .header("Prefer", PREFER_REPRESENTATION)
            })
            .await?;
        debug!(id = id, deleted = rows.len(), "Deleted member");
        Ok(!rows.is_empty())
    }

    async fn upsert(&self, members: &[Member]) -> Result<Vec<Member>, ApiError> {
        if members.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<Member> = self
            .send(Method::POST, |req| req.header("Prefer", PREFER_UPSERT).json(members))
            .await?;
        debug!(sent = members.len(), written = rows.len(), "Upserted members");
        Ok(rows)
    }
}
