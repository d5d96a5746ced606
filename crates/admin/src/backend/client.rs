//! REST client for the hosted backend.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};
use url::Url;

use crate::config::BackendConfig;

use super::{BackendError, Filter, RemoteError, Select};

/// `Accept` value asking the backend for exactly one row as a JSON object.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Hosted backend REST client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    rest_url: Url,
    anon_key: SecretString,
    table_suffix: String,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("rest_url", &self.inner.rest_url.as_str())
            .field("anon_key", &"[REDACTED]")
            .field("table_suffix", &self.inner.table_suffix)
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::InvalidUrl` if the REST base cannot be derived
    /// from the configured URL.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let mut base = config.url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let rest_url = base.join("rest/v1/")?;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                rest_url,
                anon_key: config.anon_key.clone(),
                table_suffix: config.table_suffix.clone(),
            }),
        })
    }

    /// Full table name for a base name (`ai_projects` -> `ai_projects_ksp2024`).
    #[must_use]
    pub fn table(&self, base: &str) -> String {
        format!("{base}{}", self.inner.table_suffix)
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.inner.rest_url.join(path)?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let key = self.inner.anon_key.expose_secret();
        self.inner
            .client
            .request(method, url)
            .header("apikey", key)
            .header("Authorization", format!("Bearer {key}"))
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, request: RequestBuilder) -> Result<String, BackendError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            let remote = RemoteError::from_body(status.as_u16(), &body);
            tracing::warn!(
                status = %status,
                code = remote.code.as_deref().unwrap_or("-"),
                message = %remote.message,
                "Backend returned an error"
            );
            return Err(BackendError::Remote(remote));
        }

        Ok(body)
    }

    fn parse<T: DeserializeOwned>(body: &str) -> Result<T, BackendError> {
        serde_json::from_str(body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }

    // =========================================================================
    // Table operations
    // =========================================================================

    /// Read all rows matching `select`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the rows cannot be decoded.
    #[instrument(skip_all, fields(table = %table))]
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        select: &Select,
    ) -> Result<Vec<T>, BackendError> {
        let mut url = self.endpoint(table)?;
        select.apply(&mut url);

        let body = self.send(self.request(Method::GET, url)).await?;
        let rows: Vec<T> = Self::parse(&body)?;
        debug!(rows = rows.len(), "Fetched rows");
        Ok(rows)
    }

    /// Read exactly one row matching `select`.
    ///
    /// Zero or several matches surface as a remote error with code `PGRST116`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, no single row matches, or the
    /// row cannot be decoded.
    #[instrument(skip_all, fields(table = %table))]
    pub async fn select_single<T: DeserializeOwned>(
        &self,
        table: &str,
        select: &Select,
    ) -> Result<T, BackendError> {
        let mut url = self.endpoint(table)?;
        select.apply(&mut url);

        let request = self
            .request(Method::GET, url)
            .header("Accept", SINGLE_OBJECT);
        let body = self.send(request).await?;
        Self::parse(&body)
    }

    /// Insert one row and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the stored row cannot be decoded.
    #[instrument(skip_all, fields(table = %table))]
    pub async fn insert<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        table: &str,
        row: &B,
    ) -> Result<T, BackendError> {
        let mut url = self.endpoint(table)?;
        Select::all().apply(&mut url);

        let request = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .header("Accept", SINGLE_OBJECT)
            .json(row);
        let body = self.send(request).await?;
        Self::parse(&body)
    }

    /// Update the row matching `filter` and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, no row matches, or the stored
    /// row cannot be decoded.
    #[instrument(skip_all, fields(table = %table, filter = %filter.value))]
    pub async fn update<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        table: &str,
        filter: &Filter,
        changes: &B,
    ) -> Result<T, BackendError> {
        let mut url = self.endpoint(table)?;
        filter.apply(&mut url);
        url.query_pairs_mut().append_pair("select", "*");

        let request = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .header("Accept", SINGLE_OBJECT)
            .json(changes);
        let body = self.send(request).await?;
        Self::parse(&body)
    }

    /// Insert a row, or merge it into the row sharing its `on_conflict` column.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the stored row cannot be decoded.
    #[instrument(skip_all, fields(table = %table, on_conflict = %on_conflict))]
    pub async fn upsert<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        table: &str,
        on_conflict: &str,
        row: &B,
    ) -> Result<T, BackendError> {
        let mut url = self.endpoint(table)?;
        url.query_pairs_mut()
            .append_pair("on_conflict", on_conflict)
            .append_pair("select", "*");

        let request = self
            .request(Method::POST, url)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .header("Accept", SINGLE_OBJECT)
            .json(row);
        let body = self.send(request).await?;
        Self::parse(&body)
    }

    /// Delete the rows matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all, fields(table = %table, filter = %filter.value))]
    pub async fn delete(&self, table: &str, filter: &Filter) -> Result<(), BackendError> {
        let mut url = self.endpoint(table)?;
        filter.apply(&mut url);

        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    // =========================================================================
    // Remote procedures
    // =========================================================================

    /// Call a remote procedure with named parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or its result cannot be decoded.
    #[instrument(skip_all, fields(function = %function))]
    pub async fn rpc<P: Serialize + Sync, T: DeserializeOwned>(
        &self,
        function: &str,
        params: &P,
    ) -> Result<T, BackendError> {
        let url = self.endpoint(&format!("rpc/{function}"))?;

        let request = self.request(Method::POST, url).json(params);
        let body = self.send(request).await?;
        if body.trim().is_empty() {
            // `void` procedures answer 204 with no body
            return Self::parse("null");
        }
        Self::parse(&body)
    }
}
