//! Client for the hosted relational backend.
//!
//! # Architecture
//!
//! - Row-level CRUD per named table over the backend's REST interface
//!   (PostgREST dialect: `select`, `order`, `col=eq.value` filters)
//! - Stored-procedure style calls via `rpc/{function}`
//! - Every request carries the anonymous API key; no session token is used,
//!   authorization of admin operations happens inside the remote procedures
//! - Errors are passed through uninterpreted: message plus backend code
//!
//! # Example
//!
//! ```rust,ignore
//! use portfolio_admin::backend::{BackendClient, Select, Order};
//!
//! let client = BackendClient::new(&config.backend)?;
//!
//! let rows: Vec<Project> = client
//!     .select("ai_projects", &Select::all().order(Order::asc("sort_order")))
//!     .await?;
//! ```

mod client;
mod query;

pub use client::BackendClient;
pub use query::{Filter, Order, Select};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with an error envelope.
    #[error("{0}")]
    Remote(RemoteError),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BackendError {
    /// Backend-specific error code, if the backend supplied one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Remote(remote) => remote.code.as_deref(),
            _ => None,
        }
    }
}

/// Error envelope returned by the backend for a failed request.
///
/// `code` is a `PostgreSQL` SQLSTATE (e.g. `23505`) or a gateway code
/// (e.g. `PGRST116`); it is never interpreted at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteError {
    /// HTTP status of the failed response.
    #[serde(skip)]
    pub status: u16,
    /// Human-readable message.
    pub message: String,
    /// Backend error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Additional detail supplied by the database.
    #[serde(default)]
    pub details: Option<String>,
    /// Suggested fix supplied by the database.
    #[serde(default)]
    pub hint: Option<String>,
}

impl RemoteError {
    /// Decode an error body, falling back to the raw text as the message.
    pub(crate) fn from_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<Self>(body) {
            Ok(parsed) => Self { status, ..parsed },
            Err(_) => Self {
                status,
                message: if body.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.chars().take(500).collect()
                },
                code: None,
                details: None,
                hint: None,
            },
        }
    }
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}
