//! Object storage used for uploaded media.
//!
//! The dashboard only needs two operations from an object store: put a file
//! under a directory and get back its public URL, and delete by that URL.
//! Objects are keyed `{directory}/{unix_millis}-{file_name}` below a public
//! base URL.

use std::future::Future;

use chrono::{DateTime, Utc};
use thiserror::Error;
use url::Url;

/// Directory used when the caller does not name one.
pub const DEFAULT_DIRECTORY: &str = "uploads";

#[derive(Debug, Error)]
pub enum FileStorageError {
    /// The URL does not point below the store's public base URL.
    #[error("not a stored object URL: {0}")]
    ForeignUrl(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The store rejected the request.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A file to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// An object store reachable through public URLs.
pub trait FileStorage: Send + Sync {
    /// Store `file` under `directory` and return its public URL.
    fn upload(
        &self,
        file: UploadFile,
        directory: &str,
    ) -> impl Future<Output = Result<Url, FileStorageError>> + Send;

    /// Delete the object behind a URL previously returned by `upload`.
    fn delete(&self, url: &Url) -> impl Future<Output = Result<bool, FileStorageError>> + Send;
}

/// Object key for a file uploaded at `at`.
#[must_use]
pub fn object_key(directory: &str, file_name: &str, at: DateTime<Utc>) -> String {
    let directory = directory.trim_matches('/');
    let directory = if directory.is_empty() {
        DEFAULT_DIRECTORY
    } else {
        directory
    };
    let name: String = file_name
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();
    format!("{directory}/{}-{name}", at.timestamp_millis())
}

/// Public URL of an object key.
///
/// # Errors
///
/// Returns `FileStorageError::InvalidUrl` if the key does not form a URL.
pub fn public_url(base: &Url, key: &str) -> Result<Url, FileStorageError> {
    let base = if base.path().ends_with('/') {
        base.clone()
    } else {
        let mut base = base.clone();
        base.set_path(&format!("{}/", base.path()));
        base
    };
    Ok(base.join(key)?)
}

/// Object key behind a public URL.
///
/// # Errors
///
/// Returns `FileStorageError::ForeignUrl` if the URL is not below `base`.
pub fn key_from_url(base: &Url, url: &Url) -> Result<String, FileStorageError> {
    let prefix = base.as_str().trim_end_matches('/');
    url.as_str()
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .ok_or_else(|| FileStorageError::ForeignUrl(url.to_string()))
}
