//! End-to-end tests for the portfolio admin dashboard.
//!
//! Every test runs a full [`AdminContext`] against a `wiremock` server that
//! speaks the backend's REST dialect, with client-side state in a temporary
//! directory.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p portfolio-admin-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session_lifecycle` - sign-in, persistence, expiry, sign-out
//! - `auth_flows` - rejected sign-in, password change, admin creation
//! - `content_crud` - normalization, validation, ordering, error messages
//! - `query_cache` - caching, invalidation, retry

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use portfolio_admin::AdminContext;
use portfolio_admin::config::{AdminConfig, BackendConfig, LogFormat, QueryConfig};
use portfolio_admin::session::DEFAULT_SESSION_TTL;
use portfolio_admin::storage::{FileStore, KeyValueStore};

pub const TABLE_SUFFIX: &str = "_ksp2024";
pub const ADMIN_ID: &str = "3b8f5b8e-2b1c-4d9a-8f1e-6c2d7a9e0f41";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "hunter22";

/// A mock backend plus a dashboard wired to it.
pub struct TestContext {
    pub server: MockServer,
    pub ctx: AdminContext,
    state: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_stale_time(Duration::from_secs(300)).await
    }

    pub async fn with_stale_time(stale_time: Duration) -> Self {
        let server = MockServer::start().await;
        let state = TempDir::new().unwrap();
        let ctx = open(&server, state.path(), stale_time);
        Self { server, ctx, state }
    }

    /// A second dashboard sharing this one's backend and state directory,
    /// as after a restart.
    #[must_use]
    pub fn reopen(&self) -> AdminContext {
        open(&self.server, self.state.path(), Duration::from_secs(300))
    }

    /// The on-disk store the dashboard persists into.
    #[must_use]
    pub fn store(&self) -> FileStore {
        FileStore::new(self.state.path())
    }

    pub fn table_path(table: &str) -> String {
        format!("/rest/v1/{table}{TABLE_SUFFIX}")
    }

    pub async fn mount_authenticate(&self, rows: Value) {
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/authenticate_admin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows))
            .mount(&self.server)
            .await;
    }

    /// Sign in as an admin with `role`.
    pub async fn sign_in(&self, role: &str) {
        self.mount_authenticate(json!([admin_row(role)])).await;
        self.ctx
            .auth()
            .authenticate(ADMIN_EMAIL, &secret(ADMIN_PASSWORD))
            .await
            .unwrap();
    }
}

fn open(server: &MockServer, state_dir: &Path, stale_time: Duration) -> AdminContext {
    let config = AdminConfig {
        backend: BackendConfig {
            url: server.uri().parse().unwrap(),
            anon_key: SecretString::from("test-anon-key"),
            table_suffix: TABLE_SUFFIX.to_string(),
        },
        state_dir: state_dir.to_path_buf(),
        session_ttl: DEFAULT_SESSION_TTL,
        query: QueryConfig {
            stale_time,
            max_capacity: 100,
        },
        log_format: LogFormat::Text,
    };
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(state_dir));
    AdminContext::with_store(config, store).unwrap()
}

#[must_use]
pub fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

/// One row as returned by `authenticate_admin`.
#[must_use]
pub fn admin_row(role: &str) -> Value {
    json!({
        "id": ADMIN_ID,
        "email": ADMIN_EMAIL,
        "full_name": "Site Admin",
        "role": role,
        "is_active": true
    })
}

/// A stored project row.
#[must_use]
pub fn project_row(id: &str, title: &str, sort_order: i32) -> Value {
    json!({
        "id": id,
        "title_en": title,
        "title_ar": "مشروع",
        "description_en": "Description",
        "description_ar": "وصف",
        "status": "planned",
        "category": "machine_learning",
        "tech_stack": [],
        "image_url": null,
        "demo_url": null,
        "github_url": null,
        "is_featured": false,
        "sort_order": sort_order,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}
