//! Typed CRUD over the content tables.
//!
//! Every content domain is a [`ContentDomain`]: a table, a record type, a
//! draft type and a canonical list ordering. [`ContentRepository`] provides
//! the same five operations for all of them:
//!
//! - `get_all` - every row, in the domain's ordering
//! - `get_by_id` - one row
//! - `create` / `update` - validate, normalize, then write
//! - `delete` - remove one row
//!
//! Settings additionally support lookup and upsert by key.
//!
//! Backend failures are returned as-is; error codes are never interpreted
//! here.

mod domains;
mod settings;

pub use domains::{
    BlogPosts, Categories, Projects, Publications, ResearchProjects, Services, Settings,
    Testimonials,
};

use std::cmp::Ordering;
use std::marker::PhantomData;

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use portfolio_admin_core::RecordId;

use crate::backend::{BackendClient, BackendError, Filter, Order, Select};
use crate::models::{Normalize, WriteKind};
use crate::validation::{Validate, ValidationErrors};

/// Errors from gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The draft was rejected locally; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The backend call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl GatewayError {
    /// Backend error code, if the backend supplied one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Backend(e) => e.code(),
            Self::Validation(_) => None,
        }
    }
}

/// One category of manageable content.
pub trait ContentDomain: Send + Sync + 'static {
    /// Short name, used as the query-cache root and on the command line.
    const NAME: &'static str;
    /// Table name without the deployment suffix.
    const TABLE: &'static str;
    /// Server-side list ordering.
    const ORDER: &'static [Order];

    type Record: DeserializeOwned + Serialize + Clone + Send + Sync + 'static;
    type Draft: Normalize + Validate + Serialize + DeserializeOwned + Send + Sync;

    /// Local ordering matching [`Self::ORDER`]; applied after every list read.
    fn compare(a: &Self::Record, b: &Self::Record) -> Ordering;

    /// Column list for reads.
    fn columns(_client: &BackendClient) -> String {
        "*".to_string()
    }
}

/// CRUD access to one content domain.
pub struct ContentRepository<'a, D> {
    client: &'a BackendClient,
    _domain: PhantomData<D>,
}

impl<'a, D: ContentDomain> ContentRepository<'a, D> {
    #[must_use]
    pub const fn new(client: &'a BackendClient) -> Self {
        Self {
            client,
            _domain: PhantomData,
        }
    }

    fn table(&self) -> String {
        self.client.table(D::TABLE)
    }

    fn by_id(id: RecordId) -> Filter {
        Filter::eq("id", id)
    }

    /// Every row of the domain, in its canonical order.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Backend` if the read fails.
    #[instrument(skip_all, fields(domain = D::NAME))]
    pub async fn get_all(&self) -> Result<Vec<D::Record>, GatewayError> {
        let select = Select::columns(D::columns(self.client)).order_by(D::ORDER);
        let mut records: Vec<D::Record> = self.client.select(&self.table(), &select).await?;
        // Stable sort keeps the backend's tie order.
        records.sort_by(D::compare);
        debug!(count = records.len(), "Listed records");
        Ok(records)
    }

    /// # Errors
    ///
    /// Returns `GatewayError::Backend` if the row does not exist or the read
    /// fails.
    #[instrument(skip_all, fields(domain = D::NAME, id = %id))]
    pub async fn get_by_id(&self, id: RecordId) -> Result<D::Record, GatewayError> {
        let select = Select::columns(D::columns(self.client)).filter(Self::by_id(id));
        Ok(self.client.select_single(&self.table(), &select).await?)
    }

    /// # Errors
    ///
    /// Returns `GatewayError::Validation` without contacting the backend if
    /// the draft is invalid, or `GatewayError::Backend` if the insert fails.
    #[instrument(skip_all, fields(domain = D::NAME))]
    pub async fn create(&self, draft: D::Draft) -> Result<D::Record, GatewayError> {
        draft.validate()?;
        let row = draft.normalize(WriteKind::Create, Utc::now());
        let record = self.client.insert(&self.table(), &row).await?;
        debug!("Created record");
        Ok(record)
    }

    /// # Errors
    ///
    /// Returns `GatewayError::Validation` without contacting the backend if
    /// the draft is invalid, or `GatewayError::Backend` if the update fails.
    #[instrument(skip_all, fields(domain = D::NAME, id = %id))]
    pub async fn update(&self, id: RecordId, draft: D::Draft) -> Result<D::Record, GatewayError> {
        draft.validate()?;
        let row = draft.normalize(WriteKind::Update, Utc::now());
        let record = self
            .client
            .update(&self.table(), &Self::by_id(id), &row)
            .await?;
        debug!("Updated record");
        Ok(record)
    }

    /// # Errors
    ///
    /// Returns `GatewayError::Backend` if the delete fails.
    #[instrument(skip_all, fields(domain = D::NAME, id = %id))]
    pub async fn delete(&self, id: RecordId) -> Result<(), GatewayError> {
        self.client.delete(&self.table(), &Self::by_id(id)).await?;
        debug!("Deleted record");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use crate::models::ProjectDraft;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> BackendClient {
        BackendClient::new(&BackendConfig {
            url: server.uri().parse().unwrap(),
            anon_key: SecretString::from("test-anon-key"),
            table_suffix: "_ksp2024".to_string(),
        })
        .unwrap()
    }

    fn project(id: &str, sort_order: i32) -> serde_json::Value {
        json!({"id": id, "title_en": format!("p{sort_order}"), "sort_order": sort_order})
    }

    #[tokio::test]
    async fn test_get_all_projects_sorted_by_sort_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/ai_projects_ksp2024"))
            .and(query_param("order", "sort_order.asc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                project("6f1c1c5e-7c3a-4a57-9a59-6f0b7f8f6e13", 3),
                project("6f1c1c5e-7c3a-4a57-9a59-6f0b7f8f6e11", 1),
                project("6f1c1c5e-7c3a-4a57-9a59-6f0b7f8f6e12", 2),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let projects = ContentRepository::<Projects>::new(&client)
            .get_all()
            .await
            .unwrap();
        let order: Vec<i32> = projects.iter().map(|p| p.sort_order).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let client = client(&server);
        let err = ContentRepository::<Projects>::new(&client)
            .create(ProjectDraft::default())
            .await
            .unwrap_err();
        match err {
            GatewayError::Validation(errors) => assert_eq!(errors.first().field, "title_en"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_remote_code_is_passed_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/testimonials_ksp2024"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "code": "42P01",
                "message": "relation \"testimonials_ksp2024\" does not exist"
            })))
            .mount(&server)
            .await;

        let client = client(&server);
        let err = ContentRepository::<Testimonials>::new(&client)
            .get_all()
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some("42P01"));
    }

    #[tokio::test]
    async fn test_blog_reads_embed_category() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/blog_posts_ksp2024"))
            .and(query_param(
                "select",
                "*,category:content_categories_ksp2024(*)",
            ))
            .and(query_param("order", "created_at.desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let posts = ContentRepository::<BlogPosts>::new(&client)
            .get_all()
            .await
            .unwrap();
        assert!(posts.is_empty());
    }
}
