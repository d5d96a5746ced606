//! Explicitly wired dashboard services.
//!
//! [`AdminContext`] owns one of each collaborator and hands out references;
//! nothing is looked up from global state. Content reads go through the
//! query cache and content writes invalidate the domain's cached reads.

use std::sync::Arc;

use tracing::info;

use portfolio_admin_core::{Language, RecordId};

use crate::backend::BackendClient;
use crate::config::AdminConfig;
use crate::error::AppError;
use crate::gateway::{ContentDomain, ContentRepository, Settings};
use crate::i18n::{self, Translator};
use crate::models::{SiteSetting, SiteSettingDraft};
use crate::query::{MutationOptions, QueryClient, QueryKey};
use crate::services::AuthService;
use crate::session::SessionStore;
use crate::storage::{FileStore, KeyValueStore};

/// Dashboard services shared by every command.
#[derive(Clone)]
pub struct AdminContext {
    inner: Arc<AdminContextInner>,
    translator: Translator,
}

struct AdminContextInner {
    config: AdminConfig,
    client: BackendClient,
    store: Arc<dyn KeyValueStore>,
    auth: AuthService,
    queries: QueryClient,
}

impl std::fmt::Debug for AdminContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminContext")
            .field("config", &self.inner.config)
            .field("language", &self.translator.language())
            .finish_non_exhaustive()
    }
}

impl AdminContext {
    /// Wire everything from configuration, storing state on disk.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the backend client or message table cannot be
    /// built.
    pub fn from_config(config: AdminConfig) -> Result<Self, AppError> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.state_dir));
        Self::with_store(config, store)
    }

    /// Wire everything around a caller-supplied key/value store.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the backend client or message table cannot be
    /// built.
    pub fn with_store(config: AdminConfig, store: Arc<dyn KeyValueStore>) -> Result<Self, AppError> {
        let client = BackendClient::new(&config.backend)?;
        let sessions = SessionStore::new(Arc::clone(&store), config.session_ttl);
        let auth = AuthService::new(client.clone(), sessions);
        let queries = QueryClient::new(&config.query);
        let translator = Translator::new(i18n::load_language(store.as_ref()))?;

        Ok(Self {
            inner: Arc::new(AdminContextInner {
                config,
                client,
                store,
                auth,
                queries,
            }),
            translator,
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn client(&self) -> &BackendClient {
        &self.inner.client
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    #[must_use]
    pub fn queries(&self) -> &QueryClient {
        &self.inner.queries
    }

    #[must_use]
    pub const fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Switch and persist the dashboard language.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the preference cannot be saved.
    pub fn set_language(&mut self, language: Language) -> Result<(), AppError> {
        i18n::save_language(self.inner.store.as_ref(), language)?;
        self.translator = self.translator.with_language(language);
        info!(%language, "Language changed");
        Ok(())
    }

    /// Switch the language of this context only; the saved preference is
    /// left alone.
    pub fn use_language(&mut self, language: Language) {
        self.translator = self.translator.with_language(language);
    }

    /// Uncached CRUD access to a domain.
    #[must_use]
    pub fn content<D: ContentDomain>(&self) -> ContentRepository<'_, D> {
        ContentRepository::new(&self.inner.client)
    }

    /// Cache key of a domain's list.
    #[must_use]
    pub fn list_key<D: ContentDomain>() -> QueryKey {
        QueryKey::root(D::NAME)
    }

    /// Cache key of one record.
    #[must_use]
    pub fn record_key<D: ContentDomain>(id: RecordId) -> QueryKey {
        QueryKey::root(D::NAME).with(id)
    }

    /// Every record of a domain, through the query cache.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Query` if the fetch failed twice.
    pub async fn list<D: ContentDomain>(&self) -> Result<Vec<D::Record>, AppError> {
        let repo = self.content::<D>();
        Ok(self
            .queries()
            .query(Self::list_key::<D>(), || repo.get_all())
            .await?)
    }

    /// One record, through the query cache.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Query` if the fetch failed twice.
    pub async fn get<D: ContentDomain>(&self, id: RecordId) -> Result<D::Record, AppError> {
        let repo = self.content::<D>();
        Ok(self
            .queries()
            .query(Self::record_key::<D>(id), || repo.get_by_id(id))
            .await?)
    }

    /// Create a record and invalidate the domain's cached reads.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Gateway` on validation or backend failure.
    pub async fn create<D: ContentDomain>(&self, draft: D::Draft) -> Result<D::Record, AppError> {
        let repo = self.content::<D>();
        let options = MutationOptions::new().invalidate(Self::list_key::<D>());
        Ok(self.queries().mutate(repo.create(draft), options).await?)
    }

    /// Update a record and invalidate the domain's cached reads.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Gateway` on validation or backend failure.
    pub async fn update<D: ContentDomain>(
        &self,
        id: RecordId,
        draft: D::Draft,
    ) -> Result<D::Record, AppError> {
        let repo = self.content::<D>();
        let options = MutationOptions::new().invalidate(Self::list_key::<D>());
        Ok(self
            .queries()
            .mutate(repo.update(id, draft), options)
            .await?)
    }

    /// One setting by key, through the query cache.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Query` if the fetch failed twice.
    pub async fn setting(&self, key: &str) -> Result<SiteSetting, AppError> {
        let repo = self.content::<Settings>();
        let query_key = Self::list_key::<Settings>().with("key").with(key.trim());
        Ok(self
            .queries()
            .query(query_key, || repo.get_by_key(key))
            .await?)
    }

    /// Create or replace a setting by key and invalidate cached settings.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Gateway` on validation or backend failure.
    pub async fn upsert_setting(&self, draft: SiteSettingDraft) -> Result<SiteSetting, AppError> {
        let repo = self.content::<Settings>();
        let options = MutationOptions::new().invalidate(Self::list_key::<Settings>());
        Ok(self.queries().mutate(repo.upsert(draft), options).await?)
    }

    /// Delete a record and invalidate the domain's cached reads.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Gateway` on backend failure.
    pub async fn delete<D: ContentDomain>(&self, id: RecordId) -> Result<(), AppError> {
        let repo = self.content::<D>();
        let options = MutationOptions::new().invalidate(Self::list_key::<D>());
        Ok(self.queries().mutate(repo.delete(id), options).await?)
    }
}
