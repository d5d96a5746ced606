//! Key-addressed access to site settings.

use chrono::Utc;
use tracing::{debug, instrument};

use super::{ContentDomain, ContentRepository, GatewayError, Settings};
use crate::backend::Select;
use crate::models::{Normalize, SiteSetting, SiteSettingDraft, WriteKind};
use crate::validation::Validate;

impl ContentRepository<'_, Settings> {
    /// # Errors
    ///
    /// Returns `GatewayError::Backend` if no setting has this key or the
    /// read fails.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn get_by_key(&self, key: &str) -> Result<SiteSetting, GatewayError> {
        let select = Select::all().eq("key", key.trim());
        Ok(self
            .client
            .select_single(&self.table(), &select)
            .await?)
    }

    /// Insert the setting, or overwrite the one with the same key.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Validation` if the draft is invalid, or
    /// `GatewayError::Backend` if the write fails.
    #[instrument(skip_all, fields(key = ?draft.key))]
    pub async fn upsert(&self, draft: SiteSettingDraft) -> Result<SiteSetting, GatewayError> {
        draft.validate()?;
        let row = draft.normalize(WriteKind::Update, Utc::now());
        let setting = self.client.upsert(&self.table(), "key", &row).await?;
        debug!(domain = Settings::NAME, "Upserted setting");
        Ok(setting)
    }
}
