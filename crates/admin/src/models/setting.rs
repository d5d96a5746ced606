//! Site-wide settings, addressed by a unique key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use portfolio_admin_core::RecordId;

use super::{Normalize, WriteKind, nullable, optional_text, stamps, text};
use crate::validation::{Checks, MAX_TITLE_CHARS, Validate, ValidationErrors};

/// Category given to settings without an explicit one.
pub const DEFAULT_SETTING_CATEGORY: &str = "general";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSetting {
    pub id: RecordId,
    #[serde(default, deserialize_with = "nullable")]
    pub key: String,
    #[serde(default)]
    pub value: JsonValue,
    #[serde(default, deserialize_with = "nullable")]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload of a settings write. `key` is the conflict target of upserts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSettingDraft {
    pub key: Option<String>,
    pub value: JsonValue,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SiteSettingDraft {
    #[must_use]
    pub fn new(key: impl Into<String>, value: JsonValue) -> Self {
        Self {
            key: Some(key.into()),
            value,
            ..Self::default()
        }
    }
}

impl Normalize for SiteSettingDraft {
    fn normalize(self, kind: WriteKind, now: DateTime<Utc>) -> Self {
        // The settings table only tracks modification time.
        let (_, updated_at) = stamps(kind, now);
        Self {
            key: text(self.key),
            value: self.value,
            category: optional_text(self.category)
                .or_else(|| Some(DEFAULT_SETTING_CATEGORY.to_string())),
            description: optional_text(self.description),
            updated_at,
        }
    }
}

impl Validate for SiteSettingDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        checks
            .required("key", self.key.as_ref())
            .max_chars("key", self.key.as_ref(), MAX_TITLE_CHARS)
            .description("description", self.description.as_ref(), false);
        checks.finish()
    }
}
