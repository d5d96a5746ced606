//! Offered services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portfolio_admin_core::RecordId;

use super::{Normalize, WriteKind, flag, nullable, optional_text, order, stamps, string_list, text};
use crate::validation::{Checks, Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: RecordId,
    #[serde(default, deserialize_with = "nullable")]
    pub title_en: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title_ar: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description_en: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description_ar: String,
    /// Icon name understood by the public site.
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub features: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub sort_order: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDraft {
    pub title_en: Option<String>,
    pub title_ar: Option<String>,
    pub description_en: Option<String>,
    pub description_ar: Option<String>,
    pub icon: Option<String>,
    pub features: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Normalize for ServiceDraft {
    fn normalize(self, kind: WriteKind, now: DateTime<Utc>) -> Self {
        let (created_at, updated_at) = stamps(kind, now);
        Self {
            title_en: text(self.title_en),
            title_ar: text(self.title_ar),
            description_en: text(self.description_en),
            description_ar: text(self.description_ar),
            icon: optional_text(self.icon),
            features: string_list(self.features),
            is_active: flag(self.is_active),
            sort_order: order(self.sort_order),
            created_at,
            updated_at,
        }
    }
}

impl Validate for ServiceDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        checks
            .title("title_en", self.title_en.as_ref())
            .title("title_ar", self.title_ar.as_ref())
            .description("description_en", self.description_en.as_ref(), false)
            .description("description_ar", self.description_ar.as_ref(), false)
            .sort_order(self.sort_order);
        checks.finish()
    }
}
