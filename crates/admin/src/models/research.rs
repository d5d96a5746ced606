//! Research project records and drafts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portfolio_admin_core::RecordId;

use super::{Normalize, WriteKind, flag, nullable, optional_text, order, stamps, string_list, text};
use crate::validation::{Checks, Validate, ValidationErrors};

/// Status given to research without an explicit one.
pub const DEFAULT_RESEARCH_STATUS: &str = "ongoing";

/// A research line as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchProject {
    pub id: RecordId,
    #[serde(default, deserialize_with = "nullable")]
    pub title_en: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title_ar: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description_en: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description_ar: String,
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    #[serde(default, deserialize_with = "nullable")]
    pub collaborators: Vec<String>,
    #[serde(default)]
    pub paper_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub sort_order: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchProjectDraft {
    pub title_en: Option<String>,
    pub title_ar: Option<String>,
    pub description_en: Option<String>,
    pub description_ar: Option<String>,
    pub status: Option<String>,
    pub collaborators: Option<Vec<String>>,
    pub paper_url: Option<String>,
    pub image_url: Option<String>,
    pub is_featured: Option<bool>,
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Normalize for ResearchProjectDraft {
    fn normalize(self, kind: WriteKind, now: DateTime<Utc>) -> Self {
        let (created_at, updated_at) = stamps(kind, now);
        Self {
            title_en: text(self.title_en),
            title_ar: text(self.title_ar),
            description_en: text(self.description_en),
            description_ar: text(self.description_ar),
            status: optional_text(self.status)
                .or_else(|| Some(DEFAULT_RESEARCH_STATUS.to_string())),
            collaborators: string_list(self.collaborators),
            paper_url: optional_text(self.paper_url),
            image_url: optional_text(self.image_url),
            is_featured: flag(self.is_featured),
            sort_order: order(self.sort_order),
            created_at,
            updated_at,
        }
    }
}

impl Validate for ResearchProjectDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        checks
            .title("title_en", self.title_en.as_ref())
            .title("title_ar", self.title_ar.as_ref())
            .description("description_en", self.description_en.as_ref(), false)
            .description("description_ar", self.description_ar.as_ref(), false)
            .url("paper_url", self.paper_url.as_ref())
            .url("image_url", self.image_url.as_ref())
            .sort_order(self.sort_order);
        checks.finish()
    }
}
