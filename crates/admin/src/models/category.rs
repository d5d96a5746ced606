//! Content categories used to group blog posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portfolio_admin_core::RecordId;

use super::{Normalize, WriteKind, nullable, optional_text, stamps, text};
use crate::validation::{Checks, MAX_TITLE_CHARS, Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: RecordId,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub name_ar: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: Option<String>,
    pub name_ar: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Normalize for CategoryDraft {
    fn normalize(self, kind: WriteKind, now: DateTime<Utc>) -> Self {
        let (created_at, updated_at) = stamps(kind, now);
        Self {
            name: text(self.name),
            name_ar: optional_text(self.name_ar),
            slug: optional_text(self.slug).map(|s| s.to_lowercase()),
            description: optional_text(self.description),
            created_at,
            updated_at,
        }
    }
}

impl Validate for CategoryDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        checks
            .title("name", self.name.as_ref())
            .max_chars("name_ar", self.name_ar.as_ref(), MAX_TITLE_CHARS)
            .description("description", self.description.as_ref(), false);
        checks.finish()
    }
}
