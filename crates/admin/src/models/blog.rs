//! Blog post records and drafts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portfolio_admin_core::RecordId;

use super::category::Category;
use super::{Normalize, WriteKind, flag, nullable, optional_text, stamps, string_list, text};
use crate::validation::{Checks, Validate, ValidationErrors};

/// A blog post, with its category embedded when the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: RecordId,
    #[serde(default, deserialize_with = "nullable")]
    pub title_en: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title_ar: String,
    #[serde(default, deserialize_with = "nullable")]
    pub slug: String,
    #[serde(default, deserialize_with = "nullable")]
    pub excerpt_en: String,
    #[serde(default, deserialize_with = "nullable")]
    pub excerpt_ar: String,
    #[serde(default, deserialize_with = "nullable")]
    pub content_en: String,
    #[serde(default, deserialize_with = "nullable")]
    pub content_ar: String,
    #[serde(default)]
    pub category_id: Option<RecordId>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub featured_image_url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub is_published: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub is_featured: bool,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogPostDraft {
    pub title_en: Option<String>,
    pub title_ar: Option<String>,
    pub slug: Option<String>,
    pub excerpt_en: Option<String>,
    pub excerpt_ar: Option<String>,
    pub content_en: Option<String>,
    pub content_ar: Option<String>,
    pub category_id: Option<RecordId>,
    pub featured_image_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_published: Option<bool>,
    pub is_featured: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Lowercase, hyphen-separated form of a title or hand-typed slug.
#[must_use]
pub fn slugify(input: &str) -> String {
    input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

impl Normalize for BlogPostDraft {
    fn normalize(self, kind: WriteKind, now: DateTime<Utc>) -> Self {
        let (created_at, updated_at) = stamps(kind, now);
        let title_en = text(self.title_en);
        let slug = optional_text(self.slug)
            .or_else(|| title_en.clone())
            .map(|s| slugify(&s));
        Self {
            title_en,
            title_ar: text(self.title_ar),
            slug,
            excerpt_en: text(self.excerpt_en),
            excerpt_ar: text(self.excerpt_ar),
            content_en: text(self.content_en),
            content_ar: text(self.content_ar),
            category_id: self.category_id,
            featured_image_url: optional_text(self.featured_image_url),
            tags: string_list(self.tags),
            is_published: flag(self.is_published),
            is_featured: flag(self.is_featured),
            published_at: self.published_at,
            created_at,
            updated_at,
        }
    }
}

impl Validate for BlogPostDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        checks
            .title("title_en", self.title_en.as_ref())
            .title("title_ar", self.title_ar.as_ref())
            .description("excerpt_en", self.excerpt_en.as_ref(), false)
            .description("excerpt_ar", self.excerpt_ar.as_ref(), false)
            .url("featured_image_url", self.featured_image_url.as_ref());
        checks.finish()
    }
}
