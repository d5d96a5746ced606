//! Client testimonials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portfolio_admin_core::RecordId;

use super::{Normalize, WriteKind, flag, nullable, optional_text, order, stamps, text};
use crate::validation::{Checks, MAX_TITLE_CHARS, Validate, ValidationErrors};

/// Inclusive star-rating range.
pub const RATING_RANGE: (i64, i64) = (1, 5);

/// Rating given to testimonials without an explicit one.
pub const DEFAULT_RATING: i16 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: RecordId,
    #[serde(default, deserialize_with = "nullable")]
    pub client_name: String,
    #[serde(default)]
    pub client_position: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub content_en: String,
    #[serde(default, deserialize_with = "nullable")]
    pub content_ar: String,
    #[serde(default, deserialize_with = "nullable")]
    pub rating: i16,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub sort_order: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestimonialDraft {
    pub client_name: Option<String>,
    pub client_position: Option<String>,
    pub company: Option<String>,
    pub content_en: Option<String>,
    pub content_ar: Option<String>,
    pub rating: Option<i16>,
    pub avatar_url: Option<String>,
    pub is_featured: Option<bool>,
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Normalize for TestimonialDraft {
    fn normalize(self, kind: WriteKind, now: DateTime<Utc>) -> Self {
        let (created_at, updated_at) = stamps(kind, now);
        Self {
            client_name: text(self.client_name),
            client_position: optional_text(self.client_position),
            company: optional_text(self.company),
            content_en: text(self.content_en),
            content_ar: text(self.content_ar),
            rating: Some(self.rating.unwrap_or(DEFAULT_RATING)),
            avatar_url: optional_text(self.avatar_url),
            is_featured: flag(self.is_featured),
            sort_order: order(self.sort_order),
            created_at,
            updated_at,
        }
    }
}

impl Validate for TestimonialDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        checks
            .title("client_name", self.client_name.as_ref())
            .max_chars("client_position", self.client_position.as_ref(), MAX_TITLE_CHARS)
            .description("content_en", self.content_en.as_ref(), true)
            .description("content_ar", self.content_ar.as_ref(), true)
            .range("rating", self.rating.map(i64::from), RATING_RANGE)
            .url("avatar_url", self.avatar_url.as_ref())
            .sort_order(self.sort_order);
        checks.finish()
    }
}
