//! Publication records and drafts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portfolio_admin_core::RecordId;

use super::{Normalize, WriteKind, flag, nullable, optional_text, stamps, text};
use crate::validation::{Checks, Validate, ValidationErrors};

/// Inclusive range of accepted publication years.
pub const YEAR_RANGE: (i64, i64) = (1900, 2100);

/// Kind given to publications without an explicit one.
pub const DEFAULT_PUBLICATION_TYPE: &str = "journal";

/// A paper, article or talk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub id: RecordId,
    #[serde(default, deserialize_with = "nullable")]
    pub title_en: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title_ar: String,
    #[serde(default, deserialize_with = "nullable")]
    pub authors: String,
    #[serde(default, deserialize_with = "nullable")]
    pub venue: String,
    #[serde(default, deserialize_with = "nullable")]
    pub year: i32,
    #[serde(default, deserialize_with = "nullable")]
    pub publication_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub abstract_en: String,
    #[serde(default, deserialize_with = "nullable")]
    pub abstract_ar: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub citations: i32,
    #[serde(default, deserialize_with = "nullable")]
    pub is_featured: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicationDraft {
    pub title_en: Option<String>,
    pub title_ar: Option<String>,
    pub authors: Option<String>,
    pub venue: Option<String>,
    pub year: Option<i32>,
    pub publication_type: Option<String>,
    pub abstract_en: Option<String>,
    pub abstract_ar: Option<String>,
    pub url: Option<String>,
    pub doi: Option<String>,
    pub citations: Option<i32>,
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Normalize for PublicationDraft {
    fn normalize(self, kind: WriteKind, now: DateTime<Utc>) -> Self {
        let (created_at, updated_at) = stamps(kind, now);
        Self {
            title_en: text(self.title_en),
            title_ar: text(self.title_ar),
            authors: text(self.authors),
            venue: text(self.venue),
            // Year is required, so validation has already rejected `None`.
            year: self.year,
            publication_type: optional_text(self.publication_type)
                .or_else(|| Some(DEFAULT_PUBLICATION_TYPE.to_string())),
            abstract_en: text(self.abstract_en),
            abstract_ar: text(self.abstract_ar),
            url: optional_text(self.url),
            doi: optional_text(self.doi),
            citations: Some(self.citations.unwrap_or(0)),
            is_featured: flag(self.is_featured),
            created_at,
            updated_at,
        }
    }
}

impl Validate for PublicationDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        checks
            .title("title_en", self.title_en.as_ref())
            .title("title_ar", self.title_ar.as_ref())
            .required("authors", self.authors.as_ref())
            .description("abstract_en", self.abstract_en.as_ref(), false)
            .description("abstract_ar", self.abstract_ar.as_ref(), false)
            .url("url", self.url.as_ref())
            .range("citations", self.citations.map(i64::from), (0, i64::from(i32::MAX)));
        match self.year {
            Some(year) => checks.range("year", Some(i64::from(year)), YEAR_RANGE),
            None => checks.required("year", None),
        };
        checks.finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft() -> PublicationDraft {
        PublicationDraft {
            title_en: Some("Attention in Arabic NLP".into()),
            title_ar: Some("الانتباه".into()),
            authors: Some("A. Author, B. Author".into()),
            year: Some(2023),
            ..PublicationDraft::default()
        }
    }

    #[test]
    fn test_year_is_required_and_bounded() {
        assert!(draft().validate().is_ok());

        let missing = PublicationDraft {
            year: None,
            ..draft()
        };
        assert_eq!(missing.validate().unwrap_err().first().field, "year");

        let ancient = PublicationDraft {
            year: Some(1850),
            ..draft()
        };
        assert!(ancient.validate().unwrap_err().has("year"));
    }

    #[test]
    fn test_normalize_defaults_type_and_citations() {
        let out = draft().normalize(WriteKind::Create, Utc::now());
        assert_eq!(out.publication_type.as_deref(), Some("journal"));
        assert_eq!(out.citations, Some(0));
        assert_eq!(out.venue.as_deref(), Some(""));
        assert_eq!(out.doi, None);
    }
}
