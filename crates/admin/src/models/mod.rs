//! Domain models for the admin dashboard.
//!
//! Each content domain has a *record* (a row as the backend returns it) and
//! a *draft* (the payload of a create or update). Drafts implement
//! [`Normalize`] so that what goes over the wire is always fully typed:
//! free text trimmed, optional text either meaningful or `null`, and every
//! list, flag and ordering field present.

pub mod admin_user;
pub mod blog;
pub mod category;
pub mod project;
pub mod publication;
pub mod research;
pub mod service;
pub mod session;
pub mod setting;
pub mod testimonial;

pub use admin_user::AdminUser;
pub use blog::{BlogPost, BlogPostDraft};
pub use category::{Category, CategoryDraft};
pub use project::{Project, ProjectDraft};
pub use publication::{Publication, PublicationDraft};
pub use research::{ResearchProject, ResearchProjectDraft};
pub use service::{Service, ServiceDraft};
pub use session::AdminSession;
pub use setting::{SiteSetting, SiteSettingDraft};
pub use testimonial::{Testimonial, TestimonialDraft};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Which kind of write a draft is being prepared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Create,
    Update,
}

/// Fill defaults and tidy free text before a draft is sent.
///
/// Normalizing an already-normalized draft with the same `now` returns it
/// unchanged.
pub trait Normalize: Sized {
    #[must_use]
    fn normalize(self, kind: WriteKind, now: DateTime<Utc>) -> Self;
}

/// Required text: trimmed, missing becomes empty.
pub(crate) fn text(value: Option<String>) -> Option<String> {
    Some(value.map(|v| v.trim().to_string()).unwrap_or_default())
}

/// Optional text: trimmed, blank becomes `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim every entry and drop blanks; missing becomes empty.
pub(crate) fn string_list(value: Option<Vec<String>>) -> Option<Vec<String>> {
    Some(
        value
            .unwrap_or_default()
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect(),
    )
}

pub(crate) fn flag(value: Option<bool>) -> Option<bool> {
    Some(value.unwrap_or(false))
}

pub(crate) fn order(value: Option<i32>) -> Option<i32> {
    Some(value.unwrap_or(0))
}

/// `(created_at, updated_at)` for a write at `now`.
pub(crate) const fn stamps(
    kind: WriteKind,
    now: DateTime<Utc>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    match kind {
        WriteKind::Create => (Some(now), Some(now)),
        WriteKind::Update => (None, Some(now)),
    }
}

/// Deserialize a nullable column into its type's default.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_helpers() {
        assert_eq!(text(Some("  Foo ".into())), Some("Foo".into()));
        assert_eq!(text(None), Some(String::new()));
        assert_eq!(optional_text(Some("   ".into())), None);
        assert_eq!(
            optional_text(Some(" https://x.io ".into())),
            Some("https://x.io".into())
        );
    }

    #[test]
    fn test_list_and_scalar_defaults() {
        assert_eq!(string_list(None), Some(vec![]));
        assert_eq!(
            string_list(Some(vec![" rust ".into(), String::new(), "ml".into()])),
            Some(vec!["rust".into(), "ml".into()])
        );
        assert_eq!(flag(None), Some(false));
        assert_eq!(order(None), Some(0));
        assert_eq!(order(Some(7)), Some(7));
    }

    #[test]
    fn test_stamps_by_kind() {
        let now = Utc::now();
        assert_eq!(stamps(WriteKind::Create, now), (Some(now), Some(now)));
        assert_eq!(stamps(WriteKind::Update, now), (None, Some(now)));
    }
}
