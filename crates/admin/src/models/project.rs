//! AI project records and drafts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portfolio_admin_core::{ProjectCategory, ProjectStatus, RecordId};

use super::{Normalize, WriteKind, flag, nullable, optional_text, order, stamps, string_list, text};
use crate::validation::{Checks, Validate, ValidationErrors};

/// A portfolio project as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
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
    pub status: ProjectStatus,
    #[serde(default, deserialize_with = "nullable")]
    pub category: ProjectCategory,
    #[serde(default, deserialize_with = "nullable")]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub sort_order: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create/update payload for a project.
///
/// After [`Normalize`], every field except the three URLs and `created_at`
/// (on update) is `Some`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub title_en: Option<String>,
    pub title_ar: Option<String>,
    pub description_en: Option<String>,
    pub description_ar: Option<String>,
    pub status: Option<ProjectStatus>,
    pub category: Option<ProjectCategory>,
    pub tech_stack: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub demo_url: Option<String>,
    pub github_url: Option<String>,
    pub is_featured: Option<bool>,
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Project> for ProjectDraft {
    fn from(project: &Project) -> Self {
        Self {
            title_en: Some(project.title_en.clone()),
            title_ar: Some(project.title_ar.clone()),
            description_en: Some(project.description_en.clone()),
            description_ar: Some(project.description_ar.clone()),
            status: Some(project.status),
            category: Some(project.category),
            tech_stack: Some(project.tech_stack.clone()),
            image_url: project.image_url.clone(),
            demo_url: project.demo_url.clone(),
            github_url: project.github_url.clone(),
            is_featured: Some(project.is_featured),
            sort_order: Some(project.sort_order),
            created_at: None,
            updated_at: None,
        }
    }
}

impl Normalize for ProjectDraft {
    fn normalize(self, kind: WriteKind, now: DateTime<Utc>) -> Self {
        let (created_at, updated_at) = stamps(kind, now);
        Self {
            title_en: text(self.title_en),
            title_ar: text(self.title_ar),
            description_en: text(self.description_en),
            description_ar: text(self.description_ar),
            status: Some(self.status.unwrap_or_default()),
            category: Some(self.category.unwrap_or_default()),
            tech_stack: string_list(self.tech_stack),
            image_url: optional_text(self.image_url),
            demo_url: optional_text(self.demo_url),
            github_url: optional_text(self.github_url),
            is_featured: flag(self.is_featured),
            sort_order: order(self.sort_order),
            created_at,
            updated_at,
        }
    }
}

impl Validate for ProjectDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        checks
            .title("title_en", self.title_en.as_ref())
            .title("title_ar", self.title_ar.as_ref())
            .description("description_en", self.description_en.as_ref(), true)
            .description("description_ar", self.description_ar.as_ref(), true)
            .url("image_url", self.image_url.as_ref())
            .url("demo_url", self.demo_url.as_ref())
            .url("github_url", self.github_url.as_ref())
            .sort_order(self.sort_order);
        checks.finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft() -> ProjectDraft {
        ProjectDraft {
            title_en: Some("  Foo  ".into()),
            title_ar: Some("مشروع".into()),
            description_en: Some(" Vision model \n".into()),
            description_ar: Some("وصف".into()),
            demo_url: Some("   ".into()),
            github_url: Some(" https://github.com/example/foo ".into()),
            ..ProjectDraft::default()
        }
    }

    #[test]
    fn test_normalize_trims_and_defaults() {
        let now = Utc::now();
        let out = draft().normalize(WriteKind::Create, now);

        assert_eq!(out.title_en.as_deref(), Some("Foo"));
        assert_eq!(out.description_en.as_deref(), Some("Vision model"));
        assert_eq!(out.sort_order, Some(0));
        assert_eq!(out.tech_stack, Some(vec![]));
        assert_eq!(out.is_featured, Some(false));
        assert_eq!(out.status, Some(ProjectStatus::Planned));
        assert_eq!(out.category, Some(ProjectCategory::MachineLearning));
        assert_eq!(out.demo_url, None);
        assert_eq!(
            out.github_url.as_deref(),
            Some("https://github.com/example/foo")
        );
        assert_eq!(out.created_at, Some(now));
        assert_eq!(out.updated_at, Some(now));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let now = Utc::now();
        for kind in [WriteKind::Create, WriteKind::Update] {
            let once = draft().normalize(kind, now);
            let twice = once.clone().normalize(kind, now);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_update_only_stamps_updated_at() {
        let now = Utc::now();
        let out = draft().normalize(WriteKind::Update, now);
        assert_eq!(out.created_at, None);
        assert_eq!(out.updated_at, Some(now));

        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("created_at").is_none());
        assert!(json["demo_url"].is_null());
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        let errors = ProjectDraft::default().validate().unwrap_err();
        assert_eq!(errors.first().field, "title_en");
        assert_eq!(errors.len(), 4);

        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_validate_urls_and_sort_order() {
        let bad = ProjectDraft {
            demo_url: Some("demo".into()),
            sort_order: Some(1000),
            ..draft()
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.has("demo_url"));
        assert!(errors.has("sort_order"));
    }

    #[test]
    fn test_record_tolerates_nulls() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "id": "6f1c1c5e-7c3a-4a57-9a59-6f0b7f8f6e11",
            "title_en": "Foo",
            "title_ar": null,
            "status": "in_progress",
            "tech_stack": null,
            "sort_order": 3
        }))
        .unwrap();
        assert_eq!(project.title_ar, "");
        assert_eq!(project.status, ProjectStatus::InProgress);
        assert!(project.tech_stack.is_empty());
        assert_eq!(project.category, ProjectCategory::MachineLearning);
    }
}
