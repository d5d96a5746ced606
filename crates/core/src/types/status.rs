//! Role and status enums shared across the admin.

use serde::{Deserialize, Serialize};

/// Admin role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access, including creating other admin accounts.
    SuperAdmin,
    /// Full access to content management.
    Admin,
}

impl AdminRole {
    /// Whether this role carries at least the permissions of `required`.
    #[must_use]
    pub const fn satisfies(self, required: Self) -> bool {
        matches!((self, required), (Self::SuperAdmin, _) | (Self::Admin, Self::Admin))
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid admin role: {s}")),
        }
    }
}

/// Lifecycle of an AI project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
}

impl ProjectStatus {
    /// Every accepted status, in display order.
    pub const ALL: [Self; 3] = [Self::Planned, Self::InProgress, Self::Completed];

    /// Wire value of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid project status: {s}"))
    }
}

/// Field an AI project belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectCategory {
    #[default]
    MachineLearning,
    DeepLearning,
    Nlp,
    ComputerVision,
    DataScience,
    AiResearch,
}

impl ProjectCategory {
    /// Every accepted category, in display order.
    pub const ALL: [Self; 6] = [
        Self::MachineLearning,
        Self::DeepLearning,
        Self::Nlp,
        Self::ComputerVision,
        Self::DataScience,
        Self::AiResearch,
    ];

    /// Wire value of this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MachineLearning => "machine_learning",
            Self::DeepLearning => "deep_learning",
            Self::Nlp => "nlp",
            Self::ComputerVision => "computer_vision",
            Self::DataScience => "data_science",
            Self::AiResearch => "ai_research",
        }
    }
}

impl std::str::FromStr for ProjectCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("invalid project category: {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_role_roundtrip() {
        for role in [AdminRole::SuperAdmin, AdminRole::Admin] {
            assert_eq!(role.to_string().parse::<AdminRole>().unwrap(), role);
        }
        assert!("viewer".parse::<AdminRole>().is_err());
    }

    #[test]
    fn test_admin_role_satisfies() {
        assert!(AdminRole::SuperAdmin.satisfies(AdminRole::Admin));
        assert!(AdminRole::SuperAdmin.satisfies(AdminRole::SuperAdmin));
        assert!(AdminRole::Admin.satisfies(AdminRole::Admin));
        assert!(!AdminRole::Admin.satisfies(AdminRole::SuperAdmin));
    }

    #[test]
    fn test_project_enums_match_wire_values() {
        for status in ProjectStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        for category in ProjectCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn test_project_defaults() {
        assert_eq!(ProjectStatus::default(), ProjectStatus::Planned);
        assert_eq!(ProjectCategory::default(), ProjectCategory::MachineLearning);
        assert!("archived".parse::<ProjectStatus>().is_err());
        assert_eq!("nlp".parse::<ProjectCategory>(), Ok(ProjectCategory::Nlp));
    }
}
