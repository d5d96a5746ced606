//! Session-related types for admin authentication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portfolio_admin_core::{AdminRole, AdminUserId, Email};

use super::admin_user::AdminUser;

/// The signed-in admin as persisted in client storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    /// Admin's backend ID.
    pub id: AdminUserId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    #[serde(default, deserialize_with = "super::nullable")]
    pub full_name: String,
    /// Admin's role/permission level, exactly as the backend reported it.
    pub role: AdminRole,
    /// Whether the backend considers the account active.
    #[serde(default, deserialize_with = "super::nullable")]
    pub is_active: bool,
    /// When the admin signed in.
    pub login_time: DateTime<Utc>,
}

impl AdminSession {
    /// Build a session for a freshly authenticated admin.
    #[must_use]
    pub fn from_user(user: AdminUser, login_time: DateTime<Utc>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            is_active: user.is_active,
            login_time,
        }
    }
}

/// Client storage keys.
pub mod keys {
    /// Key holding the serialized [`super::AdminSession`].
    pub const ADMIN_SESSION: &str = "admin_session";

    /// Key holding the dashboard language code.
    pub const LANGUAGE: &str = "dashboard-language";
}
