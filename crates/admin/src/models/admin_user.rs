//! Admin user rows returned by the authentication procedures.

use serde::{Deserialize, Serialize};

use portfolio_admin_core::{AdminUserId, Email};

pub use portfolio_admin_core::AdminRole;

/// An admin account as returned by `authenticate_admin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    #[serde(default, deserialize_with = "super::nullable")]
    pub full_name: String,
    /// Admin's role/permission level.
    pub role: AdminRole,
    /// Whether the account may sign in.
    #[serde(default, deserialize_with = "super::nullable")]
    pub is_active: bool,
}
