//! Admin authentication error types.

use thiserror::Error;

use portfolio_admin_core::AdminRole;

use crate::backend::BackendError;
use crate::storage::StorageError;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend found no admin for these credentials.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The backend rejected the current password of a password change.
    #[error("Current password is incorrect")]
    CurrentPasswordIncorrect,

    /// Invalid email format; nothing was sent.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] portfolio_admin_core::EmailError),

    /// The new password is shorter than the minimum.
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    /// The new password and its confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// No valid session.
    #[error("not signed in")]
    NotAuthenticated,

    /// The signed-in admin lacks the required role.
    #[error("requires role {required}")]
    Forbidden { required: AdminRole },

    /// The remote procedure call failed.
    #[error(transparent)]
    Remote(#[from] BackendError),

    /// The session could not be persisted or removed.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Rejections are expected outcomes, as opposed to failures.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::CurrentPasswordIncorrect
                | Self::InvalidEmail(_)
                | Self::PasswordTooShort { .. }
                | Self::PasswordMismatch
        )
    }
}
