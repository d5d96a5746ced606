//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - sign-in, password change and admin creation via remote procedures
//! - `files` - the object-storage collaborator used for media uploads

pub mod auth;
pub mod files;

pub use auth::{AuthError, AuthService, MIN_PASSWORD_CHARS, PasswordChange, check_new_password};
pub use files::{FileStorage, FileStorageError, UploadFile};
