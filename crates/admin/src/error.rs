//! Unified error handling for admin.
//!
//! Lower layers pass backend error codes through untouched. This is the
//! layer that turns them, and every other failure, into a message an admin
//! can act on, in the dashboard's current language.

use std::sync::Arc;

use thiserror::Error;

use crate::backend::{BackendError, RemoteError};
use crate::config::ConfigError;
use crate::gateway::GatewayError;
use crate::i18n::{I18nError, Translator};
use crate::services::AuthError;
use crate::storage::StorageError;
use crate::validation::{Rule, ValidationErrors, ValidationIssue};

/// Application-level error type for the admin dashboard.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A gateway failure shared between every waiter of a cached query.
    #[error(transparent)]
    Query(Arc<GatewayError>),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    I18n(#[from] I18nError),

    /// Bad input from the caller, outside draft validation.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<Arc<GatewayError>> for AppError {
    fn from(err: Arc<GatewayError>) -> Self {
        Self::Query(err)
    }
}

impl AppError {
    /// Backend error code, if any layer carried one up.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Backend(e) | Self::Auth(AuthError::Remote(e)) => e.code(),
            Self::Gateway(e) => e.code(),
            Self::Query(e) => e.code(),
            _ => None,
        }
    }

    /// A translated message suitable for showing to the admin.
    #[must_use]
    pub fn user_message(&self, t: &Translator) -> String {
        match self {
            Self::Backend(e) | Self::Auth(AuthError::Remote(e)) => backend_message(e, t),
            Self::Gateway(e) => gateway_message(e, t),
            Self::Query(e) => gateway_message(e, t),
            Self::Auth(e) => auth_message(e, t),
            _ => self.to_string(),
        }
    }
}

fn gateway_message(err: &GatewayError, t: &Translator) -> String {
    match err {
        GatewayError::Validation(errors) => validation_message(errors.first(), t),
        GatewayError::Backend(e) => backend_message(e, t),
    }
}

fn auth_message(err: &AuthError, t: &Translator) -> String {
    let key = match err {
        AuthError::InvalidCredentials => "auth.invalid_credentials",
        AuthError::CurrentPasswordIncorrect => "auth.current_password_incorrect",
        AuthError::InvalidEmail(_) => "auth.invalid_email",
        AuthError::PasswordTooShort { min } => {
            return t.t_with("auth.password_too_short", &[("min", &min.to_string())]);
        }
        AuthError::PasswordMismatch => "auth.passwords_dont_match",
        AuthError::NotAuthenticated => "auth.not_signed_in",
        AuthError::Forbidden { .. } => "auth.forbidden",
        AuthError::Remote(e) => return backend_message(e, t),
        AuthError::Storage(e) => return e.to_string(),
    };
    t.t(key).to_string()
}

fn backend_message(err: &BackendError, t: &Translator) -> String {
    match err {
        BackendError::Remote(remote) => remote_message(remote, t),
        BackendError::RateLimited(seconds) => {
            t.t_with("error.rate_limited", &[("seconds", &seconds.to_string())])
        }
        BackendError::Http(_) => t.t("error.network").to_string(),
        BackendError::Parse(_) | BackendError::InvalidUrl(_) => t.t("error.unexpected").to_string(),
    }
}

/// Friendly text for well-known backend codes; the raw message otherwise.
fn remote_message(remote: &RemoteError, t: &Translator) -> String {
    let key = match remote.code.as_deref() {
        Some("PGRST116") => Some("error.table_not_found"),
        Some("42P01") => Some("error.table_missing"),
        Some("23505") => Some("error.duplicate_entry"),
        _ if remote.message.contains("column") => Some("error.schema"),
        _ => None,
    };
    key.map_or_else(|| remote.message.clone(), |key| t.t(key).to_string())
}

/// Translated text for one validation issue.
#[must_use]
pub fn validation_message(issue: &ValidationIssue, t: &Translator) -> String {
    let label_key = format!("field.{}", issue.field);
    let field = t.get(&label_key).unwrap_or(issue.field);
    let key = issue.rule.message_key();
    match issue.rule {
        Rule::Required | Rule::InvalidUrl => t.t_with(key, &[("field", field)]),
        Rule::TooLong { max } => t.t_with(key, &[("field", field), ("max", &max.to_string())]),
        Rule::OutOfRange { min, max } => t.t_with(
            key,
            &[
                ("field", field),
                ("min", &min.to_string()),
                ("max", &max.to_string()),
            ],
        ),
    }
}

/// Translated text for every validation issue, in order.
#[must_use]
pub fn validation_messages(errors: &ValidationErrors, t: &Translator) -> Vec<String> {
    errors
        .issues()
        .iter()
        .map(|issue| validation_message(issue, t))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::ProjectDraft;
    use crate::validation::Validate;
    use portfolio_admin_core::Language;

    fn remote(code: Option<&str>, message: &str) -> AppError {
        AppError::Backend(BackendError::Remote(RemoteError {
            status: 400,
            message: message.to_string(),
            code: code.map(str::to_string),
            details: None,
            hint: None,
        }))
    }

    #[test]
    fn test_known_codes_get_friendly_messages() {
        let t = Translator::new(Language::En).unwrap();
        assert_eq!(
            remote(Some("PGRST116"), "JSON object requested").user_message(&t),
            "Table not found. Please check database setup."
        );
        assert_eq!(
            remote(Some("42P01"), "relation does not exist").user_message(&t),
            "Database table does not exist."
        );
        assert_eq!(
            remote(Some("23505"), "duplicate key").user_message(&t),
            "Duplicate entry detected."
        );
        assert_eq!(
            remote(Some("PGRST204"), "Could not find the 'foo' column").user_message(&t),
            "Database schema error. Please contact administrator."
        );
        assert_eq!(
            remote(None, "permission denied").user_message(&t),
            "permission denied"
        );
    }

    #[test]
    fn test_code_survives_wrapping() {
        let err = remote(Some("23505"), "duplicate key");
        assert_eq!(err.code(), Some("23505"));
    }

    #[test]
    fn test_validation_message_uses_field_label() {
        let t = Translator::new(Language::En).unwrap();
        let errors = ProjectDraft::default().validate().unwrap_err();
        let err = AppError::Gateway(GatewayError::Validation(errors.clone()));
        assert_eq!(err.user_message(&t), "English Title is required");
        assert_eq!(validation_messages(&errors, &t).len(), 4);

        let ar = t.with_language(Language::Ar);
        assert_eq!(err.user_message(&ar), "العنوان الإنجليزي مطلوب");
    }

    #[test]
    fn test_auth_rejections_are_translated() {
        let t = Translator::new(Language::Ar).unwrap();
        let err = AppError::Auth(AuthError::CurrentPasswordIncorrect);
        assert_eq!(err.user_message(&t), "كلمة المرور الحالية غير صحيحة");

        let en = t.with_language(Language::En);
        let err = AppError::Auth(AuthError::PasswordTooShort { min: 6 });
        assert_eq!(err.user_message(&en), "Password must be at least 6 characters");
    }
}
