//! Admin authentication service.
//!
//! Password checks, hashing and uniqueness all live behind three remote
//! procedures. This service shapes those calls, tells "rejected" apart from
//! "failed", and owns the local session lifecycle.

mod error;

pub use error::AuthError;

use std::time::Duration;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{info, instrument, warn};

use portfolio_admin_core::{AdminRole, Email};

use crate::backend::BackendClient;
use crate::models::{AdminSession, AdminUser};
use crate::session::SessionStore;

const AUTHENTICATE: &str = "authenticate_admin";
const UPDATE_PASSWORD: &str = "update_admin_password";
const CREATE_USER: &str = "create_admin_user";

/// Shortest password accepted for a change or a new account.
pub const MIN_PASSWORD_CHARS: usize = 6;

/// Check a new password and its confirmation before anything is sent.
///
/// # Errors
///
/// Returns `AuthError::PasswordTooShort` or `AuthError::PasswordMismatch`.
pub fn check_new_password(password: &SecretString, confirm: &SecretString) -> Result<(), AuthError> {
    let password = password.expose_secret();
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AuthError::PasswordTooShort {
            min: MIN_PASSWORD_CHARS,
        });
    }
    if password != confirm.expose_secret() {
        return Err(AuthError::PasswordMismatch);
    }
    Ok(())
}

#[derive(Serialize)]
struct AuthenticateParams<'a> {
    p_email: &'a str,
    p_password: &'a str,
}

#[derive(Serialize)]
struct UpdatePasswordParams<'a> {
    p_email: &'a str,
    p_current_password: &'a str,
    p_new_password: &'a str,
}

#[derive(Serialize)]
struct CreateUserParams<'a> {
    p_email: &'a str,
    p_password: &'a str,
    p_full_name: &'a str,
    p_role: AdminRole,
}

/// Raw result of `update_admin_password`.
///
/// The procedure signals a wrong current password with a falsy result
/// rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange(JsonValue);

impl PasswordChange {
    /// `null`, `false`, `0` and `""` mean the change was rejected.
    #[must_use]
    pub fn accepted(&self) -> bool {
        match &self.0 {
            JsonValue::Null => false,
            JsonValue::Bool(b) => *b,
            JsonValue::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            JsonValue::String(s) => !s.is_empty(),
            JsonValue::Array(_) | JsonValue::Object(_) => true,
        }
    }

    /// # Errors
    ///
    /// Returns `AuthError::CurrentPasswordIncorrect` if the change was
    /// rejected.
    pub fn ensure_accepted(self) -> Result<JsonValue, AuthError> {
        if self.accepted() {
            Ok(self.0)
        } else {
            Err(AuthError::CurrentPasswordIncorrect)
        }
    }

    #[must_use]
    pub fn into_inner(self) -> JsonValue {
        self.0
    }
}

/// Admin authentication service.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: BackendClient,
    sessions: SessionStore,
}

impl AuthService {
    #[must_use]
    pub const fn new(client: BackendClient, sessions: SessionStore) -> Self {
        Self { client, sessions }
    }

    #[must_use]
    pub const fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Sign in and persist the resulting session.
    ///
    /// # Errors
    ///
    /// - `AuthError::InvalidEmail` if the email is malformed (nothing is sent)
    /// - `AuthError::InvalidCredentials` if the backend returned no admin
    /// - `AuthError::Remote` if the call failed
    /// - `AuthError::Storage` if the session could not be saved
    #[instrument(skip_all, fields(email = %email))]
    pub async fn authenticate(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AdminSession, AuthError> {
        let email = Email::parse(email)?;
        let params = AuthenticateParams {
            p_email: email.as_str(),
            p_password: password.expose_secret(),
        };

        let rows: Option<Vec<AdminUser>> = self.client.rpc(AUTHENTICATE, &params).await?;
        let Some(user) = rows.unwrap_or_default().into_iter().next() else {
            info!("Sign-in rejected");
            return Err(AuthError::InvalidCredentials);
        };

        let session = AdminSession::from_user(user, Utc::now());
        self.sessions.save(&session)?;
        info!(admin_id = %session.id, role = %session.role, "Admin signed in");
        Ok(session)
    }

    /// Change an admin's password.
    ///
    /// The result is returned verbatim; check [`PasswordChange::accepted`].
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Remote` if the call failed.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn change_password(
        &self,
        email: &str,
        current_password: &SecretString,
        new_password: &SecretString,
    ) -> Result<PasswordChange, AuthError> {
        let params = UpdatePasswordParams {
            p_email: email.trim(),
            p_current_password: current_password.expose_secret(),
            p_new_password: new_password.expose_secret(),
        };
        let result: JsonValue = self.client.rpc(UPDATE_PASSWORD, &params).await?;
        let change = PasswordChange(result);
        if !change.accepted() {
            info!("Password change rejected");
        }
        Ok(change)
    }

    /// Create another admin account.
    ///
    /// Callers are expected to have checked [`Self::require_role`] with
    /// `SuperAdmin` first.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email is malformed, or
    /// `AuthError::Remote` if the call failed.
    #[instrument(skip_all, fields(email = %email, role = %role))]
    pub async fn create_user(
        &self,
        email: &str,
        password: &SecretString,
        full_name: &str,
        role: AdminRole,
    ) -> Result<JsonValue, AuthError> {
        let email = Email::parse(email)?;
        let params = CreateUserParams {
            p_email: email.as_str(),
            p_password: password.expose_secret(),
            p_full_name: full_name.trim(),
            p_role: role,
        };
        let created: JsonValue = self.client.rpc(CREATE_USER, &params).await?;
        info!("Admin user created");
        Ok(created)
    }

    /// The signed-in admin, checking expiry on every call.
    #[must_use]
    pub fn current_admin(&self) -> Option<AdminSession> {
        self.sessions.read()
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the session could not be removed.
    pub fn sign_out(&self) -> Result<(), AuthError> {
        self.sessions.clear()?;
        info!("Admin signed out");
        Ok(())
    }

    /// The signed-in admin, if their role satisfies `required`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` without a valid session, or
    /// `AuthError::Forbidden` if the role is insufficient.
    pub fn require_role(&self, required: AdminRole) -> Result<AdminSession, AuthError> {
        let session = self.current_admin().ok_or(AuthError::NotAuthenticated)?;
        if session.role.satisfies(required) {
            Ok(session)
        } else {
            warn!(admin_id = %session.id, role = %session.role, %required, "Role check failed");
            Err(AuthError::Forbidden { required })
        }
    }

    /// Time left before the stored session expires.
    #[must_use]
    pub fn until_expiry(&self) -> Option<Duration> {
        let expires_at = self.sessions.expires_at()?;
        Some((expires_at - Utc::now()).to_std().unwrap_or(Duration::ZERO))
    }

    /// Sleep until the stored session's expiry instant, then drop it.
    ///
    /// Returns `true` if a session was expired. A session replaced while
    /// waiting (a fresh sign-in) is left alone.
    pub async fn expire_when_due(&self) -> bool {
        let Some(wait) = self.until_expiry() else {
            return false;
        };
        tokio::time::sleep(wait).await;
        if self.sessions.read().is_none() {
            info!("Session expired");
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use crate::config::BackendConfig;
    use crate::models::session::keys;
    use crate::session::DEFAULT_SESSION_TTL;
    use crate::storage::{KeyValueStore, MemoryStore};
    use chrono::TimeDelta;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> (AuthService, MemoryStore) {
        let client = BackendClient::new(&BackendConfig {
            url: server.uri().parse().unwrap(),
            anon_key: SecretString::from("test-anon-key"),
            table_suffix: "_ksp2024".to_string(),
        })
        .unwrap();
        let memory = MemoryStore::new();
        let sessions = SessionStore::new(Arc::new(memory.clone()), DEFAULT_SESSION_TTL);
        (AuthService::new(client, sessions), memory)
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    fn admin_row(role: &str) -> JsonValue {
        json!({
            "id": "3b8f5b8e-2b1c-4d9a-8f1e-6c2d7a9e0f41",
            "email": "admin@example.com",
            "full_name": "Site Admin",
            "role": role,
            "is_active": true
        })
    }

    #[tokio::test]
    async fn test_authenticate_persists_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/authenticate_admin"))
            .and(body_json(json!({
                "p_email": "admin@example.com",
                "p_password": "hunter22"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([admin_row("super_admin")])))
            .expect(1)
            .mount(&server)
            .await;

        let (auth, memory) = service(&server);
        let before = Utc::now();
        let session = auth
            .authenticate(" admin@example.com ", &secret("hunter22"))
            .await
            .unwrap();

        assert_eq!(session.role, AdminRole::SuperAdmin);
        assert!(session.login_time >= before);
        assert!(memory.get(keys::ADMIN_SESSION).unwrap().is_some());
        assert_eq!(auth.current_admin(), Some(session));
    }

    #[tokio::test]
    async fn test_authenticate_accepts_null_columns() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/authenticate_admin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": "3b8f5b8e-2b1c-4d9a-8f1e-6c2d7a9e0f41",
                "email": "admin@example.com",
                "full_name": null,
                "role": "admin",
                "is_active": null
            }])))
            .mount(&server)
            .await;

        let (auth, _memory) = service(&server);
        let session = auth
            .authenticate("admin@example.com", &secret("hunter22"))
            .await
            .unwrap();

        assert_eq!(session.full_name, "");
        assert!(!session.is_active);
        assert_eq!(session.role, AdminRole::Admin);
        assert_eq!(auth.current_admin(), Some(session));
    }

    #[tokio::test]
    async fn test_zero_rows_is_invalid_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/authenticate_admin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let (auth, memory) = service(&server);
        let err = auth
            .authenticate("admin@example.com", &secret("wrong"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(err.is_rejection());
        assert_eq!(memory.get(keys::ADMIN_SESSION).unwrap(), None);
    }

    #[tokio::test]
    async fn test_remote_failure_carries_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/authenticate_admin"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "code": "PGRST202",
                "message": "Could not find the function public.authenticate_admin"
            })))
            .mount(&server)
            .await;

        let (auth, _) = service(&server);
        let err = auth
            .authenticate("admin@example.com", &secret("pw"))
            .await
            .unwrap_err();
        match err {
            AuthError::Remote(BackendError::Remote(remote)) => {
                assert_eq!(remote.code.as_deref(), Some("PGRST202"));
                assert!(remote.message.contains("authenticate_admin"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_email_is_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (auth, _) = service(&server);
        let err = auth.authenticate("nope", &secret("pw")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail(_)));
    }

    #[test]
    fn test_password_change_truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!("")] {
            assert!(!PasswordChange(falsy).accepted());
        }
        for truthy in [json!(true), json!(1), json!("ok"), json!([]), json!({"id": 1})] {
            assert!(PasswordChange(truthy).accepted());
        }
        assert!(matches!(
            PasswordChange(json!(false)).ensure_accepted(),
            Err(AuthError::CurrentPasswordIncorrect)
        ));
    }

    #[test]
    fn test_check_new_password() {
        let secret = |s: &str| SecretString::from(s.to_string());
        assert!(check_new_password(&secret("hunter22"), &secret("hunter22")).is_ok());
        assert!(matches!(
            check_new_password(&secret("short"), &secret("short")),
            Err(AuthError::PasswordTooShort { min: 6 })
        ));
        assert!(matches!(
            check_new_password(&secret("hunter22"), &secret("hunter23")),
            Err(AuthError::PasswordMismatch)
        ));
    }

    #[tokio::test]
    async fn test_change_password_returns_result_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/update_admin_password"))
            .and(body_json(json!({
                "p_email": "admin@example.com",
                "p_current_password": "old",
                "p_new_password": "new-password"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(false)))
            .mount(&server)
            .await;

        let (auth, _) = service(&server);
        let change = auth
            .change_password("admin@example.com", &secret("old"), &secret("new-password"))
            .await
            .unwrap();
        assert!(!change.accepted());
        assert_eq!(change.into_inner(), json!(false));
    }

    #[tokio::test]
    async fn test_create_user_sends_role() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/create_admin_user"))
            .and(body_json(json!({
                "p_email": "new@example.com",
                "p_password": "s3cret-pass",
                "p_full_name": "New Admin",
                "p_role": "admin"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!("4d3c2b1a-0000-4000-8000-000000000001")))
            .expect(1)
            .mount(&server)
            .await;

        let (auth, _) = service(&server);
        let created = auth
            .create_user(
                "new@example.com",
                &secret("s3cret-pass"),
                " New Admin ",
                AdminRole::Admin,
            )
            .await
            .unwrap();
        assert!(created.is_string());
    }

    #[tokio::test]
    async fn test_require_role() {
        let server = MockServer::start().await;
        let (auth, _) = service(&server);
        assert!(matches!(
            auth.require_role(AdminRole::Admin),
            Err(AuthError::NotAuthenticated)
        ));

        let session: AdminSession = serde_json::from_value(json!({
            "id": "3b8f5b8e-2b1c-4d9a-8f1e-6c2d7a9e0f41",
            "email": "admin@example.com",
            "full_name": "Site Admin",
            "role": "admin",
            "is_active": true,
            "login_time": Utc::now()
        }))
        .unwrap();
        auth.sessions().save(&session).unwrap();

        assert!(auth.require_role(AdminRole::Admin).is_ok());
        assert!(matches!(
            auth.require_role(AdminRole::SuperAdmin),
            Err(AuthError::Forbidden {
                required: AdminRole::SuperAdmin
            })
        ));

        auth.sign_out().unwrap();
        assert_eq!(auth.current_admin(), None);
    }

    #[tokio::test]
    async fn test_expire_when_due_clears_session() {
        let server = MockServer::start().await;
        let (auth, memory) = service(&server);
        assert!(!auth.expire_when_due().await);

        let ttl = TimeDelta::from_std(DEFAULT_SESSION_TTL).unwrap();
        let mut session: AdminSession =
            serde_json::from_value(json!({
                "id": "3b8f5b8e-2b1c-4d9a-8f1e-6c2d7a9e0f41",
                "email": "admin@example.com",
                "role": "admin",
                "login_time": Utc::now()
            }))
            .unwrap();
        session.login_time = Utc::now() - ttl + TimeDelta::milliseconds(50);
        auth.sessions().save(&session).unwrap();

        assert!(auth.until_expiry().unwrap() <= Duration::from_millis(50));
        assert!(auth.expire_when_due().await);
        assert_eq!(memory.get(keys::ADMIN_SESSION).unwrap(), None);
    }
}
