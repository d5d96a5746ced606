//! Integration tests for the admin session lifecycle.
//!
//! Sign-in persists a session to the state directory; it survives a restart
//! and disappears once it is 24 hours old.

#![allow(clippy::unwrap_used)]

use chrono::{TimeDelta, Utc};
use serde_json::json;

use portfolio_admin::models::session::keys;
use portfolio_admin::services::AuthError;
use portfolio_admin::storage::KeyValueStore;
use portfolio_admin_core::AdminRole;
use portfolio_admin_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, TestContext, admin_row, secret,
};

#[tokio::test]
async fn test_sign_in_persists_session_across_restart() {
    let tc = TestContext::new().await;
    tc.mount_authenticate(json!([admin_row("super_admin")])).await;

    let before = Utc::now();
    let session = tc
        .ctx
        .auth()
        .authenticate(ADMIN_EMAIL, &secret(ADMIN_PASSWORD))
        .await
        .unwrap();
    assert_eq!(session.role, AdminRole::SuperAdmin);
    assert!(session.login_time >= before && session.login_time <= Utc::now());

    let reopened = tc.reopen();
    let restored = reopened.auth().current_admin().unwrap();
    assert_eq!(restored, session);
    assert_eq!(
        reopened.auth().sessions().expires_at(),
        Some(session.login_time + TimeDelta::hours(24))
    );
}

#[tokio::test]
async fn test_day_old_session_is_dropped_on_read() {
    let tc = TestContext::new().await;
    tc.sign_in("admin").await;

    let sessions = tc.ctx.auth().sessions();
    let mut session = sessions.read().unwrap();
    session.login_time = Utc::now() - TimeDelta::hours(25);
    sessions.save(&session).unwrap();

    assert!(tc.reopen().auth().current_admin().is_none());
    assert_eq!(tc.store().get(keys::ADMIN_SESSION).unwrap(), None);
}

#[tokio::test]
async fn test_hour_old_session_is_kept() {
    let tc = TestContext::new().await;
    tc.sign_in("admin").await;

    let sessions = tc.ctx.auth().sessions();
    let mut session = sessions.read().unwrap();
    session.login_time = Utc::now() - TimeDelta::hours(1);
    sessions.save(&session).unwrap();

    assert!(tc.ctx.auth().current_admin().is_some());
}

#[tokio::test]
async fn test_corrupt_session_file_means_signed_out() {
    let tc = TestContext::new().await;
    tc.store().set(keys::ADMIN_SESSION, "{not json").unwrap();

    assert!(tc.ctx.auth().current_admin().is_none());
    assert!(matches!(
        tc.ctx.auth().require_role(AdminRole::Admin),
        Err(AuthError::NotAuthenticated)
    ));
}

#[tokio::test]
async fn test_sign_out_clears_session() {
    let tc = TestContext::new().await;
    tc.sign_in("admin").await;
    assert!(tc.ctx.auth().current_admin().is_some());

    tc.ctx.auth().sign_out().unwrap();
    assert!(tc.ctx.auth().current_admin().is_none());
    assert!(tc.reopen().auth().current_admin().is_none());
}
