//! Integration tests for cached reads and write-driven invalidation.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use portfolio_admin::AdminContext;
use portfolio_admin::gateway::{Projects, Testimonials};
use portfolio_admin::models::TestimonialDraft;
use portfolio_admin::query::{QueryKey, QueryStatus};
use portfolio_admin_core::RecordId;
use portfolio_admin_integration_tests::{TestContext, project_row};

const PROJECT_ID: &str = "6f1c1c5e-7c3a-4a57-9a59-6f0b7f8f6e11";

#[tokio::test]
async fn test_list_cached_then_refetched_after_create() {
    let tc = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path(TestContext::table_path("testimonials")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&tc.server)
        .await;
    Mock::given(method("POST"))
        .and(path(TestContext::table_path("testimonials")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "9a1c1c5e-7c3a-4a57-9a59-6f0b7f8f6e31",
            "client_name": "Dana",
            "content_en": "Great work",
            "content_ar": "عمل رائع",
            "rating": 5
        })))
        .expect(1)
        .mount(&tc.server)
        .await;

    let key = AdminContext::list_key::<Testimonials>();
    assert_eq!(key, QueryKey::from("testimonials"));

    tc.ctx.list::<Testimonials>().await.unwrap();
    tc.ctx.list::<Testimonials>().await.unwrap();
    assert_eq!(tc.ctx.queries().status(&key), QueryStatus::Success);

    let draft = TestimonialDraft {
        client_name: Some("Dana".into()),
        content_en: Some("Great work".into()),
        content_ar: Some("عمل رائع".into()),
        ..TestimonialDraft::default()
    };
    tc.ctx.create::<Testimonials>(draft).await.unwrap();
    assert_eq!(tc.ctx.queries().status(&key), QueryStatus::Idle);

    tc.ctx.list::<Testimonials>().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_reads_share_one_request() {
    let tc = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path(TestContext::table_path("ai_projects")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([project_row(PROJECT_ID, "Foo", 1)]))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&tc.server)
        .await;

    let other = tc.ctx.clone();
    let (a, b) = tokio::join!(tc.ctx.list::<Projects>(), other.list::<Projects>());
    assert_eq!(a.unwrap(), b.unwrap());
}

#[tokio::test]
async fn test_failed_read_retried_once_then_reported() {
    let tc = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path(TestContext::table_path("ai_projects")))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(2)
        .mount(&tc.server)
        .await;

    assert!(tc.ctx.list::<Projects>().await.is_err());
    let key = AdminContext::list_key::<Projects>();
    assert_eq!(tc.ctx.queries().status(&key), QueryStatus::Error);
}

#[tokio::test]
async fn test_expired_entries_are_refetched() {
    let tc = TestContext::with_stale_time(Duration::from_millis(100)).await;
    Mock::given(method("GET"))
        .and(path(TestContext::table_path("ai_projects")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&tc.server)
        .await;

    tc.ctx.list::<Projects>().await.unwrap();
    tokio::time::sleep(Duration::from_millis(250)).await;
    tc.ctx.list::<Projects>().await.unwrap();
}

#[tokio::test]
async fn test_delete_invalidates_list_but_failed_delete_does_not() {
    let tc = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path(TestContext::table_path("ai_projects")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&tc.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(TestContext::table_path("ai_projects")))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": "42501",
            "message": "permission denied for table ai_projects_ksp2024"
        })))
        .expect(1)
        .mount(&tc.server)
        .await;

    let key = AdminContext::list_key::<Projects>();
    tc.ctx.list::<Projects>().await.unwrap();

    let err = tc
        .ctx
        .delete::<Projects>(RecordId::random())
        .await
        .unwrap_err();
    assert_eq!(
        err.user_message(tc.ctx.translator()),
        "permission denied for table ai_projects_ksp2024"
    );
    assert_eq!(tc.ctx.queries().status(&key), QueryStatus::Success);
    tc.ctx.list::<Projects>().await.unwrap();
}
