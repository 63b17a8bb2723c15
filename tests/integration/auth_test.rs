//! Integration tests for registration, founding and login.

mod helpers;

use chrono::{Duration, Utc};
use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use orgguard_auth::JwtEncoder;
use orgguard_core::config::AuthConfig;
use orgguard_core::types::{AccountId, OrganizationId};
use orgguard_entity::account::AccountRole;

use helpers::{Auth, PASSWORD, TestApp};

#[tokio::test]
async fn test_first_registration_founds_organization() {
    let app = TestApp::new();
    let org = Uuid::new_v4().to_string();

    let response = app.register_founder(&org, "a@x.com").await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.data()["account"]["role"], "admin");
    assert_eq!(response.data()["account"]["email"], "a@x.com");
    assert_eq!(response.data()["organization"]["id"], org.as_str());
    assert_eq!(response.data()["organization"]["is_active"], true);
    assert!(response.data()["account"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_second_founder_is_rejected() {
    let app = TestApp::new();
    let org = Uuid::new_v4().to_string();
    app.register_founder(&org, "first@x.com").await;

    let response = app.register_founder(&org, "second@x.com").await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error(), "FIRST_USER_ALREADY_EXISTS");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_founders_yield_one_admin() {
    let app = TestApp::new();
    let org = Uuid::new_v4().to_string();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let app = app.clone();
            let org = org.clone();
            tokio::spawn(async move {
                app.register_founder(&org, &format!("racer{i}@x.com"))
                    .await
                    .status
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::FORBIDDEN | StatusCode::CONFLICT => {}
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(created, 1);
}

#[tokio::test]
async fn test_self_registration_joins_as_user() {
    let app = TestApp::new();
    let tenant = app.tenant("acme").await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "name": "Joiner",
                "email": "Joiner@Acme.test",
                "password": PASSWORD,
                "organization_id": tenant.organization_id,
            })),
            Auth::None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.data()["role"], "user");
    assert_eq!(response.data()["email"], "joiner@acme.test");
}

#[tokio::test]
async fn test_registration_into_unknown_organization() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "name": "Lost",
                "email": "lost@x.com",
                "password": PASSWORD,
                "organization_id": Uuid::new_v4().to_string(),
            })),
            Auth::None,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_registration_validation() {
    let app = TestApp::new();
    let org = Uuid::new_v4().to_string();

    let bad_email = app
        .request(
            "POST",
            "/api/auth/register/founder",
            Some(json!({
                "name": "X",
                "email": "not-an-email",
                "password": PASSWORD,
                "organization_id": org,
            })),
            Auth::None,
        )
        .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.error(), "VALIDATION_FAILED");

    let short_password = app
        .request(
            "POST",
            "/api/auth/register/founder",
            Some(json!({
                "name": "X",
                "email": "x@x.com",
                "password": "123",
                "organization_id": org,
            })),
            Auth::None,
        )
        .await;
    assert_eq!(short_password.status, StatusCode::BAD_REQUEST);

    let missing_org = app
        .request(
            "POST",
            "/api/auth/register/founder",
            Some(json!({ "name": "X", "email": "x@x.com", "password": PASSWORD })),
            Auth::None,
        )
        .await;
    assert_eq!(missing_org.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_returns_session_details() {
    let app = TestApp::new();
    let tenant = app.tenant("acme").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": tenant.admin_email, "password": PASSWORD })),
            Auth::None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["account_id"], tenant.admin_id.as_str());
    assert_eq!(response.data()["organization_id"], tenant.organization_id.as_str());
    assert_eq!(response.data()["role"], "admin");
    assert!(response.data()["expires_at"].is_string());

    let me = app
        .request("GET", "/api/users/me", None, Auth::Bearer(&tenant.token))
        .await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.data()["id"], tenant.admin_id.as_str());
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_alike() {
    let app = TestApp::new();
    let tenant = app.tenant("acme").await;

    let wrong_password = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": tenant.admin_email, "password": "wrongpassword" })),
            Auth::None,
        )
        .await;
    let unknown_email = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "nobody@acme.test", "password": "wrongpassword" })),
            Auth::None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.error(), "UNAUTHENTICATED");
    assert_eq!(wrong_password.body["message"], "Invalid credentials");
    assert_eq!(wrong_password.status, unknown_email.status);
    assert_eq!(wrong_password.body, unknown_email.body);
}

#[tokio::test]
async fn test_missing_credential() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/users/me", None, Auth::None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_malformed_token() {
    let app = TestApp::new();
    let response = app
        .request("GET", "/api/users/me", None, Auth::Bearer("garbage"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "INVALID_CREDENTIAL_FORMAT");
}

#[tokio::test]
async fn test_token_signed_with_other_secret() {
    let app = TestApp::new();
    let tenant = app.tenant("acme").await;

    let forged = JwtEncoder::new(&AuthConfig {
        jwt_secret: "some-other-secret".to_string(),
        ..AuthConfig::default()
    })
    .issue(
        tenant.admin_id.parse::<AccountId>().unwrap(),
        AccountRole::Admin,
        tenant.organization_id.parse::<OrganizationId>().unwrap(),
    )
    .unwrap();

    let response = app
        .request("GET", "/api/users/me", None, Auth::Bearer(&forged.token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "INVALID_OR_REVOKED_CREDENTIAL");
}

#[tokio::test]
async fn test_expired_token() {
    let app = TestApp::new();
    let tenant = app.tenant("acme").await;

    let stale = JwtEncoder::new(&app.config.auth)
        .issue_at(
            tenant.admin_id.parse::<AccountId>().unwrap(),
            AccountRole::Admin,
            tenant.organization_id.parse::<OrganizationId>().unwrap(),
            Utc::now() - Duration::hours(3),
        )
        .unwrap();

    let response = app
        .request("GET", "/api/users/me", None, Auth::Bearer(&stale.token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "CREDENTIAL_EXPIRED");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/health", None, Auth::None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
}
