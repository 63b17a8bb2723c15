//! Integration tests for API key authentication and lifecycle.

mod helpers;

use chrono::{Duration, Utc};
use http::StatusCode;
use serde_json::json;

use orgguard_core::types::{AccountId, OrganizationId};
use orgguard_database::{ApiKeyStore, OrganizationStore};
use orgguard_entity::api_key::{ApiKeyPermission, CreateApiKey};
use orgguard_entity::organization::UpdateOrganization;

use helpers::{Auth, TestApp};

#[tokio::test]
async fn test_read_write_key_cannot_manage_keys() {
    let app = TestApp::new();
    let tenant = app.tenant("acme").await;
    let (_, key) = app.api_key(&tenant, &["read", "write"]).await;

    let org = app
        .request(
            "GET",
            &format!("/api/organizations/{}", tenant.organization_id),
            None,
            Auth::ApiKeyHeader(&key),
        )
        .await;
    assert_eq!(org.status, StatusCode::OK);
    assert_eq!(org.data()["id"], tenant.organization_id.as_str());

    let listing = app
        .request("GET", "/api/api-keys", None, Auth::ApiKeyHeader(&key))
        .await;
    assert_eq!(listing.status, StatusCode::FORBIDDEN);
    assert_eq!(listing.error(), "INSUFFICIENT_PERMISSION");
}

#[tokio::test]
async fn test_key_is_accepted_from_every_source() {
    let app = TestApp::new();
    let tenant = app.tenant("acme").await;
    let (_, key) = app.api_key(&tenant, &["read"]).await;
    let path = format!("/api/organizations/{}", tenant.organization_id);

    for auth in [
        Auth::ApiKeyHeader(&key),
        Auth::Bearer(&key),
        Auth::ApiKeyQuery(&key),
    ] {
        let response = app.request("GET", &path, None, auth).await;
        assert_eq!(response.status, StatusCode::OK, "{auth:?}");
    }
}

#[tokio::test]
async fn test_listing_hides_key_values() {
    let app = TestApp::new();
    let tenant = app.tenant("acme").await;
    let (id, key) = app.api_key(&tenant, &["admin"]).await;
    assert_eq!(key.len(), 64);

    let listing = app
        .request("GET", "/api/api-keys", None, Auth::Bearer(&tenant.token))
        .await;
    assert_eq!(listing.status, StatusCode::OK);

    let entries = listing.data().as_array().unwrap();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry["id"], id.as_str());
    assert!(entry.get("key").is_none());
    let prefix = entry["key_prefix"].as_str().unwrap();
    assert_eq!(prefix.len(), 15);
    assert!(prefix.ends_with("..."));
    assert!(key.starts_with(prefix.trim_end_matches("...")));
    assert!(!listing.body.to_string().contains(&key));
}

#[tokio::test]
async fn test_rotation_invalidates_old_value() {
    let app = TestApp::new();
    let tenant = app.tenant("acme").await;
    let (id, old_key) = app.api_key(&tenant, &["read"]).await;

    let rotated = app
        .request(
            "PUT",
            &format!("/api/api-keys/{id}/rotate"),
            None,
            Auth::Bearer(&tenant.token),
        )
        .await;
    assert_eq!(rotated.status, StatusCode::OK);
    assert_eq!(rotated.data()["id"], id.as_str());
    let new_key = rotated.data()["key"].as_str().unwrap().to_string();
    assert_ne!(new_key, old_key);

    let path = format!("/api/organizations/{}", tenant.organization_id);
    let stale = app
        .request("GET", &path, None, Auth::ApiKeyHeader(&old_key))
        .await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);
    assert_eq!(stale.error(), "INVALID_OR_REVOKED_CREDENTIAL");

    let fresh = app
        .request("GET", &path, None, Auth::ApiKeyHeader(&new_key))
        .await;
    assert_eq!(fresh.status, StatusCode::OK);
}

#[tokio::test]
async fn test_revocation_is_final() {
    let app = TestApp::new();
    let tenant = app.tenant("acme").await;
    let (id, key) = app.api_key(&tenant, &["read"]).await;
    let path = format!("/api/api-keys/{id}");

    let revoked = app
        .request("DELETE", &path, None, Auth::Bearer(&tenant.token))
        .await;
    assert_eq!(revoked.status, StatusCode::OK);
    assert_eq!(revoked.data()["id"], id.as_str());
    assert!(revoked.data()["revoked_at"].is_string());

    let again = app
        .request("DELETE", &path, None, Auth::Bearer(&tenant.token))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);

    let rotate = app
        .request(
            "PUT",
            &format!("{path}/rotate"),
            None,
            Auth::Bearer(&tenant.token),
        )
        .await;
    assert_eq!(rotate.status, StatusCode::NOT_FOUND);

    let used = app
        .request(
            "GET",
            &format!("/api/organizations/{}", tenant.organization_id),
            None,
            Auth::ApiKeyHeader(&key),
        )
        .await;
    assert_eq!(used.status, StatusCode::UNAUTHORIZED);
    assert_eq!(used.error(), "INVALID_OR_REVOKED_CREDENTIAL");

    let listing = app
        .request("GET", "/api/api-keys", None, Auth::Bearer(&tenant.token))
        .await;
    assert_eq!(listing.data().as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_malformed_and_unknown_keys() {
    let app = TestApp::new();
    let tenant = app.tenant("acme").await;
    let path = format!("/api/organizations/{}", tenant.organization_id);

    let malformed = app
        .request("GET", &path, None, Auth::ApiKeyHeader("short"))
        .await;
    assert_eq!(malformed.status, StatusCode::UNAUTHORIZED);
    assert_eq!(malformed.error(), "INVALID_CREDENTIAL_FORMAT");

    let unknown = "ab".repeat(32);
    let response = app
        .request("GET", &path, None, Auth::ApiKeyHeader(&unknown))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "INVALID_OR_REVOKED_CREDENTIAL");
}

#[tokio::test]
async fn test_expired_key() {
    let app = TestApp::new();
    let tenant = app.tenant("acme").await;

    let key = "cd".repeat(32);
    ApiKeyStore::create(
        &app.store,
        &CreateApiKey {
            key: key.clone(),
            organization_id: tenant.organization_id.parse::<OrganizationId>().unwrap(),
            created_by: tenant.admin_id.parse::<AccountId>().unwrap(),
            name: "stale".to_string(),
            permissions: vec![ApiKeyPermission::Read],
            expires_at: Some(Utc::now() - Duration::minutes(5)),
        },
    )
    .await
    .unwrap();

    let response = app
        .request(
            "GET",
            &format!("/api/organizations/{}", tenant.organization_id),
            None,
            Auth::ApiKeyHeader(&key),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "CREDENTIAL_EXPIRED");
}

#[tokio::test]
async fn test_inactive_organization_rejects_keys() {
    let app = TestApp::new();
    let tenant = app.tenant("acme").await;
    let (_, key) = app.api_key(&tenant, &["read"]).await;

    OrganizationStore::update(
        &app.store,
        tenant.organization_id.parse::<OrganizationId>().unwrap(),
        &UpdateOrganization {
            is_active: Some(false),
            ..UpdateOrganization::default()
        },
    )
    .await
    .unwrap();

    let response = app
        .request(
            "GET",
            &format!("/api/organizations/{}", tenant.organization_id),
            None,
            Auth::ApiKeyHeader(&key),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error(), "ORGANIZATION_INACTIVE");
}

#[tokio::test]
async fn test_unknown_permission_is_rejected() {
    let app = TestApp::new();
    let tenant = app.tenant("acme").await;

    let response = app
        .request(
            "POST",
            "/api/api-keys",
            Some(json!({ "name": "bad", "permissions": ["read", "superuser"] })),
            Auth::Bearer(&tenant.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_user_role_cannot_issue_keys() {
    let app = TestApp::new();
    let tenant = app.tenant("acme").await;
    let (_, token) = app.member(&tenant, "user@acme.test", "user").await;

    let response = app
        .request(
            "POST",
            "/api/api-keys",
            Some(json!({ "name": "mine", "permissions": ["read"] })),
            Auth::Bearer(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error(), "INSUFFICIENT_ROLE");
}

#[tokio::test]
async fn test_manager_issues_keys_for_own_organization() {
    let app = TestApp::new();
    let tenant = app.tenant("acme").await;
    let (_, token) = app.member(&tenant, "manager@acme.test", "manager").await;

    let response = app
        .request(
            "POST",
            "/api/api-keys",
            Some(json!({ "name": "ci-pipeline", "permissions": ["read"] })),
            Auth::Bearer(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(
        response.data()["organization_id"],
        tenant.organization_id.as_str()
    );
    assert_eq!(response.data()["permissions"], json!(["read"]));
}
