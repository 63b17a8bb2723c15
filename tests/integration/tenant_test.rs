//! Integration tests for tenant isolation.

mod helpers;

use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use orgguard_database::AccountStore;

use helpers::{Auth, PASSWORD, TestApp};

#[tokio::test]
async fn test_admin_cannot_reach_another_organization() {
    let app = TestApp::new();
    let org1 = app.tenant("one").await;
    let org2 = app.tenant("two").await;
    let auth = Auth::Bearer(&org1.token);
    let base = format!("/api/organizations/{}", org2.organization_id);

    let get = app.request("GET", &base, None, auth).await;
    assert_eq!(get.status, StatusCode::FORBIDDEN);
    assert_eq!(get.error(), "CROSS_TENANT_ACCESS_DENIED");

    let update = app
        .request("PUT", &base, Some(json!({ "name": "Taken over" })), auth)
        .await;
    assert_eq!(update.status, StatusCode::FORBIDDEN);
    assert_eq!(update.error(), "CROSS_TENANT_ACCESS_DENIED");

    let users = app
        .request("GET", &format!("{base}/users"), None, auth)
        .await;
    assert_eq!(users.status, StatusCode::FORBIDDEN);
    assert_eq!(users.error(), "CROSS_TENANT_ACCESS_DENIED");

    let audit = app
        .request("GET", &format!("{base}/audit-logs"), None, auth)
        .await;
    assert_eq!(audit.error(), "CROSS_TENANT_ACCESS_DENIED");

    let delete = app.request("DELETE", &base, None, auth).await;
    assert_eq!(delete.error(), "CROSS_TENANT_ACCESS_DENIED");

    let still_there = app
        .request("GET", &base, None, Auth::Bearer(&org2.token))
        .await;
    assert_eq!(still_there.status, StatusCode::OK);
    assert_ne!(still_there.data()["name"], "Taken over");
}

#[tokio::test]
async fn test_manager_cannot_change_any_organization() {
    let app = TestApp::new();
    let org1 = app.tenant("one").await;
    let org2 = app.tenant("two").await;
    let (_, token) = app.member(&org1, "manager@one.test", "manager").await;

    for org in [&org1, &org2] {
        let response = app
            .request(
                "PUT",
                &format!("/api/organizations/{}", org.organization_id),
                Some(json!({ "is_active": false })),
                Auth::Bearer(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(response.error(), "INSUFFICIENT_ROLE");
    }

    // the organization stays active, so its admin can still log in
    app.login(&org1.admin_email, PASSWORD).await;
}

#[tokio::test]
async fn test_write_key_cannot_update_another_organization() {
    let app = TestApp::new();
    let org1 = app.tenant("one").await;
    let org2 = app.tenant("two").await;
    let (_, key) = app.api_key(&org1, &["write"]).await;

    let foreign = app
        .request(
            "PUT",
            &format!("/api/organizations/{}", org2.organization_id),
            Some(json!({ "address": "Elsewhere" })),
            Auth::ApiKeyHeader(&key),
        )
        .await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);
    assert_eq!(foreign.error(), "CROSS_TENANT_ACCESS_DENIED");

    let own = app
        .request(
            "PUT",
            &format!("/api/organizations/{}", org1.organization_id),
            Some(json!({ "address": "New address" })),
            Auth::ApiKeyHeader(&key),
        )
        .await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.data()["address"], "New address");
}

#[tokio::test]
async fn test_api_key_is_bound_to_its_organization() {
    let app = TestApp::new();
    let org1 = app.tenant("one").await;
    let org2 = app.tenant("two").await;
    let (_, key) = app.api_key(&org1, &["read", "write", "admin"]).await;

    let response = app
        .request(
            "GET",
            &format!("/api/organizations/{}", org2.organization_id),
            None,
            Auth::ApiKeyHeader(&key),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error(), "CROSS_TENANT_ACCESS_DENIED");
}

#[tokio::test]
async fn test_create_user_in_another_organization_is_denied() {
    let app = TestApp::new();
    let org1 = app.tenant("one").await;
    let org2 = app.tenant("two").await;

    let response = app
        .request(
            "POST",
            "/api/users",
            Some(json!({
                "name": "Mole",
                "email": "mole@two.test",
                "password": PASSWORD,
                "organization_id": org2.organization_id,
            })),
            Auth::Bearer(&org1.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error(), "CROSS_TENANT_ACCESS_DENIED");

    let created = AccountStore::find_by_email(&app.store, "mole@two.test")
        .await
        .unwrap();
    assert!(created.is_none());
}

#[tokio::test]
async fn test_accounts_of_another_organization_are_hidden() {
    let app = TestApp::new();
    let org1 = app.tenant("one").await;
    let org2 = app.tenant("two").await;
    let path = format!("/api/users/{}", org2.admin_id);
    let auth = Auth::Bearer(&org1.token);

    let get = app.request("GET", &path, None, auth).await;
    assert_eq!(get.status, StatusCode::FORBIDDEN);
    assert_eq!(get.error(), "CROSS_TENANT_ACCESS_DENIED");

    let update = app
        .request("PUT", &path, Some(json!({ "name": "Renamed" })), auth)
        .await;
    assert_eq!(update.error(), "CROSS_TENANT_ACCESS_DENIED");

    let delete = app.request("DELETE", &path, None, auth).await;
    assert_eq!(delete.error(), "CROSS_TENANT_ACCESS_DENIED");

    let missing = app
        .request("GET", &format!("/api/users/{}", Uuid::new_v4()), None, auth)
        .await;
    assert_eq!(missing.status, get.status);
    assert_eq!(missing.error(), get.error());
}

#[tokio::test]
async fn test_nonexistent_organization_reads_as_foreign() {
    let app = TestApp::new();
    let org1 = app.tenant("one").await;

    let response = app
        .request(
            "GET",
            &format!("/api/organizations/{}", Uuid::new_v4()),
            None,
            Auth::Bearer(&org1.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error(), "CROSS_TENANT_ACCESS_DENIED");
}

#[tokio::test]
async fn test_organization_users_are_listed_per_tenant() {
    let app = TestApp::new();
    let org1 = app.tenant("one").await;
    let _org2 = app.tenant("two").await;
    app.member(&org1, "user@one.test", "user").await;

    let response = app
        .request(
            "GET",
            &format!("/api/organizations/{}/users", org1.organization_id),
            None,
            Auth::Bearer(&org1.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let emails: Vec<&str> = response
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["admin@one.test", "user@one.test"]);
}

#[tokio::test]
async fn test_audit_log_records_own_organization() {
    let app = TestApp::new();
    let org1 = app.tenant("one").await;
    let org2 = app.tenant("two").await;
    app.api_key(&org1, &["read"]).await;
    app.api_key(&org2, &["read"]).await;

    let response = app
        .request(
            "GET",
            &format!("/api/organizations/{}/audit-logs?limit=10", org1.organization_id),
            None,
            Auth::Bearer(&org1.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let entries = response.data().as_array().unwrap();
    let actions: Vec<&str> = entries
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["api_key.create", "organization.found"]);
    assert!(
        entries
            .iter()
            .all(|e| e["organization_id"] == org1.organization_id.as_str())
    );
}
