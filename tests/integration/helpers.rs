//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use orgguard_api::{AppState, build_app};
use orgguard_core::config::database::MEMORY_STORE_URL;
use orgguard_core::config::{AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, ServerConfig};
use orgguard_database::{MemoryStore, Stores};

pub const PASSWORD: &str = "password123";
pub const JWT_SECRET: &str = "integration-test-secret";

/// Test application context
#[derive(Clone)]
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backing store for direct inspection
    pub store: MemoryStore,
    /// Application config
    pub config: AppConfig,
}

/// How a request authenticates.
#[derive(Debug, Clone, Copy)]
pub enum Auth<'a> {
    None,
    Bearer(&'a str),
    ApiKeyHeader(&'a str),
    ApiKeyQuery(&'a str),
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success body.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `error` code of a failure body.
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

/// A founded organization with a logged-in admin.
#[derive(Debug, Clone)]
pub struct Tenant {
    pub organization_id: String,
    pub admin_id: String,
    pub admin_email: String,
    pub token: String,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: MEMORY_STORE_URL.to_string(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
        },
        auth: AuthConfig {
            jwt_secret: JWT_SECRET.to_string(),
            ..AuthConfig::default()
        },
        logging: LoggingConfig::default(),
    }
}

impl TestApp {
    /// Create a new test application over a fresh in-memory store
    pub fn new() -> Self {
        let config = test_config();
        let store = MemoryStore::new();
        let state = AppState::new(config.clone(), Stores::memory(store.clone()))
            .expect("Failed to build app state");
        let router = build_app(state, &config.server.cors);
        Self {
            router,
            store,
            config,
        }
    }

    /// Send a request and parse the JSON response
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        auth: Auth<'_>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let uri = match auth {
            Auth::ApiKeyQuery(key) if path.contains('?') => format!("{path}&api_key={key}"),
            Auth::ApiKeyQuery(key) => format!("{path}?api_key={key}"),
            _ => path.to_string(),
        };

        let mut req = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json");

        match auth {
            Auth::Bearer(value) => req = req.header("Authorization", format!("Bearer {value}")),
            Auth::ApiKeyHeader(key) => req = req.header("X-API-Key", key),
            Auth::None | Auth::ApiKeyQuery(_) => {}
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Register a founding admin for `organization_id`
    pub async fn register_founder(&self, organization_id: &str, email: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/register/founder",
            Some(json!({
                "name": "Founder",
                "email": email,
                "password": PASSWORD,
                "organization_id": organization_id,
            })),
            Auth::None,
        )
        .await
    }

    /// Log in and return the session token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(json!({ "email": email, "password": password })),
                Auth::None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {:?}", response.body);
        response.data()["token"]
            .as_str()
            .expect("token missing")
            .to_string()
    }

    /// Found a new organization and log its admin in
    pub async fn tenant(&self, label: &str) -> Tenant {
        let organization_id = Uuid::new_v4().to_string();
        let admin_email = format!("admin@{label}.test");
        let response = self.register_founder(&organization_id, &admin_email).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        let token = self.login(&admin_email, PASSWORD).await;
        Tenant {
            admin_id: response.data()["account"]["id"]
                .as_str()
                .expect("account id")
                .to_string(),
            organization_id,
            admin_email,
            token,
        }
    }

    /// Create an account in the tenant's organization and return its session token
    pub async fn member(&self, tenant: &Tenant, email: &str, role: &str) -> (String, String) {
        let response = self
            .request(
                "POST",
                "/api/users",
                Some(json!({
                    "name": "Member",
                    "email": email,
                    "password": PASSWORD,
                    "role": role,
                    "organization_id": tenant.organization_id,
                })),
                Auth::Bearer(&tenant.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        let id = response.data()["id"].as_str().expect("id").to_string();
        (id, self.login(email, PASSWORD).await)
    }

    /// Issue an API key as the tenant admin; returns `(id, key)`
    pub async fn api_key(&self, tenant: &Tenant, permissions: &[&str]) -> (String, String) {
        let response = self
            .request(
                "POST",
                "/api/api-keys",
                Some(json!({ "name": "integration", "permissions": permissions })),
                Auth::Bearer(&tenant.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        (
            response.data()["id"].as_str().expect("id").to_string(),
            response.data()["key"].as_str().expect("key").to_string(),
        )
    }
}
