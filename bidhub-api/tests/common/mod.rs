/// Common test utilities for integration tests
///
/// Two flavors of test context:
///
/// - [`TestContext::lite`]: a router over a lazy (never-connected) pool.
///   Exercises everything that happens before the database: routing, the
///   JSON 404 fallback, auth and capability gating, request validation,
///   rate limiting. Runs without any infrastructure.
/// - [`TestContext::new`]: a real database from `DATABASE_URL`, with
///   migrations applied. Used by the `#[ignore]`d end-to-end tests
///   (`cargo test -- --ignored` with Postgres running).

use axum::body::Body;
use axum::http::Request;
use bidhub_api::app::{build_router, AppState};
use bidhub_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use bidhub_shared::auth::jwt::{create_token, Claims, TokenType};
use bidhub_shared::models::admin::AdminRole;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

/// Secret used by the lite context (32+ bytes, as the server requires)
pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Test context containing the app under test
pub struct TestContext {
    pub app: axum::Router,
    pub db: PgPool,
    pub config: Config,
}

fn test_config(database_url: String) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: DatabaseConfig {
            url: database_url,
            max_connections: 5,
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
    }
}

impl TestContext {
    /// Creates a context whose pool never connects
    ///
    /// Any handler that reaches the database will fail, which is exactly
    /// what the pre-database tests want.
    pub fn lite() -> Self {
        // Port 1 refuses connections immediately
        let config = test_config("postgresql://127.0.0.1:1/bidhub_test".to_string());

        let db = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(std::time::Duration::from_secs(2))
            .connect_lazy(&config.database.url)
            .expect("lazy pool");

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        TestContext { app, db, config }
    }

    /// Creates a context over a real database
    ///
    /// Reads `DATABASE_URL` from the environment, applies migrations, and
    /// builds the full router.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let database_url = std::env::var("DATABASE_URL")?;
        let config = test_config(database_url);

        let db = PgPool::connect(&config.database.url).await?;
        sqlx::migrate!("../migrations").run(&db).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext { app, db, config })
    }

    /// Mints an admin access token signed with the test secret
    pub fn admin_token(&self, admin_id: Uuid, email: &str, role: AdminRole) -> String {
        let claims = Claims::admin(admin_id, email, role, TokenType::Access);
        create_token(&claims, &self.config.jwt.secret).expect("token")
    }

    /// Mints a vendor token bound to an auction
    pub fn vendor_token(&self, invite_id: Uuid, email: &str, auction_id: Uuid) -> String {
        let claims = Claims::vendor(invite_id, email, auction_id);
        create_token(&claims, &self.config.jwt.secret).expect("token")
    }
}

/// Builds a JSON request
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

/// Builds a bodyless request
pub fn bare_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    builder.body(Body::empty()).unwrap()
}

/// Reads a response body as JSON
pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or_else(|_| {
        panic!(
            "Response body was not JSON: {:?}",
            String::from_utf8_lossy(&body)
        )
    })
}
