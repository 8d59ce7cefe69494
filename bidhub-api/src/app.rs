/// Application state and router builder
///
/// This module defines the shared application state and builds the axum
/// router with all routes and middleware.
///
/// # Router layout
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// └── /v1/
///     ├── /auth/                       # Admin authentication (public, rate limited)
///     │   ├── POST /register
///     │   ├── POST /login
///     │   └── POST /refresh
///     ├── /vendor/                     # Invite code redemption (public, rate limited)
///     │   ├── POST /validate
///     │   └── POST /access
///     ├── /admins                      # Account management (JWT)
///     ├── /auctions                    # Auction CRUD (JWT)
///     └── /auctions/:id/...            # Invites, bids, rank, events (JWT)
/// ```
///
/// Unknown routes fall through to a JSON 404 so clients never have to
/// parse HTML error pages.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Security headers
/// 2. CORS (tower-http CorsLayer)
/// 3. Logging (tower-http TraceLayer)
/// 4. Authentication / rate limiting (per-route-group)

use crate::{
    config::Config,
    error::ApiError,
    middleware::{rate_limit, security::SecurityHeadersLayer},
};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post},
    Router,
};
use bidhub_shared::{
    auth::{
        jwt::{self, TokenType},
        middleware::{bearer_token, AuthContext},
    },
    events::EventHub,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Auction change event hub
    pub events: EventHub,

    /// Rate limiter for credential endpoints
    pub rate_limiter: Arc<rate_limit::RateLimiter>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            events: EventHub::default(),
            rate_limiter: Arc::new(rate_limit::RateLimiter::default()),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Admin authentication (public, rate limited)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_layer,
        ));

    // Vendor invite redemption (public, rate limited)
    let vendor_routes = Router::new()
        .route("/validate", post(routes::vendor::validate_invite))
        .route("/access", post(routes::vendor::access_auction))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_layer,
        ));

    // Everything below requires a valid token (admin or vendor); handlers
    // run their own capability / auction-binding checks
    let protected_routes = Router::new()
        .route(
            "/admins",
            get(routes::admins::list_admins).post(routes::admins::create_admin),
        )
        .route("/admins/:id", delete(routes::admins::delete_admin))
        .route(
            "/auctions",
            get(routes::auctions::list_auctions).post(routes::auctions::create_auction),
        )
        .route(
            "/auctions/:id",
            get(routes::auctions::get_auction).patch(routes::auctions::update_auction),
        )
        .route(
            "/auctions/:id/invites",
            get(routes::invites::list_invites).post(routes::invites::create_invites),
        )
        .route(
            "/auctions/:id/bids",
            get(routes::bids::list_bids).post(routes::bids::submit_bid),
        )
        .route("/auctions/:id/bids/vendor", get(routes::bids::vendor_bid))
        .route("/auctions/:id/rank", get(routes::bids::rank_auction_bids))
        .route("/auctions/:id/events", get(routes::events::stream_events))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/vendor", vendor_routes)
        .merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .fallback(fallback_404)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// JSON 404 for unknown routes
///
/// Errors must always be JSON bodies; axum's default fallback is a bare
/// status with no body.
async fn fallback_404() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

/// JWT authentication middleware layer
///
/// Validates the bearer token (admin access or vendor token; refresh
/// tokens are rejected here) and injects [`AuthContext`] into request
/// extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    // Refresh tokens only buy new access tokens; they never hit resources
    if claims.token_type == TokenType::Refresh {
        return Err(ApiError::Unauthorized(
            "Refresh tokens cannot be used for API access".to_string(),
        ));
    }

    let auth_context = AuthContext::from_claims(&claims);
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
