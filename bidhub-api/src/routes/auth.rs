/// Admin authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register a new internal account
/// - `POST /v1/auth/login` - Login and get a token pair
/// - `POST /v1/auth/refresh` - Refresh the access token
///
/// Self-registration always yields an `internal_user` account. Privileged
/// roles (global admin, product owner) are created through the accounts
/// endpoint by someone who already holds the manage-global-admins
/// capability, or by seeding.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, Json};
use bidhub_shared::{
    auth::{jwt, password},
    models::admin::{Admin, AdminRole, CreateAdmin},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (also checked for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Company the account belongs to
    #[validate(length(min = 1, max = 100, message = "Company name must be 1-100 characters"))]
    pub company_name: String,
}

/// Token pair response shared by register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Account ID
    pub admin_id: String,

    /// Account role
    pub role: AdminRole,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address (matched case-insensitively)
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

/// Issues an access/refresh token pair for an account
fn issue_tokens(state: &AppState, admin: &Admin) -> Result<(String, String), ApiError> {
    let access_claims = jwt::Claims::admin(admin.id, &admin.email, admin.role, jwt::TokenType::Access);
    let refresh_claims =
        jwt::Claims::admin(admin.id, &admin.email, admin.role, jwt::TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok((access_token, refresh_token))
}

/// Register a new internal account
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "email": "buyer@example.com",
///   "password": "SecureP4ss",
///   "company_name": "Example GmbH"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Email already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    let password_hash = password::hash_password(&req.password)?;

    let admin = Admin::create(
        &state.db,
        CreateAdmin {
            email: req.email,
            company_name: req.company_name,
            role: AdminRole::InternalUser,
            password_hash,
        },
    )
    .await?;

    tracing::info!(admin_id = %admin.id, "Registered new account");

    let (access_token, refresh_token) = issue_tokens(&state, &admin)?;

    Ok(Json(AuthResponse {
        admin_id: admin.id.to_string(),
        role: admin.role,
        access_token,
        refresh_token,
    }))
}

/// Login endpoint
///
/// Authenticates an account and returns a token pair. The response is
/// identical for unknown emails and wrong passwords so the endpoint does
/// not leak which accounts exist.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let admin = Admin::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &admin.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    Admin::update_last_login(&state.db, admin.id).await?;

    let (access_token, refresh_token) = issue_tokens(&state, &admin)?;

    Ok(Json(AuthResponse {
        admin_id: admin.id.to_string(),
        role: admin.role,
        access_token,
        refresh_token,
    }))
}

/// Token refresh endpoint
///
/// Exchanges a refresh token for a new access token.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid or expired refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}
