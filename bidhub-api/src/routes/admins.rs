/// Account management endpoints
///
/// # Endpoints
///
/// - `GET    /v1/admins` - List accounts (accounts capability)
/// - `POST   /v1/admins` - Create an account (accounts capability;
///   privileged roles additionally need manage-global-admins)
/// - `DELETE /v1/admins/:id` - Delete an account (delete capability)
///
/// Account deletion is the only delete the portal retains; auctions,
/// invites, and bids are append-only by policy.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use bidhub_shared::{
    auth::{
        authorization::{require_capability, Capability},
        middleware::AuthContext,
        password,
    },
    models::admin::{Admin, AdminRole, CreateAdmin},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Maximum number of rows to return (default 50, capped at 200)
    #[serde(default = "default_limit")]
    pub limit: i64,

    /// Number of rows to skip
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

impl ListQuery {
    pub fn clamped_limit(&self) -> i64 {
        self.limit.clamp(1, 200)
    }
}

/// Account summary (never exposes the password hash)
#[derive(Debug, Serialize)]
pub struct AdminSummary {
    pub id: String,
    pub email: String,
    pub company_name: String,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<Admin> for AdminSummary {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id.to_string(),
            email: admin.email,
            company_name: admin.company_name,
            role: admin.role,
            created_at: admin.created_at,
            last_login_at: admin.last_login_at,
        }
    }
}

/// List accounts response
#[derive(Debug, Serialize)]
pub struct ListAdminsResponse {
    pub admins: Vec<AdminSummary>,
    pub total: i64,
}

/// Create account request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAdminRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "Company name must be 1-100 characters"))]
    pub company_name: String,

    /// Role for the new account
    pub role: AdminRole,
}

/// Delete account response
#[derive(Debug, Serialize)]
pub struct DeleteAdminResponse {
    pub deleted: bool,
}

/// List accounts
///
/// Requires the accounts capability (product owner or global admin).
pub async fn list_admins(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListAdminsResponse>> {
    require_capability(&auth, Capability::Accounts)?;

    let admins = Admin::list(&state.db, query.clamped_limit(), query.offset.max(0)).await?;
    let total = Admin::count(&state.db).await?;

    Ok(Json(ListAdminsResponse {
        admins: admins.into_iter().map(AdminSummary::from).collect(),
        total,
    }))
}

/// Create an account with an explicit role
///
/// Requires the accounts capability. Creating a global admin or product
/// owner additionally requires the manage-global-admins capability, which
/// only the product owner holds.
///
/// # Errors
///
/// - `403 Forbidden`: Missing capability
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_admin(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateAdminRequest>,
) -> ApiResult<Json<AdminSummary>> {
    require_capability(&auth, Capability::Accounts)?;

    if matches!(req.role, AdminRole::GlobalAdmin | AdminRole::ProductOwner) {
        require_capability(&auth, Capability::ManageGlobalAdmins)?;
    }

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
            role: req.role,
            password_hash,
        },
    )
    .await?;

    tracing::info!(admin_id = %admin.id, role = admin.role.as_str(), created_by = %auth.email, "Created account");

    Ok(Json(AdminSummary::from(admin)))
}

/// Delete an account
///
/// Requires the delete capability (product owner only). An account cannot
/// delete itself.
pub async fn delete_admin(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteAdminResponse>> {
    require_capability(&auth, Capability::Delete)?;

    if auth.principal_id == id {
        return Err(ApiError::BadRequest(
            "Cannot delete your own account".to_string(),
        ));
    }

    let deleted = Admin::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Account not found".to_string()));
    }

    tracing::info!(admin_id = %id, deleted_by = %auth.email, "Deleted account");

    Ok(Json(DeleteAdminResponse { deleted }))
}
