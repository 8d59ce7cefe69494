/// Vendor invite endpoints
///
/// # Endpoints
///
/// - `GET  /v1/auctions/:id/invites` - List invites for an auction
/// - `POST /v1/auctions/:id/invites` - Batch-create invites
///
/// Invite codes are returned in plaintext exactly once, in the creation
/// response, so the caller can email them out. Only the SHA-256 hash is
/// stored; a lost code means a new invite.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use bidhub_shared::{
    auth::{authorization::require_admin, invite_token, middleware::AuthContext},
    models::{
        auction::Auction,
        invite::{CreateInvite, InviteStatus, VendorInvite},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One invite in a batch-create request
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct InviteRequest {
    #[validate(email(message = "Invalid vendor email"))]
    pub vendor_email: String,

    #[validate(length(min = 1, max = 100, message = "Company name must be 1-100 characters"))]
    pub vendor_company: String,
}

/// Batch-create invites request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvitesRequest {
    #[validate(length(min = 1, message = "At least one invite is required"), nested)]
    pub invites: Vec<InviteRequest>,
}

/// A freshly created invite, including the one-time plaintext code
#[derive(Debug, Serialize)]
pub struct CreatedInvite {
    pub id: String,
    pub vendor_email: String,
    pub vendor_company: String,

    /// The plaintext invite code (ONLY returned on creation)
    pub invite_token: String,

    pub status: InviteStatus,
}

/// Batch-create invites response
#[derive(Debug, Serialize)]
pub struct CreateInvitesResponse {
    pub invites: Vec<CreatedInvite>,
}

/// List invites response
#[derive(Debug, Serialize)]
pub struct ListInvitesResponse {
    pub invites: Vec<VendorInvite>,
}

/// Batch-create invites for an auction
///
/// # Endpoint
///
/// ```text
/// POST /v1/auctions/:id/invites
/// Authorization: Bearer <admin_token>
///
/// {
///   "invites": [
///     { "vendor_email": "sales@vendor-a.com", "vendor_company": "Vendor A" },
///     { "vendor_email": "sales@vendor-b.com", "vendor_company": "Vendor B" }
///   ]
/// }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Unknown auction
/// - `409 Conflict`: A vendor in the batch is already invited
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_invites(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(auction_id): Path<Uuid>,
    Json(req): Json<CreateInvitesRequest>,
) -> ApiResult<Json<CreateInvitesResponse>> {
    require_admin(&auth)?;

    req.validate()?;

    let auction = Auction::find_by_id(&state.db, auction_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Auction not found".to_string()))?;

    if auction.status.is_terminal() {
        return Err(ApiError::Conflict(format!(
            "Auction is already {}",
            auction.status.as_str()
        )));
    }

    let mut created = Vec::with_capacity(req.invites.len());
    for entry in req.invites {
        let (token, token_hash) = invite_token::generate_invite_token();

        let invite = VendorInvite::create(
            &state.db,
            CreateInvite {
                auction_id,
                vendor_email: entry.vendor_email,
                vendor_company: entry.vendor_company,
                token_hash,
            },
        )
        .await?;

        created.push(CreatedInvite {
            id: invite.id.to_string(),
            vendor_email: invite.vendor_email,
            vendor_company: invite.vendor_company,
            invite_token: token,
            status: invite.status,
        });
    }

    tracing::info!(auction_id = %auction_id, count = created.len(), invited_by = %auth.email, "Created vendor invites");

    Ok(Json(CreateInvitesResponse { invites: created }))
}

/// List invites for an auction
pub async fn list_invites(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(auction_id): Path<Uuid>,
) -> ApiResult<Json<ListInvitesResponse>> {
    require_admin(&auth)?;

    Auction::find_by_id(&state.db, auction_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Auction not found".to_string()))?;

    let invites = VendorInvite::list_by_auction(&state.db, auction_id).await?;

    Ok(Json(ListInvitesResponse { invites }))
}
