/// Vendor invite redemption endpoints
///
/// # Endpoints
///
/// - `POST /v1/vendor/validate` - Check an invite code without side effects
/// - `POST /v1/vendor/access` - Redeem a code: mark the invite accessed
///   (first time only) and issue a vendor token bound to the auction
///
/// Both endpoints are public but rate limited; the invite code is the
/// credential. Lookup failures and malformed codes return the same 404 so
/// codes cannot be probed apart.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use bidhub_shared::{
    auth::{invite_token, jwt},
    events::{AuctionEvent, AuctionEventKind},
    models::{
        auction::{Auction, EffectiveStatus},
        invite::{InviteStatus, VendorInvite},
    },
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Invite code request body (shared by validate and access)
#[derive(Debug, Deserialize)]
pub struct InviteTokenRequest {
    /// The invite code from the invitation email
    pub token: String,
}

/// Auction summary shown to an invited vendor
#[derive(Debug, Serialize)]
pub struct VendorAuctionSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub product_details: String,
    pub quantity: i64,
    pub unit: String,
    pub delivery_location: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub effective_status: EffectiveStatus,
}

impl VendorAuctionSummary {
    fn new(auction: &Auction, now: DateTime<Utc>) -> Self {
        Self {
            id: auction.id.to_string(),
            title: auction.title.clone(),
            description: auction.description.clone(),
            product_details: auction.product_details.clone(),
            quantity: auction.quantity,
            unit: auction.unit.clone(),
            delivery_location: auction.delivery_location.clone(),
            starts_at: auction.starts_at,
            ends_at: auction.ends_at,
            effective_status: auction.effective_status(now),
        }
    }
}

/// Validate response
#[derive(Debug, Serialize)]
pub struct ValidateInviteResponse {
    pub vendor_email: String,
    pub vendor_company: String,
    pub invite_status: InviteStatus,
    pub auction: VendorAuctionSummary,
}

/// Access response
#[derive(Debug, Serialize)]
pub struct AccessAuctionResponse {
    /// Vendor token for the bid endpoints, bound to this auction (7 days)
    pub vendor_token: String,

    pub vendor_email: String,
    pub vendor_company: String,
    pub auction: VendorAuctionSummary,
}

/// Looks up an invite by its plaintext code
///
/// Malformed codes are rejected before touching the database; both
/// failure modes surface as the same 404.
async fn find_invite(state: &AppState, token: &str) -> ApiResult<VendorInvite> {
    if !invite_token::validate_invite_token_format(token) {
        return Err(ApiError::NotFound("Invalid invite code".to_string()));
    }

    let token_hash = invite_token::hash_invite_token(token);

    VendorInvite::find_by_token_hash(&state.db, &token_hash)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invalid invite code".to_string()))
}

/// Validate an invite code
///
/// Read-only: reports the invite and auction the code belongs to without
/// marking anything accessed.
pub async fn validate_invite(
    State(state): State<AppState>,
    Json(req): Json<InviteTokenRequest>,
) -> ApiResult<Json<ValidateInviteResponse>> {
    let invite = find_invite(&state, &req.token).await?;

    let auction = Auction::find_by_id(&state.db, invite.auction_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Auction not found".to_string()))?;

    Ok(Json(ValidateInviteResponse {
        vendor_email: invite.vendor_email,
        vendor_company: invite.vendor_company,
        invite_status: invite.status,
        auction: VendorAuctionSummary::new(&auction, Utc::now()),
    }))
}

/// Redeem an invite code
///
/// Marks the invite accessed on first use (recording accessed_at exactly
/// once) and issues a vendor token. Redeeming again later just issues a
/// fresh token.
pub async fn access_auction(
    State(state): State<AppState>,
    Json(req): Json<InviteTokenRequest>,
) -> ApiResult<Json<AccessAuctionResponse>> {
    let invite = find_invite(&state, &req.token).await?;

    let auction = Auction::find_by_id(&state.db, invite.auction_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Auction not found".to_string()))?;

    let first_access = VendorInvite::mark_accessed(&state.db, invite.id).await?;
    if first_access {
        tracing::info!(invite_id = %invite.id, auction_id = %auction.id, "Vendor accessed auction");

        state.events.publish(AuctionEvent::now(
            auction.id,
            AuctionEventKind::InviteAccessed,
            Some(invite.vendor_email.clone()),
        ));
    }

    let claims = jwt::Claims::vendor(invite.id, &invite.vendor_email, auction.id);
    let vendor_token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(AccessAuctionResponse {
        vendor_token,
        vendor_email: invite.vendor_email,
        vendor_company: invite.vendor_company,
        auction: VendorAuctionSummary::new(&auction, Utc::now()),
    }))
}
