/// Bid endpoints
///
/// # Endpoints
///
/// - `POST /v1/auctions/:id/bids` - Submit or revise a bid (vendor token)
/// - `GET  /v1/auctions/:id/bids/vendor` - The vendor's own bid (vendor token)
/// - `GET  /v1/auctions/:id/bids` - All bids (admin)
/// - `GET  /v1/auctions/:id/rank` - Ranked bids (admin)
///
/// A vendor sees only their own bid; the competitive order is admin-only.
/// Submission is gated on the clock-derived auction status, not the
/// stored one: bids land only while the window is open.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use bidhub_shared::{
    auth::{
        authorization::{require_admin, require_vendor},
        middleware::AuthContext,
    },
    events::{AuctionEvent, AuctionEventKind},
    models::{
        auction::{Auction, EffectiveStatus},
        bid::{Bid, SubmitBid},
    },
    ranking::{rank_bids, RankedBid},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Submit bid request
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitBidRequest {
    #[validate(length(min = 1, max = 100, message = "Company name must be 1-100 characters"))]
    pub company_name: String,

    #[validate(length(min = 1, max = 100, message = "Contact name must be 1-100 characters"))]
    pub contact_name: String,

    #[validate(length(min = 1, max = 50, message = "Contact phone must be 1-50 characters"))]
    pub contact_phone: String,

    #[validate(range(min = 1, message = "Delivery time must be at least 1 day"))]
    pub delivery_time_days: i32,

    #[validate(range(min = 0.01, message = "Cost per unit must be positive"))]
    pub cost_per_unit: f64,
}

/// List bids response (admin view)
#[derive(Debug, Serialize)]
pub struct ListBidsResponse {
    pub bids: Vec<Bid>,
}

/// Ranked bids response (admin view)
#[derive(Debug, Serialize)]
pub struct RankedBidsResponse {
    pub auction_id: String,
    pub bids: Vec<RankedBid>,
}

/// Submit or revise a bid
///
/// Requires a vendor token bound to this auction. One bid per vendor:
/// resubmission overwrites the previous quote (keeping the original
/// submission time, so revising never improves a ranking tie).
///
/// The total cost is computed server-side from the auction quantity.
///
/// # Errors
///
/// - `403 Forbidden`: Token bound to a different auction, or admin token
/// - `404 Not Found`: Unknown auction
/// - `409 Conflict`: Auction not open for bidding
/// - `422 Unprocessable Entity`: Validation failed
pub async fn submit_bid(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(auction_id): Path<Uuid>,
    Json(req): Json<SubmitBidRequest>,
) -> ApiResult<Json<Bid>> {
    require_vendor(&auth, auction_id)?;

    req.validate()?;

    let auction = Auction::find_by_id(&state.db, auction_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Auction not found".to_string()))?;

    match auction.effective_status(Utc::now()) {
        EffectiveStatus::Active => {}
        EffectiveStatus::Upcoming => {
            return Err(ApiError::Conflict(
                "Auction has not started yet".to_string(),
            ));
        }
        EffectiveStatus::Ended | EffectiveStatus::Completed | EffectiveStatus::ManuallyClosed => {
            return Err(ApiError::Conflict(
                "Auction is no longer accepting bids".to_string(),
            ));
        }
    }

    let total_cost = req.cost_per_unit * auction.quantity as f64;

    let bid = Bid::upsert(
        &state.db,
        SubmitBid {
            auction_id,
            vendor_email: auth.email.clone(),
            company_name: req.company_name,
            contact_name: req.contact_name,
            contact_phone: req.contact_phone,
            delivery_time_days: req.delivery_time_days,
            cost_per_unit: req.cost_per_unit,
            total_cost,
        },
    )
    .await?;

    tracing::info!(auction_id = %auction_id, vendor = %auth.email, "Bid submitted");

    state.events.publish(AuctionEvent::now(
        auction_id,
        AuctionEventKind::BidSubmitted,
        Some(auth.email.clone()),
    ));

    Ok(Json(bid))
}

/// The vendor's own bid on this auction
///
/// # Errors
///
/// - `404 Not Found`: No bid submitted yet
pub async fn vendor_bid(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(auction_id): Path<Uuid>,
) -> ApiResult<Json<Bid>> {
    require_vendor(&auth, auction_id)?;

    let bid = Bid::find_for_vendor(&state.db, auction_id, &auth.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("No bid submitted".to_string()))?;

    Ok(Json(bid))
}

/// All bids on an auction (admin)
pub async fn list_bids(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(auction_id): Path<Uuid>,
) -> ApiResult<Json<ListBidsResponse>> {
    require_admin(&auth)?;

    Auction::find_by_id(&state.db, auction_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Auction not found".to_string()))?;

    let bids = Bid::list_by_auction(&state.db, auction_id).await?;

    Ok(Json(ListBidsResponse { bids }))
}

/// Ranked bids on an auction (admin)
///
/// Rank 1 is the best quote: shortest delivery, then lowest price, then
/// earliest submission.
pub async fn rank_auction_bids(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(auction_id): Path<Uuid>,
) -> ApiResult<Json<RankedBidsResponse>> {
    require_admin(&auth)?;

    Auction::find_by_id(&state.db, auction_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Auction not found".to_string()))?;

    let bids = Bid::list_by_auction(&state.db, auction_id).await?;
    let ranked = rank_bids(&bids);

    Ok(Json(RankedBidsResponse {
        auction_id: auction_id.to_string(),
        bids: ranked,
    }))
}
