/// Auction endpoints
///
/// # Endpoints
///
/// - `GET   /v1/auctions` - List auctions
/// - `POST  /v1/auctions` - Create an auction (create-auction capability)
/// - `GET   /v1/auctions/:id` - Auction detail
/// - `PATCH /v1/auctions/:id` - Select a winner or close manually
///
/// Every auction read carries the clock-derived `effective_status` next to
/// the stored status so clients never re-derive time windows themselves.
/// There is no DELETE: auctions are kept forever as an audit trail.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use bidhub_shared::{
    auth::{
        authorization::{require_admin, require_capability, Capability},
        middleware::AuthContext,
    },
    events::{AuctionEvent, AuctionEventKind},
    models::{
        auction::{Auction, AuctionStatus, CreateAuction, EffectiveStatus},
        bid::Bid,
    },
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::admins::ListQuery;

/// Auction with its derived status
#[derive(Debug, Serialize)]
pub struct AuctionView {
    #[serde(flatten)]
    pub auction: Auction,

    /// Clock-aware lifecycle view (what clients render and gate on)
    pub effective_status: EffectiveStatus,
}

impl AuctionView {
    pub fn new(auction: Auction, now: DateTime<Utc>) -> Self {
        let effective_status = auction.effective_status(now);
        Self {
            auction,
            effective_status,
        }
    }
}

/// List auctions response
#[derive(Debug, Serialize)]
pub struct ListAuctionsResponse {
    pub auctions: Vec<AuctionView>,
}

/// Create auction request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAuctionRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub product_details: String,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i64,

    #[validate(length(min = 1, max = 50, message = "Unit must be 1-50 characters"))]
    pub unit: String,

    #[validate(length(min = 1, message = "Delivery location is required"))]
    pub delivery_location: String,

    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// Lifecycle update request
///
/// Exactly one action per request: either select a winner (completing the
/// auction) or set the status to manually_closed.
#[derive(Debug, Deserialize)]
pub struct UpdateAuctionRequest {
    /// Selecting a winner completes the auction
    pub winner_vendor_email: Option<String>,

    /// The only status a client may write is manually_closed
    pub status: Option<AuctionStatus>,
}

/// List auctions
pub async fn list_auctions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListAuctionsResponse>> {
    require_admin(&auth)?;

    let auctions = Auction::list(&state.db, query.clamped_limit(), query.offset.max(0)).await?;
    let now = Utc::now();

    Ok(Json(ListAuctionsResponse {
        auctions: auctions
            .into_iter()
            .map(|a| AuctionView::new(a, now))
            .collect(),
    }))
}

/// Create an auction
///
/// Requires the create-auction capability (any internal role).
///
/// # Errors
///
/// - `403 Forbidden`: Vendors and unknown roles cannot create auctions
/// - `422 Unprocessable Entity`: Validation failed
/// - `400 Bad Request`: Inverted time window
pub async fn create_auction(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateAuctionRequest>,
) -> ApiResult<Json<AuctionView>> {
    require_capability(&auth, Capability::CreateAuction)?;

    req.validate()?;

    if req.ends_at <= req.starts_at {
        return Err(ApiError::BadRequest(
            "ends_at must be after starts_at".to_string(),
        ));
    }

    let auction = Auction::create(
        &state.db,
        CreateAuction {
            title: req.title,
            description: req.description,
            product_details: req.product_details,
            quantity: req.quantity,
            unit: req.unit,
            delivery_location: req.delivery_location,
            starts_at: req.starts_at,
            ends_at: req.ends_at,
            created_by_email: auth.email.clone(),
        },
    )
    .await?;

    tracing::info!(auction_id = %auction.id, created_by = %auth.email, "Created auction");

    Ok(Json(AuctionView::new(auction, Utc::now())))
}

/// Auction detail
pub async fn get_auction(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AuctionView>> {
    require_admin(&auth)?;

    let auction = Auction::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Auction not found".to_string()))?;

    Ok(Json(AuctionView::new(auction, Utc::now())))
}

/// Select a winner or close the auction
///
/// # Winner selection
///
/// ```text
/// PATCH /v1/auctions/:id
/// { "winner_vendor_email": "vendor@example.com" }
/// ```
///
/// The winner must have submitted a bid on the auction. Completion is a
/// guarded single UPDATE: if the auction is already terminal the request
/// fails with 409 instead of silently overwriting the earlier outcome.
///
/// # Manual close
///
/// ```text
/// PATCH /v1/auctions/:id
/// { "status": "manually_closed" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: No action, both actions, a non-closable status,
///   or a winner without a bid
/// - `404 Not Found`: Unknown auction
/// - `409 Conflict`: Auction already completed or closed
pub async fn update_auction(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAuctionRequest>,
) -> ApiResult<Json<AuctionView>> {
    require_admin(&auth)?;

    let auction = Auction::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Auction not found".to_string()))?;

    let updated = match (req.winner_vendor_email, req.status) {
        (Some(winner_email), None) => {
            if !auction.status.can_transition_to(AuctionStatus::Completed) {
                return Err(ApiError::Conflict(format!(
                    "Auction is already {}",
                    auction.status.as_str()
                )));
            }

            // The winner must actually be in the running
            Bid::find_for_vendor(&state.db, id, &winner_email)
                .await?
                .ok_or_else(|| {
                    ApiError::BadRequest(format!("{} has no bid on this auction", winner_email))
                })?;

            let updated = Auction::select_winner(&state.db, id, &winner_email)
                .await?
                .ok_or_else(|| {
                    ApiError::Conflict("Auction was completed or closed concurrently".to_string())
                })?;

            tracing::info!(auction_id = %id, winner = %winner_email, selected_by = %auth.email, "Winner selected");

            state.events.publish(AuctionEvent::now(
                id,
                AuctionEventKind::WinnerSelected,
                Some(winner_email),
            ));

            updated
        }
        (None, Some(AuctionStatus::ManuallyClosed)) => {
            if !auction
                .status
                .can_transition_to(AuctionStatus::ManuallyClosed)
            {
                return Err(ApiError::Conflict(format!(
                    "Auction is already {}",
                    auction.status.as_str()
                )));
            }

            let updated = Auction::close_manually(&state.db, id).await?.ok_or_else(|| {
                ApiError::Conflict("Auction was completed or closed concurrently".to_string())
            })?;

            tracing::info!(auction_id = %id, closed_by = %auth.email, "Auction manually closed");

            state
                .events
                .publish(AuctionEvent::now(id, AuctionEventKind::ManuallyClosed, None));

            updated
        }
        (None, Some(other)) => {
            return Err(ApiError::BadRequest(format!(
                "Status cannot be set to {} directly",
                other.as_str()
            )));
        }
        (Some(_), Some(_)) => {
            return Err(ApiError::BadRequest(
                "Provide either winner_vendor_email or status, not both".to_string(),
            ));
        }
        (None, None) => {
            return Err(ApiError::BadRequest(
                "Nothing to update: provide winner_vendor_email or status".to_string(),
            ));
        }
    };

    Ok(Json(AuctionView::new(updated, Utc::now())))
}
