/// Live auction event stream (SSE)
///
/// Streams auction change events in real time using Server-Sent Events.
/// Delivery is best effort: there is no backfill and no replay, and a
/// reconnecting client simply misses whatever happened while it was away
/// (it refreshes through the regular REST reads instead). Heartbeats keep
/// intermediaries from closing idle connections.
///
/// # Endpoint
///
/// `GET /v1/auctions/:id/events`
///
/// # SSE Event Format
///
/// ```text
/// event: auction_event
/// data: {"auction_id":"...","kind":"bid_submitted","vendor_email":"...","at":"2025-06-01T12:00:00Z"}
/// ```
///
/// # Example
///
/// ```bash
/// curl -N -H "Authorization: Bearer <token>" \
///   "http://localhost:8080/v1/auctions/{auction_id}/events"
/// ```

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    Extension,
};
use bidhub_shared::{
    auth::{authorization::require_admin, middleware::AuthContext},
    models::auction::Auction,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::{wrappers::BroadcastStream, StreamExt as _};
use uuid::Uuid;

/// Stream auction events endpoint handler
///
/// # Flow
///
/// 1. **Validate**: auction must exist, caller must be an admin
/// 2. **Live tail**: forward hub events for this auction as they occur
/// 3. **Heartbeat**: keep-alive comment every 25 seconds
///
/// Lagged subscribers (slower than the hub's buffer) silently skip the
/// overrun; that is the advertised best-effort contract.
///
/// # Errors
///
/// - 401 Unauthorized: missing or invalid token
/// - 403 Forbidden: vendor tokens cannot stream admin events
/// - 404 Not Found: unknown auction
pub async fn stream_events(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(auction_id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    require_admin(&auth)?;

    Auction::find_by_id(&state.db, auction_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Auction not found".to_string()))?;

    tracing::debug!(auction_id = %auction_id, subscriber = %auth.email, "SSE subscriber connected");

    let rx = state.events.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(move |result| {
        match result {
            Ok(event) if event.auction_id == auction_id => Event::default()
                .event("auction_event")
                .json_data(&event)
                .ok()
                .map(Ok::<_, Infallible>),
            // Other auctions' events and lag overruns are skipped
            _ => None,
        }
    });

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(25))
            .text("heartbeat"),
    ))
}
