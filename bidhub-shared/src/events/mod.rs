/// Auction change events
///
/// A best-effort, in-process hub for pushing auction changes to connected
/// clients. The API server publishes an [`AuctionEvent`] whenever an
/// invite is accessed, a bid lands, or an auction reaches a terminal
/// state; the SSE endpoint subscribes and forwards matching events.
///
/// Delivery guarantees are deliberately weak: slow subscribers are lagged
/// past (bounded channel), there is no replay, and a reconnecting client
/// simply misses whatever happened while it was away. Clients refresh via
/// the regular REST reads; the hub only shortens the polling gap.
///
/// # Example
///
/// ```
/// use bidhub_shared::events::{AuctionEvent, AuctionEventKind, EventHub};
/// use uuid::Uuid;
///
/// # async fn example() {
/// let hub = EventHub::default();
/// let mut rx = hub.subscribe();
///
/// hub.publish(AuctionEvent::now(
///     Uuid::new_v4(),
///     AuctionEventKind::BidSubmitted,
///     Some("vendor@example.com".to_string()),
/// ));
///
/// let event = rx.recv().await.unwrap();
/// assert_eq!(event.kind, AuctionEventKind::BidSubmitted);
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Default broadcast channel capacity
///
/// Subscribers further behind than this are lagged past, not blocked.
const DEFAULT_CAPACITY: usize = 256;

/// What changed on an auction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionEventKind {
    /// A vendor used their invite code for the first time
    InviteAccessed,

    /// A vendor submitted or revised a bid
    BidSubmitted,

    /// An admin selected a winner
    WinnerSelected,

    /// An admin closed the auction without a winner
    ManuallyClosed,
}

/// A single auction change event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionEvent {
    /// Auction the event belongs to
    pub auction_id: Uuid,

    /// What happened
    pub kind: AuctionEventKind,

    /// Vendor involved, where applicable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_email: Option<String>,

    /// When the event was published
    pub at: DateTime<Utc>,
}

impl AuctionEvent {
    /// Creates an event stamped with the current time
    pub fn now(auction_id: Uuid, kind: AuctionEventKind, vendor_email: Option<String>) -> Self {
        Self {
            auction_id,
            kind,
            vendor_email,
            at: Utc::now(),
        }
    }
}

/// In-process broadcast hub for auction events
///
/// Cheap to clone; all clones publish into and subscribe from the same
/// channel.
#[derive(Debug, Clone)]
pub struct EventHub {
    tx: broadcast::Sender<AuctionEvent>,
}

impl EventHub {
    /// Creates a hub with the given channel capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publishes an event to all current subscribers
    ///
    /// A send with no subscribers is not an error; the event is dropped,
    /// which is the correct best-effort behavior.
    pub fn publish(&self, event: AuctionEvent) {
        match self.tx.send(event) {
            Ok(receivers) => {
                tracing::debug!(receivers, "Published auction event");
            }
            Err(_) => {
                tracing::trace!("Auction event dropped, no subscribers");
            }
        }
    }

    /// Subscribes to all auction events from this point on
    ///
    /// Callers filter by auction ID themselves; the channel is global.
    pub fn subscribe(&self) -> broadcast::Receiver<AuctionEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}
