/// Auction model and database operations
///
/// This module provides the Auction model representing time-boxed
/// reverse-auction events. Auctions are the core entity of BidHub.
///
/// # State Machine
///
/// ```text
/// upcoming → active            (time-derived, never written explicitly)
/// upcoming → completed         (admin selects a winner)
/// upcoming → manually_closed   (admin closes the event)
/// active   → completed
/// active   → manually_closed
/// ```
///
/// `completed` and `manually_closed` are terminal. No transition reverses
/// state. Because upcoming → active is derived from the clock rather than
/// written, the stored status of a live auction may still read `upcoming`;
/// callers must go through [`Auction::effective_status`] for display and
/// gating decisions.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE auction_status AS ENUM (
///     'upcoming', 'active', 'completed', 'manually_closed'
/// );
///
/// CREATE TABLE auctions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     product_details TEXT NOT NULL DEFAULT '',
///     quantity BIGINT NOT NULL,
///     unit VARCHAR(50) NOT NULL,
///     delivery_location TEXT NOT NULL,
///     starts_at TIMESTAMPTZ NOT NULL,
///     ends_at TIMESTAMPTZ NOT NULL,
///     status auction_status NOT NULL DEFAULT 'upcoming',
///     created_by_email TEXT NOT NULL,
///     winner_vendor_email TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT auctions_window_check CHECK (ends_at > starts_at)
/// );
/// ```
///
/// Auctions are never deleted (audit-trail policy); the model exposes no
/// delete operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Stored auction lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "auction_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuctionStatus {
    /// Created, start time not reached (or simply never re-stamped)
    Upcoming,

    /// Inside the bidding window
    Active,

    /// A winner has been selected
    Completed,

    /// Closed by an admin before completion
    ManuallyClosed,
}

impl AuctionStatus {
    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Upcoming => "upcoming",
            AuctionStatus::Active => "active",
            AuctionStatus::Completed => "completed",
            AuctionStatus::ManuallyClosed => "manually_closed",
        }
    }

    /// Checks if status is terminal (no further transitions)
    pub fn is_terminal(&self) -> bool {
        matches!(self, AuctionStatus::Completed | AuctionStatus::ManuallyClosed)
    }

    /// Checks if transition to target status is valid
    pub fn can_transition_to(&self, target: AuctionStatus) -> bool {
        match (self, target) {
            // Time-derived activation
            (AuctionStatus::Upcoming, AuctionStatus::Active) => true,

            // Admin actions; allowed from upcoming too because activation
            // is derived and the stored row may lag the clock
            (AuctionStatus::Upcoming, AuctionStatus::Completed) => true,
            (AuctionStatus::Upcoming, AuctionStatus::ManuallyClosed) => true,
            (AuctionStatus::Active, AuctionStatus::Completed) => true,
            (AuctionStatus::Active, AuctionStatus::ManuallyClosed) => true,

            // Terminal states cannot transition
            _ => false,
        }
    }
}

/// Clock-aware view of an auction's lifecycle
///
/// This is what clients render and what bid submission is gated on. It
/// never disagrees with a terminal stored status; for non-terminal rows it
/// is derived purely from the time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectiveStatus {
    /// starts_at is in the future
    Upcoming,

    /// Bidding window is open
    Active,

    /// ends_at has passed without a winner being selected
    Ended,

    /// Winner selected
    Completed,

    /// Closed by an admin
    ManuallyClosed,
}

/// Auction model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Auction {
    /// Unique auction ID
    pub id: Uuid,

    /// Short title shown in listings
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Product/specification details shown to invited vendors
    pub product_details: String,

    /// Quantity being sourced
    pub quantity: i64,

    /// Unit the quantity is measured in (e.g., "pcs", "kg")
    pub unit: String,

    /// Delivery location vendors quote against
    pub delivery_location: String,

    /// Bidding window opens
    pub starts_at: DateTime<Utc>,

    /// Bidding window closes
    pub ends_at: DateTime<Utc>,

    /// Stored lifecycle status (see module docs for derived semantics)
    pub status: AuctionStatus,

    /// Email of the admin who created the auction
    pub created_by_email: String,

    /// Winning vendor, set on completion
    pub winner_vendor_email: Option<String>,

    /// When the auction was created
    pub created_at: DateTime<Utc>,

    /// When the auction was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new auction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuction {
    pub title: String,
    pub description: String,
    pub product_details: String,
    pub quantity: i64,
    pub unit: String,
    pub delivery_location: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub created_by_email: String,
}

impl Auction {
    /// Derives the clock-aware status
    ///
    /// Terminal stored statuses win; otherwise the time window decides. An
    /// auction with starts_at in the future always reports Upcoming here
    /// regardless of the stored field.
    pub fn effective_status(&self, now: DateTime<Utc>) -> EffectiveStatus {
        match self.status {
            AuctionStatus::Completed => EffectiveStatus::Completed,
            AuctionStatus::ManuallyClosed => EffectiveStatus::ManuallyClosed,
            AuctionStatus::Upcoming | AuctionStatus::Active => {
                if now < self.starts_at {
                    EffectiveStatus::Upcoming
                } else if now < self.ends_at {
                    EffectiveStatus::Active
                } else {
                    EffectiveStatus::Ended
                }
            }
        }
    }

    /// Whether bids are currently accepted
    pub fn accepts_bids(&self, now: DateTime<Utc>) -> bool {
        self.effective_status(now) == EffectiveStatus::Active
    }

    /// Creates a new auction in upcoming status
    ///
    /// # Errors
    ///
    /// Returns an error if the time window is inverted (check constraint)
    /// or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateAuction) -> Result<Self, sqlx::Error> {
        let auction = sqlx::query_as::<_, Auction>(
            r#"
            INSERT INTO auctions (title, description, product_details, quantity, unit,
                                  delivery_location, starts_at, ends_at, created_by_email)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, title, description, product_details, quantity, unit,
                      delivery_location, starts_at, ends_at, status, created_by_email,
                      winner_vendor_email, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.product_details)
        .bind(data.quantity)
        .bind(data.unit)
        .bind(data.delivery_location)
        .bind(data.starts_at)
        .bind(data.ends_at)
        .bind(data.created_by_email)
        .fetch_one(pool)
        .await?;

        Ok(auction)
    }

    /// Finds an auction by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let auction = sqlx::query_as::<_, Auction>(
            r#"
            SELECT id, title, description, product_details, quantity, unit,
                   delivery_location, starts_at, ends_at, status, created_by_email,
                   winner_vendor_email, created_at, updated_at
            FROM auctions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(auction)
    }

    /// Lists auctions with pagination, soonest-starting first
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let auctions = sqlx::query_as::<_, Auction>(
            r#"
            SELECT id, title, description, product_details, quantity, unit,
                   delivery_location, starts_at, ends_at, status, created_by_email,
                   winner_vendor_email, created_at, updated_at
            FROM auctions
            ORDER BY starts_at ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(auctions)
    }

    /// Selects a winner, completing the auction
    ///
    /// The UPDATE is predicated on a non-terminal stored status, so two
    /// racing selections cannot both succeed and a completed or closed
    /// auction can never be re-completed. Returns None if the auction does
    /// not exist or is already terminal.
    pub async fn select_winner(
        pool: &PgPool,
        id: Uuid,
        winner_vendor_email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let auction = sqlx::query_as::<_, Auction>(
            r#"
            UPDATE auctions
            SET status = 'completed', winner_vendor_email = $2, updated_at = NOW()
            WHERE id = $1 AND status IN ('upcoming', 'active')
            RETURNING id, title, description, product_details, quantity, unit,
                      delivery_location, starts_at, ends_at, status, created_by_email,
                      winner_vendor_email, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(winner_vendor_email)
        .fetch_optional(pool)
        .await?;

        Ok(auction)
    }

    /// Closes an auction without selecting a winner
    ///
    /// Same non-terminal guard as winner selection. Returns None if the
    /// auction does not exist or is already terminal.
    pub async fn close_manually(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let auction = sqlx::query_as::<_, Auction>(
            r#"
            UPDATE auctions
            SET status = 'manually_closed', updated_at = NOW()
            WHERE id = $1 AND status IN ('upcoming', 'active')
            RETURNING id, title, description, product_details, quantity, unit,
                      delivery_location, starts_at, ends_at, status, created_by_email,
                      winner_vendor_email, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(auction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_auction(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Auction {
        Auction {
            id: Uuid::new_v4(),
            title: "Steel brackets".to_string(),
            description: String::new(),
            product_details: String::new(),
            quantity: 500,
            unit: "pcs".to_string(),
            delivery_location: "Plant 2".to_string(),
            starts_at,
            ends_at,
            status: AuctionStatus::Upcoming,
            created_by_email: "buyer@example.com".to_string(),
            winner_vendor_email: None,
            created_at: starts_at - Duration::days(1),
            updated_at: starts_at - Duration::days(1),
        }
    }

    #[test]
    fn test_transitions() {
        use AuctionStatus::*;

        assert!(Upcoming.can_transition_to(Active));
        assert!(Upcoming.can_transition_to(Completed));
        assert!(Upcoming.can_transition_to(ManuallyClosed));
        assert!(Active.can_transition_to(Completed));
        assert!(Active.can_transition_to(ManuallyClosed));

        // Nothing reverses, terminals are final
        assert!(!Active.can_transition_to(Upcoming));
        assert!(!Completed.can_transition_to(Active));
        assert!(!Completed.can_transition_to(ManuallyClosed));
        assert!(!ManuallyClosed.can_transition_to(Completed));

        assert!(Completed.is_terminal());
        assert!(ManuallyClosed.is_terminal());
        assert!(!Upcoming.is_terminal());
        assert!(!Active.is_terminal());
    }

    #[test]
    fn test_effective_status_follows_clock() {
        let now = Utc::now();
        let auction = sample_auction(now + Duration::hours(1), now + Duration::hours(2));

        // starts_at in the future always reports upcoming, whatever the
        // stored field says
        assert_eq!(auction.effective_status(now), EffectiveStatus::Upcoming);
        let mut stale = auction.clone();
        stale.status = AuctionStatus::Active;
        assert_eq!(stale.effective_status(now), EffectiveStatus::Upcoming);

        // Inside the window
        let t = now + Duration::minutes(90);
        assert_eq!(auction.effective_status(t), EffectiveStatus::Active);
        assert!(auction.accepts_bids(t));

        // Past the window without a winner
        let t = now + Duration::hours(3);
        assert_eq!(auction.effective_status(t), EffectiveStatus::Ended);
        assert!(!auction.accepts_bids(t));
    }

    #[test]
    fn test_effective_status_terminal_wins() {
        let now = Utc::now();
        let mut auction = sample_auction(now - Duration::hours(2), now + Duration::hours(2));

        auction.status = AuctionStatus::Completed;
        assert_eq!(auction.effective_status(now), EffectiveStatus::Completed);
        assert!(!auction.accepts_bids(now));

        auction.status = AuctionStatus::ManuallyClosed;
        assert_eq!(auction.effective_status(now), EffectiveStatus::ManuallyClosed);
        assert!(!auction.accepts_bids(now));
    }
}
