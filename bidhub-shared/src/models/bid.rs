/// Bid model and database operations
///
/// A bid is a vendor's delivery-time/price quote for one auction. There is
/// exactly one bid row per (auction, vendor); resubmission overwrites the
/// previous quote via upsert rather than appending. The original
/// submitted_at is preserved across overwrites so ranking ties keep
/// rewarding the earliest submission.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE bids (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     auction_id UUID NOT NULL REFERENCES auctions(id) ON DELETE CASCADE,
///     vendor_email TEXT NOT NULL,
///     company_name TEXT NOT NULL,
///     contact_name TEXT NOT NULL,
///     contact_phone TEXT NOT NULL,
///     delivery_time_days INTEGER NOT NULL,
///     cost_per_unit DOUBLE PRECISION NOT NULL,
///     total_cost DOUBLE PRECISION NOT NULL,
///     submitted_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT bids_auction_vendor_key UNIQUE (auction_id, vendor_email)
/// );
/// ```
///
/// Bids are never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Bid model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    /// Unique bid ID
    pub id: Uuid,

    /// Auction this bid belongs to
    pub auction_id: Uuid,

    /// Bidding vendor's email (matches the invite)
    pub vendor_email: String,

    /// Vendor company name
    pub company_name: String,

    /// Contact person
    pub contact_name: String,

    /// Contact phone number
    pub contact_phone: String,

    /// Quoted delivery time in days; primary ranking key
    pub delivery_time_days: i32,

    /// Quoted price per unit; first ranking tiebreak
    pub cost_per_unit: f64,

    /// cost_per_unit × auction quantity, computed server-side
    pub total_cost: f64,

    /// First submission time; preserved across overwrites
    pub submitted_at: DateTime<Utc>,

    /// Last overwrite time
    pub updated_at: DateTime<Utc>,
}

/// Input for submitting (or overwriting) a bid
#[derive(Debug, Clone)]
pub struct SubmitBid {
    pub auction_id: Uuid,
    pub vendor_email: String,
    pub company_name: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub delivery_time_days: i32,
    pub cost_per_unit: f64,
    pub total_cost: f64,
}

impl Bid {
    /// Submits a bid, overwriting any previous bid by the same vendor
    ///
    /// The upsert keeps the original submitted_at and only bumps
    /// updated_at, so overwriting a bid does not improve its ranking
    /// tiebreak position.
    pub async fn upsert(pool: &PgPool, data: SubmitBid) -> Result<Self, sqlx::Error> {
        let bid = sqlx::query_as::<_, Bid>(
            r#"
            INSERT INTO bids (auction_id, vendor_email, company_name, contact_name,
                              contact_phone, delivery_time_days, cost_per_unit, total_cost)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (auction_id, vendor_email) DO UPDATE
            SET company_name = EXCLUDED.company_name,
                contact_name = EXCLUDED.contact_name,
                contact_phone = EXCLUDED.contact_phone,
                delivery_time_days = EXCLUDED.delivery_time_days,
                cost_per_unit = EXCLUDED.cost_per_unit,
                total_cost = EXCLUDED.total_cost,
                updated_at = NOW()
            RETURNING id, auction_id, vendor_email, company_name, contact_name,
                      contact_phone, delivery_time_days, cost_per_unit, total_cost,
                      submitted_at, updated_at
            "#,
        )
        .bind(data.auction_id)
        .bind(data.vendor_email)
        .bind(data.company_name)
        .bind(data.contact_name)
        .bind(data.contact_phone)
        .bind(data.delivery_time_days)
        .bind(data.cost_per_unit)
        .bind(data.total_cost)
        .fetch_one(pool)
        .await?;

        Ok(bid)
    }

    /// Lists all bids for an auction in submission order
    ///
    /// Callers that need the competitive order go through
    /// [`crate::ranking::rank_bids`] instead of relying on this order.
    pub async fn list_by_auction(
        pool: &PgPool,
        auction_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let bids = sqlx::query_as::<_, Bid>(
            r#"
            SELECT id, auction_id, vendor_email, company_name, contact_name,
                   contact_phone, delivery_time_days, cost_per_unit, total_cost,
                   submitted_at, updated_at
            FROM bids
            WHERE auction_id = $1
            ORDER BY submitted_at ASC
            "#,
        )
        .bind(auction_id)
        .fetch_all(pool)
        .await?;

        Ok(bids)
    }

    /// Finds one vendor's bid on an auction, if any
    pub async fn find_for_vendor(
        pool: &PgPool,
        auction_id: Uuid,
        vendor_email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let bid = sqlx::query_as::<_, Bid>(
            r#"
            SELECT id, auction_id, vendor_email, company_name, contact_name,
                   contact_phone, delivery_time_days, cost_per_unit, total_cost,
                   submitted_at, updated_at
            FROM bids
            WHERE auction_id = $1 AND LOWER(vendor_email) = LOWER($2)
            "#,
        )
        .bind(auction_id)
        .bind(vendor_email)
        .fetch_optional(pool)
        .await?;

        Ok(bid)
    }
}
