/// Vendor invite model and database operations
///
/// Invites grant an external vendor access to exactly one auction via an
/// emailed invite code. The plaintext code is generated at batch creation
/// and returned once; only its SHA-256 hash is stored (see
/// `auth::invite_token`).
///
/// # Schema
///
/// ```sql
/// CREATE TYPE invite_status AS ENUM ('pending', 'accessed');
///
/// CREATE TABLE vendor_invites (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     auction_id UUID NOT NULL REFERENCES auctions(id) ON DELETE CASCADE,
///     vendor_email TEXT NOT NULL,
///     vendor_company TEXT NOT NULL,
///     token_hash VARCHAR(64) NOT NULL UNIQUE,
///     status invite_status NOT NULL DEFAULT 'pending',
///     accessed_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT vendor_invites_auction_vendor_key UNIQUE (auction_id, vendor_email)
/// );
/// ```
///
/// Lifecycle: pending → accessed on first vendor login, recorded exactly
/// once. Invites are never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Invite lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invite_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InviteStatus {
    /// Sent, vendor has not used the code yet
    Pending,

    /// Vendor has accessed the auction at least once
    Accessed,
}

impl InviteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteStatus::Pending => "pending",
            InviteStatus::Accessed => "accessed",
        }
    }
}

/// Vendor invite model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VendorInvite {
    /// Unique invite ID
    pub id: Uuid,

    /// Auction this invite grants access to
    pub auction_id: Uuid,

    /// Invited vendor's email
    pub vendor_email: String,

    /// Invited vendor's company name
    pub vendor_company: String,

    /// SHA-256 hex hash of the invite token; plaintext is never stored
    #[serde(skip_serializing, default)]
    pub token_hash: String,

    /// pending until the vendor first uses the code
    pub status: InviteStatus,

    /// When the vendor first accessed the auction (None while pending)
    pub accessed_at: Option<DateTime<Utc>>,

    /// When the invite was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new invite
#[derive(Debug, Clone)]
pub struct CreateInvite {
    pub auction_id: Uuid,
    pub vendor_email: String,
    pub vendor_company: String,

    /// SHA-256 hex hash of the generated token
    pub token_hash: String,
}

impl VendorInvite {
    /// Creates a new pending invite
    ///
    /// # Errors
    ///
    /// Returns an error if the vendor is already invited to this auction
    /// (unique constraint) or the auction does not exist (FK).
    pub async fn create(pool: &PgPool, data: CreateInvite) -> Result<Self, sqlx::Error> {
        let invite = sqlx::query_as::<_, VendorInvite>(
            r#"
            INSERT INTO vendor_invites (auction_id, vendor_email, vendor_company, token_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, auction_id, vendor_email, vendor_company, token_hash,
                      status, accessed_at, created_at
            "#,
        )
        .bind(data.auction_id)
        .bind(data.vendor_email)
        .bind(data.vendor_company)
        .bind(data.token_hash)
        .fetch_one(pool)
        .await?;

        Ok(invite)
    }

    /// Finds an invite by the hash of its token
    ///
    /// This is the lookup behind vendor validate/access: the presented
    /// code is hashed and matched against storage, like an API key.
    pub async fn find_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let invite = sqlx::query_as::<_, VendorInvite>(
            r#"
            SELECT id, auction_id, vendor_email, vendor_company, token_hash,
                   status, accessed_at, created_at
            FROM vendor_invites
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        Ok(invite)
    }

    /// Finds the invite for a (auction, vendor) pair
    pub async fn find_for_vendor(
        pool: &PgPool,
        auction_id: Uuid,
        vendor_email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let invite = sqlx::query_as::<_, VendorInvite>(
            r#"
            SELECT id, auction_id, vendor_email, vendor_company, token_hash,
                   status, accessed_at, created_at
            FROM vendor_invites
            WHERE auction_id = $1 AND LOWER(vendor_email) = LOWER($2)
            "#,
        )
        .bind(auction_id)
        .bind(vendor_email)
        .fetch_optional(pool)
        .await?;

        Ok(invite)
    }

    /// Lists all invites for an auction, oldest first
    pub async fn list_by_auction(
        pool: &PgPool,
        auction_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let invites = sqlx::query_as::<_, VendorInvite>(
            r#"
            SELECT id, auction_id, vendor_email, vendor_company, token_hash,
                   status, accessed_at, created_at
            FROM vendor_invites
            WHERE auction_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(auction_id)
        .fetch_all(pool)
        .await?;

        Ok(invites)
    }

    /// Marks an invite accessed, recording the first-access time
    ///
    /// The UPDATE is predicated on pending status, so accessed_at is set
    /// exactly once; later accesses are no-ops. Returns true if this call
    /// performed the transition.
    pub async fn mark_accessed(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE vendor_invites
            SET status = 'accessed', accessed_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
