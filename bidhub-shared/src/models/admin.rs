/// Admin account model and database operations
///
/// This module provides the Admin model for platform accounts. The role
/// field drives every permission check in the system (see
/// `auth::authorization` for the capability table).
///
/// # Schema
///
/// ```sql
/// CREATE TYPE admin_role AS ENUM (
///     'product_owner', 'global_admin', 'internal_user', 'external_guest'
/// );
///
/// CREATE TABLE admins (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email TEXT NOT NULL,
///     company_name TEXT NOT NULL,
///     role admin_role NOT NULL DEFAULT 'internal_user',
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
///
/// CREATE UNIQUE INDEX admins_email_lower_idx ON admins (LOWER(email));
/// ```
///
/// Email uniqueness and lookups are case-insensitive via the LOWER()
/// index; all queries here normalize through LOWER(email).
///
/// An account's role is immutable after creation. There is deliberately
/// no update path for it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Platform roles
///
/// Vendors authenticate through invite tokens and act as `ExternalGuest`;
/// the other three roles are internal accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "admin_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Platform owner: full control including account deletion
    ProductOwner,

    /// Global administrator: global view and messaging, no delete
    GlobalAdmin,

    /// Internal buyer: own auctions only
    InternalUser,

    /// Invited vendor: bid access to a single auction
    ExternalGuest,
}

impl AdminRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::ProductOwner => "product_owner",
            AdminRole::GlobalAdmin => "global_admin",
            AdminRole::InternalUser => "internal_user",
            AdminRole::ExternalGuest => "external_guest",
        }
    }

    /// Parses a role string, returning None for anything unrecognized
    ///
    /// Unrecognized roles must deny by default, so callers map None to an
    /// empty capability set rather than guessing.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "product_owner" => Some(AdminRole::ProductOwner),
            "global_admin" => Some(AdminRole::GlobalAdmin),
            "internal_user" => Some(AdminRole::InternalUser),
            "external_guest" => Some(AdminRole::ExternalGuest),
            _ => None,
        }
    }
}

/// Admin account model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Admin {
    /// Unique account ID (UUID v4)
    pub id: Uuid,

    /// Email address (unique, case-insensitive)
    pub email: String,

    /// Company the account belongs to
    pub company_name: String,

    /// Role driving all permission checks; immutable after creation
    pub role: AdminRole,

    /// Argon2id password hash, never plaintext
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account last logged in (None if never)
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for creating a new admin account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdmin {
    /// Email address (stored as given, matched case-insensitively)
    pub email: String,

    /// Company name
    pub company_name: String,

    /// Account role
    pub role: AdminRole,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,
}

impl Admin {
    /// Creates a new admin account
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint on
    /// LOWER(email)) or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateAdmin) -> Result<Self, sqlx::Error> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (email, company_name, role, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, company_name, role, password_hash, created_at, last_login_at
            "#,
        )
        .bind(data.email)
        .bind(data.company_name)
        .bind(data.role)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(admin)
    }

    /// Finds an account by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            SELECT id, email, company_name, role, password_hash, created_at, last_login_at
            FROM admins
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(admin)
    }

    /// Finds an account by email address (case-insensitive)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            SELECT id, email, company_name, role, password_hash, created_at, last_login_at
            FROM admins
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(admin)
    }

    /// Updates the last login timestamp for an account
    ///
    /// Called after successful authentication. Returns true if the account
    /// was found and updated.
    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE admins
            SET last_login_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists accounts with pagination, newest first
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let admins = sqlx::query_as::<_, Admin>(
            r#"
            SELECT id, email, company_name, role, password_hash, created_at, last_login_at
            FROM admins
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(admins)
    }

    /// Counts total number of accounts
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admins")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Deletes an account by ID
    ///
    /// Account deletion is the only delete the portal retains; it is gated
    /// on the product-owner capability at the API layer. Returns true if an
    /// account was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM admins WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [
            AdminRole::ProductOwner,
            AdminRole::GlobalAdmin,
            AdminRole::InternalUser,
            AdminRole::ExternalGuest,
        ] {
            assert_eq!(AdminRole::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_unknown_role_is_none() {
        assert_eq!(AdminRole::parse("superuser"), None);
        assert_eq!(AdminRole::parse(""), None);
        assert_eq!(AdminRole::parse("PRODUCT_OWNER"), None);
    }

    #[test]
    fn test_create_admin_struct() {
        let create = CreateAdmin {
            email: "buyer@example.com".to_string(),
            company_name: "Example GmbH".to_string(),
            role: AdminRole::InternalUser,
            password_hash: "hash".to_string(),
        };

        assert_eq!(create.email, "buyer@example.com");
        assert_eq!(create.role, AdminRole::InternalUser);
    }

    // Integration tests for database operations live in bidhub-api/tests/.
}
