/// Database models for BidHub
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `admin`: Platform accounts (product owner, global admins, internal users)
/// - `auction`: Reverse-auction events with a time window and lifecycle status
/// - `invite`: Vendor invites scoped to one auction
/// - `bid`: Vendor price/delivery quotes, one row per (auction, vendor)
///
/// # Example
///
/// ```no_run
/// use bidhub_shared::models::admin::{Admin, AdminRole, CreateAdmin};
/// use bidhub_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let admin = Admin::create(&pool, CreateAdmin {
///     email: "buyer@example.com".to_string(),
///     company_name: "Example GmbH".to_string(),
///     role: AdminRole::InternalUser,
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod admin;
pub mod auction;
pub mod bid;
pub mod invite;
