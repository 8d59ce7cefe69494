/// API route handlers
///
/// Handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Admin authentication (register, login, refresh)
/// - `admins`: Account management
/// - `auctions`: Auction CRUD and lifecycle actions
/// - `invites`: Vendor invite batches
/// - `vendor`: Invite code validation and access
/// - `bids`: Bid submission, listing, and ranking
/// - `events`: Live auction event stream (SSE)

pub mod admins;
pub mod auctions;
pub mod auth;
pub mod bids;
pub mod events;
pub mod health;
pub mod invites;
pub mod vendor;
