/// Authentication and authorization utilities
///
/// This module provides the security primitives for BidHub:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and validation
/// - [`jwt`]: JWT token generation and validation (admin and vendor tokens)
/// - [`invite_token`]: Invite code generation and hashing
/// - [`middleware`]: Request authentication context
/// - [`authorization`]: Role capability table and permission checks
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing with configurable expiration
/// - **Invite Codes**: Secure random generation with SHA-256 hashing
///
/// # Example
///
/// ```
/// use bidhub_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("vendor_password")?;
/// assert!(verify_password("vendor_password", &hash)?);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod invite_token;
pub mod jwt;
pub mod middleware;
pub mod password;
