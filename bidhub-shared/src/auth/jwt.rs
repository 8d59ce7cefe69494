/// JWT token generation and validation
///
/// Tokens are signed using HS256 (HMAC-SHA256). BidHub issues three kinds:
///
/// - **Access**: short-lived (24h) admin token carrying the account role
/// - **Refresh**: long-lived (30d), exchanged for new access tokens
/// - **Vendor**: issued when an invited vendor redeems their invite code;
///   bound to one auction and one vendor email, valid for 7 days
///
/// Vendor tokens carry the `external_guest` role, so the capability table
/// denies them every admin surface without special-casing.
///
/// # Example
///
/// ```
/// use bidhub_shared::auth::jwt::{create_token, validate_token, Claims, TokenType};
/// use bidhub_shared::models::admin::AdminRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let admin_id = Uuid::new_v4();
///
/// let claims = Claims::admin(
///     admin_id,
///     "buyer@example.com",
///     AdminRole::InternalUser,
///     TokenType::Access,
/// );
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
///
/// let validated = validate_token(&token, "your-secret-key-at-least-32-bytes")?;
/// assert_eq!(validated.sub, admin_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::admin::AdminRole;

/// Token issuer claim value
const ISSUER: &str = "bidhub";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid token issuer")]
    InvalidIssuer,
}

/// Token kind identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Admin access token (24 hours)
    Access,

    /// Admin refresh token (30 days)
    Refresh,

    /// Vendor token bound to one auction (7 days)
    Vendor,
}

impl TokenType {
    /// Gets default expiration duration for token type
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(24),
            TokenType::Refresh => Duration::days(30),
            TokenType::Vendor => Duration::days(7),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
            TokenType::Vendor => "vendor",
        }
    }
}

/// JWT claims structure
///
/// Standard claims (`sub`, `iss`, `iat`, `exp`, `nbf`) plus BidHub claims:
/// the principal's email and role, the token kind, and, for vendor tokens,
/// the auction the invite grants access to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: admin account ID, or invite ID for vendor tokens
    pub sub: Uuid,

    /// Issuer, always "bidhub"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Principal's email (admin email or invited vendor email)
    pub email: String,

    /// Role driving capability checks
    pub role: AdminRole,

    /// Auction binding; present on vendor tokens only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auction_id: Option<Uuid>,

    /// Token kind
    pub token_type: TokenType,
}

impl Claims {
    /// Creates claims for an admin token with default expiration
    pub fn admin(admin_id: Uuid, email: &str, role: AdminRole, token_type: TokenType) -> Self {
        let now = Utc::now();
        let expiration = now + token_type.default_expiration();

        Self {
            sub: admin_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            email: email.to_string(),
            role,
            auction_id: None,
            token_type,
        }
    }

    /// Creates claims for a vendor token bound to one auction
    ///
    /// The subject is the invite ID; the role is always ExternalGuest.
    pub fn vendor(invite_id: Uuid, vendor_email: &str, auction_id: Uuid) -> Self {
        let now = Utc::now();
        let expiration = now + TokenType::Vendor.default_expiration();

        Self {
            sub: invite_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            email: vendor_email.to_string(),
            role: AdminRole::ExternalGuest,
            auction_id: Some(auction_id),
            token_type: TokenType::Vendor,
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a JWT token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies signature, expiration, nbf, and issuer.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Validates a token and checks it's an admin access token
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Access {
        return Err(JwtError::ValidationError(format!(
            "Expected access token, got {} token",
            claims.token_type.as_str()
        )));
    }

    Ok(claims)
}

/// Validates a token and checks it's a refresh token
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Refresh {
        return Err(JwtError::ValidationError(format!(
            "Expected refresh token, got {} token",
            claims.token_type.as_str()
        )));
    }

    Ok(claims)
}

/// Refreshes an access token using a refresh token
///
/// Issues a new access token with the same principal, email, and role.
///
/// # Errors
///
/// Returns an error if the refresh token is invalid or expired
pub fn refresh_access_token(refresh_token: &str, secret: &str) -> Result<String, JwtError> {
    let refresh_claims = validate_refresh_token(refresh_token, secret)?;

    let access_claims = Claims::admin(
        refresh_claims.sub,
        &refresh_claims.email,
        refresh_claims.role,
        TokenType::Access,
    );

    create_token(&access_claims, secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_token_type_expiration() {
        assert_eq!(TokenType::Access.default_expiration(), Duration::hours(24));
        assert_eq!(TokenType::Refresh.default_expiration(), Duration::days(30));
        assert_eq!(TokenType::Vendor.default_expiration(), Duration::days(7));
    }

    #[test]
    fn test_admin_token_round_trip() {
        let admin_id = Uuid::new_v4();

        let claims = Claims::admin(
            admin_id,
            "owner@example.com",
            AdminRole::ProductOwner,
            TokenType::Access,
        );
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_access_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, admin_id);
        assert_eq!(validated.email, "owner@example.com");
        assert_eq!(validated.role, AdminRole::ProductOwner);
        assert_eq!(validated.iss, "bidhub");
        assert!(validated.auction_id.is_none());
    }

    #[test]
    fn test_vendor_token_round_trip() {
        let invite_id = Uuid::new_v4();
        let auction_id = Uuid::new_v4();

        let claims = Claims::vendor(invite_id, "vendor@example.com", auction_id);
        let token = create_token(&claims, SECRET).unwrap();

        let validated = validate_token(&token, SECRET).unwrap();
        assert_eq!(validated.sub, invite_id);
        assert_eq!(validated.role, AdminRole::ExternalGuest);
        assert_eq!(validated.auction_id, Some(auction_id));
        assert_eq!(validated.token_type, TokenType::Vendor);

        // A vendor token is not an access token
        assert!(validate_access_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = Claims::admin(
            Uuid::new_v4(),
            "a@example.com",
            AdminRole::InternalUser,
            TokenType::Access,
        );
        let token = create_token(&claims, "secret-one-secret-one-secret-one").unwrap();

        assert!(validate_token(&token, "secret-two-secret-two-secret-two").is_err());
    }

    #[test]
    fn test_refresh_flow() {
        let admin_id = Uuid::new_v4();

        let refresh_claims = Claims::admin(
            admin_id,
            "buyer@example.com",
            AdminRole::GlobalAdmin,
            TokenType::Refresh,
        );
        let refresh_token = create_token(&refresh_claims, SECRET).unwrap();

        let new_access = refresh_access_token(&refresh_token, SECRET).unwrap();
        let validated = validate_access_token(&new_access, SECRET).unwrap();
        assert_eq!(validated.sub, admin_id);
        assert_eq!(validated.role, AdminRole::GlobalAdmin);
    }

    #[test]
    fn test_refresh_with_access_token_fails() {
        let claims = Claims::admin(
            Uuid::new_v4(),
            "a@example.com",
            AdminRole::InternalUser,
            TokenType::Access,
        );
        let access_token = create_token(&claims, SECRET).unwrap();

        assert!(refresh_access_token(&access_token, SECRET).is_err());
    }
}
