/// Authentication context for request handling
///
/// The API server's auth middleware validates the presented JWT and inserts
/// an [`AuthContext`] into request extensions; handlers extract it with
/// axum's `Extension` extractor and run their permission checks through
/// `auth::authorization`.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use bidhub_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Principal: {} ({})", auth.email, auth.role.as_str())
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{Claims, TokenType};
use crate::models::admin::AdminRole;

/// Authentication method used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// Admin access token
    AdminJwt,

    /// Vendor token issued from an invite code
    VendorToken,
}

/// Authentication context added to request extensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Admin account ID, or invite ID for vendor tokens
    pub principal_id: Uuid,

    /// Principal's email
    pub email: String,

    /// Role driving capability checks
    pub role: AdminRole,

    /// Auction the principal is bound to (vendor tokens only)
    pub auction_id: Option<Uuid>,

    /// How the principal authenticated
    pub method: AuthMethod,
}

impl AuthContext {
    /// Builds the context from validated claims
    pub fn from_claims(claims: &Claims) -> Self {
        let method = match claims.token_type {
            TokenType::Vendor => AuthMethod::VendorToken,
            TokenType::Access | TokenType::Refresh => AuthMethod::AdminJwt,
        };

        Self {
            principal_id: claims.sub,
            email: claims.email.clone(),
            role: claims.role,
            auction_id: claims.auction_id,
            method,
        }
    }

    /// Whether the principal is an internal account (not an invited vendor)
    pub fn is_admin(&self) -> bool {
        self.method == AuthMethod::AdminJwt
    }
}

/// Error type for credential extraction and validation
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Invalid authorization header format
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Extracts the bearer token from request headers
///
/// # Errors
///
/// Returns `MissingCredentials` if the Authorization header is absent and
/// `InvalidFormat` if it is not a Bearer token.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_context_from_admin_claims() {
        let claims = Claims::admin(
            Uuid::new_v4(),
            "buyer@example.com",
            AdminRole::InternalUser,
            TokenType::Access,
        );

        let ctx = AuthContext::from_claims(&claims);
        assert_eq!(ctx.method, AuthMethod::AdminJwt);
        assert!(ctx.is_admin());
        assert!(ctx.auction_id.is_none());
    }

    #[test]
    fn test_context_from_vendor_claims() {
        let auction_id = Uuid::new_v4();
        let claims = Claims::vendor(Uuid::new_v4(), "vendor@example.com", auction_id);

        let ctx = AuthContext::from_claims(&claims);
        assert_eq!(ctx.method, AuthMethod::VendorToken);
        assert!(!ctx.is_admin());
        assert_eq!(ctx.auction_id, Some(auction_id));
        assert_eq!(ctx.role, AdminRole::ExternalGuest);
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::MissingCredentials)
        ));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::InvalidFormat(_))
        ));

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer token123"),
        );
        assert_eq!(bearer_token(&headers).unwrap(), "token123");
    }
}
