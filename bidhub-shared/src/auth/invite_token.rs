/// Invite code generation and hashing
///
/// Invite codes are the shared secret emailed to vendors. They work like
/// API keys: generated once, shown once, stored only as a SHA-256 hash.
///
/// # Format
///
/// Codes follow the pattern `inv_{32 chars}` (36 chars total):
/// - Prefix: "inv_" (4 chars)
/// - Random part: 32 alphanumeric chars (base62: [A-Za-z0-9])
///
/// # Example
///
/// ```
/// use bidhub_shared::auth::invite_token::{
///     generate_invite_token, hash_invite_token, validate_invite_token_format,
/// };
///
/// let (token, hash) = generate_invite_token();
/// assert!(token.starts_with("inv_"));
/// assert_eq!(token.len(), 36);
///
/// assert!(validate_invite_token_format(&token));
/// assert_eq!(hash, hash_invite_token(&token));
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the random part of the invite code (characters)
const TOKEN_RANDOM_LENGTH: usize = 32;

/// Invite code prefix
const TOKEN_PREFIX: &str = "inv_";

/// Total length of an invite code (prefix + random)
pub const INVITE_TOKEN_LENGTH: usize = TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH;

/// Generates a new invite code
///
/// Returns (plaintext_token, sha256_hash). The plaintext is emailed to the
/// vendor and returned once at invite creation; only the hash is stored.
///
/// Key space is 62^32, generated from the thread-local CSPRNG.
pub fn generate_invite_token() -> (String, String) {
    let random_part = generate_random_string(TOKEN_RANDOM_LENGTH);
    let token = format!("{}{}", TOKEN_PREFIX, random_part);
    let hash = hash_invite_token(&token);

    (token, hash)
}

/// Generates a random alphanumeric string (base62, URL-safe)
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Hashes an invite code using SHA-256
///
/// Returns the hex-encoded hash (64 characters). Deterministic, so the
/// presented code can be matched against storage by hash equality.
pub fn hash_invite_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Validates invite code format
///
/// Checks prefix, length, and that the random part is alphanumeric. Used
/// to reject junk before touching the database.
pub fn validate_invite_token_format(token: &str) -> bool {
    if token.len() != INVITE_TOKEN_LENGTH {
        return false;
    }

    if !token.starts_with(TOKEN_PREFIX) {
        return false;
    }

    let random_part = &token[TOKEN_PREFIX.len()..];
    random_part.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token() {
        let (token, hash) = generate_invite_token();

        assert!(token.starts_with("inv_"));
        assert_eq!(token.len(), INVITE_TOKEN_LENGTH);
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_invite_token(&token));
    }

    #[test]
    fn test_tokens_are_unique() {
        let (a, _) = generate_invite_token();
        let (b, _) = generate_invite_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(
            hash_invite_token("inv_test123"),
            hash_invite_token("inv_test123")
        );
        assert_ne!(
            hash_invite_token("inv_test123"),
            hash_invite_token("inv_test124")
        );
    }

    #[test]
    fn test_format_validation() {
        let (token, _) = generate_invite_token();
        assert!(validate_invite_token_format(&token));

        assert!(!validate_invite_token_format("inv_short"));
        assert!(!validate_invite_token_format(
            "key_abcdefghijklmnopqrstuvwxyz123456"
        ));
        assert!(!validate_invite_token_format(
            "inv_abcdefghijklmnopqrstuvwxyz12345!"
        ));
        assert!(!validate_invite_token_format(""));
    }
}
