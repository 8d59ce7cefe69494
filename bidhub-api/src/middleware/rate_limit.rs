/// Rate limiting middleware for credential-bearing endpoints
///
/// Token-bucket rate limiting applied to the public endpoints that accept
/// credentials (admin login/register, vendor invite validation). The
/// server runs as a single process, so bucket state lives in an in-process
/// map keyed by client IP; there is no shared store to coordinate with.
///
/// # Algorithm
///
/// Classic token bucket:
/// - Tokens refill at a constant rate up to the bucket capacity
/// - Each request consumes 1 token
/// - Requests are rejected with 429 once the bucket is empty
///
/// # Headers
///
/// Responses include:
/// - `X-RateLimit-Limit`: requests allowed per minute
/// - `X-RateLimit-Remaining`: tokens remaining for this client
/// - `Retry-After`: seconds to wait (429 responses only)

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Requests per minute allowed per client on guarded endpoints
const REQUESTS_PER_MINUTE: u32 = 60;

/// Periodically prune buckets that have fully refilled to cap memory
const PRUNE_THRESHOLD: usize = 4096;

/// Token bucket state for one client
#[derive(Debug, Clone)]
struct TokenBucket {
    /// Current number of tokens
    tokens: f64,

    /// Last refill timestamp (Unix seconds)
    last_refill: u64,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl TokenBucket {
    /// Creates a new full bucket
    fn new(capacity: u32) -> Self {
        TokenBucket {
            tokens: capacity as f64,
            last_refill: unix_now(),
        }
    }

    /// Refills tokens based on elapsed time
    fn refill(&mut self, rate: f64, capacity: u32) {
        let now = unix_now();
        let elapsed_secs = now.saturating_sub(self.last_refill) as f64;
        self.tokens = (self.tokens + elapsed_secs * rate).min(capacity as f64);
        self.last_refill = now;
    }

    /// Attempts to consume one token
    fn try_consume(&mut self) -> bool {
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Calculates seconds until one token is available
    fn seconds_until_available(&self, rate: f64) -> u64 {
        let deficit = 1.0 - self.tokens;
        if deficit <= 0.0 {
            0
        } else {
            (deficit / rate).ceil() as u64
        }
    }
}

/// Result of a rate limit check
#[derive(Debug)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub ok: bool,

    /// Tokens remaining
    pub remaining: u32,

    /// Seconds until the next token (429 responses)
    pub retry_after: u64,
}

/// In-process token-bucket rate limiter
///
/// Held in [`AppState`]; all guarded routes share it. The lock is only
/// held for map access, never across an await point.
#[derive(Debug)]
pub struct RateLimiter {
    requests_per_minute: u32,
    refill_rate: f64,
    buckets: Mutex<HashMap<String, TokenBucket>>,
}

impl RateLimiter {
    /// Creates a limiter allowing `requests_per_minute` per client key
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            requests_per_minute,
            refill_rate: f64::from(requests_per_minute) / 60.0,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Checks and consumes one token for the given client key
    pub fn check(&self, key: &str) -> RateLimitResult {
        let mut buckets = match self.buckets.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if buckets.len() > PRUNE_THRESHOLD {
            let capacity = f64::from(self.requests_per_minute);
            let rate = self.refill_rate;
            buckets.retain(|_, bucket| {
                let mut b = bucket.clone();
                b.refill(rate, capacity as u32);
                b.tokens < capacity
            });
        }

        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(self.requests_per_minute));

        bucket.refill(self.refill_rate, self.requests_per_minute);
        let ok = bucket.try_consume();

        RateLimitResult {
            ok,
            remaining: bucket.tokens.floor().max(0.0) as u32,
            retry_after: if ok {
                0
            } else {
                bucket.seconds_until_available(self.refill_rate)
            },
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(REQUESTS_PER_MINUTE)
    }
}

/// Rate limiting middleware layer
///
/// Keys buckets by client IP. When the server is driven without connect
/// info (in-process tests), all requests share one bucket.
///
/// # Errors
///
/// - 429 Too Many Requests: rate limit exceeded
pub async fn rate_limit_layer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let result = state.rate_limiter.check(&key);

    if !result.ok {
        tracing::warn!(client = %key, retry_after = result.retry_after, "Rate limit exceeded");
        return Err(ApiError::RateLimitExceeded {
            retry_after: result.retry_after,
            message: format!(
                "Rate limit exceeded. Try again in {} seconds",
                result.retry_after
            ),
        });
    }

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&REQUESTS_PER_MINUTE.to_string()) {
        headers.insert("X-RateLimit-Limit", value);
    }
    if let Ok(value) = HeaderValue::from_str(&result.remaining.to_string()) {
        headers.insert("X-RateLimit-Remaining", value);
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_consume() {
        let mut bucket = TokenBucket::new(10);
        for _ in 0..10 {
            assert!(bucket.try_consume());
        }
        assert!(!bucket.try_consume());
    }

    #[test]
    fn test_bucket_refill_capped() {
        let mut bucket = TokenBucket {
            tokens: 95.0,
            last_refill: unix_now() - 10,
        };

        // Refill at 1 token/sec for 10 seconds, capped at capacity
        bucket.refill(1.0, 100);
        assert_eq!(bucket.tokens, 100.0);
    }

    #[test]
    fn test_seconds_until_available() {
        let bucket = TokenBucket {
            tokens: 0.0,
            last_refill: unix_now(),
        };

        // Need 1 token at 0.5/sec -> 2 seconds
        assert_eq!(bucket.seconds_until_available(0.5), 2);
    }

    #[test]
    fn test_limiter_exhausts_and_isolates_keys() {
        let limiter = RateLimiter::new(3);

        assert!(limiter.check("10.0.0.1").ok);
        assert!(limiter.check("10.0.0.1").ok);
        assert!(limiter.check("10.0.0.1").ok);
        let denied = limiter.check("10.0.0.1");
        assert!(!denied.ok);
        assert!(denied.retry_after > 0);

        // A different client has its own bucket
        assert!(limiter.check("10.0.0.2").ok);
    }
}
