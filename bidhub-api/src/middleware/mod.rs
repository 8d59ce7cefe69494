/// API server middleware
///
/// - `security`: OWASP security headers applied to every response
/// - `rate_limit`: token-bucket limiting for credential-bearing endpoints

pub mod rate_limit;
pub mod security;
