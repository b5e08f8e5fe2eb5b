//! Deployment confirmation endpoint.

/// Body returned by `GET /`. Smoke tests compare against it byte-for-byte.
pub const GREETING: &str = "✅ Hello from the CI/CD Pipeline!";

/// Returns the confirmation string as `text/plain; charset=utf-8`.
pub async fn greeting() -> &'static str {
    GREETING
}
