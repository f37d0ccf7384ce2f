//! Backoff delays for the fetch retry loop.

use std::time::Duration;

/// Standard backoff before retrying after attempt `attempt` (0-based):
/// `base * 2^attempt`.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

/// Backoff after an HTTP 429 without a usable `Retry-After` header. Twice the
/// standard delay.
pub fn rate_limit_delay(base: Duration, attempt: u32) -> Duration {
    backoff_delay(base, attempt).saturating_mul(2)
}

/// Parses a `Retry-After` header given in whole seconds.
///
/// HTTP-date values are not supported and yield `None`, which makes the
/// caller fall back to [`rate_limit_delay`].
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let seconds = value.trim().parse::<u64>().ok()?;
    Some(Duration::from_millis(seconds.saturating_mul(1000)))
}

/// Delay requested by a `Retry-After` header, never longer than `cap`.
pub fn retry_after_delay(value: &str, cap: Duration) -> Option<Duration> {
    parse_retry_after(value).map(|delay| delay.min(cap))
}
