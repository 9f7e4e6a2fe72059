//! Exponential backoff delay calculation.

/// Default base delay between attempts, in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;

/// Delay before the attempt following retry `retry_count`.
///
/// Defined as `2^retry_count * base_delay_ms`. No jitter and no cap;
/// callers bound `retry_count` through their retry policy.
pub fn delay(retry_count: u32, base_delay_ms: u64) -> u64 {
    2u64.saturating_pow(retry_count)
        .saturating_mul(base_delay_ms)
}
