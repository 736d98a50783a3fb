// Path: crates/ledger-client-core/src/transport/backoff.rs
//! Exponential backoff with jitter, shared by the unary transport's retry
//! loop and the topic subscription's reconnect loop (both use the same
//! "double, cap, jitter" shape).

use rand::Rng;
use std::time::Duration;

/// `min(base << min(attempt, 6), max) * jitter / 100`, `jitter` uniform in
/// `[80, 120]`.
pub fn retry_delay(attempt: u32, base: Duration, max: Duration) -> Duration {
    let shift = attempt.min(6);
    let scaled = base.saturating_mul(1u32 << shift);
    let capped = scaled.min(max);
    let jitter_pct = rand::thread_rng().gen_range(80..=120u64);
    capped.mul_f64(jitter_pct as f64 / 100.0)
}

/// Doubles `current` up to `cap`, for the topic subscription's reconnect
/// back-off.
pub fn double_capped(current: Duration, cap: Duration) -> Duration {
    current.saturating_mul(2).min(cap)
}

/// Full-jitter backoff in `[0, current]`, chosen over plain doubling to
/// avoid synchronized reconnect storms on the REST topic fallback.
pub fn full_jitter(current: Duration) -> Duration {
    let millis = current.as_millis().max(1) as u64;
    let jittered = rand::thread_rng().gen_range(0..=millis);
    Duration::from_millis(jittered)
}
