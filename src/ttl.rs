//! Conversions between Redis TTL arguments and backend expirations.
//!
//! Every unit conversion lives here so sentinel values (`-1`, `-2`,
//! [`NEVER_EXPIRES`]) are never scaled by accident.

use std::time::{Duration, SystemTime};

use crate::backend::{Expiration, NEVER_EXPIRES};

/// What an expire-style command asks of the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TtlRequest {
    Expire(Expiration),
    /// The TTL already elapsed: the key goes away now.
    DeleteNow,
}

/// Longest TTL a record header can carry, in seconds.
pub const MAX_TTL_SECONDS: u32 = NEVER_EXPIRES - 1;

/// Converts a relative TTL into a backend request.
///
/// Returns `None` when the TTL does not fit in a record header.
pub fn relative_seconds_to_expiration(seconds: f64) -> Option<TtlRequest> {
    if seconds.is_nan() || seconds > f64::from(MAX_TTL_SECONDS) {
        None
    } else if seconds > 0.0 {
        Some(TtlRequest::Expire(Expiration::After(
            Duration::from_secs_f64(seconds),
        )))
    } else {
        Some(TtlRequest::DeleteNow)
    }
}

pub fn relative_millis_to_expiration(millis: i64) -> Option<TtlRequest> {
    relative_seconds_to_expiration(millis as f64 / 1000.0)
}

/// Seconds left until `timestamp`; zero or less means already expired.
pub fn absolute_seconds_to_relative(timestamp: f64, now: f64) -> f64 {
    timestamp - now
}

pub fn absolute_millis_to_relative(timestamp_millis: i64, now: f64) -> f64 {
    absolute_seconds_to_relative(timestamp_millis as f64 / 1000.0, now)
}

/// Interprets the raw expiration of a record header as a Redis TTL.
pub fn expiration_to_ttl_seconds(expiration: u32) -> i64 {
    if expiration == NEVER_EXPIRES {
        -1
    } else {
        i64::from(expiration)
    }
}

pub fn ttl_seconds_to_millis(ttl: i64) -> i64 {
    if ttl > 0 {
        ttl.saturating_mul(1000)
    } else {
        ttl
    }
}

/// Current wall clock time in seconds since the unix epoch.
pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|duration| duration.as_secs_f64())
        .unwrap_or(0.0)
}
