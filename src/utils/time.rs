//! Protocol timestamp utilities.
//!
//! The server's clock runs on 100-nanosecond ticks counted from the
//! year-1 epoch; wall-clock Unix milliseconds convert as
//! `millis * 10_000 + 621_355_968_000_000_000`.

use std::time::{SystemTime, UNIX_EPOCH};

/// Ticks between the protocol epoch and the Unix epoch.
pub const EPOCH_OFFSET_TICKS: i64 = 621_355_968_000_000_000;

/// 100-nanosecond ticks per millisecond.
pub const TICKS_PER_MILLI: i64 = 10_000;

/// Current wall-clock time as a protocol timestamp.
///
/// Saturates at the Unix epoch if the system clock reads earlier,
/// matching the monotonic-enough contract the server expects.
pub fn protocol_timestamp() -> i64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);
    millis * TICKS_PER_MILLI + EPOCH_OFFSET_TICKS
}
