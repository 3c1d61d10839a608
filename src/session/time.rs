//! Formatting of listening time.

use std::time::Duration;
use std::time::Instant;

/// Format the time between `start` and `now` as `HH:MM:SS.mmm`.
///
/// If `now` is before `start` the elapsed time is zero.
pub fn format_elapsed(start: Instant, now: Instant) -> String {
    format_duration(now.saturating_duration_since(start))
}

/// Format a duration as `HH:MM:SS.mmm`.
/// Hours are padded to two digits but never truncated.
pub fn format_duration(dur: Duration) -> String {
    let total_ms = dur.as_millis();

    let hours = total_ms / 3_600_000;
    let mins = total_ms % 3_600_000 / 60_000;
    let secs = total_ms % 60_000 / 1_000;
    let ms = total_ms % 1_000;

    format!("{hours:02}:{mins:02}:{secs:02}.{ms:03}")
}
