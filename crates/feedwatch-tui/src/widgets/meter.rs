//! Text meters and relative-time labels.

use chrono::{DateTime, Utc};

/// A percentage bar split into filled and empty parts.
///
/// Returns `(filled, empty)` strings of `█` and `░` that together span
/// `width` cells, so the caller can style each segment.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn pct_bar(pct: f64, width: u16) -> (String, String) {
    let clamped = pct.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * f64::from(width)).round() as u16;
    let empty = width.saturating_sub(filled);
    (
        "█".repeat(usize::from(filled)),
        "░".repeat(usize::from(empty)),
    )
}

/// Share of `part` in `total` as a percentage; 0 when `total` is 0.
pub fn share(part: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(part) * 100.0 / f64::from(total)
    }
}

/// Compact age such as `45s ago`, `12m ago`, `3h ago`, `2d ago`.
pub fn ago(ts: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - *ts).num_seconds().max(0);
    match secs {
        0..60 => format!("{secs}s ago"),
        60..3_600 => format!("{}m ago", secs / 60),
        3_600..86_400 => format!("{}h ago", secs / 3_600),
        _ => format!("{}d ago", secs / 86_400),
    }
}
