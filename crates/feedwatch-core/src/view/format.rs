// ── Display formatting ──

use chrono::{DateTime, Utc};

/// `"{n} MB"` below 1024 MB, otherwise gigabytes with two decimals.
pub fn format_size_mb(size_mb: u64) -> String {
    if size_mb < 1024 {
        format!("{size_mb} MB")
    } else {
        #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
        let gb = size_mb as f64 / 1024.0;
        format!("{gb:.2} GB")
    }
}

/// `Mar 04, 14:05` style timestamp used in tables.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%b %d, %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_switches_to_gigabytes_at_1024() {
        assert_eq!(format_size_mb(0), "0 MB");
        assert_eq!(format_size_mb(1023), "1023 MB");
        assert_eq!(format_size_mb(1024), "1.00 GB");
        assert_eq!(format_size_mb(1536), "1.50 GB");
        assert_eq!(format_size_mb(12_800), "12.50 GB");
    }

    #[test]
    fn timestamp_format() {
        let ts = DateTime::parse_from_rfc3339("2024-03-04T14:05:00Z")
            .expect("timestamp")
            .with_timezone(&Utc);
        assert_eq!(format_timestamp(&ts), "Mar 04, 14:05");
    }
}
