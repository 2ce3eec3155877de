//! Shared formatting utilities for size display and console output

use console::Emoji;
use std::time::{SystemTime, UNIX_EPOCH};

/// Rocket emoji for launch/start operations
pub const ROCKET: Emoji = Emoji("🚀", ">");

/// Checkmark emoji for success
pub const CHECKMARK: Emoji = Emoji("✅", "[OK]");

/// Chart emoji for metrics/statistics
pub const CHART: Emoji = Emoji("📊", "~");

/// Microscope emoji for analysis/inspection
pub const MICROSCOPE: Emoji = Emoji("🔍", ">>");

/// Floppy emoji for saved files/backups
pub const FLOPPY: Emoji = Emoji("💾", "*");

/// Warning emoji for caution/alerts
pub const WARNING: Emoji = Emoji("⚠️", "!");

/// Format bytes as human-readable size string
///
/// # Examples
///
/// ```
/// use code_slim::fmt::format_bytes;
///
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1_048_576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a signed byte count, used for snapshot deltas which may be negative
pub fn format_bytes_signed(bytes: i64) -> String {
    if bytes < 0 {
        format!("-{}", format_bytes(bytes.unsigned_abs()))
    } else {
        format!("{}", format_bytes(bytes as u64))
    }
}

/// Format a timestamp as `YYYYMMDD_HHMMSS` for backup directory names.
///
/// Uses simplified date calculation (365 days/year, 30 days/month), so the
/// date component may be off by a few days around month and year boundaries.
/// Backup directories only need to be unique and roughly sortable, which
/// this satisfies without pulling in a calendar crate.
pub fn format_timestamp(time: SystemTime) -> String {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let (date, clock) = split_epoch_secs(secs);
    format!(
        "{:04}{:02}{:02}_{:02}{:02}{:02}",
        date.0, date.1, date.2, clock.0, clock.1, clock.2
    )
}

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS` for report headers.
///
/// Same simplified calendar arithmetic as [`format_timestamp`].
pub fn format_datetime(time: SystemTime) -> String {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let (date, clock) = split_epoch_secs(secs);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        date.0, date.1, date.2, clock.0, clock.1, clock.2
    )
}

fn split_epoch_secs(secs: u64) -> ((u64, u64, u64), (u64, u64, u64)) {
    const SECS_PER_DAY: u64 = 86400;

    let days_since_epoch = secs / SECS_PER_DAY;
    let remaining = secs % SECS_PER_DAY;
    let hours = remaining / 3600;
    let minutes = (remaining % 3600) / 60;
    let seconds = remaining % 60;

    let year = 1970 + (days_since_epoch / 365);
    let day_of_year = days_since_epoch % 365;
    let month = 1 + (day_of_year / 30).min(11);
    let day = 1 + (day_of_year % 30);

    ((year, month, day), (hours, minutes, seconds))
}
