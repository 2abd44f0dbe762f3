use std::time::SystemTime;

use chrono::{DateTime, Utc};
use revfs_view::FileInfo;

/// Format a key-value pair for display.
pub fn kv(key: &str, value: &str) -> String {
    format!("{key:>10}: {value}")
}

/// `2024-01-02 03:04:05 UTC`
pub fn format_time(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
}

/// IMF-fixdate, as used by `Last-Modified`.
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// One `ls -l` style line.
pub fn listing_line(info: &FileInfo) -> String {
    let suffix = if info.is_dir() { "/" } else { "" };
    format!(
        "{} {:>10} {} {}{}",
        info.mode(),
        info.size(),
        format_time(info.mod_time()),
        info.name(),
        suffix
    )
}
