//! Export file naming

use chrono::{DateTime, FixedOffset, Utc};

/// `<prefix>_<timestamp>.<extension>`
///
/// The timestamp is `now` at `offset`, written as `M/D/YYYY, h:mm:ss AM`
/// with every comma, colon, slash and whitespace character replaced by `_`.
#[must_use]
pub fn export_file_name(prefix: &str, now: DateTime<Utc>, offset: FixedOffset, extension: &str) -> String {
    let local = now.with_timezone(&offset);
    let stamp: String = local
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
        .chars()
        .map(|c| {
            if matches!(c, ',' | ':' | '/') || c.is_whitespace() {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("{prefix}_{stamp}.{extension}")
}
