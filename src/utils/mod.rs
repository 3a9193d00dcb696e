use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

/// Hex SHA-256 of the file content. This is the content-addressed primary
/// key, so it must be stable across upload and re-derivation at ingest time.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// ISO-8601 UTC timestamp with microsecond precision, e.g.
/// `2024-01-01T12:00:00.123456Z`.
pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Lenient ISO-8601 parsing for query bounds and stored timestamps:
/// full RFC 3339 first, then a bare date taken as midnight UTC.
pub fn parse_iso_datetime(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}
