//! Primitive type aliases shared across crates.

/// Job identifiers are opaque strings chosen by the caller (UUID v4 in
/// practice). They are never interpreted by the store.
pub type JobId = String;

/// All timestamps are epoch milliseconds (UTC).
pub type TimestampMs = i64;

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> TimestampMs {
    chrono::Utc::now().timestamp_millis()
}
