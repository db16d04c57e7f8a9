use chrono::{DateTime, SecondsFormat, Utc};

/// Prefix shared by every object key.
pub const OBJECT_KEY_PREFIX: &str = "pi-";

/// Builds the object key for a result written at `at`.
///
/// The key is [`OBJECT_KEY_PREFIX`] followed by an RFC 3339 timestamp in UTC
/// with whole seconds and a `Z` suffix.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use leibniz_sink::object_key;
///
/// let at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
/// assert_eq!(object_key(at), "pi-2026-10-18T09:30:00Z");
/// ```
#[must_use]
pub fn object_key(at: DateTime<Utc>) -> String {
    format!(
        "{OBJECT_KEY_PREFIX}{}",
        at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

/// [`object_key`] for the current wall-clock time.
#[must_use]
pub fn object_key_now() -> String {
    object_key(Utc::now())
}
