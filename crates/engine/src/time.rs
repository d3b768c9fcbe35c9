//! Clock and timestamp boundary.
//!
//! Upstream booking records carry timestamps in several historical shapes:
//! RFC 3339 from the current API and naive `YYYY-MM-DD HH:MM[:SS]` strings
//! from the legacy store. Naive values are local Vietnam time.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

/// Vietnam timezone offset (UTC+7, Indochina Time).
const ICT_OFFSET_SECS: i32 = 7 * 3600;

/// Vietnam timezone (UTC+7).
pub fn vietnam_now() -> DateTime<FixedOffset> {
    let ict = FixedOffset::east_opt(ICT_OFFSET_SECS).unwrap();
    Utc::now().with_timezone(&ict)
}

/// Today's date in Vietnam, `YYYY-MM-DD`.
pub fn vietnam_today() -> String {
    vietnam_now().format("%Y-%m-%d").to_string()
}

/// Parse an upstream timestamp into UTC.
///
/// Accepts RFC 3339 and the legacy naive formats. Anything else returns
/// `None` and the caller degrades to its safe default.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let ict = FixedOffset::east_opt(ICT_OFFSET_SECS).unwrap();
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            if let Some(dt) = ict.from_local_datetime(&naive).single() {
                return Some(dt.with_timezone(&Utc));
            }
        }
    }

    tracing::warn!("unparseable upstream timestamp: {:?}", raw);
    None
}

// ── Tests ──
