//! Time primitives shared by the whole workspace.
//!
//! All timestamps are UTC. Serialization uses RFC 3339 via chrono's
//! serde support.

/// A point in time, UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Current wall-clock time.
#[must_use]
pub fn now() -> Timestamp {
    chrono::Utc::now()
}

/// Returns `ts` advanced by `seconds`.
#[must_use]
pub fn plus_seconds(ts: Timestamp, seconds: u32) -> Timestamp {
    ts + chrono::Duration::seconds(i64::from(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_add_seconds() {
        let base = now();
        let later = plus_seconds(base, 300);
        assert_eq!((later - base).num_seconds(), 300);
    }

    #[test]
    fn should_round_trip_through_rfc3339() {
        let ts = now();
        let text = ts.to_rfc3339();
        let parsed: Timestamp = text.parse().unwrap();
        assert_eq!(parsed, ts);
    }
}
