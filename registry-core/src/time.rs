//! Timestamp policy: a supplied `when` is used verbatim unless it is
//! zero, negative, or unreasonably far in the future, in which case
//! "now" is substituted.

use chrono::Utc;

/// How far into the future a supplied `when` is still trusted, before
/// being clamped to "now". Generous enough to absorb clock skew between
/// a browser and this node.
const FUTURE_SLACK_SECS: i64 = 300;

/// Current time, in seconds since the epoch.
pub fn now_secs() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Normalize a caller-supplied timestamp per the policy above.
///
/// `when_raw` is `i64` because callers may parse it from a query string
/// and a negative value must be rejected rather than wrapped.
pub fn normalize(when_raw: i64) -> u64 {
    let now = now_secs() as i64;
    if when_raw <= 0 || when_raw > now + FUTURE_SLACK_SECS {
        now as u64
    } else {
        when_raw as u64
    }
}

/// Monotonic merge: the larger of a stored timestamp and a freshly
/// supplied one, so a visit timestamp never moves backwards.
pub fn merge_last_t(stored: u64, when: u64) -> u64 {
    stored.max(when)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_clamped_to_now() {
        let now = now_secs();
        let normalized = normalize(0);
        assert!(normalized >= now);
    }

    #[test]
    fn negative_is_clamped_to_now() {
        let now = now_secs();
        assert!(normalize(-100) >= now);
    }

    #[test]
    fn far_future_is_clamped() {
        let now = now_secs() as i64;
        let normalized = normalize(now + 1_000_000);
        assert!((normalized as i64) <= now + FUTURE_SLACK_SECS);
    }

    #[test]
    fn reasonable_value_passes_through() {
        let now = now_secs() as i64;
        let when = now - 1000;
        assert_eq!(normalize(when), when as u64);
    }

    #[test]
    fn merge_keeps_the_larger_value() {
        assert_eq!(merge_last_t(100, 200), 200);
        assert_eq!(merge_last_t(200, 100), 200);
        assert_eq!(merge_last_t(100, 100), 100);
    }
}
