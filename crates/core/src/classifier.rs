//! Activity classification.
//!
//! A topic counts as active when either its last write or its last read
//! happened strictly less than the inactivity window ago. The boundary is
//! exclusive: activity exactly one window old is already inactive.

use chrono::{DateTime, Duration, Utc};

/// Classifies a topic as active or inactive, evaluated against `now`.
///
/// An absent timestamp is infinitely old: it never satisfies the window test
/// on its own, but does not stop the other timestamp from qualifying. With a
/// zero-length window only strictly-future timestamps classify as active.
pub fn is_active_at(
    now: DateTime<Utc>,
    last_write: Option<DateTime<Utc>>,
    last_read: Option<DateTime<Utc>>,
    window: Duration,
) -> bool {
    if last_write.is_none() && last_read.is_none() {
        return false;
    }

    let within = |ts: Option<DateTime<Utc>>| ts.is_some_and(|ts| now - ts < window);

    within(last_write) || within(last_read)
}

/// Classifies a topic against the current wall clock.
pub fn is_active(
    last_write: Option<DateTime<Utc>>,
    last_read: Option<DateTime<Utc>>,
    inactivity_days: i64,
) -> bool {
    is_active_at(
        Utc::now(),
        last_write,
        last_read,
        Duration::days(inactivity_days),
    )
}
