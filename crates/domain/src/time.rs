//! Clock helpers for frame reception times and snapshot ages.

use chrono::{DateTime, Utc};

/// UTC instant at which a frame was received or a snapshot was written.
pub type Timestamp = DateTime<Utc>;

#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Whole seconds elapsed since `earlier`, clamped at zero for clocks that
/// went backwards.
#[must_use]
pub fn seconds_since(earlier: Timestamp) -> i64 {
    (now() - earlier).num_seconds().max(0)
}

/// Milliseconds elapsed since `earlier`, clamped at zero.
#[must_use]
pub fn millis_since(earlier: Timestamp) -> i64 {
    (now() - earlier).num_milliseconds().max(0)
}
