use chrono::{DateTime, SubsecRound, Utc};

/// Current time, truncated to the microsecond precision the store keeps.
///
/// Truncating up front means a value returned from an action compares
/// equal to the same value read back from the database.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
