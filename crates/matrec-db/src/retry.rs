//! Turso transient error detection.
//!
//! Hosted Turso databases occasionally reject requests while cloud nodes are
//! recycled or while shared locks are contended. These surface as Hrana API
//! errors and resolve on their own within seconds. Local files never see
//! them, so retries are only enabled for remote connections.

/// Detect transient Turso infrastructure and transport errors.
///
/// The predicate is narrow: SQL, constraint, and type errors are never retried.
pub fn is_transient_error(e: &libsql::Error) -> bool {
    let msg = e.to_string();
    msg.contains("unable to acquire shared lock")
        || msg.contains("deletion must be in progress")
        || msg.contains("connection reset")
        || msg.contains("connection closed")
        || msg.contains("timed out")
        || msg.contains("503 Service Unavailable")
}
