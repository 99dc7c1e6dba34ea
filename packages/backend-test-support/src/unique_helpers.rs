//! Test helpers for generating unique test data
//!
//! ULID-based ids keep tests isolated when they share a database.

use ulid::Ulid;

/// Generate a unique string with the given prefix
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("draw");
/// let id2 = unique_str("draw");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("draw-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique participant id that fits the 64 character limit
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_guest_id;
///
/// let guest = unique_guest_id();
/// assert!(guest.starts_with("guest-"));
/// assert!(guest.len() <= 64);
/// ```
pub fn unique_guest_id() -> String {
    unique_str("guest")
}
