//! Backend test support utilities
//!
//! Logging initialization, unique participant ids and assertions for the
//! draw API's error bodies. Nothing here depends on backend types.

pub mod error_body;
pub mod test_logging;
pub mod unique_helpers;
