#![cfg(test)]

//! Logging for unit tests; delegates to the shared test-support crate so unit
//! and integration tests read the same `TEST_LOG` / `RUST_LOG` settings.

pub fn init() {
    backend_test_support::test_logging::init();
}
