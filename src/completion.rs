//! Completion detection
//!
//! A run is complete once the test case's completion key has been recorded.
//! The key differs per test case (a lifecycle transition for most, the save
//! marker for shot-to-save), so the decision always goes through the test
//! case table.

use crate::{model::TestCase, store::TimestampStore};

/// Returns whether `store` holds enough data to finish `test_case`
///
/// Presence of the raw entry is enough: a malformed completion value still
/// ends the run, and the calculator then reports it as missing.
pub fn is_complete(test_case: TestCase, store: &TimestampStore) -> bool {
    store.contains(test_case.completion_key())
}
