//! Latency computation
//!
//! Turns a completed [`TimestampStore`] into a validated [`LatencyResult`].
//! The function is pure, so it can be exercised without any engine.

use crate::{
    error::{LatencyError, MeasureResult},
    model::{EndSource, LatencyResult, TestCase},
    store::TimestampStore,
};

/// Key reported when the side-channel value is missing
pub const SIDE_CHANNEL_KEY: &str = "side channel";

/// Computes the latency for `test_case`
///
/// The start instant always comes from the store. The end instant comes from
/// the store, or from `external_value` when the test case reads it from the
/// side channel; `external_value` is ignored otherwise.
///
/// # Errors
///
/// - [`LatencyError::MissingTimestamp`] when either instant is absent or
///   malformed
/// - [`LatencyError::NonPositiveDuration`] when `end - start <= 0`
///
/// # Examples
///
/// ```
/// use capture_latency::{calculator::compute, model::TestCase, store::TimestampStore};
///
/// let mut store = TimestampStore::new();
/// store.insert("null-to-ready transition", "1.000");
/// store.insert("paused-to-playing transition", "1.250");
///
/// let result = compute(TestCase::StandbyToFirstShot, &store, None).unwrap();
/// assert_eq!(result.label, "StandbyToFirstShot");
/// assert!((result.delta - 0.25).abs() < 1e-9);
/// ```
pub fn compute(
    test_case: TestCase,
    store: &TimestampStore,
    external_value: Option<f64>,
) -> MeasureResult<LatencyResult> {
    let start_key = test_case.start_key();
    let start = store
        .lookup(start_key)
        .ok_or_else(|| LatencyError::MissingTimestamp {
            key: start_key.to_string(),
        })?;

    let end = match test_case.end_source() {
        EndSource::Event(end_key) => {
            store
                .lookup(end_key)
                .ok_or_else(|| LatencyError::MissingTimestamp {
                    key: end_key.to_string(),
                })?
        }
        EndSource::SideChannel => external_value
            .filter(|value| value.is_finite())
            .ok_or_else(|| LatencyError::MissingTimestamp {
                key: SIDE_CHANNEL_KEY.to_string(),
            })?,
    };

    let delta = end - start;
    if delta.is_nan() || delta <= 0.0 {
        return Err(LatencyError::NonPositiveDuration { start, end });
    }

    Ok(LatencyResult {
        label: test_case.label().to_string(),
        delta,
    })
}
