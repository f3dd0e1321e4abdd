//! Shared test utilities for measurement integration tests

#![allow(dead_code)]

use std::{io::Write, time::Duration};

use capture_latency::{
    engine::{ScriptedEngine, drive},
    error::MeasureResult,
    ingest::Notification,
    model::{LatencyResult, TestCase},
    session::MeasurementSession,
};

/// Generous bound for scripted runs
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds a timestamp notification, panicking on an empty name
pub fn ts(name: &str, value: &str) -> Notification {
    Notification::timestamp(name, value).expect("event name should not be empty")
}

/// Runs `script` through a fresh session for `test_case` and finishes it
pub async fn run_script(
    test_case: TestCase,
    script: Vec<Notification>,
    external_value: Option<f64>,
) -> MeasureResult<LatencyResult> {
    let mut engine = ScriptedEngine::new(script);
    let mut session = MeasurementSession::new(test_case);
    drive(&mut engine, &mut session, TEST_TIMEOUT).await?;
    session.finish(external_value)
}

/// Writes `contents` to a fresh temporary file
pub fn temp_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file should be created");
    file.write_all(contents.as_bytes())
        .expect("temp file should be writable");
    file
}

/// Asserts two deltas agree to within a nanosecond
pub fn assert_delta(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "delta {actual} differs from expected {expected}"
    );
}
