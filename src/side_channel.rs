//! Snapshot side channel
//!
//! The shot-to-snapshot case takes its end instant from a value written
//! outside the event stream by the snapshot stage. The value is read once,
//! after the run completes, and is only ever used for that test case.

use std::path::Path;

use tracing::debug;

use crate::{
    error::{LatencyError, MeasureResult},
    model::parse_seconds,
};

/// Reads the snapshot instant (seconds) from `path`
///
/// The file must hold a single real number, surrounding whitespace allowed.
///
/// # Errors
///
/// [`LatencyError::SideChannelUnreadable`] if the file cannot be read or does
/// not hold a finite number.
pub async fn read_snapshot_value(path: impl AsRef<Path>) -> MeasureResult<f64> {
    let path = path.as_ref();
    let unreadable = |reason: String| LatencyError::SideChannelUnreadable {
        path: path.to_path_buf(),
        reason,
    };

    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| unreadable(e.to_string()))?;

    let raw = contents.trim();
    if raw.is_empty() {
        return Err(unreadable("empty file".to_string()));
    }

    let value = parse_seconds(raw)
        .ok_or_else(|| unreadable(format!("'{raw}' is not a timestamp")))?;
    debug!(path = %path.display(), value, "read snapshot side channel");
    Ok(value)
}
