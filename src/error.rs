//! Error types for latency measurement
//!
//! This module defines the error taxonomy of a measurement run together with
//! actionable remediation hints. Every variant is terminal for the run: the
//! core classifies and reports, retry policy belongs to whoever launched it.

use std::path::PathBuf;

/// Result type alias for measurement operations
pub type MeasureResult<T> = Result<T, LatencyError>;

/// Error type for latency measurement runs
///
/// Each variant carries the context needed to diagnose it and provides a
/// remediation hint through the `remediation_hint()` method.
#[derive(Debug, thiserror::Error)]
pub enum LatencyError {
    /// A timestamp needed for the delta was absent or malformed
    #[error("Missing timestamp for event '{key}'")]
    MissingTimestamp {
        /// Event name (or side channel) that had no usable value
        key: String,
    },

    /// End instant did not come strictly after the start instant
    #[error("Non-positive duration: end {end} is not after start {start}")]
    NonPositiveDuration {
        /// Start timestamp in seconds
        start: f64,
        /// End timestamp in seconds
        end:   f64,
    },

    /// The execution engine reported a fatal error
    #[error("Execution engine failure: {description}")]
    EngineFailure {
        /// Description reported by the engine
        description: String,
    },

    /// Selected test case does not exist
    #[error("Unknown test case '{name}'")]
    UnknownTestCase {
        /// The name that failed to match
        name: String,
    },

    /// Run did not complete within the configured timeout
    #[error("Measurement timed out after {duration_ms}ms")]
    EngineTimeout {
        /// Timeout duration in milliseconds
        duration_ms: u64,
    },

    /// Engine stopped delivering notifications before the run completed
    #[error("Execution engine ran out of notifications before the measurement completed")]
    EngineExhausted,

    /// Invalid configuration parameter
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: String,
        /// Reason why it's invalid
        reason:    String,
    },

    /// Side-channel value could not be read or parsed
    #[error("Side channel '{}' unreadable: {reason}", path.display())]
    SideChannelUnreadable {
        /// Side-channel file
        path:   PathBuf,
        /// What went wrong
        reason: String,
    },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Result record serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LatencyError {
    /// Returns an actionable remediation hint for this error
    ///
    /// # Examples
    ///
    /// ```
    /// use capture_latency::error::LatencyError;
    ///
    /// let error = LatencyError::UnknownTestCase {
    ///     name: "shot-to-moon".to_string(),
    /// };
    ///
    /// let hint = error.remediation_hint();
    /// assert!(hint.contains("standby-to-first-shot"));
    /// ```
    pub fn remediation_hint(&self) -> &str {
        match self {
            LatencyError::MissingTimestamp { .. } => {
                "A required event never arrived. Check that the pipeline elements emitting the \
                 start and end markers are present and that the capture produced at least one \
                 buffer."
            }
            LatencyError::NonPositiveDuration { .. } => {
                "The end timestamp is not after the start timestamp. Check that both markers \
                 come from the same clock and that events are correlated with the right test \
                 case."
            }
            LatencyError::EngineFailure { .. } => {
                "The execution engine aborted the run. Inspect the engine log for the failing \
                 element and re-run the capture."
            }
            LatencyError::UnknownTestCase { .. } => {
                "Use one of standby-to-first-shot, shot-to-shot, shot-to-save or \
                 shot-to-snapshot."
            }
            LatencyError::EngineTimeout { .. } => {
                "The completion marker never arrived. Verify the selected test case matches the \
                 pipeline, or raise the timeout for slow hardware."
            }
            LatencyError::EngineExhausted => {
                "The notification stream ended early. Make sure the engine log is complete and \
                 contains the completion marker for the selected test case."
            }
            LatencyError::InvalidParameter { parameter, .. } => match parameter.as_str() {
                "resolution" => "Width and height must both be given and be greater than zero.",
                "num_buffers" => "The buffer count must be greater than zero.",
                "timeout" => "The timeout must be greater than zero.",
                "side_channel" => {
                    "shot-to-snapshot requires a side-channel file; other test cases must not \
                     set one."
                }
                _ => "Check the parameter value against the command-line help.",
            },
            LatencyError::SideChannelUnreadable { .. } => {
                "The snapshot side channel must contain a single timestamp in seconds. Check \
                 that the snapshot stage wrote it before the run completed."
            }
            LatencyError::Io(_) => {
                "An I/O error occurred. Check file permissions, disk space, and that the output \
                 directory exists."
            }
            LatencyError::Serialization(_) => "Failed to encode the result record.",
        }
    }

    /// Whether the error means the run produced data that cannot be trusted
    /// (as opposed to no data at all)
    pub fn is_computation_failure(&self) -> bool {
        matches!(
            self,
            LatencyError::MissingTimestamp { .. } | LatencyError::NonPositiveDuration { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_timestamp_message() {
        let error = LatencyError::MissingTimestamp {
            key: "save complete".to_string(),
        };

        let msg = error.to_string();
        assert!(msg.contains("Missing timestamp"));
        assert!(msg.contains("save complete"));
        assert!(error.remediation_hint().contains("never arrived"));
    }

    #[test]
    fn test_non_positive_duration_message() {
        let error = LatencyError::NonPositiveDuration {
            start: 5.0,
            end:   5.0,
        };

        let msg = error.to_string();
        assert!(msg.contains("Non-positive duration"));
        assert!(msg.contains('5'));
        assert!(error.remediation_hint().contains("same clock"));
    }

    #[test]
    fn test_engine_failure_message() {
        let error = LatencyError::EngineFailure {
            description: "Internal data stream error".to_string(),
        };

        let msg = error.to_string();
        assert!(msg.contains("engine failure"));
        assert!(msg.contains("Internal data stream error"));
    }

    #[test]
    fn test_unknown_test_case_message() {
        let error = LatencyError::UnknownTestCase {
            name: "burst".to_string(),
        };

        assert!(error.to_string().contains("burst"));
        assert!(error.remediation_hint().contains("shot-to-snapshot"));
    }

    #[test]
    fn test_engine_timeout_message() {
        let error = LatencyError::EngineTimeout { duration_ms: 5000 };

        let msg = error.to_string();
        assert!(msg.contains("timed out"));
        assert!(msg.contains("5000"));
        assert!(error.remediation_hint().contains("timeout"));
    }

    #[test]
    fn test_invalid_parameter_hints() {
        let resolution = LatencyError::InvalidParameter {
            parameter: "resolution".to_string(),
            reason:    "width is zero".to_string(),
        };
        assert!(resolution.to_string().contains("Invalid parameter 'resolution'"));
        assert!(resolution.remediation_hint().contains("greater than zero"));

        let other = LatencyError::InvalidParameter {
            parameter: "format".to_string(),
            reason:    "unsupported".to_string(),
        };
        assert!(other.remediation_hint().contains("command-line help"));
    }

    #[test]
    fn test_side_channel_unreadable_message() {
        let error = LatencyError::SideChannelUnreadable {
            path:   PathBuf::from("/tmp/snapshot.ts"),
            reason: "empty file".to_string(),
        };

        let msg = error.to_string();
        assert!(msg.contains("/tmp/snapshot.ts"));
        assert!(msg.contains("empty file"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: LatencyError = io_error.into();

        assert!(error.to_string().contains("I/O error"));
        assert!(error.remediation_hint().contains("permissions"));
    }

    #[test]
    fn test_computation_failure_classification() {
        assert!(LatencyError::MissingTimestamp { key: "x".into() }.is_computation_failure());
        assert!(
            LatencyError::NonPositiveDuration {
                start: 1.0,
                end:   0.5,
            }
            .is_computation_failure()
        );
        assert!(!LatencyError::EngineExhausted.is_computation_failure());
        assert!(
            !LatencyError::EngineFailure {
                description: "boom".into(),
            }
            .is_computation_failure()
        );
    }
}
