//! Run configuration
//!
//! [`RunConfig`] gathers everything a measurement run needs besides the
//! notification stream itself. Build it with [`RunConfig::builder`] and call
//! [`RunConfig::validate`] before starting the run.

use std::{path::PathBuf, time::Duration};

use serde::Serialize;

use crate::{
    error::{LatencyError, MeasureResult},
    model::{Resolution, TestCase},
    sink::RecordFormat,
};

/// Default bound on a whole run
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration of one measurement run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    /// Selected test case
    pub test_case:    TestCase,
    /// Capture resolution, reported in the result record
    pub resolution:   Option<Resolution>,
    /// Number of buffers the capture pipeline is asked to produce
    pub num_buffers:  u32,
    /// Where the pipeline writes captured images (informational)
    pub output_image: Option<PathBuf>,
    /// File result records are appended to
    pub results_file: Option<PathBuf>,
    /// Line format of appended records
    pub format:       RecordFormat,
    /// Side-channel file holding the snapshot instant
    pub side_channel: Option<PathBuf>,
    /// Upper bound on the wait for completion
    #[serde(with = "duration_ms")]
    pub timeout:      Duration,
}

impl RunConfig {
    /// Starts a builder for `test_case`
    pub fn builder(test_case: TestCase) -> RunConfigBuilder {
        RunConfigBuilder::new(test_case)
    }

    /// Checks parameter ranges and test-case specific requirements
    ///
    /// # Errors
    ///
    /// [`LatencyError::InvalidParameter`] naming the first offending parameter.
    pub fn validate(&self) -> MeasureResult<()> {
        if let Some(resolution) = self.resolution {
            if resolution.width == 0 || resolution.height == 0 {
                return Err(invalid("resolution", format!("{resolution} has a zero dimension")));
            }
        }

        if self.num_buffers == 0 {
            return Err(invalid("num_buffers", "must be greater than zero"));
        }

        if self.timeout.is_zero() {
            return Err(invalid("timeout", "must be greater than zero"));
        }

        match (self.test_case.uses_side_channel(), &self.side_channel) {
            (true, None) => Err(invalid(
                "side_channel",
                format!("{} needs a side-channel file", self.test_case),
            )),
            (false, Some(path)) => Err(invalid(
                "side_channel",
                format!("{} does not read {}", self.test_case, path.display()),
            )),
            _ => Ok(()),
        }
    }
}

fn invalid(parameter: &str, reason: impl Into<String>) -> LatencyError {
    LatencyError::InvalidParameter {
        parameter: parameter.to_string(),
        reason:    reason.into(),
    }
}

/// Builder for [`RunConfig`]
#[derive(Debug, Clone)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    fn new(test_case: TestCase) -> Self {
        Self {
            config: RunConfig {
                test_case,
                resolution: None,
                num_buffers: 1,
                output_image: None,
                results_file: None,
                format: RecordFormat::default(),
                side_channel: None,
                timeout: DEFAULT_TIMEOUT,
            },
        }
    }

    /// Sets the capture resolution
    pub fn resolution(mut self, width: u32, height: u32) -> Self {
        self.config.resolution = Some(Resolution::new(width, height));
        self
    }

    /// Sets the buffer count
    pub fn num_buffers(mut self, num_buffers: u32) -> Self {
        self.config.num_buffers = num_buffers;
        self
    }

    /// Sets the image output path
    pub fn output_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_image = Some(path.into());
        self
    }

    /// Sets the results file
    pub fn results_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.results_file = Some(path.into());
        self
    }

    /// Sets the record format
    pub fn format(mut self, format: RecordFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Sets the side-channel file
    pub fn side_channel(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.side_channel = Some(path.into());
        self
    }

    /// Sets the run timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Finishes the builder without validating
    pub fn build(self) -> RunConfig {
        self.config
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }
}
