//! Per-run measurement context
//!
//! A [`MeasurementSession`] is created once per run from the selected test
//! case. It owns the ingestor (and through it the timestamp store) and lends
//! read-only views to completion detection and latency computation.

use tracing::{info, warn};

use crate::{
    calculator::compute,
    error::MeasureResult,
    ingest::{Directive, EventIngestor, IngestState, Notification},
    model::{LatencyResult, TestCase},
    store::TimestampStore,
};

/// State of one latency measurement run
#[derive(Debug)]
pub struct MeasurementSession {
    ingestor: EventIngestor,
}

impl MeasurementSession {
    /// Starts a session for `test_case`
    pub fn new(test_case: TestCase) -> Self {
        info!(test_case = %test_case, start = test_case.start_key(), "starting measurement");
        Self {
            ingestor: EventIngestor::new(test_case),
        }
    }

    /// Forwards one engine notification
    pub fn handle(&mut self, notification: Notification) -> Directive {
        self.ingestor.handle(notification)
    }

    /// Whether the run has reached a terminal state
    pub fn completed(&self) -> bool {
        self.ingestor.completed()
    }

    /// Current ingestion state
    pub fn state(&self) -> &IngestState {
        self.ingestor.state()
    }

    /// The selected test case
    pub fn test_case(&self) -> TestCase {
        self.ingestor.test_case()
    }

    /// Timestamps recorded so far
    pub fn store(&self) -> &TimestampStore {
        self.ingestor.store()
    }

    /// Ends the session and computes its latency
    ///
    /// `external_value` is the side-channel end instant for test cases that
    /// use one; it is ignored otherwise.
    ///
    /// # Errors
    ///
    /// Engine failures and incomplete runs are reported before any
    /// computation; otherwise see [`compute`].
    pub fn finish(self, external_value: Option<f64>) -> MeasureResult<LatencyResult> {
        let test_case = self.ingestor.test_case();
        let store = self.ingestor.into_store()?;

        compute(test_case, &store, external_value)
            .inspect(|result| {
                info!(label = %result.label, delta = result.delta, "latency computed");
            })
            .inspect_err(|error| warn!(%error, "latency computation failed"))
    }
}
