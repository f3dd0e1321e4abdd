//! Event ingestion state machine
//!
//! The [`EventIngestor`] receives engine notifications one at a time, records
//! timestamps into its [`TimestampStore`] and tells the driving loop what to do
//! next. It performs no locking: notifications must come from a single
//! sequential producer.
//!
//! ```text
//!            timestamp (key missing) / end-of-stream / other
//!              ┌─────┐
//!              ▼     │
//!          ┌─────────┴┐  completion key recorded  ┌───────────┐
//!   ──────▶│ Running  ├──────────────────────────▶│ Completed │
//!          └────┬─────┘                           └───────────┘
//!               │ fatal error                     ┌───────────┐
//!               └────────────────────────────────▶│  Failed   │
//!                                                 └───────────┘
//! ```

use tracing::{debug, error, info, warn};

use crate::{
    completion::is_complete,
    error::{LatencyError, MeasureResult},
    model::{TestCase, TimestampEvent},
    store::TimestampStore,
};

/// Notification delivered by the execution engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A named timestamp
    Timestamp(TimestampEvent),
    /// The engine reached end of stream
    EndOfStream,
    /// The engine hit a fatal error
    FatalError(String),
    /// Anything else the engine emits; carries a short description
    Other(String),
}

impl Notification {
    /// Convenience constructor for a timestamp notification
    ///
    /// Returns `None` when the event name is empty.
    pub fn timestamp(name: impl Into<String>, value: impl Into<String>) -> Option<Self> {
        TimestampEvent::new(name, value).map(Notification::Timestamp)
    }
}

/// What the driving loop should do after a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Keep waiting for notifications
    Continue,
    /// Ask the engine to pause; the measurement keeps running
    PauseEngine,
    /// Stop the loop, the run has ended
    Stop,
}

/// State of an ingestor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestState {
    /// Waiting for the completion key
    Running,
    /// Completion key recorded
    Completed,
    /// Engine reported a fatal error
    Failed {
        /// Description reported by the engine
        description: String,
    },
}

impl IngestState {
    /// Whether the state is terminal
    pub fn is_terminal(&self) -> bool {
        !matches!(self, IngestState::Running)
    }
}

/// Ingests engine notifications for one test case
#[derive(Debug)]
pub struct EventIngestor {
    test_case: TestCase,
    store:     TimestampStore,
    state:     IngestState,
}

impl EventIngestor {
    /// Creates a running ingestor for `test_case` with an empty store
    pub fn new(test_case: TestCase) -> Self {
        Self {
            test_case,
            store: TimestampStore::new(),
            state: IngestState::Running,
        }
    }

    /// Handles a single notification and returns the next loop directive
    ///
    /// Once the ingestor is terminal every notification is ignored and
    /// [`Directive::Stop`] is returned again.
    pub fn handle(&mut self, notification: Notification) -> Directive {
        if self.state.is_terminal() {
            debug!(?notification, state = ?self.state, "ignoring notification after run ended");
            return Directive::Stop;
        }

        match notification {
            Notification::Timestamp(event) => {
                debug!(event = %event.name, value = %event.value, "timestamp notification");
                self.store.record(event);

                if is_complete(self.test_case, &self.store) {
                    info!(
                        test_case = %self.test_case,
                        key = self.test_case.completion_key(),
                        "measurement complete"
                    );
                    self.state = IngestState::Completed;
                    Directive::Stop
                } else {
                    Directive::Continue
                }
            }
            Notification::EndOfStream => {
                info!("end of stream, pausing engine");
                Directive::PauseEngine
            }
            Notification::FatalError(description) => {
                error!(%description, "engine reported a fatal error");
                self.state = IngestState::Failed { description };
                Directive::Stop
            }
            Notification::Other(kind) => {
                warn!(%kind, "ignoring unrecognised notification");
                Directive::Continue
            }
        }
    }

    /// Whether the run has ended, successfully or not
    pub fn completed(&self) -> bool {
        self.state.is_terminal()
    }

    /// Current state
    pub fn state(&self) -> &IngestState {
        &self.state
    }

    /// The selected test case
    pub fn test_case(&self) -> TestCase {
        self.test_case
    }

    /// Read-only view of the recorded timestamps
    pub fn store(&self) -> &TimestampStore {
        &self.store
    }

    /// Consumes the ingestor and hands over its store
    ///
    /// # Errors
    ///
    /// - [`LatencyError::EngineFailure`] if the engine failed
    /// - [`LatencyError::EngineExhausted`] if the run never completed
    pub fn into_store(self) -> MeasureResult<TimestampStore> {
        match self.state {
            IngestState::Completed => Ok(self.store),
            IngestState::Failed { description } => Err(LatencyError::EngineFailure { description }),
            IngestState::Running => Err(LatencyError::EngineExhausted),
        }
    }
}
