//! Execution engine boundary and driving loop
//!
//! The measurement core never talks to the capture pipeline directly. It
//! needs an engine that delivers notifications in order and accepts pause and
//! stop requests; this module defines that contract and the loop that pumps
//! notifications into a [`MeasurementSession`].
//!
//! - [`ExecutionEngine`]: trait implemented by engine adapters
//! - [`LineEngine`]: replays a line-oriented notification log (file or stdin)
//! - [`ScriptedEngine`]: in-memory engine for tests
//! - [`drive`]: forwards notifications until the session ends, bounded by a
//!   timeout

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::{
    error::{LatencyError, MeasureResult},
    ingest::{Directive, Notification},
    session::MeasurementSession,
};

pub mod line;
pub mod scripted;

pub use line::LineEngine;
pub use scripted::ScriptedEngine;

/// Source of engine notifications
///
/// Implementations deliver notifications strictly in order from a single
/// producer. The driver awaits one notification at a time.
#[async_trait]
pub trait ExecutionEngine: Send {
    /// Waits for the next notification
    ///
    /// Returns `Ok(None)` once the engine has nothing more to deliver.
    async fn next_notification(&mut self) -> MeasureResult<Option<Notification>>;

    /// Asks the engine to pause (sent on end of stream)
    async fn request_pause(&mut self) -> MeasureResult<()>;

    /// Asks the engine to stop; called once when the driving loop ends
    async fn request_stop(&mut self) -> MeasureResult<()>;
}

/// Pumps notifications from `engine` into `session` until the run ends
///
/// The loop stops when the session completes or fails, or when the engine
/// runs dry. The engine is asked to stop in every case. Whether the run
/// produced a latency is decided afterwards by
/// [`MeasurementSession::finish`].
///
/// # Errors
///
/// - [`LatencyError::EngineTimeout`] if the session did not end within
///   `timeout`
/// - any error the engine itself returns
pub async fn drive<E>(
    engine: &mut E,
    session: &mut MeasurementSession,
    timeout: Duration,
) -> MeasureResult<()>
where
    E: ExecutionEngine + ?Sized,
{
    let outcome = tokio::time::timeout(timeout, pump(engine, session)).await;

    if let Err(error) = engine.request_stop().await {
        warn!(%error, "engine did not accept stop request");
    }

    match outcome {
        Ok(result) => result,
        Err(_) => {
            let duration_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            warn!(duration_ms, test_case = %session.test_case(), "measurement timed out");
            Err(LatencyError::EngineTimeout { duration_ms })
        }
    }
}

async fn pump<E>(engine: &mut E, session: &mut MeasurementSession) -> MeasureResult<()>
where
    E: ExecutionEngine + ?Sized,
{
    while let Some(notification) = engine.next_notification().await? {
        match session.handle(notification) {
            Directive::Continue => {}
            Directive::PauseEngine => {
                debug!("requesting engine pause");
                engine.request_pause().await?;
            }
            Directive::Stop => {
                info!(state = ?session.state(), "run ended, stopping engine");
                return Ok(());
            }
        }
    }

    warn!(
        recorded = session.store().len(),
        "engine exhausted before the measurement completed"
    );
    Ok(())
}
