//! End-to-end measurement run
//!
//! Wires a validated [`RunConfig`] and an [`ExecutionEngine`] together:
//! drive the engine until the session ends, read the side channel when the
//! test case needs it, compute the latency and hand the record to the sink.

use tracing::info;

use crate::{
    config::RunConfig,
    engine::{ExecutionEngine, drive},
    error::MeasureResult,
    ingest::IngestState,
    session::MeasurementSession,
    side_channel::read_snapshot_value,
    sink::{self, ResultRecord},
};

/// Runs one measurement and returns its record
///
/// The record is appended to the configured results file, if any. Printing
/// is left to the caller.
///
/// # Errors
///
/// Invalid configuration is rejected before the engine is touched. Engine
/// failures, timeouts and computation failures are returned as is; nothing is
/// written in that case.
pub async fn measure<E>(config: &RunConfig, engine: &mut E) -> MeasureResult<ResultRecord>
where
    E: ExecutionEngine + ?Sized,
{
    config.validate()?;
    info!(
        test_case = %config.test_case,
        num_buffers = config.num_buffers,
        timeout_ms = u64::try_from(config.timeout.as_millis()).unwrap_or(u64::MAX),
        "measurement run configured"
    );

    let mut session = MeasurementSession::new(config.test_case);
    drive(engine, &mut session, config.timeout).await?;

    // Only a completed run reads it: the snapshot stage has written it by then,
    // and a failed or exhausted run must report the engine's error instead.
    let external_value = match (&config.side_channel, session.state()) {
        (Some(path), IngestState::Completed) if config.test_case.uses_side_channel() => {
            Some(read_snapshot_value(path).await?)
        }
        _ => None,
    };

    let result = session.finish(external_value)?;
    let record = ResultRecord::new(&result, config.resolution);

    if let Some(path) = &config.results_file {
        sink::append(path, &record, config.format).await?;
    }

    Ok(record)
}
