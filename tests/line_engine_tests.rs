//! Line-protocol replay tests
//!
//! Feeds notification logs from disk through the full measurement run,
//! including the side channel and the results file.

mod common;

use std::time::Duration;

use capture_latency::{
    config::RunConfig,
    engine::LineEngine,
    error::LatencyError,
    model::TestCase,
    run::measure,
    sink::RecordFormat,
};
use common::{assert_delta, temp_file};

const SHOT_LOG: &str = "\
# goocamera shot run
timestamp null-to-ready transition 0.100
timestamp paused-to-playing transition 0.350
message qos
timestamp paused-to-playing transition 0.900
timestamp playing-to-paused transition 0.725
eos
";

#[tokio::test]
async fn test_replay_shot_to_shot_from_file() {
    let log = temp_file(SHOT_LOG);
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results.tsv");
    let config = RunConfig::builder(TestCase::ShotToShot)
        .resolution(1280, 720)
        .results_file(&results)
        .format(RecordFormat::Tsv)
        .build();

    let mut engine = LineEngine::open(log.path()).await.unwrap();
    let record = measure(&config, &mut engine).await.unwrap();

    assert_delta(record.delta, 0.375);
    assert!(engine.stopped());
    let contents = std::fs::read_to_string(&results).unwrap();
    assert_eq!(contents, "ShotToShot\t1280x720\t0.375000\n");
}

#[tokio::test]
async fn test_replay_standby_ignores_later_lines() {
    let log = temp_file(SHOT_LOG);
    let config = RunConfig::builder(TestCase::StandbyToFirstShot).build();

    let mut engine = LineEngine::open(log.path()).await.unwrap();
    let record = measure(&config, &mut engine).await.unwrap();

    assert_eq!(record.label, "StandbyToFirstShot");
    assert_delta(record.delta, 0.25);
    assert!(record.resolution.is_none());
}

#[tokio::test]
async fn test_replay_snapshot_with_side_channel() {
    let log = temp_file(SHOT_LOG);
    let side = temp_file("0.600\n");
    let config = RunConfig::builder(TestCase::ShotToSnapshot)
        .side_channel(side.path())
        .build();

    let mut engine = LineEngine::open(log.path()).await.unwrap();
    let record = measure(&config, &mut engine).await.unwrap();

    assert_eq!(record.label, "ShotToSnapshot");
    assert_delta(record.delta, 0.25);
}

#[tokio::test]
async fn test_replay_engine_error() {
    let log = temp_file(
        "timestamp paused-to-playing transition 1.0\nerror not-negotiated (-4)\n\
         timestamp playing-to-paused transition 1.5\n",
    );
    let config = RunConfig::builder(TestCase::ShotToShot).build();

    let mut engine = LineEngine::open(log.path()).await.unwrap();
    let err = measure(&config, &mut engine).await.unwrap_err();

    assert!(matches!(
        err,
        LatencyError::EngineFailure { ref description } if description == "not-negotiated (-4)"
    ));
}

#[tokio::test]
async fn test_replay_save_log_without_marker() {
    let log = temp_file(SHOT_LOG);
    let config = RunConfig::builder(TestCase::ShotToSave)
        .timeout(Duration::from_secs(1))
        .build();

    let mut engine = LineEngine::open(log.path()).await.unwrap();
    let err = measure(&config, &mut engine).await.unwrap_err();

    assert!(matches!(err, LatencyError::EngineExhausted));
    assert_eq!(engine.pause_requests(), 1);
}

#[tokio::test]
async fn test_missing_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = LineEngine::open(dir.path().join("absent.log")).await;
    assert!(matches!(result, Err(LatencyError::Io(_))));
}
