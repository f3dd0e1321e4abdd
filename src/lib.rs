//! capture-latency: camera capture pipeline latency measurement
//!
//! This library correlates named timestamp events emitted by a capture
//! pipeline's execution engine and computes the latency of one capture phase
//! per run (standby to first shot, shot to shot, shot to save, shot to
//! snapshot).
//!
//! The core is engine-agnostic: [`ingest::EventIngestor`] consumes
//! notifications, [`completion::is_complete`] decides when a run is over and
//! [`calculator::compute`] turns the recorded timestamps into a validated
//! delta. [`engine`] holds the boundary to the engine and the driving loop.

pub mod calculator;
pub mod completion;
pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod model;
pub mod run;
pub mod session;
pub mod side_channel;
pub mod sink;
pub mod store;
