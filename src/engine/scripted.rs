//! Scripted execution engine for testing
//!
//! [`ScriptedEngine`] replays a fixed list of notifications without a real
//! capture pipeline. It records the pause and stop requests it receives so
//! tests can assert on the driving loop's behaviour.
//!
//! # Features
//!
//! - **Configurable Delay:** sleep before each notification
//! - **Error Injection:** deliver a fatal error after N notifications
//! - **Hold Open:** keep waiting once the script is exhausted, to exercise
//!   timeouts
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use capture_latency::{
//!     engine::{ScriptedEngine, drive},
//!     ingest::Notification,
//!     model::TestCase,
//!     session::MeasurementSession,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut engine = ScriptedEngine::new(vec![
//!         Notification::timestamp("paused-to-playing transition", "2.0").unwrap(),
//!         Notification::timestamp("playing-to-paused transition", "2.4").unwrap(),
//!     ]);
//!     let mut session = MeasurementSession::new(TestCase::ShotToShot);
//!
//!     drive(&mut engine, &mut session, Duration::from_secs(1)).await.unwrap();
//!     let result = session.finish(None).unwrap();
//!     assert!((result.delta - 0.4).abs() < 1e-9);
//! }
//! ```

use std::{collections::VecDeque, time::Duration};

use async_trait::async_trait;
use tokio::time::sleep;

use super::ExecutionEngine;
use crate::{error::MeasureResult, ingest::Notification};

/// In-memory engine that replays a script of notifications
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    /// Notifications still to deliver
    script:          VecDeque<Notification>,
    /// Optional delay before each notification
    delay:           Option<Duration>,
    /// Fatal error to deliver after this many notifications
    error_injection: Option<(usize, String)>,
    /// Keep pending instead of reporting exhaustion
    hold_open:       bool,
    delivered:       usize,
    pause_requests:  usize,
    stop_requests:   usize,
}

impl ScriptedEngine {
    /// Creates an engine that delivers `script` in order
    pub fn new(script: impl IntoIterator<Item = Notification>) -> Self {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Sleeps for `delay` before delivering each notification
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replaces the rest of the script with a fatal error once `after`
    /// notifications have been delivered
    pub fn with_error(mut self, after: usize, description: impl Into<String>) -> Self {
        self.error_injection = Some((after, description.into()));
        self
    }

    /// Never reports exhaustion; waits forever once the script runs out
    pub fn hold_open(mut self) -> Self {
        self.hold_open = true;
        self
    }

    /// Number of notifications not yet delivered
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Number of notifications delivered so far
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Number of pause requests received
    pub fn pause_requests(&self) -> usize {
        self.pause_requests
    }

    /// Number of stop requests received
    pub fn stop_requests(&self) -> usize {
        self.stop_requests
    }

    /// Applies configured delay if set
    async fn apply_delay(&self) {
        if let Some(duration) = self.delay {
            sleep(duration).await;
        }
    }

    fn check_error_injection(&mut self) -> Option<Notification> {
        match self.error_injection {
            Some((after, _)) if self.delivered >= after => self
                .error_injection
                .take()
                .map(|(_, description)| {
                    self.script.clear();
                    Notification::FatalError(description)
                }),
            _ => None,
        }
    }
}

#[async_trait]
impl ExecutionEngine for ScriptedEngine {
    async fn next_notification(&mut self) -> MeasureResult<Option<Notification>> {
        self.apply_delay().await;

        let next = self
            .check_error_injection()
            .or_else(|| self.script.pop_front());

        match next {
            Some(notification) => {
                self.delivered += 1;
                Ok(Some(notification))
            }
            None if self.hold_open => std::future::pending().await,
            None => Ok(None),
        }
    }

    async fn request_pause(&mut self) -> MeasureResult<()> {
        self.pause_requests += 1;
        Ok(())
    }

    async fn request_stop(&mut self) -> MeasureResult<()> {
        self.stop_requests += 1;
        Ok(())
    }
}
