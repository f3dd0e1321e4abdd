//! Data models and type definitions for capture-latency
//!
//! This module defines the core types used throughout the crate:
//! - Test case selection and its static key table
//! - Timestamp events delivered by the execution engine
//! - The latency result handed to the result sink

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LatencyError;

/// Event name emitted when the pipeline goes from NULL to READY
pub const NULL_TO_READY: &str = "null-to-ready transition";

/// Event name emitted when the pipeline goes from PAUSED to PLAYING
pub const PAUSED_TO_PLAYING: &str = "paused-to-playing transition";

/// Event name emitted when the pipeline goes from PLAYING to PAUSED
pub const PLAYING_TO_PAUSED: &str = "playing-to-paused transition";

/// Marker event emitted by the downstream stage once the file is written
pub const SAVE_COMPLETE: &str = "save complete";

/// Where the end instant of a measured interval comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndSource {
    /// End instant is a timestamp event with this name
    Event(&'static str),
    /// End instant is read once from a side channel outside the event stream
    SideChannel,
}

/// Static definition of one test case
///
/// Every key the correlation logic looks up comes from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestCaseDefinition {
    /// Human-readable label, also used in result records
    pub label:          &'static str,
    /// Event name marking the start of the interval
    pub start_key:      &'static str,
    /// Source of the end instant
    pub end_source:     EndSource,
    /// Event name whose arrival means enough data has been gathered
    pub completion_key: &'static str,
}

/// Latency test case selected once at process start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestCase {
    /// Time from standby (READY) to the first image
    StandbyToFirstShot,
    /// Time from one shot to the next
    ShotToShot,
    /// Time from shot to the saved file
    ShotToSave,
    /// Time from shot to the snapshot reported on the side channel
    ShotToSnapshot,
}

const STANDBY_TO_FIRST_SHOT: TestCaseDefinition = TestCaseDefinition {
    label:          "StandbyToFirstShot",
    start_key:      NULL_TO_READY,
    end_source:     EndSource::Event(PAUSED_TO_PLAYING),
    completion_key: PAUSED_TO_PLAYING,
};

const SHOT_TO_SHOT: TestCaseDefinition = TestCaseDefinition {
    label:          "ShotToShot",
    start_key:      PAUSED_TO_PLAYING,
    end_source:     EndSource::Event(PLAYING_TO_PAUSED),
    completion_key: PLAYING_TO_PAUSED,
};

const SHOT_TO_SAVE: TestCaseDefinition = TestCaseDefinition {
    label:          "ShotToSave",
    start_key:      PAUSED_TO_PLAYING,
    end_source:     EndSource::Event(SAVE_COMPLETE),
    completion_key: SAVE_COMPLETE,
};

// The snapshot is taken by the time the pipeline pauses; its instant is
// reported out of band.
const SHOT_TO_SNAPSHOT: TestCaseDefinition = TestCaseDefinition {
    label:          "ShotToSnapshot",
    start_key:      PAUSED_TO_PLAYING,
    end_source:     EndSource::SideChannel,
    completion_key: PLAYING_TO_PAUSED,
};

impl TestCase {
    /// All supported test cases
    pub const ALL: [TestCase; 4] = [
        TestCase::StandbyToFirstShot,
        TestCase::ShotToShot,
        TestCase::ShotToSave,
        TestCase::ShotToSnapshot,
    ];

    /// Returns the static key table entry for this test case
    pub fn definition(&self) -> &'static TestCaseDefinition {
        match self {
            TestCase::StandbyToFirstShot => &STANDBY_TO_FIRST_SHOT,
            TestCase::ShotToShot => &SHOT_TO_SHOT,
            TestCase::ShotToSave => &SHOT_TO_SAVE,
            TestCase::ShotToSnapshot => &SHOT_TO_SNAPSHOT,
        }
    }

    /// Returns the human-readable label
    pub fn label(&self) -> &'static str {
        self.definition().label
    }

    /// Returns the event name marking interval start
    pub fn start_key(&self) -> &'static str {
        self.definition().start_key
    }

    /// Returns where the end instant comes from
    pub fn end_source(&self) -> EndSource {
        self.definition().end_source
    }

    /// Returns the event name that signals completion
    pub fn completion_key(&self) -> &'static str {
        self.definition().completion_key
    }

    /// Whether the end instant is read from the side channel
    pub fn uses_side_channel(&self) -> bool {
        matches!(self.end_source(), EndSource::SideChannel)
    }

    /// Returns the kebab-case short name accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            TestCase::StandbyToFirstShot => "standby-to-first-shot",
            TestCase::ShotToShot => "shot-to-shot",
            TestCase::ShotToSave => "shot-to-save",
            TestCase::ShotToSnapshot => "shot-to-snapshot",
        }
    }
}

impl std::fmt::Display for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for TestCase {
    type Err = LatencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        // Legacy short options of the measurement tool
        match name {
            "shot" => return Ok(TestCase::ShotToShot),
            "save" => return Ok(TestCase::ShotToSave),
            _ => {}
        }

        TestCase::ALL
            .into_iter()
            .find(|case| case.label() == name || case.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| LatencyError::UnknownTestCase {
                name: name.to_string(),
            })
    }
}

/// A named timestamp emitted by the execution engine
///
/// The value is kept in its string encoding; it is parsed on lookup so a
/// malformed encoding behaves like a missing timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampEvent {
    /// Event name, never empty
    pub name:  String,
    /// Timestamp in seconds, string encoded
    pub value: String,
}

impl TimestampEvent {
    /// Creates a new timestamp event
    ///
    /// Returns `None` when the name is empty or only whitespace.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return None;
        }
        Some(Self {
            name,
            value: value.into(),
        })
    }
}

/// Parses a string-encoded timestamp in seconds
///
/// Returns `None` for anything that is not a finite real number.
pub fn parse_seconds(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Capture resolution reported alongside a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Frame width in pixels
    pub width:  u32,
    /// Frame height in pixels
    pub height: u32,
}

impl Resolution {
    /// Creates a new resolution
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Computed latency for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyResult {
    /// Label of the measured test case
    pub label: String,
    /// End minus start, in seconds, always positive
    pub delta: f64,
}

impl LatencyResult {
    /// Returns the delta in milliseconds
    pub fn delta_ms(&self) -> f64 {
        self.delta * 1000.0
    }
}
