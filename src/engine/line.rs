//! Line-protocol engine adapter
//!
//! Reads engine notifications from a text log, one per line:
//!
//! ```text
//! # comment
//! timestamp null-to-ready transition 1.000
//! timestamp paused-to-playing transition 1.250
//! eos
//! error Internal data stream error
//! ```
//!
//! The event name of a `timestamp` line may contain spaces; the value is the
//! last whitespace-separated token. Blank lines and `#` comments are skipped,
//! anything else becomes [`Notification::Other`].

use std::path::Path;

use async_trait::async_trait;
use tokio::{
    fs::File,
    io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines},
};
use tracing::{debug, info};

use super::ExecutionEngine;
use crate::{error::MeasureResult, ingest::Notification};

/// Engine adapter that replays a line-oriented notification log
#[derive(Debug)]
pub struct LineEngine<R> {
    lines:          Lines<R>,
    line_number:    usize,
    pause_requests: usize,
    stopped:        bool,
}

impl<R> LineEngine<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    /// Creates an engine reading from `reader`
    pub fn new(reader: R) -> Self {
        Self {
            lines:          reader.lines(),
            line_number:    0,
            pause_requests: 0,
            stopped:        false,
        }
    }

    /// Number of pause requests received
    pub fn pause_requests(&self) -> usize {
        self.pause_requests
    }

    /// Whether a stop request was received
    pub fn stopped(&self) -> bool {
        self.stopped
    }
}

impl LineEngine<BufReader<File>> {
    /// Opens a notification log file
    pub async fn open(path: impl AsRef<Path>) -> MeasureResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).await?;
        info!(path = %path.display(), "replaying engine notifications");
        Ok(Self::new(BufReader::new(file)))
    }
}

/// Parses one protocol line
///
/// Returns `None` for blank lines and comments.
pub fn parse_line(line: &str) -> Option<Notification> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    let notification = match keyword {
        "eos" if rest.is_empty() => Notification::EndOfStream,
        "error" => {
            let description = if rest.is_empty() { "unknown error" } else { rest };
            Notification::FatalError(description.to_string())
        }
        "timestamp" => rest
            .rsplit_once(char::is_whitespace)
            .and_then(|(name, value)| Notification::timestamp(name.trim(), value))
            .unwrap_or_else(|| Notification::Other(line.to_string())),
        _ => Notification::Other(line.to_string()),
    };
    Some(notification)
}

#[async_trait]
impl<R> ExecutionEngine for LineEngine<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_notification(&mut self) -> MeasureResult<Option<Notification>> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_number += 1;
            if let Some(notification) = parse_line(&line) {
                debug!(line = self.line_number, ?notification, "read notification");
                return Ok(Some(notification));
            }
        }
        Ok(None)
    }

    async fn request_pause(&mut self) -> MeasureResult<()> {
        self.pause_requests += 1;
        info!(line = self.line_number, "engine pause requested");
        Ok(())
    }

    async fn request_stop(&mut self) -> MeasureResult<()> {
        self.stopped = true;
        info!(line = self.line_number, "engine stop requested");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TimestampEvent;

    #[test]
    fn test_parse_timestamp_with_spaces_in_name() {
        let notification = parse_line("timestamp paused-to-playing transition 1.250").unwrap();
        assert_eq!(
            notification,
            Notification::Timestamp(
                TimestampEvent::new("paused-to-playing transition", "1.250").unwrap()
            )
        );
    }

    #[test]
    fn test_parse_lifecycle_lines() {
        assert_eq!(parse_line("eos"), Some(Notification::EndOfStream));
        assert_eq!(
            parse_line("error  Internal data stream error "),
            Some(Notification::FatalError("Internal data stream error".into()))
        );
        assert_eq!(
            parse_line("error"),
            Some(Notification::FatalError("unknown error".into()))
        );
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("# header"), None);
    }

    #[test]
    fn test_parse_unrecognised_lines() {
        assert_eq!(parse_line("qos dropped=3"), Some(Notification::Other("qos dropped=3".into())));
        assert_eq!(parse_line("timestamp"), Some(Notification::Other("timestamp".into())));
        assert_eq!(
            parse_line("timestamp 1.0"),
            Some(Notification::Other("timestamp 1.0".into()))
        );
        assert_eq!(parse_line("eos now"), Some(Notification::Other("eos now".into())));
    }

    #[test]
    fn test_parse_keeps_malformed_value() {
        let notification = parse_line("timestamp save complete soon").unwrap();
        assert_eq!(
            notification,
            Notification::Timestamp(TimestampEvent::new("save complete", "soon").unwrap())
        );
    }

    #[tokio::test]
    async fn test_reads_notifications_from_reader() {
        let log = "# run 1\ntimestamp null-to-ready transition 1.0\n\neos\n";
        let mut engine = LineEngine::new(BufReader::new(log.as_bytes()));

        assert!(matches!(
            engine.next_notification().await.unwrap(),
            Some(Notification::Timestamp(_))
        ));
        assert_eq!(engine.next_notification().await.unwrap(), Some(Notification::EndOfStream));
        assert_eq!(engine.next_notification().await.unwrap(), None);

        engine.request_pause().await.unwrap();
        engine.request_stop().await.unwrap();
        assert_eq!(engine.pause_requests(), 1);
        assert!(engine.stopped());
    }
}
