//! Result records and their destinations
//!
//! One [`ResultRecord`] is produced per run and appended as a single line to
//! a caller-chosen file, in the caller's [`RecordFormat`].

use std::{path::Path, str::FromStr};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};
use tracing::info;

use crate::{
    error::{LatencyError, MeasureResult},
    model::{LatencyResult, Resolution},
};

/// Line format of appended result records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    /// `label,WIDTHxHEIGHT,delta`
    #[default]
    Csv,
    /// `label<TAB>WIDTHxHEIGHT<TAB>delta`
    Tsv,
    /// One JSON object per line
    Json,
}

impl RecordFormat {
    /// Returns the format as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordFormat::Csv => "csv",
            RecordFormat::Tsv => "tsv",
            RecordFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordFormat {
    type Err = LatencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(RecordFormat::Csv),
            "tsv" => Ok(RecordFormat::Tsv),
            "json" => Ok(RecordFormat::Json),
            other => Err(LatencyError::InvalidParameter {
                parameter: "format".to_string(),
                reason:    format!("'{other}' is not one of csv, tsv, json"),
            }),
        }
    }
}

/// One run's outbound record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Test case label
    pub label:       String,
    /// Latency in seconds
    pub delta:       f64,
    /// Capture resolution, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution:  Option<Resolution>,
    /// RFC 3339 time the record was produced
    pub recorded_at: String,
}

impl ResultRecord {
    /// Builds a record for `result`, stamped with the current time
    pub fn new(result: &LatencyResult, resolution: Option<Resolution>) -> Self {
        Self {
            label: result.label.clone(),
            delta: result.delta,
            resolution,
            recorded_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Renders the record as a single line, without the trailing newline
    pub fn render(&self, format: RecordFormat) -> MeasureResult<String> {
        let separator = match format {
            RecordFormat::Csv => ",",
            RecordFormat::Tsv => "\t",
            RecordFormat::Json => return Ok(serde_json::to_string(self)?),
        };

        let mut columns = vec![self.label.clone()];
        if let Some(resolution) = self.resolution {
            columns.push(resolution.to_string());
        }
        columns.push(format!("{:.6}", self.delta));
        Ok(columns.join(separator))
    }
}

/// Appends `record` as one line to the file at `path`, creating it if needed
pub async fn append(
    path: impl AsRef<Path>,
    record: &ResultRecord,
    format: RecordFormat,
) -> MeasureResult<()> {
    let path = path.as_ref();
    let mut line = record.render(format)?;
    line.push('\n');

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await?;

    info!(path = %path.display(), %format, "result appended");
    Ok(())
}

/// Prints a result to stdout
///
/// Output format: `<label>[,<WIDTHxHEIGHT>],<delta_s>`
pub fn print_result(record: &ResultRecord) -> MeasureResult<()> {
    println!("{}", record.render(RecordFormat::Csv)?);
    Ok(())
}
