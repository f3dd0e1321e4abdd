//! capture-latency: measure one capture pipeline phase from engine events
//!
//! Reads the execution engine's notification log (file or stdin), waits for
//! the selected test case to complete, prints the latency and appends it to
//! the results file.

use std::{path::PathBuf, time::Duration};

use anyhow::{Result, bail};
use capture_latency::{
    config::RunConfig,
    engine::{ExecutionEngine, LineEngine},
    model::TestCase,
    run::measure,
    sink::{RecordFormat, print_result},
};
use clap::Parser;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "capture-latency")]
#[command(about = "Measure camera capture pipeline latency from correlated engine events")]
struct Cli {
    /// Test case: standby-to-first-shot, shot-to-shot, shot-to-save,
    /// shot-to-snapshot (or the legacy aliases shot / save)
    #[arg(short = 'o', long)]
    test_case: TestCase,

    /// Engine notification log; reads stdin when omitted or "-"
    #[arg(short, long)]
    events: Option<PathBuf>,

    /// Capture width in pixels
    #[arg(short = 'w', long)]
    width: Option<u32>,

    /// Capture height in pixels (-H, since -h is help)
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Number of buffers the pipeline captures
    #[arg(short = 'b', long, default_value_t = 1)]
    num_buffers: u32,

    /// Image output path used by the pipeline
    #[arg(short = 'i', long)]
    output_image: Option<PathBuf>,

    /// File the result record is appended to
    #[arg(short = 'r', long)]
    results_file: Option<PathBuf>,

    /// Result record format (csv, tsv, json)
    #[arg(long, default_value = "csv")]
    format: RecordFormat,

    /// Side-channel file with the snapshot timestamp (shot-to-snapshot only)
    #[arg(long)]
    side_channel: Option<PathBuf>,

    /// Give up if the run has not completed after this many seconds
    #[arg(long, default_value_t = 30.0)]
    timeout_secs: f64,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn run_config(&self) -> Result<RunConfig> {
        let timeout = match Duration::try_from_secs_f64(self.timeout_secs) {
            Ok(timeout) if !timeout.is_zero() => timeout,
            Ok(_) => bail!("--timeout-secs must be a positive number of seconds"),
            Err(err) => bail!("--timeout-secs {} is out of range: {err}", self.timeout_secs),
        };

        let mut builder = RunConfig::builder(self.test_case)
            .num_buffers(self.num_buffers)
            .format(self.format)
            .timeout(timeout);

        builder = match (self.width, self.height) {
            (Some(width), Some(height)) => builder.resolution(width, height),
            (None, None) => builder,
            _ => bail!("--width and --height must be given together"),
        };
        if let Some(path) = &self.output_image {
            builder = builder.output_image(path);
        }
        if let Some(path) = &self.results_file {
            builder = builder.results_file(path);
        }
        if let Some(path) = &self.side_channel {
            builder = builder.side_channel(path);
        }

        let config = builder.build();
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(json: bool) {
    // Respects RUST_LOG, default level: info. Logs go to stderr so stdout
    // only carries the result line.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("capture_latency=info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    let config = cli.run_config()?;
    info!(config = %serde_json::to_string(&config)?, "capture-latency starting");

    let mut engine: Box<dyn ExecutionEngine> = match &cli.events {
        Some(path) if path.as_os_str() != "-" => Box::new(LineEngine::open(path).await?),
        _ => {
            info!("reading engine notifications from stdin");
            Box::new(LineEngine::new(BufReader::new(tokio::io::stdin())))
        }
    };

    let record = match measure(&config, engine.as_mut()).await {
        Ok(record) => record,
        Err(err) => {
            error!(error = %err, "measurement failed");
            eprintln!("hint: {}", err.remediation_hint());
            return Err(err.into());
        }
    };

    print_result(&record)?;
    info!("capture-latency done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["capture-latency"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_run_config_rejects_overflowing_timeout() {
        let cli = parse(&["-o", "shot", "--timeout-secs", "1e300"]);
        let err = cli.run_config().unwrap_err();
        assert!(err.to_string().contains("--timeout-secs"));
    }

    #[test]
    fn test_run_config_rejects_non_positive_timeout() {
        for value in ["0", "-1", "NaN", "inf"] {
            let arg = format!("--timeout-secs={value}");
            let cli = parse(&["-o", "shot", &arg]);
            assert!(cli.run_config().is_err(), "accepted timeout {value}");
        }
    }

    #[test]
    fn test_run_config_accepts_fractional_timeout() {
        let cli = parse(&["-o", "shot", "--timeout-secs", "2.5"]);
        let config = cli.run_config().unwrap();
        assert_eq!(config.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_short_resolution_flags() {
        let cli = parse(&["-o", "shot", "-w", "640", "-H", "480"]);
        assert_eq!(cli.width, Some(640));
        assert_eq!(cli.height, Some(480));
        let config = cli.run_config().unwrap();
        assert_eq!(config.resolution.map(|r| (r.width, r.height)), Some((640, 480)));
    }

    #[test]
    fn test_short_h_still_prints_help() {
        let err = Cli::try_parse_from(["capture-latency", "-h"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
