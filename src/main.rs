//! Voltage log analyzer - Main Entry Point
//!
//! Parses every log path given on the command line and prints its events,
//! energy usage and detected period.

use anyhow::Context;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use voltlog_rs::{config::CONFIG_FILE, AnalysisConfig, LogParser, OutputFormat, Report};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,voltlog_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        anyhow::bail!("usage: voltlog-rs <LOG>...");
    }

    let config = AnalysisConfig::load_or_default(CONFIG_FILE);
    tracing::debug!("Using {} output, {:?}", config.output, config.peaks);

    for path in &paths {
        let recording = LogParser::parse(path)?;
        let report = Report::build(path.display().to_string(), &recording, &config)
            .with_context(|| format!("Failed to analyze {}", path.display()))?;

        match config.output {
            OutputFormat::Text => print!("{}", report),
            OutputFormat::Json => println!("{}", report.to_json()?),
        }
    }

    Ok(())
}
