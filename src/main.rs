mod engine;
mod formats;
mod models;

use std::io::{BufWriter, Write, stderr, stdout};
use std::path::Path;
use std::process::exit;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

use crate::engine::FraudPipeline;
use crate::models::Finding;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: transaction-fraud-engine [input-path] [log_level:optional] > [findings].json");
        eprintln!("The input path is a csv/json/xml file or a directory scanned recursively.");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: error)");
        exit(1);
    }

    let path = Path::new(&args[1]);
    let log_level = args
        .get(2)
        .map(|level| parse_log_level(level))
        .unwrap_or(LevelFilter::ERROR);

    setup_logging(log_level);

    let pipeline = FraudPipeline::new();

    let timer = Instant::now();
    let findings = pipeline.run(path).await?;
    let duration = timer.elapsed();

    info!("Evaluated batch in: {duration:?}");

    write_findings_to_stdout(&findings)?;

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    // Findings go to stdout, so all logging is routed to stderr.
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry().with(terminal_log).init();
}

fn write_findings_to_stdout(findings: &[Finding]) -> Result<()> {
    let mut output = BufWriter::new(stdout().lock());

    serde_json::to_writer_pretty(&mut output, findings)?;
    writeln!(output)?;
    output.flush()?;

    Ok(())
}
