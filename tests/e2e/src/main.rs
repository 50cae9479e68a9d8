//! End-to-End pipeline runner
//!
//! Reads one payload per stdin line, pushes each through the pipeline and
//! prints every reassembled group as a JSON line.

use anyhow::Result;
use clap::Parser;
use header_mapping::WireMessage;
use integration_config::{init_tracing, IntegrationConfig};
use integration_e2e_tests::Pipeline;
use std::io::BufRead;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Environment overlay to apply (environments/<name>.toml)
    #[arg(short, long)]
    environment: Option<String>,

    /// Delimiter used when a message carries none
    #[arg(short, long, default_value = ".")]
    delimiter: String,

    /// Output queue capacity; a line splitting into more parts is skipped
    #[arg(long, default_value_t = 1024)]
    queue_capacity: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => IntegrationConfig::load(Some(path), args.environment.as_deref())?,
        None => IntegrationConfig::default(),
    };
    init_tracing(&config.logging)?;

    info!("Starting pipeline runner");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut pipeline = Pipeline::from_config(&config, &args.delimiter, args.queue_capacity)?;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if let Err(e) = pipeline.ingest(&WireMessage::new(line.as_str())).await {
            warn!("Skipping line: {:#}", e);
            continue;
        }
        for group in pipeline.collect_groups()? {
            let correlation_id = group
                .first()
                .and_then(|m| m.headers().correlation_id())
                .map(|id| id.to_string());
            let parts: Vec<&String> = group.iter().map(|m| m.payload()).collect();
            println!(
                "{}",
                serde_json::json!({ "correlation_id": correlation_id, "parts": parts })
            );
        }
    }

    let stats = pipeline.reassembler().stats();
    info!(
        "Done: {} parts stored, {} evicted, {} still pending",
        stats.puts,
        stats.evictions,
        pipeline.reassembler().pending()
    );
    Ok(())
}
