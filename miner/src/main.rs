use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use miner::{run, Config};

#[derive(Parser)]
#[command(name = "miner")]
#[command(about = "Mine corpus keyword statistics and bibliographic metadata", long_about = None)]
struct Cli {
    /// Corpus root containing an articles/ directory; artifacts are
    /// written to tmp/ and meta/ beneath it
    #[arg(long)]
    root: PathBuf,
    /// Maximum number of documents per batch
    #[arg(long, default_value_t = 100)]
    cap: usize,
    /// Timeout per keyword extraction, in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let summary = run(Config {
        root: cli.root,
        cap: cli.cap,
        timeout: Duration::from_secs(cli.timeout_secs),
    })
    .await?;

    println!(
        "{} documents, {} words, {} metadata files written ({} skipped, {} failed)",
        summary.documents,
        summary.terms,
        summary.records_written,
        summary.records_skipped,
        summary.records_failed,
    );
    Ok(())
}
