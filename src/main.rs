mod control;
mod crawl;
mod extract;
mod fetch;
mod report;
mod store;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{ensure, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::control::Pacing;
use crate::crawl::{SweepConfig, SweepStats};
use crate::fetch::HttpTransport;
use crate::store::Ledger;

/// Window of catalog ids the retailer assigned to current-generation cards.
const DEFAULT_START_ID: u64 = 654055;
const DEFAULT_END_ID: u64 = 672120;
const DEFAULT_URL_TEMPLATE: &str = "https://www.microcenter.com/product/{}/gpu";

#[derive(Parser)]
#[command(name = "gpu_scraper", about = "Micro Center GPU catalog sweeper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe an id range and record every product page found
    Sweep {
        #[command(flatten)]
        opts: SweepOpts,
    },
    /// Sweep, then rewrite the GPU set sorted by vendor, model and price
    Run {
        #[command(flatten)]
        opts: SweepOpts,
    },
    /// Rewrite the GPU set sorted by vendor, model and price
    Sort {
        /// Directory holding the record files
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Show record set counts
    Stats {
        /// Directory holding the record files
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
}

#[derive(Args)]
struct SweepOpts {
    /// First catalog id to probe (inclusive)
    #[arg(long, default_value_t = DEFAULT_START_ID)]
    start: u64,

    /// Last catalog id to probe (exclusive)
    #[arg(long, default_value_t = DEFAULT_END_ID)]
    end: u64,

    /// Product page URL template with one {} placeholder
    #[arg(long, default_value = DEFAULT_URL_TEMPLATE)]
    base_url: String,

    /// Directory holding the record files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Pause between requests, in milliseconds
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// Pause after a 403 before moving on, in seconds
    #[arg(long, default_value_t = 600)]
    cooldown_secs: u64,

    /// Max ids to actually fetch this run (default: the whole range)
    #[arg(short = 'n', long)]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sweep { opts } => {
            run_sweep(&opts).await?;
            Ok(())
        }
        Commands::Run { opts } => {
            run_sweep(&opts).await?;
            let sorted = report::sort_gpu_set(&opts.data_dir)?;
            println!("Sorted {} GPU records.", sorted);
            Ok(())
        }
        Commands::Sort { data_dir } => {
            let sorted = report::sort_gpu_set(&data_dir)?;
            println!("Sorted {} GPU records.", sorted);
            Ok(())
        }
        Commands::Stats { data_dir } => {
            let ledger = Ledger::open(&data_dir)?;
            println!("GPUs:      {}", ledger.gpus.len());
            println!("Non-GPU:   {}", ledger.non_gpus.len());
            println!("Not found: {}", ledger.not_found.len());
            println!("Processed: {}", ledger.known_total());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn run_sweep(opts: &SweepOpts) -> Result<SweepStats> {
    ensure!(opts.start < opts.end, "start id must be below end id");
    ensure!(
        opts.base_url.contains("{}"),
        "base url needs a {{}} placeholder for the id"
    );

    let mut ledger = Ledger::open(&opts.data_dir)?;
    info!(
        "Resuming with {} known ids ({} GPUs, {} non-GPU, {} not found)",
        ledger.known_total(),
        ledger.gpus.len(),
        ledger.non_gpus.len(),
        ledger.not_found.len()
    );

    let transport = HttpTransport::new()?;
    let cfg = SweepConfig {
        start: opts.start,
        end: opts.end,
        url_template: opts.base_url.clone(),
        pacing: Pacing {
            request_delay: Duration::from_millis(opts.delay_ms),
            cooldown: Duration::from_secs(opts.cooldown_secs),
        },
        limit: opts.limit,
    };

    let stats = crawl::sweep(&transport, &mut ledger, &cfg).await?;
    println!(
        "Swept {} ids: {} GPUs, {} non-GPU, {} not found, {} deferred, {} already known.",
        stats.attempted, stats.gpus, stats.non_gpus, stats.not_found, stats.deferred, stats.skipped
    );
    Ok(stats)
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
