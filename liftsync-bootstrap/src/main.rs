use anyhow::Result;
use clap::Parser;

use liftsync_bootstrap::{run_once, RunOptions};

#[derive(Parser, Debug)]
#[command(name = "liftsync")]
#[command(about = "Sync new Sport80 meet results into Supabase", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    /// Only consider the N most recent events
    #[arg(long)]
    max_candidates: Option<usize>,

    /// Event index year to fetch; repeat for several years
    #[arg(long = "year")]
    years: Vec<i32>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let options = RunOptions {
        config_path: args.config,
        max_candidates: args.max_candidates,
        years: args.years,
        log_json: args.log_json,
    };

    let summary = run_once(options).await?;
    println!(
        "sync {} finished: added {} new meets ({} rows), skipped {}",
        summary.run_id,
        summary.count_added,
        summary.rows_inserted,
        summary.skipped.len()
    );
    Ok(())
}
