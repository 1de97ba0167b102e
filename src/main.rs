use anyhow::Context;
use clap::Parser;
use hidromet::BasinProcessor;
use hidromet::cli::{Args, setup_logging};
use std::process;

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = run(args) => result,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(anyhow::anyhow!("Processing interrupted by user"))
            }
        }
    });

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = args.to_config().context("Invalid arguments")?;

    let mut processor = BasinProcessor::new(args.input_dir.clone(), args.output_dir.clone())
        .context("Failed to open input directory")?
        .with_config(config)
        .with_progress(!args.quiet);
    if let Some(stations) = &args.stations {
        processor = processor.with_station_list(stations.clone());
    }

    let stats = processor
        .process()
        .await
        .with_context(|| format!("Failed to process basin at {}", args.input_dir.display()))?;

    if stats.stations_processed == 0 && stats.stations_found > 0 {
        anyhow::bail!("All {} stations failed to process", stats.stations_found);
    }

    Ok(())
}
