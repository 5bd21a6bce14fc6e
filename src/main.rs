// src/main.rs

use clap::Parser;
use std::error::Error;

use tracking_perf_render::cli::Args;
use tracking_perf_render::crate_version;
use tracking_perf_render::pipeline::{run_analysis, OutputOptions};

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    tracing::info!("tracking-perf-render {}", crate_version());

    let sources = args.mode.run_sources();
    let options = OutputOptions {
        output_dir: args.output_dir.clone(),
    };

    let report = run_analysis(&sources, &options).map_err(|e| {
        tracing::error!("Analysis aborted: {e}");
        e
    })?;

    println!("\nFigures written:");
    println!("  {}", report.error_history_plot.display());
    for path in &report.trial_plots {
        println!("  {}", path.display());
    }
    Ok(())
}
