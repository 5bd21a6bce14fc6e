// src/cli.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::{run_source_for_single, run_sources_for_comparison, RunSource};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub mode: Mode,

    /// Directory the PNG figures are written to
    #[arg(long, global = true, default_value = ".")]
    pub output_dir: PathBuf,

    /// Log per-file details
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Mode {
    /// Compare the ABA, Linear and None runs stored in one directory
    Compare {
        /// Directory holding error_history_{aba,lin,none}.txt and full_history_{aba,lin,none}.csv
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
    /// Render a single run
    Single {
        /// Error/target text log
        #[arg(value_name = "ERROR_LOG")]
        error_log: PathBuf,
        /// Headerless per-timestep CSV log
        #[arg(value_name = "TRIAL_LOG")]
        trial_log: PathBuf,
    },
}

impl Mode {
    pub fn run_sources(&self) -> Vec<RunSource> {
        match self {
            Mode::Compare { dir } => run_sources_for_comparison(dir),
            Mode::Single {
                error_log,
                trial_log,
            } => vec![run_source_for_single(error_log, trial_log)],
        }
    }
}
