// src/lib.rs - Library interface for internal module access

pub mod cli;
pub mod constants;
pub mod data_analysis;
pub mod data_input;
pub mod error;
pub mod font_config;
pub mod joint_names;
pub mod pipeline;
pub mod plot_framework;
pub mod plot_functions;

pub use error::{AnalysisError, Result};

pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
