// src/data_analysis/mod.rs

pub mod derivative;

// src/data_analysis/mod.rs
