// src/plot_functions/mod.rs

pub mod plot_error_history;
pub mod plot_trial_history;

// src/plot_functions/mod.rs
