// src/constants.rs

use plotters::style::colors::{BLUE, GREEN, RED};
use plotters::style::RGBColor;

// Plot dimensions.
pub const PLOT_WIDTH: u32 = 1920;
pub const PLOT_HEIGHT: u32 = 1080;

// Font sizes.
pub const FONT_SIZE_MAIN_TITLE: i32 = 24;
pub const FONT_SIZE_CHART_TITLE: i32 = 20;
pub const FONT_SIZE_AXIS_LABEL: i32 = 12;
pub const FONT_SIZE_LEGEND: i32 = 14;
pub const FONT_SIZE_MESSAGE: i32 = 18;
pub const FONT_SIZE_ANNOTATION: i32 = 12;

// Stroke widths for lines
pub const LINE_WIDTH_PLOT: u32 = 1;
pub const LINE_WIDTH_LEGEND: u32 = 2;

// Scatter marker radius in pixels.
pub const MARKER_SIZE: i32 = 5;

// --- Robot layout ---
pub const JOINT_COUNT: usize = 5;
pub const CARTESIAN_DIMS: usize = 3;

// --- Trial CSV column layout (headerless, positional) ---
pub const COL_TIME: usize = 0;
pub const COL_TARGET: usize = 1;
pub const COL_ERROR: usize = COL_TARGET + CARTESIAN_DIMS; // 4
pub const COL_TORQUE_CROCODDYL: usize = COL_ERROR + CARTESIAN_DIMS; // 7
pub const COL_TORQUE_RICCATI: usize = COL_TORQUE_CROCODDYL + JOINT_COUNT; // 12
pub const COL_TORQUE_MEASURED: usize = COL_TORQUE_RICCATI + JOINT_COUNT; // 17
pub const COL_DDQ: usize = COL_TORQUE_MEASURED + JOINT_COUNT; // 22
pub const TRIAL_ROW_WIDTH: usize = COL_DDQ + JOINT_COUNT; // 27

// Tracking error is logged in meters and charted in millimeters.
pub const ERROR_SCALE_TO_MM: f64 = 1000.0;

// --- Fixed file names of a three-strategy comparison directory ---
// (strategy name, error history file, full history file)
pub const COMPARISON_RUNS: [(&str, &str, &str); 3] = [
    ("ABA", "error_history_aba.txt", "full_history_aba.csv"),
    ("Linear", "error_history_lin.txt", "full_history_lin.csv"),
    ("None", "error_history_none.txt", "full_history_none.csv"),
];

// --- Output file names ---
pub const ERROR_HISTORY_FILE_NAME: &str = "ErrorHistory.png";
pub const TRIAL_HISTORY_FILE_SUFFIX: &str = "_TrialHistory.png";

// --- Plot Color Assignments ---
// Strategy colors follow the run order (ABA, Linear, None) and cycle past three.
pub const STRATEGY_COLORS: [&RGBColor; 3] = [&RED, &GREEN, &BLUE];
