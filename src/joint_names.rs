// src/joint_names.rs

//! Centralized joint naming and coloring
//!
//! Every per-joint curve across the torque, acceleration and jerk panels uses
//! the same label and color for a given joint index.

use plotters::style::RGBColor;

/// Get the display label for a given joint index
///
/// # Arguments
/// * `index` - Joint index (0-based, column order of the trial log)
///
/// # Returns
/// Label such as "Joint 0"
pub fn joint_name(index: usize) -> String {
    format!("Joint {index}")
}

/// Color for a joint curve, taken from the category-10 palette so that joint
/// `i` keeps the same color in every panel.
pub fn joint_color(index: usize) -> RGBColor {
    let palette = &colorous::CATEGORY10;
    let c = palette[index % palette.len()];
    RGBColor(c.r, c.g, c.b)
}
