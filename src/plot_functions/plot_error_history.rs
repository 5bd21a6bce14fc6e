// src/plot_functions/plot_error_history.rs

use std::collections::HashMap;
use std::path::Path;

use crate::constants::STRATEGY_COLORS;
use crate::data_input::error_history::ErrorHistory;
use crate::error::{AnalysisError, Result};
use crate::plot_framework::{
    calculate_range, draw_category_scatter_plot, finite_bounds, MarkerShape, ScatterConfig,
    ScatterPoint, ScatterSeries,
};

const MARKERS: [MarkerShape; 3] = [MarkerShape::Circle, MarkerShape::Triangle, MarkerShape::Cross];

/// Text shown next to each trial's point.
pub fn trial_annotation(index: usize, elapsed_time: f64) -> String {
    format!("  n°{index}, {elapsed_time:.2} s")
}

/// Builds the error-vs-target scatter for one or more named runs.
///
/// Each distinct target label becomes one x category, in order of first
/// appearance across all runs. Errors are charted in millimeters.
pub fn prepare_error_scatter(runs: &[(&str, &ErrorHistory)]) -> ScatterConfig {
    let mut categories: Vec<String> = Vec::new();
    let mut category_index: HashMap<String, usize> = HashMap::new();
    let mut series = Vec::with_capacity(runs.len());

    for (run_index, (name, history)) in runs.iter().enumerate() {
        let points = history
            .records
            .iter()
            .enumerate()
            .map(|(trial_index, record)| {
                let label = record.target_label();
                let category = *category_index.entry(label.clone()).or_insert_with(|| {
                    categories.push(label);
                    categories.len() - 1
                });
                ScatterPoint {
                    category,
                    value: record.error_mm(),
                    annotation: trial_annotation(trial_index, record.elapsed_time),
                }
            })
            .collect();

        series.push(ScatterSeries {
            label: (*name).to_string(),
            color: *STRATEGY_COLORS[run_index % STRATEGY_COLORS.len()],
            marker: MARKERS[run_index % MARKERS.len()],
            points,
        });
    }

    let y_range = match finite_bounds(series.iter().flat_map(|s| s.points.iter().map(|p| p.value))) {
        Some((lo, hi)) => {
            let (lo, hi) = calculate_range(lo, hi);
            lo..hi
        }
        None => 0.0..1.0,
    };

    ScatterConfig {
        title: "Error history to target, and elapsed time".to_string(),
        categories,
        y_range,
        series,
        x_label: "Target".to_string(),
        y_label: "Euclidean distance (mm)".to_string(),
        show_legend: runs.len() > 1,
    }
}

/// Renders the error-vs-target scatter to `output_path`.
pub fn plot_error_history(runs: &[(&str, &ErrorHistory)], output_path: &Path) -> Result<()> {
    let config = prepare_error_scatter(runs);
    let main_title = runs
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(" vs ");
    draw_category_scatter_plot(output_path, &main_title, &config)
        .map_err(|e| AnalysisError::render(output_path, e))?;
    Ok(())
}
