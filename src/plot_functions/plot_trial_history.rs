// src/plot_functions/plot_trial_history.rs

use ndarray::{s, ArrayView1, ArrayView2};
use std::path::Path;

use crate::constants::LINE_WIDTH_PLOT;
use crate::data_input::trial_data::TrialLog;
use crate::error::{AnalysisError, Result};
use crate::joint_names::{joint_color, joint_name};
use crate::plot_framework::{
    calculate_range, draw_panel_grid, finite_bounds, time_axis_range, Panel, PlotConfig,
    PlotSeries,
};

/// Rows x columns of the trial figure.
pub const TRIAL_GRID: (usize, usize) = (2, 3);

const TIME_LABEL: &str = "Time (s)";
const TORQUE_LABEL: &str = "Torque (Nm)";
const ACCELERATION_LABEL: &str = "Acceleration (rad/s²)";
const JERK_LABEL: &str = "Jerk (rad/s³)";

/// Builds one panel with a curve per joint column of `table` against `times`.
///
/// Non-finite samples are left out of the curves and of the axis ranges.
/// Returns the panel and how many samples were left out.
pub fn joint_panel(
    title: String,
    y_label: &str,
    times: ArrayView1<f64>,
    table: ArrayView2<f64>,
) -> (PlotConfig, usize) {
    let mut dropped = 0;
    let series: Vec<PlotSeries> = table
        .columns()
        .into_iter()
        .enumerate()
        .map(|(joint, column)| {
            let data: Vec<(f64, f64)> = times
                .iter()
                .zip(column.iter())
                .filter_map(|(&t, &v)| {
                    if t.is_finite() && v.is_finite() {
                        Some((t, v))
                    } else {
                        dropped += 1;
                        None
                    }
                })
                .collect();
            PlotSeries {
                data,
                label: joint_name(joint),
                color: joint_color(joint),
                stroke_width: LINE_WIDTH_PLOT,
            }
        })
        .collect();

    let x_bounds = finite_bounds(series.iter().flat_map(|s| s.data.iter().map(|p| p.0)));
    let y_bounds = finite_bounds(series.iter().flat_map(|s| s.data.iter().map(|p| p.1)));
    let (x_range, y_range) = match (x_bounds, y_bounds) {
        (Some((t_min, t_max)), Some((v_min, v_max))) => {
            let (y_lo, y_hi) = calculate_range(v_min, v_max);
            (time_axis_range(t_min, t_max), y_lo..y_hi)
        }
        _ => (0.0..0.0, 0.0..0.0),
    };

    (
        PlotConfig {
            title,
            x_range,
            y_range,
            series,
            x_label: TIME_LABEL.to_string(),
            y_label: y_label.to_string(),
        },
        dropped,
    )
}

/// The six cells of a trial figure, row by row:
/// Crocoddyl torque, Riccati torque, measured torque /
/// acceleration, (blank), jerk.
///
/// `jerk` has one row fewer than `log`; it is drawn against all but the last
/// timestamp.
pub fn prepare_trial_panels(run_name: &str, log: &TrialLog, jerk: ArrayView2<f64>) -> Vec<Panel> {
    let times = log.times.view();
    let jerk_times = times.slice(s![..jerk.nrows()]);

    let (crocoddyl, _) = joint_panel(
        format!("Crocoddyl torque history {run_name}"),
        TORQUE_LABEL,
        times,
        log.torque_crocoddyl.view(),
    );
    let (riccati, _) = joint_panel(
        format!("Riccati torque history {run_name}"),
        TORQUE_LABEL,
        times,
        log.torque_riccati.view(),
    );
    let (measured, _) = joint_panel(
        format!("Real torque history {run_name}"),
        TORQUE_LABEL,
        times,
        log.torque_measured.view(),
    );
    let (acceleration, _) = joint_panel(
        format!("Acceleration history {run_name}"),
        ACCELERATION_LABEL,
        times,
        log.ddq.view(),
    );
    let (jerk_panel, dropped) = joint_panel(
        format!("Jerk history {run_name}"),
        JERK_LABEL,
        jerk_times,
        jerk,
    );
    if dropped > 0 {
        tracing::warn!(
            "{run_name}: {dropped} non-finite jerk samples (repeated or decreasing timestamps) left out of the chart"
        );
    }

    vec![
        Panel::Chart(crocoddyl),
        Panel::Chart(riccati),
        Panel::Chart(measured),
        Panel::Chart(acceleration),
        Panel::Spacer,
        Panel::Chart(jerk_panel),
    ]
}

/// Renders the torque/acceleration/jerk figure of one run to `output_path`.
pub fn plot_trial_history(
    run_name: &str,
    log: &TrialLog,
    jerk: ArrayView2<f64>,
    output_path: &Path,
) -> Result<()> {
    let panels = prepare_trial_panels(run_name, log, jerk);
    draw_panel_grid(output_path, run_name, TRIAL_GRID, &panels)
        .map_err(|e| AnalysisError::render(output_path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_analysis::derivative::calculate_jerk;
    use crate::data_input::trial_data::TimestepSample;
    use crate::constants::{JOINT_COUNT, TRIAL_ROW_WIDTH};

    fn sample_log(times: &[f64]) -> TrialLog {
        let mut log = TrialLog::with_rows(times.len());
        for (i, &t) in times.iter().enumerate() {
            let mut values: Vec<f64> = (0..TRIAL_ROW_WIDTH).map(|c| (c + i) as f64).collect();
            values[0] = t;
            log.set_row(i, &TimestepSample::from_values(&values).unwrap());
        }
        log
    }

    fn chart(panel: &Panel) -> &PlotConfig {
        match panel {
            Panel::Chart(config) => config,
            Panel::Spacer => panic!("expected a chart panel"),
        }
    }

    #[test]
    fn test_layout_has_spacer_in_bottom_middle() {
        let log = sample_log(&[0.0, 0.1, 0.2]);
        let jerk = calculate_jerk(log.ddq.view(), log.times.view()).unwrap();
        let panels = prepare_trial_panels("ABA", &log, jerk.view());
        assert_eq!(panels.len(), TRIAL_GRID.0 * TRIAL_GRID.1);
        assert!(matches!(panels[4], Panel::Spacer));
        assert_eq!(chart(&panels[0]).title, "Crocoddyl torque history ABA");
        assert_eq!(chart(&panels[3]).y_label, "Acceleration (rad/s²)");
        assert_eq!(chart(&panels[5]).y_label, "Jerk (rad/s³)");
    }

    #[test]
    fn test_each_panel_has_one_curve_per_joint() {
        let log = sample_log(&[0.0, 0.1, 0.2, 0.3]);
        let jerk = calculate_jerk(log.ddq.view(), log.times.view()).unwrap();
        let panels = prepare_trial_panels("Run", &log, jerk.view());
        for idx in [0, 1, 2, 3, 5] {
            let config = chart(&panels[idx]);
            assert_eq!(config.series.len(), JOINT_COUNT);
            assert!(config.has_valid_ranges());
        }
        assert_eq!(chart(&panels[3]).series[0].data.len(), 4);
        let jerk_series = &chart(&panels[5]).series[0].data;
        assert_eq!(jerk_series.len(), 3);
        assert_eq!(jerk_series[0].0, 0.0);
        assert!((jerk_series[2].0 - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_single_sample_leaves_jerk_panel_empty() {
        let log = sample_log(&[0.0]);
        let jerk = calculate_jerk(log.ddq.view(), log.times.view()).unwrap();
        let panels = prepare_trial_panels("Run", &log, jerk.view());
        assert!(!chart(&panels[5]).has_data());
        assert!(chart(&panels[0]).has_data());
        assert!(chart(&panels[0]).has_valid_ranges());
    }

    #[test]
    fn test_non_finite_values_are_dropped() {
        let log = sample_log(&[0.0, 0.0, 1.0]);
        let jerk = calculate_jerk(log.ddq.view(), log.times.view()).unwrap();
        let (config, dropped) = joint_panel(
            "Jerk".to_string(),
            JERK_LABEL,
            log.times.slice(s![..2]),
            jerk.view(),
        );
        assert_eq!(dropped, JOINT_COUNT);
        assert!(config.series.iter().all(|s| s.data.len() == 1));
        assert!(config.has_valid_ranges());
    }
}
