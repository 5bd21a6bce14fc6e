// src/pipeline.rs

use ndarray::Array2;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{COMPARISON_RUNS, ERROR_HISTORY_FILE_NAME, TRIAL_HISTORY_FILE_SUFFIX};
use crate::data_analysis::derivative::{calculate_jerk, count_non_finite};
use crate::data_input::error_history::{parse_error_log, ErrorHistory};
use crate::data_input::trial_data::TrialLog;
use crate::data_input::trial_parser::parse_trial_log;
use crate::error::{AnalysisError, Result};
use crate::plot_functions::plot_error_history::plot_error_history;
use crate::plot_functions::plot_trial_history::plot_trial_history;

/// The two logs produced by one controller strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSource {
    pub name: String,
    pub error_log: PathBuf,
    pub trial_log: PathBuf,
}

/// Where figures are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    pub output_dir: PathBuf,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

/// Figures written by [`run_analysis`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub error_history_plot: PathBuf,
    pub trial_plots: Vec<PathBuf>,
}

/// The ABA / Linear / None runs of a comparison directory, in that order.
pub fn run_sources_for_comparison(dir: &Path) -> Vec<RunSource> {
    COMPARISON_RUNS
        .iter()
        .map(|(name, error_file, trial_file)| RunSource {
            name: (*name).to_string(),
            error_log: dir.join(error_file),
            trial_log: dir.join(trial_file),
        })
        .collect()
}

/// A single run named after the error log's file stem.
pub fn run_source_for_single(error_log: &Path, trial_log: &Path) -> RunSource {
    let name = error_log
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "run".to_string());
    RunSource {
        name,
        error_log: error_log.to_path_buf(),
        trial_log: trial_log.to_path_buf(),
    }
}

/// Replaces anything outside `[A-Za-z0-9_-]` so a run name is safe in a file name.
pub fn sanitize_file_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "run".to_string()
    } else {
        cleaned
    }
}

/// Output image path of a run's trial figure.
pub fn trial_plot_path(options: &OutputOptions, run_name: &str) -> PathBuf {
    options.output_dir.join(format!(
        "{}{TRIAL_HISTORY_FILE_SUFFIX}",
        sanitize_file_component(run_name)
    ))
}

/// Parses a run's trial log and derives its jerk table.
pub fn load_trial(source: &RunSource) -> Result<(TrialLog, Array2<f64>)> {
    let log = parse_trial_log(&source.trial_log)?;
    log.log_summary(&source.name);
    let jerk = calculate_jerk(log.ddq.view(), log.times.view())?;
    let non_finite = count_non_finite(jerk.view());
    if non_finite > 0 {
        tracing::warn!(
            "{}: {non_finite} jerk values are not finite (zero or negative time step)",
            source.name
        );
    }
    Ok((log, jerk))
}

/// Runs the whole analysis for one or more runs.
///
/// Order: every error log is parsed and the shared scatter is rendered, then
/// each run's trial log is parsed, differentiated and rendered. The first
/// failure aborts the run.
pub fn run_analysis(sources: &[RunSource], options: &OutputOptions) -> Result<AnalysisReport> {
    if sources.is_empty() {
        return Err(AnalysisError::NoRuns);
    }
    fs::create_dir_all(&options.output_dir)
        .map_err(|e| AnalysisError::io(&options.output_dir, e))?;

    tracing::info!("--- Parsing error histories ---");
    let mut histories: Vec<(&str, ErrorHistory)> = Vec::with_capacity(sources.len());
    for source in sources {
        let history = parse_error_log(&source.error_log)?;
        history.log_summary(&source.name);
        histories.push((source.name.as_str(), history));
    }

    tracing::info!("--- Generating Error History Plot ---");
    let error_history_plot = options.output_dir.join(ERROR_HISTORY_FILE_NAME);
    let named: Vec<(&str, &ErrorHistory)> = histories.iter().map(|(n, h)| (*n, h)).collect();
    plot_error_history(&named, &error_history_plot)?;

    let mut trial_plots = Vec::with_capacity(sources.len());
    for source in sources {
        tracing::info!("--- Generating Trial History Plot for {} ---", source.name);
        let (log, jerk) = load_trial(source)?;
        let output_path = trial_plot_path(options, &source.name);
        plot_trial_history(&source.name, &log, jerk.view(), &output_path)?;
        trial_plots.push(output_path);
    }

    Ok(AnalysisReport {
        error_history_plot,
        trial_plots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_sources_use_fixed_names() {
        let sources = run_sources_for_comparison(Path::new("/data/exp"));
        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["ABA", "Linear", "None"]);
        assert_eq!(
            sources[1].error_log,
            PathBuf::from("/data/exp/error_history_lin.txt")
        );
        assert_eq!(
            sources[2].trial_log,
            PathBuf::from("/data/exp/full_history_none.csv")
        );
    }

    #[test]
    fn test_single_source_named_after_error_log() {
        let source = run_source_for_single(Path::new("logs/run_42.txt"), Path::new("logs/run_42.csv"));
        assert_eq!(source.name, "run_42");
        assert_eq!(source.trial_log, PathBuf::from("logs/run_42.csv"));
    }

    #[test]
    fn test_sanitize_file_component() {
        assert_eq!(sanitize_file_component("ABA"), "ABA");
        assert_eq!(sanitize_file_component("run 1/b.c"), "run_1_b_c");
        assert_eq!(sanitize_file_component(""), "run");
    }

    #[test]
    fn test_trial_plot_path() {
        let options = OutputOptions {
            output_dir: PathBuf::from("out"),
        };
        assert_eq!(
            trial_plot_path(&options, "Linear"),
            PathBuf::from("out/Linear_TrialHistory.png")
        );
    }

    #[test]
    fn test_empty_source_list_is_rejected() {
        let err = run_analysis(&[], &OutputOptions::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::NoRuns));
    }
}
