// src/data_input/error_history.rs

use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::constants::{CARTESIAN_DIMS, ERROR_SCALE_TO_MM};
use crate::error::{AnalysisError, Result};

/// One solve attempt from the free-text error log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialRecord {
    /// Commanded end-effector position (m).
    pub target: [f64; CARTESIAN_DIMS],
    /// Euclidean distance between target and reached position (m).
    pub error: f64,
    /// Solve wall time (s).
    pub elapsed_time: f64,
}

impl TrialRecord {
    /// Target tuple as the scatter chart's category label, e.g. `(0.1, -0.2, 0.3)`.
    ///
    /// Two trials share a category only when this string is identical.
    pub fn target_label(&self) -> String {
        let [x, y, z] = self.target;
        format!("({x:?}, {y:?}, {z:?})")
    }

    /// Tracking error in millimeters, as charted.
    pub fn error_mm(&self) -> f64 {
        self.error * ERROR_SCALE_TO_MM
    }
}

/// All trials of one error log, in line order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorHistory {
    pub records: Vec<TrialRecord>,
}

impl ErrorHistory {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn targets(&self) -> Vec<[f64; CARTESIAN_DIMS]> {
        self.records.iter().map(|r| r.target).collect()
    }

    pub fn errors(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.error).collect()
    }

    pub fn elapsed_times(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.elapsed_time).collect()
    }

    /// Logs trial count, error statistics and total solve time.
    pub fn log_summary(&self, run_name: &str) {
        if self.records.is_empty() {
            tracing::warn!("{run_name}: error log contains no trials");
            return;
        }
        let n = self.records.len() as f64;
        let mean_mm = self.records.iter().map(TrialRecord::error_mm).sum::<f64>() / n;
        let max_mm = self
            .records
            .iter()
            .map(TrialRecord::error_mm)
            .fold(f64::NEG_INFINITY, f64::max);
        let total_s: f64 = self.records.iter().map(|r| r.elapsed_time).sum();
        tracing::info!(
            "{run_name}: {} trials, mean error {mean_mm:.2} mm, max error {max_mm:.2} mm, total solve time {total_s:.2} s",
            self.records.len()
        );
    }
}

/// Why a single line was rejected; turned into an [`AnalysisError`] once the
/// file and line number are known.
#[derive(Debug, Clone, PartialEq)]
pub enum LineFault {
    Missing(&'static str),
    Invalid { field: &'static str, value: String },
}

const FIELD_TARGET: &str = "Target";
const FIELD_ERROR: &str = "Error";
const FIELD_ELAPSED: &str = "Elapsed Time";

/// Extracts `Target: [x, y, z]`, `Error: e` and `Elapsed Time: t` from a line.
///
/// The three fields are searched independently, so their order in the line
/// does not matter. All three must be present.
pub struct ErrorLineParser {
    target: Regex,
    error: Regex,
    elapsed: Regex,
}

impl ErrorLineParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            target: Regex::new(r"Target: \[([\d.-]+), ([\d.-]+), ([\d.-]+)\]")?,
            error: Regex::new(r"Error: ([\d.]+)")?,
            elapsed: Regex::new(r"Elapsed Time: ([\d.]+)")?,
        })
    }

    pub fn parse_line(&self, line: &str) -> std::result::Result<TrialRecord, LineFault> {
        let target_caps = self
            .target
            .captures(line)
            .ok_or(LineFault::Missing(FIELD_TARGET))?;
        let mut target = [0.0; CARTESIAN_DIMS];
        for (axis, value) in target.iter_mut().enumerate() {
            *value = parse_number(&target_caps[axis + 1], FIELD_TARGET)?;
        }

        let error_caps = self
            .error
            .captures(line)
            .ok_or(LineFault::Missing(FIELD_ERROR))?;
        let error = parse_number(&error_caps[1], FIELD_ERROR)?;

        let elapsed_caps = self
            .elapsed
            .captures(line)
            .ok_or(LineFault::Missing(FIELD_ELAPSED))?;
        let elapsed_time = parse_number(&elapsed_caps[1], FIELD_ELAPSED)?;

        Ok(TrialRecord {
            target,
            error,
            elapsed_time,
        })
    }
}

fn parse_number(text: &str, field: &'static str) -> std::result::Result<f64, LineFault> {
    text.parse::<f64>().map_err(|_| LineFault::Invalid {
        field,
        value: text.to_string(),
    })
}

/// Parses an error log file, one trial per line.
///
/// Fails on the first line that lacks a field or carries a malformed number;
/// no partial history is returned.
pub fn parse_error_log(path: &Path) -> Result<ErrorHistory> {
    let file = File::open(path).map_err(|e| AnalysisError::io(path, e))?;
    let history = read_error_log(BufReader::new(file), path)?;
    tracing::debug!("Read {} trials from '{}'", history.len(), path.display());
    Ok(history)
}

/// Parses error log lines from any buffered reader. `path` is only used in
/// error messages.
pub fn read_error_log<R: BufRead>(reader: R, path: &Path) -> Result<ErrorHistory> {
    let parser = ErrorLineParser::new()?;
    let mut records = Vec::new();

    for (line_index, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|e| AnalysisError::io(path, e))?;
        let line_number = line_index + 1;
        let record = parser.parse_line(&line).map_err(|fault| match fault {
            LineFault::Missing(field) => AnalysisError::MissingField {
                path: path.to_path_buf(),
                line_number,
                field,
                line: line.clone(),
            },
            LineFault::Invalid { field, value } => AnalysisError::InvalidNumber {
                path: path.to_path_buf(),
                line_number,
                field,
                value,
                line: line.clone(),
            },
        })?;
        records.push(record);
    }

    Ok(ErrorHistory { records })
}
