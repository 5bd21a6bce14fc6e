// src/data_input/trial_data.rs

use ndarray::{Array1, Array2};

use crate::constants::{
    CARTESIAN_DIMS, COL_DDQ, COL_ERROR, COL_TARGET, COL_TIME, COL_TORQUE_CROCODDYL,
    COL_TORQUE_MEASURED, COL_TORQUE_RICCATI, JOINT_COUNT, TRIAL_ROW_WIDTH,
};

/// One row of the trial CSV, with every column named.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TimestepSample {
    pub time: f64,                                // Timestamp (s).
    pub target: [f64; CARTESIAN_DIMS],            // End-effector target.
    pub error: [f64; CARTESIAN_DIMS],             // Per-axis tracking error.
    pub torque_crocoddyl: [f64; JOINT_COUNT],     // Torque from the Crocoddyl solver (Nm).
    pub torque_riccati: [f64; JOINT_COUNT],       // Torque from the Riccati feedback (Nm).
    pub torque_measured: [f64; JOINT_COUNT],      // Measured joint torque (Nm).
    pub ddq: [f64; JOINT_COUNT],                  // Joint acceleration (rad/s²).
}

impl TimestepSample {
    /// Builds a sample from exactly [`TRIAL_ROW_WIDTH`] parsed values.
    ///
    /// Returns `None` for any other width.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.len() != TRIAL_ROW_WIDTH {
            return None;
        }
        Some(Self {
            time: values[COL_TIME],
            target: take(values, COL_TARGET),
            error: take(values, COL_ERROR),
            torque_crocoddyl: take(values, COL_TORQUE_CROCODDYL),
            torque_riccati: take(values, COL_TORQUE_RICCATI),
            torque_measured: take(values, COL_TORQUE_MEASURED),
            ddq: take(values, COL_DDQ),
        })
    }
}

fn take<const N: usize>(values: &[f64], start: usize) -> [f64; N] {
    std::array::from_fn(|i| values[start + i])
}

/// A whole trial log held as fixed-width tables, one row per timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialLog {
    pub times: Array1<f64>,            // N
    pub targets: Array2<f64>,          // N x 3
    pub errors: Array2<f64>,           // N x 3
    pub torque_crocoddyl: Array2<f64>, // N x 5
    pub torque_riccati: Array2<f64>,   // N x 5
    pub torque_measured: Array2<f64>,  // N x 5
    pub ddq: Array2<f64>,              // N x 5
}

impl TrialLog {
    /// Zero-filled tables for `rows` timesteps.
    pub fn with_rows(rows: usize) -> Self {
        Self {
            times: Array1::zeros(rows),
            targets: Array2::zeros((rows, CARTESIAN_DIMS)),
            errors: Array2::zeros((rows, CARTESIAN_DIMS)),
            torque_crocoddyl: Array2::zeros((rows, JOINT_COUNT)),
            torque_riccati: Array2::zeros((rows, JOINT_COUNT)),
            torque_measured: Array2::zeros((rows, JOINT_COUNT)),
            ddq: Array2::zeros((rows, JOINT_COUNT)),
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Writes `sample` into row `index`.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn set_row(&mut self, index: usize, sample: &TimestepSample) {
        self.times[index] = sample.time;
        fill(&mut self.targets, index, &sample.target);
        fill(&mut self.errors, index, &sample.error);
        fill(&mut self.torque_crocoddyl, index, &sample.torque_crocoddyl);
        fill(&mut self.torque_riccati, index, &sample.torque_riccati);
        fill(&mut self.torque_measured, index, &sample.torque_measured);
        fill(&mut self.ddq, index, &sample.ddq);
    }

    /// Mean sample rate in Hz over strictly increasing timestamps.
    pub fn estimated_sample_rate(&self) -> Option<f64> {
        let mut total_delta = 0.0;
        let mut count = 0;
        for pair in self.times.as_slice()?.windows(2) {
            let delta = pair[1] - pair[0];
            if delta > 1e-9 {
                total_delta += delta;
                count += 1;
            }
        }
        if count > 0 {
            Some(count as f64 / total_delta)
        } else {
            None
        }
    }

    /// Logs sample count, time span, sample rate and peak torques.
    pub fn log_summary(&self, run_name: &str) {
        if self.is_empty() {
            tracing::warn!("{run_name}: trial log contains no samples");
            return;
        }
        let start = self.times[0];
        let end = self.times[self.len() - 1];
        tracing::info!(
            "{run_name}: {} samples spanning {start:.3} s to {end:.3} s",
            self.len()
        );
        match self.estimated_sample_rate() {
            Some(rate) => tracing::info!("{run_name}: estimated sample rate {rate:.2} Hz"),
            None => tracing::warn!(
                "{run_name}: could not determine sample rate (need >= 2 samples with distinct timestamps)"
            ),
        }
        for (label, table) in [
            ("Crocoddyl", &self.torque_crocoddyl),
            ("Riccati", &self.torque_riccati),
            ("measured", &self.torque_measured),
        ] {
            let peak = table.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
            tracing::debug!("{run_name}: peak |{label} torque| = {peak:.3} Nm");
        }
    }
}

fn fill(table: &mut Array2<f64>, index: usize, values: &[f64]) {
    for (cell, &value) in table.row_mut(index).iter_mut().zip(values) {
        *cell = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_values() -> Vec<f64> {
        (0..TRIAL_ROW_WIDTH).map(|i| i as f64).collect()
    }

    #[test]
    fn test_from_values_partitions_columns() {
        let sample = TimestepSample::from_values(&row_values()).unwrap();
        assert_eq!(sample.time, 0.0);
        assert_eq!(sample.target, [1.0, 2.0, 3.0]);
        assert_eq!(sample.error, [4.0, 5.0, 6.0]);
        assert_eq!(sample.torque_crocoddyl, [7.0, 8.0, 9.0, 10.0, 11.0]);
        assert_eq!(sample.torque_riccati, [12.0, 13.0, 14.0, 15.0, 16.0]);
        assert_eq!(sample.torque_measured, [17.0, 18.0, 19.0, 20.0, 21.0]);
        assert_eq!(sample.ddq, [22.0, 23.0, 24.0, 25.0, 26.0]);
    }

    #[test]
    fn test_from_values_rejects_other_widths() {
        let values = row_values();
        assert!(TimestepSample::from_values(&values[..26]).is_none());
        let mut wide = values.clone();
        wide.push(27.0);
        assert!(TimestepSample::from_values(&wide).is_none());
    }

    #[test]
    fn test_set_row_fills_every_table() {
        let mut log = TrialLog::with_rows(2);
        let sample = TimestepSample::from_values(&row_values()).unwrap();
        log.set_row(1, &sample);
        assert_eq!(log.times[1], 0.0);
        assert_eq!(log.targets.row(1).to_vec(), vec![1.0, 2.0, 3.0]);
        assert_eq!(log.ddq.row(1).to_vec(), vec![22.0, 23.0, 24.0, 25.0, 26.0]);
        assert_eq!(log.ddq.row(0).to_vec(), vec![0.0; JOINT_COUNT]);
    }

    #[test]
    fn test_estimated_sample_rate() {
        let mut log = TrialLog::with_rows(3);
        log.times = Array1::from(vec![0.0, 0.01, 0.02]);
        let rate = log.estimated_sample_rate().unwrap();
        assert!((rate - 100.0).abs() < 1e-9);

        let single = TrialLog::with_rows(1);
        assert!(single.estimated_sample_rate().is_none());
    }
}
