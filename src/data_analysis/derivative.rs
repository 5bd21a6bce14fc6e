// src/data_analysis/derivative.rs

use ndarray::{s, Array2, ArrayView1, ArrayView2};

use crate::error::{AnalysisError, Result};

/// Forward first difference of each column of `samples` over `times`.
///
/// Row `i` of the result is `(samples[i + 1] - samples[i]) / (times[i + 1] - times[i])`,
/// so the output has one row fewer than the input and the same column count.
/// With fewer than two samples the result is empty and nothing is divided.
/// A zero time step yields infinite or NaN values; they are returned as is.
pub fn forward_difference(samples: ArrayView2<f64>, times: ArrayView1<f64>) -> Result<Array2<f64>> {
    let (rows, cols) = samples.dim();
    if times.len() != rows {
        return Err(AnalysisError::LengthMismatch {
            times: times.len(),
            samples: rows,
        });
    }
    if rows < 2 {
        return Ok(Array2::zeros((0, cols)));
    }

    let dt = &times.slice(s![1..]) - &times.slice(s![..-1]);
    let mut diff = &samples.slice(s![1.., ..]) - &samples.slice(s![..-1, ..]);
    for (mut row, &step) in diff.rows_mut().into_iter().zip(dt.iter()) {
        row /= step;
    }
    Ok(diff)
}

/// Jerk (rad/s³) from joint accelerations `ddq` (rad/s²) sampled at `times`.
pub fn calculate_jerk(ddq: ArrayView2<f64>, times: ArrayView1<f64>) -> Result<Array2<f64>> {
    forward_difference(ddq, times)
}

/// Number of infinite or NaN entries, e.g. from repeated timestamps.
pub fn count_non_finite(values: ArrayView2<f64>) -> usize {
    values.iter().filter(|v| !v.is_finite()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn test_jerk_values() {
        let times = array![0.0, 1.0, 3.0];
        let ddq = array![
            [0.0, 0.0, 0.0, 0.0, 0.0],
            [1.0, 1.0, 1.0, 1.0, 1.0],
            [7.0, 7.0, 7.0, 7.0, 7.0]
        ];
        let jerk = calculate_jerk(ddq.view(), times.view()).unwrap();
        assert_eq!(
            jerk,
            array![[1.0, 1.0, 1.0, 1.0, 1.0], [3.0, 3.0, 3.0, 3.0, 3.0]]
        );
    }

    #[test]
    fn test_jerk_shape() {
        let n = 10;
        let times = Array1::linspace(0.0, 0.9, n);
        let ddq = Array2::from_shape_fn((n, 5), |(i, j)| (i * j) as f64);
        let jerk = calculate_jerk(ddq.view(), times.view()).unwrap();
        assert_eq!(jerk.dim(), (n - 1, 5));
    }

    #[test]
    fn test_single_sample_yields_empty_table() {
        let times = array![0.5];
        let ddq = array![[1.0, 2.0, 3.0, 4.0, 5.0]];
        let jerk = calculate_jerk(ddq.view(), times.view()).unwrap();
        assert_eq!(jerk.dim(), (0, 5));

        let no_ddq = Array2::<f64>::zeros((0, 5));
        let no_times = Array1::<f64>::zeros(0);
        let empty = calculate_jerk(no_ddq.view(), no_times.view()).unwrap();
        assert_eq!(empty.dim(), (0, 5));
    }

    #[test]
    fn test_columns_are_independent() {
        let times = array![0.0, 0.5];
        let ddq = array![[0.0, 1.0, 2.0, 3.0, 4.0], [1.0, 1.0, 0.0, 4.0, 4.5]];
        let jerk = calculate_jerk(ddq.view(), times.view()).unwrap();
        assert_eq!(jerk, array![[2.0, 0.0, -4.0, 2.0, 1.0]]);
    }

    #[test]
    fn test_zero_time_step_is_not_guarded() {
        let times = array![0.0, 0.0, 1.0];
        let ddq = array![
            [0.0, 1.0, 0.0, 0.0, 0.0],
            [0.0, 2.0, 0.0, 0.0, 0.0],
            [1.0, 2.0, 1.0, 1.0, 1.0]
        ];
        let jerk = calculate_jerk(ddq.view(), times.view()).unwrap();
        assert!(jerk[[0, 0]].is_nan());
        assert!(jerk[[0, 1]].is_infinite());
        assert_eq!(jerk[[1, 0]], 1.0);
        assert_eq!(count_non_finite(jerk.view()), 5);
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let times = array![0.0, 1.0];
        let ddq = Array2::<f64>::zeros((3, 5));
        assert!(matches!(
            calculate_jerk(ddq.view(), times.view()),
            Err(AnalysisError::LengthMismatch {
                times: 2,
                samples: 3
            })
        ));
    }
}
