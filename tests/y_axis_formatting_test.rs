// tests/y_axis_formatting_test.rs

use tracking_perf_render::plot_framework::format_tick_value;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_torque_values_keep_precision() {
        assert_eq!(format_tick_value(0.0), "0");
        assert_eq!(format_tick_value(0.25), "0.250");
        assert_eq!(format_tick_value(-0.05), "-0.050");
        assert_eq!(format_tick_value(5.5), "5.5");
        assert_eq!(format_tick_value(-12.0), "-12");
    }

    #[test]
    fn test_medium_values_are_integers() {
        assert_eq!(format_tick_value(250.4), "250");
        assert_eq!(format_tick_value(-4200.0), "-4200");
    }

    #[test]
    fn test_large_jerk_values_use_suffixes() {
        assert_eq!(format_tick_value(25_000.0), "25k");
        assert_eq!(format_tick_value(-40_000.0), "-40k");
        assert_eq!(format_tick_value(2_500_000.0), "2.5M");
    }

    #[test]
    fn test_zero_tick_residue_has_no_sign() {
        assert_eq!(format_tick_value(-1e-17), "0");
        assert_eq!(format_tick_value(3e-12), "0");
        assert_eq!(format_tick_value(-0.0), "0");
        assert_eq!(format_tick_value(-0.001), "-0.001");
    }
}
