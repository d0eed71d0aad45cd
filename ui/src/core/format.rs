//! Formatting helpers for presenting metrics.

/// Round to the nearest integer, halves toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Gauge readout: the raw reading rounded, followed by `unit`.
pub fn format_gauge_value(value: f64, unit: &str) -> String {
    if !value.is_finite() {
        return "—".to_string();
    }
    format!("{:.0}{unit}", round_half_up(value))
}

pub fn format_percent(value: f64) -> String {
    format_gauge_value(value, "%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves_round_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(7.49), 7.0);
    }

    #[test]
    fn gauge_value_keeps_unit() {
        assert_eq!(format_gauge_value(99.6, " pts"), "100 pts");
        assert_eq!(format_gauge_value(5.0, "%"), "5%");
        assert_eq!(format_gauge_value(f64::NAN, "%"), "—");
        assert_eq!(format_percent(-0.2), "0%");
    }
}
