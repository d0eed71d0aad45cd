//! Fixed dashboard colours.

pub const PRIMARY: &str = "#007bff";
pub const SUCCESS: &str = "#28a745";
pub const WARNING: &str = "#ffc107";
pub const DANGER: &str = "#dc3545";
pub const INFO: &str = "#17a2b8";
pub const TRACK: &str = "#e9ecef";
pub const MUTED_TEXT: &str = "#666";

/// Dataset colours, indexed by dataset position.
pub const PALETTE: [&str; 8] = [
    PRIMARY, SUCCESS, WARNING, DANGER, INFO, "#6f42c1", // purple
    "#fd7e14", // orange
    "#20c997", // teal
];

/// Deterministic colour for the dataset at `index`.
pub fn color_by_index(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// `#rrggbb` plus a two-digit hex alpha suffix (`"20"`, `"66"`).
pub fn with_alpha(color: &str, alpha_hex: &str) -> String {
    format!("{color}{alpha_hex}")
}

/// Traffic-light band for a gauge percentage.
pub fn gauge_band(percent: f64) -> &'static str {
    if percent >= 80.0 {
        SUCCESS
    } else if percent >= 60.0 {
        WARNING
    } else {
        DANGER
    }
}

/// Heatmap cell colour for an intensity in `[0, 1]`.
pub fn heat_color(intensity: f64) -> String {
    format!("rgba(220, 53, 69, {intensity})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_wraps() {
        assert_eq!(color_by_index(0), PRIMARY);
        assert_eq!(color_by_index(8), PRIMARY);
        assert_eq!(color_by_index(13), "#6f42c1");
    }

    #[test]
    fn gauge_bands_follow_thresholds() {
        assert_eq!(gauge_band(80.0), SUCCESS);
        assert_eq!(gauge_band(79.9), WARNING);
        assert_eq!(gauge_band(60.0), WARNING);
        assert_eq!(gauge_band(10.0), DANGER);
    }

    #[test]
    fn heat_color_uses_intensity_as_alpha() {
        assert_eq!(heat_color(0.0), "rgba(220, 53, 69, 0)");
        assert_eq!(heat_color(0.5), "rgba(220, 53, 69, 0.5)");
    }
}
