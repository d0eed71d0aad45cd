//! Half-donut gauge with a centre readout.

use serde_json::json;

use crate::charts::config::{
    merge_overrides, CenterText, ChartData, ChartOptions, ChartType, Dataset, Paint,
    RendererConfig, Series,
};
use crate::charts::palette;
use crate::core::format;
use crate::t;

/// Rescale `value` from `[min, max]` to `[0, 100]`.
///
/// Out-of-range readings clamp; a degenerate range (`max == min`) or any other
/// non-finite intermediate yields `0`.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let raw = (value - min) / (max - min) * 100.0;
    if raw.is_finite() {
        raw.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

pub(super) fn render(value: f64, min: f64, max: f64, options: &ChartOptions) -> RendererConfig {
    let percent = normalize(value, min, max);
    let color = options
        .colors
        .progress
        .clone()
        .unwrap_or_else(|| palette::gauge_band(percent).to_string());
    let track = options
        .colors
        .track
        .clone()
        .unwrap_or_else(|| palette::TRACK.to_string());

    let title = options.title.clone().unwrap_or_else(|| t!("gauge-title"));
    let defaults = json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "circumference": 180,
        "rotation": -90,
        "cutout": "80%",
        "plugins": {
            "title": { "display": true, "text": title, "font": { "size": 16, "weight": "bold" } },
            "legend": { "display": false },
            "tooltip": { "enabled": false }
        },
        "animation": { "animateRotate": true, "duration": 2000 }
    });

    let dataset = Dataset {
        label: String::new(),
        data: Series::Values(vec![percent, (100.0 - percent).max(0.0)]),
        background_color: Some(Paint::PerPoint(vec![color.clone(), track])),
        border_width: Some(0.0),
        border_radius: Some(10.0),
        ..Dataset::default()
    };

    let unit = options.unit.as_deref().unwrap_or("%");
    let mut config = RendererConfig::new(
        ChartType::Doughnut,
        ChartData {
            labels: Vec::new(),
            datasets: vec![dataset],
        },
        merge_overrides(defaults, &options.overrides),
    );
    config.overlay = Some(CenterText {
        value_text: format::format_gauge_value(value, unit),
        caption: options.label.clone().unwrap_or_else(|| t!("gauge-caption")),
        color,
        value_size: options.value_size.unwrap_or(24),
        caption_size: options.font_size.unwrap_or(14),
    });
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::config::GaugeColors;

    #[test]
    fn normalize_scales_and_clamps() {
        assert_eq!(normalize(50.0, 0.0, 100.0), 50.0);
        assert_eq!(normalize(150.0, 0.0, 100.0), 100.0);
        assert_eq!(normalize(-20.0, 0.0, 100.0), 0.0);
        assert_eq!(normalize(15.0, 10.0, 20.0), 50.0);
    }

    #[test]
    fn normalize_guards_degenerate_range() {
        assert_eq!(normalize(5.0, 10.0, 10.0), 0.0);
        assert_eq!(normalize(10.0, 10.0, 10.0), 0.0);
        assert_eq!(normalize(f64::NAN, 0.0, 100.0), 0.0);
    }

    #[test]
    fn band_colour_follows_percentage() {
        let config = render(85.0, 0.0, 100.0, &ChartOptions::default());
        assert_eq!(config.chart_type, ChartType::Doughnut);
        assert_eq!(
            config.data.datasets[0].background_color,
            Some(Paint::PerPoint(vec![
                palette::SUCCESS.to_string(),
                palette::TRACK.to_string()
            ]))
        );
        assert_eq!(
            config.data.datasets[0].data,
            Series::Values(vec![85.0, 15.0])
        );

        let low = render(30.0, 0.0, 100.0, &ChartOptions::default());
        assert_eq!(low.overlay.unwrap().color, palette::DANGER);
    }

    #[test]
    fn explicit_colours_override_band() {
        let options = ChartOptions {
            colors: GaugeColors {
                progress: Some("#123456".into()),
                track: Some("#eeeeee".into()),
            },
            unit: Some(" pts".into()),
            ..ChartOptions::default()
        };
        let config = render(99.6, 0.0, 100.0, &options);
        let overlay = config.overlay.unwrap();
        assert_eq!(overlay.color, "#123456");
        assert_eq!(overlay.value_text, "100 pts");
        assert_eq!(overlay.value_size, 24);
        assert_eq!(overlay.caption_size, 14);
    }

    #[test]
    fn readout_shows_raw_value_not_percentage() {
        let config = render(5.0, 0.0, 10.0, &ChartOptions::default());
        assert_eq!(config.overlay.unwrap().value_text, "5%");
        assert_eq!(
            config.data.datasets[0].data,
            Series::Values(vec![50.0, 50.0])
        );
    }
}
