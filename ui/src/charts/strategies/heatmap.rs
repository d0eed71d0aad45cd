//! Weekday × hour style heatmap drawn as a scatter plot.
//!
//! Each grid cell becomes one point; colour alpha and point radius both follow
//! the cell's intensity, `value / max(1, max(all values))`, so an all-zero grid
//! renders as uniformly faint minimum-size points instead of `NaN`s.

use serde_json::json;

use super::finite_or_zero;
use crate::charts::config::{
    merge_overrides, ChartData, ChartOptions, ChartType, Dataset, GridPoint, Paint, Radius,
    PointTooltips, RendererConfig, Series, TickLabels,
};
use crate::charts::palette;
use crate::t;

/// Smallest radius a cell is drawn with.
pub const MIN_RADIUS: f64 = 3.0;
/// Radius of the hottest cell.
pub const MAX_RADIUS: f64 = 15.0;

/// Denominator used to normalize every cell of `values`.
pub fn intensity_scale(values: &[Vec<f64>]) -> f64 {
    values
        .iter()
        .flatten()
        .copied()
        .map(finite_or_zero)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1.0)
}

/// Intensity of one cell in `[0, 1]`.
pub fn intensity(value: f64, scale: f64) -> f64 {
    (finite_or_zero(value) / scale).clamp(0.0, 1.0)
}

pub fn point_radius(intensity: f64) -> f64 {
    (intensity * MAX_RADIUS).max(MIN_RADIUS)
}

pub(super) fn render(
    x_labels: &[String],
    y_labels: &[String],
    values: &[Vec<f64>],
    options: &ChartOptions,
) -> RendererConfig {
    let scale = intensity_scale(values);

    let mut points = Vec::new();
    let mut colors = Vec::new();
    let mut radii = Vec::new();
    let mut tooltips = PointTooltips::default();
    let series_label = t!("heatmap-dataset");
    for (y, row) in values.iter().enumerate() {
        for (x, value) in row.iter().copied().enumerate() {
            let level = intensity(value, scale);
            let v = finite_or_zero(value);
            points.push(GridPoint { x, y, v });
            colors.push(palette::heat_color(level));
            radii.push(point_radius(level));
            tooltips.titles.push(format!(
                "{} - {}",
                label_at(y_labels, y),
                label_at(x_labels, x)
            ));
            tooltips.lines.push(format!("{series_label}: {v}"));
        }
    }

    let title = options.title.clone().unwrap_or_else(|| t!("heatmap-title"));
    let defaults = json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "plugins": {
            "title": { "display": true, "text": title, "font": { "size": 16, "weight": "bold" } },
            "legend": { "display": false }
        },
        "scales": {
            "x": {
                "type": "linear",
                "position": "bottom",
                "min": 0,
                "max": x_labels.len().saturating_sub(1),
                "ticks": { "stepSize": 1 },
                "title": { "display": true, "text": t!("heatmap-x-axis") }
            },
            "y": {
                "type": "linear",
                "min": 0,
                "max": y_labels.len().saturating_sub(1),
                "ticks": { "stepSize": 1 },
                "title": { "display": true, "text": t!("heatmap-y-axis") }
            }
        }
    });

    let dataset = Dataset {
        label: series_label,
        data: Series::Grid(points),
        background_color: Some(Paint::PerPoint(colors)),
        border_color: Some(Paint::solid("rgba(255, 255, 255, 0.1)")),
        border_width: Some(1.0),
        point_radius: Some(Radius::PerPoint(radii)),
        ..Dataset::default()
    };

    let mut config = RendererConfig::new(
        ChartType::Scatter,
        ChartData {
            labels: Vec::new(),
            datasets: vec![dataset],
        },
        merge_overrides(defaults, &options.overrides),
    );
    config.tick_labels = Some(TickLabels {
        x: x_labels.to_vec(),
        y: y_labels.to_vec(),
    });
    config.tooltips = Some(tooltips);
    config
}

fn label_at(labels: &[String], index: usize) -> &str {
    labels.get(index).map(String::as_str).unwrap_or_default()
}
