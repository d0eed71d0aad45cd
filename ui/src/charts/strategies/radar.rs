use serde_json::json;

use crate::charts::config::{
    merge_overrides, ChartData, ChartOptions, ChartType, Dataset, Paint, Radius, RendererConfig,
    Series,
};
use crate::charts::data::NamedSeries;
use crate::charts::palette::{color_by_index, with_alpha};
use crate::t;

const DEFAULT_SCALE_MAX: f64 = 100.0;

pub(super) fn render_radar(
    labels: &[String],
    datasets: &[NamedSeries],
    options: &ChartOptions,
) -> RendererConfig {
    let title = options.title.clone().unwrap_or_else(|| t!("radar-title"));
    let defaults = json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "plugins": {
            "title": { "display": true, "text": title, "font": { "size": 16, "weight": "bold" } },
            "legend": {
                "position": "bottom",
                "labels": { "padding": 20, "usePointStyle": true }
            }
        },
        "scales": {
            "r": {
                "beginAtZero": true,
                "max": options.max_value.unwrap_or(DEFAULT_SCALE_MAX),
                "ticks": { "stepSize": 20, "showLabelBackdrop": false },
                "grid": { "color": "rgba(0,0,0,0.1)" },
                "angleLines": { "color": "rgba(0,0,0,0.1)" },
                "pointLabels": { "font": { "size": 12, "weight": "bold" } }
            }
        },
        "animation": { "duration": 2000, "easing": "easeInOutQuart" }
    });

    let datasets = datasets
        .iter()
        .enumerate()
        .map(|(index, series)| {
            let color = color_by_index(index);
            Dataset {
                label: series.label.clone(),
                data: Series::Values(series.data.clone()),
                background_color: Some(Paint::Solid(with_alpha(color, "20"))),
                border_color: Some(Paint::solid(color)),
                border_width: Some(2.0),
                point_background_color: Some(Paint::solid(color)),
                point_border_color: Some(Paint::solid("#fff")),
                point_border_width: Some(2.0),
                point_radius: Some(Radius::Fixed(5.0)),
                point_hover_radius: Some(8.0),
                fill: Some(true),
                ..Dataset::default()
            }
        })
        .collect();

    RendererConfig::new(
        ChartType::Radar,
        ChartData {
            labels: labels.to_vec(),
            datasets,
        },
        merge_overrides(defaults, &options.overrides),
    )
}

/// Same datasets as grouped bars, for payloads with too few axes for a radar.
pub(super) fn render_grouped_bar(
    labels: &[String],
    datasets: &[NamedSeries],
    options: &ChartOptions,
) -> RendererConfig {
    let labels = if labels.is_empty() {
        vec![t!("radar-missing-label")]
    } else {
        labels.to_vec()
    };

    let title = options
        .title
        .clone()
        .unwrap_or_else(|| t!("radar-fallback-title"));
    let defaults = json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "plugins": {
            "title": { "display": true, "text": title, "font": { "size": 16, "weight": "bold" } },
            "legend": { "position": "bottom" }
        },
        "scales": {
            "y": { "beginAtZero": true, "max": options.max_value.unwrap_or(DEFAULT_SCALE_MAX) }
        }
    });

    let datasets = datasets
        .iter()
        .enumerate()
        .map(|(index, series)| {
            let color = color_by_index(index);
            Dataset {
                label: series.label.clone(),
                data: Series::Values(series.data.clone()),
                background_color: Some(Paint::Solid(with_alpha(color, "66"))),
                border_color: Some(Paint::solid(color)),
                border_width: Some(1.0),
                ..Dataset::default()
            }
        })
        .collect();

    RendererConfig::new(
        ChartType::Bar,
        ChartData { labels, datasets },
        merge_overrides(defaults, &options.overrides),
    )
}
