use serde_json::json;

use crate::charts::config::{
    merge_overrides, ChartData, ChartOptions, ChartType, Dataset, Paint, Radius, RendererConfig,
    Series,
};
use crate::charts::data::NamedSeries;
use crate::charts::palette::{color_by_index, with_alpha};
use crate::t;

pub(super) fn render(
    labels: &[String],
    datasets: &[NamedSeries],
    options: &ChartOptions,
) -> RendererConfig {
    let title = options.title.clone().unwrap_or_else(|| t!("timeline-title"));
    let defaults = json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "interaction": { "intersect": false, "mode": "index" },
        "plugins": {
            "title": { "display": true, "text": title, "font": { "size": 16, "weight": "bold" } },
            "legend": { "position": "bottom" }
        },
        "scales": {
            "x": { "title": { "display": true, "text": t!("timeline-x-axis") } },
            "y": {
                "beginAtZero": true,
                "title": { "display": true, "text": t!("timeline-y-axis") }
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
                border_color: Some(Paint::solid(color)),
                background_color: Some(Paint::Solid(with_alpha(color, "20"))),
                border_width: Some(3.0),
                fill: Some(false),
                tension: Some(0.4),
                point_radius: Some(Radius::Fixed(6.0)),
                point_hover_radius: Some(8.0),
                point_background_color: Some(Paint::solid(color)),
                point_border_color: Some(Paint::solid("#fff")),
                point_border_width: Some(2.0),
                ..Dataset::default()
            }
        })
        .collect();

    RendererConfig::new(
        ChartType::Line,
        ChartData {
            labels: labels.to_vec(),
            datasets,
        },
        merge_overrides(defaults, &options.overrides),
    )
}
