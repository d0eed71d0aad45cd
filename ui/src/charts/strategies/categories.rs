//! Single-series categorical charts: the process-flow bar and the bubble treemap.

use serde_json::json;

use super::finite_or_zero;
use crate::charts::config::{
    merge_overrides, BubblePoint, ChartData, ChartOptions, ChartType, Dataset, Paint,
    PointTooltips, RendererConfig, Series,
};
use crate::charts::palette::color_by_index;
use crate::t;

/// Bubbles per treemap row.
const TREEMAP_COLUMNS: usize = 4;

fn per_index_colors(count: usize) -> Paint {
    Paint::PerPoint(
        (0..count)
            .map(|index| color_by_index(index).to_string())
            .collect(),
    )
}

pub(super) fn render_flow(
    labels: &[String],
    values: &[f64],
    options: &ChartOptions,
) -> RendererConfig {
    let title = options.title.clone().unwrap_or_else(|| t!("flow-title"));
    let defaults = json!({
        "indexAxis": "y",
        "responsive": true,
        "maintainAspectRatio": false,
        "plugins": {
            "title": { "display": true, "text": title, "font": { "size": 16, "weight": "bold" } },
            "legend": { "display": false }
        },
        "scales": {
            "x": { "beginAtZero": true, "title": { "display": true, "text": t!("flow-x-axis") } },
            "y": { "title": { "display": true, "text": t!("flow-y-axis") } }
        }
    });

    let dataset = Dataset {
        label: t!("flow-dataset"),
        data: Series::Values(values.iter().copied().map(finite_or_zero).collect()),
        background_color: Some(per_index_colors(values.len())),
        border_width: Some(2.0),
        border_color: Some(Paint::solid("#fff")),
        ..Dataset::default()
    };

    RendererConfig::new(
        ChartType::Bar,
        ChartData {
            labels: labels.to_vec(),
            datasets: vec![dataset],
        },
        merge_overrides(defaults, &options.overrides),
    )
}

/// Bubble layout approximating a treemap; hovering a bubble names its category.
pub(super) fn render_treemap(
    labels: &[String],
    values: &[f64],
    options: &ChartOptions,
) -> RendererConfig {
    let title = options.title.clone().unwrap_or_else(|| t!("treemap-title"));
    let defaults = json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "plugins": {
            "title": { "display": true, "text": title, "font": { "size": 16, "weight": "bold" } }
        },
        "scales": {
            "x": { "display": false },
            "y": { "display": false }
        }
    });

    let points = values
        .iter()
        .enumerate()
        .map(|(index, value)| BubblePoint {
            x: index % TREEMAP_COLUMNS,
            y: index / TREEMAP_COLUMNS,
            r: finite_or_zero(*value).max(0.0).sqrt() * 2.0,
        })
        .collect();

    let dataset = Dataset {
        label: t!("treemap-dataset"),
        data: Series::Bubbles(points),
        background_color: Some(per_index_colors(values.len())),
        border_color: Some(Paint::solid("#fff")),
        border_width: Some(2.0),
        ..Dataset::default()
    };

    let lines = values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let label = labels.get(index).map(String::as_str).unwrap_or_default();
            format!("{label}: {}", finite_or_zero(*value))
        })
        .collect();

    let mut config = RendererConfig::new(
        ChartType::Bubble,
        ChartData {
            labels: Vec::new(),
            datasets: vec![dataset],
        },
        merge_overrides(defaults, &options.overrides),
    );
    config.tooltips = Some(PointTooltips {
        titles: Vec::new(),
        lines,
    });
    config
}
