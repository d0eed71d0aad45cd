//! Data-shaping strategies: one pure function per visualization, each turning
//! `ChartInputData` plus `ChartOptions` into a `RendererConfig`.
//!
//! `Renderer::select` decides which strategy a `ChartKind` resolves to for a
//! given payload. The only non-trivial decision is the radar fallback: fewer
//! than three category labels cannot form a legible polygon, so those payloads
//! are drawn as a grouped bar chart over the same datasets.

mod categories;
pub mod gauge;
pub mod heatmap;
mod radar;
mod timeline;

use std::fmt;

use crate::charts::config::{ChartOptions, RendererConfig};
use crate::charts::data::{ChartInputData, ChartKind};

/// Minimum number of category labels for a radar chart.
pub const RADAR_MIN_LABELS: usize = 3;

/// Strategy actually used to draw a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Renderer {
    Heatmap,
    Gauge,
    Radar,
    GroupedBar,
    Timeline,
    Flow,
    Treemap,
}

impl fmt::Display for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Heatmap => "heatmap",
            Self::Gauge => "gauge",
            Self::Radar => "radar",
            Self::GroupedBar => "grouped bar",
            Self::Timeline => "timeline",
            Self::Flow => "flow",
            Self::Treemap => "treemap",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("{renderer} renderer cannot draw {shape} data")]
    Mismatch {
        renderer: Renderer,
        shape: &'static str,
    },
}

impl Renderer {
    pub fn select(kind: ChartKind, data: &ChartInputData) -> Self {
        match kind {
            ChartKind::Heatmap => Self::Heatmap,
            ChartKind::Gauge => Self::Gauge,
            ChartKind::Radar => {
                let legible = data
                    .labels()
                    .is_some_and(|labels| labels.len() >= RADAR_MIN_LABELS);
                if legible {
                    Self::Radar
                } else {
                    Self::GroupedBar
                }
            }
            ChartKind::TimeComparison => Self::Timeline,
            ChartKind::Flow => Self::Flow,
            ChartKind::Treemap => Self::Treemap,
        }
    }

    pub fn render(
        self,
        data: &ChartInputData,
        options: &ChartOptions,
    ) -> Result<RendererConfig, ShapeError> {
        use ChartInputData as D;

        let config = match (self, data) {
            (
                Self::Heatmap,
                D::Matrix {
                    x_labels,
                    y_labels,
                    values,
                },
            ) => heatmap::render(x_labels, y_labels, values, options),
            (Self::Gauge, D::Scalar { value, min, max }) => {
                gauge::render(*value, *min, *max, options)
            }
            (Self::Radar, D::MultiAxis { labels, datasets })
            | (Self::Radar, D::TimeSeries { labels, datasets }) => {
                radar::render_radar(labels, datasets, options)
            }
            (Self::GroupedBar, D::MultiAxis { labels, datasets })
            | (Self::GroupedBar, D::TimeSeries { labels, datasets }) => {
                radar::render_grouped_bar(labels, datasets, options)
            }
            (Self::Timeline, D::TimeSeries { labels, datasets })
            | (Self::Timeline, D::MultiAxis { labels, datasets }) => {
                timeline::render(labels, datasets, options)
            }
            (Self::Flow, D::Categories { labels, values }) => {
                categories::render_flow(labels, values, options)
            }
            (Self::Treemap, D::Categories { labels, values }) => {
                categories::render_treemap(labels, values, options)
            }
            (renderer, other) => {
                return Err(ShapeError::Mismatch {
                    renderer,
                    shape: other.shape_name(),
                })
            }
        };
        Ok(config)
    }
}

/// Select the strategy for `kind` and shape `data` with it.
pub fn shape(
    kind: ChartKind,
    data: &ChartInputData,
    options: &ChartOptions,
) -> Result<RendererConfig, ShapeError> {
    Renderer::select(kind, data).render(data, options)
}

/// Missing or non-finite aggregates are drawn as zero.
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
