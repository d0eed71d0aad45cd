//! Input shapes accepted by the chart strategies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a caller asks the registry to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Heatmap,
    Gauge,
    Radar,
    TimeComparison,
    Flow,
    Treemap,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Heatmap => "heatmap",
            Self::Gauge => "gauge",
            Self::Radar => "radar",
            Self::TimeComparison => "time_comparison",
            Self::Flow => "flow",
            Self::Treemap => "treemap",
        };
        f.write_str(name)
    }
}

/// One named numeric vector; position `i` lines up with label `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
    pub label: String,
    pub data: Vec<f64>,
}

impl NamedSeries {
    pub fn new(label: impl Into<String>, data: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            data,
        }
    }
}

/// Aggregates handed to a render strategy. Built fresh for each render call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ChartInputData {
    /// Label axis shared by one or more named series.
    TimeSeries {
        labels: Vec<String>,
        datasets: Vec<NamedSeries>,
    },
    /// Row-major grid: `values[y][x]`.
    Matrix {
        x_labels: Vec<String>,
        y_labels: Vec<String>,
        values: Vec<Vec<f64>>,
    },
    /// Single reading with its display range.
    Scalar { value: f64, min: f64, max: f64 },
    /// Category axes with one vector per dataset.
    MultiAxis {
        labels: Vec<String>,
        datasets: Vec<NamedSeries>,
    },
    /// One value per category label.
    Categories { labels: Vec<String>, values: Vec<f64> },
}

impl ChartInputData {
    /// Single-series time data.
    pub fn series(
        name: impl Into<String>,
        labels: impl IntoIterator<Item = impl Into<String>>,
        values: Vec<f64>,
    ) -> Self {
        Self::TimeSeries {
            labels: labels.into_iter().map(Into::into).collect(),
            datasets: vec![NamedSeries::new(name, values)],
        }
    }

    pub fn gauge(value: f64, min: f64, max: f64) -> Self {
        Self::Scalar { value, min, max }
    }

    /// Short name used in logs and shape errors.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::TimeSeries { .. } => "time_series",
            Self::Matrix { .. } => "matrix",
            Self::Scalar { .. } => "scalar",
            Self::MultiAxis { .. } => "multi_axis",
            Self::Categories { .. } => "categories",
        }
    }

    /// Category or time labels, when the shape has a single label axis.
    pub fn labels(&self) -> Option<&[String]> {
        match self {
            Self::TimeSeries { labels, .. }
            | Self::MultiAxis { labels, .. }
            | Self::Categories { labels, .. } => Some(labels),
            Self::Matrix { .. } | Self::Scalar { .. } => None,
        }
    }
}
