//! Renderer configuration produced by the strategies and caller options consumed by them.
//!
//! `RendererConfig` serializes to the object shape Chart.js expects
//! (`{ type, data: { labels, datasets }, options }`). Anything Chart.js wants as
//! a JS callback (gauge centre text, heatmap tick labels) travels alongside as
//! a plain hint that backends turn into callbacks themselves.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Chart type understood by the underlying library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Scatter,
    Doughnut,
    Radar,
    Bar,
    Line,
    Bubble,
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scatter => "scatter",
            Self::Doughnut => "doughnut",
            Self::Radar => "radar",
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Bubble => "bubble",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RendererConfig {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub data: ChartData,
    pub options: Value,
    #[serde(skip)]
    pub overlay: Option<CenterText>,
    #[serde(skip)]
    pub tick_labels: Option<TickLabels>,
    #[serde(skip)]
    pub tooltips: Option<PointTooltips>,
}

impl RendererConfig {
    pub fn new(chart_type: ChartType, data: ChartData, options: Value) -> Self {
        Self {
            chart_type,
            data,
            options,
            overlay: None,
            tick_labels: None,
            tooltips: None,
        }
    }

    /// Chart.js-ready JSON (hints excluded).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Series,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Paint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Paint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<Radius>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_hover_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_background_color: Option<Paint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_border_color: Option<Paint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_border_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

/// Dataset payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Series {
    Values(Vec<f64>),
    Grid(Vec<GridPoint>),
    Bubbles(Vec<BubblePoint>),
}

impl Default for Series {
    fn default() -> Self {
        Self::Values(Vec::new())
    }
}

impl Series {
    pub fn len(&self) -> usize {
        match self {
            Self::Values(values) => values.len(),
            Self::Grid(points) => points.len(),
            Self::Bubbles(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Heatmap cell: grid coordinates plus its raw value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridPoint {
    pub x: usize,
    pub y: usize,
    pub v: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BubblePoint {
    pub x: usize,
    pub y: usize,
    pub r: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Paint {
    Solid(String),
    PerPoint(Vec<String>),
}

impl Paint {
    pub fn solid(color: impl Into<String>) -> Self {
        Self::Solid(color.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Radius {
    Fixed(f64),
    PerPoint(Vec<f64>),
}

/// Text drawn in the middle of a gauge after each frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterText {
    pub value_text: String,
    pub caption: String,
    pub color: String,
    pub value_size: u32,
    pub caption_size: u32,
}

/// Category names for the linear axes of a scatter-based heatmap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickLabels {
    pub x: Vec<String>,
    pub y: Vec<String>,
}

/// Tooltip text per data point, looked up by the hovered point's index.
/// An empty `titles` keeps the library's default title.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointTooltips {
    pub titles: Vec<String>,
    pub lines: Vec<String>,
}

/// Gauge colour overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaugeColors {
    pub progress: Option<String>,
    pub track: Option<String>,
}

/// Caller options. Every field is optional; strategies fall back to localized
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartOptions {
    pub title: Option<String>,
    /// Gauge value suffix, `%` when absent.
    pub unit: Option<String>,
    /// Gauge caption under the value.
    pub label: Option<String>,
    pub value_size: Option<u32>,
    pub font_size: Option<u32>,
    pub colors: GaugeColors,
    /// Upper bound of the radar / fallback bar scale.
    pub max_value: Option<f64>,
    /// Chart.js options merged over the strategy defaults, top-level keys replacing.
    pub overrides: Map<String, Value>,
}

impl ChartOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_override(mut self, key: impl Into<String>, value: Value) -> Self {
        self.overrides.insert(key.into(), value);
        self
    }
}

/// Shallow merge of caller overrides over default chart options.
pub(crate) fn merge_overrides(mut base: Value, overrides: &Map<String, Value>) -> Value {
    if let Value::Object(target) = &mut base {
        for (key, value) in overrides {
            target.insert(key.clone(), value.clone());
        }
    }
    base
}
