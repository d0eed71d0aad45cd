//! Wire model of the indicators endpoint.
//!
//! Every field defaults, and numeric fields accept `null`, numbers or numeric
//! strings, so a partially filled response still decodes.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("dashboard request failed with status {status}")]
    Http { status: u16 },
    #[error("dashboard request failed: {0}")]
    Network(String),
    #[error("malformed dashboard payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl LoadError {
    /// Transport failures and server errors are worth a second attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http { status } => *status >= 500,
            Self::Decode(_) => false,
        }
    }
}

fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Kpis {
    #[serde(deserialize_with = "number")]
    pub total_rncs: f64,
    #[serde(deserialize_with = "number")]
    pub total_metas: f64,
    #[serde(deserialize_with = "number")]
    pub active_departments: f64,
    #[serde(deserialize_with = "number")]
    pub overall_efficiency: f64,
    #[serde(deserialize_with = "number")]
    pub avg_rncs_per_dept: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Totals {
    #[serde(deserialize_with = "number")]
    pub total: f64,
    #[serde(deserialize_with = "number")]
    pub pendentes: f64,
    #[serde(deserialize_with = "number")]
    pub finalizadas: f64,
    #[serde(deserialize_with = "number")]
    pub resolvidas: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DepartmentRow {
    pub department: String,
    #[serde(deserialize_with = "number")]
    pub meta: f64,
    #[serde(deserialize_with = "number")]
    pub realizado: f64,
    #[serde(deserialize_with = "number")]
    pub efficiency: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MonthlyRow {
    pub mes: String,
    #[serde(deserialize_with = "number")]
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SectorRow {
    pub setor: String,
    #[serde(deserialize_with = "number")]
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PriorityRow {
    pub prioridade: String,
    #[serde(deserialize_with = "number")]
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardPayload {
    pub success: bool,
    pub kpis: Kpis,
    pub totals: Totals,
    pub departments: Vec<DepartmentRow>,
    pub monthly_trends: Vec<MonthlyRow>,
    pub setores: Vec<SectorRow>,
    pub prioridades: Vec<PriorityRow>,
    /// Share of finalized reports, in percent.
    #[serde(deserialize_with = "number")]
    pub eficiencia: f64,
    /// RFC 3339 creation timestamps feeding the weekday/hour heatmap.
    ///
    /// Not part of the aggregates `/api/indicadores` returns today; the server
    /// must add it (one entry per non-deleted RNC) for the heatmap to draw.
    pub created_at: Vec<String>,
}

impl DashboardPayload {
    pub fn from_json(raw: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(raw)?)
    }
}
