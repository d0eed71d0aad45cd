//! Payload rows to chart input. Counts that are negative or not finite are
//! drawn as zero.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::charts::data::{ChartInputData, NamedSeries};
use crate::dashboard::payload::DashboardPayload;
use crate::i18n::weekday_label;
use crate::t;

pub const HOURS_PER_DAY: usize = 24;
pub const DAYS_PER_WEEK: usize = 7;

pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// RNCs per month, one line.
pub fn monthly_trend(payload: &DashboardPayload) -> ChartInputData {
    let rows = &payload.monthly_trends;
    ChartInputData::series(
        t!("series-rncs"),
        rows.iter().map(|row| row.mes.clone()),
        rows.iter().map(|row| sanitize(row.total)).collect(),
    )
}

/// Target against achieved, per department.
pub fn department_targets(payload: &DashboardPayload) -> ChartInputData {
    let rows = &payload.departments;
    ChartInputData::MultiAxis {
        labels: rows.iter().map(|row| row.department.clone()).collect(),
        datasets: vec![
            NamedSeries::new(
                t!("series-target"),
                rows.iter().map(|row| sanitize(row.meta)).collect(),
            ),
            NamedSeries::new(
                t!("series-achieved"),
                rows.iter().map(|row| sanitize(row.realizado)).collect(),
            ),
        ],
    }
}

pub fn sectors(payload: &DashboardPayload) -> ChartInputData {
    ChartInputData::Categories {
        labels: payload.setores.iter().map(|row| row.setor.clone()).collect(),
        values: payload.setores.iter().map(|row| sanitize(row.total)).collect(),
    }
}

pub fn priorities(payload: &DashboardPayload) -> ChartInputData {
    ChartInputData::Categories {
        labels: payload
            .prioridades
            .iter()
            .map(|row| row.prioridade.clone())
            .collect(),
        values: payload
            .prioridades
            .iter()
            .map(|row| sanitize(row.total))
            .collect(),
    }
}

/// Overall efficiency on a 0–100 gauge.
pub fn efficiency(payload: &DashboardPayload) -> ChartInputData {
    ChartInputData::gauge(sanitize(payload.eficiencia), 0.0, 100.0)
}

/// Weekday/hour activity, when the server sent creation timestamps.
///
/// `/api/indicadores` only carries aggregates; the heatmap needs the server to
/// add `created_at`. Without it there is no chart rather than an empty grid.
pub fn activity(payload: &DashboardPayload) -> Option<ChartInputData> {
    if payload.created_at.is_empty() {
        tracing::info!("payload has no created_at timestamps; activity heatmap unavailable");
        return None;
    }
    Some(weekday_hour_matrix(&payload.created_at))
}

/// Creation counts by weekday (rows, Sunday first) and hour of day (columns).
/// Unparseable timestamps are skipped.
pub fn weekday_hour_matrix<S: AsRef<str>>(timestamps: &[S]) -> ChartInputData {
    let mut values = vec![vec![0.0; HOURS_PER_DAY]; DAYS_PER_WEEK];
    for raw in timestamps {
        match OffsetDateTime::parse(raw.as_ref(), &Rfc3339) {
            Ok(moment) => {
                let day = usize::from(moment.weekday().number_days_from_sunday());
                let hour = usize::from(moment.hour());
                values[day][hour] += 1.0;
            }
            Err(err) => {
                tracing::debug!(timestamp = raw.as_ref(), error = %err, "skipping timestamp");
            }
        }
    }
    ChartInputData::Matrix {
        x_labels: (0..HOURS_PER_DAY).map(|hour| format!("{hour:02}h")).collect(),
        y_labels: (0..DAYS_PER_WEEK).map(weekday_label).collect(),
        values,
    }
}
