use std::rc::Rc;

use dioxus::prelude::*;
use futures::future::{FutureExt, LocalBoxFuture, Shared};

use crate::charts::{self, ChartInputData, ChartKind, ChartOptions, ChartSource, Studio};
use crate::components::ChartCanvas;
use crate::core::platform;
use crate::dashboard::{aggregate, load_dashboard, DashboardPayload};
use crate::t;

const DASHBOARD_CSS: Asset = asset!("/assets/styling/dashboard.css");

type PayloadFuture = Shared<LocalBoxFuture<'static, Result<DashboardPayload, String>>>;

/// One request for the indicators, shared by the KPI cards and every chart.
#[derive(Clone)]
struct DashboardLoad {
    generation: u32,
    payload: PayloadFuture,
}

impl DashboardLoad {
    fn start(generation: u32) -> Self {
        let payload = async move {
            load_dashboard().await.map_err(|err| {
                tracing::error!(generation, error = %err, "dashboard load failed");
                err.to_string()
            })
        };
        Self {
            generation,
            payload: payload.boxed_local().shared(),
        }
    }

    fn chart(&self, select: fn(&DashboardPayload) -> Option<ChartInputData>) -> ChartSource {
        let payload = self.payload.clone();
        ChartSource::pending(self.generation, async move {
            payload.await.ok().and_then(|p| select(&p))
        })
    }
}

impl PartialEq for DashboardLoad {
    fn eq(&self, other: &Self) -> bool {
        self.generation == other.generation
    }
}

#[component]
pub fn Dashboard() -> Element {
    crate::i18n::init();
    // Subscribe to the global language code (if provided) so we re-render on change.
    let _lang_code: Option<Signal<String>> = try_use_context::<Signal<String>>();

    let studio: Studio = use_context_provider(charts::platform_studio);
    let payload = use_signal(|| Option::<DashboardPayload>::None);
    let load_error = use_signal(|| Option::<String>::None);
    let mut generation = use_signal(|| 0u32);
    let load = use_memo(move || DashboardLoad::start(generation()));

    use_effect(move || {
        let current = load();
        let mut payload = payload;
        let mut load_error = load_error;
        spawn(async move {
            match current.payload.await {
                Ok(loaded) => {
                    payload.set(Some(loaded));
                    load_error.set(None);
                }
                Err(reason) => load_error.set(Some(reason)),
            }
        });
    });

    {
        let studio = studio.clone();
        use_hook(move || Rc::new(platform::ResizeListener::new(move || studio.resize_all())));
    }
    {
        let studio = studio.clone();
        use_drop(move || studio.clear());
    }

    let kpis = payload().map(|p| {
        (
            p.totals.total.max(p.kpis.total_rncs),
            p.totals.pendentes,
            p.totals.finalizadas,
            p.kpis.active_departments,
        )
    });

    let current = load();
    let trend = current.chart(|p| Some(aggregate::monthly_trend(p)));
    let departments = current.chart(|p| Some(aggregate::department_targets(p)));
    let efficiency = current.chart(|p| Some(aggregate::efficiency(p)));
    let activity = current.chart(aggregate::activity);
    let priorities = current.chart(|p| Some(aggregate::priorities(p)));
    let sectors = current.chart(|p| Some(aggregate::sectors(p)));

    rsx! {
        document::Link { rel: "stylesheet", href: DASHBOARD_CSS }

        section { class: "page page-dashboard",
            h1 { {t!("dashboard-title")} }
            p { class: "page-dashboard__subtitle", {t!("dashboard-subtitle")} }
            button {
                class: "dashboard__refresh",
                r#type: "button",
                onclick: move |_| generation += 1,
                {t!("dashboard-refresh")}
            }

            if let Some(reason) = load_error() {
                div { class: "dashboard__error", role: "alert",
                    span { {t!("dashboard-load-failed", reason = reason)} }
                    button {
                        r#type: "button",
                        onclick: move |_| generation += 1,
                        {t!("dashboard-retry")}
                    }
                }
            }

            if let Some((total, pending, finalized, active)) = kpis {
                div { class: "dashboard__kpis",
                    KpiCard { label: t!("kpi-total"), value: format!("{total:.0}") }
                    KpiCard { label: t!("kpi-pending"), value: format!("{pending:.0}") }
                    KpiCard { label: t!("kpi-finalized"), value: format!("{finalized:.0}") }
                    KpiCard { label: t!("kpi-departments"), value: format!("{active:.0}") }
                }
            }

            div { class: "dashboard__grid",
                ChartCanvas {
                    canvas_id: "efficiencyGauge",
                    kind: ChartKind::Gauge,
                    source: efficiency,
                    height: 240,
                }
                ChartCanvas {
                    canvas_id: "monthlyTrend",
                    kind: ChartKind::TimeComparison,
                    source: trend,
                }
                ChartCanvas {
                    canvas_id: "departmentRadar",
                    kind: ChartKind::Radar,
                    source: departments,
                    options: ChartOptions {
                        max_value: Some(100.0),
                        ..ChartOptions::default()
                    },
                }
                ChartCanvas {
                    canvas_id: "activityHeatmap",
                    kind: ChartKind::Heatmap,
                    source: activity,
                    height: 360,
                }
                ChartCanvas {
                    canvas_id: "priorityFlow",
                    kind: ChartKind::Flow,
                    source: priorities,
                }
                ChartCanvas {
                    canvas_id: "sectorTreemap",
                    kind: ChartKind::Treemap,
                    source: sectors,
                }
            }
        }
    }
}

#[component]
fn KpiCard(label: String, value: String) -> Element {
    rsx! {
        div { class: "kpi-card",
            span { class: "kpi-card__label", "{label}" }
            strong { class: "kpi-card__value", "{value}" }
        }
    }
}
