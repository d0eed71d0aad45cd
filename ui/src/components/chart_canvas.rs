use dioxus::prelude::*;

use crate::charts::{ChartKind, ChartOptions, ChartSource, Studio};
use crate::t;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChartStatus {
    Waiting,
    Ready,
    Unavailable,
}

/// A `<canvas>` whose chart is (re)created through the dashboard's `Studio`
/// each time a new `source` generation or new `options` arrive.
///
/// Creation goes through `create_when_ready`, so the canvas is marked in
/// flight while the source is still loading. A refresh that fails to load
/// keeps the chart already drawn.
///
/// Must be rendered under a `Studio` context provider.
#[component]
pub fn ChartCanvas(
    canvas_id: String,
    kind: ChartKind,
    source: ChartSource,
    #[props(default)] options: ChartOptions,
    #[props(default = 320)] height: u32,
) -> Element {
    let studio = use_context::<Studio>();
    let mut status = use_signal(|| ChartStatus::Waiting);

    {
        let studio = studio.clone();
        use_effect(use_reactive!(|canvas_id, kind, source, options| {
            if studio.handle(&canvas_id).is_none() {
                status.set(ChartStatus::Waiting);
            }
            let studio = studio.clone();
            // Scoped to the component: unmounting drops the task and its in-flight marker.
            spawn(async move {
                let mut status = status;
                let generation = source.generation();
                let created = studio
                    .create_when_ready(&canvas_id, kind, source.load(), &options)
                    .await;
                if created.is_none() && studio.is_in_flight(&canvas_id) {
                    tracing::debug!(
                        canvas_id = %canvas_id,
                        generation,
                        "refresh overlapped an in-flight creation"
                    );
                    return;
                }
                status.set(if studio.handle(&canvas_id).is_some() {
                    ChartStatus::Ready
                } else {
                    ChartStatus::Unavailable
                });
            });
        }));
    }

    {
        let studio = studio.clone();
        let canvas_id = canvas_id.clone();
        use_drop(move || studio.destroy(&canvas_id));
    }

    let on_export = {
        let studio = studio.clone();
        let canvas_id = canvas_id.clone();
        move |_| {
            let Some(url) = studio.export_image(&canvas_id) else {
                return;
            };
            #[cfg(target_arch = "wasm32")]
            {
                if let Err(err) = crate::charts::web::download_png(&format!("{canvas_id}.png"), &url) {
                    tracing::warn!(canvas_id = %canvas_id, error = %err, "chart download failed");
                }
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                tracing::info!(canvas_id = %canvas_id, bytes = url.len(), "chart exported");
            }
        }
    };

    let ready = status() == ChartStatus::Ready;
    let canvas_style = if ready { "" } else { "visibility:hidden" };
    let placeholder = match status() {
        ChartStatus::Waiting => Some(t!("dashboard-loading")),
        ChartStatus::Unavailable => Some(t!("chart-unavailable")),
        ChartStatus::Ready => None,
    };

    rsx! {
        div {
            class: "chart-card",
            style: "height: {height}px",
            canvas { id: "{canvas_id}", style: "{canvas_style}" }
            if let Some(text) = placeholder {
                div { class: "chart-card__placeholder", role: "status", "{text}" }
            }
            if ready {
                button {
                    class: "chart-card__export",
                    r#type: "button",
                    onclick: on_export,
                    {t!("chart-export")}
                }
            }
        }
    }
}
