//! One chart instance per canvas: create / update / destroy.
//!
//! Invariant: after any registry call returns, at most one live library
//! instance is bound to a canvas id. `create` always tears down first. That covers
//! the instance the registry tracks and anything else the library reports as
//! bound to the canvas. A `CanvasInUse` refusal is answered with exactly
//! one destroy + canvas reset + retry.
//!
//! The id→instance map is never borrowed across a backend call, so library
//! callbacks may call back into the registry mid-construction.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::charts::backend::{BackendError, ChartBackend};
use crate::charts::config::{ChartOptions, ChartType, RendererConfig};
use crate::charts::data::{ChartInputData, ChartKind};
use crate::charts::strategies::{Renderer, ShapeError};

/// A chart the registry created and still tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartHandle<I> {
    pub canvas_id: String,
    pub chart_type: ChartType,
    pub renderer: Renderer,
    pub instance: I,
}

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("canvas '{0}' not found")]
    CanvasNotFound(String),
    #[error("canvas '{canvas_id}' still in use after retry")]
    Conflict {
        canvas_id: String,
        #[source]
        source: BackendError,
    },
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

struct Tracked<I> {
    handle: ChartHandle<I>,
    kind: ChartKind,
    options: ChartOptions,
}

pub struct ChartRegistry<B: ChartBackend> {
    backend: B,
    charts: RefCell<HashMap<String, Tracked<B::Instance>>>,
}

impl<B: ChartBackend> ChartRegistry<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            charts: RefCell::new(HashMap::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Draw `data` on `canvas_id`, replacing whatever was there.
    ///
    /// Failures are logged and reported as `None`; the caller shows its
    /// "chart unavailable" placeholder.
    pub fn create(
        &self,
        canvas_id: &str,
        kind: ChartKind,
        data: &ChartInputData,
        options: &ChartOptions,
    ) -> Option<ChartHandle<B::Instance>> {
        match self.try_create(canvas_id, kind, data, options) {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::error!(canvas_id, %kind, error = %err, "chart creation failed");
                None
            }
        }
    }

    pub fn try_create(
        &self,
        canvas_id: &str,
        kind: ChartKind,
        data: &ChartInputData,
        options: &ChartOptions,
    ) -> Result<ChartHandle<B::Instance>, ChartError> {
        let _span = tracing::debug_span!("chart_create", canvas_id, %kind).entered();

        self.destroy(canvas_id);

        let surface = self
            .backend
            .surface(canvas_id)
            .ok_or_else(|| ChartError::CanvasNotFound(canvas_id.to_string()))?;
        // A library callback run by `destroy` may have bound something again.
        self.release_bound(canvas_id, &surface);

        let renderer = Renderer::select(kind, data);
        let config = renderer.render(data, options)?;
        let instance = self.instantiate(canvas_id, &surface, &config)?;

        let handle = ChartHandle {
            canvas_id: canvas_id.to_string(),
            chart_type: config.chart_type,
            renderer,
            instance,
        };
        self.charts.borrow_mut().insert(
            canvas_id.to_string(),
            Tracked {
                handle: handle.clone(),
                kind,
                options: options.clone(),
            },
        );
        Ok(handle)
    }

    /// Construction with the single conflict retry. Every attempt is logged here
    /// rather than by wrapping the library constructor.
    fn instantiate(
        &self,
        canvas_id: &str,
        surface: &B::Surface,
        config: &RendererConfig,
    ) -> Result<B::Instance, ChartError> {
        tracing::info!(
            canvas_id,
            chart_type = %config.chart_type,
            attempt = 1,
            "creating chart"
        );
        match self.backend.instantiate(surface, config) {
            Ok(instance) => Ok(instance),
            Err(BackendError::CanvasInUse) => {
                tracing::warn!(canvas_id, "canvas already in use; destroying and retrying once");
                self.release_bound(canvas_id, surface);
                self.backend.reset_surface(surface);
                tracing::info!(
                    canvas_id,
                    chart_type = %config.chart_type,
                    attempt = 2,
                    "creating chart"
                );
                self.backend
                    .instantiate(surface, config)
                    .map_err(|source| ChartError::Conflict {
                        canvas_id: canvas_id.to_string(),
                        source,
                    })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Destroy whatever the library has bound to `surface`, tracked or not.
    fn release_bound(&self, canvas_id: &str, surface: &B::Surface) {
        if let Some(bound) = self.backend.bound_instance(surface) {
            if let Err(err) = self.backend.destroy(&bound) {
                tracing::warn!(canvas_id, error = %err, "failed destroying bound chart");
            }
        }
    }

    /// Idempotent: a canvas with nothing on it is left alone.
    pub fn destroy(&self, canvas_id: &str) {
        let tracked = self.charts.borrow_mut().remove(canvas_id);
        if let Some(tracked) = tracked {
            if let Err(err) = self.backend.destroy(&tracked.handle.instance) {
                tracing::warn!(canvas_id, error = %err, "failed destroying tracked chart");
            }
        }
        if let Some(surface) = self.backend.surface(canvas_id) {
            self.release_bound(canvas_id, &surface);
        }
    }

    /// Re-shape `data` with the kind and options the chart was created with.
    ///
    /// Redraws in place when the chart type is unchanged; otherwise (a radar
    /// crossing the three-label threshold, for instance) the chart is
    /// re-created. Untracked ids are ignored.
    pub fn update(&self, canvas_id: &str, data: &ChartInputData) {
        let tracked = self
            .charts
            .borrow()
            .get(canvas_id)
            .map(|t| (t.handle.clone(), t.kind, t.options.clone()));
        let Some((handle, kind, options)) = tracked else {
            tracing::debug!(canvas_id, "update ignored; no chart tracked");
            return;
        };

        let renderer = Renderer::select(kind, data);
        let config = match renderer.render(data, &options) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(canvas_id, error = %err, "update skipped");
                return;
            }
        };

        if config.chart_type != handle.chart_type {
            tracing::info!(
                canvas_id,
                from = %handle.chart_type,
                to = %config.chart_type,
                "chart type changed; re-creating"
            );
            self.create(canvas_id, kind, data, &options);
            return;
        }

        match self.backend.update(&handle.instance, &config) {
            Ok(()) => {
                if let Some(tracked) = self.charts.borrow_mut().get_mut(canvas_id) {
                    tracked.handle.renderer = renderer;
                }
            }
            Err(err) => tracing::warn!(canvas_id, error = %err, "chart update failed"),
        }
    }

    pub fn handle(&self, canvas_id: &str) -> Option<ChartHandle<B::Instance>> {
        self.charts
            .borrow()
            .get(canvas_id)
            .map(|tracked| tracked.handle.clone())
    }

    /// Tracked canvas ids, sorted.
    pub fn canvas_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.charts.borrow().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn resize_all(&self) {
        let instances: Vec<B::Instance> = self
            .charts
            .borrow()
            .values()
            .map(|tracked| tracked.handle.instance.clone())
            .collect();
        for instance in &instances {
            self.backend.resize(instance);
        }
    }

    /// Image data URL of a tracked chart.
    pub fn export_image(&self, canvas_id: &str) -> Option<String> {
        let handle = self.handle(canvas_id)?;
        match self.backend.to_image(&handle.instance) {
            Ok(url) => Some(url),
            Err(err) => {
                tracing::warn!(canvas_id, error = %err, "chart export failed");
                None
            }
        }
    }

    /// Destroy every tracked chart.
    pub fn clear(&self) {
        for canvas_id in self.canvas_ids() {
            self.destroy(&canvas_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::config::ChartData;
    use crate::charts::data::NamedSeries;
    use crate::charts::memory::MemoryBackend;
    use serde_json::json;

    fn monthly() -> ChartInputData {
        ChartInputData::series("RNCs", ["Jan", "Fev", "Mar"], vec![5.0, 12.0, 8.0])
    }

    fn registry(ids: &[&str]) -> (ChartRegistry<MemoryBackend>, MemoryBackend) {
        let backend = MemoryBackend::with_canvases(ids.iter().copied());
        (ChartRegistry::new(backend.clone()), backend)
    }

    #[test]
    fn create_tracks_one_instance() {
        let (registry, backend) = registry(&["trend"]);
        let handle = registry
            .create("trend", ChartKind::TimeComparison, &monthly(), &ChartOptions::default())
            .unwrap();
        assert_eq!(handle.chart_type, ChartType::Line);
        assert_eq!(handle.renderer, Renderer::Timeline);
        assert_eq!(backend.bound("trend"), Some(handle.instance));
        assert_eq!(registry.canvas_ids(), vec!["trend"]);
    }

    #[test]
    fn recreate_replaces_previous_instance() {
        let (registry, backend) = registry(&["trend"]);
        for _ in 0..3 {
            registry.create("trend", ChartKind::TimeComparison, &monthly(), &ChartOptions::default());
            assert_eq!(backend.live_on("trend"), 1);
        }
        assert_eq!(backend.instantiations(), 3);
    }

    #[test]
    fn foreign_chart_is_destroyed_before_create() {
        let (registry, backend) = registry(&["trend"]);
        let foreign = backend.bind_foreign(
            "trend",
            RendererConfig::new(ChartType::Bar, ChartData::default(), json!({})),
        );
        let handle = registry
            .create("trend", ChartKind::TimeComparison, &monthly(), &ChartOptions::default())
            .unwrap();
        assert!(backend.chart(foreign).is_none());
        assert_eq!(backend.bound("trend"), Some(handle.instance));
        assert_eq!(backend.live_on("trend"), 1);
    }

    #[test]
    fn missing_canvas_is_reported() {
        let (registry, backend) = registry(&[]);
        let err = registry
            .try_create("ghost", ChartKind::TimeComparison, &monthly(), &ChartOptions::default())
            .unwrap_err();
        assert!(matches!(err, ChartError::CanvasNotFound(ref id) if id == "ghost"));
        assert_eq!(backend.instantiations(), 0);
    }

    #[test]
    fn conflict_is_retried_once_after_reset() {
        let (registry, backend) = registry(&["gauge"]);
        backend.fail_next(BackendError::CanvasInUse);
        let handle = registry.create(
            "gauge",
            ChartKind::Gauge,
            &ChartInputData::gauge(72.0, 0.0, 100.0),
            &ChartOptions::default(),
        );
        assert!(handle.is_some());
        assert_eq!(backend.resets("gauge"), 1);
        assert_eq!(backend.live_on("gauge"), 1);
    }

    #[test]
    fn second_conflict_gives_up() {
        let (registry, backend) = registry(&["gauge"]);
        backend.fail_next(BackendError::CanvasInUse);
        backend.fail_next(BackendError::CanvasInUse);
        let err = registry
            .try_create(
                "gauge",
                ChartKind::Gauge,
                &ChartInputData::gauge(72.0, 0.0, 100.0),
                &ChartOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, ChartError::Conflict { .. }));
        assert!(registry.handle("gauge").is_none());
        assert_eq!(backend.live_on("gauge"), 0);
    }

    #[test]
    fn other_backend_errors_are_not_retried() {
        let (registry, backend) = registry(&["gauge"]);
        backend.fail_next(BackendError::ContextUnavailable);
        let err = registry
            .try_create(
                "gauge",
                ChartKind::Gauge,
                &ChartInputData::gauge(1.0, 0.0, 2.0),
                &ChartOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, ChartError::Backend(BackendError::ContextUnavailable)));
        assert_eq!(backend.resets("gauge"), 0);
    }

    #[test]
    fn shape_mismatch_leaves_canvas_empty() {
        let (registry, backend) = registry(&["heat"]);
        assert!(registry
            .create("heat", ChartKind::Heatmap, &monthly(), &ChartOptions::default())
            .is_none());
        assert_eq!(backend.live_on("heat"), 0);
    }

    #[test]
    fn destroy_is_idempotent() {
        let (registry, backend) = registry(&["trend"]);
        registry.create("trend", ChartKind::TimeComparison, &monthly(), &ChartOptions::default());
        registry.destroy("trend");
        registry.destroy("trend");
        registry.destroy("never-created");
        assert_eq!(backend.live_on("trend"), 0);
        assert!(registry.handle("trend").is_none());
    }

    #[test]
    fn update_redraws_in_place() {
        let (registry, backend) = registry(&["trend"]);
        let handle = registry
            .create("trend", ChartKind::TimeComparison, &monthly(), &ChartOptions::default())
            .unwrap();
        registry.update(
            "trend",
            &ChartInputData::series("RNCs", ["Abr"], vec![3.0]),
        );
        let chart = backend.chart(handle.instance).unwrap();
        assert_eq!(chart.updates, 1);
        assert_eq!(chart.config.data.labels, vec!["Abr"]);
        assert_eq!(backend.instantiations(), 1);
    }

    #[test]
    fn update_recreates_when_radar_falls_back() {
        let (registry, backend) = registry(&["depts"]);
        let three = ChartInputData::MultiAxis {
            labels: vec!["A".into(), "B".into(), "C".into()],
            datasets: vec![NamedSeries::new("Meta", vec![1.0, 2.0, 3.0])],
        };
        let two = ChartInputData::MultiAxis {
            labels: vec!["A".into(), "B".into()],
            datasets: vec![NamedSeries::new("Meta", vec![1.0, 2.0])],
        };
        registry.create("depts", ChartKind::Radar, &three, &ChartOptions::default());
        registry.update("depts", &two);

        let handle = registry.handle("depts").unwrap();
        assert_eq!(handle.renderer, Renderer::GroupedBar);
        assert_eq!(handle.chart_type, ChartType::Bar);
        assert_eq!(backend.instantiations(), 2);
        assert_eq!(backend.live_on("depts"), 1);
    }

    #[test]
    fn update_of_untracked_canvas_is_ignored() {
        let (registry, backend) = registry(&["trend"]);
        registry.update("trend", &monthly());
        assert_eq!(backend.live_total(), 0);
    }

    #[test]
    fn resize_export_and_clear() {
        let (registry, backend) = registry(&["a", "b"]);
        let a = registry
            .create("a", ChartKind::TimeComparison, &monthly(), &ChartOptions::default())
            .unwrap();
        registry.create(
            "b",
            ChartKind::Gauge,
            &ChartInputData::gauge(1.0, 0.0, 2.0),
            &ChartOptions::default(),
        );
        registry.resize_all();
        assert_eq!(backend.chart(a.instance).unwrap().resizes, 1);

        let url = registry.export_image("a").unwrap();
        assert!(url.starts_with("data:"));
        assert!(registry.export_image("missing").is_none());

        registry.clear();
        assert!(registry.canvas_ids().is_empty());
        assert_eq!(backend.live_total(), 0);
    }
}
