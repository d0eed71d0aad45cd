//! In-process chart backend.
//!
//! Models the parts of Chart.js the registry depends on: one chart bound per
//! canvas, construction failing with `CanvasInUse` while a canvas is bound, a
//! global lookup of the bound chart, and a canvas reset that leaves bindings
//! alone. Used by non-wasm builds and by the lifecycle tests, which can also
//! script failures and hook into construction to simulate re-entrant callers.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::charts::backend::{BackendError, ChartBackend};
use crate::charts::config::RendererConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryChart {
    pub canvas_id: String,
    pub config: RendererConfig,
    pub updates: usize,
    pub resizes: usize,
}

#[derive(Debug, Default)]
struct CanvasSlot {
    bound: Option<ChartId>,
    resets: usize,
}

#[derive(Debug, Default)]
struct MemoryState {
    canvases: HashMap<String, CanvasSlot>,
    charts: HashMap<ChartId, MemoryChart>,
    next_id: u64,
    instantiations: usize,
    scripted: VecDeque<BackendError>,
}

impl MemoryState {
    fn bind(&mut self, canvas_id: &str, config: RendererConfig) -> ChartId {
        self.next_id += 1;
        let id = ChartId(self.next_id);
        self.charts.insert(
            id,
            MemoryChart {
                canvas_id: canvas_id.to_string(),
                config,
                updates: 0,
                resizes: 0,
            },
        );
        self.canvases.entry(canvas_id.to_string()).or_default().bound = Some(id);
        id
    }
}

type Hook = Rc<dyn Fn(&str)>;

/// Cheap to clone; clones share the same canvases and charts.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Rc<RefCell<MemoryState>>,
    hook: Rc<RefCell<Option<Hook>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend with the given canvases already present.
    pub fn with_canvases<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let backend = Self::new();
        for id in ids {
            backend.add_canvas(id);
        }
        backend
    }

    pub fn add_canvas(&self, canvas_id: &str) {
        self.state
            .borrow_mut()
            .canvases
            .entry(canvas_id.to_string())
            .or_default();
    }

    /// Bind a chart to `canvas_id` behind the registry's back.
    pub fn bind_foreign(&self, canvas_id: &str, config: RendererConfig) -> ChartId {
        self.state.borrow_mut().bind(canvas_id, config)
    }

    /// Make the next construction attempt fail with `error`.
    pub fn fail_next(&self, error: BackendError) {
        self.state.borrow_mut().scripted.push_back(error);
    }

    /// Run `hook` with the canvas id at the start of every construction.
    pub fn on_instantiate(&self, hook: impl Fn(&str) + 'static) {
        *self.hook.borrow_mut() = Some(Rc::new(hook));
    }

    /// Successful constructions so far, foreign bindings excluded.
    pub fn instantiations(&self) -> usize {
        self.state.borrow().instantiations
    }

    /// Live charts drawing on `canvas_id`.
    pub fn live_on(&self, canvas_id: &str) -> usize {
        self.state
            .borrow()
            .charts
            .values()
            .filter(|chart| chart.canvas_id == canvas_id)
            .count()
    }

    pub fn live_total(&self) -> usize {
        self.state.borrow().charts.len()
    }

    pub fn bound(&self, canvas_id: &str) -> Option<ChartId> {
        self.state
            .borrow()
            .canvases
            .get(canvas_id)
            .and_then(|slot| slot.bound)
    }

    pub fn chart(&self, id: ChartId) -> Option<MemoryChart> {
        self.state.borrow().charts.get(&id).cloned()
    }

    pub fn resets(&self, canvas_id: &str) -> usize {
        self.state
            .borrow()
            .canvases
            .get(canvas_id)
            .map_or(0, |slot| slot.resets)
    }
}

impl ChartBackend for MemoryBackend {
    type Surface = String;
    type Instance = ChartId;

    fn surface(&self, canvas_id: &str) -> Option<String> {
        self.state
            .borrow()
            .canvases
            .contains_key(canvas_id)
            .then(|| canvas_id.to_string())
    }

    fn bound_instance(&self, surface: &String) -> Option<ChartId> {
        self.bound(surface)
    }

    fn instantiate(
        &self,
        surface: &String,
        config: &RendererConfig,
    ) -> Result<ChartId, BackendError> {
        let hook = self.hook.borrow().clone();
        if let Some(hook) = hook {
            hook(surface);
        }

        let mut state = self.state.borrow_mut();
        if let Some(error) = state.scripted.pop_front() {
            return Err(error);
        }
        let already_bound = state
            .canvases
            .get(surface.as_str())
            .is_some_and(|slot| slot.bound.is_some());
        if already_bound {
            return Err(BackendError::CanvasInUse);
        }
        state.instantiations += 1;
        Ok(state.bind(surface, config.clone()))
    }

    fn destroy(&self, instance: &ChartId) -> Result<(), BackendError> {
        let mut state = self.state.borrow_mut();
        let chart = state
            .charts
            .remove(instance)
            .ok_or_else(|| BackendError::Library(format!("chart {} already destroyed", instance.0)))?;
        if let Some(slot) = state.canvases.get_mut(&chart.canvas_id) {
            if slot.bound == Some(*instance) {
                slot.bound = None;
            }
        }
        Ok(())
    }

    fn reset_surface(&self, surface: &String) {
        if let Some(slot) = self.state.borrow_mut().canvases.get_mut(surface.as_str()) {
            slot.resets += 1;
        }
    }

    fn update(&self, instance: &ChartId, config: &RendererConfig) -> Result<(), BackendError> {
        let mut state = self.state.borrow_mut();
        let chart = state
            .charts
            .get_mut(instance)
            .ok_or_else(|| BackendError::Library(format!("chart {} is not live", instance.0)))?;
        chart.config = config.clone();
        chart.updates += 1;
        Ok(())
    }

    fn resize(&self, instance: &ChartId) {
        if let Some(chart) = self.state.borrow_mut().charts.get_mut(instance) {
            chart.resizes += 1;
        }
    }

    /// There is no raster here; the exported frame is the serialized config.
    fn to_image(&self, instance: &ChartId) -> Result<String, BackendError> {
        let state = self.state.borrow();
        let chart = state
            .charts
            .get(instance)
            .ok_or_else(|| BackendError::Library(format!("chart {} is not live", instance.0)))?;
        let json = chart
            .config
            .to_json()
            .map_err(|err| BackendError::Library(err.to_string()))?;
        Ok(format!(
            "data:application/json;base64,{}",
            STANDARD.encode(json)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::config::{ChartData, ChartType};
    use serde_json::json;

    fn config() -> RendererConfig {
        RendererConfig::new(ChartType::Bar, ChartData::default(), json!({}))
    }

    #[test]
    fn second_construction_on_bound_canvas_conflicts() {
        let backend = MemoryBackend::with_canvases(["a"]);
        let surface = backend.surface("a").unwrap();
        let first = backend.instantiate(&surface, &config()).unwrap();
        assert_eq!(
            backend.instantiate(&surface, &config()),
            Err(BackendError::CanvasInUse)
        );
        backend.destroy(&first).unwrap();
        assert!(backend.instantiate(&surface, &config()).is_ok());
        assert_eq!(backend.instantiations(), 2);
    }

    #[test]
    fn reset_keeps_binding() {
        let backend = MemoryBackend::with_canvases(["a"]);
        let id = backend.bind_foreign("a", config());
        backend.reset_surface(&"a".to_string());
        assert_eq!(backend.bound("a"), Some(id));
        assert_eq!(backend.resets("a"), 1);
        assert_eq!(backend.instantiations(), 0);
    }

    #[test]
    fn unknown_canvas_has_no_surface() {
        let backend = MemoryBackend::new();
        assert!(backend.surface("missing").is_none());
    }
}
