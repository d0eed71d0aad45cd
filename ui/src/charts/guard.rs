//! Overlap protection for chart creation.
//!
//! A dashboard refresh awaits its data before drawing, and a resize or a
//! second refresh can ask for the same canvas meanwhile. The guard marks a
//! canvas id in flight for the whole request; any other request for that id
//! gets the current handle back instead of starting a second creation.

use std::cell::RefCell;
use std::collections::HashSet;
use std::future::Future;

use crate::charts::backend::ChartBackend;
use crate::charts::config::ChartOptions;
use crate::charts::data::{ChartInputData, ChartKind};
use crate::charts::registry::{ChartHandle, ChartRegistry};

/// Canvas ids with a creation underway.
#[derive(Debug, Default)]
pub struct InFlightSet {
    ids: RefCell<HashSet<String>>,
}

impl InFlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `canvas_id`, or `None` if it is already marked. The mark lasts as
    /// long as the returned ticket.
    pub fn begin(&self, canvas_id: &str) -> Option<InFlightTicket<'_>> {
        if !self.ids.borrow_mut().insert(canvas_id.to_string()) {
            return None;
        }
        Some(InFlightTicket {
            set: self,
            canvas_id: canvas_id.to_string(),
        })
    }

    pub fn contains(&self, canvas_id: &str) -> bool {
        self.ids.borrow().contains(canvas_id)
    }

    pub fn len(&self) -> usize {
        self.ids.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.borrow().is_empty()
    }
}

/// Clears its canvas id from the set when dropped: on return, on error, on
/// unwind, and when a pending future holding it is dropped.
#[derive(Debug)]
pub struct InFlightTicket<'a> {
    set: &'a InFlightSet,
    canvas_id: String,
}

impl InFlightTicket<'_> {
    pub fn canvas_id(&self) -> &str {
        &self.canvas_id
    }
}

impl Drop for InFlightTicket<'_> {
    fn drop(&mut self) {
        self.set.ids.borrow_mut().remove(&self.canvas_id);
    }
}

pub struct CreationGuard<B: ChartBackend> {
    registry: ChartRegistry<B>,
    in_flight: InFlightSet,
}

impl<B: ChartBackend> CreationGuard<B> {
    pub fn new(registry: ChartRegistry<B>) -> Self {
        Self {
            registry,
            in_flight: InFlightSet::new(),
        }
    }

    pub fn registry(&self) -> &ChartRegistry<B> {
        &self.registry
    }

    pub fn in_flight(&self) -> &InFlightSet {
        &self.in_flight
    }

    /// `ChartRegistry::create`, unless a creation for `canvas_id` is already
    /// running; then the handle currently tracked (possibly stale, possibly
    /// none) is returned and nothing is created.
    pub fn create(
        &self,
        canvas_id: &str,
        kind: ChartKind,
        data: &ChartInputData,
        options: &ChartOptions,
    ) -> Option<ChartHandle<B::Instance>> {
        let Some(_ticket) = self.in_flight.begin(canvas_id) else {
            tracing::debug!(canvas_id, "creation already in flight; skipping");
            return self.registry.handle(canvas_id);
        };
        self.registry.create(canvas_id, kind, data, options)
    }

    /// Mark `canvas_id` in flight, await `data`, then create.
    ///
    /// A loader yielding `None` leaves any chart already on the canvas in
    /// place and returns `None`.
    pub async fn create_when_ready<F>(
        &self,
        canvas_id: &str,
        kind: ChartKind,
        data: F,
        options: &ChartOptions,
    ) -> Option<ChartHandle<B::Instance>>
    where
        F: Future<Output = Option<ChartInputData>>,
    {
        let Some(_ticket) = self.in_flight.begin(canvas_id) else {
            tracing::debug!(canvas_id, "creation already in flight; skipping");
            return self.registry.handle(canvas_id);
        };
        let Some(data) = data.await else {
            tracing::warn!(canvas_id, %kind, "chart data unavailable");
            return None;
        };
        self.registry.create(canvas_id, kind, &data, options)
    }
}
