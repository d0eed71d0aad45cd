use std::future::Future;
use std::rc::Rc;

use crate::charts::backend::ChartBackend;
use crate::charts::config::ChartOptions;
use crate::charts::data::{ChartInputData, ChartKind};
use crate::charts::guard::CreationGuard;
use crate::charts::registry::{ChartHandle, ChartRegistry};

/// Chart state for one dashboard: a registry and its in-flight set.
///
/// Clones share the same state. Provided to components through Dioxus
/// context by whoever owns the dashboard.
pub struct ChartStudio<B: ChartBackend> {
    inner: Rc<CreationGuard<B>>,
}

impl<B: ChartBackend> Clone for ChartStudio<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<B: ChartBackend> PartialEq for ChartStudio<B> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<B: ChartBackend> ChartStudio<B> {
    pub fn new(backend: B) -> Self {
        Self {
            inner: Rc::new(CreationGuard::new(ChartRegistry::new(backend))),
        }
    }

    pub fn backend(&self) -> &B {
        self.inner.registry().backend()
    }

    pub fn create(
        &self,
        canvas_id: &str,
        kind: ChartKind,
        data: &ChartInputData,
        options: &ChartOptions,
    ) -> Option<ChartHandle<B::Instance>> {
        self.inner.create(canvas_id, kind, data, options)
    }

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
        self.inner
            .create_when_ready(canvas_id, kind, data, options)
            .await
    }

    pub fn destroy(&self, canvas_id: &str) {
        self.inner.registry().destroy(canvas_id);
    }

    pub fn update(&self, canvas_id: &str, data: &ChartInputData) {
        if self.inner.in_flight().contains(canvas_id) {
            tracing::debug!(canvas_id, "update skipped; creation in flight");
            return;
        }
        self.inner.registry().update(canvas_id, data);
    }

    pub fn resize_all(&self) {
        self.inner.registry().resize_all();
    }

    pub fn export_image(&self, canvas_id: &str) -> Option<String> {
        self.inner.registry().export_image(canvas_id)
    }

    pub fn handle(&self, canvas_id: &str) -> Option<ChartHandle<B::Instance>> {
        self.inner.registry().handle(canvas_id)
    }

    pub fn canvas_ids(&self) -> Vec<String> {
        self.inner.registry().canvas_ids()
    }

    pub fn is_in_flight(&self, canvas_id: &str) -> bool {
        self.inner.in_flight().contains(canvas_id)
    }

    pub fn clear(&self) {
        self.inner.registry().clear();
    }
}
