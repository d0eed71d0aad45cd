//! Binding to the chart library that actually draws.
//!
//! The registry only needs a handful of primitives from the library: look a
//! canvas up by id, find whatever chart is currently bound to it (including
//! ones created outside the registry), construct, destroy, and reset the
//! canvas drawing buffer. Everything is `&self`; implementations keep their
//! own interior state, which lets a library callback re-enter the registry
//! while a construction is still on the stack.

use crate::charts::config::RendererConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The library refused to bind because another chart owns the canvas.
    #[error("canvas is already in use")]
    CanvasInUse,
    #[error("2d drawing context unavailable")]
    ContextUnavailable,
    #[error("chart library error: {0}")]
    Library(String),
}

pub trait ChartBackend {
    /// A resolved canvas element.
    type Surface: Clone;
    /// A live chart instance.
    type Instance: Clone;

    fn surface(&self, canvas_id: &str) -> Option<Self::Surface>;

    /// Chart currently bound to `surface`, whoever created it.
    fn bound_instance(&self, surface: &Self::Surface) -> Option<Self::Instance>;

    fn instantiate(
        &self,
        surface: &Self::Surface,
        config: &RendererConfig,
    ) -> Result<Self::Instance, BackendError>;

    fn destroy(&self, instance: &Self::Instance) -> Result<(), BackendError>;

    /// Drop stale contexts by resetting the canvas drawing buffer.
    fn reset_surface(&self, surface: &Self::Surface);

    /// Swap the data/options of a live chart in place and redraw.
    fn update(
        &self,
        instance: &Self::Instance,
        config: &RendererConfig,
    ) -> Result<(), BackendError>;

    fn resize(&self, instance: &Self::Instance);

    /// PNG data URL of the current frame.
    fn to_image(&self, instance: &Self::Instance) -> Result<String, BackendError>;
}
