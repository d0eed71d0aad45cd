//! Chart core: render strategies, the per-canvas registry and the creation guard.

pub mod backend;
pub mod config;
pub mod data;
pub mod guard;
pub mod memory;
pub mod palette;
pub mod registry;
pub mod retained;
pub mod source;
pub mod strategies;
pub mod studio;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use backend::{BackendError, ChartBackend};
pub use config::{ChartOptions, ChartType, RendererConfig};
pub use data::{ChartInputData, ChartKind, NamedSeries};
pub use guard::{CreationGuard, InFlightSet};
pub use memory::MemoryBackend;
pub use registry::{ChartError, ChartHandle, ChartRegistry};
pub use source::ChartSource;
pub use strategies::{shape, Renderer, ShapeError};
pub use studio::ChartStudio;

/// Backend the app draws with on this target.
#[cfg(target_arch = "wasm32")]
pub type PlatformBackend = web::ChartJsBackend;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformBackend = MemoryBackend;

/// Studio over the platform backend, as provided through Dioxus context.
pub type Studio = ChartStudio<PlatformBackend>;

pub fn platform_studio() -> Studio {
    ChartStudio::new(PlatformBackend::new())
}
