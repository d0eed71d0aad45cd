//! Shared UI crate for the RNC dashboard: the chart core, the indicators
//! loader and the Dioxus views that host them.

pub mod charts;
pub mod core;
pub mod dashboard;
pub mod i18n;
pub mod views;

pub mod components {
    // Canvas + placeholder around one registry-managed chart (components/chart_canvas.rs)
    mod chart_canvas;
    pub use chart_canvas::ChartCanvas;

    // Localized header with the language switcher (components/app_navbar.rs)
    pub mod app_navbar;
    pub use app_navbar::AppNavbar;
}
