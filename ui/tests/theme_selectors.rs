/*!
Stylesheet selector lint.

Purpose:
- Ensure that the CSS classes the dashboard components emit stay present in the
  shared stylesheets (`assets/theme/main.css` plus the per-component sheets under
  `assets/styling/`).
- Fail fast if a refactor drops or renames a class, preventing a silent styling
  regression such as a chart placeholder that is no longer centred over its canvas.

A substring presence check is enough here; if you rename a selector, update the
component markup and REQUIRED_SELECTORS together.
*/

const THEME_CSS: &str = include_str!("../assets/theme/main.css");
const NAVBAR_CSS: &str = include_str!("../assets/styling/navbar.css");
const DASHBOARD_CSS: &str = include_str!("../assets/styling/dashboard.css");

const REQUIRED_SELECTORS: &[(&str, &str)] = &[
    // Global / layout
    ("theme", ":root"),
    ("theme", "body {"),
    ("theme", ".page {"),
    ("theme", ".visually-hidden"),
    // Header
    ("navbar", ".navbar {"),
    ("navbar", ".navbar__inner"),
    ("navbar", ".navbar__brand-mark"),
    ("navbar", ".navbar__locale"),
    // Dashboard
    ("dashboard", ".dashboard__error"),
    ("dashboard", ".dashboard__refresh"),
    ("dashboard", ".dashboard__kpis"),
    ("dashboard", ".kpi-card__value"),
    ("dashboard", ".dashboard__grid"),
    // Chart card
    ("dashboard", ".chart-card {"),
    ("dashboard", ".chart-card__placeholder"),
    ("dashboard", ".chart-card__export"),
];

fn sheet(name: &str) -> &'static str {
    match name {
        "theme" => THEME_CSS,
        "navbar" => NAVBAR_CSS,
        "dashboard" => DASHBOARD_CSS,
        other => panic!("unknown stylesheet {other}"),
    }
}

#[test]
fn required_selectors_are_present() {
    let missing: Vec<String> = REQUIRED_SELECTORS
        .iter()
        .filter(|(name, selector)| !sheet(name).contains(selector))
        .map(|(name, selector)| format!("{name}: {selector}"))
        .collect();

    assert!(
        missing.is_empty(),
        "Missing selectors:\n  {}",
        missing.join("\n  ")
    );
}

#[test]
fn chart_placeholder_overlays_the_canvas() {
    assert!(DASHBOARD_CSS.contains("position: relative"));
    assert!(DASHBOARD_CSS.contains("inset: 0"));
}
