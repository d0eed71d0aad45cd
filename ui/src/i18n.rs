//! Internationalization (i18n) support for `rncboard-ui`.
//!
//! This module wires together:
//! - `i18n-embed` (language selection + asset loading)
//! - `fluent` (message formatting)
//! - `rust-embed` (compile-time embedding of `.ftl` files)
//! - `i18n-embed-fl` (`fl!` macro for compile‑time checked lookups)
//!
//! Folder layout (relative to this crate root):
//! ```text
//! i18n.toml
//! i18n/
//!   pt-BR/rncboard_ui.ftl   (fallback/reference)
//!   en-US/rncboard_ui.ftl   (additional locale)
//! ```
//!
//! Chart strategies pull their default titles and axis names from here, so a
//! dashboard rendered after `set_language("en-US")` gets English chart text
//! without the caller passing any option.
//!
//! Public API surface:
//! - `init()` – select the requested languages (safe to call multiple times).
//! - `set_language(tag: &str)` – switch language at runtime.
//! - `available_languages()` – discover embedded language tags (for a picker).
//! - `weekday_label(index)` – localized short weekday names, Sunday first.
//! - `LOADER` – global `FluentLanguageLoader` consumed by `t!`.
use std::sync::Once;

use i18n_embed::fluent::FluentLanguageLoader;
use i18n_embed::LanguageLoader;
use once_cell::sync::Lazy;
use rust_embed::Embed;
use unic_langid::LanguageIdentifier;

pub use i18n_embed_fl::fl; // Re-export for convenience.

/// Ergonomic translation macro.
/// Examples:
///     t!("chart-unavailable")
///     t!("heatmap-tooltip-count", count = 3)
#[macro_export]
macro_rules! t {
    ($key:literal) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key)
    };
    ($key:literal, $( $arg:ident = $value:expr ),+ $(,)?) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key, $( $arg = $value ),+ )
    };
}

/// Fluent domain; the fallback file lives at `i18n/pt-BR/{DOMAIN}.ftl`.
const DOMAIN: &str = "rncboard_ui";

/// Tag of the fallback (reference) locale.
pub const FALLBACK_LANGUAGE: &str = "pt-BR";

#[derive(Embed)]
#[folder = "i18n"]
struct Localizations;

/// Global language loader used with the `fl!` macro. The fallback bundle is
/// loaded eagerly so lookups made before `init()` still resolve.
pub static LOADER: Lazy<FluentLanguageLoader> = Lazy::new(|| {
    let fallback: LanguageIdentifier = FALLBACK_LANGUAGE
        .parse()
        .expect("valid fallback language identifier");
    let loader = FluentLanguageLoader::new(DOMAIN, fallback);
    if let Err(err) = loader.load_fallback_language(&Localizations) {
        tracing::error!(%err, "failed loading fallback localization");
    }
    loader
});

static INIT: Once = Once::new();

/// Initialize i18n (idempotent).
pub fn init() {
    INIT.call_once(|| {
        let requested = requested_languages();
        if let Err(err) = i18n_embed::select(&*LOADER, &Localizations, &requested) {
            tracing::warn!(%err, "failed selecting languages; continuing with fallback");
        }
    });
}

/// Switch language at runtime. If `tag` cannot be parsed it is ignored (Ok returned).
pub fn set_language(tag: &str) -> Result<(), i18n_embed::I18nEmbedError> {
    let lang: LanguageIdentifier = match tag.parse() {
        Ok(l) => l,
        Err(_) => return Ok(()),
    };
    i18n_embed::select(&*LOADER, &Localizations, &[lang]).map(|_| ())
}

/// List available (embedded) language identifiers.
pub fn available_languages() -> Vec<String> {
    let mut langs = Localizations::iter()
        .filter_map(|path| path.split('/').next().map(|s| s.to_string()))
        .collect::<Vec<_>>();
    langs.sort();
    langs.dedup();
    langs
}

/// Short weekday label, `0` = Sunday.
pub fn weekday_label(index: usize) -> String {
    match index % 7 {
        0 => t!("weekday-sun"),
        1 => t!("weekday-mon"),
        2 => t!("weekday-tue"),
        3 => t!("weekday-wed"),
        4 => t!("weekday-thu"),
        5 => t!("weekday-fri"),
        _ => t!("weekday-sat"),
    }
}

#[cfg(target_arch = "wasm32")]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::WebLanguageRequester::requested_languages()
}

#[cfg(not(target_arch = "wasm32"))]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::DesktopLanguageRequester::requested_languages()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_language_is_present() {
        let langs = available_languages();
        assert!(langs.iter().any(|l| l == FALLBACK_LANGUAGE));
        assert!(langs.iter().any(|l| l == "en-US"));
    }

    #[test]
    fn domain_matches_the_fl_macro_lookup() {
        // `fl!` resolves `<lang>/<crate_name>.ftl` from the underscored package name.
        assert_eq!(DOMAIN, env!("CARGO_PKG_NAME").replace('-', "_"));
        for lang in available_languages() {
            let path = format!("{lang}/{DOMAIN}.ftl");
            assert!(Localizations::get(&path).is_some(), "missing {path}");
        }
    }

    #[test]
    fn lookups_resolve_before_init() {
        let s = t!("chart-unavailable");
        assert!(!s.is_empty());
        assert!(!s.contains("chart-unavailable"));
    }

    #[test]
    fn weekday_labels_wrap_around() {
        assert_eq!(weekday_label(0), weekday_label(7));
        assert_ne!(weekday_label(0), weekday_label(1));
    }

    #[test]
    fn invalid_tag_is_ignored() {
        assert!(set_language("not a language tag!").is_ok());
    }
}
