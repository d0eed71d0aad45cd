//! Chart.js through `wasm-bindgen`.
//!
//! Chart.js must already be loaded on the page as the global `Chart`.

use std::rc::Rc;
use std::sync::Once;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::charts::backend::{BackendError, ChartBackend};
use crate::charts::config::{PointTooltips, RendererConfig, TickLabels};
use crate::charts::retained::Retained;

/// Plugin id the gauge readout is configured under (`options.plugins.<id>`).
const CENTER_TEXT_PLUGIN: &str = "rncCenterText";
const CANVAS_IN_USE: &str = "Canvas is already in use";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = Chart)]
    #[derive(Debug, Clone)]
    pub type JsChart;

    #[wasm_bindgen(constructor, js_class = "Chart", catch)]
    fn new(context: &CanvasRenderingContext2d, config: &JsValue) -> Result<JsChart, JsValue>;

    #[wasm_bindgen(static_method_of = JsChart, js_class = "Chart", js_name = getChart, catch)]
    fn get_chart(canvas: &HtmlCanvasElement) -> Result<Option<JsChart>, JsValue>;

    #[wasm_bindgen(static_method_of = JsChart, js_class = "Chart", js_name = register, catch)]
    fn register(plugin: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn destroy(this: &JsChart) -> Result<(), JsValue>;

    #[wasm_bindgen(method, setter = data)]
    fn set_data(this: &JsChart, data: &JsValue);

    #[wasm_bindgen(method, setter = options)]
    fn set_options(this: &JsChart, options: &JsValue);

    #[wasm_bindgen(method, catch)]
    fn update(this: &JsChart) -> Result<(), JsValue>;

    #[wasm_bindgen(method)]
    fn resize(this: &JsChart);

    #[wasm_bindgen(method, catch, js_name = toBase64Image)]
    fn to_base64_image(this: &JsChart) -> Result<String, JsValue>;
}

type Callback = Closure<dyn Fn(JsValue) -> JsValue>;

/// Draws through the page's Chart.js.
///
/// Option callbacks (tick and tooltip text) are Rust closures; they are kept
/// per canvas and dropped when that canvas' chart is destroyed or updated.
#[derive(Debug, Clone)]
pub struct ChartJsBackend {
    callbacks: Rc<Retained<Callback>>,
}

impl ChartJsBackend {
    pub fn new() -> Self {
        register_center_text();
        Self {
            callbacks: Rc::default(),
        }
    }
}

impl Default for ChartJsBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn classify(err: JsValue) -> BackendError {
    let message = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    if message.contains(CANVAS_IN_USE) {
        BackendError::CanvasInUse
    } else {
        BackendError::Library(message)
    }
}

fn get(target: &JsValue, key: &str) -> Option<JsValue> {
    js_sys::Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn get_f64(target: &JsValue, key: &str) -> Option<f64> {
    get(target, key).and_then(|value| value.as_f64())
}

/// Set `root.a.b.c = value`, creating the intermediate objects.
fn set_path(root: &JsValue, path: &[&str], value: &JsValue) -> Result<(), JsValue> {
    let Some((last, parents)) = path.split_last() else {
        return Ok(());
    };
    let mut node = root.clone();
    for key in parents {
        node = match get(&node, key) {
            Some(child) => child,
            None => {
                let child: JsValue = js_sys::Object::new().into();
                js_sys::Reflect::set(&node, &JsValue::from_str(key), &child)?;
                child
            }
        };
    }
    js_sys::Reflect::set(&node, &JsValue::from_str(last), value)?;
    Ok(())
}

fn draw_center_text(chart: JsValue, _args: JsValue, options: JsValue) {
    let (Some(value_text), Some(ctx), Some(area)) = (
        get(&options, "valueText").and_then(|v| v.as_string()),
        get(&chart, "ctx").and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok()),
        get(&chart, "chartArea"),
    ) else {
        return;
    };
    let caption = get(&options, "caption")
        .and_then(|v| v.as_string())
        .unwrap_or_default();
    let color = get(&options, "color")
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| "#333".to_string());
    let value_size = get_f64(&options, "valueSize").unwrap_or(24.0);
    let caption_size = get_f64(&options, "captionSize").unwrap_or(14.0);

    let left = get_f64(&area, "left").unwrap_or(0.0);
    let right = get_f64(&area, "right").unwrap_or(0.0);
    let top = get_f64(&area, "top").unwrap_or(0.0);
    let bottom = get_f64(&area, "bottom").unwrap_or(0.0);
    let center_x = (left + right) / 2.0;
    let center_y = top + (bottom - top) * 0.75;

    ctx.save();
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_font(&format!("bold {value_size}px Arial"));
    ctx.set_fill_style_str(&color);
    ctx.fill_text(&value_text, center_x, center_y).ok();
    ctx.set_font(&format!("{caption_size}px Arial"));
    ctx.set_fill_style_str(crate::charts::palette::MUTED_TEXT);
    ctx.fill_text(&caption, center_x, center_y + value_size).ok();
    ctx.restore();
}

/// Register the gauge readout plugin with Chart.js, once per page.
fn register_center_text() {
    static REGISTER: Once = Once::new();
    REGISTER.call_once(|| {
        let plugin: JsValue = js_sys::Object::new().into();
        let after_draw =
            Closure::<dyn Fn(JsValue, JsValue, JsValue)>::new(draw_center_text).into_js_value();
        let registered = set_path(&plugin, &["id"], &JsValue::from_str(CENTER_TEXT_PLUGIN))
            .and_then(|()| set_path(&plugin, &["afterDraw"], &after_draw))
            .and_then(|()| JsChart::register(&plugin));
        if let Err(err) = registered {
            tracing::error!(error = ?err, "failed registering center text plugin; is Chart.js loaded?");
        }
    });
}

/// Callback answering `texts[i]`, where `i` is read from its argument.
fn text_lookup(texts: Vec<String>, index_of: fn(&JsValue) -> Option<f64>) -> Callback {
    Closure::new(move |arg: JsValue| {
        let text = index_of(&arg)
            .filter(|v| *v >= 0.0 && v.fract() == 0.0)
            .and_then(|v| texts.get(v as usize))
            .cloned()
            .unwrap_or_default();
        JsValue::from_str(&text)
    })
}

fn attach(
    options: &JsValue,
    path: &[&str],
    callback: Callback,
    kept: &mut Vec<Callback>,
) -> Result<(), JsValue> {
    set_path(options, path, callback.as_ref())?;
    kept.push(callback);
    Ok(())
}

fn attach_ticks(
    options: &JsValue,
    ticks: &TickLabels,
    kept: &mut Vec<Callback>,
) -> Result<(), JsValue> {
    for (axis, labels) in [("x", &ticks.x), ("y", &ticks.y)] {
        let callback = text_lookup(labels.clone(), |value| value.as_f64());
        attach(options, &["scales", axis, "ticks", "callback"], callback, kept)?;
    }
    Ok(())
}

fn attach_tooltips(
    options: &JsValue,
    tooltips: &PointTooltips,
    kept: &mut Vec<Callback>,
) -> Result<(), JsValue> {
    if !tooltips.titles.is_empty() {
        // `title` receives every hovered item; the first one names the cell.
        let callback = text_lookup(tooltips.titles.clone(), |items| {
            let first = js_sys::Reflect::get_u32(items, 0).ok()?;
            get_f64(&first, "dataIndex")
        });
        attach(options, &["plugins", "tooltip", "callbacks", "title"], callback, kept)?;
    }
    let callback = text_lookup(tooltips.lines.clone(), |item| get_f64(item, "dataIndex"));
    attach(options, &["plugins", "tooltip", "callbacks", "label"], callback, kept)
}

/// Full Chart.js config object, plus the callbacks it references.
fn to_js(config: &RendererConfig) -> Result<(JsValue, Vec<Callback>), BackendError> {
    let json = config
        .to_json()
        .map_err(|err| BackendError::Library(err.to_string()))?;
    let value = js_sys::JSON::parse(&json).map_err(classify)?;
    let options = get(&value, "options").ok_or_else(|| {
        BackendError::Library("renderer config without options".to_string())
    })?;

    if let Some(overlay) = &config.overlay {
        let overlay_json =
            serde_json::to_string(overlay).map_err(|err| BackendError::Library(err.to_string()))?;
        let overlay = js_sys::JSON::parse(&overlay_json).map_err(classify)?;
        set_path(&options, &["plugins", CENTER_TEXT_PLUGIN], &overlay).map_err(classify)?;
    }
    let mut callbacks = Vec::new();
    if let Some(ticks) = &config.tick_labels {
        attach_ticks(&options, ticks, &mut callbacks).map_err(classify)?;
    }
    if let Some(tooltips) = &config.tooltips {
        attach_tooltips(&options, tooltips, &mut callbacks).map_err(classify)?;
    }
    Ok((value, callbacks))
}

/// Id of the canvas a live chart draws on.
fn canvas_id_of(instance: &JsChart) -> Option<String> {
    get(instance, "canvas")
        .and_then(|canvas| canvas.dyn_into::<HtmlCanvasElement>().ok())
        .map(|canvas| canvas.id())
}

impl ChartBackend for ChartJsBackend {
    type Surface = HtmlCanvasElement;
    type Instance = JsChart;

    fn surface(&self, canvas_id: &str) -> Option<HtmlCanvasElement> {
        web_sys::window()?
            .document()?
            .get_element_by_id(canvas_id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()
    }

    fn bound_instance(&self, surface: &HtmlCanvasElement) -> Option<JsChart> {
        JsChart::get_chart(surface).ok().flatten()
    }

    fn instantiate(
        &self,
        surface: &HtmlCanvasElement,
        config: &RendererConfig,
    ) -> Result<JsChart, BackendError> {
        let context = surface
            .get_context("2d")
            .map_err(|_| BackendError::ContextUnavailable)?
            .ok_or(BackendError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| BackendError::ContextUnavailable)?;
        let (config, callbacks) = to_js(config)?;
        let chart = JsChart::new(&context, &config).map_err(classify)?;
        self.callbacks.keep(surface.id(), callbacks);
        Ok(chart)
    }

    fn destroy(&self, instance: &JsChart) -> Result<(), BackendError> {
        let canvas_id = canvas_id_of(instance);
        instance.destroy().map_err(classify)?;
        if let Some(canvas_id) = canvas_id {
            self.callbacks.release(&canvas_id);
        }
        Ok(())
    }

    fn reset_surface(&self, surface: &HtmlCanvasElement) {
        surface.set_width(surface.width());
    }

    fn update(&self, instance: &JsChart, config: &RendererConfig) -> Result<(), BackendError> {
        let (config, callbacks) = to_js(config)?;
        let data = get(&config, "data").unwrap_or_else(|| js_sys::Object::new().into());
        let options = get(&config, "options").unwrap_or_else(|| js_sys::Object::new().into());
        instance.set_data(&data);
        instance.set_options(&options);
        let result = instance.update().map_err(classify);
        // Callbacks of the replaced options are dropped only after the redraw.
        if let Some(canvas_id) = canvas_id_of(instance) {
            self.callbacks.keep(canvas_id, callbacks);
        }
        result
    }

    fn resize(&self, instance: &JsChart) {
        instance.resize();
    }

    fn to_image(&self, instance: &JsChart) -> Result<String, BackendError> {
        instance.to_base64_image().map_err(classify)
    }
}

/// Save a PNG data URL as `filename` through a temporary anchor.
pub fn download_png(filename: &str, data_url: &str) -> Result<(), String> {
    use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

    let encoded = data_url
        .split_once(',')
        .map(|(_, payload)| payload)
        .ok_or("Malformed data URL")?;
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|_| "PNG decode failed".to_string())?;

    let array = js_sys::Uint8Array::from(bytes.as_slice());
    let parts = js_sys::Array::new();
    parts.push(&array.buffer());

    let opts = BlobPropertyBag::new();
    opts.set_type("image/png");
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
        .map_err(|_| "Failed to create blob".to_string())?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|_| "Unable to create download".to_string())?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("Document unavailable")?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|_| "Unable to create anchor")?
        .dyn_into()
        .map_err(|_| "Anchor cast failed")?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.style().set_property("display", "none").ok();

    document
        .body()
        .ok_or("Missing body")?
        .append_child(&anchor)
        .ok();
    anchor.click();
    anchor.remove();
    Url::revoke_object_url(&url).ok();
    Ok(())
}
