//! Platform glue: window events.

/// Calls a callback on every window resize until dropped.
pub struct ResizeListener {
    #[cfg(target_arch = "wasm32")]
    callback: wasm_bindgen::closure::Closure<dyn FnMut()>,
}

impl ResizeListener {
    #[cfg(target_arch = "wasm32")]
    pub fn new(on_resize: impl FnMut() + 'static) -> Option<Self> {
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        let callback = Closure::<dyn FnMut()>::new(on_resize);
        let window = web_sys::window()?;
        if let Err(err) = window
            .add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())
        {
            tracing::warn!(error = ?err, "could not listen for window resize");
            return None;
        }
        Some(Self { callback })
    }

    /// Native windows resize their webview themselves; nothing to listen to.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(_on_resize: impl FnMut() + 'static) -> Option<Self> {
        None
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for ResizeListener {
    fn drop(&mut self) {
        use wasm_bindgen::JsCast;

        if let Some(window) = web_sys::window() {
            window
                .remove_event_listener_with_callback(
                    "resize",
                    self.callback.as_ref().unchecked_ref(),
                )
                .ok();
        }
    }
}
