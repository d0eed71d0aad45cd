//! Values whose lifetime follows the chart drawn on a canvas.

use std::cell::RefCell;
use std::collections::HashMap;

/// Per-canvas storage: `keep` replaces (and drops) whatever the canvas held
/// before, `release` drops it.
#[derive(Debug)]
pub struct Retained<T> {
    entries: RefCell<HashMap<String, Vec<T>>>,
}

impl<T> Default for Retained<T> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
        }
    }
}

impl<T> Retained<T> {
    pub fn keep(&self, canvas_id: impl Into<String>, values: Vec<T>) {
        let previous = self.entries.borrow_mut().insert(canvas_id.into(), values);
        drop(previous);
    }

    pub fn release(&self, canvas_id: &str) {
        let released = self.entries.borrow_mut().remove(canvas_id);
        drop(released);
    }

    pub fn held_for(&self, canvas_id: &str) -> usize {
        self.entries.borrow().get(canvas_id).map_or(0, Vec::len)
    }

    pub fn total(&self) -> usize {
        self.entries.borrow().values().map(Vec::len).sum()
    }
}
