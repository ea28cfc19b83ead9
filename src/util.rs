//! Small browser helpers shared across modules.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Window};

pub fn window() -> Window {
    web_sys::window().expect("no global `window` exists")
}

pub fn document() -> Document {
    window().document().expect("should have a document on window")
}

pub fn clog(msg: &str) {
    gloo::console::log!(msg);
}

/// All elements matching `selector`, or empty on a bad selector.
pub fn query_all(selector: &str) -> Vec<Element> {
    let mut out = Vec::new();
    if let Ok(list) = document().query_selector_all(selector) {
        for i in 0..list.length() {
            if let Some(node) = list.item(i) {
                if let Ok(el) = node.dyn_into::<Element>() {
                    out.push(el);
                }
            }
        }
    }
    out
}

/// First element matching `selector`, if any.
pub fn query(selector: &str) -> Option<Element> {
    document().query_selector(selector).ok().flatten()
}

/// Current vertical page scroll in pixels.
pub fn page_scroll_y() -> f64 {
    window().page_y_offset().unwrap_or(0.0)
}

/// Current horizontal page scroll in pixels.
pub fn page_scroll_x() -> f64 {
    window().page_x_offset().unwrap_or(0.0)
}

/// Viewport height in pixels.
pub fn viewport_height() -> f64 {
    window()
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}
