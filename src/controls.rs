//! Decorative re-styling of native form controls.
//!
//! Checkboxes and radio buttons get wrapped in a label carrying the
//! replacement artwork (an SVG check mark, a ring-and-dot pair); the
//! native input stays first in the label so form behavior is untouched.

use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::util;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const CHECK_POINTS: &str = "13,0 16,2 8,16 5,16 0,11 2,8 6,11.5";

/// Swap the `script_visible` marker from noscript-only nodes onto
/// script-only ones.
pub fn restyle_noscript() {
    for node in util::query_all(".script_disabled") {
        node.class_list().remove_1("script_visible").ok();
    }
    for node in util::query_all(".script_enabled") {
        node.class_list().add_1("script_visible").ok();
    }
}

/// Wrap every `input[type=checkbox].checkbox` (or the given nodes) in a
/// styled label with an SVG check mark.
pub fn rice_checkboxes(nodes: Option<Vec<Element>>) {
    let document = util::document();
    let nodes = nodes.unwrap_or_else(|| util::query_all("input[type=checkbox].checkbox"));
    for node in nodes {
        let Some(parent) = node.parent_node() else {
            continue;
        };
        let Ok(label) = document.create_element("label") else {
            continue;
        };
        label.set_class_name(&node.class_name());

        let (Ok(svg), Ok(polygon)) = (
            document.create_element_ns(Some(SVG_NS), "svg"),
            document.create_element_ns(Some(SVG_NS), "polygon"),
        ) else {
            continue;
        };
        svg.set_attribute("viewBox", "0 0 16 16").ok();
        polygon.set_attribute("points", CHECK_POINTS).ok();
        svg.append_child(&polygon).ok();
        label.append_child(&svg).ok();

        if parent.insert_before(&label, Some(node.as_ref())).is_ok() {
            label.insert_before(&node, Some(svg.unchecked_ref())).ok();
        }
    }
}

/// Wrap every `input[type=radio].radio` (or the given nodes) in a styled
/// label with ring and dot marker elements.
pub fn rice_radiobuttons(nodes: Option<Vec<Element>>) {
    let document = util::document();
    let nodes = nodes.unwrap_or_else(|| util::query_all("input[type=radio].radio"));
    for node in nodes {
        let Some(parent) = node.parent_node() else {
            continue;
        };
        let Ok(label) = document.create_element("label") else {
            continue;
        };
        label.set_class_name(&node.class_name());

        let (Ok(ring), Ok(dot)) = (
            document.create_element("div"),
            document.create_element("span"),
        ) else {
            continue;
        };
        label.append_child(&ring).ok();
        label.append_child(&dot).ok();

        if parent.insert_before(&label, Some(node.as_ref())).is_ok() {
            label.insert_before(&node, Some(ring.unchecked_ref())).ok();
        }
    }
}
