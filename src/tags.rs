//! Tag-based filtering and sorting of the region list.
//!
//! The tag cloud is built from the tags present in the rendered regions;
//! selecting tags hides regions that match none of them, and the sort
//! radios reorder the region nodes by name or by color hue. All of the
//! selection set arithmetic is pure and tested natively; the DOM layer
//! just applies classes.

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement};

use crate::color;
use crate::util;

const TAG_SELECTED: &str = "settings_tag_selected";
const REGION_TAG_SELECTED: &str = "region_description_tag_selected";
const REGION_FILTERED: &str = "region_filtered_out_by_tags";
const ATTR_TAG_NAME: &str = "data-tag-name";

/// Count how often each tag occurs across regions.
pub fn tag_counts<S: AsRef<str>>(per_region: &[Vec<S>]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for tags in per_region {
        for tag in tags {
            *counts.entry(tag.as_ref().to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// Compute the new selection set.
///
/// `requested` tags are turned on (or off when `subtractive`); with
/// `additive` the rest of the current selection is kept, otherwise it is
/// cleared. Unknown requested tags are ignored.
pub fn resolve_selection(
    known: &BTreeSet<String>,
    current: &BTreeSet<String>,
    requested: &[String],
    additive: bool,
    subtractive: bool,
) -> BTreeSet<String> {
    let mut next: BTreeSet<String> = if additive {
        current.intersection(known).cloned().collect()
    } else {
        BTreeSet::new()
    };
    for tag in requested {
        if !known.contains(tag) {
            continue;
        }
        if subtractive {
            next.remove(tag);
        } else {
            next.insert(tag.clone());
        }
    }
    next
}

/// A region is filtered out when a selection exists and it matches none
/// of the selected tags.
pub fn region_hidden<S: AsRef<str>>(region_tags: &[S], selected: &BTreeSet<String>) -> bool {
    !selected.is_empty() && !region_tags.iter().any(|t| selected.contains(t.as_ref()))
}

fn region_tag_text(tag_node: &Element) -> Option<String> {
    let span = tag_node.query_selector("span").ok().flatten()?;
    let text = span.text_content().unwrap_or_default();
    let text = text.trim().to_lowercase();
    if text.is_empty() { None } else { Some(text) }
}

fn region_tags(region: &Element) -> Vec<(String, Element)> {
    let mut out = Vec::new();
    if let Ok(list) = region.query_selector_all(".region_description_tags>.region_description_tag")
    {
        for i in 0..list.length() {
            let Some(node) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            if let Some(name) = region_tag_text(&node) {
                out.push((name, node));
            }
        }
    }
    out
}

fn region_name(region: &Element) -> String {
    region
        .query_selector(".region_title>a>span")
        .ok()
        .flatten()
        .and_then(|n| n.text_content())
        .unwrap_or_default()
}

fn region_hue(region: &Element) -> f64 {
    let Some(node) = region.query_selector(".color_indicator").ok().flatten() else {
        return 0.0;
    };
    let style = util::window().get_computed_style(&node).ok().flatten();
    let Some(css) = style.and_then(|s| s.get_property_value("border-left-color").ok()) else {
        return 0.0;
    };
    match color::parse_css_color(&css) {
        Some([r, g, b, _]) => color::rgb_to_hsv(r as u8, g as u8, b as u8).0,
        None => 0.0,
    }
}

/// Built tag cloud plus the listeners that keep it interactive.
pub struct TagPanel {
    _listeners: Vec<EventListener>,
}

impl TagPanel {
    /// Count tags across regions, populate the `.settings_tags` cloud,
    /// and wire all tag/sort inputs. `on_change` fires after any user
    /// interaction that altered the displayed state.
    pub fn setup(on_change: impl Fn() + 'static) -> Option<TagPanel> {
        let on_change: Rc<dyn Fn()> = Rc::new(on_change);
        let container = util::query(".settings_tags_container")?;
        let cloud = container.query_selector(".settings_tags").ok().flatten()?;
        let document = util::document();
        let mut listeners = Vec::new();

        let mut per_region: Vec<Vec<String>> = Vec::new();
        for region in util::query_all(".region") {
            let tags = region_tags(&region);
            for (name, node) in &tags {
                let name = name.clone();
                let on_change = on_change.clone();
                let node_ref = node.clone();
                listeners.push(EventListener::new(node, "click", move |_| {
                    let was_selected = node_ref.class_list().contains(REGION_TAG_SELECTED);
                    set_show_tags(true);
                    set_selected_tags(&[name.clone()], true, was_selected);
                    on_change();
                }));
            }
            per_region.push(tags.into_iter().map(|(name, _)| name).collect());
        }

        let counts = tag_counts(&per_region);
        if counts.is_empty() {
            return None;
        }
        for (name, count) in &counts {
            let Ok(anchor) = document.create_element("a") else {
                continue;
            };
            anchor.set_class_name("settings_tag rainbow_underline rainbow_underline_inside");
            anchor.set_attribute(ATTR_TAG_NAME, name).ok();
            anchor
                .set_attribute("data-tag-count", &count.to_string())
                .ok();

            if let (Ok(inner), Ok(text)) = (
                document.create_element("span"),
                document.create_element("span"),
            ) {
                inner.set_class_name("rainbow_underline_inner");
                text.set_class_name("settings_tag_text");
                text.set_text_content(Some(name));
                inner.append_child(&text).ok();
                anchor.append_child(&inner).ok();
            }
            if let Ok(count_node) = document.create_element("span") {
                count_node.set_class_name("settings_tag_count");
                count_node.set_text_content(Some(&format!("({count})")));
                anchor.append_child(&count_node).ok();
            }

            let anchor_ref = anchor.clone();
            let on_change = on_change.clone();
            listeners.push(EventListener::new(&anchor, "click", move |_| {
                anchor_ref.class_list().toggle(TAG_SELECTED).ok();
                on_change();
            }));
            cloud.append_child(&anchor).ok();
        }
        container
            .class_list()
            .add_1("settings_tags_container_visible")
            .ok();

        if let Some(show) = util::query("input.settings_sort_by_tags") {
            let on_change = on_change.clone();
            listeners.push(EventListener::new(&show, "change", move |_| {
                on_change();
            }));
        }
        for radio in util::query_all("input.settings_sort_by") {
            let on_change = on_change.clone();
            let radio_ref = radio.clone();
            listeners.push(EventListener::new(&radio, "change", move |_| {
                let checked = radio_ref
                    .dyn_ref::<HtmlInputElement>()
                    .is_some_and(|r| r.checked());
                if checked {
                    on_change();
                }
            }));
        }

        Some(TagPanel {
            _listeners: listeners,
        })
    }

    /// Replay state decoded from the URL fragment.
    pub fn apply_state(&self, sort_by: Option<&str>, show_tags: bool, tags: &[String]) {
        set_show_tags(show_tags);
        let tags = if show_tags { tags } else { &[] };
        set_selected_tags(tags, false, false);
        set_sort_by(sort_by, true);
    }
}

/// Currently checked sort radio as `(value, is_default)`.
pub fn get_sort_by() -> Option<(String, bool)> {
    let node = util::query("input.settings_sort_by:checked")?;
    let input = node.dyn_ref::<HtmlInputElement>()?;
    let is_default = node.get_attribute("data-is-default").as_deref() == Some("true");
    Some((input.value(), is_default))
}

/// Check the radio for `mode` (falling back to the default-marked one)
/// and optionally reorder the region list accordingly.
pub fn set_sort_by(mode: Option<&str>, update_sort: bool) {
    let mut selected_value: Option<String> = None;
    let mut default_radio: Option<HtmlInputElement> = None;
    for node in util::query_all("input.settings_sort_by") {
        let Some(input) = node.dyn_ref::<HtmlInputElement>() else {
            continue;
        };
        if Some(input.value().as_str()) == mode {
            input.set_checked(true);
            selected_value = Some(input.value());
        }
        if default_radio.is_none()
            && node.get_attribute("data-is-default").as_deref() == Some("true")
        {
            default_radio = Some(input.clone());
        }
    }
    let mode = match (selected_value, default_radio) {
        (Some(value), _) => value,
        (None, Some(default)) => {
            default.set_checked(true);
            default.value()
        }
        (None, None) => return,
    };

    if !update_sort {
        return;
    }
    let Some(container) = util::query(".region_container") else {
        return;
    };
    let mut regions: Vec<Element> = util::query_all(".region")
        .into_iter()
        .filter(|r| {
            r.parent_node()
                .is_some_and(|p| container.is_same_node(Some(&p)))
        })
        .collect();
    if mode == "color" {
        let mut keyed: Vec<(f64, Element)> =
            regions.drain(..).map(|r| (region_hue(&r), r)).collect();
        keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        regions = keyed.into_iter().map(|(_, r)| r).collect();
    } else {
        regions.sort_by_key(|r| region_name(r));
    }
    for region in regions {
        container.append_child(&region).ok();
    }
}

pub fn get_show_tags() -> bool {
    util::query("input.settings_sort_by_tags")
        .and_then(|n| n.dyn_into::<HtmlInputElement>().ok())
        .is_some_and(|n| n.checked())
}

pub fn set_show_tags(show: bool) {
    if let Some(input) = util::query("input.settings_sort_by_tags")
        .and_then(|n| n.dyn_into::<HtmlInputElement>().ok())
    {
        input.set_checked(show);
    }
    if let Some(container) = util::query(".settings_tags_container") {
        let classes = container.class_list();
        if show {
            classes.add_1("settings_tags_container_enabled").ok();
        } else {
            classes.remove_1("settings_tags_container_enabled").ok();
        }
    }
}

/// Selected tag names from the cloud, sorted and de-duplicated.
pub fn get_selected_tags() -> Vec<String> {
    let mut set = BTreeSet::new();
    for tag in util::query_all(&format!(".settings_tags>.settings_tag.{TAG_SELECTED}")) {
        if let Some(name) = tag.get_attribute(ATTR_TAG_NAME) {
            set.insert(name);
        }
    }
    set.into_iter().collect()
}

/// Apply a selection change to the cloud and the region list.
pub fn set_selected_tags(requested: &[String], additive: bool, subtractive: bool) {
    let cloud_tags = util::query_all(".settings_tags>.settings_tag");
    let known: BTreeSet<String> = cloud_tags
        .iter()
        .filter_map(|t| t.get_attribute(ATTR_TAG_NAME))
        .collect();
    let current: BTreeSet<String> = cloud_tags
        .iter()
        .filter(|t| t.class_list().contains(TAG_SELECTED))
        .filter_map(|t| t.get_attribute(ATTR_TAG_NAME))
        .collect();
    let selected = resolve_selection(&known, &current, requested, additive, subtractive);

    for tag in &cloud_tags {
        let Some(name) = tag.get_attribute(ATTR_TAG_NAME) else {
            continue;
        };
        let classes = tag.class_list();
        if selected.contains(&name) {
            classes.add_1(TAG_SELECTED).ok();
        } else {
            classes.remove_1(TAG_SELECTED).ok();
        }
    }

    for region in util::query_all(".region") {
        let tags = region_tags(&region);
        let mut names = Vec::with_capacity(tags.len());
        for (name, node) in tags {
            let classes = node.class_list();
            if selected.contains(&name) {
                classes.add_1(REGION_TAG_SELECTED).ok();
            } else {
                classes.remove_1(REGION_TAG_SELECTED).ok();
            }
            names.push(name);
        }
        let classes = region.class_list();
        if region_hidden(&names, &selected) {
            classes.add_1(REGION_FILTERED).ok();
        } else {
            classes.remove_1(REGION_FILTERED).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    fn vec_of(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn counts_accumulate_across_regions() {
        let per_region = vec![vec_of(&["python", "library"]), vec_of(&["python"])];
        let counts = tag_counts(&per_region);
        assert_eq!(counts.get("python"), Some(&2));
        assert_eq!(counts.get("library"), Some(&1));
    }

    #[test]
    fn plain_selection_replaces() {
        let known = set(&["a", "b", "c"]);
        let next = resolve_selection(&known, &set(&["a"]), &vec_of(&["b"]), false, false);
        assert_eq!(next, set(&["b"]));
    }

    #[test]
    fn additive_selection_keeps_existing() {
        let known = set(&["a", "b", "c"]);
        let next = resolve_selection(&known, &set(&["a"]), &vec_of(&["b"]), true, false);
        assert_eq!(next, set(&["a", "b"]));
    }

    #[test]
    fn subtractive_selection_removes() {
        let known = set(&["a", "b"]);
        let next = resolve_selection(&known, &set(&["a", "b"]), &vec_of(&["b"]), true, true);
        assert_eq!(next, set(&["a"]));
    }

    #[test]
    fn unknown_tags_are_ignored() {
        let known = set(&["a"]);
        let next = resolve_selection(&known, &set(&[]), &vec_of(&["zzz"]), false, false);
        assert!(next.is_empty());
    }

    #[test]
    fn hidden_only_when_selection_misses() {
        let selected = set(&["python"]);
        assert!(!region_hidden(&["python", "library"], &selected));
        assert!(region_hidden(&["c++"], &selected));
        assert!(!region_hidden(&["c++"], &set(&[])));
    }
}
