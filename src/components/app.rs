//! Root component.
//!
//! The markup renders exactly once; everything interactive is wired up
//! after mount by [`wire_page`], in the same way the rest of the crate
//! works directly against the DOM.

use std::cell::Cell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, MediaQueryListEvent};
use yew::prelude::*;

use super::nav_bar::NavBar;
use super::region_list::RegionList;
use super::settings_panel::SettingsPanel;
use crate::controls;
use crate::favicon;
use crate::gesture::{SwipeKind, TouchSwipe, WatcherHandle};
use crate::hashnav::{self, ChangeEvent, HashNavigation};
use crate::panels::{self, ContentPanels};
use crate::tags::{self, TagPanel};
use crate::util;

/// Accent used for the generated favicon.
const ACCENT_COLOR: &str = "#4195dc";

/// Below this width the content switches to the swipeable strip.
const MOBILE_QUERY: &str = "(max-width: 700px)";

/// Everything built by [`wire_page`]; dropping it tears the page
/// behavior back down.
struct Wiring {
    _swipe: TouchSwipe,
    _watcher: WatcherHandle,
    _nav: HashNavigation,
    _tag_panel: Rc<Option<TagPanel>>,
    _listeners: Vec<EventListener>,
}

#[function_component(App)]
pub fn app() -> Html {
    use_effect_with((), move |_| {
        let wiring = wire_page();
        move || drop(wiring)
    });

    html! {
        <>
            <NavBar />
            <div class="content_container">
                <div
                    class="content_panel content_panel_main"
                    data-content="repositories"
                    data-content-default="true"
                    data-scroll="0"
                >
                    <SettingsPanel />
                    <RegionList />
                </div>
                <div class="content_panel" data-content="gists" data-scroll="0">
                    <div class="panel_text">
                        <p>{ "Smaller one-off snippets and experiments that never grew \
                              into a repository of their own." }</p>
                    </div>
                </div>
                <div class="content_panel" data-content="about" data-scroll="0">
                    <div class="panel_text">
                        <p>{ "Software projects, mostly command line tooling and \
                              libraries. Swipe sideways or use the navigation bar to \
                              move between pages." }</p>
                    </div>
                </div>
            </div>
        </>
    }
}

fn wire_page() -> Option<Wiring> {
    controls::restyle_noscript();
    controls::rice_checkboxes(None);
    controls::rice_radiobuttons(None);
    favicon::install(ACCENT_COLOR);

    let container = util::query(".content_container")
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())?;
    let panels = ContentPanels::new(container.clone());
    let nav = HashNavigation::new();
    let swipe = TouchSwipe::new();

    let watcher = swipe.register(
        Some(container.as_ref()),
        SwipeKind::Horizontal,
        {
            let panels = panels.clone();
            move |phase, sample| panels.on_swipe(phase, sample)
        },
        None,
    );

    // Set while replaying fragment state into the DOM, so the commits
    // that replay causes do not push history entries of their own.
    let replaying = Rc::new(Cell::new(false));

    // Push the displayed state into the URL fragment, leaving defaults
    // out so the default view keeps a clean address.
    let sync: Rc<dyn Fn()> = Rc::new({
        let panels = panels.clone();
        let nav = nav.clone();
        let replaying = replaying.clone();
        move || {
            if replaying.get() {
                return;
            }
            let mut vars: Vec<(String, Option<String>)> = Vec::new();
            let default_label = util::query(&format!("[{}]", panels::ATTR_DEFAULT))
                .and_then(|p| p.get_attribute(panels::ATTR_CONTENT));
            if let Some(label) = panels.current_label() {
                if Some(&label) != default_label.as_ref() {
                    vars.push(("content".to_string(), Some(label)));
                }
            }
            if let Some((value, is_default)) = tags::get_sort_by() {
                if !is_default {
                    vars.push(("sort-by".to_string(), Some(value)));
                }
            }
            if tags::get_show_tags() {
                let selected = tags::get_selected_tags();
                let value = (!selected.is_empty()).then(|| selected.join(","));
                vars.push(("tags".to_string(), value));
            }
            if vars.is_empty() {
                nav.go(None, false);
            } else {
                nav.go(Some(&hashnav::encode_vars(&vars)), false);
            }
        }
    });

    let tag_panel = Rc::new(TagPanel::setup({
        let sync = sync.clone();
        move || sync()
    }));

    panels.set_on_commit({
        let sync = sync.clone();
        move |_| sync()
    });

    // Replay fragment state on load and on browser back/forward. Changes
    // caused by our own `go` calls already match the DOM.
    nav.on_change({
        let panels = panels.clone();
        let tag_panel = tag_panel.clone();
        move |event: &ChangeEvent| {
            if !(event.init || event.pop) {
                return;
            }
            let hash = util::window().location().hash().unwrap_or_default();
            let vars = hashnav::decode_vars(hashnav::strip_hash(&hash));
            let content = hashnav::find_var(&vars, "content").cloned().flatten();
            let sort_by = hashnav::find_var(&vars, "sort-by").cloned().flatten();
            let (show, selected) = match hashnav::find_var(&vars, "tags") {
                None => (false, Vec::new()),
                Some(None) => (true, Vec::new()),
                Some(Some(list)) => (
                    true,
                    list.split(',')
                        .filter(|t| !t.is_empty())
                        .map(str::to_string)
                        .collect(),
                ),
            };
            replaying.set(true);
            if let Some(tag_panel) = tag_panel.as_ref() {
                tag_panel.apply_state(sort_by.as_deref(), show, &selected);
            }
            panels.go_to_content(content.as_deref());
            replaying.set(false);
        }
    });

    let mut listeners = Vec::new();
    for button in util::query_all(".content_nav_button") {
        let Some(label) = button.get_attribute(panels::ATTR_CONTENT) else {
            continue;
        };
        let panels = panels.clone();
        listeners.push(EventListener::new_with_options(
            &button,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |e| {
                e.prevent_default();
                panels.go_to_content(Some(&label));
            },
        ));
    }
    {
        let panels = panels.clone();
        listeners.push(EventListener::new(&util::window(), "resize", move |_| {
            panels.refresh_indicator();
        }));
    }
    match util::window().match_media(MOBILE_QUERY) {
        Ok(Some(mq)) => {
            panels.set_enabled(mq.matches());
            let panels = panels.clone();
            listeners.push(EventListener::new(&mq, "change", move |e| {
                if let Some(e) = e.dyn_ref::<MediaQueryListEvent>() {
                    panels.set_enabled(e.matches());
                }
            }));
        }
        _ => util::clog("match_media unavailable; keeping the swipe layout enabled"),
    }

    nav.setup();
    panels.refresh_indicator();

    Some(Wiring {
        _swipe: swipe,
        _watcher: watcher,
        _nav: nav,
        _tag_panel: tag_panel,
        _listeners: listeners,
    })
}
