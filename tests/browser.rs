#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Element, EventTarget, HtmlElement, Touch, TouchEvent, TouchEventInit, TouchInit};

use site_shell::favicon;
use site_shell::gesture::{SwipeKind, SwipePhase, SwipeSample, TouchSwipe};
use site_shell::hashnav::HashNavigation;
use site_shell::panels::ContentPanels;
use site_shell::tags::{self, TagPanel};
use site_shell::util;

wasm_bindgen_test_configure!(run_in_browser);

fn clear_body() -> HtmlElement {
    let body = util::document().body().expect("document should have a body");
    body.set_inner_html("");
    body
}

/// Three bare panels in a strip, first one main.
fn build_strip() -> (HtmlElement, Vec<HtmlElement>) {
    let document = util::document();
    let body = clear_body();
    let container: HtmlElement = document
        .create_element("div")
        .unwrap()
        .dyn_into()
        .unwrap();
    container.set_class_name("content_container");
    let mut panels = Vec::new();
    for (i, label) in ["p1", "p2", "p3"].iter().enumerate() {
        let panel: HtmlElement = document
            .create_element("div")
            .unwrap()
            .dyn_into()
            .unwrap();
        panel.set_class_name(if i == 0 {
            "content_panel content_panel_main"
        } else {
            "content_panel"
        });
        panel.set_attribute("data-content", label).unwrap();
        panel.set_attribute("data-scroll", "0").unwrap();
        container.append_child(&panel).unwrap();
        panels.push(panel);
    }
    body.append_child(&container).unwrap();
    (container, panels)
}

fn synthetic_touch(target: &EventTarget, id: i32, x: f64, y: f64) -> Touch {
    let init = TouchInit::new(id, target);
    init.set_client_x(x);
    init.set_client_y(y);
    Touch::new(&init).unwrap()
}

fn dispatch_touch(target: &Element, kind: &str, touches: &[Touch]) {
    let list = js_sys::Array::new();
    for touch in touches {
        list.push(touch);
    }
    let init = TouchEventInit::new();
    init.set_bubbles(true);
    init.set_touches(&list);
    init.set_changed_touches(&list);
    let event = TouchEvent::new_with_event_init_dict(kind, &init).unwrap();
    target.dispatch_event(&event).unwrap();
}

#[wasm_bindgen_test]
fn dispatched_touches_drive_a_full_swipe() {
    let body = clear_body();
    let document = util::document();
    let area: HtmlElement = document
        .create_element("div")
        .unwrap()
        .dyn_into()
        .unwrap();
    body.append_child(&area).unwrap();

    let swipe = TouchSwipe::new();
    let phases = Rc::new(RefCell::new(Vec::new()));
    let _watcher = swipe.register(
        Some(area.as_ref()),
        SwipeKind::Horizontal,
        {
            let phases = phases.clone();
            move |phase, _sample| {
                phases.borrow_mut().push(phase);
                true
            }
        },
        None,
    );

    // Down on the watched element, a shallow horizontal drag past the
    // dead zone, then lift the last finger.
    let down = synthetic_touch(area.as_ref(), 1, 100.0, 100.0);
    dispatch_touch(&area, "touchstart", &[down]);
    let moved = synthetic_touch(area.as_ref(), 1, 140.0, 100.0);
    dispatch_touch(&area, "touchmove", &[moved]);
    dispatch_touch(&area, "touchend", &[]);

    assert_eq!(*phases.borrow(), vec![SwipePhase::Begin, SwipePhase::End]);
}

fn moved_sample(dx: f64) -> SwipeSample {
    SwipeSample {
        x: dx,
        ..Default::default()
    }
}

#[wasm_bindgen_test]
async fn fling_release_commits_to_the_next_panel() {
    let (container, strip) = build_strip();
    let panels = ContentPanels::new(container.clone());

    assert!(panels.on_swipe(SwipePhase::Begin, &SwipeSample::default()));
    panels.on_swipe(SwipePhase::Move, &moved_sample(-150.0));
    let release = SwipeSample {
        x: -150.0,
        velocity_x: -900.0,
        last_velocity_x: -900.0,
        ..Default::default()
    };
    panels.on_swipe(SwipePhase::End, &release);

    // Commit applies classes immediately; the departing panel keeps its
    // off-stage class until the transition settles.
    assert!(strip[1].class_list().contains("content_panel_main"));
    assert!(!strip[0].class_list().contains("content_panel_main"));
    assert!(strip[0].class_list().contains("content_panel_before"));
    assert_eq!(panels.current_label().as_deref(), Some("p2"));

    // Well past the 250 ms transition plus its fallback timer.
    TimeoutFuture::new(400).await;
    assert!(!strip[0].class_list().contains("content_panel_before"));
    assert_eq!(container.style().get_property_value("transform"), "");
    assert_eq!(container.style().get_property_value("transition"), "");
}

#[wasm_bindgen_test]
fn release_without_neighbors_on_that_side_snaps_back() {
    let (container, strip) = build_strip();
    let panels = ContentPanels::new(container);

    assert!(panels.on_swipe(SwipePhase::Begin, &SwipeSample::default()));
    // Dragging right from the first panel has nowhere to go; the clamp
    // keeps the offset at zero and release changes nothing.
    panels.on_swipe(SwipePhase::Move, &moved_sample(150.0));
    panels.on_swipe(
        SwipePhase::End,
        &SwipeSample {
            x: 150.0,
            velocity_x: 900.0,
            last_velocity_x: 900.0,
            ..Default::default()
        },
    );
    assert!(strip[0].class_list().contains("content_panel_main"));
    assert!(!strip[1].class_list().contains("content_panel_main"));
}

#[wasm_bindgen_test]
fn disabling_clears_transforms_and_scroll_state() {
    let (container, strip) = build_strip();
    let panels = ContentPanels::new(container.clone());

    // Simulate leftover mid-gesture state.
    strip[1].class_list().add_1("content_panel_after").unwrap();
    strip[1].style().set_property("top", "-40px").unwrap();
    strip[1].set_attribute("data-scroll", "0.5000").unwrap();
    container
        .style()
        .set_property("transform", "translateX(-80px)")
        .unwrap();

    panels.set_enabled(false);

    assert_eq!(container.style().get_property_value("transform"), "");
    assert!(!strip[1].class_list().contains("content_panel_after"));
    assert_eq!(strip[1].style().get_property_value("top"), "");
    assert_eq!(strip[1].get_attribute("data-scroll").as_deref(), Some("0"));

    // While disabled, navigation swaps the main class instantly.
    panels.go_to_content(Some("p3"));
    assert!(strip[2].class_list().contains("content_panel_main"));
    assert!(!strip[0].class_list().contains("content_panel_main"));
    assert_eq!(container.style().get_property_value("transform"), "");
}

#[wasm_bindgen_test]
fn hash_navigation_round_trips_through_the_location() {
    let nav = HashNavigation::new();
    nav.go(Some("sort-by=name&tags=rust"), true);
    assert_eq!(nav.current_hash(), "sort-by=name&tags=rust");
    let hash = util::window().location().hash().unwrap();
    assert_eq!(hash, "#!sort-by=name&tags=rust");

    nav.go(None, true);
    assert_eq!(nav.current_hash(), "");
}

fn build_tagged_regions() {
    let body = clear_body();
    body.set_inner_html(
        r#"
        <div class="settings">
          <input type="checkbox" class="checkbox settings_sort_by_tags" />
          <div class="settings_tags_container"><div class="settings_tags"></div></div>
        </div>
        <div class="region_container">
          <div class="region">
            <div class="region_description">
              <div class="region_description_tags">
                <a class="region_description_tag"><span>rust</span></a>
                <a class="region_description_tag"><span>wasm</span></a>
              </div>
            </div>
          </div>
          <div class="region">
            <div class="region_description">
              <div class="region_description_tags">
                <a class="region_description_tag"><span>rust</span></a>
              </div>
            </div>
          </div>
        </div>
        "#,
    );
}

#[wasm_bindgen_test]
fn tag_cloud_counts_and_filters_regions() {
    build_tagged_regions();
    let _panel = TagPanel::setup(|| {}).expect("tag cloud should build");

    let cloud = util::query_all(".settings_tags>.settings_tag");
    assert_eq!(cloud.len(), 2);
    let rust = cloud
        .iter()
        .find(|t| t.get_attribute("data-tag-name").as_deref() == Some("rust"))
        .expect("rust tag present");
    assert_eq!(rust.get_attribute("data-tag-count").as_deref(), Some("2"));

    tags::set_show_tags(true);
    assert!(tags::get_show_tags());
    tags::set_selected_tags(&["wasm".to_string()], false, false);
    assert_eq!(tags::get_selected_tags(), vec!["wasm".to_string()]);

    let regions = util::query_all(".region");
    assert!(!regions[0]
        .class_list()
        .contains("region_filtered_out_by_tags"));
    assert!(regions[1]
        .class_list()
        .contains("region_filtered_out_by_tags"));

    // Clearing the selection unhides everything.
    tags::set_selected_tags(&[], false, false);
    assert!(!regions[1]
        .class_list()
        .contains("region_filtered_out_by_tags"));
}

#[wasm_bindgen_test]
fn favicon_install_points_the_icon_link_at_a_data_url() {
    favicon::install("#4195dc");
    let link = util::query("link[rel~=icon]").expect("icon link created");
    let href = link.get_attribute("href").unwrap_or_default();
    assert!(href.starts_with("data:image/png"));
}
