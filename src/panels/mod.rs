//! The swipeable panel strip.
//!
//! [`ContentPanels`] owns a horizontal sequence of `.content_panel`
//! children with exactly one `.content_panel_main`. Swipe events drag the
//! strip; release either commits to a neighbor or snaps back (see
//! [`logic`]); the CSS transition animates the rest, with a fallback
//! timer guaranteeing cleanup when `transitionend` never arrives.

pub mod logic;

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, Node, TransitionEvent};

use crate::gesture::{SwipePhase, SwipeSample};
use crate::util;
pub use logic::{Easing, ReleaseOutcome, TRANSITION_MS};
use logic::{clamp_drag, decide_release, indicator_metrics};

pub const PANEL_CLASS: &str = "content_panel";
pub const PANEL_MAIN: &str = "content_panel_main";
pub const PANEL_BEFORE: &str = "content_panel_before";
pub const PANEL_AFTER: &str = "content_panel_after";
pub const ATTR_CONTENT: &str = "data-content";
pub const ATTR_DEFAULT: &str = "data-content-default";
pub const ATTR_SCROLL: &str = "data-scroll";

const NAV_SELECTOR: &str = ".content_nav";
const NAV_INDICATOR_SELECTOR: &str = ".content_nav_indicator";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Next,
    Prev,
}

struct DragState {
    main: HtmlElement,
    before: Option<HtmlElement>,
    after: Option<HtmlElement>,
    width: f64,
    offset: f64,
}

/// Pending cleanup for an in-flight strip animation. The generation
/// number lets the fallback timer ignore transitions it did not start.
struct TransitionState {
    generation: u64,
    class_cleanup: Vec<(HtmlElement, &'static str)>,
    style_cleanup: Vec<HtmlElement>,
}

struct PanelsInner {
    container: HtmlElement,
    enabled: bool,
    drag: Option<DragState>,
    transition: Option<TransitionState>,
    generation: u64,
    on_commit: Option<Rc<dyn Fn(Option<&str>)>>,
}

/// Owned panel controller; cloning shares the same strip.
#[derive(Clone)]
pub struct ContentPanels {
    inner: Rc<RefCell<PanelsInner>>,
    _transition_end: Rc<EventListener>,
}

impl ContentPanels {
    pub fn new(container: HtmlElement) -> Self {
        let inner = Rc::new(RefCell::new(PanelsInner {
            container: container.clone(),
            enabled: true,
            drag: None,
            transition: None,
            generation: 0,
            on_commit: None,
        }));
        let transition_end = EventListener::new(&container, "transitionend", {
            let inner = inner.clone();
            let container = container.clone();
            move |e| {
                let Some(te) = e.dyn_ref::<TransitionEvent>() else {
                    return;
                };
                // Child panels transition too; only the strip's own
                // transform marks completion.
                let on_container = e
                    .target()
                    .is_some_and(|t| container.is_same_node(t.dyn_ref::<Node>()));
                if on_container && te.property_name() == "transform" {
                    finish_transition(&inner, None);
                }
            }
        });
        Self {
            inner,
            _transition_end: Rc::new(transition_end),
        }
    }

    /// Register a callback fired whenever a panel commit happens, with
    /// the new main panel's `data-content` label.
    pub fn set_on_commit(&self, callback: impl Fn(Option<&str>) + 'static) {
        self.inner.borrow_mut().on_commit = Some(Rc::new(callback));
    }

    /// `data-content` label of the current main panel.
    pub fn current_label(&self) -> Option<String> {
        let inner = self.inner.borrow();
        main_panel(&inner.container)?.get_attribute(ATTR_CONTENT)
    }

    pub fn enabled(&self) -> bool {
        self.inner.borrow().enabled
    }

    /// Watcher callback for the gesture recognizer.
    pub fn on_swipe(&self, phase: SwipePhase, sample: &SwipeSample) -> bool {
        match phase {
            SwipePhase::Begin => self.swipe_begin(),
            SwipePhase::Move => self.swipe_move(sample),
            SwipePhase::End => self.swipe_end(sample),
            SwipePhase::Cancel => self.swipe_cancel(),
        }
    }

    fn swipe_begin(&self) -> bool {
        // A grab during an animation settles it first.
        finish_transition(&self.inner, None);
        let mut inner = self.inner.borrow_mut();
        if !inner.enabled {
            return false;
        }
        let Some(main) = main_panel(&inner.container) else {
            return false;
        };
        let before = neighbor_panel(&main, Direction::Prev);
        let after = neighbor_panel(&main, Direction::Next);
        if before.is_none() && after.is_none() {
            return false;
        }
        let width = main.get_bounding_client_rect().width();
        if width <= 0.0 {
            return false;
        }
        if let Some(p) = &before {
            p.class_list().remove_1(PANEL_AFTER).ok();
            p.class_list().add_1(PANEL_BEFORE).ok();
            place_offstage(p);
        }
        if let Some(p) = &after {
            p.class_list().remove_1(PANEL_BEFORE).ok();
            p.class_list().add_1(PANEL_AFTER).ok();
            place_offstage(p);
        }
        inner
            .container
            .style()
            .set_property("transition", "none")
            .ok();
        inner.drag = Some(DragState {
            main,
            before,
            after,
            width,
            offset: 0.0,
        });
        true
    }

    fn swipe_move(&self, sample: &SwipeSample) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(drag) = inner.drag.as_mut() else {
            return true;
        };
        let offset = clamp_drag(
            sample.x - sample.start_x,
            drag.width,
            drag.before.is_some(),
            drag.after.is_some(),
        );
        drag.offset = offset;
        inner
            .container
            .style()
            .set_property("transform", &format!("translateX({offset}px)"))
            .ok();
        true
    }

    fn swipe_end(&self, sample: &SwipeSample) -> bool {
        let Some(drag) = self.inner.borrow_mut().drag.take() else {
            return true;
        };
        let outcome = decide_release(
            drag.offset,
            drag.width,
            sample.velocity_x,
            sample.last_velocity_x,
            drag.before.is_some(),
            drag.after.is_some(),
        );
        match outcome {
            ReleaseOutcome::CommitNext(easing) => {
                commit(&self.inner, drag, Direction::Next, easing)
            }
            ReleaseOutcome::CommitPrev(easing) => {
                commit(&self.inner, drag, Direction::Prev, easing)
            }
            ReleaseOutcome::SnapBack(easing) => snap_back(&self.inner, drag, easing),
        }
        true
    }

    fn swipe_cancel(&self) -> bool {
        if let Some(drag) = self.inner.borrow_mut().drag.take() {
            snap_back(&self.inner, drag, Easing::EaseInOut);
        }
        true
    }

    /// Programmatic navigation to the panel labelled `label`, or to the
    /// `data-content-default` panel when `None`. No-op if the panel does
    /// not exist or is already main.
    pub fn go_to_content(&self, label: Option<&str>) {
        finish_transition(&self.inner, None);
        let (main, target, enabled) = {
            let inner = self.inner.borrow();
            let panels = panel_list(&inner.container);
            let target = match label {
                Some(l) => panels
                    .iter()
                    .find(|p| p.get_attribute(ATTR_CONTENT).as_deref() == Some(l)),
                None => panels.iter().find(|p| p.has_attribute(ATTR_DEFAULT)),
            };
            let Some(target) = target.cloned() else {
                return;
            };
            (main_panel(&inner.container), target, inner.enabled)
        };
        let Some(main) = main else {
            // Degenerate markup; adopt the target so the page stays usable.
            target.class_list().add_1(PANEL_MAIN).ok();
            update_indicator(&self.inner, false);
            return;
        };
        if main.is_same_node(Some(target.as_ref())) {
            update_indicator(&self.inner, false);
            return;
        }
        let target_node: &Node = target.as_ref();
        let following =
            main.compare_document_position(target_node) & Node::DOCUMENT_POSITION_FOLLOWING != 0;
        let direction = if following {
            Direction::Next
        } else {
            Direction::Prev
        };
        if !enabled {
            // Desktop layout shows panels without the strip animation.
            main.class_list().remove_1(PANEL_MAIN).ok();
            target.class_list().add_1(PANEL_MAIN).ok();
            update_indicator(&self.inner, false);
            self.emit_commit(&target);
            return;
        }
        target
            .class_list()
            .add_1(match direction {
                Direction::Next => PANEL_AFTER,
                Direction::Prev => PANEL_BEFORE,
            })
            .ok();
        place_offstage(&target);
        let width = main.get_bounding_client_rect().width();
        let drag = DragState {
            main,
            before: (direction == Direction::Prev).then(|| target.clone()),
            after: (direction == Direction::Next).then(|| target.clone()),
            width,
            offset: 0.0,
        };
        commit(&self.inner, drag, direction, Easing::EaseInOut);
    }

    /// Toggle the mobile behavior. Disabling clears every bit of
    /// transform and scroll bookkeeping; enabling recomputes the
    /// indicator for the current panel.
    pub fn set_enabled(&self, enabled: bool) {
        finish_transition(&self.inner, None);
        {
            let mut inner = self.inner.borrow_mut();
            if inner.enabled == enabled {
                return;
            }
            inner.enabled = enabled;
            inner.drag = None;
        }
        if enabled {
            update_indicator(&self.inner, false);
            return;
        }
        let (container, panels) = {
            let inner = self.inner.borrow();
            (inner.container.clone(), panel_list(&inner.container))
        };
        container.style().remove_property("transition").ok();
        container.style().remove_property("transform").ok();
        for panel in panels {
            panel.class_list().remove_1(PANEL_BEFORE).ok();
            panel.class_list().remove_1(PANEL_AFTER).ok();
            panel.style().remove_property("top").ok();
            panel.set_attribute(ATTR_SCROLL, "0").ok();
        }
    }

    /// Recompute the indicator geometry (window resize).
    pub fn refresh_indicator(&self) {
        update_indicator(&self.inner, false);
    }

    fn emit_commit(&self, target: &HtmlElement) {
        let callback = self.inner.borrow().on_commit.clone();
        if let Some(callback) = callback {
            let label = target.get_attribute(ATTR_CONTENT);
            callback(label.as_deref());
        }
    }
}

fn main_panel(container: &HtmlElement) -> Option<HtmlElement> {
    panel_list(container)
        .into_iter()
        .find(|p| p.class_list().contains(PANEL_MAIN))
}

fn panel_list(container: &HtmlElement) -> Vec<HtmlElement> {
    let children = container.children();
    (0..children.length())
        .filter_map(|i| children.item(i))
        .filter(|el| el.class_list().contains(PANEL_CLASS))
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect()
}

/// The adjacent panel sibling in `direction`, skipping non-panel
/// elements (text and comment nodes never appear here; sibling lookup is
/// element-only already).
fn neighbor_panel(panel: &HtmlElement, direction: Direction) -> Option<HtmlElement> {
    let mut cursor: Option<Element> = match direction {
        Direction::Prev => panel.previous_element_sibling(),
        Direction::Next => panel.next_element_sibling(),
    };
    while let Some(el) = cursor {
        if el.class_list().contains(PANEL_CLASS) {
            return el.dyn_into::<HtmlElement>().ok();
        }
        cursor = match direction {
            Direction::Prev => el.previous_element_sibling(),
            Direction::Next => el.next_element_sibling(),
        };
    }
    None
}

fn scroll_extent(panel: &HtmlElement) -> f64 {
    (panel.scroll_height() as f64 - util::viewport_height()).max(0.0)
}

fn saved_fraction(panel: &HtmlElement) -> f64 {
    panel
        .get_attribute(ATTR_SCROLL)
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(0.0)
        .clamp(0.0, 1.0)
}

/// Vertically align an off-screen neighbor so it resumes at its own
/// saved scroll position instead of the current panel's.
fn place_offstage(panel: &HtmlElement) {
    let saved = saved_fraction(panel) * scroll_extent(panel);
    let top = util::page_scroll_y() - saved;
    panel
        .style()
        .set_property("top", &format!("{top}px"))
        .ok();
}

fn store_scroll_fraction(panel: &HtmlElement) {
    let extent = scroll_extent(panel);
    let fraction = if extent > 0.0 {
        (util::page_scroll_y() / extent).clamp(0.0, 1.0)
    } else {
        0.0
    };
    panel
        .set_attribute(ATTR_SCROLL, &format!("{fraction:.4}"))
        .ok();
}

fn restore_scroll(panel: &HtmlElement) {
    let y = saved_fraction(panel) * scroll_extent(panel);
    let window = util::window();
    window.scroll_to_with_x_and_y(0.0, y);
    // A sub-pixel rounding error can leave the target shy of flush.
    if (util::page_scroll_y() - y).abs() >= 1.0 {
        window.scroll_to_with_x_and_y(0.0, y);
    }
}

fn commit(
    inner: &Rc<RefCell<PanelsInner>>,
    drag: DragState,
    direction: Direction,
    easing: Easing,
) {
    let (target, departing_class) = match direction {
        Direction::Next => (drag.after.clone(), PANEL_BEFORE),
        Direction::Prev => (drag.before.clone(), PANEL_AFTER),
    };
    let Some(target) = target else {
        snap_back(inner, drag, Easing::EaseInOut);
        return;
    };

    store_scroll_fraction(&drag.main);
    drag.main.class_list().remove_1(PANEL_MAIN).ok();
    drag.main.class_list().add_1(departing_class).ok();
    target.class_list().remove_1(PANEL_BEFORE).ok();
    target.class_list().remove_1(PANEL_AFTER).ok();
    target.class_list().add_1(PANEL_MAIN).ok();

    // The untouched neighbor goes straight back off-stage.
    let other = match direction {
        Direction::Next => drag.before.clone(),
        Direction::Prev => drag.after.clone(),
    };
    if let Some(other) = other {
        other.class_list().remove_1(PANEL_BEFORE).ok();
        other.class_list().remove_1(PANEL_AFTER).ok();
        other.style().remove_property("top").ok();
    }

    restore_scroll(&target);
    place_offstage(&drag.main);

    // Swapping main shifts the strip's zero point by one panel width;
    // jump there without animating, then ease back to zero.
    let new_offset = match direction {
        Direction::Next => drag.offset + drag.width,
        Direction::Prev => drag.offset - drag.width,
    };
    let container = inner.borrow().container.clone();
    container.style().set_property("transition", "none").ok();
    container
        .style()
        .set_property("transform", &format!("translateX({new_offset}px)"))
        .ok();
    let _ = container.offset_width(); // force layout so the jump is not animated

    animate_to_zero(
        inner,
        easing,
        vec![(drag.main.clone(), departing_class)],
        vec![drag.main.clone(), target.clone()],
    );
    update_indicator(inner, true);

    let callback = inner.borrow().on_commit.clone();
    if let Some(callback) = callback {
        let label = target.get_attribute(ATTR_CONTENT);
        callback(label.as_deref());
    }
}

fn snap_back(inner: &Rc<RefCell<PanelsInner>>, drag: DragState, easing: Easing) {
    let mut class_cleanup = Vec::new();
    let mut style_cleanup = Vec::new();
    if let Some(p) = drag.before {
        class_cleanup.push((p.clone(), PANEL_BEFORE));
        style_cleanup.push(p);
    }
    if let Some(p) = drag.after {
        class_cleanup.push((p.clone(), PANEL_AFTER));
        style_cleanup.push(p);
    }
    if drag.offset == 0.0 {
        // Never moved; no animation to wait for.
        for (el, class) in class_cleanup {
            el.class_list().remove_1(class).ok();
        }
        for el in style_cleanup {
            el.style().remove_property("top").ok();
        }
        let container = inner.borrow().container.clone();
        container.style().remove_property("transition").ok();
        container.style().remove_property("transform").ok();
        return;
    }
    animate_to_zero(inner, easing, class_cleanup, style_cleanup);
}

fn animate_to_zero(
    inner: &Rc<RefCell<PanelsInner>>,
    easing: Easing,
    class_cleanup: Vec<(HtmlElement, &'static str)>,
    style_cleanup: Vec<HtmlElement>,
) {
    let (container, generation) = {
        let mut state = inner.borrow_mut();
        state.generation += 1;
        let generation = state.generation;
        state.transition = Some(TransitionState {
            generation,
            class_cleanup,
            style_cleanup,
        });
        (state.container.clone(), generation)
    };
    container
        .style()
        .set_property(
            "transition",
            &format!("transform {}ms {}", TRANSITION_MS, easing.css()),
        )
        .ok();
    container
        .style()
        .set_property("transform", "translateX(0px)")
        .ok();
    // transitionend can be lost (tab hidden, transition suppressed);
    // the timer guarantees cleanup either way.
    let inner = inner.clone();
    Timeout::new(TRANSITION_MS, move || {
        finish_transition(&inner, Some(generation));
    })
    .forget();
}

/// Apply the pending cleanup exactly once. `generation` restricts the
/// fallback timer to the transition it was armed for; the
/// `transitionend` path passes `None` and settles whatever is in flight.
fn finish_transition(inner: &Rc<RefCell<PanelsInner>>, generation: Option<u64>) {
    let taken = {
        let mut state = inner.borrow_mut();
        match &state.transition {
            Some(t) if generation.is_none_or(|g| g == t.generation) => state.transition.take(),
            _ => None,
        }
    };
    let Some(transition) = taken else {
        return;
    };
    for (el, class) in transition.class_cleanup {
        el.class_list().remove_1(class).ok();
    }
    for el in transition.style_cleanup {
        el.style().remove_property("top").ok();
    }
    let container = inner.borrow().container.clone();
    container.style().remove_property("transition").ok();
    container.style().remove_property("transform").ok();
}

fn update_indicator(inner: &Rc<RefCell<PanelsInner>>, animated: bool) {
    let label = {
        let state = inner.borrow();
        main_panel(&state.container).and_then(|p| p.get_attribute(ATTR_CONTENT))
    };
    let Some(label) = label else {
        return;
    };
    let Some(nav) = util::query(NAV_SELECTOR) else {
        return;
    };
    let button = nav
        .query_selector(&format!(".content_nav_button[{ATTR_CONTENT}=\"{label}\"]"))
        .ok()
        .flatten();
    let indicator = nav
        .query_selector(NAV_INDICATOR_SELECTOR)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    let (Some(button), Some(indicator)) = (button, indicator) else {
        return;
    };
    let container_rect = nav.get_bounding_client_rect();
    let button_rect = button.get_bounding_client_rect();
    let Some((left, width)) = indicator_metrics(
        container_rect.left(),
        container_rect.width(),
        button_rect.left(),
        button_rect.width(),
    ) else {
        return;
    };
    if animated {
        indicator.style().remove_property("transition").ok();
    } else {
        indicator.style().set_property("transition", "none").ok();
    }
    indicator
        .style()
        .set_property("left", &format!("{left}%"))
        .ok();
    indicator
        .style()
        .set_property("width", &format!("{width}%"))
        .ok();
}
