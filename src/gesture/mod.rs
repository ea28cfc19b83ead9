//! Touch gesture recognition.
//!
//! [`TouchSwipe`] listens to the window's touch events, tracks a single
//! session at a time, and forwards begin/move/end/cancel notifications to
//! the registered watcher whose scope contains the touch origin. The
//! session mechanics (dead zone, axis lock, velocity) live in
//! [`session`] and are pure.

pub mod session;

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Interval;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, KeyboardEvent, Node, Touch, TouchEvent};

use crate::util;
pub use session::{
    Axis, MoveOutcome, SwipeKind, SwipePhase, SwipeSample, TouchSession, DEAD_ZONE, DEAD_ZONE_SQ,
    VELOCITY_SAMPLE_MS,
};

/// Watcher callback. The return value is only consulted for
/// [`SwipePhase::Begin`]; returning `false` there vetoes the session.
pub type SwipeCallback = Rc<dyn Fn(SwipePhase, &SwipeSample) -> bool>;

/// Predicate run against the touch's origin element before a watcher may
/// claim a session.
pub type AcceptPredicate = Rc<dyn Fn(&Element) -> bool>;

/// Registration token; keep it to [`TouchSwipe::unregister`] later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WatcherHandle(usize);

struct Watcher {
    id: usize,
    scope: Option<Element>,
    kind: SwipeKind,
    callback: SwipeCallback,
    accept: Option<AcceptPredicate>,
}

impl Watcher {
    fn claims(&self, origin: &Element) -> bool {
        let contained = match &self.scope {
            None => true,
            Some(scope) => {
                let node: &Node = origin.as_ref();
                scope.contains(Some(node))
            }
        };
        contained && self.accept.as_ref().is_none_or(|accept| accept(origin))
    }
}

/// While a session exists, default scrolling is suppressed globally;
/// dropping the lock releases it. One lock per session.
struct ScrollLock {
    _listeners: Vec<EventListener>,
}

impl ScrollLock {
    fn new() -> Self {
        let window = util::window();
        let listeners = vec![
            EventListener::new_with_options(
                &window,
                "touchmove",
                EventListenerOptions::enable_prevent_default(),
                |e| e.prevent_default(),
            ),
            EventListener::new_with_options(
                &window,
                "wheel",
                EventListenerOptions::enable_prevent_default(),
                |e| e.prevent_default(),
            ),
            EventListener::new_with_options(
                &window,
                "keydown",
                EventListenerOptions::enable_prevent_default(),
                |e| {
                    if let Some(ke) = e.dyn_ref::<KeyboardEvent>() {
                        if is_scroll_key(&ke.code()) {
                            e.prevent_default();
                        }
                    }
                },
            ),
        ];
        Self {
            _listeners: listeners,
        }
    }
}

fn is_scroll_key(code: &str) -> bool {
    matches!(
        code,
        "Space"
            | "ArrowUp"
            | "ArrowDown"
            | "ArrowLeft"
            | "ArrowRight"
            | "PageUp"
            | "PageDown"
            | "Home"
            | "End"
    )
}

struct ActiveSession {
    owner: usize,
    kind: SwipeKind,
    callback: SwipeCallback,
    session: TouchSession,
    _velocity_tick: Interval,
    _scroll_lock: ScrollLock,
}

struct Inner {
    watchers: Vec<Watcher>,
    next_id: usize,
    session: Option<ActiveSession>,
}

/// Owned recognizer instance; construct once at startup.
pub struct TouchSwipe {
    inner: Rc<RefCell<Inner>>,
    _listeners: Vec<EventListener>,
}

impl TouchSwipe {
    pub fn new() -> Self {
        let inner = Rc::new(RefCell::new(Inner {
            watchers: Vec::new(),
            next_id: 0,
            session: None,
        }));
        let window = util::window();
        let listeners = vec![
            EventListener::new(&window, "touchstart", {
                let inner = inner.clone();
                move |e| on_touch_start(&inner, e)
            }),
            EventListener::new_with_options(
                &window,
                "touchmove",
                EventListenerOptions::enable_prevent_default(),
                {
                    let inner = inner.clone();
                    move |e| on_touch_move(&inner, e)
                },
            ),
            EventListener::new(&window, "touchend", {
                let inner = inner.clone();
                move |e| on_touch_end(&inner, e)
            }),
            EventListener::new(&window, "touchcancel", {
                let inner = inner.clone();
                move |e| {
                    if e.dyn_ref::<TouchEvent>().is_some() {
                        cancel_session(&inner);
                    }
                }
            }),
        ];
        Self {
            inner,
            _listeners: listeners,
        }
    }

    /// Register a watcher over `scope` (`None` watches everywhere).
    pub fn register(
        &self,
        scope: Option<&Element>,
        kind: SwipeKind,
        callback: impl Fn(SwipePhase, &SwipeSample) -> bool + 'static,
        accept: Option<AcceptPredicate>,
    ) -> WatcherHandle {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.watchers.push(Watcher {
            id,
            scope: scope.cloned(),
            kind,
            callback: Rc::new(callback),
            accept,
        });
        WatcherHandle(id)
    }

    /// Remove a watcher. If it owns the current session, the session is
    /// cancelled first. Returns whether the handle was registered.
    pub fn unregister(&self, handle: WatcherHandle) -> bool {
        let owns = self
            .inner
            .borrow()
            .session
            .as_ref()
            .is_some_and(|s| s.owner == handle.0);
        if owns {
            cancel_session(&self.inner);
        }
        let mut inner = self.inner.borrow_mut();
        let before = inner.watchers.len();
        inner.watchers.retain(|w| w.id != handle.0);
        inner.watchers.len() != before
    }
}

fn touch_point(touch: &Touch) -> (f64, f64) {
    (touch.client_x() as f64, touch.client_y() as f64)
}

fn touch_origin(touch: &Touch, event: &Event) -> Option<Element> {
    touch
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .or_else(|| event.target()?.dyn_into::<Element>().ok())
}

/// Locate the tracked contact in a touch list.
fn find_touch(touches: &web_sys::TouchList, id: i32) -> Option<Touch> {
    (0..touches.length())
        .filter_map(|i| touches.item(i))
        .find(|t| t.identifier() == id)
}

fn on_touch_start(inner: &Rc<RefCell<Inner>>, event: &Event) {
    let Some(te) = event.dyn_ref::<TouchEvent>() else {
        return;
    };
    let mut state = inner.borrow_mut();
    // Only one session at a time; extra fingers are handled as
    // replacements in move/end.
    if state.session.is_some() {
        return;
    }
    let Some(touch) = te.changed_touches().item(0) else {
        return;
    };
    let Some(origin) = touch_origin(&touch, event) else {
        return;
    };
    let (owner, kind, callback) = match state.watchers.iter().find(|w| w.claims(&origin)) {
        Some(w) => (w.id, w.kind, w.callback.clone()),
        None => return,
    };
    let (x, y) = touch_point(&touch);
    let session = TouchSession::new(
        touch.identifier(),
        x,
        y,
        util::page_scroll_x(),
        util::page_scroll_y(),
        js_sys::Date::now(),
    );
    let velocity_tick = Interval::new(VELOCITY_SAMPLE_MS, {
        let inner = inner.clone();
        move || {
            if let Some(active) = inner.borrow_mut().session.as_mut() {
                active.session.sample_velocity(js_sys::Date::now());
            }
        }
    });
    state.session = Some(ActiveSession {
        owner,
        kind,
        callback,
        session,
        _velocity_tick: velocity_tick,
        _scroll_lock: ScrollLock::new(),
    });
}

fn on_touch_move(inner: &Rc<RefCell<Inner>>, event: &Event) {
    let Some(te) = event.dyn_ref::<TouchEvent>() else {
        return;
    };
    let mut state = inner.borrow_mut();
    let Some(active) = state.session.as_mut() else {
        return;
    };
    event.prevent_default();

    let touches = te.touches();
    let touch = match find_touch(&touches, active.session.contact_id()) {
        Some(t) => t,
        None => {
            // Tracked finger disappeared mid-move; continue the path on
            // whichever is still down.
            let Some(t) = touches.item(0) else {
                return;
            };
            let (x, y) = touch_point(&t);
            active.session.retarget(t.identifier(), x, y);
            return;
        }
    };
    let (x, y) = touch_point(&touch);
    let outcome = active.session.move_to(x, y, active.kind);
    let callback = active.callback.clone();
    drop(state);

    match outcome {
        MoveOutcome::Pending => {}
        MoveOutcome::Begin(sample) => {
            if !callback(SwipePhase::Begin, &sample) {
                cancel_session(inner);
            }
        }
        MoveOutcome::Move(sample) => {
            callback(SwipePhase::Move, &sample);
        }
        MoveOutcome::Rejected => cancel_session(inner),
    }
}

fn on_touch_end(inner: &Rc<RefCell<Inner>>, event: &Event) {
    let Some(te) = event.dyn_ref::<TouchEvent>() else {
        return;
    };
    let mut state = inner.borrow_mut();
    let touches = te.touches();
    if touches.length() > 0 {
        if let Some(active) = state.session.as_mut() {
            if find_touch(&touches, active.session.contact_id()).is_none() {
                if let Some(t) = touches.item(0) {
                    let (x, y) = touch_point(&t);
                    active.session.retarget(t.identifier(), x, y);
                }
            }
        }
        return;
    }

    // Last contact lifted: an armed session dissolves silently, an
    // active one ends.
    let Some(active) = state.session.take() else {
        return;
    };
    let was_active = active.session.is_active();
    let sample = active.session.sample();
    let callback = active.callback.clone();
    drop(state);
    drop(active); // clears the velocity tick and the scroll lock
    if was_active {
        callback(SwipePhase::End, &sample);
    }
}

/// Tear down the current session, delivering `cancel` to its owner.
fn cancel_session(inner: &Rc<RefCell<Inner>>) {
    let taken = inner.borrow_mut().session.take();
    if let Some(active) = taken {
        let sample = active.session.sample();
        (active.callback)(SwipePhase::Cancel, &sample);
    }
}
