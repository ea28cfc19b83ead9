//! Pure single-touch session state machine.
//!
//! Tracks one contact from first touch through the dead zone, axis
//! classification, and movement, with velocity sampled on a caller-driven
//! clock so the whole thing runs under test without a browser.

/// Displacement radius (px) below which a contact is still a tap.
pub const DEAD_ZONE: f64 = 16.0;
/// Squared dead-zone radius; motion with `dx*dx + dy*dy` below this is
/// ignored while armed.
pub const DEAD_ZONE_SQ: f64 = DEAD_ZONE * DEAD_ZONE;
/// Velocity sampling period in milliseconds.
pub const VELOCITY_SAMPLE_MS: u32 = 50;

/// Gesture kinds a watcher can bind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeKind {
    /// Any direction; the dominant axis is locked at the dead-zone
    /// crossing.
    Any,
    /// Requires |dy/dx| <= 0.5 at the crossing.
    Horizontal,
    /// Requires |dx/dy| <= 0.5 at the crossing.
    Vertical,
}

/// Axis locked once a session becomes active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Lifecycle notifications delivered to a watcher callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipePhase {
    Begin,
    Move,
    End,
    Cancel,
}

/// Snapshot handed to watcher callbacks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SwipeSample {
    pub x: f64,
    pub y: f64,
    /// Start point, projected onto the dead-zone radius once active.
    pub start_x: f64,
    pub start_y: f64,
    /// Viewport scroll offset captured at session start.
    pub scroll_x: f64,
    pub scroll_y: f64,
    /// Instantaneous velocity from the most recent sampling tick (px/s).
    pub velocity_x: f64,
    pub velocity_y: f64,
    /// Last nonzero velocity reading, so a momentary zero at lift-off
    /// does not erase fling intent.
    pub last_velocity_x: f64,
    pub last_velocity_y: f64,
}

/// Result of feeding a movement into an armed or active session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveOutcome {
    /// Still inside the dead zone; nothing to report.
    Pending,
    /// Dead zone crossed and the kind accepted the direction.
    Begin(SwipeSample),
    Move(SwipeSample),
    /// The kind's direction condition failed; the session must be
    /// cancelled.
    Rejected,
}

#[derive(Debug)]
pub struct TouchSession {
    contact_id: i32,
    start_x: f64,
    start_y: f64,
    x: f64,
    y: f64,
    scroll_x: f64,
    scroll_y: f64,
    // Baseline for the periodic velocity computation.
    sample_x: f64,
    sample_y: f64,
    sample_time: f64,
    velocity: (f64, f64),
    last_velocity: (f64, f64),
    active: bool,
    axis: Option<Axis>,
}

impl TouchSession {
    pub fn new(contact_id: i32, x: f64, y: f64, scroll_x: f64, scroll_y: f64, now_ms: f64) -> Self {
        Self {
            contact_id,
            start_x: x,
            start_y: y,
            x,
            y,
            scroll_x,
            scroll_y,
            sample_x: x,
            sample_y: y,
            sample_time: now_ms,
            velocity: (0.0, 0.0),
            last_velocity: (0.0, 0.0),
            active: false,
            axis: None,
        }
    }

    pub fn contact_id(&self) -> i32 {
        self.contact_id
    }

    /// Whether the dead zone has been crossed and `begin` reported.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn axis(&self) -> Option<Axis> {
        self.axis
    }

    /// Hand tracking over to another still-down contact. The start and
    /// velocity baselines shift by the position delta so the gesture path
    /// stays continuous.
    pub fn retarget(&mut self, contact_id: i32, x: f64, y: f64) {
        let dx = x - self.x;
        let dy = y - self.y;
        self.contact_id = contact_id;
        self.start_x += dx;
        self.start_y += dy;
        self.sample_x += dx;
        self.sample_y += dy;
        self.x = x;
        self.y = y;
    }

    /// Feed a movement of the tracked contact.
    pub fn move_to(&mut self, x: f64, y: f64, kind: SwipeKind) -> MoveOutcome {
        self.x = x;
        self.y = y;
        if self.active {
            return MoveOutcome::Move(self.sample());
        }

        let dx = x - self.start_x;
        let dy = y - self.start_y;
        let dist_sq = dx * dx + dy * dy;
        if dist_sq < DEAD_ZONE_SQ {
            return MoveOutcome::Pending;
        }

        let accepted = match kind {
            SwipeKind::Any => {
                self.axis = Some(if dx.abs() >= dy.abs() {
                    Axis::Horizontal
                } else {
                    Axis::Vertical
                });
                true
            }
            SwipeKind::Horizontal => {
                self.axis = Some(Axis::Horizontal);
                dy.abs() * 2.0 <= dx.abs()
            }
            SwipeKind::Vertical => {
                self.axis = Some(Axis::Vertical);
                dx.abs() * 2.0 <= dy.abs()
            }
        };
        if !accepted {
            return MoveOutcome::Rejected;
        }

        // Project the start point onto the dead-zone radius along the
        // motion direction; softens the first reported displacement under
        // coarse sampling.
        let dist = dist_sq.sqrt();
        self.start_x = x - dx / dist * DEAD_ZONE;
        self.start_y = y - dy / dist * DEAD_ZONE;
        self.active = true;
        MoveOutcome::Begin(self.sample())
    }

    /// Periodic velocity tick: position delta over elapsed wall time.
    pub fn sample_velocity(&mut self, now_ms: f64) {
        let dt = now_ms - self.sample_time;
        if dt <= 0.0 {
            return;
        }
        let vx = (self.x - self.sample_x) / dt * 1000.0;
        let vy = (self.y - self.sample_y) / dt * 1000.0;
        self.velocity = (vx, vy);
        if vx != 0.0 || vy != 0.0 {
            self.last_velocity = (vx, vy);
        }
        self.sample_x = self.x;
        self.sample_y = self.y;
        self.sample_time = now_ms;
    }

    pub fn sample(&self) -> SwipeSample {
        SwipeSample {
            x: self.x,
            y: self.y,
            start_x: self.start_x,
            start_y: self.start_y,
            scroll_x: self.scroll_x,
            scroll_y: self.scroll_y,
            velocity_x: self.velocity.0,
            velocity_y: self.velocity.1,
            last_velocity_x: self.last_velocity.0,
            last_velocity_y: self.last_velocity.1,
        }
    }
}
