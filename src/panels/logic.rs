//! Release-decision and geometry math for the panel strip.
//!
//! The thresholds are tuned interaction values; changing any of them
//! changes the feel of every swipe.

/// Release speed (px/s) that commits a transition regardless of distance.
pub const COMMIT_VELOCITY: f64 = 800.0;
/// Release speed (px/s) above which a snap-back uses the overshoot curve.
pub const OVERSHOOT_VELOCITY: f64 = 100.0;
/// Fraction of the panel width that must be dragged to commit.
pub const COMMIT_FRACTION: f64 = 1.0 / 3.0;
/// Strip animation duration; must match the CSS transition time.
pub const TRANSITION_MS: u32 = 250;

/// Easing curve applied to the strip animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    /// Symmetric curve for slow commits, snap-backs, and programmatic
    /// navigation.
    EaseInOut,
    /// Fast ease-out for fling-triggered commits.
    FlingOut,
    /// Slight overshoot for a quick release that did not reach the
    /// reversal threshold.
    Overshoot,
}

impl Easing {
    pub fn css(self) -> &'static str {
        match self {
            Easing::EaseInOut => "ease-in-out",
            Easing::FlingOut => "cubic-bezier(0.165, 0.84, 0.44, 1.0)",
            Easing::Overshoot => "cubic-bezier(0.175, 0.885, 0.32, 1.275)",
        }
    }
}

/// What to do when the finger lifts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Advance to the "after" neighbor.
    CommitNext(Easing),
    /// Return to the "before" neighbor.
    CommitPrev(Easing),
    /// Stay on the current panel.
    SnapBack(Easing),
}

/// Clamp a live drag offset so the strip cannot be pulled past a missing
/// neighbor.
pub fn clamp_drag(offset: f64, width: f64, has_before: bool, has_after: bool) -> f64 {
    let min = if has_after { -width } else { 0.0 };
    let max = if has_before { width } else { 0.0 };
    offset.clamp(min, max)
}

/// Decide the outcome of a release from drag offset, instantaneous
/// release velocity, and the retained last-nonzero velocity.
pub fn decide_release(
    offset: f64,
    width: f64,
    velocity: f64,
    last_velocity: f64,
    has_before: bool,
    has_after: bool,
) -> ReleaseOutcome {
    let threshold = width * COMMIT_FRACTION;
    if has_after && velocity <= -COMMIT_VELOCITY {
        return ReleaseOutcome::CommitNext(Easing::FlingOut);
    }
    if has_after && offset <= -threshold && last_velocity < 0.0 {
        return ReleaseOutcome::CommitNext(Easing::EaseInOut);
    }
    if has_before && velocity >= COMMIT_VELOCITY {
        return ReleaseOutcome::CommitPrev(Easing::FlingOut);
    }
    if has_before && offset >= threshold && last_velocity > 0.0 {
        return ReleaseOutcome::CommitPrev(Easing::EaseInOut);
    }
    let crossed = offset.abs() >= threshold;
    if velocity.abs() > OVERSHOOT_VELOCITY && !crossed {
        ReleaseOutcome::SnapBack(Easing::Overshoot)
    } else {
        ReleaseOutcome::SnapBack(Easing::EaseInOut)
    }
}

/// Indicator bar placement as `(left, width)` percentages of the nav
/// container, from the container's and the target button's bounding
/// boxes. `None` when the container has no extent yet.
pub fn indicator_metrics(
    container_left: f64,
    container_width: f64,
    button_left: f64,
    button_width: f64,
) -> Option<(f64, f64)> {
    if container_width <= 0.0 {
        return None;
    }
    Some((
        (button_left - container_left) / container_width * 100.0,
        button_width / container_width * 100.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f64 = 320.0;

    #[test]
    fn drag_clamps_against_missing_neighbors() {
        assert_eq!(clamp_drag(-500.0, W, true, true), -W);
        assert_eq!(clamp_drag(500.0, W, true, true), W);
        assert_eq!(clamp_drag(-150.0, W, true, false), 0.0);
        assert_eq!(clamp_drag(150.0, W, false, true), 0.0);
        assert_eq!(clamp_drag(-150.0, W, false, true), -150.0);
    }

    #[test]
    fn fling_commits_regardless_of_distance() {
        assert_eq!(
            decide_release(-20.0, W, -900.0, -900.0, true, true),
            ReleaseOutcome::CommitNext(Easing::FlingOut)
        );
        assert_eq!(
            decide_release(20.0, W, 900.0, 900.0, true, true),
            ReleaseOutcome::CommitPrev(Easing::FlingOut)
        );
    }

    #[test]
    fn third_of_width_with_matching_intent_commits() {
        let offset = -(W / 3.0 + 1.0);
        assert_eq!(
            decide_release(offset, W, 0.0, -50.0, true, true),
            ReleaseOutcome::CommitNext(Easing::EaseInOut)
        );
        assert_eq!(
            decide_release(W / 3.0 + 1.0, W, 0.0, 50.0, true, true),
            ReleaseOutcome::CommitPrev(Easing::EaseInOut)
        );
    }

    #[test]
    fn threshold_without_matching_intent_snaps_back() {
        // Dragged far but the last motion was back toward center.
        assert_eq!(
            decide_release(-(W / 3.0 + 1.0), W, 0.0, 60.0, true, true),
            ReleaseOutcome::SnapBack(Easing::EaseInOut)
        );
    }

    #[test]
    fn slow_release_snaps_back_symmetrically() {
        assert_eq!(
            decide_release(0.0, W, 40.0, 40.0, true, true),
            ReleaseOutcome::SnapBack(Easing::EaseInOut)
        );
    }

    #[test]
    fn quick_release_under_threshold_overshoots() {
        assert_eq!(
            decide_release(-60.0, W, -300.0, -300.0, true, false),
            ReleaseOutcome::SnapBack(Easing::Overshoot)
        );
    }

    #[test]
    fn missing_neighbor_blocks_commit() {
        assert_eq!(
            decide_release(-200.0, W, -900.0, -900.0, true, false),
            ReleaseOutcome::SnapBack(Easing::EaseInOut)
        );
        assert_eq!(
            decide_release(200.0, W, 900.0, 900.0, false, true),
            ReleaseOutcome::SnapBack(Easing::EaseInOut)
        );
    }

    #[test]
    fn indicator_percentages() {
        assert_eq!(
            indicator_metrics(100.0, 400.0, 200.0, 100.0),
            Some((25.0, 25.0))
        );
        assert_eq!(indicator_metrics(0.0, 0.0, 0.0, 10.0), None);
    }
}
