//! Movement state and per-tick controller state
//!
//! The state machine is deliberately memoryless: [`classify`] recomputes
//! the tag every frame from `(grounded, input, sprint held)` and nothing
//! else. The only cross-frame effect is the tag's continuous influence on
//! the bob phase.

use bevy::prelude::*;

/// Movement intent for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MoveState {
    /// Grounded with no planar input.
    #[default]
    Still,
    /// Grounded with planar input held.
    Walking,
    /// Walking with the sprint key held.
    Sprinting,
    /// No ground contact. Receives no corrective force.
    Airborne,
}

/// Classify movement intent from this frame's raw inputs.
///
/// No transition guards or hysteresis: a single-frame input spike flips
/// the state immediately.
pub fn classify(grounded: bool, input: Vec2, sprint_held: bool) -> MoveState {
    if !grounded {
        MoveState::Airborne
    } else if input != Vec2::ZERO {
        if sprint_held {
            MoveState::Sprinting
        } else {
            MoveState::Walking
        }
    } else {
        MoveState::Still
    }
}

/// Per-tick controller state, one instance per avatar body.
///
/// Written by the frame-rate sampling systems and read/written by the
/// fixed-rate physics systems. Both access it `&mut`, so the scheduler
/// never runs them concurrently.
#[derive(Component, Debug, Default)]
pub struct FirstPersonController {
    /// Facing angle around Y, radians. Applied to the body transform.
    pub yaw: f32,
    /// Look angle around X, radians, clamped to the configured limit.
    /// Applied to the camera only; the body never pitches.
    pub pitch: f32,
    /// Planar movement input, x = strafe right, y = forward. Components
    /// stay in {-1, 0, 1}; intentionally not normalized.
    pub input_dir: Vec2,
    /// Movement intent classified this frame.
    pub state: MoveState,
    /// Result of the most recent ground probe. Cleared immediately by a
    /// successful jump.
    pub grounded: bool,
    /// Jump edge latched by the frame schedule, consumed by the next
    /// fixed step.
    pub jump_queued: bool,
    /// Head-bob phase. Advances only while moving on the ground.
    pub bob_timer: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn airborne_wins_regardless_of_input() {
        assert_eq!(classify(false, Vec2::ZERO, false), MoveState::Airborne);
        assert_eq!(classify(false, Vec2::new(0.0, 1.0), false), MoveState::Airborne);
        assert_eq!(classify(false, Vec2::new(1.0, 1.0), true), MoveState::Airborne);
    }

    #[test]
    fn grounded_without_input_is_still() {
        assert_eq!(classify(true, Vec2::ZERO, false), MoveState::Still);
        // The sprint key alone does not sprint.
        assert_eq!(classify(true, Vec2::ZERO, true), MoveState::Still);
    }

    #[test]
    fn grounded_input_walks_and_sprints() {
        assert_eq!(classify(true, Vec2::new(0.0, 1.0), false), MoveState::Walking);
        assert_eq!(classify(true, Vec2::new(0.0, 1.0), true), MoveState::Sprinting);
        // Either axis alone counts as input.
        assert_eq!(classify(true, Vec2::new(-1.0, 0.0), false), MoveState::Walking);
        assert_eq!(classify(true, Vec2::new(0.0, -1.0), true), MoveState::Sprinting);
    }

    #[test]
    fn controller_starts_at_rest() {
        let ctl = FirstPersonController::default();
        assert_eq!(ctl.state, MoveState::Still);
        assert_eq!(ctl.bob_timer, 0.0);
        assert!(!ctl.jump_queued);
        assert!(!ctl.grounded);
    }
}
