//! Cosmetic feedback: sprint FOV and head bob
//!
//! Both effects are pure presentation: they read the classified state and
//! touch only the camera projection and the joint's local translation.
//! Smoothing is a framerate-independent first-order low-pass, not a
//! fixed-duration tween.

use bevy::prelude::*;

use crate::rig::{CameraJoint, ControllerCamera, JointRest};
use crate::settings::ControllerSettings;
use crate::state::{FirstPersonController, MoveState};

/// Fraction of the remaining distance covered after `dt` at `rate`.
///
/// Never exceeds 1 for non-negative `dt`, so a step can land on the
/// target but never overshoot it.
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}

/// Joint displacement at a given bob phase. All axes share the phase.
pub fn bob_offset(phase: f32, amount: Vec3) -> Vec3 {
    amount * phase.sin()
}

/// FOV target for a state, radians. Only sprinting pushes the FOV out;
/// every other state eases back to base, airborne included.
pub fn fov_target(state: MoveState, settings: &ControllerSettings) -> f32 {
    if state == MoveState::Sprinting {
        settings.sprint_fov_radians()
    } else {
        settings.fov_radians()
    }
}

/// Ease the camera FOV toward the sprint or base target.
pub fn update_fov(
    settings: Res<ControllerSettings>,
    time: Res<Time>,
    controllers: Query<&FirstPersonController>,
    mut cameras: Query<&mut Projection, With<ControllerCamera>>,
) {
    let Ok(ctl) = controllers.single() else {
        return;
    };
    let Ok(mut projection) = cameras.single_mut() else {
        return;
    };
    let Projection::Perspective(ref mut persp) = *projection else {
        return;
    };

    let target = fov_target(ctl.state, &settings);
    let t = smoothing_factor(settings.sprint_fov_step, time.delta_secs());
    persp.fov += (target - persp.fov) * t;
}

/// Advance or decay the head-bob oscillation.
pub fn update_head_bob(
    settings: Res<ControllerSettings>,
    time: Res<Time>,
    mut controllers: Query<&mut FirstPersonController>,
    mut joints: Query<(&mut Transform, &JointRest), With<CameraJoint>>,
) {
    let Ok(mut ctl) = controllers.single_mut() else {
        return;
    };
    let Ok((mut joint_transform, rest)) = joints.single_mut() else {
        return;
    };
    let dt = time.delta_secs();

    match ctl.state {
        MoveState::Walking => {
            ctl.bob_timer += settings.bob_speed * dt;
            joint_transform.translation = rest.0 + bob_offset(ctl.bob_timer, settings.bob_amount);
        }
        MoveState::Sprinting => {
            ctl.bob_timer += (settings.bob_speed + settings.sprint_speed) * dt;
            joint_transform.translation = rest.0 + bob_offset(ctl.bob_timer, settings.bob_amount);
        }
        MoveState::Still => {
            ctl.bob_timer = 0.0;
            let t = smoothing_factor(settings.bob_speed, dt);
            joint_transform.translation = joint_transform.translation.lerp(rest.0, t);
        }
        // Mid-air the joint holds its last offset until landing.
        MoveState::Airborne => {}
    }
}
