//! Per-frame input sampling
//!
//! Mouse motion folds into yaw/pitch; yaw is applied to the body transform
//! and pitch to the camera's local rotation only, so the physics body
//! never tilts. Movement keys sample into a planar vector, the classifier
//! runs on it, and jump edges latch for the fixed schedule (a frame can
//! see zero or several fixed steps, so `just_pressed` cannot be read
//! there).

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

use crate::rig::{ControllerBody, ControllerCamera};
use crate::settings::ControllerSettings;
use crate::state::{classify, FirstPersonController};

/// Fold one frame of mouse travel into `(yaw, pitch)`.
///
/// Pitch is clamped after the delta is applied, so the returned value is
/// always inside the limit. Yaw wraps only to keep the float
/// well-conditioned; wrapping never changes the facing.
pub fn fold_look(yaw: f32, pitch: f32, delta: Vec2, sensitivity: f32, max_pitch: f32) -> (f32, f32) {
    let mut yaw = yaw - delta.x * sensitivity;
    let pitch = (pitch - delta.y * sensitivity).clamp(-max_pitch, max_pitch);
    if yaw.abs() > PI {
        yaw = yaw.rem_euclid(TAU);
    }
    (yaw, pitch)
}

/// Apply mouse look to the body (yaw) and camera (pitch).
pub fn sample_look(
    settings: Res<ControllerSettings>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut bodies: Query<(&mut Transform, &mut FirstPersonController), With<ControllerBody>>,
    mut cameras: Query<&mut Transform, (With<ControllerCamera>, Without<ControllerBody>)>,
) {
    let mut delta = Vec2::ZERO;
    for motion in mouse_motion.read() {
        delta += motion.delta;
    }

    if !settings.look_enabled {
        return;
    }

    let Ok((mut body_transform, mut ctl)) = bodies.single_mut() else {
        return;
    };

    let (yaw, pitch) = fold_look(
        ctl.yaw,
        ctl.pitch,
        delta,
        settings.mouse_sensitivity,
        settings.max_look_angle_radians(),
    );
    ctl.yaw = yaw;
    ctl.pitch = pitch;

    body_transform.rotation = Quat::from_rotation_y(ctl.yaw);

    let Ok(mut camera_transform) = cameras.single_mut() else {
        return;
    };
    camera_transform.rotation = Quat::from_rotation_x(ctl.pitch);
}

/// Sample movement keys, classify the state and latch jump edges.
pub fn sample_movement(
    settings: Res<ControllerSettings>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut controllers: Query<&mut FirstPersonController, With<ControllerBody>>,
) {
    let Ok(mut ctl) = controllers.single_mut() else {
        return;
    };

    let mut input = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        input.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        input.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        input.x += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        input.x -= 1.0;
    }
    if !settings.movement_enabled {
        input = Vec2::ZERO;
    }

    ctl.input_dir = input;
    ctl.state = classify(ctl.grounded, input, keyboard.pressed(settings.sprint_key));

    if settings.movement_enabled && keyboard.just_pressed(settings.jump_key) {
        ctl.jump_queued = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_PITCH: f32 = 0.8727; // 50 degrees

    #[test]
    fn pitch_clamp_holds_after_every_update() {
        let mut yaw = 0.0;
        let mut pitch = 0.0;
        for delta in [
            Vec2::new(0.0, 10_000.0),
            Vec2::new(0.0, -25_000.0),
            Vec2::new(3.0, 40.0),
            Vec2::new(-7.0, -3.0),
            Vec2::ZERO,
        ] {
            let (y, p) = fold_look(yaw, pitch, delta, 0.003, MAX_PITCH);
            yaw = y;
            pitch = p;
            assert!((-MAX_PITCH..=MAX_PITCH).contains(&pitch), "pitch {pitch} out of range");
        }
    }

    #[test]
    fn pitch_saturates_and_recovers_immediately() {
        // Mouse down by a huge amount pins pitch to the lower limit.
        let (_, pitch) = fold_look(0.0, 0.0, Vec2::new(0.0, 1.0e6), 0.003, MAX_PITCH);
        assert_eq!(pitch, -MAX_PITCH);
        // The very next upward motion moves off the limit; the clamp never
        // lags a frame behind.
        let (_, pitch) = fold_look(0.0, pitch, Vec2::new(0.0, -200.0), 0.003, MAX_PITCH);
        assert!(pitch > -MAX_PITCH);
    }

    #[test]
    fn yaw_wrap_preserves_facing() {
        let raw = -PI + 0.05 - 100.0 * 0.003;
        let (yaw, _) = fold_look(-PI + 0.05, 0.0, Vec2::new(100.0, 0.0), 0.003, MAX_PITCH);
        assert!(yaw >= 0.0 && yaw < TAU);
        let before = Quat::from_rotation_y(raw) * Vec3::NEG_Z;
        let after = Quat::from_rotation_y(yaw) * Vec3::NEG_Z;
        assert!((before - after).length() < 1e-4);
    }

    #[test]
    fn zero_delta_is_identity() {
        let (yaw, pitch) = fold_look(1.25, -0.4, Vec2::ZERO, 0.003, MAX_PITCH);
        assert_eq!(yaw, 1.25);
        assert_eq!(pitch, -0.4);
    }
}
