//! Fixed-step ground probe and velocity control
//!
//! Runs in `FixedUpdate` alongside the physics step. The probe refreshes
//! the grounded flag every step; the velocity controller then pushes the
//! body's horizontal velocity toward the classified target with a
//! per-axis capped velocity-change impulse. Vertical velocity belongs to
//! gravity and the jump impulse alone.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::rig::{ControllerBody, ProbeDebugMode};
use crate::settings::ControllerSettings;
use crate::state::{FirstPersonController, MoveState};

/// Velocity-change impulse that moves `current` toward the input's target
/// velocity.
///
/// The target is the planar input rotated by `facing` and scaled by
/// `speed`. The correction is clamped per horizontal axis to
/// `±max_change` and its vertical component is always zero.
pub fn velocity_change(facing: Quat, input: Vec2, speed: f32, current: Vec3, max_change: f32) -> Vec3 {
    // In Bevy: +X right, +Y up, -Z forward.
    let target = facing * Vec3::new(input.x, 0.0, -input.y) * speed;
    let mut change = target - current;
    change.x = change.x.clamp(-max_change, max_change);
    change.z = change.z.clamp(-max_change, max_change);
    change.y = 0.0;
    change
}

/// Consume a queued jump, reporting whether it fires.
///
/// The queue is cleared either way; a mid-air press is simply discarded.
/// A successful jump clears `grounded` on the spot, so a second jump
/// cannot fire before the next probe hit.
pub fn consume_jump(ctl: &mut FirstPersonController) -> bool {
    let fire = ctl.jump_queued && ctl.grounded;
    ctl.jump_queued = false;
    if fire {
        ctl.grounded = false;
    }
    fire
}

/// Refresh the grounded flag with a short downward raycast.
///
/// The ray starts half the collider height below the body origin and runs
/// along the body's local down axis. The body's own rigid body is
/// excluded so the capsule cannot ground itself.
pub fn probe_ground(
    settings: Res<ControllerSettings>,
    debug_mode: Res<ProbeDebugMode>,
    rapier_context: ReadRapierContext,
    mut gizmos: Gizmos,
    mut bodies: Query<(Entity, &Transform, &ControllerBody, &mut FirstPersonController)>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };

    for (entity, transform, body, mut ctl) in bodies.iter_mut() {
        let origin = transform.translation - Vec3::Y * body.half_height;
        let direction = transform.rotation * Vec3::NEG_Y;
        let filter = QueryFilter::default().exclude_rigid_body(entity);

        let hit = context.cast_ray(origin, direction, settings.probe_distance, true, filter);
        ctl.grounded = hit.is_some();

        if ctl.grounded && debug_mode.0 {
            gizmos.line(
                origin,
                origin + direction * settings.probe_distance,
                Color::srgb(1.0, 0.2, 0.2),
            );
        }
    }
}

/// Drive the body's velocity from the classified state and consume queued
/// jumps.
pub fn apply_movement(
    settings: Res<ControllerSettings>,
    mut bodies: Query<(&Transform, &mut Velocity, &mut FirstPersonController), With<ControllerBody>>,
) {
    for (transform, mut velocity, mut ctl) in bodies.iter_mut() {
        let speed = match ctl.state {
            MoveState::Walking => Some(settings.walk_speed),
            MoveState::Sprinting => Some(settings.sprint_speed),
            // No corrective force at rest or in the air; momentum decays
            // through the physics engine alone.
            MoveState::Still | MoveState::Airborne => None,
        };

        if let Some(speed) = speed {
            let change = velocity_change(
                transform.rotation,
                ctl.input_dir,
                speed,
                velocity.linvel,
                settings.max_velocity_change,
            );
            velocity.linvel += change;
        }

        if consume_jump(&mut ctl) {
            velocity.linvel.y += settings.jump_power;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn forward_walk_targets_walk_speed() {
        let change = velocity_change(Quat::IDENTITY, Vec2::new(0.0, 1.0), 5.0, Vec3::ZERO, 10.0);
        assert!((change - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-6);
    }

    #[test]
    fn sprint_targets_sprint_speed() {
        let change = velocity_change(Quat::IDENTITY, Vec2::new(0.0, 1.0), 7.0, Vec3::ZERO, 10.0);
        assert!((change.length() - 7.0).abs() < 1e-6);
    }

    #[test]
    fn facing_rotates_the_target() {
        // Quarter turn left puts forward along -X.
        let change = velocity_change(
            Quat::from_rotation_y(FRAC_PI_2),
            Vec2::new(0.0, 1.0),
            5.0,
            Vec3::ZERO,
            10.0,
        );
        assert!((change - Vec3::new(-5.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn correction_is_clamped_per_axis() {
        // Large opposing momentum: the raw delta is far beyond the cap on
        // both horizontal axes.
        let current = Vec3::new(40.0, 0.0, -35.0);
        let change = velocity_change(Quat::IDENTITY, Vec2::new(1.0, 1.0), 7.0, current, 10.0);
        assert_eq!(change.x, -10.0);
        assert_eq!(change.z, 10.0);
        assert_eq!(change.y, 0.0);
    }

    #[test]
    fn vertical_velocity_is_never_touched() {
        let falling = Vec3::new(0.0, -30.0, 0.0);
        let change = velocity_change(Quat::IDENTITY, Vec2::new(0.0, 1.0), 5.0, falling, 10.0);
        assert_eq!(change.y, 0.0);

        let rising = Vec3::new(2.0, 5.0, -1.0);
        let change = velocity_change(Quat::IDENTITY, Vec2::new(1.0, 0.0), 5.0, rising, 10.0);
        assert_eq!(change.y, 0.0);
    }

    #[test]
    fn diagonal_input_exceeds_nominal_speed() {
        // Unnormalized axes: a diagonal targets sqrt(2) times walk speed.
        let change = velocity_change(Quat::IDENTITY, Vec2::new(1.0, 1.0), 5.0, Vec3::ZERO, 10.0);
        assert!((change.length() - 5.0 * 2.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn correction_at_target_velocity_is_zero() {
        let current = Vec3::new(0.0, 0.0, -5.0);
        let change = velocity_change(Quat::IDENTITY, Vec2::new(0.0, 1.0), 5.0, current, 10.0);
        assert!(change.length() < 1e-6);
    }

    #[test]
    fn jump_fires_once_per_ground_contact() {
        let mut ctl = FirstPersonController {
            grounded: true,
            jump_queued: true,
            ..Default::default()
        };
        assert!(consume_jump(&mut ctl));
        assert!(!ctl.grounded, "a jump clears the grounded flag immediately");

        // Queuing again before the next probe hit does nothing.
        ctl.jump_queued = true;
        assert!(!consume_jump(&mut ctl));

        // After the probe reports contact again, a new jump can fire.
        ctl.grounded = true;
        ctl.jump_queued = true;
        assert!(consume_jump(&mut ctl));
    }

    #[test]
    fn airborne_press_is_discarded_not_buffered() {
        let mut ctl = FirstPersonController {
            grounded: false,
            jump_queued: true,
            ..Default::default()
        };
        assert!(!consume_jump(&mut ctl));
        assert!(!ctl.jump_queued, "the queue is consumed either way");

        // Landing later must not replay the stale press.
        ctl.grounded = true;
        assert!(!consume_jump(&mut ctl));
    }
}
