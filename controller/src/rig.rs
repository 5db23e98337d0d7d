//! Rig markers and activation
//!
//! The embedding app tags three entities: the physics body, a camera-mount
//! joint child, and a camera grandchild. Activation validates that wiring
//! once, captures the joint rest offset, seeds the look angles, and locks
//! the cursor. A malformed rig is a configuration error and panics with
//! the missing piece named, rather than failing mid-loop later.

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};
use bevy_rapier3d::prelude::*;

use crate::settings::ControllerSettings;
use crate::state::FirstPersonController;

/// Avatar physics body. Yaw is written to this entity's transform.
#[derive(Component)]
pub struct ControllerBody {
    /// Half the collider's total height, meters. The ground probe starts
    /// this far below the body origin.
    pub half_height: f32,
}

/// Camera-mount joint between body and camera. Head bob displaces this
/// entity's local translation.
#[derive(Component)]
pub struct CameraJoint;

/// Joint local translation captured at activation; the rest pose head bob
/// decays back to.
#[derive(Component)]
pub struct JointRest(pub Vec3);

/// First-person camera. Pitch is written to this entity's local rotation.
#[derive(Component)]
pub struct ControllerCamera;

/// Draw the ground probe ray while it reports a hit.
#[derive(Resource, Default)]
pub struct ProbeDebugMode(pub bool);

/// Validate and activate newly added rigs.
///
/// Inserts [`FirstPersonController`] on the body (yaw seeded from the
/// spawn orientation), captures [`JointRest`], sets the base FOV and locks
/// the cursor to the window.
pub fn activate_rigs(
    mut commands: Commands,
    settings: Res<ControllerSettings>,
    bodies: Query<
        (
            Entity,
            &Transform,
            Option<&RigidBody>,
            Option<&Velocity>,
            Option<&Children>,
        ),
        Added<ControllerBody>,
    >,
    joints: Query<(Entity, &Transform, Option<&Children>), With<CameraJoint>>,
    mut cameras: Query<&mut Projection, With<ControllerCamera>>,
    windows: Query<Entity, With<PrimaryWindow>>,
    mut cursor_opts: Query<&mut CursorOptions>,
) {
    for (body, body_transform, rigid_body, velocity, children) in bodies.iter() {
        match rigid_body {
            Some(RigidBody::Dynamic) => {}
            Some(_) => panic!("Controller body {body:?} must have a dynamic RigidBody"),
            None => panic!("Controller body {body:?} is missing a RigidBody"),
        }
        if velocity.is_none() {
            panic!("Controller body {body:?} is missing a Velocity component");
        }

        let Some((joint, joint_transform, joint_children)) = children
            .into_iter()
            .flat_map(|c| c.iter())
            .find_map(|child| joints.get(child).ok())
        else {
            panic!("Controller body {body:?} has no CameraJoint child");
        };

        let Some(camera) = joint_children
            .into_iter()
            .flat_map(|c| c.iter())
            .find(|child| cameras.contains(*child))
        else {
            panic!("CameraJoint {joint:?} has no ControllerCamera child");
        };

        if let Ok(mut projection) = cameras.get_mut(camera) {
            let Projection::Perspective(ref mut persp) = *projection else {
                panic!("ControllerCamera {camera:?} must use a perspective projection");
            };
            persp.fov = settings.fov_radians();
        }

        // Facing continues from however the rig was spawned.
        let (yaw, _, _) = body_transform.rotation.to_euler(EulerRot::YXZ);
        commands.entity(body).insert(FirstPersonController {
            yaw,
            ..default()
        });
        commands
            .entity(joint)
            .insert(JointRest(joint_transform.translation));

        // Lock the mouse to the window, the way every first-person scheme
        // expects. Skipped when there is no window (headless).
        if let Ok(window_entity) = windows.single() {
            if let Ok(mut cursor) = cursor_opts.get_mut(window_entity) {
                cursor.grab_mode = CursorGrabMode::Locked;
                cursor.visible = false;
            }
        }

        info!("First-person rig activated for {body:?}");
    }
}
