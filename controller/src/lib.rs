//! First-person locomotion controller
//!
//! Translates mouse look, movement axes and sprint/jump keys into camera
//! orientation and rigid-body motion for a capsule avatar, with sprint
//! FOV and head-bob feedback on top. The embedding app spawns a rig
//! (body → camera joint → camera, see [`rig`]) and adds
//! [`ControllerPlugin`]; the schedules drive everything else.
//!
//! Frame-rate systems sample input, classify movement and run the
//! cosmetic feedback. Fixed-rate systems probe the ground and steer the
//! rigid body.

pub mod feedback;
pub mod input;
pub mod movement;
pub mod rig;
pub mod settings;
pub mod state;

pub use feedback::{bob_offset, fov_target, smoothing_factor};
pub use input::fold_look;
pub use movement::{consume_jump, velocity_change};
pub use rig::{CameraJoint, ControllerBody, ControllerCamera, JointRest, ProbeDebugMode};
pub use settings::ControllerSettings;
pub use state::{classify, FirstPersonController, MoveState};

use bevy::prelude::*;

/// Registers the controller systems and resources.
///
/// `Update`: rig activation, input sampling, then cosmetic feedback.
/// `FixedUpdate`: ground probe, then velocity control. The physics engine
/// is expected to step in the fixed schedule as well.
///
/// Settings inserted before this plugin (for example loaded from a file)
/// are kept; otherwise defaults are used.
pub struct ControllerPlugin;

impl Plugin for ControllerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ControllerSettings>()
            .init_resource::<ProbeDebugMode>()
            .add_systems(
                Update,
                (
                    rig::activate_rigs,
                    input::sample_look,
                    input::sample_movement,
                    feedback::update_fov,
                    feedback::update_head_bob,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (movement::probe_ground, movement::apply_movement).chain(),
            );
    }
}
