//! Sandbox level for the first-person controller
//!
//! A flat slab with scattered crates, a ramp and a staircase to walk,
//! sprint and jump around on. F3 toggles the ground-probe debug ray,
//! Escape releases the cursor, left click grabs it again.

mod overlay;
mod world;

use std::path::Path;

use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow, WindowResolution};
use bevy_rapier3d::prelude::*;

use controller::{ControllerPlugin, ControllerSettings, ProbeDebugMode};

/// Physics tick rate, Hz.
const FIXED_TIMESTEP_HZ: f64 = 60.0;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Locomotion Sandbox".to_string(),
                resolution: WindowResolution::new(1280, 720),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
        .insert_resource(Time::<Fixed>::from_hz(FIXED_TIMESTEP_HZ))
        .insert_resource(ControllerSettings::load_or_default(Path::new(
            "controller.ron",
        )))
        .add_plugins(ControllerPlugin)
        .add_systems(
            Startup,
            (world::spawn_world, world::spawn_avatar, overlay::spawn_overlay),
        )
        .add_systems(
            Update,
            (handle_cursor_toggle, toggle_probe_debug, overlay::update_overlay),
        )
        .run();
}

/// Escape releases the cursor so the window can be left; left click locks
/// it again.
fn handle_cursor_toggle(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<Entity, With<PrimaryWindow>>,
    mut cursor_opts: Query<&mut CursorOptions>,
) {
    let Ok(window_entity) = windows.single() else {
        return;
    };
    let Ok(mut cursor) = cursor_opts.get_mut(window_entity) else {
        return;
    };

    if keyboard.just_pressed(KeyCode::Escape) {
        cursor.grab_mode = CursorGrabMode::None;
        cursor.visible = true;
    }
    if mouse_button.just_pressed(MouseButton::Left) && cursor.grab_mode != CursorGrabMode::Locked {
        cursor.grab_mode = CursorGrabMode::Locked;
        cursor.visible = false;
    }
}

/// F3 toggles the ground-probe debug ray.
fn toggle_probe_debug(keyboard: Res<ButtonInput<KeyCode>>, mut debug_mode: ResMut<ProbeDebugMode>) {
    if keyboard.just_pressed(KeyCode::F3) {
        debug_mode.0 = !debug_mode.0;
        info!(
            "Probe debug ray: {}",
            if debug_mode.0 { "on" } else { "off" }
        );
    }
}
