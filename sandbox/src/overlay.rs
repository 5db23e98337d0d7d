//! FPS and movement state overlay

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use controller::{ControllerBody, FirstPersonController};

/// Marker for the overlay text block.
#[derive(Component)]
pub struct OverlayText;

/// Spawn the overlay in the top-left corner.
pub fn spawn_overlay(mut commands: Commands) {
    commands.spawn((
        OverlayText,
        Text::new("WASD move, Shift sprint, Space jump"),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgb(0.9, 0.9, 0.9)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            ..default()
        },
        Pickable::IGNORE,
    ));
}

/// Refresh the overlay with FPS, movement state and horizontal speed.
pub fn update_overlay(
    diagnostics: Res<DiagnosticsStore>,
    controllers: Query<(&FirstPersonController, &Velocity), With<ControllerBody>>,
    mut texts: Query<&mut Text, With<OverlayText>>,
) {
    let Ok(mut text) = texts.single_mut() else {
        return;
    };
    let Ok((ctl, velocity)) = controllers.single() else {
        return;
    };

    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|d| d.smoothed())
        .unwrap_or(0.0);
    let horizontal = Vec2::new(velocity.linvel.x, velocity.linvel.z).length();

    text.0 = format!(
        "FPS: {fps:.0}\n{:?}{}  {horizontal:.1} m/s\nWASD move, Shift sprint, Space jump\nF3 probe ray, Esc releases the cursor",
        ctl.state,
        if ctl.grounded { " (grounded)" } else { "" },
    );
}
