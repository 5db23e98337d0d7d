//! Controller tuning
//!
//! Every tunable the controller exposes, gathered into one resource. The
//! defaults are the classic arcade feel: 5 m/s walk, 7 m/s sprint, a
//! 10 m/s per-step correction cap and a 60°→80° sprint FOV push.
//!
//! An optional RON file can override any subset of fields. A malformed
//! file logs a warning and falls back to defaults instead of blocking
//! startup.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Locomotion, look and feedback tuning.
///
/// Angles are stored in degrees (they read better in a settings file) and
/// converted at the point of use.
#[derive(Resource, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    /// Mouse look enabled.
    pub look_enabled: bool,
    /// Radians of rotation per pixel of mouse travel.
    pub mouse_sensitivity: f32,
    /// Pitch limit above/below the horizon, degrees.
    pub max_look_angle: f32,

    /// Base vertical field of view, degrees.
    pub fov: f32,
    /// Field of view while sprinting, degrees.
    pub sprint_fov: f32,
    /// Rate of the FOV low-pass, 1/s. Higher snaps faster.
    pub sprint_fov_step: f32,

    /// Movement input enabled (jump included).
    pub movement_enabled: bool,
    /// Walk speed, m/s.
    pub walk_speed: f32,
    /// Sprint speed, m/s.
    pub sprint_speed: f32,
    /// Per-axis cap on the velocity correction applied in a single
    /// physics step, m/s.
    pub max_velocity_change: f32,
    /// Upward velocity added by a jump, m/s.
    pub jump_power: f32,

    pub sprint_key: KeyCode,
    pub jump_key: KeyCode,

    /// Bob phase advance per second while walking. Sprinting adds
    /// `sprint_speed` on top.
    pub bob_speed: f32,
    /// Per-axis bob displacement at the phase peak, meters.
    pub bob_amount: Vec3,

    /// Ground probe length, meters. The ray starts half the collider
    /// height below the body origin.
    pub probe_distance: f32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            look_enabled: true,
            mouse_sensitivity: 0.003,
            max_look_angle: 50.0,
            fov: 60.0,
            sprint_fov: 80.0,
            sprint_fov_step: 10.0,
            movement_enabled: true,
            walk_speed: 5.0,
            sprint_speed: 7.0,
            max_velocity_change: 10.0,
            jump_power: 5.0,
            sprint_key: KeyCode::ShiftLeft,
            jump_key: KeyCode::Space,
            bob_speed: 10.0,
            bob_amount: Vec3::new(0.15, 0.05, 0.0),
            probe_distance: 0.75,
        }
    }
}

impl ControllerSettings {
    pub fn max_look_angle_radians(&self) -> f32 {
        self.max_look_angle.to_radians()
    }

    pub fn fov_radians(&self) -> f32 {
        self.fov.to_radians()
    }

    pub fn sprint_fov_radians(&self) -> f32 {
        self.sprint_fov.to_radians()
    }

    /// Load settings from a RON file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        ron::from_str(&text).map_err(|e| format!("Failed to parse {}: {e}", path.display()))
    }

    /// Load settings, falling back to defaults when the file is absent or
    /// malformed.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => {
                info!("Loaded controller settings from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("{e}, using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_tuning() {
        let s = ControllerSettings::default();
        assert_eq!(s.walk_speed, 5.0);
        assert_eq!(s.sprint_speed, 7.0);
        assert_eq!(s.max_velocity_change, 10.0);
        assert_eq!(s.jump_power, 5.0);
        assert_eq!(s.fov, 60.0);
        assert_eq!(s.sprint_fov, 80.0);
        assert_eq!(s.max_look_angle, 50.0);
        assert_eq!(s.bob_speed, 10.0);
        assert_eq!(s.bob_amount, Vec3::new(0.15, 0.05, 0.0));
        assert_eq!(s.probe_distance, 0.75);
        assert_eq!(s.sprint_key, KeyCode::ShiftLeft);
        assert_eq!(s.jump_key, KeyCode::Space);
        assert!(s.look_enabled);
        assert!(s.movement_enabled);
    }

    #[test]
    fn partial_ron_overrides_only_named_fields() {
        let s: ControllerSettings =
            ron::from_str("(walk_speed: 6.5, sprint_key: ControlLeft)").unwrap();
        assert_eq!(s.walk_speed, 6.5);
        assert_eq!(s.sprint_key, KeyCode::ControlLeft);
        // Everything unnamed keeps its default.
        assert_eq!(s.sprint_speed, 7.0);
        assert_eq!(s.jump_key, KeyCode::Space);
    }

    #[test]
    fn angle_helpers_convert_to_radians() {
        let s = ControllerSettings::default();
        assert!((s.max_look_angle_radians() - 50.0_f32.to_radians()).abs() < 1e-6);
        assert!((s.fov_radians() - 60.0_f32.to_radians()).abs() < 1e-6);
        assert!((s.sprint_fov_radians() - 80.0_f32.to_radians()).abs() < 1e-6);
    }
}
