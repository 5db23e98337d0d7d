//! Sandbox level geometry and the avatar rig

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use controller::{CameraJoint, ControllerBody, ControllerCamera};

/// Avatar capsule height, meters.
const AVATAR_HEIGHT: f32 = 1.8;

/// Avatar capsule radius, meters.
const AVATAR_RADIUS: f32 = 0.3;

/// Camera joint height above the body center (eye level).
const JOINT_HEIGHT: f32 = AVATAR_HEIGHT * 0.4;

/// Spawn lights, the ground slab and static obstacles.
pub fn spawn_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.85, 0.88, 1.0),
        brightness: 120.0,
        affects_lightmapped_meshes: true,
    });
    commands.insert_resource(ClearColor(Color::srgb(0.55, 0.7, 0.9)));

    // Ground slab
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(80.0, 1.0, 80.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.45, 0.35),
            perceptual_roughness: 0.95,
            ..default()
        })),
        Transform::from_xyz(0.0, -0.5, 0.0),
        RigidBody::Fixed,
        Collider::cuboid(40.0, 0.5, 40.0),
    ));

    // Scattered crates to weave between and jump onto
    let crate_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.6, 0.45, 0.3),
        perceptual_roughness: 0.8,
        ..default()
    });
    for _ in 0..24 {
        let x = (rand::random::<f32>() - 0.5) * 50.0;
        let z = (rand::random::<f32>() - 0.5) * 50.0;
        // Keep the spawn area clear
        if x.abs() < 4.0 && z.abs() < 4.0 {
            continue;
        }
        let size = 0.8 + rand::random::<f32>() * 1.4;
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(size, size, size))),
            MeshMaterial3d(crate_material.clone()),
            Transform::from_xyz(x, size * 0.5, z),
            RigidBody::Fixed,
            Collider::cuboid(size * 0.5, size * 0.5, size * 0.5),
        ));
    }

    // Ramp up to a platform
    let slab_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.5, 0.5, 0.55),
        perceptual_roughness: 0.9,
        ..default()
    });
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(4.0, 0.4, 10.0))),
        MeshMaterial3d(slab_material.clone()),
        Transform::from_xyz(10.0, 1.0, 0.0).with_rotation(Quat::from_rotation_x(-0.22)),
        RigidBody::Fixed,
        Collider::cuboid(2.0, 0.2, 5.0),
    ));
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(4.0, 0.4, 4.0))),
        MeshMaterial3d(slab_material.clone()),
        Transform::from_xyz(10.0, 2.0, -6.5),
        RigidBody::Fixed,
        Collider::cuboid(2.0, 0.2, 2.0),
    ));

    // Staircase sized for jump testing
    for i in 0..4 {
        let height = 0.3 * (i + 1) as f32;
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(2.0, height, 2.0))),
            MeshMaterial3d(slab_material.clone()),
            Transform::from_xyz(-8.0, height * 0.5, -6.0 + i as f32 * 2.0),
            RigidBody::Fixed,
            Collider::cuboid(1.0, height * 0.5, 1.0),
        ));
    }
}

/// Avatar rig: dynamic capsule body, camera joint at eye level, camera.
pub fn spawn_avatar(mut commands: Commands) {
    commands
        .spawn((
            ControllerBody {
                half_height: AVATAR_HEIGHT * 0.5,
            },
            RigidBody::Dynamic,
            Collider::capsule_y(AVATAR_HEIGHT * 0.5 - AVATAR_RADIUS, AVATAR_RADIUS),
            Velocity::default(),
            LockedAxes::ROTATION_LOCKED,
            Transform::from_xyz(0.0, AVATAR_HEIGHT * 0.5 + 0.1, 0.0),
            Visibility::default(),
        ))
        .with_children(|body| {
            body.spawn((
                CameraJoint,
                Transform::from_xyz(0.0, JOINT_HEIGHT, 0.0),
                Visibility::default(),
            ))
            .with_children(|joint| {
                joint.spawn((
                    ControllerCamera,
                    Camera3d::default(),
                    Projection::Perspective(PerspectiveProjection::default()),
                    Transform::default(),
                ));
            });
        });
}
