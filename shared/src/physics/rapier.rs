//! Rapier physics integration for floating bodies.
//!
//! The buoyancy core only talks to [`FloatingRigidBody`]; this module maps
//! that trait onto the Rapier components of one entity and provides the
//! bundle a boat is spawned with.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::buoyancy::{BuoyancyMesh, FloatingBody, FloatingBodyConfig, FloatingRigidBody};
use crate::constants::GRAVITY;
use crate::error::OceanError;

/// View over the Rapier components of one floating entity for a single tick.
///
/// Velocity and force are worked on as copies so the caller decides, from
/// the tick status, whether anything is written back to the ECS.
pub struct RapierFloatingBody<'a> {
    transform: &'a Transform,
    mass: &'a ReadMassProperties,
    sleeping: Option<&'a Sleeping>,
    velocity: Velocity,
    external_force: ExternalForce,
}

impl<'a> RapierFloatingBody<'a> {
    /// Starts with an empty force accumulator.
    pub fn new(
        transform: &'a Transform,
        velocity: Velocity,
        mass: &'a ReadMassProperties,
        sleeping: Option<&'a Sleeping>,
    ) -> Self {
        Self {
            transform,
            mass,
            sleeping,
            velocity,
            external_force: ExternalForce::default(),
        }
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn external_force(&self) -> ExternalForce {
        self.external_force
    }
}

impl FloatingRigidBody for RapierFloatingBody<'_> {
    fn position(&self) -> Vec3 {
        self.transform.translation
    }

    fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    fn center_of_mass(&self) -> Vec3 {
        self.transform.translation + self.transform.rotation * self.mass.get().local_center_of_mass
    }

    fn linear_velocity(&self) -> Vec3 {
        self.velocity.linvel
    }

    fn angular_velocity(&self) -> Vec3 {
        self.velocity.angvel
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.velocity.linvel = velocity;
    }

    fn set_angular_velocity(&mut self, velocity: Vec3) {
        self.velocity.angvel = velocity;
    }

    fn add_force_at_point(&mut self, force: Vec3, point: Vec3) {
        let lever = point - self.center_of_mass();
        self.external_force.force += force;
        self.external_force.torque += lever.cross(force);
    }

    fn add_torque(&mut self, torque: Vec3) {
        self.external_force.torque += torque;
    }

    fn is_sleeping(&self) -> bool {
        self.sleeping.is_some_and(|s| s.sleeping)
    }
}

/// Everything a box-hulled floating body needs to be simulated.
#[derive(Bundle)]
pub struct FloatingBodyBundle {
    pub body: RigidBody,
    pub collider: Collider,
    pub mass_properties: ColliderMassProperties,
    pub read_mass: ReadMassProperties,
    pub velocity: Velocity,
    pub external_force: ExternalForce,
    pub sleeping: Sleeping,
    pub floating: FloatingBody,
    pub transform: Transform,
}

impl FloatingBodyBundle {
    /// A dynamic cuboid hull. The buoyancy mesh is the same cuboid, shifted
    /// by the configured mesh offset.
    ///
    /// # Arguments
    /// * `half_extents` - Hull half size along each local axis
    /// * `mass` - Total mass in kilograms
    pub fn cuboid(
        half_extents: Vec3,
        mass: f32,
        config: &FloatingBodyConfig,
        transform: Transform,
    ) -> Result<Self, OceanError> {
        let mesh = BuoyancyMesh::cuboid(half_extents, config.mesh_offset);
        Ok(Self {
            body: RigidBody::Dynamic,
            collider: Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
            mass_properties: ColliderMassProperties::MassProperties(MassProperties {
                local_center_of_mass: config.center_of_mass,
                mass,
                principal_inertia: cuboid_inertia(half_extents, mass),
                ..default()
            }),
            read_mass: ReadMassProperties::default(),
            velocity: Velocity::zero(),
            external_force: ExternalForce::default(),
            sleeping: Sleeping::default(),
            floating: FloatingBody::new(mesh, config)?,
            transform,
        })
    }
}

/// Principal moments of a solid box.
pub fn cuboid_inertia(half_extents: Vec3, mass: f32) -> Vec3 {
    let size = half_extents * 2.0;
    let sq = size * size;
    Vec3::new(sq.y + sq.z, sq.x + sq.z, sq.x + sq.y) * (mass / 12.0)
}

/// Adds Rapier stepping in the fixed schedule with real-world gravity.
pub struct BuoyancyPhysicsPlugin;

impl Plugin for BuoyancyPhysicsPlugin {
    fn build(&self, app: &mut App) {
        // Buoyancy runs in FixedUpdate, so Rapier has to integrate on the
        // same clock for the accumulated forces to line up.
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule());
        app.add_systems(Startup, configure_rapier_context);
    }
}

fn configure_rapier_context(mut query: Query<&mut RapierConfiguration>) {
    for mut config in query.iter_mut() {
        config.gravity = Vec3::new(0.0, -GRAVITY, 0.0);
        config.physics_pipeline_active = true;
    }
}
