//! Per-tick buoyancy update for one floating body.

use bevy::math::{Quat, Vec3};
use bevy_ecs::component::Component;
use serde::{Deserialize, Serialize};

use super::clipper::{MeshWaterClipper, SubmergedTriangle};
use super::forces::{compute_forces, BodyMotion, BuoyancyForces, HydroParams};
use super::mesh::{BuoyancyMesh, FrontFace, Triangle};
use super::sampler::RingSampling;
use super::stabilizer::Stabilizer;
use crate::error::{OceanError, TickFault, TickStatus};
use crate::water::HeightSampler;

/// What the buoyancy update needs from the physics engine.
///
/// Forces added here are accumulated for the engine's next integration
/// step; velocities written here replace the engine's values immediately.
pub trait FloatingRigidBody {
    fn position(&self) -> Vec3;
    fn rotation(&self) -> Quat;
    /// World-space centre of mass
    fn center_of_mass(&self) -> Vec3;
    fn linear_velocity(&self) -> Vec3;
    fn angular_velocity(&self) -> Vec3;
    fn set_linear_velocity(&mut self, velocity: Vec3);
    fn set_angular_velocity(&mut self, velocity: Vec3);
    fn add_force_at_point(&mut self, force: Vec3, point: Vec3);
    fn add_torque(&mut self, torque: Vec3);
    fn is_sleeping(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatingBodyConfig {
    /// Local translation baked into the buoyancy mesh
    pub mesh_offset: Vec3,
    /// Local centre of mass handed to the physics engine
    pub center_of_mass: Vec3,
    pub front_face: FrontFace,
    pub sampling: RingSampling,
    pub hydro: HydroParams,
    pub stabilization_torque: f32,
    pub angular_smoothing: Option<f32>,
    /// Per-second decay; each tick scales velocity by `(1 - k * dt)`,
    /// clamped at 0 when `k * dt > 1`
    pub angular_damping: f32,
    /// Same as `angular_damping`, for linear velocity
    pub linear_damping: f32,
}

impl Default for FloatingBodyConfig {
    fn default() -> Self {
        Self {
            mesh_offset: Vec3::new(0.0, 0.0, 0.5),
            center_of_mass: Vec3::new(0.0, -0.5, 0.2),
            front_face: FrontFace::CounterClockwise,
            sampling: RingSampling::default(),
            hydro: HydroParams::default(),
            stabilization_torque: 1.0,
            angular_smoothing: Some(0.1),
            angular_damping: 0.5,
            linear_damping: 0.1,
        }
    }
}

/// Buoyancy state owned by a single floating body.
#[derive(Component, Debug, Clone)]
pub struct FloatingBody {
    mesh: BuoyancyMesh,
    clipper: MeshWaterClipper,
    sampling: RingSampling,
    hydro: HydroParams,
    stabilizer: Stabilizer,
    last_forces: BuoyancyForces,
}

impl FloatingBody {
    pub fn new(mesh: BuoyancyMesh, config: &FloatingBodyConfig) -> Result<Self, OceanError> {
        config.sampling.validate()?;
        Ok(Self {
            clipper: MeshWaterClipper::new(&mesh),
            mesh,
            sampling: config.sampling,
            hydro: config.hydro,
            stabilizer: Stabilizer::new(
                config.angular_damping,
                config.linear_damping,
                config.stabilization_torque,
                config.angular_smoothing,
            ),
            last_forces: BuoyancyForces::default(),
        })
    }

    /// Build from an indexed mesh, applying the configured offset and winding.
    pub fn from_indexed(
        vertices: &[Vec3],
        indices: &[u32],
        config: &FloatingBodyConfig,
    ) -> Result<Self, OceanError> {
        let mesh = BuoyancyMesh::from_indexed(vertices, indices, config.mesh_offset, config.front_face)?;
        Self::new(mesh, config)
    }

    pub fn mesh(&self) -> &BuoyancyMesh {
        &self.mesh
    }

    pub fn wet_triangles(&self) -> &[SubmergedTriangle] {
        self.clipper.wet()
    }

    pub fn dry_triangles(&self) -> &[Triangle] {
        self.clipper.dry()
    }

    pub fn last_forces(&self) -> &BuoyancyForces {
        &self.last_forces
    }

    pub fn stabilizer(&self) -> &Stabilizer {
        &self.stabilizer
    }

    /// Run one physics tick: pose, split, integrate forces, then damping,
    /// uprighting torque and smoothing.
    ///
    /// Nothing is written to `body` unless the whole tick succeeds.
    pub fn step(
        &mut self,
        body: &mut impl FloatingRigidBody,
        sampler: &impl HeightSampler,
        dt: f32,
    ) -> TickStatus {
        if body.is_sleeping() {
            return TickStatus::Sleeping;
        }

        let position = body.position();
        let rotation = body.rotation();
        if !position.is_finite() || !rotation.is_finite() {
            return TickStatus::Skipped(TickFault::NonFinitePose(position));
        }

        let linear = body.linear_velocity();
        let angular = body.angular_velocity();
        if !linear.is_finite() || !angular.is_finite() {
            return TickStatus::Skipped(TickFault::NonFiniteVelocity);
        }

        self.clipper.pose(&self.mesh, position, rotation);
        self.clipper.split(sampler, &self.sampling);

        let motion = BodyMotion {
            center_of_mass: body.center_of_mass(),
            linear_velocity: linear,
            angular_velocity: angular,
        };
        let forces = compute_forces(self.clipper.wet(), self.clipper.dry(), &motion, &self.hydro);
        if !forces.is_finite() {
            return TickStatus::Skipped(TickFault::NonFiniteForce {
                force: forces.force,
                torque: forces.torque,
            });
        }
        self.last_forces = forces;

        body.add_force_at_point(forces.force, motion.center_of_mass);
        body.add_torque(forces.torque);

        let (linear, angular) = self.stabilizer.damp(linear, angular, dt);
        body.set_linear_velocity(linear);
        body.add_torque(self.stabilizer.torque(rotation * Vec3::Y));
        body.set_angular_velocity(self.stabilizer.smooth(angular));

        TickStatus::Applied {
            wet: self.clipper.wet_count(),
            dry: self.clipper.dry_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct TestBody {
        position: Vec3,
        rotation: Quat,
        linear: Vec3,
        angular: Vec3,
        force: Vec3,
        torque: Vec3,
        sleeping: bool,
    }

    impl FloatingRigidBody for TestBody {
        fn position(&self) -> Vec3 {
            self.position
        }
        fn rotation(&self) -> Quat {
            self.rotation
        }
        fn center_of_mass(&self) -> Vec3 {
            self.position
        }
        fn linear_velocity(&self) -> Vec3 {
            self.linear
        }
        fn angular_velocity(&self) -> Vec3 {
            self.angular
        }
        fn set_linear_velocity(&mut self, velocity: Vec3) {
            self.linear = velocity;
        }
        fn set_angular_velocity(&mut self, velocity: Vec3) {
            self.angular = velocity;
        }
        fn add_force_at_point(&mut self, force: Vec3, point: Vec3) {
            self.force += force;
            self.torque += (point - self.center_of_mass()).cross(force);
        }
        fn add_torque(&mut self, torque: Vec3) {
            self.torque += torque;
        }
        fn is_sleeping(&self) -> bool {
            self.sleeping
        }
    }

    fn config() -> FloatingBodyConfig {
        FloatingBodyConfig {
            mesh_offset: Vec3::ZERO,
            hydro: HydroParams {
                pressure_drag: 0.0,
                viscous_drag: 0.0,
                air_drag: 0.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn floating_box(config: &FloatingBodyConfig) -> FloatingBody {
        FloatingBody::new(BuoyancyMesh::cuboid(Vec3::new(1.0, 0.5, 2.0), config.mesh_offset), config)
            .unwrap()
    }

    #[test]
    fn test_half_submerged_box_is_pushed_up() {
        let mut floating = floating_box(&config());
        let mut body = TestBody {
            rotation: Quat::IDENTITY,
            ..Default::default()
        };
        let status = floating.step(&mut body, &|_: Vec3| 0.0_f32, 0.02);
        assert!(status.is_applied());
        assert!(body.force.y > 0.0);
        assert!(!floating.wet_triangles().is_empty());
        assert!(!floating.dry_triangles().is_empty());
    }

    #[test]
    fn test_sleeping_body_is_untouched() {
        let mut floating = floating_box(&config());
        let mut body = TestBody {
            rotation: Quat::IDENTITY,
            linear: Vec3::X,
            sleeping: true,
            ..Default::default()
        };
        let status = floating.step(&mut body, &|_: Vec3| 10.0_f32, 0.02);
        assert_eq!(status, TickStatus::Sleeping);
        assert_eq!(body.force, Vec3::ZERO);
        assert_eq!(body.linear, Vec3::X);
        assert!(floating.wet_triangles().is_empty());
    }

    #[test]
    fn test_bad_tick_is_skipped_and_body_recovers() {
        let mut floating = floating_box(&config());
        let mut body = TestBody {
            position: Vec3::new(f32::NAN, 0.0, 0.0),
            rotation: Quat::IDENTITY,
            linear: Vec3::Y,
            ..Default::default()
        };
        let status = floating.step(&mut body, &|_: Vec3| 0.0_f32, 0.02);
        assert!(matches!(status, TickStatus::Skipped(TickFault::NonFinitePose(_))));
        assert_eq!(body.linear, Vec3::Y);
        assert_eq!(body.force, Vec3::ZERO);

        body.position = Vec3::ZERO;
        assert!(floating.step(&mut body, &|_: Vec3| 0.0_f32, 0.02).is_applied());
    }

    #[test]
    fn test_non_finite_water_is_contained() {
        let mut floating = floating_box(&config());
        let mut body = TestBody {
            rotation: Quat::IDENTITY,
            ..Default::default()
        };
        // Every sample is invalid, so the surface reads as 0 everywhere.
        let status = floating.step(&mut body, &|_: Vec3| f32::NAN, 0.02);
        assert!(status.is_applied());
        assert!(body.force.is_finite());
    }

    #[test]
    fn test_damping_ignores_forces() {
        let cfg = FloatingBodyConfig {
            angular_smoothing: None,
            stabilization_torque: 0.0,
            ..config()
        };
        let mut floating = floating_box(&cfg);
        let v0 = Vec3::new(1.0, 0.0, 0.0);
        let mut body = TestBody {
            rotation: Quat::IDENTITY,
            position: Vec3::new(0.0, -3.0, 0.0),
            linear: v0,
            angular: v0,
            ..Default::default()
        };
        let dt = 0.02;
        for _ in 0..10 {
            floating.step(&mut body, &|_: Vec3| 0.0_f32, dt);
        }
        let expected = v0 * (1.0 - cfg.linear_damping * dt).powi(10);
        assert!((body.linear - expected).length() < 1e-5);
        let expected = v0 * (1.0 - cfg.angular_damping * dt).powi(10);
        assert!((body.angular - expected).length() < 1e-5);
    }

    #[test]
    fn test_tilted_body_gets_righting_torque() {
        let cfg = FloatingBodyConfig {
            stabilization_torque: 5.0,
            ..config()
        };
        let mut floating = floating_box(&cfg);
        let mut body = TestBody {
            position: Vec3::new(0.0, 10.0, 0.0),
            rotation: Quat::from_rotation_z(0.3),
            ..Default::default()
        };
        // Out of the water: only the uprighting torque acts.
        floating.step(&mut body, &|_: Vec3| 0.0_f32, 0.02);
        assert_eq!(body.force, Vec3::ZERO);
        assert!(body.torque.z < 0.0);
    }

    #[test]
    fn test_invalid_sampling_is_rejected() {
        let cfg = FloatingBodyConfig {
            sampling: RingSampling {
                sample_count: 0,
                radius: 0.5,
            },
            ..config()
        };
        let result = FloatingBody::new(BuoyancyMesh::cuboid(Vec3::ONE, Vec3::ZERO), &cfg);
        assert!(matches!(result, Err(OceanError::InvalidSampling(_))));
    }
}
