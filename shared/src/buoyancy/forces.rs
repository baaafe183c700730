//! Hydrostatic and approximate hydrodynamic forces on the wet surface.
//!
//! Hydrostatic pressure `ρ g d` acts against the outward normal of each wet
//! triangle at its centroid. Summed over a closed hull this gives
//! Archimedes' `ρ g V` upward plus the righting torque. Pressure drag and a
//! tangential skin friction oppose the local velocity of each face; dry
//! faces get the same pressure drag in air.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use super::clipper::SubmergedTriangle;
use super::mesh::Triangle;
use crate::constants::{GRAVITY, WATER_DENSITY};

/// Fluid constants for the force integration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HydroParams {
    /// kg/m³
    pub water_density: f32,
    /// kg/m³
    pub air_density: f32,
    /// m/s², magnitude
    pub gravity: f32,
    pub pressure_drag: f32,
    pub viscous_drag: f32,
    pub air_drag: f32,
}

impl Default for HydroParams {
    fn default() -> Self {
        Self {
            water_density: WATER_DENSITY,
            air_density: 1.225,
            gravity: GRAVITY,
            pressure_drag: 0.3,
            viscous_drag: 0.01,
            air_drag: 0.5,
        }
    }
}

/// Rigid motion needed to compute each face's velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyMotion {
    pub center_of_mass: Vec3,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl BodyMotion {
    #[inline]
    pub fn point_velocity(&self, point: Vec3) -> Vec3 {
        self.linear_velocity + self.angular_velocity.cross(point - self.center_of_mass)
    }
}

/// Net force and torque about the centre of mass for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BuoyancyForces {
    pub force: Vec3,
    pub torque: Vec3,
    pub buoyancy: Vec3,
    pub wet_area: f32,
    pub dry_area: f32,
}

impl BuoyancyForces {
    #[inline]
    fn add_at(&mut self, force: Vec3, point: Vec3, center_of_mass: Vec3) {
        self.force += force;
        self.torque += (point - center_of_mass).cross(force);
    }

    pub fn is_finite(&self) -> bool {
        self.force.is_finite() && self.torque.is_finite()
    }
}

/// Drag from a face pushing into a fluid: `-½ ρ C A |v|² cosθ n`.
#[inline]
fn pressure_drag(normal: Vec3, area: f32, velocity: Vec3, density: f32, coefficient: f32) -> Vec3 {
    let speed_sq = velocity.length_squared();
    if speed_sq <= f32::EPSILON || coefficient == 0.0 {
        return Vec3::ZERO;
    }
    let cos_theta = normal.dot(velocity) / speed_sq.sqrt();
    if cos_theta <= 0.0 {
        return Vec3::ZERO;
    }
    -normal * (0.5 * density * coefficient * area * speed_sq * cos_theta)
}

/// Integrate all forces over the wet and dry sets.
pub fn compute_forces(
    wet: &[SubmergedTriangle],
    dry: &[Triangle],
    motion: &BodyMotion,
    params: &HydroParams,
) -> BuoyancyForces {
    let mut out = BuoyancyForces::default();
    let com = motion.center_of_mass;

    for submerged in wet {
        let tri = &submerged.triangle;
        let area = tri.area();
        if area <= f32::EPSILON {
            continue;
        }
        let normal = tri.normal();
        let center = tri.centroid();
        out.wet_area += area;

        let hydrostatic = -normal * (params.water_density * params.gravity * submerged.depth.max(0.0) * area);
        out.buoyancy += hydrostatic;
        out.add_at(hydrostatic, center, com);

        let velocity = motion.point_velocity(center);
        let drag = pressure_drag(normal, area, velocity, params.water_density, params.pressure_drag);

        let tangential = velocity - normal * normal.dot(velocity);
        let friction = -tangential
            * (0.5 * params.water_density * params.viscous_drag * area * tangential.length());

        out.add_at(drag + friction, center, com);
    }

    for tri in dry {
        let area = tri.area();
        if area <= f32::EPSILON {
            continue;
        }
        out.dry_area += area;
        let center = tri.centroid();
        let drag = pressure_drag(
            tri.normal(),
            area,
            motion.point_velocity(center),
            params.air_density,
            params.air_drag,
        );
        out.add_at(drag, center, com);
    }

    out
}
