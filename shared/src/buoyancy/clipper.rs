//! Wet/dry partition of a posed buoyancy mesh.
//!
//! Every triangle is compared against the local water surface using the
//! signed depth `vertex.y - water_height` of its vertices:
//!
//! - all depths `>= 0`: dry
//! - all depths `< 0`: wet, kept as is
//! - mixed: cut along the waterline into one triangle on the lone vertex's
//!   side and two on the other side
//!
//! A vertex exactly on the surface counts as dry.

use bevy::math::{Quat, Vec3};

use super::mesh::{BuoyancyMesh, Triangle};
use super::sampler::RingSampling;
use crate::water::HeightSampler;

/// A wet triangle with the depth of its centroid below the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubmergedTriangle {
    pub triangle: Triangle,
    /// Positive distance below the water surface
    pub depth: f32,
}

/// How a single triangle relates to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waterline {
    Dry,
    Wet,
    Crossing,
}

/// Classify from signed vertex depths.
#[inline]
pub fn classify(depths: [f32; 3]) -> Waterline {
    let wet = depths.iter().filter(|d| **d < 0.0).count();
    match wet {
        0 => Waterline::Dry,
        3 => Waterline::Wet,
        _ => Waterline::Crossing,
    }
}

/// Point on edge `p → q` where the interpolated depth is zero.
#[inline]
fn waterline_point(p: Vec3, dp: f32, q: Vec3, dq: f32) -> Vec3 {
    let t = dp / (dp - dq);
    p + (q - p) * t
}

fn submerged(triangle: Triangle, depths: [f32; 3]) -> SubmergedTriangle {
    SubmergedTriangle {
        triangle,
        depth: -(depths[0] + depths[1] + depths[2]) / 3.0,
    }
}

/// Split one triangle given its vertex depths, appending the pieces.
pub fn split_triangle(
    tri: &Triangle,
    depths: [f32; 3],
    wet: &mut Vec<SubmergedTriangle>,
    dry: &mut Vec<Triangle>,
) {
    match classify(depths) {
        Waterline::Dry => dry.push(*tri),
        Waterline::Wet => wet.push(submerged(*tri, depths)),
        Waterline::Crossing => {
            let vertices = tri.vertices();
            let is_wet = depths.map(|d| d < 0.0);
            let wet_count = is_wet.iter().filter(|w| **w).count();
            // The vertex alone on its side of the surface.
            let lone_is_wet = wet_count == 1;
            let lone = (0..3).find(|i| is_wet[*i] == lone_is_wet).unwrap_or(0);

            // Rotate so the lone vertex comes first; rotation keeps winding.
            let (i0, i1, i2) = (lone, (lone + 1) % 3, (lone + 2) % 3);
            let (a, b, c) = (vertices[i0], vertices[i1], vertices[i2]);
            let (da, db, dc) = (depths[i0], depths[i1], depths[i2]);

            let ab = waterline_point(a, da, b, db);
            let ac = waterline_point(a, da, c, dc);

            let tip = Triangle::new(a, ab, ac);
            let base_near = Triangle::new(ab, b, c);
            let base_far = Triangle::new(ab, c, ac);

            if lone_is_wet {
                wet.push(submerged(tip, [da, 0.0, 0.0]));
                dry.push(base_near);
                dry.push(base_far);
            } else {
                dry.push(tip);
                wet.push(submerged(base_near, [0.0, db, dc]));
                wet.push(submerged(base_far, [0.0, dc, 0.0]));
            }
        }
    }
}

/// Posed triangles and the wet/dry partition for one body.
///
/// All buffers are sized once for the mesh and reused every tick.
#[derive(Debug, Clone)]
pub struct MeshWaterClipper {
    world: Vec<Triangle>,
    wet: Vec<SubmergedTriangle>,
    dry: Vec<Triangle>,
}

impl MeshWaterClipper {
    pub fn new(mesh: &BuoyancyMesh) -> Self {
        let n = mesh.len();
        Self {
            world: Vec::with_capacity(n),
            // A crossing triangle yields at most two pieces per side.
            wet: Vec::with_capacity(n * 2),
            dry: Vec::with_capacity(n * 2),
        }
    }

    /// Transform the mesh's local cache into the world buffer.
    pub fn pose(&mut self, mesh: &BuoyancyMesh, position: Vec3, rotation: Quat) -> &[Triangle] {
        mesh.pose_into(position, rotation, &mut self.world);
        &self.world
    }

    /// Partition the world buffer against the water surface. Counts are
    /// rebuilt from scratch on every call.
    pub fn split(&mut self, sampler: &impl HeightSampler, sampling: &RingSampling) {
        self.wet.clear();
        self.dry.clear();

        for tri in &self.world {
            let depths = tri.vertices().map(|v| v.y - sampling.height(sampler, v));
            split_triangle(tri, depths, &mut self.wet, &mut self.dry);
        }
    }

    pub fn world_triangles(&self) -> &[Triangle] {
        &self.world
    }

    pub fn wet(&self) -> &[SubmergedTriangle] {
        &self.wet
    }

    pub fn dry(&self) -> &[Triangle] {
        &self.dry
    }

    pub fn wet_count(&self) -> usize {
        self.wet.len()
    }

    pub fn dry_count(&self) -> usize {
        self.dry.len()
    }
}
