//! Buoyancy mesh and its triangle caches.

use bevy::math::{Quat, Vec3};
use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};

use crate::error::OceanError;

/// A triangle in either body-local or world space.
///
/// Winding is kept from the source mesh: `(b - a) × (c - a)` points out of
/// the hull.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    pub const fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    #[inline]
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }

    #[inline]
    pub fn centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }

    /// Twice the area, pointing along the outward normal.
    #[inline]
    pub fn scaled_normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a)
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.scaled_normal().length() * 0.5
    }

    /// Unit outward normal, or zero for a degenerate triangle.
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.scaled_normal().normalize_or_zero()
    }

    #[inline]
    pub fn transformed(&self, position: Vec3, rotation: Quat) -> Triangle {
        Triangle {
            a: position + rotation * self.a,
            b: position + rotation * self.b,
            c: position + rotation * self.c,
        }
    }

    #[inline]
    pub fn flipped(&self) -> Triangle {
        Triangle::new(self.a, self.c, self.b)
    }

    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite()
    }
}

/// Which winding the source mesh uses for faces seen from outside.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrontFace {
    #[default]
    CounterClockwise,
    /// Left-handed content; normals are flipped when the cache is built.
    Clockwise,
}

/// Immutable body-local triangle cache used for buoyancy.
#[derive(Debug, Clone)]
pub struct BuoyancyMesh {
    base: NonEmpty<Triangle>,
}

impl BuoyancyMesh {
    /// Build the cache from an indexed mesh, translated by `offset`.
    pub fn from_indexed(
        vertices: &[Vec3],
        indices: &[u32],
        offset: Vec3,
        front_face: FrontFace,
    ) -> Result<Self, OceanError> {
        if indices.len() % 3 != 0 {
            return Err(OceanError::IndexCountNotTriangles(indices.len()));
        }

        let vertex = |index: u32| {
            vertices
                .get(index as usize)
                .map(|v| *v + offset)
                .ok_or(OceanError::IndexOutOfRange {
                    index,
                    vertex_count: vertices.len(),
                })
        };

        let mut triangles = Vec::with_capacity(indices.len() / 3);
        for chunk in indices.chunks_exact(3) {
            let tri = Triangle::new(vertex(chunk[0])?, vertex(chunk[1])?, vertex(chunk[2])?);
            triangles.push(match front_face {
                FrontFace::CounterClockwise => tri,
                FrontFace::Clockwise => tri.flipped(),
            });
        }

        Self::from_triangles(triangles)
    }

    pub fn from_triangles(triangles: Vec<Triangle>) -> Result<Self, OceanError> {
        NonEmpty::from_vec(triangles)
            .map(|base| Self { base })
            .ok_or(OceanError::EmptyMesh)
    }

    /// Closed box centred on the local origin, 12 outward-facing triangles.
    pub fn cuboid(half_extents: Vec3, offset: Vec3) -> Self {
        let h = half_extents;
        let vertices = [
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        #[rustfmt::skip]
        let indices = [
            0, 2, 1, 0, 3, 2, // -z
            4, 5, 6, 4, 6, 7, // +z
            0, 1, 5, 0, 5, 4, // -y
            3, 6, 2, 3, 7, 6, // +y
            0, 4, 7, 0, 7, 3, // -x
            1, 2, 6, 1, 6, 5, // +x
        ];

        let triangle = |i: usize| {
            Triangle::new(
                vertices[indices[i * 3]] + offset,
                vertices[indices[i * 3 + 1]] + offset,
                vertices[indices[i * 3 + 2]] + offset,
            )
        };

        Self {
            base: NonEmpty {
                head: triangle(0),
                tail: (1..indices.len() / 3).map(triangle).collect(),
            },
        }
    }

    pub fn triangles(&self) -> &NonEmpty<Triangle> {
        &self.base
    }

    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Transform the local cache into `out`, reusing its allocation.
    pub fn pose_into(&self, position: Vec3, rotation: Quat, out: &mut Vec<Triangle>) {
        out.clear();
        out.extend(self.base.iter().map(|t| t.transformed(position, rotation)));
    }
}
