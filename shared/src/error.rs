//! Error types for the ocean and buoyancy core.
//!
//! Configuration problems are reported through [`OceanError`] when a body or
//! the ocean is built. Faults detected while stepping a body are reported as
//! [`TickFault`] inside a [`TickStatus`] so one bad tick never stops the
//! simulation.

use bevy::math::Vec3;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OceanError {
    #[error("buoyancy mesh has no triangles")]
    EmptyMesh,
    #[error("index buffer length {0} is not a multiple of 3")]
    IndexCountNotTriangles(usize),
    #[error("triangle index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("wave {slot} of preset {preset}: {reason}")]
    InvalidWave {
        preset: &'static str,
        slot: usize,
        reason: &'static str,
    },
    #[error("unknown water state id {0}")]
    UnknownWaterState(String),
    #[error("invalid water sampling: {0}")]
    InvalidSampling(&'static str),
    #[error("transition duration must be positive and finite, got {0}")]
    InvalidDuration(f32),
}

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum TickFault {
    #[error("body pose is not finite (position {0})")]
    NonFinitePose(Vec3),
    #[error("hydrostatic force is not finite (force {force}, torque {torque})")]
    NonFiniteForce { force: Vec3, torque: Vec3 },
    #[error("body velocity is not finite")]
    NonFiniteVelocity,
}

/// Outcome of one physics tick for a floating body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickStatus {
    /// Forces, damping and stabilization were applied.
    Applied { wet: usize, dry: usize },
    /// The body is asleep; nothing was computed.
    Sleeping,
    /// The tick was abandoned and nothing was applied to the body.
    Skipped(TickFault),
}

impl TickStatus {
    pub fn is_applied(&self) -> bool {
        matches!(self, TickStatus::Applied { .. })
    }
}
