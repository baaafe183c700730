//! Mesh-based buoyancy: the hull is split against the water surface every
//! tick and hydrostatic plus drag forces are integrated over the wet part.

pub mod body;
pub mod clipper;
pub mod forces;
pub mod mesh;
pub mod sampler;
pub mod stabilizer;

pub use body::{FloatingBody, FloatingBodyConfig, FloatingRigidBody};
pub use clipper::{MeshWaterClipper, SubmergedTriangle, Waterline};
pub use forces::{compute_forces, BodyMotion, BuoyancyForces, HydroParams};
pub use mesh::{BuoyancyMesh, FrontFace, Triangle};
pub use sampler::RingSampling;
pub use stabilizer::Stabilizer;
