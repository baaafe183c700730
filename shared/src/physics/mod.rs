pub mod rapier;

pub use rapier::{BuoyancyPhysicsPlugin, FloatingBodyBundle, RapierFloatingBody};
