use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum OceanUpdateSet {
    Requests,
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum OceanFixedSet {
    /// Blend presets and snapshot the active waves
    Waves,
    Buoyancy,
}
