pub mod buoyancy;
pub mod constants;
pub mod error;
pub mod physics;
pub mod plugin;
pub mod sets;
pub mod water;

pub use constants::*;
pub use error::{OceanError, TickFault, TickStatus};
pub use plugin::{
    ocean_uniforms, AmplitudeRequest, InteractionEvent, OceanClock, OceanPlugin, OceanSettings,
    WaterStateRequest,
};
