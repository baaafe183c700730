//! Procedural ocean: wave presets, the analytic height field and the
//! preset transition controller.
//!
//! ## Architecture
//!
//! ```text
//!  weather ──set_state──▶ WaveTransitionController ──active WaveSet──┐
//!                                                                    ▼
//!  gameplay ──register_interaction──▶ WaveField ◀── snapshot each tick
//!                                        │
//!                       ┌────────────────┴───────────────┐
//!                       ▼                                ▼
//!              buoyancy (height_at)              OceanUniforms (shader)
//! ```

pub mod config;
pub mod field;
pub mod interaction;
pub mod transition;
pub mod uniforms;

pub use config::{Wave, WaveParams, WavePresets, WaveSet, WaterState};
pub use field::{wave_height, AmplitudeScale, HeightSampler, WaterSurface, WaveField};
pub use interaction::{Interaction, InteractionRing};
pub use transition::WaveTransitionController;
pub use uniforms::OceanUniforms;
