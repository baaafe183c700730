/// Number of wave slots in every preset and in the active wave state.
pub const NB_WAVES: usize = 5;
/// Capacity of the interaction ring fed to the ocean shader.
pub const NB_INTERACTIONS: usize = 64;
/// Fixed physics rate used by the headless driver unless overridden.
pub const TICKS_PER_SECOND: u64 = 50;

pub const DEFAULT_TRANSITION_DURATION: f32 = 10.0;
pub const DEFAULT_AMPLITUDE_SLEW_RATE: f32 = 0.1;

pub const DEFAULT_WATER_SAMPLE_COUNT: u32 = 5;
pub const DEFAULT_WATER_SAMPLE_RADIUS: f32 = 0.5;

pub const WATER_DENSITY: f32 = 1027.0;
pub const GRAVITY: f32 = 9.81;

pub const OCEAN_NOT_READY_WARNING: &str =
    "Active wave state not initialized, returning 0 for water height";
