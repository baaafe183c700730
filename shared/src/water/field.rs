//! Analytic ocean height field.
//!
//! The surface is a plain superposition of sine waves:
//!
//! ```text
//! h(x, z, t) = Σ amplitude_i * scale * sin(dot(dir_i, (x, z)) * frequency_i + t * phase_i)
//! ```
//!
//! The field holds a snapshot of the active wave state taken at the start of
//! a tick, so every body sampled during that tick sees the same waves.

use bevy::math::Vec3;
use bevy_ecs::resource::Resource;
use bevy_log::warn_once;

use super::config::{Wave, WaveSet};
use super::interaction::InteractionRing;
use crate::constants::OCEAN_NOT_READY_WARNING;

/// Anything that can report the water height below a world position.
pub trait HeightSampler {
    fn height_at(&self, position: Vec3) -> f32;
}

impl<F> HeightSampler for F
where
    F: Fn(Vec3) -> f32,
{
    #[inline]
    fn height_at(&self, position: Vec3) -> f32 {
        self(position)
    }
}

/// Sum of the given waves at `(x, z)`. An empty slice yields 0.
#[inline]
pub fn wave_height(waves: &[Wave], x: f32, z: f32, time: f32, amplitude_scale: f32) -> f32 {
    let mut height = 0.0;
    for wave in waves {
        let dir = wave.direction();
        let along = dir.x * x + dir.y * z;
        height += wave.amplitude()
            * amplitude_scale
            * (along * wave.frequency() + time * wave.phase()).sin();
    }
    height
}

/// Global amplitude multiplier that slews toward its target at a fixed rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmplitudeScale {
    current: f32,
    target: f32,
    /// Units per second
    rate: f32,
}

impl AmplitudeScale {
    pub fn new(rate: f32) -> Self {
        Self {
            current: 1.0,
            target: 1.0,
            rate: rate.max(0.0),
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target.max(0.0);
    }

    /// Move toward the target by at most `rate * dt`, never overshooting.
    pub fn advance(&mut self, dt: f32) {
        let max_delta = self.rate * dt.max(0.0);
        let delta = self.target - self.current;
        if delta.abs() <= max_delta {
            self.current = self.target;
        } else {
            self.current += max_delta.copysign(delta);
        }
    }
}

impl Default for AmplitudeScale {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_AMPLITUDE_SLEW_RATE)
    }
}

/// The ocean surface queried by every floating body.
#[derive(Resource, Debug, Clone, Default)]
pub struct WaveField {
    waves: Option<WaveSet>,
    amplitude: AmplitudeScale,
    /// World-space position of the ocean's local origin
    origin: Vec3,
    interactions: InteractionRing,
}

impl WaveField {
    /// A field with no wave state yet. Heights read as 0 until
    /// [`WaveField::set_waves`] is called.
    pub fn new(origin: Vec3, amplitude: AmplitudeScale) -> Self {
        Self {
            waves: None,
            amplitude,
            origin,
            interactions: InteractionRing::new(),
        }
    }

    pub fn with_waves(waves: WaveSet) -> Self {
        let mut field = Self::default();
        field.set_waves(&waves);
        field
    }

    /// Snapshot the active wave state for the coming tick.
    pub fn set_waves(&mut self, waves: &WaveSet) {
        self.waves = Some(*waves);
    }

    pub fn waves(&self) -> Option<&WaveSet> {
        self.waves.as_ref()
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    pub fn amplitude(&self) -> &AmplitudeScale {
        &self.amplitude
    }

    pub fn amplitude_mut(&mut self) -> &mut AmplitudeScale {
        &mut self.amplitude
    }

    pub fn interactions(&self) -> &InteractionRing {
        &self.interactions
    }

    /// Elevation at ocean-local `(x, z)`.
    pub fn height(&self, x: f32, z: f32, time: f32) -> f32 {
        let Some(waves) = &self.waves else {
            warn_once!("{}", OCEAN_NOT_READY_WARNING);
            return 0.0;
        };
        wave_height(waves.waves(), x, z, time, self.amplitude.current())
    }

    /// World-space elevation below `position`.
    pub fn world_height(&self, position: Vec3, time: f32) -> f32 {
        let local = position - self.origin;
        self.height(local.x, local.z, time) + self.origin.y
    }

    /// Record a disturbance for the ocean material. Does not affect heights.
    pub fn register_interaction(&mut self, position: Vec3, strength: f32, time: f32) {
        let local = position - self.origin;
        self.interactions.push(local.x, local.z, strength, time);
    }

    /// Bind the field to a time, giving a [`HeightSampler`].
    pub fn at(&self, time: f32) -> WaterSurface<'_> {
        WaterSurface { field: self, time }
    }
}

/// A [`WaveField`] frozen at one instant.
#[derive(Clone, Copy)]
pub struct WaterSurface<'a> {
    field: &'a WaveField,
    time: f32,
}

impl HeightSampler for WaterSurface<'_> {
    #[inline]
    fn height_at(&self, position: Vec3) -> f32 {
        self.field.world_height(position, self.time)
    }
}
