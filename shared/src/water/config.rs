//! Wave parameters and the named ocean presets.
//!
//! These values are shared by the CPU height field (buoyancy) and the
//! rendering material, so both always see the same waves.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::constants::NB_WAVES;
use crate::error::OceanError;

/// The five persistent parameters of a wave, as written in config files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveParams {
    pub wavelength: f32,
    pub speed: f32,
    pub amplitude: f32,
    pub sharpness: f32,
    pub direction: Vec2,
}

/// A single sine wave of the ocean surface.
///
/// `frequency` and `phase` are derived from the persistent parameters and
/// recomputed whenever a wave is built, so they can never go stale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "WaveParams", into = "WaveParams")]
pub struct Wave {
    wavelength: f32,
    speed: f32,
    amplitude: f32,
    sharpness: f32,
    direction: Vec2,
    frequency: f32,
    phase: f32,
}

impl Wave {
    /// Create a wave. The direction is normalized here.
    pub fn new(wavelength: f32, speed: f32, amplitude: f32, sharpness: f32, direction: Vec2) -> Self {
        let frequency = 2.0 * PI / wavelength;
        Self {
            wavelength,
            speed,
            amplitude,
            sharpness,
            direction: direction.normalize_or_zero(),
            frequency,
            phase: frequency * speed,
        }
    }

    #[inline]
    pub fn wavelength(&self) -> f32 {
        self.wavelength
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    #[inline]
    pub fn sharpness(&self) -> f32 {
        self.sharpness
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Angular frequency (2π / wavelength)
    #[inline]
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Phase rate (frequency * speed)
    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Interpolate every persistent parameter, then rebuild the derived ones.
    pub fn lerp(&self, other: &Wave, t: f32) -> Wave {
        Wave::new(
            lerp(self.wavelength, other.wavelength, t),
            lerp(self.speed, other.speed, t),
            lerp(self.amplitude, other.amplitude, t),
            lerp(self.sharpness, other.sharpness, t),
            self.direction.lerp(other.direction, t),
        )
    }

    fn validate(&self) -> Result<(), &'static str> {
        if !(self.wavelength.is_finite() && self.wavelength > 0.0) {
            return Err("wavelength must be positive");
        }
        if !(self.amplitude.is_finite() && self.amplitude >= 0.0) {
            return Err("amplitude must be non-negative");
        }
        if !self.speed.is_finite() || !self.sharpness.is_finite() {
            return Err("speed and sharpness must be finite");
        }
        if self.direction == Vec2::ZERO {
            return Err("direction must be non-zero");
        }
        Ok(())
    }
}

impl From<WaveParams> for Wave {
    fn from(p: WaveParams) -> Self {
        Wave::new(p.wavelength, p.speed, p.amplitude, p.sharpness, p.direction)
    }
}

impl From<Wave> for WaveParams {
    fn from(w: Wave) -> Self {
        WaveParams {
            wavelength: w.wavelength,
            speed: w.speed,
            amplitude: w.amplitude,
            sharpness: w.sharpness,
            direction: w.direction,
        }
    }
}

/// One named weather preset: a fixed number of waves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaveSet {
    waves: [Wave; NB_WAVES],
}

impl WaveSet {
    pub fn new(waves: [Wave; NB_WAVES]) -> Self {
        Self { waves }
    }

    pub fn waves(&self) -> &[Wave; NB_WAVES] {
        &self.waves
    }

    pub fn iter(&self) -> impl Iterator<Item = &Wave> {
        self.waves.iter()
    }

    /// Slot-by-slot interpolation toward `other`.
    pub fn lerp(&self, other: &WaveSet, t: f32) -> WaveSet {
        WaveSet {
            waves: std::array::from_fn(|i| self.waves[i].lerp(&other.waves[i], t)),
        }
    }

    fn validate(&self, preset: &'static str) -> Result<(), OceanError> {
        for (slot, wave) in self.waves.iter().enumerate() {
            wave.validate()
                .map_err(|reason| OceanError::InvalidWave { preset, slot, reason })?;
        }
        Ok(())
    }
}

/// Water states the ocean can be asked to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WaterState {
    #[default]
    Calm,
    Choppy,
    Stormy,
}

impl WaterState {
    pub const ALL: [WaterState; 3] = [WaterState::Calm, WaterState::Choppy, WaterState::Stormy];

    pub fn name(self) -> &'static str {
        match self {
            WaterState::Calm => "calm",
            WaterState::Choppy => "choppy",
            WaterState::Stormy => "stormy",
        }
    }
}

impl fmt::Display for WaterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WaterState {
    type Err = OceanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WaterState::ALL
            .into_iter()
            .find(|state| state.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| OceanError::UnknownWaterState(s.to_string()))
    }
}

impl TryFrom<u8> for WaterState {
    type Error = OceanError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        WaterState::ALL
            .get(id as usize)
            .copied()
            .ok_or_else(|| OceanError::UnknownWaterState(id.to_string()))
    }
}

/// The three wave presets, validated once when loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPresets")]
pub struct WavePresets {
    calm: WaveSet,
    choppy: WaveSet,
    stormy: WaveSet,
}

#[derive(Deserialize)]
struct RawPresets {
    calm: WaveSet,
    choppy: WaveSet,
    stormy: WaveSet,
}

impl TryFrom<RawPresets> for WavePresets {
    type Error = OceanError;

    fn try_from(raw: RawPresets) -> Result<Self, Self::Error> {
        WavePresets::new(raw.calm, raw.choppy, raw.stormy)
    }
}

impl WavePresets {
    pub fn new(calm: WaveSet, choppy: WaveSet, stormy: WaveSet) -> Result<Self, OceanError> {
        calm.validate(WaterState::Calm.name())?;
        choppy.validate(WaterState::Choppy.name())?;
        stormy.validate(WaterState::Stormy.name())?;
        Ok(Self {
            calm,
            choppy,
            stormy,
        })
    }

    pub fn get(&self, state: WaterState) -> &WaveSet {
        match state {
            WaterState::Calm => &self.calm,
            WaterState::Choppy => &self.choppy,
            WaterState::Stormy => &self.stormy,
        }
    }
}

impl Default for WavePresets {
    fn default() -> Self {
        // Same five directions for every preset, only energy changes.
        let dirs = [
            Vec2::new(1.0, 0.2),
            Vec2::new(1.0, 3.0),
            Vec2::new(2.0, 4.0),
            Vec2::new(-1.0, 0.0),
            Vec2::new(-1.0, 1.2),
        ];
        let build = |rows: [(f32, f32, f32, f32); NB_WAVES]| {
            WaveSet::new(std::array::from_fn(|i| {
                let (wavelength, speed, amplitude, sharpness) = rows[i];
                Wave::new(wavelength, speed, amplitude, sharpness, dirs[i])
            }))
        };

        Self {
            calm: build([
                (99.0, 0.5, 0.2, 0.5),
                (60.0, 0.6, 0.1, 0.3),
                (20.0, 1.0, 0.05, 0.4),
                (30.0, 0.75, 0.05, 0.2),
                (10.0, 1.0, 0.01, 0.5),
            ]),
            choppy: build([
                (99.0, 0.8, 0.3, 0.5),
                (60.0, 1.2, 0.2, 0.3),
                (20.0, 1.5, 0.1, 0.4),
                (30.0, 1.25, 0.1, 0.2),
                (10.0, 1.5, 0.02, 0.5),
            ]),
            stormy: build([
                (99.0, 1.2, 0.9, 0.4),
                (60.0, 1.8, 0.5, 0.3),
                (20.0, 3.0, 0.4, 0.4),
                (30.0, 2.5, 0.4, 0.3),
                (10.0, 3.5, 0.08, 0.6),
            ]),
        }
    }
}

#[inline]
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
