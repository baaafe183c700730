use std::error::Error;
use std::fs;
use std::path::Path;

use bevy::math::Vec3;
use bevy_log::info;
use ron::de::from_str;
use serde::{Deserialize, Serialize};
use shared::buoyancy::FloatingBodyConfig;
use shared::water::WavePresets;
use shared::{OceanSettings, TICKS_PER_SECOND};

use crate::weather::{GameState, WeatherChange};

/// Box hull used by the headless boat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullConfig {
    pub half_extents: Vec3,
    /// Kilograms
    pub mass: f32,
    /// Height above the ocean origin the hull is dropped from
    pub spawn_height: f32,
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            half_extents: Vec3::new(1.0, 0.5, 2.0),
            mass: 4000.0,
            spawn_height: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WakeConfig {
    /// Seconds between two wake interactions of the same body
    pub interval: f32,
    /// Interaction strength per m/s of horizontal speed
    pub strength_per_speed: f32,
    pub max_strength: f32,
}

impl Default for WakeConfig {
    fn default() -> Self {
        Self {
            interval: 0.5,
            strength_per_speed: 0.2,
            max_strength: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub tick_rate: u64,
    pub ocean: OceanSettings,
    pub presets: WavePresets,
    pub body: FloatingBodyConfig,
    pub hull: HullConfig,
    pub wake: WakeConfig,
    pub weather: Vec<WeatherChange>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICKS_PER_SECOND,
            ocean: OceanSettings::default(),
            presets: WavePresets::default(),
            body: FloatingBodyConfig::default(),
            hull: HullConfig::default(),
            wake: WakeConfig::default(),
            weather: vec![
                WeatherChange::new(20.0, GameState::StormIncoming),
                WeatherChange::new(40.0, GameState::Stormy),
                WeatherChange::new(80.0, GameState::Calm),
            ],
        }
    }
}

pub fn parse_sim_config(contents: &str) -> Result<SimConfig, Box<dyn Error>> {
    let config: SimConfig = from_str(contents)?;
    if config.tick_rate == 0 {
        return Err("tick_rate must be at least 1".into());
    }
    Ok(config)
}

/// Read the simulation config, falling back to defaults when the file does
/// not exist.
pub fn load_sim_config(path: &Path) -> Result<SimConfig, Box<dyn Error>> {
    if !path.exists() {
        info!(
            "Simulation config not found: {}. Using default config.",
            path.display()
        );
        return Ok(SimConfig::default());
    }

    let contents: String = fs::read_to_string(path)?;
    let config = parse_sim_config(&contents)?;

    info!("Loaded simulation config from disk: {}", path.display());

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::water::WaterState;

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("sailsim-headless-does-not-exist.ron");
        let config = load_sim_config(&path).unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_sim_config(
            "(
                tick_rate: 100,
                ocean: (transition_duration: 4.0),
                body: (angular_smoothing: None, linear_damping: 0.2),
                weather: [(at: 5.0, state: Stormy, immediate: true)],
            )",
        )
        .unwrap();

        assert_eq!(config.tick_rate, 100);
        assert_eq!(config.ocean.transition_duration, 4.0);
        assert_eq!(config.ocean.amplitude_slew_rate, 0.1);
        assert_eq!(config.body.angular_smoothing, None);
        assert_eq!(config.body.linear_damping, 0.2);
        assert_eq!(config.body.angular_damping, 0.5);
        assert_eq!(config.hull, HullConfig::default());
        assert_eq!(config.weather.len(), 1);
        assert_eq!(WaterState::from(config.weather[0].state), WaterState::Stormy);
        assert!(config.weather[0].immediate);
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let config = parse_sim_config(include_str!("../config/default.ron")).unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_zero_tick_rate_is_rejected() {
        assert!(parse_sim_config("(tick_rate: 0)").is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse_sim_config("(tick_rate: \"fast\")").is_err());
    }

    #[test]
    fn test_config_file_on_disk() {
        let path = std::env::temp_dir().join(format!(
            "sailsim-headless-config-{}.ron",
            std::process::id()
        ));
        fs::write(&path, "(hull: (mass: 1500.0))").unwrap();
        let config = load_sim_config(&path);
        fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.hull.mass, 1500.0);
        assert_eq!(config.hull.spawn_height, 1.0);
    }
}
