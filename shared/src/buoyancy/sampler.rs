//! Smoothed water height sampling around a point.
//!
//! A single analytic sample per vertex aliases badly on short waves, so each
//! query averages a small ring of samples instead.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::constants::{DEFAULT_WATER_SAMPLE_COUNT, DEFAULT_WATER_SAMPLE_RADIUS};
use crate::error::OceanError;
use crate::water::HeightSampler;

/// Ring sampling parameters, passed explicitly into every split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingSampling {
    pub sample_count: u32,
    pub radius: f32,
}

impl Default for RingSampling {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_WATER_SAMPLE_COUNT,
            radius: DEFAULT_WATER_SAMPLE_RADIUS,
        }
    }
}

impl RingSampling {
    /// One sample exactly at the query point.
    pub const POINT: RingSampling = RingSampling {
        sample_count: 1,
        radius: 0.0,
    };

    pub fn validate(&self) -> Result<(), OceanError> {
        if self.sample_count == 0 {
            return Err(OceanError::InvalidSampling("sample count must be at least 1"));
        }
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err(OceanError::InvalidSampling("radius must be finite and non-negative"));
        }
        Ok(())
    }

    /// Average of the finite samples on the ring. Yields 0 when no sample is
    /// usable.
    pub fn height(&self, sampler: &impl HeightSampler, position: Vec3) -> f32 {
        let mut total = 0.0;
        let mut valid = 0u32;

        for i in 0..self.sample_count {
            let angle = i as f32 / self.sample_count as f32 * TAU;
            let offset = Vec3::new(angle.cos(), 0.0, angle.sin()) * self.radius;
            let height = sampler.height_at(position + offset);
            if height.is_finite() {
                total += height;
                valid += 1;
            }
        }

        if valid > 0 {
            total / valid as f32
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_surface() {
        let sampling = RingSampling::default();
        let h = sampling.height(&|_: Vec3| 0.75_f32, Vec3::new(4.0, 0.0, -2.0));
        assert!((h - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_ring_averages_linear_slope() {
        // A symmetric ring over a plane returns the plane's value at the centre.
        let sampling = RingSampling {
            sample_count: 8,
            radius: 2.0,
        };
        let slope = |p: Vec3| 0.5 * p.x - 0.25 * p.z;
        let h = sampling.height(&slope, Vec3::new(2.0, 0.0, 4.0));
        assert!((h - 0.0).abs() < 1e-5);
    }

    #[test]
    fn test_non_finite_samples_are_excluded() {
        let sampling = RingSampling {
            sample_count: 4,
            radius: 1.0,
        };
        // Only the sample pushed toward +x is broken.
        let sampler = |p: Vec3| if p.x > 0.5 { f32::NAN } else { 1.0 };
        assert!((sampling.height(&sampler, Vec3::ZERO) - 1.0).abs() < 1e-6);

        let broken = |_: Vec3| f32::INFINITY;
        assert_eq!(sampling.height(&broken, Vec3::ZERO), 0.0);
    }

    #[test]
    fn test_validation() {
        assert!(RingSampling::default().validate().is_ok());
        assert!(RingSampling::POINT.validate().is_ok());
        assert!(RingSampling {
            sample_count: 0,
            radius: 1.0
        }
        .validate()
        .is_err());
        assert!(RingSampling {
            sample_count: 3,
            radius: -1.0
        }
        .validate()
        .is_err());
    }
}
