//! Extra damping, uprighting torque and angular velocity smoothing applied
//! to floating bodies after the hydrostatic forces.

use bevy::math::Vec3;

/// Per-tick velocity scale `1 - k * dt`, floored at zero.
#[inline]
pub fn damping_factor(coefficient: f32, dt: f32) -> f32 {
    (1.0 - coefficient * dt).max(0.0)
}

/// Constant-gain torque rotating `up` toward world up.
#[inline]
pub fn uprighting_torque(up: Vec3, gain: f32) -> Vec3 {
    up.cross(Vec3::Y) * gain
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stabilizer {
    pub angular_damping: f32,
    pub linear_damping: f32,
    pub torque_gain: f32,
    /// Lerp factor toward the physics angular velocity; `None` disables it.
    pub angular_smoothing: Option<f32>,
    smoothed_angular_velocity: Vec3,
}

impl Stabilizer {
    pub fn new(
        angular_damping: f32,
        linear_damping: f32,
        torque_gain: f32,
        angular_smoothing: Option<f32>,
    ) -> Self {
        Self {
            angular_damping,
            linear_damping,
            torque_gain,
            angular_smoothing: angular_smoothing.map(|s| s.clamp(0.0, 1.0)),
            smoothed_angular_velocity: Vec3::ZERO,
        }
    }

    pub fn damp(&self, linear: Vec3, angular: Vec3, dt: f32) -> (Vec3, Vec3) {
        (
            linear * damping_factor(self.linear_damping, dt),
            angular * damping_factor(self.angular_damping, dt),
        )
    }

    pub fn torque(&self, up: Vec3) -> Vec3 {
        uprighting_torque(up, self.torque_gain)
    }

    /// Blend the running average toward `angular` and return the value the
    /// body should carry.
    pub fn smooth(&mut self, angular: Vec3) -> Vec3 {
        match self.angular_smoothing {
            Some(alpha) => {
                self.smoothed_angular_velocity = self.smoothed_angular_velocity.lerp(angular, alpha);
                self.smoothed_angular_velocity
            }
            None => angular,
        }
    }

    pub fn smoothed_angular_velocity(&self) -> Vec3 {
        self.smoothed_angular_velocity
    }
}
