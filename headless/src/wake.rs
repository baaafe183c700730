use bevy::prelude::*;
use bevy_rapier3d::prelude::Velocity;
use shared::buoyancy::FloatingBody;
use shared::InteractionEvent;

use crate::config::WakeConfig;

/// Per-body wake emitter.
#[derive(Component, Debug, Clone, Default)]
pub struct Wake {
    since_last: f32,
}

impl WakeConfig {
    /// Interaction strength for a body moving at `velocity`.
    pub fn strength(&self, velocity: Vec3) -> f32 {
        let speed = Vec2::new(velocity.x, velocity.z).length();
        (speed * self.strength_per_speed).min(self.max_strength)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct WakeSettings(pub WakeConfig);

pub fn emit_wakes(
    time: Res<Time<Fixed>>,
    settings: Res<WakeSettings>,
    mut bodies: Query<(&Transform, &Velocity, &mut Wake), With<FloatingBody>>,
    mut events: EventWriter<InteractionEvent>,
) {
    let dt = time.delta_secs();
    for (transform, velocity, mut wake) in &mut bodies {
        wake.since_last += dt;
        if wake.since_last < settings.0.interval {
            continue;
        }
        wake.since_last = 0.0;

        let strength = settings.0.strength(velocity.linvel);
        if strength > 0.0 {
            events.write(InteractionEvent {
                position: transform.translation,
                strength,
            });
        }
    }
}
