//! Bevy plugin tying the ocean and the floating bodies to the app schedule.

use bevy::prelude::*;
use bevy_log::{debug, error};
use bevy_rapier3d::prelude::{ExternalForce, ReadMassProperties, Sleeping, Velocity};
use serde::{Deserialize, Serialize};

use crate::buoyancy::FloatingBody;
use crate::constants::{DEFAULT_AMPLITUDE_SLEW_RATE, DEFAULT_TRANSITION_DURATION};
use crate::error::{OceanError, TickStatus};
use crate::physics::RapierFloatingBody;
use crate::sets::{OceanFixedSet, OceanUpdateSet};
use crate::water::{
    AmplitudeScale, OceanUniforms, WavePresets, WaveField, WaveTransitionController, WaterState,
};

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OceanSettings {
    /// Seconds to blend from one preset to the next
    pub transition_duration: f32,
    /// Amplitude multiplier change per second
    pub amplitude_slew_rate: f32,
    /// World-space position of the ocean origin
    pub origin: Vec3,
}

impl Default for OceanSettings {
    fn default() -> Self {
        Self {
            transition_duration: DEFAULT_TRANSITION_DURATION,
            amplitude_slew_rate: DEFAULT_AMPLITUDE_SLEW_RATE,
            origin: Vec3::ZERO,
        }
    }
}

/// Seconds of simulated ocean time, advanced on the fixed clock.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct OceanClock {
    elapsed: f32,
}

impl OceanClock {
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Ask the ocean to move to another preset.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct WaterStateRequest {
    pub state: WaterState,
    pub immediate: bool,
}

/// Ask the global amplitude multiplier to slew toward `target`.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AmplitudeRequest {
    pub target: f32,
}

/// A world-space disturbance for the ocean material, such as a boat wake.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct InteractionEvent {
    pub position: Vec3,
    pub strength: f32,
}

/// Plugin that adds the ocean and buoyancy simulation.
///
/// This plugin:
/// - Owns the wave presets and blends between them on request
/// - Snapshots the active waves into [`WaveField`] at the start of every fixed tick
/// - Applies buoyancy to every entity with a [`FloatingBody`]
///
/// Rapier itself is added separately, see
/// [`BuoyancyPhysicsPlugin`](crate::physics::BuoyancyPhysicsPlugin).
pub struct OceanPlugin {
    settings: OceanSettings,
    controller: WaveTransitionController,
}

impl OceanPlugin {
    /// Fails when the presets or settings could not drive a valid ocean.
    pub fn new(presets: WavePresets, settings: OceanSettings) -> Result<Self, OceanError> {
        let controller = WaveTransitionController::new(presets, settings.transition_duration)?;
        Ok(Self {
            settings,
            controller,
        })
    }
}

impl Plugin for OceanPlugin {
    fn build(&self, app: &mut App) {
        let mut field = WaveField::new(
            self.settings.origin,
            AmplitudeScale::new(self.settings.amplitude_slew_rate),
        );
        field.set_waves(self.controller.active_wave_state());

        app.insert_resource(self.settings.clone())
            .insert_resource(self.controller.clone())
            .insert_resource(field)
            .init_resource::<OceanClock>()
            .add_event::<WaterStateRequest>()
            .add_event::<AmplitudeRequest>()
            .add_event::<InteractionEvent>()
            .configure_sets(
                FixedUpdate,
                (OceanFixedSet::Waves, OceanFixedSet::Buoyancy).chain(),
            )
            .add_systems(
                Update,
                (
                    handle_water_state_requests,
                    handle_amplitude_requests,
                    handle_interaction_events,
                )
                    .in_set(OceanUpdateSet::Requests),
            )
            .add_systems(FixedUpdate, advance_waves.in_set(OceanFixedSet::Waves))
            .add_systems(FixedUpdate, apply_buoyancy.in_set(OceanFixedSet::Buoyancy));
    }
}

fn handle_water_state_requests(
    mut requests: EventReader<WaterStateRequest>,
    mut controller: ResMut<WaveTransitionController>,
) {
    for request in requests.read() {
        controller.set_state(request.state, request.immediate);
    }
}

fn handle_amplitude_requests(
    mut requests: EventReader<AmplitudeRequest>,
    mut field: ResMut<WaveField>,
) {
    for request in requests.read() {
        field.amplitude_mut().set_target(request.target);
    }
}

fn handle_interaction_events(
    mut events: EventReader<InteractionEvent>,
    mut field: ResMut<WaveField>,
    clock: Res<OceanClock>,
) {
    for event in events.read() {
        field.register_interaction(event.position, event.strength, clock.elapsed());
    }
}

/// Runs once per fixed tick before any body samples the field.
fn advance_waves(
    time: Res<Time<Fixed>>,
    mut clock: ResMut<OceanClock>,
    mut controller: ResMut<WaveTransitionController>,
    mut field: ResMut<WaveField>,
) {
    let dt = time.delta_secs();
    clock.elapsed += dt;

    if controller.advance(dt) {
        debug!("Ocean now {}", controller.current_state());
    }
    field.amplitude_mut().advance(dt);
    field.set_waves(controller.active_wave_state());
}

fn apply_buoyancy(
    time: Res<Time<Fixed>>,
    clock: Res<OceanClock>,
    field: Res<WaveField>,
    mut bodies: Query<(
        Entity,
        &mut FloatingBody,
        &Transform,
        &mut Velocity,
        &mut ExternalForce,
        &ReadMassProperties,
        Option<&Sleeping>,
    )>,
) {
    let dt = time.delta_secs();
    let surface = field.at(clock.elapsed());

    for (entity, mut floating, transform, mut velocity, mut external_force, mass, sleeping) in
        &mut bodies
    {
        let mut body = RapierFloatingBody::new(transform, *velocity, mass, sleeping);
        match floating.step(&mut body, &surface, dt) {
            TickStatus::Applied { .. } => {
                velocity.set_if_neq(body.velocity());
                external_force.set_if_neq(body.external_force());
            }
            // Touching the components would wake the body up.
            TickStatus::Sleeping => {}
            TickStatus::Skipped(fault) => {
                error!("Buoyancy skipped for {entity}: {fault}");
                external_force.set_if_neq(ExternalForce::default());
            }
        }
    }
}

/// Shader-side view of the ocean, or `None` before the first wave snapshot.
pub fn ocean_uniforms(field: &WaveField) -> Option<OceanUniforms> {
    let waves = field.waves()?;
    Some(OceanUniforms::pack(
        waves,
        field.amplitude().current(),
        field.interactions(),
    ))
}
