use std::error::Error;
use std::f32::consts::TAU;
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy::transform::TransformPlugin;
use bevy_log::info;
use bevy_rapier3d::prelude::Velocity;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::buoyancy::FloatingBody;
use shared::physics::{BuoyancyPhysicsPlugin, FloatingBodyBundle};
use shared::sets::OceanFixedSet;
use shared::water::{HeightSampler, WaveField, WaveTransitionController};
use shared::{ocean_uniforms, OceanClock, OceanPlugin};

use crate::config::SimConfig;
use crate::wake::{emit_wakes, Wake, WakeSettings};
use crate::weather::{drive_weather, WeatherTimeline};

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub ticks: u64,
    pub seed: u64,
    /// Log the boat every this many ticks, 0 disables
    pub log_every: u64,
}

#[derive(Component, Debug)]
pub struct Boat;

/// Add the simulation to `app`: ocean, Rapier, scripted weather and one boat.
/// Time advances by exactly one fixed tick per `App::update`.
pub fn build_app(mut app: App, config: &SimConfig, seed: u64) -> Result<App, Box<dyn Error>> {
    let ocean = OceanPlugin::new(config.presets.clone(), config.ocean.clone())?;
    let tick = Duration::from_secs_f64(1.0 / config.tick_rate as f64);

    app.add_plugins(MinimalPlugins)
        .add_plugins(TransformPlugin)
        .add_plugins(BuoyancyPhysicsPlugin)
        .add_plugins(ocean);

    app.insert_resource(Time::<Fixed>::from_duration(tick));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(tick));

    app.insert_resource(WeatherTimeline::new(config.weather.clone()));
    app.insert_resource(WakeSettings(config.wake.clone()));
    app.add_systems(FixedUpdate, drive_weather.before(OceanFixedSet::Waves));
    app.add_systems(FixedUpdate, emit_wakes.after(OceanFixedSet::Buoyancy));

    let mut rng = StdRng::seed_from_u64(seed);
    let yaw = rng.gen_range(0.0..TAU);
    let drop = config.hull.spawn_height + rng.gen_range(0.0..0.5);
    let transform = Transform::from_translation(config.ocean.origin + Vec3::Y * drop)
        .with_rotation(Quat::from_rotation_y(yaw));

    let bundle =
        FloatingBodyBundle::cuboid(config.hull.half_extents, config.hull.mass, &config.body, transform)?;
    app.world_mut().spawn((bundle, Wake::default(), Boat));

    info!(
        "Spawned boat at {:.2} (yaw {:.2} rad), {} ticks per second",
        transform.translation, yaw, config.tick_rate
    );

    app.finish();
    app.cleanup();
    Ok(app)
}

/// One-line boat state. Counts are clipped fragments, which can outnumber
/// the hull's own triangles.
pub fn describe_boat(
    transform: &Transform,
    velocity: &Velocity,
    floating: &FloatingBody,
    surface: f32,
) -> String {
    format!(
        "boat y {:.3} (surface {:.3}), speed {:.2}, wet {} / dry {} fragments, buoyancy {:.0} N",
        transform.translation.y,
        surface,
        velocity.linvel.length(),
        floating.wet_triangles().len(),
        floating.dry_triangles().len(),
        floating.last_forces().buoyancy.length(),
    )
}

pub fn log_boat(world: &mut World, tick: u64) {
    let mut boats = world.query_filtered::<(&Transform, &Velocity, &FloatingBody), With<Boat>>();
    let clock = *world.resource::<OceanClock>();
    let controller = world.resource::<WaveTransitionController>();
    let water = if controller.is_transitioning() {
        format!(
            "{} -> {} ({:.0}%)",
            controller.current_state(),
            controller.target_state(),
            controller.progress() * 100.0
        )
    } else {
        controller.current_state().to_string()
    };

    let field = world.resource::<WaveField>();
    let shader_bytes = ocean_uniforms(field).map_or(0, |u| u.as_bytes().len());
    let surface = field.at(clock.elapsed());

    for (transform, velocity, floating) in boats.iter(world) {
        info!(
            "[{tick} | {:.2}s] water {water}, {}",
            clock.elapsed(),
            describe_boat(
                transform,
                velocity,
                floating,
                surface.height_at(transform.translation)
            ),
        );
    }
    bevy_log::debug!("Ocean uniforms: {shader_bytes} bytes");
}

pub fn run(config: SimConfig, options: RunOptions) -> Result<(), Box<dyn Error>> {
    let mut app = App::new();
    app.add_plugins(bevy::log::LogPlugin::default());
    let mut app = build_app(app, &config, options.seed)?;

    for tick in 1..=options.ticks {
        app.update();
        if options.log_every > 0 && tick % options.log_every == 0 {
            log_boat(app.world_mut(), tick);
        }
    }

    info!("Simulation finished after {} ticks", options.ticks);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::{GameState, WeatherChange};
    use shared::water::WaterState;

    fn quiet_config() -> SimConfig {
        SimConfig {
            weather: vec![WeatherChange::new(0.5, GameState::Stormy)],
            ..Default::default()
        }
    }

    #[test]
    fn test_one_update_is_one_tick() {
        let mut app = build_app(App::new(), &quiet_config(), 7).unwrap();
        for _ in 0..100 {
            app.update();
        }
        let elapsed = app.world().resource::<OceanClock>().elapsed();
        assert!((elapsed - 2.0).abs() < 0.05, "elapsed {elapsed}");
    }

    #[test]
    fn test_weather_reaches_the_ocean() {
        let mut app = build_app(App::new(), &quiet_config(), 7).unwrap();
        for _ in 0..50 {
            app.update();
        }
        let controller = app.world().resource::<WaveTransitionController>();
        assert_eq!(controller.target_state(), WaterState::Stormy);
        assert!(controller.is_transitioning());
        assert!(app.world().resource::<WeatherTimeline>().is_finished());
    }

    #[test]
    fn test_boat_stays_finite() {
        let mut app = build_app(App::new(), &quiet_config(), 42).unwrap();
        for _ in 0..200 {
            app.update();
        }
        let mut boats = app
            .world_mut()
            .query_filtered::<(&Transform, &Velocity), With<Boat>>();
        let (transform, velocity) = boats.single(app.world()).unwrap();
        assert!(transform.translation.is_finite());
        assert!(velocity.linvel.is_finite());
        assert!(transform.translation.y > -5.0);
    }

    #[test]
    fn test_invalid_ocean_settings_fail_to_build() {
        let mut config = quiet_config();
        config.ocean.transition_duration = -1.0;
        assert!(build_app(App::new(), &config, 0).is_err());
    }

    #[test]
    fn test_boat_summary_reports_fragments() {
        let mut app = build_app(App::new(), &quiet_config(), 3).unwrap();
        for _ in 0..20 {
            app.update();
        }
        let mut boats = app
            .world_mut()
            .query_filtered::<(&Transform, &Velocity, &FloatingBody), With<Boat>>();
        let (transform, velocity, floating) = boats.single(app.world()).unwrap();
        let line = describe_boat(transform, velocity, floating, 0.0);

        let expected = format!(
            "wet {} / dry {} fragments",
            floating.wet_triangles().len(),
            floating.dry_triangles().len()
        );
        assert!(line.contains(&expected), "{line}");
        assert!(!line.contains("tris"));
    }
}
