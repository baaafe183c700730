//! Time-based blending between wave presets.
//!
//! The blend is explicit per-tick state: callers drive it with
//! [`WaveTransitionController::advance`] from their own loop.

use bevy_ecs::resource::Resource;
use log::{debug, info};

use super::config::{WavePresets, WaveSet, WaterState};
use crate::error::OceanError;

/// Owns the presets and the currently active, possibly blended, wave state.
#[derive(Resource, Debug, Clone)]
pub struct WaveTransitionController {
    presets: WavePresets,
    current: WaterState,
    target: WaterState,
    /// Snapshot the blend started from
    start: WaveSet,
    active: WaveSet,
    progress: f32,
    /// Seconds spent in the current blend
    elapsed: f32,
    in_flight: bool,
    duration: f32,
}

impl WaveTransitionController {
    /// Start fully settled in [`WaterState::Calm`].
    pub fn new(presets: WavePresets, duration: f32) -> Result<Self, OceanError> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(OceanError::InvalidDuration(duration));
        }
        let calm = *presets.get(WaterState::Calm);
        Ok(Self {
            presets,
            current: WaterState::Calm,
            target: WaterState::Calm,
            start: calm,
            active: calm,
            progress: 1.0,
            elapsed: 0.0,
            in_flight: false,
            duration,
        })
    }

    pub fn presets(&self) -> &WavePresets {
        &self.presets
    }

    pub fn current_state(&self) -> WaterState {
        self.current
    }

    pub fn target_state(&self) -> WaterState {
        self.target
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_transitioning(&self) -> bool {
        self.in_flight
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn active_wave_state(&self) -> &WaveSet {
        &self.active
    }

    /// Request a new water state.
    ///
    /// Asking for the settled state, or for the state already being blended
    /// toward, does nothing. A request made mid-blend restarts from the live
    /// blended waves so there is no visible jump.
    pub fn set_state(&mut self, target: WaterState, immediate: bool) {
        if target == self.current && !self.in_flight {
            return;
        }

        if immediate {
            self.current = target;
            self.target = target;
            self.active = *self.presets.get(target);
            self.start = self.active;
            self.progress = 1.0;
            self.elapsed = 0.0;
            self.in_flight = false;
            info!("Water state set to {} immediately", target);
            return;
        }

        if self.in_flight && target == self.target {
            return;
        }

        info!(
            "Water transition {} -> {} over {:.1}s",
            self.current, target, self.duration
        );
        self.start = self.active;
        self.target = target;
        self.progress = 0.0;
        self.elapsed = 0.0;
        self.in_flight = true;
    }

    /// Advance the blend by `dt` seconds. Returns true on the tick that
    /// completes a transition.
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.in_flight {
            return false;
        }

        // Accumulate time rather than progress so the blend ends exactly
        // once the summed ticks reach the duration.
        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.duration {
            self.progress = 1.0;
            self.current = self.target;
            self.active = *self.presets.get(self.target);
            self.start = self.active;
            self.in_flight = false;
            debug!("Water transition settled on {}", self.current);
            return true;
        }

        self.progress = (self.elapsed / self.duration).min(1.0);
        self.active = self.start.lerp(self.presets.get(self.target), self.progress);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> WaveTransitionController {
        WaveTransitionController::new(WavePresets::default(), 2.0).unwrap()
    }

    #[test]
    fn test_rejects_bad_duration() {
        assert!(matches!(
            WaveTransitionController::new(WavePresets::default(), 0.0),
            Err(OceanError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_transition_converges_exactly() {
        let mut c = controller();
        c.set_state(WaterState::Stormy, false);
        assert!(c.is_transitioning());

        let mut completed = false;
        for _ in 0..7 {
            completed |= c.advance(0.3);
        }
        assert!(completed);
        assert_eq!(c.progress(), 1.0);
        assert_eq!(c.current_state(), WaterState::Stormy);
        assert_eq!(c.active_wave_state(), c.presets().get(WaterState::Stormy));
        assert!(!c.is_transitioning());
    }

    #[test]
    fn test_fixed_rate_ticks_finish_on_duration() {
        let mut c = WaveTransitionController::new(WavePresets::default(), 10.0).unwrap();
        c.set_state(WaterState::Stormy, false);

        let dt = 0.02_f32;
        let mut summed = 0.0_f32;
        let mut ticks = 0;
        let mut completed = false;
        while summed < c.duration() {
            completed = c.advance(dt);
            summed += dt;
            ticks += 1;
        }

        assert!((499..=501).contains(&ticks), "ticks {ticks}");
        assert!(completed);
        assert_eq!(c.progress(), 1.0);
        assert!(!c.is_transitioning());
        assert_eq!(c.active_wave_state(), c.presets().get(WaterState::Stormy));
    }

    #[test]
    fn test_progress_is_time_based() {
        let mut fine = controller();
        let mut coarse = controller();
        fine.set_state(WaterState::Choppy, false);
        coarse.set_state(WaterState::Choppy, false);
        for _ in 0..10 {
            fine.advance(0.05);
        }
        coarse.advance(0.5);
        assert!((fine.progress() - coarse.progress()).abs() < 1e-5);
        assert!((fine.progress() - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_immediate_set_is_idempotent() {
        let mut c = controller();
        c.set_state(WaterState::Stormy, true);
        let snapshot = *c.active_wave_state();
        assert_eq!(&snapshot, c.presets().get(WaterState::Stormy));

        c.set_state(WaterState::Stormy, true);
        assert_eq!(c.active_wave_state(), &snapshot);
        assert!(!c.is_transitioning());
        assert_eq!(c.progress(), 1.0);
    }

    #[test]
    fn test_same_state_is_noop() {
        let mut c = controller();
        c.set_state(WaterState::Calm, false);
        assert!(!c.is_transitioning());
        assert!(!c.advance(1.0));
    }

    #[test]
    fn test_restart_rebases_from_live_state() {
        let mut c = controller();
        c.set_state(WaterState::Stormy, false);
        c.advance(1.0);
        let live = *c.active_wave_state();

        c.set_state(WaterState::Calm, false);
        assert_eq!(c.progress(), 0.0);
        assert_eq!(c.target_state(), WaterState::Calm);
        // First small step stays close to where the previous blend was.
        c.advance(1e-4);
        let amp_live = live.waves()[0].amplitude();
        let amp_now = c.active_wave_state().waves()[0].amplitude();
        assert!((amp_live - amp_now).abs() < 1e-3);

        c.advance(5.0);
        assert_eq!(c.current_state(), WaterState::Calm);
        assert_eq!(c.active_wave_state(), c.presets().get(WaterState::Calm));
    }

    #[test]
    fn test_repeated_request_keeps_progress() {
        let mut c = controller();
        c.set_state(WaterState::Choppy, false);
        c.advance(1.0);
        c.set_state(WaterState::Choppy, false);
        assert!((c.progress() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_immediate_cancels_in_flight() {
        let mut c = controller();
        c.set_state(WaterState::Stormy, false);
        c.advance(0.5);
        c.set_state(WaterState::Choppy, true);
        assert!(!c.is_transitioning());
        assert_eq!(c.current_state(), WaterState::Choppy);
        assert!(!c.advance(1.0));
        assert_eq!(c.active_wave_state(), c.presets().get(WaterState::Choppy));
    }
}
