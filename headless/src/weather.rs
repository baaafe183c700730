//! Scripted weather: a timeline of game states replayed through the ocean's
//! request events.

use bevy::prelude::*;
use bevy_log::info;
use serde::{Deserialize, Serialize};
use shared::water::WaterState;
use shared::{OceanClock, WaterStateRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Calm,
    StormIncoming,
    Stormy,
}

impl From<GameState> for WaterState {
    fn from(state: GameState) -> Self {
        match state {
            GameState::Calm => WaterState::Calm,
            GameState::StormIncoming => WaterState::Choppy,
            GameState::Stormy => WaterState::Stormy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherChange {
    /// Ocean time in seconds
    pub at: f32,
    pub state: GameState,
    #[serde(default)]
    pub immediate: bool,
}

impl WeatherChange {
    pub fn new(at: f32, state: GameState) -> Self {
        Self {
            at,
            state,
            immediate: false,
        }
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct WeatherTimeline {
    changes: Vec<WeatherChange>,
    next: usize,
    state: GameState,
}

impl WeatherTimeline {
    pub fn new(mut changes: Vec<WeatherChange>) -> Self {
        changes.retain(|c| c.at.is_finite());
        changes.sort_by(|a, b| a.at.total_cmp(&b.at));
        Self {
            changes,
            next: 0,
            state: GameState::Calm,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Next change due at or before `now`, in schedule order.
    pub fn pop_due(&mut self, now: f32) -> Option<WeatherChange> {
        let change = *self.changes.get(self.next)?;
        if change.at > now {
            return None;
        }
        self.next += 1;
        self.state = change.state;
        Some(change)
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.changes.len()
    }
}

pub fn drive_weather(
    clock: Res<OceanClock>,
    mut timeline: ResMut<WeatherTimeline>,
    mut requests: EventWriter<WaterStateRequest>,
) {
    while let Some(change) = timeline.pop_due(clock.elapsed()) {
        info!("Weather set to {:?} at {:.1}s", change.state, clock.elapsed());
        requests.write(WaterStateRequest {
            state: change.state.into(),
            immediate: change.immediate,
        });
    }
}
