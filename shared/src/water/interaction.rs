//! Ring buffer of transient surface disturbances (wakes, splashes).
//!
//! The ring is only read by the ocean material; it never changes the
//! analytic height field.

use bevy::math::Vec4;

use crate::constants::NB_INTERACTIONS;

/// One recorded disturbance in ocean-local coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Interaction {
    pub x: f32,
    pub z: f32,
    pub strength: f32,
    pub time: f32,
}

impl Interaction {
    /// Packed as `(x, z, strength, time)` for the shader.
    pub fn as_vec4(&self) -> Vec4 {
        Vec4::new(self.x, self.z, self.strength, self.time)
    }
}

/// Fixed-capacity ring. Entries are never removed, only overwritten.
#[derive(Debug, Clone)]
pub struct InteractionRing {
    slots: [Interaction; NB_INTERACTIONS],
    cursor: usize,
}

impl Default for InteractionRing {
    fn default() -> Self {
        Self {
            slots: [Interaction::default(); NB_INTERACTIONS],
            cursor: 0,
        }
    }
}

impl InteractionRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write at the cursor and advance it, wrapping at capacity.
    pub fn push(&mut self, x: f32, z: f32, strength: f32, time: f32) {
        self.slots[self.cursor] = Interaction { x, z, strength, time };
        self.cursor = (self.cursor + 1) % NB_INTERACTIONS;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn slots(&self) -> &[Interaction; NB_INTERACTIONS] {
        &self.slots
    }

    /// The most recently written entry, if anything has been written yet.
    pub fn latest(&self) -> Option<&Interaction> {
        let index = (self.cursor + NB_INTERACTIONS - 1) % NB_INTERACTIONS;
        let entry = &self.slots[index];
        (entry.time != 0.0 || entry.strength != 0.0).then_some(entry)
    }

    /// Entries younger than `max_age` at time `now`.
    pub fn recent(&self, now: f32, max_age: f32) -> impl Iterator<Item = &Interaction> {
        self.slots
            .iter()
            .filter(move |i| i.strength != 0.0 && now - i.time <= max_age && i.time <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_wraps() {
        let mut ring = InteractionRing::new();
        for i in 0..NB_INTERACTIONS {
            ring.push(i as f32, 0.0, 1.0, i as f32);
        }
        assert_eq!(ring.cursor(), 0);

        ring.push(-5.0, 7.0, 2.0, 100.0);
        assert_eq!(ring.cursor(), 1);
        assert_eq!(ring.slots()[0].x, -5.0);
        assert_eq!(ring.slots()[0].z, 7.0);
        // Second slot still holds the old write
        assert_eq!(ring.slots()[1].x, 1.0);
        assert_eq!(ring.latest().unwrap().time, 100.0);
    }

    #[test]
    fn test_recent_filters_by_age() {
        let mut ring = InteractionRing::new();
        assert!(ring.latest().is_none());
        ring.push(0.0, 0.0, 1.0, 1.0);
        ring.push(0.0, 0.0, 1.0, 9.0);
        assert_eq!(ring.recent(10.0, 2.0).count(), 1);
        assert_eq!(ring.recent(10.0, 20.0).count(), 2);
    }
}
