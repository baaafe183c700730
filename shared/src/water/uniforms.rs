//! Ocean material uniform data.
//!
//! Read-only view of the wave state and interaction ring in the layout the
//! ocean shader expects (`waves_p`, `waves_d`, `interactions`).

use bytemuck::{Pod, Zeroable};

use super::config::WaveSet;
use super::interaction::InteractionRing;
use crate::constants::{NB_INTERACTIONS, NB_WAVES};

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct OceanUniforms {
    /// `(frequency, amplitude, phase, sharpness)` per wave
    pub waves_p: [[f32; 4]; NB_WAVES],
    /// `(dir.x, dir.y, 0, 0)` per wave
    pub waves_d: [[f32; 4]; NB_WAVES],
    /// `(x, z, strength, time)` per interaction slot
    pub interactions: [[f32; 4]; NB_INTERACTIONS],
}

impl OceanUniforms {
    /// Pack the current state. Amplitudes already include the global scale.
    pub fn pack(waves: &WaveSet, amplitude_scale: f32, ring: &InteractionRing) -> Self {
        let mut uniforms = Self::zeroed();
        for (i, wave) in waves.iter().enumerate() {
            uniforms.waves_p[i] = [
                wave.frequency(),
                wave.amplitude() * amplitude_scale,
                wave.phase(),
                wave.sharpness(),
            ];
            let dir = wave.direction();
            uniforms.waves_d[i] = [dir.x, dir.y, 0.0, 0.0];
        }
        for (slot, interaction) in uniforms.interactions.iter_mut().zip(ring.slots()) {
            *slot = interaction.as_vec4().to_array();
        }
        uniforms
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::water::config::{WavePresets, WaterState};

    #[test]
    fn test_pack_layout() {
        let waves = *WavePresets::default().get(WaterState::Choppy);
        let mut ring = InteractionRing::new();
        ring.push(1.0, 2.0, 0.5, 3.0);

        let uniforms = OceanUniforms::pack(&waves, 2.0, &ring);
        let first = waves.waves()[0];
        assert_eq!(uniforms.waves_p[0][0], first.frequency());
        assert_eq!(uniforms.waves_p[0][1], first.amplitude() * 2.0);
        assert_eq!(uniforms.waves_d[0][2], 0.0);
        assert_eq!(uniforms.interactions[0], [1.0, 2.0, 0.5, 3.0]);
        assert_eq!(
            uniforms.as_bytes().len(),
            (NB_WAVES * 2 + NB_INTERACTIONS) * 16
        );
    }
}
