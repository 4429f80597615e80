use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::protocol::types::{
    FanSpeed, Mode, Preset, SwingMode, MAX_TEMPERATURE, MIN_TEMPERATURE, TEMPERATURE_STEP,
};

pub const DEFAULT_UPDATE_INTERVAL_MS: u32 = 1_000;
pub const HANDSHAKE_RETRY_INTERVAL_MS: u32 = 1_000;
pub const RECEIVE_TIMEOUT_MS: u32 = 5_000;

/// Serial line settings the unit expects: 4800 baud, 8 data bits, even
/// parity, one stop bit.
pub const BAUD_RATE: u32 = 4800;

/// Driver settings. Timings are in milliseconds of whatever clock the host
/// passes to the entry points.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    pub update_interval_ms: u32,
    pub handshake_retry_ms: u32,
    pub receive_timeout_ms: u32,
    pub supported_presets: Vec<Preset, 2>,
    pub supported_swing_modes: Vec<SwingMode, 4>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            handshake_retry_ms: HANDSHAKE_RETRY_INTERVAL_MS,
            receive_timeout_ms: RECEIVE_TIMEOUT_MS,
            supported_presets: Vec::new(),
            supported_swing_modes: SwingMode::ALL.iter().copied().collect(),
        }
    }
}

impl Config {
    pub fn with_update_interval(mut self, ms: u32) -> Self {
        self.update_interval_ms = ms;
        self
    }

    pub fn with_handshake_retry(mut self, ms: u32) -> Self {
        self.handshake_retry_ms = ms;
        self
    }

    pub fn with_receive_timeout(mut self, ms: u32) -> Self {
        self.receive_timeout_ms = ms;
        self
    }

    pub fn with_presets(mut self, presets: &[Preset]) -> Self {
        self.supported_presets = dedup(presets);
        self
    }

    pub fn with_swing_modes(mut self, swing_modes: &[SwingMode]) -> Self {
        self.supported_swing_modes = dedup(swing_modes);
        self
    }

    pub fn traits(&self) -> ClimateTraits {
        // `None` is always offered, first.
        let mut presets: Vec<Preset, 2> = Vec::new();
        for preset in core::iter::once(&Preset::None).chain(self.supported_presets.iter()) {
            if !presets.contains(preset) && presets.push(*preset).is_err() {
                break;
            }
        }

        ClimateTraits {
            min_temperature: MIN_TEMPERATURE,
            max_temperature: MAX_TEMPERATURE,
            temperature_step: TEMPERATURE_STEP,
            supports_current_temperature: true,
            modes: Mode::ALL,
            fan_speeds: FanSpeed::ALL,
            swing_modes: self.supported_swing_modes.clone(),
            presets,
        }
    }
}

fn dedup<T: Copy + PartialEq, const N: usize>(values: &[T]) -> Vec<T, N> {
    let mut out = Vec::new();
    for value in values {
        if !out.contains(value) && out.push(*value).is_err() {
            break;
        }
    }
    out
}

/// What the host may offer for this unit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClimateTraits {
    pub min_temperature: f32,
    pub max_temperature: f32,
    pub temperature_step: f32,
    pub supports_current_temperature: bool,
    pub modes: [Mode; 6],
    pub fan_speeds: [FanSpeed; 4],
    pub swing_modes: Vec<SwingMode, 4>,
    pub presets: Vec<Preset, 2>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_traits() {
        let traits = Config::default().traits();
        assert_eq!(traits.min_temperature, 16.0);
        assert_eq!(traits.max_temperature, 30.0);
        assert_eq!(traits.presets.as_slice(), &[Preset::None]);
        assert_eq!(traits.swing_modes.as_slice(), &SwingMode::ALL);
        assert_eq!(traits.modes.len(), 6);
    }

    #[test]
    fn configured_presets_and_swing_modes() {
        let config = Config::default()
            .with_presets(&[Preset::Boost, Preset::Boost])
            .with_swing_modes(&[SwingMode::Off, SwingMode::Vertical]);
        let traits = config.traits();
        assert_eq!(traits.presets.as_slice(), &[Preset::None, Preset::Boost]);
        assert_eq!(traits.swing_modes.as_slice(), &[SwingMode::Off, SwingMode::Vertical]);
    }

    #[test]
    fn builder_timings() {
        let config = Config::default().with_update_interval(2_000).with_receive_timeout(10_000);
        assert_eq!(config.update_interval_ms, 2_000);
        assert_eq!(config.receive_timeout_ms, 10_000);
        assert_eq!(config.handshake_retry_ms, HANDSHAKE_RETRY_INTERVAL_MS);
    }
}
