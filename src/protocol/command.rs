use log::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::encoding::{merge_masked, set_flag, OneByteEncodable};
use super::frame::*;
use super::types::{ClimateState, DegreesC, FanSpeed, Mode, Preset, SwingMode, FAN_MASK, MODE_MASK};

/// A requested change. Fields left as `None` are not touched.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CommandIntent {
    pub mode: Option<Mode>,
    pub fan_speed: Option<FanSpeed>,
    pub target_temperature: Option<f32>,
    pub preset: Option<Preset>,
    pub swing_mode: Option<SwingMode>,
}

impl CommandIntent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_fan_speed(mut self, fan_speed: FanSpeed) -> Self {
        self.fan_speed = Some(fan_speed);
        self
    }

    pub fn with_target_temperature(mut self, celsius: f32) -> Self {
        self.target_temperature = Some(celsius);
        self
    }

    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = Some(preset);
        self
    }

    pub fn with_swing_mode(mut self, swing_mode: SwingMode) -> Self {
        self.swing_mode = Some(swing_mode);
        self
    }
}

/// The byte image of the next frame we send.
///
/// It is never cleared: fields are only ever overwritten, either by echoing
/// what the unit reported or by an accepted intent, so that anything a
/// command does not mention goes out exactly as it was last known.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandBuffer {
    bytes: [u8; TX_FRAME_SIZE],
}

impl Default for CommandBuffer {
    fn default() -> Self {
        let mut bytes = [0u8; TX_FRAME_SIZE];
        bytes[0] = SYNC;
        bytes[1] = SYNC;
        bytes[LENGTH_BYTE] = (TX_FRAME_SIZE - HEADER_LEN) as u8;
        bytes[COMMAND_BYTE] = CMD_OUT_PARAMS_SET;
        CommandBuffer { bytes }
    }
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn byte(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    /// Copies a byte the unit reported into the same offset.
    pub(crate) fn echo(&mut self, offset: usize, byte: u8) {
        if let Some(slot) = self.bytes.get_mut(offset) {
            *slot = byte;
        }
    }

    /// Frame size from the length byte, clamped to the buffer.
    pub fn size(&self) -> usize {
        (HEADER_LEN + self.bytes[LENGTH_BYTE] as usize).min(TX_FRAME_SIZE)
    }

    /// Writes the checksum and returns the frame ready for the wire.
    pub fn seal(&mut self) -> &[u8] {
        let size = self.size();
        self.bytes[size - 1] = checksum(&self.bytes, size);
        &self.bytes[..size]
    }

    /// Asks the unit to apply the next frame rather than treat it as an echo.
    pub fn force_update(&mut self) {
        self.bytes[FORCE_UPDATE_BYTE] = FORCE_UPDATE_ACTIVE;
    }

    pub fn release_force_update(&mut self) {
        self.bytes[FORCE_UPDATE_BYTE] = FORCE_UPDATE_PASSIVE;
    }

    /// Merges an intent into the buffer and mirrors the accepted values into
    /// `state`. Nothing is sent here.
    pub fn apply(&mut self, intent: &CommandIntent, state: &mut ClimateState) {
        self.force_update();
        self.bytes[DISPLAY_BYTE] = DISPLAY_SET_TEMPERATURE;

        let mut mode_bits = self.bytes[MODE_BYTE] & MODE_MASK;
        let mut fan_bits = self.bytes[MODE_BYTE] & FAN_MASK;

        if let Some(mode) = intent.mode {
            mode_bits = mode.encoded_as_byte();
            if mode == Mode::Dry {
                fan_bits = FanSpeed::Low.encoded_as_byte();
            }
        }

        if let Some(fan_speed) = intent.fan_speed {
            fan_bits = fan_speed.encoded_as_byte();
        }

        // DRY only runs on low fan, whatever else was asked for.
        let mode = Mode::decoded_from_byte(mode_bits);
        if mode == Some(Mode::Dry) {
            fan_bits = FanSpeed::Low.encoded_as_byte();
        }

        if let Some(preset) = intent.preset {
            match mode.and_then(|mode| preset.encoded_for(mode)) {
                Some(byte) => {
                    self.bytes[PRESET_BYTE] = byte;
                    state.preset = preset;
                }
                None => warn!("Preset {:?} has no effect in mode {:?}", preset, mode),
            }
        }

        if let Some(celsius) = intent.target_temperature {
            let target = DegreesC(celsius);
            if target.is_valid_setpoint() {
                self.bytes[TEMPERATURE_BYTE] = target.encode_as_setpoint_sixteenths();
                state.target_temperature = celsius;
            } else {
                warn!(
                    "Target temperature out of range: {} (valid: {}-{})",
                    celsius,
                    super::types::MIN_TEMPERATURE,
                    super::types::MAX_TEMPERATURE
                );
            }
        }

        if let Some(swing_mode) = intent.swing_mode {
            self.bytes[SWING_BYTE] = swing_mode.encoded_as_byte();
            state.swing_mode = swing_mode;
        }

        self.bytes[MODE_BYTE] = mode_bits | fan_bits;
        if let Some(mode) = mode {
            state.mode = mode;
        }
        if let Some(fan_speed) = FanSpeed::decoded_from_byte(fan_bits) {
            state.fan_speed = fan_speed;
        }
    }

    /// Sets or clears one bit of a toggle byte (plasma, sleep, x-fan).
    pub fn set_toggle(&mut self, offset: usize, mask: u8, on: bool) {
        if let Some(slot) = self.bytes.get_mut(offset) {
            *slot = set_flag(*slot, mask, on);
        }
    }

    /// Overwrites the vertical (high) or horizontal (low) vane nibble.
    pub fn set_vane(&mut self, vertical: bool, value: u8) {
        let byte = self.bytes[SWING_BYTE];
        self.bytes[SWING_BYTE] = if vertical {
            merge_masked(byte, 0xf0, value << 4)
        } else {
            merge_masked(byte, 0x0f, value)
        };
    }

    pub fn set_display(&mut self, value: u8) {
        self.bytes[DISPLAY_BYTE] = value;
    }
}
