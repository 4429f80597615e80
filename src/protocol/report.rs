use log::warn;

use super::command::CommandBuffer;
use super::encoding::OneByteEncodable;
use super::frame::*;
use super::types::{ClimateState, FanSpeed, Mode, Preset, SwingMode, Temperature, FAN_MASK, MODE_MASK};

/// Header, command byte, one data byte and the checksum.
pub const MIN_REPORT_SIZE: usize = HEADER_LEN + 3;

/// Applies a validated unit report to `state`, and echoes the fields the
/// unit owns into `command` so the next command carries them unchanged.
///
/// Every field is bounds-checked on its own: a short report updates what it
/// covers and leaves the rest alone. Returns `false` if the frame is too
/// short to be a report at all.
pub fn decode(frame: &Frame, state: &mut ClimateState, command: &mut CommandBuffer) -> bool {
    if frame.len() < MIN_REPORT_SIZE {
        warn!("Report too small: size = {}, minimum = {}", frame.len(), MIN_REPORT_SIZE);
        return false;
    }

    if let Some(raw) = frame.field(TEMPERATURE_BYTE) {
        let target = Temperature::SetpointSixteenths { value: raw };
        if target.in_range() {
            state.target_temperature = target.celsius();
        } else {
            warn!("Invalid target temperature: {} (raw: 0x{:02x})", target.celsius(), raw);
        }
        command.echo(TEMPERATURE_BYTE, raw);
    }

    if let Some(raw) = frame.field(INDOOR_TEMPERATURE_BYTE) {
        let indoor = Temperature::IndoorOffset { value: raw };
        if indoor.in_range() {
            state.current_temperature = Some(indoor.celsius());
        } else {
            warn!("Invalid current temperature: {} (raw: 0x{:02x})", indoor.celsius(), raw);
        }
    }

    if let Some(raw) = frame.field(MODE_BYTE) {
        match Mode::decoded_from_byte(raw & MODE_MASK) {
            Some(mode) => state.mode = mode,
            None => warn!("Unknown AC mode: 0x{:02x}", raw & MODE_MASK),
        }
        match FanSpeed::decoded_from_byte(raw & FAN_MASK) {
            Some(fan_speed) => state.fan_speed = fan_speed,
            None => warn!("Unknown AC fan: 0x{:02x}", raw & FAN_MASK),
        }
        command.echo(MODE_BYTE, raw);
    }

    state.preset = frame.field(PRESET_BYTE).map_or(Preset::None, Preset::from_byte);

    if let Some(raw) = frame.field(SWING_BYTE) {
        match SwingMode::decoded_from_byte(raw) {
            Some(swing_mode) => state.swing_mode = swing_mode,
            None => warn!("Unknown swing mode: 0x{:02x}", raw),
        }
        command.echo(SWING_BYTE, raw);
    }

    true
}
