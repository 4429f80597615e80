#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const MIN_TEMPERATURE: f32 = 16.0;
pub const MAX_TEMPERATURE: f32 = 30.0;
pub const TEMPERATURE_STEP: f32 = 1.0;

pub const MIN_AMBIENT_TEMPERATURE: f32 = -10.0;
pub const MAX_AMBIENT_TEMPERATURE: f32 = 50.0;

pub const MODE_MASK: u8 = 0xf0;
pub const FAN_MASK: u8 = 0x0f;

/// Operating mode, carried in the high nibble of the mode byte.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mode {
    Off,
    Auto,
    Cool,
    Dry,
    FanOnly,
    Heat,
}

one_byte_encodable_enum!(Mode {
    Off     = 0x10,
    Auto    = 0x80,
    Cool    = 0x90,
    Dry     = 0xa0,
    FanOnly = 0xb0,
    Heat    = 0xc0,
});

impl Mode {
    pub const ALL: [Mode; 6] = [Mode::Off, Mode::Auto, Mode::Cool, Mode::Dry, Mode::FanOnly, Mode::Heat];
}

/// Fan speed, carried in the low nibble of the mode byte.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FanSpeed {
    Auto,
    Low,
    Medium,
    High,
}

one_byte_encodable_enum!(FanSpeed {
    Auto   = 0x00,
    Low    = 0x01,
    Medium = 0x02,
    High   = 0x03,
});

impl FanSpeed {
    pub const ALL: [FanSpeed; 4] = [FanSpeed::Auto, FanSpeed::Low, FanSpeed::Medium, FanSpeed::High];
}

// High nibble is the vertical vane, low nibble the horizontal one.
// 0x1 = swinging, 0x4 = fixed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SwingMode {
    Off,
    Vertical,
    Horizontal,
    Both,
}

one_byte_encodable_enum!(SwingMode {
    Off        = 0x44,
    Vertical   = 0x14,
    Horizontal = 0x41,
    Both       = 0x11,
});

impl SwingMode {
    pub const ALL: [SwingMode; 4] = [SwingMode::Off, SwingMode::Vertical, SwingMode::Horizontal, SwingMode::Both];
}

const PRESET_COOL_NORMAL: u8 = 0x04;
const PRESET_COOL_BOOST: u8 = 0x06;
const PRESET_HEAT_NORMAL: u8 = 0x08;
const PRESET_HEAT_BOOST: u8 = 0x0c;

/// Preset, whose raw value depends on whether the unit is cooling or heating.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Preset {
    None,
    Boost,
}

impl Preset {
    /// Any raw value other than one of the two boost codes reads as `None`.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            PRESET_COOL_BOOST | PRESET_HEAT_BOOST => Preset::Boost,
            _ => Preset::None,
        }
    }

    /// Only COOL and HEAT have a preset byte; other modes leave it alone.
    pub fn encoded_for(&self, mode: Mode) -> Option<u8> {
        match (self, mode) {
            (Preset::None, Mode::Cool) => Some(PRESET_COOL_NORMAL),
            (Preset::None, Mode::Heat) => Some(PRESET_HEAT_NORMAL),
            (Preset::Boost, Mode::Cool) => Some(PRESET_COOL_BOOST),
            (Preset::Boost, Mode::Heat) => Some(PRESET_HEAT_BOOST),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Temperature {
    /// Set point as sixteenths of a degree above `MIN_TEMPERATURE`.
    SetpointSixteenths { value: u8 },
    /// Indoor reading as a signed byte offset by 40.
    IndoorOffset { value: u8 },
}

impl Temperature {
    pub fn celsius(&self) -> f32 {
        match self {
            Temperature::SetpointSixteenths { value } => *value as f32 / 16.0 + MIN_TEMPERATURE,
            Temperature::IndoorOffset { value } => (*value as i8) as f32 - 40.0,
        }
    }

    pub fn in_range(&self) -> bool {
        let celsius = self.celsius();
        match self {
            Temperature::SetpointSixteenths { .. } => (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&celsius),
            Temperature::IndoorOffset { .. } => {
                (MIN_AMBIENT_TEMPERATURE..=MAX_AMBIENT_TEMPERATURE).contains(&celsius)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DegreesC(pub f32);

impl DegreesC {
    pub fn is_valid_setpoint(&self) -> bool {
        (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&self.0)
    }

    pub fn encode_as_setpoint_sixteenths(&self) -> u8 {
        ((self.0 - MIN_TEMPERATURE) * 16.0) as u8
    }
}

/// The decoded, host-facing view of the unit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClimateState {
    pub mode: Mode,
    pub fan_speed: FanSpeed,
    pub target_temperature: f32,
    /// `None` until a trusted indoor reading has been seen.
    pub current_temperature: Option<f32>,
    pub preset: Preset,
    pub swing_mode: SwingMode,
}

impl Default for ClimateState {
    fn default() -> Self {
        Self {
            mode: Mode::Off,
            fan_speed: FanSpeed::Auto,
            target_temperature: MIN_TEMPERATURE,
            current_temperature: None,
            preset: Preset::None,
            swing_mode: SwingMode::Off,
        }
    }
}
