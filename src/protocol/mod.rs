//! Framing and codec for the unit's serial protocol.

#[macro_use]
pub mod encoding;
pub mod command;
pub mod frame;
pub mod reassembler;
pub mod report;
pub mod types;

pub use command::{CommandBuffer, CommandIntent};
pub use frame::{checksum, Frame, FrameError};
pub use reassembler::{ReceiveState, Reassembler};
pub use types::{ClimateState, FanSpeed, Mode, Preset, SwingMode};
