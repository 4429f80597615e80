#![no_std]

//! gree_ac
//!
//! Driver for Gree (and rebadged) air conditioners over the indoor unit's
//! wired UART. The line runs at 4800 baud, 8 data bits, even parity with 1
//! stop bit (4800 8E1); configure your serial peripheral as such and hand it
//! to [`GreeAc`].
//!
//! It is intended for use on embedded hardware, and as such is `no_std`.
//! There are no timers or threads inside: the host calls the entry points
//! from its own loop and passes the current time in milliseconds.
//!
//! ## Frames
//!
//! Every frame looks like this, in both directions:
//!
//! ```text
//!  0x7e 0x7e  LEN  CMD  DATA...  SUM
//!  \_______/   |    \_________/   |
//!     sync     |   LEN - 1 bytes  +-- sum of LEN..DATA, mod 256
//!              +-- bytes after the header, checksum included
//! ```
//!
//! ## Decoding a report
//!
//! ```
//! use gree_ac::protocol::{report, ClimateState, CommandBuffer, Frame, Mode, Reassembler};
//!
//! let line: &[u8] = &[0x00, 0x7e, 0x7e, 0x08, 0x31, 0x00, 0x00, 0x00, 0x00, 0x91, 0x80, 0x4a];
//!
//! let mut reassembler = Reassembler::new();
//! let mut state = ClimateState::default();
//! let mut command = CommandBuffer::new();
//!
//! for byte in line {
//!     if let Some(candidate) = reassembler.push(*byte) {
//!         // Size, command type and checksum are checked before anything is trusted.
//!         let frame = Frame::validate(candidate).unwrap();
//!         report::decode(&frame, &mut state, &mut command);
//!     }
//! }
//!
//! assert_eq!(state.mode, Mode::Cool);
//! assert_eq!(state.target_temperature, 24.0);
//! ```
//!
//! ## Driving the unit
//!
//! ```
//! use core::convert::Infallible;
//! use embedded_hal::{blocking, serial};
//! use gree_ac::{ClimateState, CommandIntent, Config, Error, GreeAc, Host, Mode, Session};
//!
//! // Stands in for a UART peripheral.
//! struct Port;
//!
//! impl serial::Read<u8> for Port {
//!     type Error = Infallible;
//!     fn read(&mut self) -> nb::Result<u8, Infallible> { Err(nb::Error::WouldBlock) }
//! }
//!
//! impl serial::Write<u8> for Port {
//!     type Error = Infallible;
//!     fn write(&mut self, _: u8) -> nb::Result<(), Infallible> { Ok(()) }
//!     fn flush(&mut self) -> nb::Result<(), Infallible> { Ok(()) }
//! }
//!
//! impl blocking::serial::write::Default<u8> for Port {}
//!
//! struct Display;
//!
//! impl Host for Display {
//!     fn publish(&mut self, state: &ClimateState) {
//!         println!("{:?}", state);
//!     }
//! }
//!
//! let mut ac = GreeAc::new(Port, Display, Config::default());
//!
//! // Nothing heard yet, so the first tick sends a handshake.
//! ac.poll(0).unwrap();
//! assert_eq!(ac.session(), Session::Initializing);
//! assert_eq!(ac.stats().frames_sent, 1);
//!
//! // Commands are refused until the unit has reported in.
//! let intent = CommandIntent::new().with_mode(Mode::Cool).with_target_temperature(24.0);
//! assert_eq!(ac.on_command_intent(&intent, 10), Err(Error::NotReady));
//! ```

pub mod config;
pub mod error;
pub mod interface;
pub mod protocol;

pub use config::{ClimateTraits, Config};
pub use error::Error;
pub use interface::{GreeAc, Host, Select, Session, Stats, Switch};

#[doc(inline)]
pub use protocol::*;
