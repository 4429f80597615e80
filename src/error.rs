use core::fmt::Debug;

use thiserror::Error;

pub use crate::protocol::frame::FrameError;

/// Errors surfaced by [`crate::GreeAc`] entry points. None of them leave the
/// driver in a state it cannot recover from on the next call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error<E: Debug> {
    /// Writing a frame to the serial port failed.
    #[error("serial write failed: {0:?}")]
    Serial(E),
    /// A command arrived before the unit sent its first valid report.
    #[error("link not ready, command ignored")]
    NotReady,
}
