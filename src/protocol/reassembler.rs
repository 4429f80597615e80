use heapless::Vec;

use super::frame::{HEADER_LEN, LENGTH_BYTE, RX_BUFFER_SIZE, SYNC};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReceiveState {
    WaitSync,
    Receive,
    /// A frame was handed out; the buffer is kept until the next byte.
    Complete,
}

/// Rebuilds length-prefixed frames from a byte stream, one byte at a time.
///
/// There is no delimiter other than the sync byte, so the only recovery from
/// a bad length or line noise is to drop what has been buffered and wait for
/// the next sync byte.
#[derive(Debug)]
pub struct Reassembler {
    state: ReceiveState,
    buffer: Vec<u8, RX_BUFFER_SIZE>,
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reassembler {
    pub fn new() -> Self {
        Reassembler { state: ReceiveState::WaitSync, buffer: Vec::new() }
    }

    pub fn state(&self) -> ReceiveState {
        self.state
    }

    /// Number of bytes of the frame in progress.
    pub fn buffered(&self) -> usize {
        match self.state {
            ReceiveState::Complete => 0,
            _ => self.buffer.len(),
        }
    }

    pub fn reset(&mut self) {
        self.state = ReceiveState::WaitSync;
        self.buffer.clear();
    }

    /// Feeds one byte. Returns the candidate frame once its declared length
    /// has been reached; it is not validated here.
    pub fn push(&mut self, byte: u8) -> Option<&[u8]> {
        if self.state == ReceiveState::Complete {
            self.reset();
        }

        match self.state {
            ReceiveState::WaitSync => {
                if byte == SYNC {
                    self.buffer.clear();
                    // Capacity is always at least one byte after a clear.
                    let _ = self.buffer.push(byte);
                    self.state = ReceiveState::Receive;
                }
                None
            }
            ReceiveState::Receive => {
                if self.buffer.push(byte).is_err() {
                    self.reset();
                    return None;
                }

                if self.buffer.len() < HEADER_LEN {
                    return None;
                }

                let full_size = HEADER_LEN + self.buffer[LENGTH_BYTE] as usize;
                if self.buffer.len() >= full_size {
                    self.state = ReceiveState::Complete;
                    Some(&self.buffer[..full_size])
                } else {
                    None
                }
            }
            ReceiveState::Complete => None,
        }
    }
}
