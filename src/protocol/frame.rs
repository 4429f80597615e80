use nom::bytes::complete::take;
use nom::number::complete::be_u8;
use nom::sequence::tuple;
use nom::IResult;
use thiserror::Error;

pub const SYNC: u8 = 0x7e;

/// Two sync bytes plus the length byte.
pub const HEADER_LEN: usize = 3;

pub const RX_BUFFER_SIZE: usize = 52;
pub const TX_FRAME_SIZE: usize = 47;

pub const CMD_IN_UNIT_REPORT: u8 = 0x31;
pub const CMD_OUT_PARAMS_SET: u8 = 0x01;

pub const LENGTH_BYTE: usize = 2;
pub const COMMAND_BYTE: usize = 3;
pub const SLEEP_BYTE: usize = 4;
pub const SLEEP_MASK: u8 = 0x08;
pub const PLASMA_BYTE: usize = 6;
pub const PLASMA_MASK: u8 = 0x04;
pub const XFAN_BYTE: usize = 6;
pub const XFAN_MASK: u8 = 0x08;
pub const FORCE_UPDATE_BYTE: usize = 7;
pub const MODE_BYTE: usize = 8;
pub const TEMPERATURE_BYTE: usize = 9;
pub const PRESET_BYTE: usize = 10;
pub const SWING_BYTE: usize = 12;
pub const DISPLAY_BYTE: usize = 13;
pub const INDOOR_TEMPERATURE_BYTE: usize = 46;

pub const FORCE_UPDATE_ACTIVE: u8 = 175;
pub const FORCE_UPDATE_PASSIVE: u8 = 0;
pub const DISPLAY_SET_TEMPERATURE: u8 = 0x20;

/// Sum of the bytes after the two sync bytes and before the checksum slot,
/// modulo 256. `size` is the total frame size; anything under a bare header
/// yields 0 and callers are expected to have checked the length themselves.
pub fn checksum(frame: &[u8], size: usize) -> u8 {
    if size < HEADER_LEN {
        return 0;
    }
    let sum = frame
        .iter()
        .take(size - 1)
        .skip(LENGTH_BYTE)
        .fold(0u32, |acc, b| acc + *b as u32);
    (sum % 256) as u8
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum FrameError {
    #[error("frame too short: {size} bytes")]
    TooShort { size: usize },
    #[error("unexpected command 0x{received:02x}, expected 0x{expected:02x}")]
    UnexpectedCommand { received: u8, expected: u8 },
    #[error("invalid checksum: received 0x{received:02x}, calculated 0x{calculated:02x}")]
    InvalidChecksum { received: u8, calculated: u8 },
}

/// A complete frame, borrowed from the receive buffer.
#[derive(Debug, Eq, PartialEq)]
pub struct Frame<'a> {
    raw: &'a [u8],
    pub data_len: usize,
    pub command: u8,
    pub payload: &'a [u8],
    checksum: u8,
}

impl<'a> Frame<'a> {
    fn split(input: &'a [u8]) -> IResult<&'a [u8], (u8, &'a [u8], u8)> {
        let (input, (_sync, data_len)) = tuple((take(2usize), be_u8))(input)?;
        let (input, payload) = take((data_len as usize).saturating_sub(1))(input)?;
        let (input, checksum) = be_u8(input)?;
        Ok((input, (data_len, payload, checksum)))
    }

    /// Checks size, command type and checksum, in that order.
    pub fn validate(raw: &'a [u8]) -> Result<Self, FrameError> {
        let size = raw.len();
        if size < HEADER_LEN + 1 {
            return Err(FrameError::TooShort { size });
        }

        let (data_len, payload, checksum) = match Self::split(raw) {
            Ok((_, parts)) => parts,
            Err(_) => return Err(FrameError::TooShort { size }),
        };
        let command = match payload.first() {
            Some(command) => *command,
            None => return Err(FrameError::TooShort { size }),
        };

        if command != CMD_IN_UNIT_REPORT {
            return Err(FrameError::UnexpectedCommand { received: command, expected: CMD_IN_UNIT_REPORT });
        }

        let raw = &raw[..HEADER_LEN + data_len as usize];
        let calculated = self::checksum(raw, raw.len());
        if calculated != checksum {
            return Err(FrameError::InvalidChecksum { received: checksum, calculated });
        }

        Ok(Self { raw, data_len: data_len as usize, command, payload, checksum })
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.raw
    }

    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    /// The byte at an absolute frame offset, if it lies in the payload.
    pub fn field(&self, offset: usize) -> Option<u8> {
        if offset >= COMMAND_BYTE && offset + 1 < self.raw.len() {
            Some(self.raw[offset])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &[u8] = &[0x7e, 0x7e, 0x08, 0x31, 0x00, 0x00, 0x00, 0x00, 0x91, 0x80, 0x4a];

    #[test]
    fn checksum_test() {
        assert_eq!(checksum(REPORT, REPORT.len()), 0x4a);
        assert_eq!(checksum(&[0x7e, 0x7e, 0xff, 0xff, 0x03, 0x00], 6), 0x01);
    }

    #[test]
    fn checksum_of_short_frames_is_zero() {
        assert_eq!(checksum(&[0x7e, 0x7e], 2), 0);
        assert_eq!(checksum(&[], 0), 0);
        assert_eq!(checksum(&[0x7e, 0x7e, 0x00], 3), 0);
    }

    #[test]
    fn validate_test() {
        let frame = Frame::validate(REPORT).unwrap();
        assert_eq!(frame.data_len, 8);
        assert_eq!(frame.command, CMD_IN_UNIT_REPORT);
        assert_eq!(frame.payload, &REPORT[3..10]);
        assert_eq!(frame.field(MODE_BYTE), Some(0x91));
        assert_eq!(frame.field(TEMPERATURE_BYTE), Some(0x80));
        assert_eq!(frame.field(PRESET_BYTE), None);
    }

    #[test]
    fn rejects_short_frames() {
        assert_eq!(Frame::validate(&[0x7e, 0x7e, 0x00]), Err(FrameError::TooShort { size: 3 }));
        assert_eq!(Frame::validate(&[0x7e, 0x7e, 0x09, 0x31]), Err(FrameError::TooShort { size: 4 }));
    }

    #[test]
    fn rejects_unexpected_command() {
        let frame = [0x7e, 0x7e, 0x02, 0x01, 0x01];
        assert_eq!(
            Frame::validate(&frame),
            Err(FrameError::UnexpectedCommand { received: 0x01, expected: CMD_IN_UNIT_REPORT })
        );
    }

    #[test]
    fn rejects_bad_checksum() {
        let mut frame = [0u8; 11];
        frame.copy_from_slice(REPORT);
        frame[10] = 0x42;
        assert_eq!(
            Frame::validate(&frame),
            Err(FrameError::InvalidChecksum { received: 0x42, calculated: 0x4a })
        );
    }
}
