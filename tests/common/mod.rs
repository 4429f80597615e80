//! Shared fixtures: an in-memory serial line and a host that records what
//! the driver tells it.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::{blocking, serial};
use gree_ac::protocol::frame::{CMD_IN_UNIT_REPORT, COMMAND_BYTE, HEADER_LEN, LENGTH_BYTE, SYNC};
use gree_ac::{checksum, ClimateState, Config, GreeAc, Host, Select};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineError;

#[derive(Debug, Default)]
pub struct Line {
    pub rx: VecDeque<Result<u8, LineError>>,
    pub tx: Vec<u8>,
    pub fail_writes: bool,
}

/// The driver's end of the line; the test keeps another handle to it.
#[derive(Clone, Default)]
pub struct MockPort(pub Rc<RefCell<Line>>);

impl MockPort {
    pub fn feed(&self, bytes: &[u8]) {
        self.0.borrow_mut().rx.extend(bytes.iter().copied().map(Ok));
    }

    pub fn feed_error(&self) {
        self.0.borrow_mut().rx.push_back(Err(LineError));
    }

    pub fn fail_writes(&self, fail: bool) {
        self.0.borrow_mut().fail_writes = fail;
    }

    /// Everything written so far, split back into frames by their length byte.
    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        let line = self.0.borrow();
        let mut frames = Vec::new();
        let mut rest = &line.tx[..];
        while rest.len() >= HEADER_LEN {
            let size = HEADER_LEN + rest[LENGTH_BYTE] as usize;
            let (frame, tail) = rest.split_at(size.min(rest.len()));
            frames.push(frame.to_vec());
            rest = tail;
        }
        frames
    }

    pub fn last_frame(&self) -> Vec<u8> {
        self.sent_frames().pop().expect("nothing was sent")
    }
}

impl serial::Read<u8> for MockPort {
    type Error = LineError;

    fn read(&mut self) -> nb::Result<u8, LineError> {
        match self.0.borrow_mut().rx.pop_front() {
            Some(Ok(byte)) => Ok(byte),
            Some(Err(e)) => Err(nb::Error::Other(e)),
            None => Err(nb::Error::WouldBlock),
        }
    }
}

impl serial::Write<u8> for MockPort {
    type Error = LineError;

    fn write(&mut self, word: u8) -> nb::Result<(), LineError> {
        let mut line = self.0.borrow_mut();
        if line.fail_writes {
            return Err(nb::Error::Other(LineError));
        }
        line.tx.push(word);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), LineError> {
        Ok(())
    }
}

impl blocking::serial::write::Default<u8> for MockPort {}

#[derive(Debug, Default)]
pub struct Record {
    pub published: Vec<ClimateState>,
    pub health: Vec<bool>,
}

#[derive(Clone, Default)]
pub struct RecordingHost(pub Rc<RefCell<Record>>);

impl RecordingHost {
    pub fn published(&self) -> Vec<ClimateState> {
        self.0.borrow().published.clone()
    }

    pub fn health(&self) -> Vec<bool> {
        self.0.borrow().health.clone()
    }
}

impl Host for RecordingHost {
    fn publish(&mut self, state: &ClimateState) {
        self.0.borrow_mut().published.push(state.clone());
    }

    fn health_changed(&mut self, healthy: bool) {
        self.0.borrow_mut().health.push(healthy);
    }

    fn map_select(&self, select: Select, option: &str) -> Option<u8> {
        match (select, option) {
            (Select::VerticalSwing | Select::HorizontalSwing, "swing") => Some(0x1),
            (Select::VerticalSwing | Select::HorizontalSwing, "fixed") => Some(0x4),
            (Select::VerticalSwing, "top") => Some(0x2),
            (Select::Display, "off") => Some(0x00),
            (Select::Display, "set") => Some(0x20),
            _ => None,
        }
    }
}

pub struct Fixture {
    pub port: MockPort,
    pub host: RecordingHost,
    pub ac: GreeAc<MockPort, RecordingHost>,
}

pub fn fixture() -> Fixture {
    fixture_with(Config::default())
}

pub fn fixture_with(config: Config) -> Fixture {
    let port = MockPort::default();
    let host = RecordingHost::default();
    let ac = GreeAc::new(port.clone(), host.clone(), config);
    Fixture { port, host, ac }
}

/// A full-length unit report with the given fields set.
pub fn report(fields: &[(usize, u8)]) -> Vec<u8> {
    let mut bytes = vec![0u8; 51];
    bytes[0] = SYNC;
    bytes[1] = SYNC;
    bytes[LENGTH_BYTE] = (bytes.len() - HEADER_LEN) as u8;
    bytes[COMMAND_BYTE] = CMD_IN_UNIT_REPORT;
    for (offset, value) in fields {
        bytes[*offset] = *value;
    }
    let size = bytes.len();
    bytes[size - 1] = checksum(&bytes, size);
    bytes
}

/// Brings a fixture to READY with a cooling, medium fan, 22 °C report.
pub fn ready(fixture: &mut Fixture, now: u32) {
    use gree_ac::protocol::frame::{MODE_BYTE, PRESET_BYTE, SWING_BYTE, TEMPERATURE_BYTE};

    fixture.port.feed(&report(&[
        (MODE_BYTE, 0x92),
        (TEMPERATURE_BYTE, 0x60),
        (PRESET_BYTE, 0x04),
        (SWING_BYTE, 0x14),
        (46, 64),
    ]));
    assert_eq!(fixture.ac.on_bytes_available(now), 1);
}
