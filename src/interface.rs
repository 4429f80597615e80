use core::fmt::Debug;

use embedded_hal::blocking::serial::Write as BlockingWrite;
use embedded_hal::serial::Read;
use log::{debug, info, trace, warn};

use crate::config::{ClimateTraits, Config, BAUD_RATE};
use crate::error::{Error, FrameError};
use crate::protocol::frame::*;
use crate::protocol::report;
use crate::protocol::{ClimateState, CommandBuffer, CommandIntent, Frame, Reassembler};

type WriteError<S> = <S as BlockingWrite<u8>>::Error;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Session {
    /// No trusted report yet; the command buffer is resent as a handshake.
    Initializing,
    Ready,
}

/// Accessory selects whose options are resolved by the host.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Select {
    HorizontalSwing,
    VerticalSwing,
    Display,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Switch {
    Plasma,
    Sleep,
    XFan,
}

impl Switch {
    fn location(&self) -> (usize, u8) {
        match self {
            Switch::Plasma => (PLASMA_BYTE, PLASMA_MASK),
            Switch::Sleep => (SLEEP_BYTE, SLEEP_MASK),
            Switch::XFan => (XFAN_BYTE, XFAN_MASK),
        }
    }
}

/// The side of the integration that owns display and configuration.
pub trait Host {
    /// Called whenever a report is decoded or a command is applied.
    fn publish(&mut self, state: &ClimateState);

    /// Called when communication is lost or restored.
    fn health_changed(&mut self, _healthy: bool) {}

    /// Resolves a select option to its protocol value: a vane nibble for the
    /// swing selects, the raw display byte for [`Select::Display`].
    fn map_select(&self, _select: Select, _option: &str) -> Option<u8> {
        None
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    pub frames_sent: u32,
    pub frames_received: u32,
    pub checksum_errors: u32,
    pub invalid_frame_errors: u32,
}

impl Stats {
    fn record(&mut self, error: &FrameError) {
        match error {
            FrameError::InvalidChecksum { .. } => self.checksum_errors += 1,
            FrameError::TooShort { .. } | FrameError::UnexpectedCommand { .. } => {
                self.invalid_frame_errors += 1
            }
        }
    }
}

/// Driver for a Gree unit on a serial port.
///
/// Nothing here blocks waiting for the unit or keeps its own clock: the host
/// calls the entry points from its main loop and passes a wrapping
/// millisecond timestamp.
pub struct GreeAc<S, H>
where
    S: Read<u8> + BlockingWrite<u8>,
    H: Host,
{
    serial: S,
    host: H,
    config: Config,
    session: Session,
    healthy: bool,
    reassembler: Reassembler,
    command: CommandBuffer,
    state: ClimateState,
    stats: Stats,
    last_byte_received: Option<u32>,
    last_handshake: Option<u32>,
    last_sent: Option<u32>,
}

impl<S, H> GreeAc<S, H>
where
    S: Read<u8> + BlockingWrite<u8>,
    <S as Read<u8>>::Error: Debug,
    WriteError<S>: Debug,
    H: Host,
{
    pub fn new(serial: S, host: H, config: Config) -> Self {
        info!("Gree AC driver v{} starting", env!("CARGO_PKG_VERSION"));
        GreeAc {
            serial,
            host,
            config,
            session: Session::Initializing,
            healthy: true,
            reassembler: Reassembler::new(),
            command: CommandBuffer::new(),
            state: ClimateState::default(),
            stats: Stats::default(),
            last_byte_received: None,
            last_handshake: None,
            last_sent: None,
        }
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy
    }

    pub fn state(&self) -> &ClimateState {
        &self.state
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn traits(&self) -> ClimateTraits {
        self.config.traits()
    }

    pub fn command_buffer(&self) -> &CommandBuffer {
        &self.command
    }

    pub fn last_sent(&self) -> Option<u32> {
        self.last_sent
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Gives back the serial port and host.
    pub fn release(self) -> (S, H) {
        (self.serial, self.host)
    }

    pub fn log_config(&self) {
        info!("Gree AC:");
        info!("  Update interval: {} ms", self.config.update_interval_ms);
        info!("  Handshake retry: {} ms", self.config.handshake_retry_ms);
        info!("  Receive timeout: {} ms", self.config.receive_timeout_ms);
        info!("  Serial: {} baud, 8E1", BAUD_RATE);
        info!("  Presets: {:?}", self.traits().presets);
        info!("  Swing modes: {:?}", self.config.supported_swing_modes);
    }

    /// Drains whatever the port has buffered. Returns the number of reports
    /// decoded during this call.
    pub fn on_bytes_available(&mut self, now: u32) -> usize {
        let mut decoded = 0;
        loop {
            match self.serial.read() {
                Ok(byte) => {
                    if self.receive_byte(byte, now) {
                        decoded += 1;
                    }
                }
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(e)) => {
                    warn!("Serial read error: {:?}", e);
                    break;
                }
            }
        }
        decoded
    }

    fn receive_byte(&mut self, byte: u8, now: u32) -> bool {
        // Any byte counts as life on the line, even if it never makes a frame.
        self.last_byte_received = Some(now);

        let decoded = match self.reassembler.push(byte) {
            None => return false,
            Some(candidate) => {
                trace!("Received message: {:02x?}", candidate);
                match Frame::validate(candidate) {
                    Ok(frame) => report::decode(&frame, &mut self.state, &mut self.command),
                    Err(e) => {
                        self.stats.record(&e);
                        warn!(
                            "{} (checksum errors: {}, invalid frames: {})",
                            e, self.stats.checksum_errors, self.stats.invalid_frame_errors
                        );
                        false
                    }
                }
            }
        };

        if decoded {
            self.stats.frames_received += 1;
            self.on_report();
        }
        decoded
    }

    fn on_report(&mut self) {
        if self.session == Session::Initializing {
            info!("Unit answered, link ready");
            self.session = Session::Ready;
        }
        self.set_healthy(true);
        self.host.publish(&self.state);
    }

    fn set_healthy(&mut self, healthy: bool) {
        if self.healthy != healthy {
            self.healthy = healthy;
            self.host.health_changed(healthy);
        }
    }

    /// Handshake retries while initializing, silence detection while ready.
    pub fn on_timer_tick(&mut self, now: u32) -> Result<(), Error<WriteError<S>>> {
        match self.session {
            Session::Initializing => {
                let due = self
                    .last_handshake
                    .map_or(true, |last| now.wrapping_sub(last) >= self.config.handshake_retry_ms);
                if due {
                    debug!("Retrying handshake...");
                    self.last_handshake = Some(now);
                    self.transmit(now)?;
                }
            }
            Session::Ready => {
                let silent = self
                    .last_byte_received
                    .map_or(true, |last| now.wrapping_sub(last) >= self.config.receive_timeout_ms);
                if silent {
                    warn!("AC communication timeout, waiting for response...");
                    self.session = Session::Initializing;
                    self.set_healthy(false);
                }
            }
        }
        Ok(())
    }

    /// One pass of the host's main loop.
    pub fn poll(&mut self, now: u32) -> Result<usize, Error<WriteError<S>>> {
        let decoded = self.on_bytes_available(now);
        self.on_timer_tick(now)?;
        Ok(decoded)
    }

    /// Periodic resend of the command buffer, every `update_interval_ms`.
    /// Keeps the unit in step without forcing it to apply anything.
    pub fn on_update(&mut self, now: u32) -> Result<(), Error<WriteError<S>>> {
        if self.session == Session::Ready {
            self.transmit(now)?;
        }
        Ok(())
    }

    pub fn on_command_intent(&mut self, intent: &CommandIntent, now: u32) -> Result<(), Error<WriteError<S>>> {
        self.ensure_ready()?;
        debug!("Command: {:?}", intent);
        self.command.apply(intent, &mut self.state);
        let sent = self.transmit_forced(now);
        self.host.publish(&self.state);
        sent
    }

    pub fn on_select_change(&mut self, select: Select, option: &str, now: u32) -> Result<(), Error<WriteError<S>>> {
        self.ensure_ready()?;
        debug!("{:?} changed to: {}", select, option);
        let value = match self.host.map_select(select, option) {
            Some(value) => value,
            None => {
                warn!("No protocol value for {:?} option {:?}", select, option);
                return Ok(());
            }
        };
        match select {
            Select::VerticalSwing => self.command.set_vane(true, value),
            Select::HorizontalSwing => self.command.set_vane(false, value),
            Select::Display => self.command.set_display(value),
        }
        self.transmit_forced(now)
    }

    pub fn on_switch_change(&mut self, switch: Switch, on: bool, now: u32) -> Result<(), Error<WriteError<S>>> {
        self.ensure_ready()?;
        debug!("{:?} switch changed to: {}", switch, if on { "on" } else { "off" });
        let (offset, mask) = switch.location();
        self.command.set_toggle(offset, mask, on);
        self.transmit_forced(now)
    }

    /// Ambient reading from an external sensor. The next report carrying an
    /// indoor temperature overwrites it.
    pub fn set_current_temperature(&mut self, celsius: f32) {
        self.state.current_temperature = Some(celsius);
        self.host.publish(&self.state);
    }

    fn ensure_ready(&self) -> Result<(), Error<WriteError<S>>> {
        if self.session == Session::Ready {
            Ok(())
        } else {
            warn!("AC not ready, ignoring control request");
            Err(Error::NotReady)
        }
    }

    fn transmit_forced(&mut self, now: u32) -> Result<(), Error<WriteError<S>>> {
        self.command.force_update();
        let sent = self.transmit(now);
        // Periodic resends must not keep forcing the same command.
        self.command.release_force_update();
        sent
    }

    fn transmit(&mut self, now: u32) -> Result<(), Error<WriteError<S>>> {
        let frame = self.command.seal();
        trace!("Sent message: {:02x?}", frame);
        self.serial.bwrite_all(frame).map_err(Error::Serial)?;
        self.stats.frames_sent += 1;
        self.last_sent = Some(now);
        Ok(())
    }
}
