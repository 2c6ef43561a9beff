//! Bit-banged in-system-programming transport and handshake
//!
//! Four lines: reset, clock, data-out, data-in. Every exchange is a
//! 4-byte command shifted MSB-first, full-duplex; the target answers in
//! the byte slot following each transmitted byte.

mod flashing;

pub use flashing::is_page_boundary;

use crate::config;
use crate::hal::{clock, Line, PeripheralHandle};

// Command opcodes, first/second frame byte
pub(crate) const PROGRAM_ENABLE: u8 = 0xAC;
pub(crate) const ENABLE_ACK: u8 = 0x53;
pub(crate) const CHIP_ERASE: u8 = 0x80;
pub(crate) const WRITE_FUSE_LOW: u8 = 0xA0;
pub(crate) const WRITE_FUSE_HIGH: u8 = 0xA8;
pub(crate) const WRITE_FUSE_EXTENDED: u8 = 0xA4;
pub(crate) const LOAD_LOW_BYTE: u8 = 0x40;
pub(crate) const LOAD_HIGH_BYTE: u8 = 0x48;
pub(crate) const COMMIT_PAGE: u8 = 0x4C;

const ISP_LINES: [Line; 4] = [Line::Reset, Line::Clock, Line::DataOut, Line::DataIn];

/// Where one physical connection currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Disconnected,
    Reset,
    AwaitingAck,
    ProgrammingMode,
    Released,
}

/// The target never echoed the programming-enable acknowledgment within
/// the retry budget. Recoverable: reconnect and try again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandshakeExhausted;

/// One connection to a device being programmed.
///
/// Holds no peripheral borrow; every operation takes the handle so the
/// LED and timing helpers can interleave with protocol work.
pub struct Session {
    phase: Phase,
    sck_delay: u8,
}

impl Session {
    pub fn new() -> Self {
        Self::with_sck_delay(config::SCK_SW_DELAY)
    }

    /// Session with a slower ISP clock, fixed for the session's lifetime.
    pub fn with_sck_delay(counts: u8) -> Self {
        Self {
            phase: Phase::Disconnected,
            sck_delay: counts,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Claim the ISP lines and pulse reset into the target.
    ///
    /// The positive pulse lasts one coarse tick, comfortably more than
    /// the two target clock periods the protocol requires.
    pub fn connect<P: PeripheralHandle>(&mut self, io: &mut P) {
        for line in ISP_LINES {
            io.tristate_line(line);
        }
        io.clear_line(Line::Reset);
        io.clear_line(Line::Clock);
        io.clear_line(Line::DataOut);

        clock::wait_ticks(io, 1);
        io.set_line(Line::Reset);
        clock::wait_ticks(io, 1);
        io.clear_line(Line::Reset);
        self.phase = Phase::Reset;
    }

    /// Shift one byte out while sampling one byte in, MSB first.
    pub fn transmit_byte<P: PeripheralHandle>(&mut self, io: &mut P, data: u8) -> u8 {
        let mut received = 0u8;
        for bit in 0..8u8 {
            if data & (0x80 >> bit) != 0 {
                io.set_line(Line::DataOut);
            } else {
                io.clear_line(Line::DataOut);
            }

            received <<= 1;
            if io.read_line(Line::DataIn) {
                received |= 1;
            }

            io.set_line(Line::Clock);
            clock::fine_wait(io, self.sck_delay);
            io.clear_line(Line::Clock);
            clock::fine_wait(io, self.sck_delay);
        }
        received
    }

    /// Send a 4-byte command, discarding the responses.
    pub fn command<P: PeripheralHandle>(&mut self, io: &mut P, instruction: u8, a1: u8, a2: u8, a3: u8) {
        self.transmit_byte(io, instruction);
        self.transmit_byte(io, a1);
        self.transmit_byte(io, a2);
        self.transmit_byte(io, a3);
    }

    /// Ask the target to enter programming mode.
    ///
    /// The target acknowledges by echoing the second command byte in the
    /// third byte slot. On a mismatch the shift registers are out of
    /// sync, so reset is pulsed before the next attempt.
    pub fn enter_programming_mode<P: PeripheralHandle>(
        &mut self,
        io: &mut P,
    ) -> Result<(), HandshakeExhausted> {
        self.phase = Phase::AwaitingAck;
        for _ in 0..config::HANDSHAKE_RETRIES {
            self.transmit_byte(io, PROGRAM_ENABLE);
            self.transmit_byte(io, ENABLE_ACK);
            let echo = self.transmit_byte(io, 0x00);
            self.transmit_byte(io, 0x00);

            if echo == ENABLE_ACK {
                self.phase = Phase::ProgrammingMode;
                return Ok(());
            }

            clock::fine_wait(io, self.sck_delay);
            io.set_line(Line::Reset);
            clock::fine_wait(io, self.sck_delay);
            io.clear_line(Line::Reset);
            clock::fine_wait(io, self.sck_delay);
        }
        Err(HandshakeExhausted)
    }

    /// Let the target run: reset high, settle, then give up every line.
    pub fn release<P: PeripheralHandle>(&mut self, io: &mut P) {
        io.set_line(Line::Reset);
        clock::delay_ms(io, config::RESET_RELEASE_DELAY_MS);
        for line in ISP_LINES {
            io.tristate_line(line);
        }
        self.phase = Phase::Released;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
