//! Deterministic peripheral simulator for host tests
//!
//! `SimFixture` models the fixture pins, the free-running counter and a
//! bit-level ISP target on the far end of the lines: a shift register
//! that echoes the previous byte, with a scriptable number of refused
//! programming-enable frames. `SimBus` models the flashed device on the
//! secondary bus with scripted telemetry.

use core::cell::Cell;
use core::convert::Infallible;

use embedded_hal::blocking::i2c::{Read, Write};

use crate::config;
use crate::hal::{BusControl, Line, PeripheralHandle};
use crate::isp::{ENABLE_ACK, PROGRAM_ENABLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drive {
    Low,
    High,
    Released,
}

/// One 4-byte frame as seen by the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub instruction: u8,
    pub a1: u8,
    pub a2: u8,
    pub a3: u8,
}

pub struct SimFixture {
    lines: [Drive; 6],
    counter: Cell<u8>,
    stride: u8,
    reads: Cell<u32>,
    led_lit: bool,
    led_pulses: u32,
    target: SimTarget,
}

impl SimFixture {
    pub fn new() -> Self {
        Self::refusing(0)
    }

    /// Target that answers 0x00 to everything until `refuse` enable
    /// frames have gone by, then starts echoing normally.
    pub fn refusing(refuse: u32) -> Self {
        Self {
            lines: [Drive::Released; 6],
            // Large stride so busy-waits finish in a couple of reads
            counter: Cell::new(0),
            stride: 64,
            reads: Cell::new(0),
            led_lit: false,
            led_pulses: 0,
            target: SimTarget::new(refuse),
        }
    }

    /// Fixture whose counter starts at `start` and advances by `stride`
    /// per read, for timing tests.
    pub fn with_counter(start: u8, stride: u8) -> Self {
        let mut sim = Self::refusing(0);
        sim.counter.set(start);
        sim.stride = stride;
        sim
    }

    pub fn commands(&self) -> &[Command] {
        &self.target.commands
    }

    pub fn enable_frames(&self) -> u32 {
        self.target.enable_frames
    }

    pub fn counter_reads(&self) -> u32 {
        self.reads.get()
    }

    pub fn counter_value(&self) -> u8 {
        self.counter.get()
    }

    pub fn led_pulses(&self) -> u32 {
        self.led_pulses
    }

    pub fn line_released(&self, line: Line) -> bool {
        self.lines[index(line)] == Drive::Released
    }
}

fn index(line: Line) -> usize {
    match line {
        Line::Reset => 0,
        Line::Clock => 1,
        Line::DataOut => 2,
        Line::DataIn => 3,
        Line::LedAnode => 4,
        Line::LedCathode => 5,
    }
}

impl PeripheralHandle for SimFixture {
    fn set_line(&mut self, line: Line) {
        let previous = self.lines[index(line)];
        self.lines[index(line)] = Drive::High;
        match line {
            Line::Clock if previous != Drive::High => {
                let mosi = self.lines[index(Line::DataOut)] == Drive::High;
                self.target.sck_rising(mosi);
            }
            Line::Reset if previous != Drive::High => self.target.reset(),
            Line::LedAnode => {
                if !self.led_lit && self.lines[index(Line::LedCathode)] == Drive::Low {
                    self.led_lit = true;
                    self.led_pulses += 1;
                }
            }
            _ => {}
        }
    }

    fn clear_line(&mut self, line: Line) {
        let previous = self.lines[index(line)];
        self.lines[index(line)] = Drive::Low;
        if line == Line::Clock && previous == Drive::High {
            self.target.sck_falling();
        }
        if line == Line::LedAnode {
            self.led_lit = false;
        }
    }

    fn tristate_line(&mut self, line: Line) {
        let previous = self.lines[index(line)];
        self.lines[index(line)] = Drive::Released;
        if line == Line::Clock && previous == Drive::High {
            self.target.sck_falling();
        }
        if line == Line::LedAnode {
            self.led_lit = false;
        }
    }

    fn read_line(&self, line: Line) -> bool {
        if line == Line::DataIn {
            return self.target.miso_shift & 0x80 != 0;
        }
        self.lines[index(line)] == Drive::High
    }

    fn read_counter(&self) -> u8 {
        self.reads.set(self.reads.get() + 1);
        let value = self.counter.get();
        self.counter.set(value.wrapping_add(self.stride));
        value
    }
}

/// Shift-register model of the ISP slave inside the target device.
///
/// Samples data-out on rising clock edges, shifts its answer out on
/// falling edges, and loads the next answer byte when a whole byte has
/// been clocked in: the echo of the byte just received, or 0x00 while
/// handshake refusals remain. A reset edge drops bit synchronization.
struct SimTarget {
    bit_count: u8,
    mosi_shift: u8,
    miso_shift: u8,
    rx: Vec<u8>,
    commands: Vec<Command>,
    enable_frames: u32,
    refuse_remaining: u32,
}

impl SimTarget {
    fn new(refuse_remaining: u32) -> Self {
        Self {
            bit_count: 0,
            mosi_shift: 0,
            miso_shift: 0,
            rx: Vec::new(),
            commands: Vec::new(),
            enable_frames: 0,
            refuse_remaining,
        }
    }

    fn sck_rising(&mut self, mosi: bool) {
        self.mosi_shift = (self.mosi_shift << 1) | mosi as u8;
    }

    fn sck_falling(&mut self) {
        self.miso_shift <<= 1;
        self.bit_count += 1;
        if self.bit_count == 8 {
            self.bit_count = 0;
            let byte = self.mosi_shift;
            self.mosi_shift = 0;
            self.byte_received(byte);
        }
    }

    fn byte_received(&mut self, byte: u8) {
        self.miso_shift = if self.refuse_remaining == 0 { byte } else { 0x00 };
        self.rx.push(byte);
        if self.rx.len() == 4 {
            let command = Command {
                instruction: self.rx[0],
                a1: self.rx[1],
                a2: self.rx[2],
                a3: self.rx[3],
            };
            if command.instruction == PROGRAM_ENABLE && command.a1 == ENABLE_ACK {
                self.enable_frames += 1;
                if self.refuse_remaining > 0 {
                    self.refuse_remaining -= 1;
                }
            }
            self.commands.push(command);
            self.rx.clear();
        }
    }

    fn reset(&mut self) {
        self.bit_count = 0;
        self.mosi_shift = 0;
        self.miso_shift = 0;
        self.rx.clear();
    }
}

/// Flashed device on the secondary bus with scripted telemetry.
pub struct SimBus {
    version: u8,
    temperature: u16,
    capacitance: u16,
    last_command: Option<u8>,
    pub startups: u32,
    pub shutdowns: u32,
}

impl SimBus {
    pub fn new(version: u8, temperature: u16, capacitance: u16) -> Self {
        Self {
            version,
            temperature,
            capacitance,
            last_command: None,
            startups: 0,
            shutdowns: 0,
        }
    }
}

impl Write for SimBus {
    type Error = Infallible;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        assert_eq!(address, config::TARGET_BUS_ADDR);
        self.last_command = bytes.first().copied();
        Ok(())
    }
}

impl Read for SimBus {
    type Error = Infallible;

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        assert_eq!(address, config::TARGET_BUS_ADDR);
        match self.last_command {
            // Firmware version register
            Some(0x07) => buffer[0] = self.version,
            // 16-bit big-endian telemetry
            Some(0x05) => buffer.copy_from_slice(&self.temperature.to_be_bytes()),
            Some(0x00) => buffer.copy_from_slice(&self.capacitance.to_be_bytes()),
            _ => {}
        }
        Ok(())
    }
}

impl BusControl for SimBus {
    fn startup(&mut self) {
        self.startups += 1;
    }

    fn shutdown(&mut self) {
        self.shutdowns += 1;
    }
}
