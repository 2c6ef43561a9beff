//! ATtiny84 fixture board backend
//!
//! ISP lines live on PORTA, the status LED on PORTB, and Timer0 runs
//! free at clk/64 as the tick source. The two-wire master in
//! [`crate::hal::usi`] shares PA4/PA6 with the ISP clock and data-out
//! lines; the control loop tri-states the ISP side before using it.

use avr_device::attiny84::{PORTA, PORTB, TC0};
use core::marker::PhantomData;

use crate::config;
use crate::hal::{Line, PeripheralHandle};

enum Port {
    A,
    B,
}

fn line_bit(line: Line) -> (Port, u8) {
    match line {
        Line::Reset => (Port::A, 1 << config::ISP_RST_PIN),
        Line::Clock => (Port::A, 1 << config::ISP_SCK_PIN),
        Line::DataOut => (Port::A, 1 << config::ISP_MOSI_PIN),
        Line::DataIn => (Port::A, 1 << config::ISP_MISO_PIN),
        Line::LedAnode => (Port::B, 1 << config::LED_A_PIN),
        Line::LedCathode => (Port::B, 1 << config::LED_K_PIN),
    }
}

pub struct FixtureIo {
    _marker: PhantomData<()>,
}

impl FixtureIo {
    /// Take over the fixture pins and start the tick counter.
    pub fn new() -> Self {
        unsafe {
            // Timer0 normal mode, clk/64: 60 counts per 320 us tick
            let tc0 = &*TC0::ptr();
            tc0.tccr0a.write(|w| w.bits(0));
            tc0.tccr0b.write(|w| w.bits(0x03));
            tc0.tcnt0.write(|w| w.bits(0));
        }
        Self {
            _marker: PhantomData,
        }
    }
}

impl Default for FixtureIo {
    fn default() -> Self {
        Self::new()
    }
}

impl PeripheralHandle for FixtureIo {
    fn set_line(&mut self, line: Line) {
        let (port, bit) = line_bit(line);
        unsafe {
            match port {
                Port::A => {
                    let p = &*PORTA::ptr();
                    p.ddra.modify(|r, w| w.bits(r.bits() | bit));
                    p.porta.modify(|r, w| w.bits(r.bits() | bit));
                }
                Port::B => {
                    let p = &*PORTB::ptr();
                    p.ddrb.modify(|r, w| w.bits(r.bits() | bit));
                    p.portb.modify(|r, w| w.bits(r.bits() | bit));
                }
            }
        }
    }

    fn clear_line(&mut self, line: Line) {
        let (port, bit) = line_bit(line);
        unsafe {
            match port {
                Port::A => {
                    let p = &*PORTA::ptr();
                    p.ddra.modify(|r, w| w.bits(r.bits() | bit));
                    p.porta.modify(|r, w| w.bits(r.bits() & !bit));
                }
                Port::B => {
                    let p = &*PORTB::ptr();
                    p.ddrb.modify(|r, w| w.bits(r.bits() | bit));
                    p.portb.modify(|r, w| w.bits(r.bits() & !bit));
                }
            }
        }
    }

    fn tristate_line(&mut self, line: Line) {
        let (port, bit) = line_bit(line);
        unsafe {
            match port {
                Port::A => {
                    let p = &*PORTA::ptr();
                    p.ddra.modify(|r, w| w.bits(r.bits() & !bit));
                    p.porta.modify(|r, w| w.bits(r.bits() & !bit));
                }
                Port::B => {
                    let p = &*PORTB::ptr();
                    p.ddrb.modify(|r, w| w.bits(r.bits() & !bit));
                    p.portb.modify(|r, w| w.bits(r.bits() & !bit));
                }
            }
        }
    }

    fn read_line(&self, line: Line) -> bool {
        let (port, bit) = line_bit(line);
        unsafe {
            match port {
                Port::A => (*PORTA::ptr()).pina.read().bits() & bit != 0,
                Port::B => (*PORTB::ptr()).pinb.read().bits() & bit != 0,
            }
        }
    }

    fn read_counter(&self) -> u8 {
        unsafe { (*TC0::ptr()).tcnt0.read().bits() }
    }
}
