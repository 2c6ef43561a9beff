//! USI two-wire bus master
//!
//! Software-strobed USI master on PA4 (SCL) / PA6 (SDA), used for the
//! post-flash acceptance tests. The pins double as the ISP clock and
//! data-out lines, so this master may only run while the ISP side is
//! tri-stated.

use avr_device::attiny84::{PORTA, TC0, USI};
use core::marker::PhantomData;

use embedded_hal::blocking::i2c::{Read, Write};

use crate::hal::BusControl;

const SCL: u8 = 4;
const SDA: u8 = 6;

// Two-wire mode, shift clock from the USITC software strobe
const USICR_BASE: u8 = 0b0010_1010;
const USICR_STROBE: u8 = USICR_BASE | 0x01;

// Clear flags; counter value selects 8-bit or single-bit transfers
const USISR_8BIT: u8 = 0xF0;
const USISR_1BIT: u8 = 0xFE;

const USIOIF: u8 = 1 << 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    AddressNack,
    DataNack,
}

pub struct UsiMaster {
    _marker: PhantomData<()>,
}

impl UsiMaster {
    /// The master starts dormant; `startup` claims the lines once the
    /// ISP side has released them.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    fn start(&mut self) {
        unsafe {
            let porta = &*PORTA::ptr();
            // Release SCL, then drop SDA while SCL is high
            porta.porta.modify(|r, w| w.bits(r.bits() | (1 << SCL)));
            while porta.pina.read().bits() & (1 << SCL) == 0 {}
            bit_delay();
            porta.porta.modify(|r, w| w.bits(r.bits() & !(1 << SDA)));
            bit_delay();
            porta.porta.modify(|r, w| w.bits(r.bits() & !(1 << SCL)));
            porta.porta.modify(|r, w| w.bits(r.bits() | (1 << SDA)));
        }
    }

    fn stop(&mut self) {
        unsafe {
            let porta = &*PORTA::ptr();
            porta.porta.modify(|r, w| w.bits(r.bits() & !(1 << SDA)));
            porta.porta.modify(|r, w| w.bits(r.bits() | (1 << SCL)));
            while porta.pina.read().bits() & (1 << SCL) == 0 {}
            bit_delay();
            porta.porta.modify(|r, w| w.bits(r.bits() | (1 << SDA)));
            bit_delay();
        }
    }

    /// Clock the USI until the counter overflows, returning the shifted-in
    /// byte. Leaves SDA released and driven again.
    fn transfer(&mut self, status: u8) -> u8 {
        unsafe {
            let usi = &*USI::ptr();
            let porta = &*PORTA::ptr();
            usi.usisr.write(|w| w.bits(status));
            loop {
                bit_delay();
                usi.usicr.write(|w| w.bits(USICR_STROBE)); // SCL rising
                while porta.pina.read().bits() & (1 << SCL) == 0 {}
                bit_delay();
                usi.usicr.write(|w| w.bits(USICR_STROBE)); // SCL falling
                if usi.usisr.read().bits() & USIOIF != 0 {
                    break;
                }
            }
            bit_delay();
            let data = usi.usidr.read().bits();
            usi.usidr.write(|w| w.bits(0xFF));
            porta.ddra.modify(|r, w| w.bits(r.bits() | (1 << SDA)));
            data
        }
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), ()> {
        unsafe {
            let porta = &*PORTA::ptr();
            porta.porta.modify(|r, w| w.bits(r.bits() & !(1 << SCL)));
            (*USI::ptr()).usidr.write(|w| w.bits(byte));
        }
        self.transfer(USISR_8BIT);
        // Ack bit comes back with SDA released to the device
        unsafe {
            (*PORTA::ptr()).ddra.modify(|r, w| w.bits(r.bits() & !(1 << SDA)));
        }
        if self.transfer(USISR_1BIT) & 0x01 != 0 {
            return Err(());
        }
        Ok(())
    }

    fn read_byte(&mut self, ack: bool) -> u8 {
        unsafe {
            (*PORTA::ptr()).ddra.modify(|r, w| w.bits(r.bits() & !(1 << SDA)));
        }
        let data = self.transfer(USISR_8BIT);
        unsafe {
            (*USI::ptr()).usidr.write(|w| w.bits(if ack { 0x00 } else { 0xFF }));
        }
        self.transfer(USISR_1BIT);
        data
    }
}

impl Default for UsiMaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for UsiMaster {
    type Error = BusError;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.start();
        let result = (|| {
            self.write_byte(address << 1).map_err(|_| BusError::AddressNack)?;
            for &byte in bytes {
                self.write_byte(byte).map_err(|_| BusError::DataNack)?;
            }
            Ok(())
        })();
        self.stop();
        result
    }
}

impl Read for UsiMaster {
    type Error = BusError;

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.start();
        let result = self
            .write_byte((address << 1) | 0x01)
            .map_err(|_| BusError::AddressNack);
        if result.is_ok() {
            let last = buffer.len().saturating_sub(1);
            for (i, slot) in buffer.iter_mut().enumerate() {
                *slot = self.read_byte(i < last);
            }
        }
        self.stop();
        result
    }
}

impl BusControl for UsiMaster {
    /// Enable the USI in two-wire master mode with both lines released.
    fn startup(&mut self) {
        unsafe {
            let porta = &*PORTA::ptr();
            porta.porta.modify(|r, w| w.bits(r.bits() | (1 << SCL) | (1 << SDA)));
            porta.ddra.modify(|r, w| w.bits(r.bits() | (1 << SCL) | (1 << SDA)));

            let usi = &*USI::ptr();
            usi.usidr.write(|w| w.bits(0xFF));
            usi.usicr.write(|w| w.bits(USICR_BASE));
            usi.usisr.write(|w| w.bits(USISR_8BIT));
        }
    }

    fn shutdown(&mut self) {
        unsafe {
            (*USI::ptr()).usicr.write(|w| w.bits(0));
        }
    }
}

/// Half-period settle, one Timer0 count (~5.3 us at clk/64).
fn bit_delay() {
    unsafe {
        let tc0 = &*TC0::ptr();
        let start = tc0.tcnt0.read().bits();
        while tc0.tcnt0.read().bits().wrapping_sub(start) < 1 {}
    }
}
