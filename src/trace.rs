//! Software-serial debug console (9600 8N1 on PA7)
//!
//! Engineering aid only, compiled in with the `debug` feature; the LED
//! remains the sole operator-facing channel.

use avr_device::attiny84::{PORTA, TC0};
use core::convert::Infallible;
use core::marker::PhantomData;

const TX: u8 = 7;

// Timer0 counts per bit at 9600 baud (104 us / 5.33 us per count)
const BIT_COUNTS: u8 = 20;

pub struct TraceConsole {
    _marker: PhantomData<()>,
}

impl TraceConsole {
    pub fn new() -> Self {
        unsafe {
            let porta = &*PORTA::ptr();
            porta.porta.modify(|r, w| w.bits(r.bits() | (1 << TX)));
            porta.ddra.modify(|r, w| w.bits(r.bits() | (1 << TX)));
        }
        Self {
            _marker: PhantomData,
        }
    }

    pub fn write_byte(&mut self, byte: u8) {
        unsafe {
            let porta = &*PORTA::ptr();
            // Start bit
            porta.porta.modify(|r, w| w.bits(r.bits() & !(1 << TX)));
            bit_wait();
            // Data bits, LSB first
            for bit in 0..8 {
                if byte & (1 << bit) != 0 {
                    porta.porta.modify(|r, w| w.bits(r.bits() | (1 << TX)));
                } else {
                    porta.porta.modify(|r, w| w.bits(r.bits() & !(1 << TX)));
                }
                bit_wait();
            }
            // Stop bit
            porta.porta.modify(|r, w| w.bits(r.bits() | (1 << TX)));
            bit_wait();
        }
    }
}

impl Default for TraceConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl ufmt::uWrite for TraceConsole {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
        Ok(())
    }
}

fn bit_wait() {
    unsafe {
        let tc0 = &*TC0::ptr();
        let start = tc0.tcnt0.read().bits();
        while tc0.tcnt0.read().bits().wrapping_sub(start) < BIT_COUNTS {}
    }
}
