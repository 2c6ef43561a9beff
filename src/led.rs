//! Status LED patterns
//!
//! The LED sits between two pins and is driven by direction as much as
//! polarity: forward bias discharges the junction capacitance for full
//! brightness, and "off" releases both pins so no leakage path can make
//! it glow faintly.

use crate::config;
use crate::hal::{clock, Line, PeripheralHandle};

pub fn led_on<P: PeripheralHandle>(io: &mut P) {
    io.clear_line(Line::LedCathode);
    io.set_line(Line::LedAnode);
}

pub fn led_off<P: PeripheralHandle>(io: &mut P) {
    io.tristate_line(Line::LedAnode);
    io.tristate_line(Line::LedCathode);
}

/// Pass pattern: fast blink burst.
pub fn blink<P: PeripheralHandle>(io: &mut P, count: u16) {
    for _ in 0..count {
        led_on(io);
        clock::delay_ms(io, config::PASS_BLINK_MS);
        led_off(io);
        clock::delay_ms(io, config::PASS_BLINK_MS);
    }
}

/// Fail pattern: solid hold, then dark.
pub fn show_failure<P: PeripheralHandle>(io: &mut P) {
    led_on(io);
    clock::delay_ms(io, config::FAIL_HOLD_MS);
    led_off(io);
}
