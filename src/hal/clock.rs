//! Busy-wait timing over the free-running Timer0 counter

use embedded_hal::blocking::delay::DelayMs;

use crate::config::TICK_COUNTS;
use crate::hal::PeripheralHandle;

/// Block for `ticks` coarse ticks of 320 us each.
///
/// The 8-bit counter wraps freely; the unsigned difference against the
/// start sample stays correct across the wrap.
pub fn wait_ticks<P: PeripheralHandle>(io: &P, ticks: u16) {
    for _ in 0..ticks {
        let start = io.read_counter();
        while io.read_counter().wrapping_sub(start) < TICK_COUNTS {}
    }
}

/// Block for `counts` raw counter increments, used to pace SCK edges.
pub fn fine_wait<P: PeripheralHandle>(io: &P, counts: u8) {
    let start = io.read_counter();
    while io.read_counter().wrapping_sub(start) < counts {}
}

/// Block for roughly `ms` milliseconds (3.125 coarse ticks per ms).
pub fn delay_ms<P: PeripheralHandle>(io: &P, ms: u16) {
    wait_ticks(io, ms_to_ticks(ms));
}

pub(crate) const fn ms_to_ticks(ms: u16) -> u16 {
    // 1 ms / 320 us = 25/8 ticks
    (ms as u32 * 25 / 8) as u16
}

/// Adapter exposing the tick counter as an `embedded-hal` delay.
pub struct TickDelay<'a, P: PeripheralHandle> {
    io: &'a P,
}

impl<'a, P: PeripheralHandle> TickDelay<'a, P> {
    pub fn new(io: &'a P) -> Self {
        Self { io }
    }
}

impl<P: PeripheralHandle> DelayMs<u16> for TickDelay<'_, P> {
    fn delay_ms(&mut self, ms: u16) {
        delay_ms(self.io, ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimFixture;

    #[test]
    fn wait_spans_counter_wraparound() {
        // Counter starts near its maximum so one full tick must cross 0xFF.
        let io = SimFixture::with_counter(250, 1);
        wait_ticks(&io, 1);
        // 60 increments past the start sample: one read for the start,
        // then one per increment until the difference reaches the tick.
        assert_eq!(io.counter_reads(), 61);
        assert_eq!(io.counter_value(), 55);
    }

    #[test]
    fn wait_never_returns_early() {
        let io = SimFixture::with_counter(0, 1);
        wait_ticks(&io, 2);
        // Each tick needs at least TICK_COUNTS counter increments.
        assert!(io.counter_reads() >= 2 * TICK_COUNTS as u32);
    }

    #[test]
    fn fine_wait_uses_raw_counts() {
        let io = SimFixture::with_counter(10, 1);
        fine_wait(&io, 3);
        assert_eq!(io.counter_reads(), 4);
    }

    #[test]
    fn ms_conversion_rounds_down() {
        assert_eq!(ms_to_ticks(1), 3);
        assert_eq!(ms_to_ticks(100), 312);
        assert_eq!(ms_to_ticks(2000), 6250);
    }
}
