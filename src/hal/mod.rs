pub mod clock;

#[cfg(target_arch = "avr")]
pub mod attiny;
#[cfg(target_arch = "avr")]
pub mod usi;

pub use clock::{delay_ms, fine_wait, wait_ticks, TickDelay};

/// Physical lines the core drives, one entry per fixture wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Reset,
    Clock,
    DataOut,
    DataIn,
    LedAnode,
    LedCathode,
}

/// Capability handle over the fixture pins and the free-running counter.
///
/// The protocol and signalling layers depend only on this trait, so a
/// simulated backend can stand in for the board during host tests.
pub trait PeripheralHandle {
    /// Drive a line high.
    fn set_line(&mut self, line: Line);
    /// Drive a line low.
    fn clear_line(&mut self, line: Line);
    /// Stop driving a line (input, pull-up off).
    fn tristate_line(&mut self, line: Line);
    /// Sample a line.
    fn read_line(&self, line: Line) -> bool;
    /// Sample the free-running 8-bit counter.
    fn read_counter(&self) -> u8;
}

/// Power control for the secondary bus master peripheral.
///
/// The bus master may share pins with the ISP lines, so it only runs
/// between `startup` and `shutdown`, after the ISP side is released.
pub trait BusControl {
    /// Claim the bus lines and enable the master.
    fn startup(&mut self);
    /// Turn the bus master off until the next cycle starts it again.
    fn shutdown(&mut self);
}
