//! One complete programming-and-test cycle
//!
//! The forever loop in `main` is a thin driver around [`run_one_cycle`],
//! which is the unit a host test can drive against simulated peripherals.

use embedded_hal::blocking::i2c::{Read, Write};
use ufmt::derive::uDebug;

use crate::config;
use crate::firmware::FIRMWARE;
use crate::hal::{clock, BusControl, PeripheralHandle, TickDelay};
use crate::isp::Session;
use crate::led;
use crate::selftest::{self, TestReport};

/// Verdict of one cycle. Carries no state into the next one.
#[derive(uDebug, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(TestReport),
}

/// Program one device and acceptance-test it.
///
/// Blocks until a target acknowledges the programming-mode handshake,
/// blinking the busy pattern between whole retry rounds; after that the
/// sequence runs straight through and ends with the pass or fail LED
/// pattern. The bus master is shut down before returning so the next
/// cycle starts from a clean slate.
pub fn run_one_cycle<P, B>(io: &mut P, bus: &mut B) -> Outcome
where
    P: PeripheralHandle,
    B: Write + Read + BusControl,
{
    let mut session = Session::new();

    session.connect(io);
    clock::delay_ms(io, config::POST_CONNECT_DELAY_MS);

    while session.enter_programming_mode(io).is_err() {
        // No device answered a whole retry round; reconnect and show
        // the operator we are still waiting.
        session.connect(io);
        clock::delay_ms(io, config::RETRY_BLINK_MS);
        led::led_on(io);
        clock::delay_ms(io, config::RETRY_BLINK_MS);
        led::led_off(io);
    }

    session.set_fuses(io, config::FUSE_LOW, config::FUSE_HIGH, config::FUSE_EXTENDED);
    session.chip_erase(io);
    session.flash_firmware(io, &FIRMWARE);
    led::led_off(io);

    session.release(io);

    bus.startup();
    let report = selftest::run(bus, &mut TickDelay::new(io));
    let outcome = if report.passed() {
        led::blink(io, config::PASS_BLINK_COUNT);
        Outcome::Passed
    } else {
        led::show_failure(io);
        Outcome::Failed(report)
    };

    bus.shutdown();
    outcome
}
