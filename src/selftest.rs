//! Post-flash acceptance tests
//!
//! Once the target runs its freshly flashed firmware it answers simple
//! request/response commands on the two-wire bus. Three independent
//! checks gate the cycle: reported firmware version, temperature
//! telemetry and capacitance telemetry. A bus error counts as a failed
//! check; the verdict is the conjunction of all three.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::{Read, Write};
use ufmt::derive::uDebug;

use crate::config;

const CMD_READ_CAPACITANCE: u8 = 0x00;
const CMD_READ_TEMPERATURE: u8 = 0x05;
const CMD_GET_FW_VERSION: u8 = 0x07;

/// Outcome of the three acceptance checks.
#[derive(uDebug, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestReport {
    pub version_ok: bool,
    pub temperature_ok: bool,
    pub capacitance_ok: bool,
}

impl TestReport {
    pub fn passed(&self) -> bool {
        self.version_ok && self.temperature_ok && self.capacitance_ok
    }
}

/// Run all three checks. All of them execute even after a failure.
pub fn run<B, D>(bus: &mut B, delay: &mut D) -> TestReport
where
    B: Write + Read,
    D: DelayMs<u16>,
{
    TestReport {
        version_ok: firmware_version_matches(bus, delay),
        temperature_ok: temperature_within_limits(bus, delay),
        capacitance_ok: capacitance_within_limits(bus, delay),
    }
}

fn firmware_version_matches<B, D>(bus: &mut B, delay: &mut D) -> bool
where
    B: Write + Read,
    D: DelayMs<u16>,
{
    if bus.write(config::TARGET_BUS_ADDR, &[CMD_GET_FW_VERSION]).is_err() {
        return false;
    }
    delay.delay_ms(config::TELEMETRY_SETTLE_MS);

    let mut response = [0u8; 1];
    if bus.read(config::TARGET_BUS_ADDR, &mut response).is_err() {
        return false;
    }
    response[0] == config::EXPECTED_FW_VERSION
}

fn temperature_within_limits<B, D>(bus: &mut B, delay: &mut D) -> bool
where
    B: Write + Read,
    D: DelayMs<u16>,
{
    match read_telemetry(bus, delay, CMD_READ_TEMPERATURE) {
        Some(temperature) => temperature > config::TEMP_MIN && temperature < config::TEMP_MAX,
        None => false,
    }
}

fn capacitance_within_limits<B, D>(bus: &mut B, delay: &mut D) -> bool
where
    B: Write + Read,
    D: DelayMs<u16>,
{
    match read_telemetry(bus, delay, CMD_READ_CAPACITANCE) {
        Some(capacitance) => capacitance > config::CAP_MIN && capacitance < config::CAP_MAX,
        None => false,
    }
}

/// One request/response pair: command out, settle, 16-bit big-endian
/// value back. The buffer lives on the caller's stack.
fn read_telemetry<B, D>(bus: &mut B, delay: &mut D, command: u8) -> Option<u16>
where
    B: Write + Read,
    D: DelayMs<u16>,
{
    bus.write(config::TARGET_BUS_ADDR, &[command]).ok()?;
    delay.delay_ms(config::TELEMETRY_SETTLE_MS);

    let mut response = [0u8; 2];
    bus.read(config::TARGET_BUS_ADDR, &mut response).ok()?;
    Some(u16::from_be_bytes(response))
}
