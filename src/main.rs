#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]

#[cfg(target_arch = "avr")]
use panic_halt as _;

#[cfg(target_arch = "avr")]
#[avr_device::entry]
fn main() -> ! {
    let _peripherals = avr_device::attiny84::Peripherals::take().unwrap();

    let mut io = isp_fixture::hal::attiny::FixtureIo::new();
    let mut bus = isp_fixture::hal::usi::UsiMaster::new();

    #[cfg(feature = "debug")]
    let mut console = isp_fixture::trace::TraceConsole::new();

    // One iteration programs and tests one device; the operator swaps
    // devices by hand and reads the LED. Runs unattended forever.
    loop {
        let outcome = isp_fixture::cycle::run_one_cycle(&mut io, &mut bus);

        #[cfg(feature = "debug")]
        ufmt::uwriteln!(&mut console, "cycle: {:?}", outcome).ok();
        #[cfg(not(feature = "debug"))]
        let _ = outcome;
    }
}

// The firmware only makes sense on the fixture MCU; this stub keeps the
// binary target compiling when the library is built and tested on the host.
#[cfg(not(target_arch = "avr"))]
fn main() {}
