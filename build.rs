use std::env;

fn main() {
    // Configure for the ATtiny84 fixture board
    let target = env::var("TARGET").unwrap_or_default();
    if target.contains("avr") {
        println!("cargo:rustc-link-arg=-mmcu=attiny84");
    }

    // Pass CPU frequency for timing calculations
    println!("cargo:rustc-env=MCU_FREQ_HZ=12000000");
}
