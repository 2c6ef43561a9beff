//! Standalone ISP programming fixture: flashes a built-in firmware image
//! into the target device, then runs the factory acceptance tests over the
//! two-wire bus. One LED is the whole operator interface.
#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod cycle;
pub mod firmware;
pub mod hal;
pub mod isp;
pub mod led;
pub mod selftest;

#[cfg(all(target_arch = "avr", feature = "debug"))]
pub mod trace;

#[cfg(test)]
mod sim;
