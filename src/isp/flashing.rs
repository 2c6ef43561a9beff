//! Fuse, erase and paged flash programming on an established session

use super::{
    Session, CHIP_ERASE, COMMIT_PAGE, LOAD_HIGH_BYTE, LOAD_LOW_BYTE, PROGRAM_ENABLE,
    WRITE_FUSE_EXTENDED, WRITE_FUSE_HIGH, WRITE_FUSE_LOW,
};
use crate::config;
use crate::hal::{clock, PeripheralHandle};
use crate::led;

/// A page fills whenever the next word index crosses a PAGE_SIZE
/// multiple. Index 0 is never a boundary.
pub fn is_page_boundary(index: usize) -> bool {
    index > 0 && (index + 1) % config::PAGE_SIZE == 0
}

impl Session {
    /// Write the three fuse bytes, letting each one settle.
    pub fn set_fuses<P: PeripheralHandle>(&mut self, io: &mut P, low: u8, high: u8, extended: u8) {
        self.command(io, PROGRAM_ENABLE, WRITE_FUSE_LOW, 0x00, low);
        clock::wait_ticks(io, config::FUSE_SETTLE_TICKS);
        self.command(io, PROGRAM_ENABLE, WRITE_FUSE_HIGH, 0x00, high);
        clock::wait_ticks(io, config::FUSE_SETTLE_TICKS);
        self.command(io, PROGRAM_ENABLE, WRITE_FUSE_EXTENDED, 0x00, extended);
        clock::wait_ticks(io, config::FUSE_SETTLE_TICKS);
    }

    pub fn chip_erase<P: PeripheralHandle>(&mut self, io: &mut P) {
        self.command(io, PROGRAM_ENABLE, CHIP_ERASE, 0x00, 0x00);
        clock::wait_ticks(io, config::FUSE_SETTLE_TICKS);
    }

    /// Program the whole image word by word.
    ///
    /// Each word is loaded as a low byte then a high byte at its index;
    /// a full page is committed as soon as its last word is loaded, and
    /// a trailing partial page is flushed after the loop. The LED
    /// toggles per word as a liveness indicator only.
    pub fn flash_firmware<P: PeripheralHandle>(&mut self, io: &mut P, image: &[u16]) {
        for (index, &word) in image.iter().enumerate() {
            if index % 2 == 1 {
                led::led_on(io);
            } else {
                led::led_off(io);
            }

            let addr_high = (index >> 8) as u8;
            let addr_low = index as u8;
            self.command(io, LOAD_LOW_BYTE, addr_high, addr_low, word as u8);
            self.command(io, LOAD_HIGH_BYTE, addr_high, addr_low, (word >> 8) as u8);

            if is_page_boundary(index) {
                self.command(io, COMMIT_PAGE, addr_high, addr_low, 0x00);
                clock::wait_ticks(io, config::PAGE_SETTLE_TICKS);
            }
        }

        if let Some(last) = image.len().checked_sub(1) {
            if !is_page_boundary(last) {
                self.command(io, COMMIT_PAGE, (last >> 8) as u8, last as u8, 0x00);
                clock::wait_ticks(io, config::PAGE_SETTLE_TICKS);
            }
        }
    }
}
