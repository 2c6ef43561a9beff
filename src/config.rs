//! Build-time configuration for the programming fixture

/// Fixture CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 12_000_000;

/// Timer0 counts per coarse tick (60 counts at clk/64 = 320 us)
pub const TICK_COUNTS: u8 = 60;

/// ISP clock half-period in timer counts, applied between SCK edges
pub const SCK_SW_DELAY: u8 = 1;

/// Target flash page size in 16-bit words
pub const PAGE_SIZE: usize = 8;

/// Programming-enable handshake attempts before giving up
pub const HANDSHAKE_RETRIES: u8 = 32;

/// Target fuse bytes written before every erase
pub const FUSE_LOW: u8 = 0xAE;
pub const FUSE_HIGH: u8 = 0xDF;
pub const FUSE_EXTENDED: u8 = 0xF5;

/// Settle time after fuse-write and chip-erase commands, coarse ticks
pub const FUSE_SETTLE_TICKS: u16 = 30;

/// Settle time after a page-commit command, coarse ticks
pub const PAGE_SETTLE_TICKS: u16 = 15;

/// Seven-bit bus address of the flashed device under test
pub const TARGET_BUS_ADDR: u8 = 0x20;

/// Firmware version the flashed device must report
pub const EXPECTED_FW_VERSION: u8 = 0x23;

/// Telemetry acceptance windows, both bounds exclusive
pub const TEMP_MIN: u16 = 100;
pub const TEMP_MAX: u16 = 400;
pub const CAP_MIN: u16 = 180;
pub const CAP_MAX: u16 = 300;

/// Settle time between a telemetry request and its read-back
pub const TELEMETRY_SETTLE_MS: u16 = 1;

/// Pause after the initial connect before the first handshake
pub const POST_CONNECT_DELAY_MS: u16 = 100;

/// Reset-release settle before the acceptance tests run
pub const RESET_RELEASE_DELAY_MS: u16 = 300;

/// Busy-indicator half-period while waiting for a device to answer
pub const RETRY_BLINK_MS: u16 = 500;

/// Solid-LED hold time signalling a failed acceptance test
pub const FAIL_HOLD_MS: u16 = 2000;

/// Pass-indicator blink count and half-period
pub const PASS_BLINK_COUNT: u16 = 30;
pub const PASS_BLINK_MS: u16 = 50;

// Fixture pin assignments (ISP on PORTA, LED on PORTB)
pub const ISP_RST_PIN: u8 = 0;
pub const ISP_SCK_PIN: u8 = 4;
pub const ISP_MISO_PIN: u8 = 5;
pub const ISP_MOSI_PIN: u8 = 6;
pub const LED_K_PIN: u8 = 0;
pub const LED_A_PIN: u8 = 1;
