//! Built-in target firmware image
//!
//! Pre-built by the sensor firmware project and programmed verbatim,
//! one 16-bit word per flash address. The fixture never interprets it.

pub const FIRMWARE_WORD_COUNT: usize = 90;

#[rustfmt::skip]
pub static FIRMWARE: [u16; FIRMWARE_WORD_COUNT] = [
    0xC010, 0xC018, 0xC017, 0xC016, 0xC015, 0xC014, 0xC013, 0xC012,
    0xC011, 0xC029, 0xC00F, 0xC00E, 0xC00D, 0xC00C, 0xC00B, 0xC00A,
    0x2411, 0xBE1F, 0xE5CF, 0xE0D2, 0xBFDE, 0xBFCD, 0xE020, 0xE6A0,
    0xE0B0, 0xC001, 0x921D, 0x36A4, 0x07B2, 0xF7E1, 0xD034, 0xC055,
    0xCFFB, 0x9A25, 0x9A23, 0xB305, 0x7F0C, 0xBB05, 0xE808, 0xBD07,
    0xEF0F, 0xBD06, 0x9478, 0x9508, 0xB325, 0x6021, 0xBB25, 0xE02C,
    0xBD21, 0xE42A, 0xBD22, 0x9508, 0xB700, 0xFD06, 0xCFFD, 0xB720,
    0x9508, 0xE091, 0xB380, 0x1792, 0xF029, 0x2F89, 0xD012, 0x5091,
    0xF7D1, 0x9508, 0xE080, 0xD00B, 0x0F88, 0x1D91, 0xD008, 0x0F99,
    0x2D98, 0x9508, 0xB385, 0xFB87, 0xF408, 0x9595, 0x9508, 0xEF9F,
    0x9508, 0x9A42, 0x9842, 0xB386, 0x7086, 0x2D68, 0x9508, 0xF8CF,
    0x9518, 0x0000,
];
