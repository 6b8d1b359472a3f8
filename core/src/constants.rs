/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// Address at which program images are loaded and execution begins
pub const PROGRAM_START: u16 = 0x200;

/// The largest program image that fits between `PROGRAM_START` and the end of memory
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Number of general purpose registers (V0..VF)
pub const REGISTER_COUNT: usize = 16;

/// VF doubles as the carry/borrow/shift flag
pub const FLAG_REGISTER: usize = 0xF;

/// Number of return addresses the call stack can hold
pub const STACK_CAPACITY: usize = 256;

/// Number of keys on the hexadecimal keypad
pub const KEY_COUNT: u8 = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Cycle units available to a single tick
pub const CYCLES_PER_TICK: u32 = 8;

/// Cycle units consumed by every instruction
pub const CYCLES_PER_INSTRUCTION: u32 = 2;

/// Ticks per second
pub const TICK_RATE: u32 = 60;

/// Rows in each font glyph
pub const GLYPH_HEIGHT: u16 = 5;

/// # Sprite Sheet
/// The hexadecimal digits 0..F as 8x5 sprites, loaded at address 0.
///
/// Each byte is a row, the high nibble holds the pixels:
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
