use std::io;

/// Everything that can halt the machine.
///
/// None of these are recoverable: the scheduler stops on the first one it sees.
#[derive(Debug, thiserror::Error)]
pub enum Chip8Error {
    #[error("instruction {opcode:#06X} is not implemented")]
    Unimplemented { opcode: u16 },

    #[error("{opcode:#06X} is not a valid instruction")]
    InvalidOpcode { opcode: u16 },

    #[error("memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("pixel ({x}, {y}) is outside the {width}x{height} display")]
    PixelOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("{key:#04X} is not a key on the keypad")]
    InvalidKey { key: u8 },

    #[error("call stack overflow: all {capacity} slots are in use")]
    StackOverflow { capacity: usize },

    #[error("call stack underflow: returned with an empty call stack")]
    StackUnderflow,

    #[error("program counter {pc:#06X} is not an even address inside program memory")]
    ProgramCounter { pc: u16 },

    #[error("program image is {size} bytes but at most {max} bytes fit in memory")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("a program image is already loaded; reset the machine first")]
    ProgramAlreadyLoaded,

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("failed to read program image")]
    Io(#[from] io::Error),
}
