use std::io::Read;

use crate::config::TimerDecay;
use crate::constants::{
    MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_START, REGISTER_COUNT, SPRITE_SHEET, STACK_CAPACITY,
};
use crate::error::Chip8Error;
use crate::opcode::Opcode;

/// # Machine
/// The internal state of the virtual machine.
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter, starting at 0x200
///
/// Timers
/// - 2 8-bit timers (delay & sound), decremented once per tick
///
/// ## Memory
/// - 4096 bytes of addressable memory
///     - 0x000..0x050 holds the hexadecimal sprite sheet
///     - programs are loaded at 0x200
/// - a 256 slot call stack of return addresses
#[derive(Clone)]
pub struct Machine {
    pub memory: Memory,
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub stack: CallStack,
    pub timers: Timers,
}

impl Machine {
    pub fn new() -> Self {
        Machine {
            memory: Memory::new(),
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            stack: CallStack::new(),
            timers: Timers::default(),
        }
    }

    /// Zero all state, reseed the sprite sheet and point the pc at the program.
    pub fn reset(&mut self) {
        *self = Machine::new();
    }

    /// Copy a program image into memory at `PROGRAM_START`, returning its length.
    pub fn load_program(&mut self, reader: &mut dyn Read) -> Result<usize, Chip8Error> {
        let mut image = Vec::with_capacity(MAX_PROGRAM_SIZE);
        reader.read_to_end(&mut image)?;
        if image.len() > MAX_PROGRAM_SIZE {
            return Err(Chip8Error::ProgramTooLarge {
                size: image.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        self.memory
            .slice_mut(PROGRAM_START, image.len())?
            .copy_from_slice(&image);
        Ok(image.len())
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn fetch(&self) -> Result<Opcode, Chip8Error> {
        let pc = self.pc;
        if pc < PROGRAM_START || pc % 2 != 0 || usize::from(pc) + 1 >= MEMORY_SIZE {
            return Err(Chip8Error::ProgramCounter { pc });
        }
        self.memory.word(pc)
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

/// Addressable memory with the sprite sheet loaded at address 0
#[derive(Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        bytes[..SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        Memory { bytes }
    }

    pub fn read(&self, address: u16) -> Result<u8, Chip8Error> {
        self.bytes
            .get(usize::from(address))
            .copied()
            .ok_or(Chip8Error::MemoryOutOfBounds {
                address: usize::from(address),
            })
    }

    pub fn write(&mut self, address: u16, value: u8) -> Result<(), Chip8Error> {
        let byte = self
            .bytes
            .get_mut(usize::from(address))
            .ok_or(Chip8Error::MemoryOutOfBounds {
                address: usize::from(address),
            })?;
        *byte = value;
        Ok(())
    }

    /// Big-endian 16-bit word at `address`
    pub fn word(&self, address: u16) -> Result<Opcode, Chip8Error> {
        let bytes = self.slice(address, 2)?;
        Ok(Opcode::from_bytes(bytes[0], bytes[1]))
    }

    pub fn slice(&self, address: u16, len: usize) -> Result<&[u8], Chip8Error> {
        let range = Memory::range(address, len)?;
        Ok(&self.bytes[range])
    }

    pub fn slice_mut(&mut self, address: u16, len: usize) -> Result<&mut [u8], Chip8Error> {
        let range = Memory::range(address, len)?;
        Ok(&mut self.bytes[range])
    }

    fn range(address: u16, len: usize) -> Result<std::ops::Range<usize>, Chip8Error> {
        let start = usize::from(address);
        let end = start + len;
        if end > MEMORY_SIZE {
            // report the first byte that doesn't exist
            return Err(Chip8Error::MemoryOutOfBounds {
                address: start.max(MEMORY_SIZE),
            });
        }
        Ok(start..end)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// Return addresses saved by subroutine calls
#[derive(Clone)]
pub struct CallStack {
    frames: [u16; STACK_CAPACITY],
    depth: usize,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack {
            frames: [0; STACK_CAPACITY],
            depth: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn push(&mut self, address: u16) -> Result<(), Chip8Error> {
        let slot = self
            .frames
            .get_mut(self.depth)
            .ok_or(Chip8Error::StackOverflow {
                capacity: STACK_CAPACITY,
            })?;
        *slot = address;
        self.depth += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Chip8Error> {
        if self.depth == 0 {
            return Err(Chip8Error::StackUnderflow);
        }
        self.depth -= 1;
        Ok(self.frames[self.depth])
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    /// Count both timers down by one
    pub fn decay(&mut self, policy: TimerDecay) {
        self.delay = policy.apply(self.delay);
        self.sound = policy.apply(self.sound);
    }
}
