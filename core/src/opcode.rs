use std::fmt;

use num_enum::TryFromPrimitive;

/// # Opcodes
///
/// Instructions are 16 bits each, stored big-endian. Their behavior is cased on:
/// - `(n, _, _, _)` the family; applies to all opcodes
/// - `(_, _, _, n)` a specific operation within the ALU family
/// - `(_, _, n, n)` a specific operation within the key and timer/memory families
///
/// Nibbles not used to select the operation carry its operands.
/// - `(_, n, n, n)` a 12-bit address
/// - `(_, _, n, n)` an 8-bit constant that is assigned to and/or compared with Vx
/// - `(_, n, _, _)` either the register Vx or the range of registers V0..=Vx
/// - `(_, _, n, _)` the register Vy
/// - `(_, _, _, n)` a 4-bit row count for sprites
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    /// Combines two bytes of memory, high byte first.
    pub fn from_bytes(high: u8, low: u8) -> Self {
        Opcode(u16::from(high) << 8 | u16::from(low))
    }

    pub fn raw(self) -> u16 {
        self.0
    }

    /// Returns the Opcode's component nibbles.
    pub fn nibbles(self) -> (u8, u8, u8, u8) {
        (
            self.family(),
            ((self.0 & 0x0F00) >> 8) as u8,
            ((self.0 & 0x00F0) >> 4) as u8,
            self.n(),
        )
    }

    /// The Opcode's most significant nibble.
    /// `[f___]`
    pub fn family(self) -> u8 {
        ((self.0 & 0xF000) >> 12) as u8
    }

    /// The Opcode's second nibble as a register index.
    /// `[_x__]`
    pub fn x(self) -> usize {
        usize::from((self.0 & 0x0F00) >> 8)
    }

    /// The Opcode's third nibble as a register index.
    /// `[__y_]`
    pub fn y(self) -> usize {
        usize::from((self.0 & 0x00F0) >> 4)
    }

    /// The Opcode's fourth nibble.
    /// `[___n]`
    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    /// The Opcode's least significant byte.
    /// `[__kk]`
    pub fn kk(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// The Opcode without its most significant nibble.
    /// `[_adr]`
    pub fn addr(self) -> u16 {
        self.0 & 0x0FFF
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

/// The sixteen instruction families selected by an Opcode's top nibble.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum Family {
    /// 0nnn call machine routine, 00E0 clear, 00EE return
    System = 0x0,
    /// 1nnn
    Jump = 0x1,
    /// 2nnn
    Call = 0x2,
    /// 3xkk
    SkipEqualConst = 0x3,
    /// 4xkk
    SkipNotEqualConst = 0x4,
    /// 5xy0
    SkipEqual = 0x5,
    /// 6xkk
    SetConst = 0x6,
    /// 7xkk
    AddConst = 0x7,
    /// 8xyn
    Alu = 0x8,
    /// 9xy0
    SkipNotEqual = 0x9,
    /// Annn
    SetIndex = 0xA,
    /// Bnnn
    JumpOffset = 0xB,
    /// Cxkk
    Random = 0xC,
    /// Dxyn
    Draw = 0xD,
    /// Ex9E, ExA1
    Key = 0xE,
    /// Fxkk
    TimerMemory = 0xF,
}
