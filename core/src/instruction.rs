use std::convert::TryFrom;

use crate::error::Chip8Error;
use crate::opcode::{Family, Opcode};
use crate::operations::*;

/// Selects the correct Operation for a given Opcode
///
/// Every family decodes, but call/clear/return (0), subroutine calls (2) and jumps with an
/// offset (B) are not implemented, and sub-operations outside the table are invalid.
pub fn from_op(op: Opcode) -> Result<Operation, Chip8Error> {
    let family = Family::try_from(op.family()).map_err(|_| Chip8Error::InvalidOpcode {
        opcode: op.raw(),
    })?;

    let operation: Operation = match (family, op.nibbles()) {
        (Family::System, _) | (Family::Call, _) | (Family::JumpOffset, _) => {
            return Err(Chip8Error::Unimplemented { opcode: op.raw() })
        }
        (Family::Jump, _) => jump,
        (Family::SkipEqualConst, _) => ske,
        (Family::SkipNotEqualConst, _) => skne,
        (Family::SkipEqual, _) => skre,
        (Family::SetConst, _) => load,
        (Family::AddConst, _) => add,
        (Family::Alu, (.., 0x0)) => mv,
        (Family::Alu, (.., 0x1)) => or,
        (Family::Alu, (.., 0x2)) => and,
        (Family::Alu, (.., 0x3)) => xor,
        (Family::Alu, (.., 0x4)) => addr,
        (Family::Alu, (.., 0x5)) => sub,
        (Family::Alu, (.., 0x6)) => shr,
        (Family::Alu, (.., 0x7)) => subn,
        (Family::Alu, (.., 0xE)) => shl,
        (Family::SkipNotEqual, _) => skrne,
        (Family::SetIndex, _) => loadi,
        (Family::Random, _) => rand,
        (Family::Draw, _) => draw,
        (Family::Key, (.., 0x9, 0xE)) => skpr,
        (Family::Key, (.., 0xA, 0x1)) => skup,
        (Family::TimerMemory, (.., 0x0, 0x7)) => moved,
        (Family::TimerMemory, (.., 0x0, 0xA)) => keyd,
        (Family::TimerMemory, (.., 0x1, 0x5)) => loads,
        (Family::TimerMemory, (.., 0x1, 0x8)) => ld,
        (Family::TimerMemory, (.., 0x1, 0xE)) => addi,
        (Family::TimerMemory, (.., 0x2, 0x9)) => ldspr,
        (Family::TimerMemory, (.., 0x3, 0x3)) => bcd,
        (Family::TimerMemory, (.., 0x5, 0x5)) => stor,
        (Family::TimerMemory, (.., 0x6, 0x5)) => read,
        _ => return Err(Chip8Error::InvalidOpcode { opcode: op.raw() }),
    };
    Ok(operation)
}
