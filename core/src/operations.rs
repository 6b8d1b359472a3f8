use crate::constants::{FLAG_REGISTER, GLYPH_HEIGHT, MEMORY_SIZE};
use crate::error::Chip8Error;
use crate::frame::FrameBuffer;
use crate::opcode::Opcode;
use crate::state::Machine;

/// What the scheduler does with the program counter once an operation has run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    /// pc += 2
    Next,
    /// pc += 4
    Skip,
    /// pc = addr
    Jump(u16),
    /// pc += 2, then suspend dispatch until a key is pressed and store it in the register
    AwaitKey(usize),
}

impl Flow {
    fn skip_if(condition: bool) -> Flow {
        if condition {
            Flow::Skip
        } else {
            Flow::Next
        }
    }
}

/// Signature shared by every instruction.
/// `held_keys` has bit `n` set while key `n` is held down.
pub type Operation = fn(
    op: Opcode,
    machine: &mut Machine,
    frame: &mut FrameBuffer,
    held_keys: u16,
) -> Result<Flow, Chip8Error>;

/// PC = addr
pub fn jump(
    op: Opcode,
    _machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    Ok(Flow::Jump(op.addr()))
}

/// if Vx == kk then pc += 2
pub fn ske(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    Ok(Flow::skip_if(machine.v[op.x()] == op.kk()))
}

/// if Vx != kk then pc += 2
pub fn skne(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    Ok(Flow::skip_if(machine.v[op.x()] != op.kk()))
}

/// if Vx == Vy then pc += 2
pub fn skre(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    Ok(Flow::skip_if(machine.v[op.x()] == machine.v[op.y()]))
}

/// Vx = kk
pub fn load(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    machine.v[op.x()] = op.kk();
    Ok(Flow::Next)
}

/// Vx += kk
/// Wraps around without touching VF
pub fn add(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    machine.v[op.x()] = machine.v[op.x()].wrapping_add(op.kk());
    Ok(Flow::Next)
}

/// Vx = Vy
pub fn mv(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    machine.v[op.x()] = machine.v[op.y()];
    Ok(Flow::Next)
}

/// Vx |= Vy
pub fn or(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    machine.v[op.x()] |= machine.v[op.y()];
    Ok(Flow::Next)
}

/// Vx &= Vy
pub fn and(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    machine.v[op.x()] &= machine.v[op.y()];
    Ok(Flow::Next)
}

/// Vx ^= Vy
pub fn xor(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    machine.v[op.x()] ^= machine.v[op.y()];
    Ok(Flow::Next)
}

// The ALU operations below write VF before Vx, so with x = F the result wins over the flag.

/// Vx += Vy; VF = carry
pub fn addr(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    let (res, carry) = machine.v[op.x()].overflowing_add(machine.v[op.y()]);
    machine.v[FLAG_REGISTER] = carry as u8;
    machine.v[op.x()] = res;
    Ok(Flow::Next)
}

/// Vx -= Vy; VF = (Vx - Vy > 0)
/// Equal operands clear VF.
pub fn sub(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    let (vx, vy) = (machine.v[op.x()], machine.v[op.y()]);
    machine.v[FLAG_REGISTER] = (vx > vy) as u8;
    machine.v[op.x()] = vx.wrapping_sub(vy);
    Ok(Flow::Next)
}

/// Vx >>= 1; VF = shifted out bit
pub fn shr(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    let vx = machine.v[op.x()];
    machine.v[FLAG_REGISTER] = vx & 0x1;
    machine.v[op.x()] = vx >> 1;
    Ok(Flow::Next)
}

/// Vx = Vy - Vx; VF = (Vy - Vx > 0)
pub fn subn(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    let (vx, vy) = (machine.v[op.x()], machine.v[op.y()]);
    machine.v[FLAG_REGISTER] = (vy > vx) as u8;
    machine.v[op.x()] = vy.wrapping_sub(vx);
    Ok(Flow::Next)
}

/// Vx <<= 1; VF = (Vx & 0x80) >> 4
/// The top bit lands in bit 3 of VF, so a set bit reads as 0x08 rather than 0x01.
pub fn shl(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    let vx = machine.v[op.x()];
    machine.v[FLAG_REGISTER] = (vx & 0x80) >> 4;
    machine.v[op.x()] = vx << 1;
    Ok(Flow::Next)
}

/// if Vx != Vy then pc += 2
pub fn skrne(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    Ok(Flow::skip_if(machine.v[op.x()] != machine.v[op.y()]))
}

/// I = addr
pub fn loadi(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    machine.i = op.addr();
    Ok(Flow::Next)
}

/// Vx = rand_byte & kk
pub fn rand(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    let rand_byte: u8 = rand::random();
    machine.v[op.x()] = rand_byte & op.kk();
    Ok(Flow::Next)
}

/// draw_sprite(x=Vx y=Vy size=n)
/// Copies the sprite in memory I..I+n onto the FrameBuffer at (Vx, Vy).
///
/// Each sprite byte is a row and each bit a pixel, most significant bit leftmost. Pixels are
/// overwritten rather than XORed, VF is left alone, and nothing wraps: a sprite that doesn't fit
/// on the display is an error and leaves the FrameBuffer untouched.
pub fn draw(
    op: Opcode,
    machine: &mut Machine,
    frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    let rows = usize::from(op.n());
    if rows == 0 {
        return Ok(Flow::Next);
    }
    let x = usize::from(machine.v[op.x()]);
    let y = usize::from(machine.v[op.y()]);
    let sprite = machine.memory.slice(machine.i, rows)?;

    // the opposite corner is in bounds only if every pixel is
    frame.check(x + 7, y + rows - 1)?;

    for (row, byte) in sprite.iter().enumerate() {
        for bit in 0..8 {
            let lit = (byte >> (7 - bit)) & 1 == 1;
            frame.set(x + bit, y + row, lit)?;
        }
    }
    Ok(Flow::Next)
}

/// The bit for the key named by Vx
fn key_bit(machine: &Machine, op: Opcode) -> Result<u16, Chip8Error> {
    let key = machine.v[op.x()];
    if key > 0xF {
        return Err(Chip8Error::InvalidKey { key });
    }
    Ok(1 << key)
}

/// if Vx.pressed then pc += 2
pub fn skpr(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    held_keys: u16,
) -> Result<Flow, Chip8Error> {
    let bit = key_bit(machine, op)?;
    Ok(Flow::skip_if(held_keys & bit != 0))
}

/// if !Vx.pressed then pc += 2
pub fn skup(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    held_keys: u16,
) -> Result<Flow, Chip8Error> {
    let bit = key_bit(machine, op)?;
    Ok(Flow::skip_if(held_keys & bit == 0))
}

/// Vx = DT
pub fn moved(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    machine.v[op.x()] = machine.timers.delay;
    Ok(Flow::Next)
}

/// await keypress for Vx
pub fn keyd(
    op: Opcode,
    _machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    Ok(Flow::AwaitKey(op.x()))
}

/// DT = Vx
pub fn loads(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    machine.timers.delay = machine.v[op.x()];
    Ok(Flow::Next)
}

/// ST = Vx
pub fn ld(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    machine.timers.sound = machine.v[op.x()];
    Ok(Flow::Next)
}

/// I += Vx
pub fn addi(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    let i = usize::from(machine.i) + usize::from(machine.v[op.x()]);
    if i >= MEMORY_SIZE {
        return Err(Chip8Error::MemoryOutOfBounds { address: i });
    }
    machine.i = i as u16;
    Ok(Flow::Next)
}

/// I = (Vx & 0xF) * 5
/// Set I to the memory address of the sprite for the digit in Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    machine.i = u16::from(machine.v[op.x()] & 0xF) * GLYPH_HEIGHT;
    Ok(Flow::Next)
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    let vx = machine.v[op.x()];
    let bcd = [vx / 100 % 10, vx / 10 % 10, vx % 10];
    machine
        .memory
        .slice_mut(machine.i, bcd.len())?
        .copy_from_slice(&bcd);
    Ok(Flow::Next)
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    let count = op.x() + 1;
    machine
        .memory
        .slice_mut(machine.i, count)?
        .copy_from_slice(&machine.v[..count]);
    Ok(Flow::Next)
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(
    op: Opcode,
    machine: &mut Machine,
    _frame: &mut FrameBuffer,
    _held_keys: u16,
) -> Result<Flow, Chip8Error> {
    let count = op.x() + 1;
    let bytes = machine.memory.slice(machine.i, count)?;
    machine.v[..count].copy_from_slice(bytes);
    Ok(Flow::Next)
}
