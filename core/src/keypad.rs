use std::sync::atomic::{AtomicU16, Ordering};

use crate::constants::KEY_COUNT;
use crate::error::Chip8Error;

/// # Keypad
/// Input is generated with a 16 key hexadecimal keypad, tracked as two bitmasks where bit `n`
/// stands for key `n`:
/// - `held` the keys currently depressed
/// - `pressed` the keys that went down since the scheduler last cleared them
///
/// Key events arrive from the host's event handler, which may run on another thread than the
/// scheduler, so both masks are atomics and the keypad is shared behind an `Arc`.
#[derive(Debug, Default)]
pub struct Keypad {
    held: AtomicU16,
    pressed: AtomicU16,
}

impl Keypad {
    pub fn new() -> Self {
        Keypad::default()
    }

    /// Mark `key` as held; it only counts as newly pressed if it was up before.
    pub fn press(&self, key: u8) -> Result<(), Chip8Error> {
        let bit = Keypad::bit(key)?;
        let previously_held = self.held.fetch_or(bit, Ordering::AcqRel);
        if previously_held & bit == 0 {
            self.pressed.fetch_or(bit, Ordering::AcqRel);
        }
        Ok(())
    }

    pub fn release(&self, key: u8) -> Result<(), Chip8Error> {
        let bit = Keypad::bit(key)?;
        self.held.fetch_and(!bit, Ordering::AcqRel);
        Ok(())
    }

    pub fn held_mask(&self) -> u16 {
        self.held.load(Ordering::Acquire)
    }

    pub fn pressed_mask(&self) -> u16 {
        self.pressed.load(Ordering::Acquire)
    }

    pub fn is_held(&self, key: u8) -> Result<bool, Chip8Error> {
        Ok(self.held_mask() & Keypad::bit(key)? != 0)
    }

    /// Forget the presses in `observed`.
    /// Presses that landed after `observed` was read stay pending.
    pub fn clear_pressed(&self, observed: u16) {
        self.pressed.fetch_and(!observed, Ordering::AcqRel);
    }

    /// Forget every press and release every key.
    pub fn reset(&self) {
        self.held.store(0, Ordering::Release);
        self.pressed.store(0, Ordering::Release);
    }

    fn bit(key: u8) -> Result<u16, Chip8Error> {
        if key < KEY_COUNT {
            Ok(1 << key)
        } else {
            Err(Chip8Error::InvalidKey { key })
        }
    }
}

/// The lowest key set in `mask`, if any
pub fn lowest_key(mask: u16) -> Option<u8> {
    if mask == 0 {
        None
    } else {
        Some(mask.trailing_zeros() as u8)
    }
}
