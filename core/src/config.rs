use std::time::Duration;

use crate::constants::{
    CYCLES_PER_INSTRUCTION, CYCLES_PER_TICK, DISPLAY_HEIGHT, DISPLAY_WIDTH, TICK_RATE,
};
use crate::error::Chip8Error;

/// How the delay and sound timers behave when decremented at zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerDecay {
    /// Decrement unconditionally; 0 becomes 255.
    Wrapping,
    /// Stop at 0.
    Saturating,
}

impl TimerDecay {
    pub fn apply(self, value: u8) -> u8 {
        match self {
            TimerDecay::Wrapping => value.wrapping_sub(1),
            TimerDecay::Saturating => value.saturating_sub(1),
        }
    }
}

impl Default for TimerDecay {
    fn default() -> Self {
        TimerDecay::Wrapping
    }
}

/// # Config
/// Tunables for a `Chip8`.
///
/// The defaults describe the stock machine: a 64x32 display, ticks at 60Hz, and a budget of
/// 8 cycle units per tick where every instruction costs 2 (so at most 4 instructions per tick).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub display_width: usize,
    pub display_height: usize,
    pub cycles_per_tick: u32,
    pub cycles_per_instruction: u32,
    /// Ticks per second
    pub tick_rate: u32,
    pub timer_decay: TimerDecay,
}

impl Config {
    /// Wall-clock time between the start of two ticks
    pub fn tick_period(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.tick_rate.max(1)))
    }

    pub fn validate(&self) -> Result<(), Chip8Error> {
        if self.display_width == 0 || self.display_height == 0 {
            return Err(Chip8Error::InvalidConfig("display dimensions must be non-zero"));
        }
        if self.tick_rate == 0 {
            return Err(Chip8Error::InvalidConfig("tick rate must be non-zero"));
        }
        if self.cycles_per_instruction == 0 {
            return Err(Chip8Error::InvalidConfig(
                "instructions must cost at least one cycle",
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            display_width: DISPLAY_WIDTH,
            display_height: DISPLAY_HEIGHT,
            cycles_per_tick: CYCLES_PER_TICK,
            cycles_per_instruction: CYCLES_PER_INSTRUCTION,
            tick_rate: TICK_RATE,
            timer_decay: TimerDecay::default(),
        }
    }
}
