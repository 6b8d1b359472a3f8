pub use chip8::{Chip8, Renderer, RunState, StopHandle, TickReport};
pub use config::{Config, TimerDecay};
pub use error::Chip8Error;
pub use frame::FrameBuffer;
pub use keypad::Keypad;

mod chip8;
pub mod clock;
pub mod config;
pub mod constants;
mod error;
pub mod frame;
mod instruction;
pub mod keypad;
pub mod opcode;
pub mod operations;
pub mod state;
