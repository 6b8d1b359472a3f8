use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, error, info, trace};

use crate::config::Config;
use crate::error::Chip8Error;
use crate::frame::FrameBuffer;
use crate::instruction::from_op;
use crate::keypad::{lowest_key, Keypad};
use crate::operations::Flow;
use crate::state::Machine;

/// Where the scheduler is in its lifecycle
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// Dispatch is suspended until a key is pressed, which is then stored in `register`
    AwaitingInput { register: usize },
    Stopped,
}

/// What a single tick did
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Instructions dispatched
    pub executed: u32,
    /// Cycle units spent out of the tick's budget
    pub cycles_used: u32,
}

/// Something that can present a FrameBuffer, once per tick
pub trait Renderer {
    type Error;

    fn render(&mut self, frame: &FrameBuffer) -> Result<(), Self::Error>;
}

/// Stops a `Chip8` from any thread.
/// The scheduler notices between instructions and between ticks.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - the `machine` registers, memory and timers
///  - the `frame` being drawn into
///  - the shared `keypad`, written by whoever handles key events
///
/// Supplies interfaces for:
/// - loading programs
/// - advancing the machine one tick at a time
/// - stopping it
/// - presenting its frame buffer with some renderer
///
/// Each tick spends a budget of cycles on instructions, then decrements both timers and forgets
/// the keys pressed during the tick. Pacing ticks against the wall clock is up to the host,
/// see `clock::Pacer`.
pub struct Chip8 {
    config: Config,
    machine: Machine,
    frame: FrameBuffer,
    keypad: Arc<Keypad>,
    awaiting_key: Option<usize>,
    program_loaded: bool,
    stop: StopHandle,
}

impl Chip8 {
    pub fn new(keypad: Arc<Keypad>) -> Self {
        let config = Config::default();
        Chip8 {
            config,
            machine: Machine::new(),
            frame: FrameBuffer::new(config.display_width, config.display_height),
            keypad,
            awaiting_key: None,
            program_loaded: false,
            stop: StopHandle::default(),
        }
    }

    pub fn with_config(config: Config, keypad: Arc<Keypad>) -> Result<Self, Chip8Error> {
        config.validate()?;
        Ok(Chip8 {
            config,
            frame: FrameBuffer::new(config.display_width, config.display_height),
            ..Chip8::new(keypad)
        })
    }

    /// Return every part of the machine to its power-on state
    pub fn reset(&mut self) {
        self.machine.reset();
        self.frame.clear();
        self.keypad.reset();
        self.awaiting_key = None;
        self.program_loaded = false;
        self.stop.clear();
    }

    /// Load a program image from a reader
    ///
    /// # Arguments
    /// * `reader` a reader over a raw program image
    pub fn load_program(&mut self, reader: &mut dyn Read) -> Result<(), Chip8Error> {
        if self.program_loaded {
            return Err(Chip8Error::ProgramAlreadyLoaded);
        }
        let size = self.machine.load_program(reader)?;
        self.program_loaded = true;
        info!("loaded program of {} bytes", size);
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn run_state(&self) -> RunState {
        if self.stop.is_stopped() {
            RunState::Stopped
        } else if let Some(register) = self.awaiting_key {
            RunState::AwaitingInput { register }
        } else {
            RunState::Running
        }
    }

    pub fn stop(&self) {
        debug!("stopping at pc {:04X}", self.machine.pc);
        self.stop.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Hands the FrameBuffer to a renderer
    pub fn present<R: Renderer>(&self, renderer: &mut R) -> Result<(), R::Error> {
        renderer.render(&self.frame)
    }

    /// Advances the machine by one tick
    /// - does nothing once stopped
    /// - dispatches instructions until the cycle budget runs out, the machine stops, or it is
    ///   awaiting a key that hasn't been pressed
    /// - decrements both timers and forgets the keys pressed this tick
    ///
    /// Any error stops the machine.
    pub fn tick(&mut self) -> Result<TickReport, Chip8Error> {
        let mut report = TickReport::default();
        if self.stop.is_stopped() {
            return Ok(report);
        }

        let observed = self.keypad.pressed_mask();
        let mut unclaimed = observed;
        let cost = self.config.cycles_per_instruction;
        let mut budget = self.config.cycles_per_tick;

        while budget >= cost {
            if let Some(register) = self.awaiting_key {
                match lowest_key(unclaimed) {
                    Some(key) => {
                        debug!("key {:X} stored in v{:X}", key, register);
                        self.machine.v[register] = key;
                        unclaimed &= !(1 << key);
                        self.awaiting_key = None;
                    }
                    None => break,
                }
            }

            if let Err(e) = self.step() {
                error!("halting at pc {:04X}: {}", self.machine.pc, e);
                self.stop.stop();
                return Err(e);
            }
            budget -= cost;
            report.executed += 1;
            report.cycles_used += cost;

            if self.stop.is_stopped() {
                break;
            }
        }

        self.machine.timers.decay(self.config.timer_decay);
        self.keypad.clear_pressed(observed);
        Ok(report)
    }

    /// Fetches, decodes and executes the instruction at the pc, then moves the pc along
    fn step(&mut self) -> Result<(), Chip8Error> {
        let op = self.machine.fetch()?;
        trace!(
            "{} v{:02X?} i{:04X} pc{:04X}",
            op,
            self.machine.v,
            self.machine.i,
            self.machine.pc
        );
        let operation = from_op(op)?;
        let flow = operation(op, &mut self.machine, &mut self.frame, self.keypad.held_mask())?;

        let pc = self.machine.pc;
        self.machine.pc = match flow {
            Flow::Next => pc.wrapping_add(2),
            Flow::Skip => pc.wrapping_add(4),
            Flow::Jump(addr) => addr,
            Flow::AwaitKey(register) => {
                debug!("v{:X} awaiting a key press", register);
                self.awaiting_key = Some(register);
                pc.wrapping_add(2)
            }
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimerDecay;

    fn chip8_with(program: &[u8]) -> (Chip8, Arc<Keypad>) {
        let keypad = Arc::new(Keypad::new());
        let mut chip8 = Chip8::new(Arc::clone(&keypad));
        let mut reader = program;
        chip8.load_program(&mut reader).unwrap();
        (chip8, keypad)
    }

    /// A program that jumps to itself forever
    const SPIN: [u8; 2] = [0x12, 0x00];

    #[derive(Default)]
    struct Recorder {
        frames: Vec<usize>,
    }

    impl Renderer for Recorder {
        type Error = ();

        fn render(&mut self, frame: &FrameBuffer) -> Result<(), ()> {
            self.frames.push(frame.lit());
            Ok(())
        }
    }

    #[test]
    fn test_tick_runs_four_instructions() {
        let (mut chip8, _) = chip8_with(&[
            0x60, 0x01, // v0 = 1
            0x70, 0x01, // v0 += 1
            0x70, 0x01, // v0 += 1
            0x70, 0x01, // v0 += 1
            0x70, 0x01, // v0 += 1
        ]);
        let report = chip8.tick().unwrap();
        assert_eq!(
            report,
            TickReport {
                executed: 4,
                cycles_used: 8
            }
        );
        assert_eq!(chip8.machine.v[0x0], 0x4);
        assert_eq!(chip8.machine.pc, 0x208);
    }

    #[test]
    fn test_custom_budget() {
        let keypad = Arc::new(Keypad::new());
        let config = Config {
            cycles_per_tick: 20,
            ..Config::default()
        };
        let mut chip8 = Chip8::with_config(config, keypad).unwrap();
        chip8.load_program(&mut &SPIN[..]).unwrap();
        assert_eq!(chip8.tick().unwrap().executed, 10);
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = Config {
            cycles_per_instruction: 0,
            ..Config::default()
        };
        assert!(Chip8::with_config(config, Arc::new(Keypad::new())).is_err());
    }

    #[test]
    fn test_jump_is_absolute() {
        let (mut chip8, _) = chip8_with(&[0x12, 0x06, 0x00, 0x00, 0x00, 0x00, 0x12, 0x06]);
        chip8.tick().unwrap();
        assert_eq!(chip8.machine.pc, 0x206);
    }

    #[test]
    fn test_skip_advances_four() {
        let (mut chip8, _) = chip8_with(&[0x30, 0x00]);
        chip8.step().unwrap();
        assert_eq!(chip8.machine.pc, 0x204);
    }

    #[test]
    fn test_no_skip_advances_two() {
        let (mut chip8, _) = chip8_with(&[0x30, 0x01]);
        chip8.step().unwrap();
        assert_eq!(chip8.machine.pc, 0x202);
    }

    #[test]
    fn test_timers_decay_once_per_tick() {
        let (mut chip8, _) = chip8_with(&SPIN);
        chip8.machine.timers.delay = 10;
        chip8.machine.timers.sound = 3;
        for _ in 0..3 {
            chip8.tick().unwrap();
        }
        assert_eq!(chip8.machine.timers.delay, 7);
        assert_eq!(chip8.machine.timers.sound, 0);
    }

    #[test]
    fn test_timers_wrap_by_default() {
        let (mut chip8, _) = chip8_with(&SPIN);
        chip8.tick().unwrap();
        assert_eq!(chip8.machine.timers.delay, 0xFF);
        assert_eq!(chip8.machine.timers.sound, 0xFF);
    }

    #[test]
    fn test_timers_can_saturate() {
        let config = Config {
            timer_decay: TimerDecay::Saturating,
            ..Config::default()
        };
        let mut chip8 = Chip8::with_config(config, Arc::new(Keypad::new())).unwrap();
        chip8.load_program(&mut &SPIN[..]).unwrap();
        chip8.machine.timers.delay = 1;
        chip8.tick().unwrap();
        chip8.tick().unwrap();
        assert_eq!(chip8.machine.timers.delay, 0);
        assert_eq!(chip8.machine.timers.sound, 0);
    }

    #[test]
    fn test_set_delay_then_read_it_back() {
        let (mut chip8, _) = chip8_with(&[
            0x60, 0x05, // v0 = 5
            0xF0, 0x15, // DT = v0
            0x12, 0x04, // spin
        ]);
        chip8.tick().unwrap();
        assert_eq!(chip8.machine.timers.delay, 4);
        chip8.tick().unwrap();
        assert_eq!(chip8.machine.timers.delay, 3);
    }

    #[test]
    fn test_awaits_key_press() {
        let (mut chip8, keypad) = chip8_with(&[
            0xF3, 0x0A, // v3 = await key
            0x61, 0x01, // v1 = 1
            0x12, 0x04, // spin
        ]);
        let report = chip8.tick().unwrap();
        assert_eq!(report.executed, 1);
        assert_eq!(chip8.run_state(), RunState::AwaitingInput { register: 0x3 });
        assert_eq!(chip8.machine.pc, 0x202);

        // nothing is dispatched while waiting, but timers keep running
        chip8.machine.timers.delay = 5;
        assert_eq!(chip8.tick().unwrap(), TickReport::default());
        assert_eq!(chip8.machine.timers.delay, 4);
        assert_eq!(chip8.machine.pc, 0x202);

        keypad.press(0x9).unwrap();
        keypad.press(0x4).unwrap();
        let report = chip8.tick().unwrap();
        assert_eq!(report.executed, 4);
        assert_eq!(chip8.run_state(), RunState::Running);
        assert_eq!(chip8.machine.v[0x3], 0x4);
        assert_eq!(chip8.machine.v[0x1], 0x1);
        assert_eq!(keypad.pressed_mask(), 0);
        assert_eq!(keypad.held_mask(), (1 << 0x9) | (1 << 0x4));
    }

    #[test]
    fn test_one_press_satisfies_one_wait() {
        let (mut chip8, keypad) = chip8_with(&[
            0xF1, 0x0A, // v1 = await key
            0xF2, 0x0A, // v2 = await key
            0x12, 0x04, // spin
        ]);
        chip8.tick().unwrap();
        keypad.press(0x7).unwrap();
        let report = chip8.tick().unwrap();
        assert_eq!(report.executed, 1);
        assert_eq!(chip8.machine.v[0x1], 0x7);
        assert_eq!(chip8.run_state(), RunState::AwaitingInput { register: 0x2 });
    }

    #[test]
    fn test_held_key_is_not_a_new_press() {
        let (mut chip8, keypad) = chip8_with(&[
            0x60, 0x00, // v0 = 0
            0x60, 0x00, // v0 = 0
            0x60, 0x00, // v0 = 0
            0x60, 0x00, // v0 = 0
            0xF1, 0x0A, // v1 = await key
            0x12, 0x0A, // spin
        ]);
        keypad.press(0x2).unwrap();
        chip8.tick().unwrap();
        // the press is forgotten at the end of the tick it happened in
        assert_eq!(keypad.pressed_mask(), 0);
        chip8.tick().unwrap();
        assert_eq!(chip8.run_state(), RunState::AwaitingInput { register: 0x1 });
        keypad.press(0x2).unwrap();
        chip8.tick().unwrap();
        assert_eq!(chip8.run_state(), RunState::AwaitingInput { register: 0x1 });
        keypad.release(0x2).unwrap();
        keypad.press(0x2).unwrap();
        chip8.tick().unwrap();
        assert_eq!(chip8.run_state(), RunState::Running);
        assert_eq!(chip8.machine.v[0x1], 0x2);
    }

    #[test]
    fn test_skip_on_held_key() {
        let (mut chip8, keypad) = chip8_with(&[
            0x60, 0x05, // v0 = 5
            0xE0, 0x9E, // skip if key 5 held
        ]);
        keypad.press(0x5).unwrap();
        chip8.step().unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.machine.pc, 0x206);
    }

    #[test]
    fn test_unimplemented_stops() {
        let (mut chip8, _) = chip8_with(&[0x60, 0x01, 0x00, 0xE0, 0x60, 0x02]);
        assert!(matches!(
            chip8.tick(),
            Err(Chip8Error::Unimplemented { opcode: 0x00E0 })
        ));
        assert_eq!(chip8.run_state(), RunState::Stopped);
        assert_eq!(chip8.machine.v[0x0], 0x1);
        // stopped machines neither dispatch nor decay timers
        assert_eq!(chip8.tick().unwrap(), TickReport::default());
        assert_eq!(chip8.machine.timers.delay, 0);
    }

    #[test]
    fn test_stop_from_handle() {
        let (mut chip8, _) = chip8_with(&SPIN);
        let handle = chip8.stop_handle();
        std::thread::spawn(move || handle.stop()).join().unwrap();
        assert_eq!(chip8.run_state(), RunState::Stopped);
        assert_eq!(chip8.tick().unwrap().executed, 0);
    }

    #[test]
    fn test_draw_then_present() {
        let (mut chip8, _) = chip8_with(&[
            0xA3, 0x00, // I = 0x300
            0xD0, 0x01, // draw 1 row at (v0, v0)
            0x12, 0x04, // spin
        ]);
        chip8.machine.memory.write(0x300, 0x80).unwrap();
        chip8.tick().unwrap();
        assert!(chip8.frame().get(0, 0).unwrap());
        assert!((1..64).all(|x| !chip8.frame().get(x, 0).unwrap()));

        let mut recorder = Recorder::default();
        chip8.present(&mut recorder).unwrap();
        assert_eq!(recorder.frames, vec![1]);
    }

    #[test]
    fn test_program_loads_once() {
        let (mut chip8, _) = chip8_with(&SPIN);
        assert!(matches!(
            chip8.load_program(&mut &SPIN[..]),
            Err(Chip8Error::ProgramAlreadyLoaded)
        ));
        chip8.reset();
        assert!(chip8.load_program(&mut &SPIN[..]).is_ok());
    }

    #[test]
    fn test_reset() {
        let (mut chip8, keypad) = chip8_with(&[0xF1, 0x0A]);
        chip8.tick().unwrap();
        keypad.press(0x1).unwrap();
        chip8.frame.set(3, 3, true).unwrap();
        chip8.stop();
        chip8.reset();
        assert_eq!(chip8.run_state(), RunState::Running);
        assert_eq!(chip8.machine.pc, 0x200);
        assert_eq!(chip8.frame().lit(), 0);
        assert_eq!(keypad.pressed_mask(), 0);
        assert_eq!(chip8.machine.memory.read(0x200).unwrap(), 0);
    }

    #[test]
    fn test_running_off_the_end_of_memory() {
        let (mut chip8, _) = chip8_with(&[0x1F, 0xFE]);
        chip8.machine.memory.write(0xFFE, 0x60).unwrap();
        assert!(matches!(
            chip8.tick(),
            Err(Chip8Error::ProgramCounter { pc: 0x1000 })
        ));
    }
}
