use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use color_eyre::eyre::{eyre, Result, WrapErr};
use log::info;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use chip8le_core::clock::Pacer;
use chip8le_core::{Chip8, Keypad, RunState};
use chip8le_display::Display;

use crate::keymap::KeyBindings;
use crate::options::Options;

pub fn run(options: Options) -> Result<()> {
    let keypad = Arc::new(Keypad::new());
    let mut chip8 = Chip8::with_config(options.config(), Arc::clone(&keypad))?;

    // Load the program
    let file = File::open(&options.rom)
        .wrap_err_with(|| format!("unable to open {}", options.rom.display()))?;
    chip8.load_program(&mut BufReader::new(file))?;

    // Get SDL2 context
    let sdl = sdl2::init()
        .map_err(|e| eyre!(e))
        .wrap_err("failed to initialise SDL2")?;
    let config = *chip8.config();
    let mut display = Display::new(
        &sdl,
        config.display_width,
        config.display_height,
        options.scale,
    )?;
    let mut events = sdl.event_pump().map_err(|e| eyre!(e))?;
    let bindings = KeyBindings::default();

    let mut pacer = Pacer::new(config.tick_period());

    // Whether or not the tick rate should be respected
    let mut fast_forward = false;

    'event: loop {
        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, bindings.get(key)) {
                    (_, Some(kc)) => keypad.press(kc)?,
                    (Keycode::Space, _) => fast_forward = true,
                    (Keycode::Escape, _) => {
                        if chip8.run_state() != RunState::Stopped {
                            info!("stopped; close the window to exit");
                            chip8.stop();
                        }
                    }
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, bindings.get(key)) {
                    (_, Some(kc)) => keypad.release(kc)?,
                    (Keycode::Space, _) => fast_forward = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        // Update state, then show it even if the machine is stopped
        chip8.tick().wrap_err("emulation halted")?;
        chip8.present(&mut display)?;

        // Handle timing
        if fast_forward {
            pacer.resync();
        } else {
            pacer.wait();
        }
    }

    Ok(())
}
