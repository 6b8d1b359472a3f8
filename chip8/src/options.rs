use std::path::PathBuf;

use chip8le_core::{Config, TimerDecay};
use color_eyre::eyre::{eyre, Result, WrapErr};
use log::LevelFilter;

pub const USAGE: &str =
    "usage: chip8le <program.ch8> [--scale N] [--saturating-timers] [--trace | --quiet]";

const DEFAULT_SCALE: u32 = 10;

/// Command line options
#[derive(Debug, PartialEq)]
pub struct Options {
    pub rom: PathBuf,
    /// Window pixels per machine pixel
    pub scale: u32,
    pub log_level: LevelFilter,
    pub timer_decay: TimerDecay,
}

impl Options {
    /// Parses arguments, not including the program name
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut rom = None;
        let mut scale = DEFAULT_SCALE;
        let mut log_level = LevelFilter::Info;
        let mut timer_decay = TimerDecay::default();

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--scale" => {
                    let value = args
                        .next()
                        .ok_or_else(|| eyre!("--scale needs a value\n{}", USAGE))?;
                    scale = value
                        .parse()
                        .wrap_err_with(|| format!("invalid scale {:?}", value))?;
                    if scale == 0 {
                        return Err(eyre!("scale must be at least 1"));
                    }
                }
                "--saturating-timers" => timer_decay = TimerDecay::Saturating,
                "--trace" => log_level = LevelFilter::Trace,
                "--quiet" => log_level = LevelFilter::Warn,
                flag if flag.starts_with("--") => {
                    return Err(eyre!("unknown option {}\n{}", flag, USAGE))
                }
                path if rom.is_none() => rom = Some(PathBuf::from(path)),
                extra => return Err(eyre!("unexpected argument {}\n{}", extra, USAGE)),
            }
        }

        Ok(Options {
            rom: rom.ok_or_else(|| eyre!("expected a program file path\n{}", USAGE))?,
            scale,
            log_level,
            timer_decay,
        })
    }

    pub fn config(&self) -> Config {
        Config {
            timer_decay: self.timer_decay,
            ..Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options> {
        Options::parse(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn test_rom_only() {
        let options = parse(&["games/breakout.ch8"]).unwrap();
        assert_eq!(
            options,
            Options {
                rom: PathBuf::from("games/breakout.ch8"),
                scale: 10,
                log_level: LevelFilter::Info,
                timer_decay: TimerDecay::Wrapping,
            }
        );
    }

    #[test]
    fn test_all_options() {
        let options = parse(&["--scale", "4", "--saturating-timers", "--trace", "a.ch8"]).unwrap();
        assert_eq!(options.scale, 4);
        assert_eq!(options.log_level, LevelFilter::Trace);
        assert_eq!(options.config().timer_decay, TimerDecay::Saturating);
        assert_eq!(options.rom, PathBuf::from("a.ch8"));
    }

    #[test]
    fn test_missing_rom() {
        assert!(parse(&["--quiet"]).is_err());
    }

    #[test]
    fn test_bad_scale() {
        assert!(parse(&["a.ch8", "--scale"]).is_err());
        assert!(parse(&["a.ch8", "--scale", "big"]).is_err());
        assert!(parse(&["a.ch8", "--scale", "0"]).is_err());
    }

    #[test]
    fn test_unknown_option() {
        assert!(parse(&["a.ch8", "--cpuprofile"]).is_err());
    }

    #[test]
    fn test_two_roms() {
        assert!(parse(&["a.ch8", "b.ch8"]).is_err());
    }
}
