// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! chip8emu: runs a Chip-8 program in a window

mod error;
mod ui;

use chip8emu::{Chip8, Config, Rgb};
use error::Result;
use gumdrop::*;
use log::LevelFilter;
use owo_colors::OwoColorize;
use simple_logger::SimpleLogger;
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};
use ui::*;

pub fn main() {
    let options = Arguments::parse_args_default_or_exit();
    if let Err(e) = run(options) {
        eprintln!("{}", e.bold().red());
        std::process::exit(1);
    }
}

fn run(options: Arguments) -> Result<()> {
    SimpleLogger::new()
        .with_level(options.level())
        .env()
        .init()?;
    for result in State::new(options)? {
        result?;
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, Options, Hash)]
struct Arguments {
    #[options(help = "Load a ROM to run.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Enable live disassembly at startup.")]
    pub debug: bool,
    #[options(help = "Enable pause mode at startup.")]
    pub pause: bool,
    #[options(help = "Show the most recent instruction in the title bar.")]
    pub explain: bool,

    #[options(help = "Set the speed, in instructions per second.", meta = "IPS")]
    pub speed: Option<u32>,
    #[options(short = "S", help = "Set the size of a Chip-8 pixel.", meta = "N")]
    pub scale: Option<usize>,
    #[options(help = "Set the color of lit pixels.", meta = "RRGGBB")]
    pub fg: Option<Rgb>,
    #[options(help = "Set the color of unlit pixels.", meta = "RRGGBB")]
    pub bg: Option<Rgb>,

    #[options(help = "Log more. Repeat for even more.", count)]
    pub verbose: u32,
}

impl Arguments {
    fn level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

impl From<&Arguments> for Config {
    fn from(options: &Arguments) -> Self {
        let default = Config::default();
        Config {
            speed: options.speed.unwrap_or(default.speed),
            explain: options.explain,
            debug: options.debug,
            pause: options.pause,
            scale: options.scale.unwrap_or(default.scale).max(1),
            fg: options.fg.unwrap_or(default.fg),
            bg: options.bg.unwrap_or(default.bg),
            ..default
        }
    }
}

#[derive(Debug)]
struct State {
    pub ch8: Chip8,
    pub ui: UI,
    pub rate: Duration,
    pub ft: Instant,
}

impl State {
    fn new(options: Arguments) -> Result<Self> {
        let config = Config::from(&options);
        let mut ch8 = Chip8::new(&config);
        ch8.cpu.load_program(&options.file)?;
        Ok(State {
            ch8,
            ui: UIBuilder::new(&config, &options.file).build()?,
            rate: Duration::from_secs_f64(1.0 / config.frame_rate() as f64),
            ft: Instant::now(),
        })
    }
    fn wait_for_next_frame(&mut self) {
        std::thread::sleep(self.rate.saturating_sub(self.ft.elapsed()));
        self.ft += self.rate;
    }
}

impl Iterator for State {
    type Item = Result<()>;

    /// Runs one frame: input, interpreter, then output
    fn next(&mut self) -> Option<Self::Item> {
        self.wait_for_next_frame();
        match self.ui.keys(&mut self.ch8) {
            Ok(false) => return None,
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        let tone = match self.ch8.frame() {
            Ok(tone) => tone,
            Err(e) => return Some(Err(e.into())),
        };
        match self.ui.frame(&self.ch8, tone) {
            Ok(false) => return None,
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        Some(Ok(()))
    }
}
