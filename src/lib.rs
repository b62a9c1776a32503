// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! This crate implements a Chip-8 interpreter as if it were a real CPU architecture.
//!
//! The [CPU] owns its memory, registers, stack, timers and [Screen].
//! A front-end drives it one [CPU::frame] at a time, handing it something
//! that implements [Keypad], then draws [CPU::screen] and plays (or stops)
//! the [Tone] the frame asked for.
//!
//! ```rust
//! use chip8emu::*;
//! # fn main() -> Result<()> {
//! let mut chip8 = Chip8::new(&Config::default());
//! chip8.cpu.load_program_bytes(&[
//!     0xa0, 0x05, // mov $005, I  (the '1' sprite)
//!     0xd0, 0x05, // draw #5, v0, v0
//!     0x12, 0x04, // jmp 204
//! ])?;
//! chip8.frame()?;
//! assert!(chip8.cpu.screen().pixel(2, 0));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod cpu;
pub mod error;
pub mod io;
pub mod screen;

pub use config::{Config, Rgb, FRAME_RATE};
pub use cpu::{
    dispatch::{decode, Tier},
    flags::{Flags, RunState},
    history::{Entry, History},
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    mem::*,
    Snapshot, Tone, CPU, STACK_DEPTH,
};
pub use error::{Error, Result};
pub use io::{Keypad, Keys, KEYS};
pub use screen::{Screen, HEIGHT, ROW_BYTES, WIDTH};

/// Holds the state of a Chip-8: the [CPU] and the [Keys] feeding it
#[derive(Clone, Debug, Default)]
pub struct Chip8 {
    /// The interpreter
    pub cpu: CPU,
    /// The logical keypad
    pub keys: Keys,
}

impl Chip8 {
    /// Constructs a Chip-8 with no program loaded and no keys held
    pub fn new(config: &Config) -> Self {
        Chip8 {
            cpu: CPU::new(config),
            keys: Keys::new(),
        }
    }

    /// Runs one frame, then forgets which keys were freshly pressed
    pub fn frame(&mut self) -> Result<Tone> {
        let tone = self.cpu.frame(&self.keys)?;
        self.keys.settle();
        Ok(tone)
    }

    /// Runs a single instruction, even while paused
    pub fn singlestep(&mut self) -> Result<&mut Self> {
        self.cpu.singlestep(&self.keys)?;
        self.keys.settle();
        Ok(self)
    }
}
