// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Represents flags that aid in implementation but aren't a part of the Chip-8 itself

use crate::config::Config;

/// Whether the CPU is running, or blocked on `Fx0A`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunState {
    /// Executing instructions normally
    #[default]
    Running,
    /// Waiting for a fresh keypress, which will be stored in `vX`
    AwaitingKey {
        /// Destination register
        x: usize,
    },
}

/// Represents flags that aid in operation, but aren't inherent to the CPU
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flags {
    /// Set when debug (live disassembly) mode enabled
    pub debug: bool,
    /// Set when the instruction history should be recorded
    pub explain: bool,
    /// Set when the emulator is paused by the user and should not update
    pub pause: bool,
    /// Instructions executed per frame
    pub ipf: usize,
    /// Running, or waiting on a keypress
    pub state: RunState,
}

impl Default for Flags {
    fn default() -> Self {
        Flags {
            debug: false,
            explain: false,
            pause: false,
            ipf: 14,
            state: RunState::Running,
        }
    }
}

impl From<&Config> for Flags {
    fn from(config: &Config) -> Self {
        Flags {
            debug: config.debug,
            explain: config.explain,
            pause: config.pause,
            ipf: config.instructions_per_frame(),
            state: RunState::Running,
        }
    }
}

impl Flags {
    /// Toggles debug mode
    ///
    /// # Examples
    /// ```rust
    /// # use chip8emu::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(false, cpu.flags.debug);
    /// // Toggle debug mode
    /// cpu.flags.debug();
    /// assert_eq!(true, cpu.flags.debug);
    /// ```
    pub fn debug(&mut self) {
        self.debug = !self.debug
    }

    /// Toggles pause
    ///
    /// # Examples
    /// ```rust
    /// # use chip8emu::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(false, cpu.flags.pause);
    /// // Pause the cpu
    /// cpu.flags.pause();
    /// assert_eq!(true, cpu.flags.pause);
    /// ```
    pub fn pause(&mut self) {
        self.pause = !self.pause
    }

    /// Is the CPU blocked on `Fx0A`?
    pub fn is_awaiting_key(&self) -> bool {
        matches!(self.state, RunState::AwaitingKey { .. })
    }
}
