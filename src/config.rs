// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Run-time settings for the interpreter and its front-ends

use crate::error::Error;
use std::{fmt::Display, str::FromStr};

/// Rate at which frames are emitted and timers tick, in Hz
pub const FRAME_RATE: u32 = 60;

/// A 24-bit color, stored as `0x00RRGGBB`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb(pub u32);

impl FromStr for Rgb {
    type Err = Error;

    /// Parses exactly six hex digits, like `ffcc01`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || Error::InvalidColor {
            color: s.to_string(),
        };
        if s.len() != 6 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        u32::from_str_radix(s, 16).map(Rgb).map_err(|_| err())
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06x}", self.0)
    }
}

impl From<Rgb> for u32 {
    fn from(value: Rgb) -> Self {
        value.0
    }
}

/// Settings for an interpreter run
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Requested instructions per second
    pub speed: u32,
    /// Keep a history of executed instructions, with explanations
    pub explain: bool,
    /// Number of instructions kept in the history
    pub history: usize,
    /// Print each instruction as it's executed
    pub debug: bool,
    /// Start paused
    pub pause: bool,
    /// Size of one Chip-8 pixel on the host screen
    pub scale: usize,
    /// Color of lit pixels
    pub fg: Rgb,
    /// Color of unlit pixels
    pub bg: Rgb,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            speed: 840,
            explain: false,
            history: 3,
            debug: false,
            pause: false,
            scale: 16,
            fg: Rgb(0xffcc01),
            bg: Rgb(0x996700),
        }
    }
}

impl Config {
    /// Instructions run per frame. Never less than one.
    /// # Examples
    /// ```rust
    ///# use chip8emu::*;
    /// let config = Config { speed: 840, ..Default::default() };
    /// assert_eq!(14, config.instructions_per_frame());
    /// let config = Config { speed: 10, ..Default::default() };
    /// assert_eq!(1, config.instructions_per_frame());
    /// ```
    pub fn instructions_per_frame(&self) -> usize {
        if self.speed >= FRAME_RATE {
            (self.speed / FRAME_RATE) as usize
        } else {
            1
        }
    }

    /// Frames per second. Programs slower than one instruction per frame
    /// get fewer frames instead.
    pub fn frame_rate(&self) -> u32 {
        self.speed.clamp(1, FRAME_RATE)
    }
}
