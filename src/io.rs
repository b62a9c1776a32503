// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The interpreter's view of its input device: the 16-key logical keypad.
//!
//! The CPU never sees physical keys. Front-ends translate their input into
//! logical keys `0x0..=0xF` and hand the CPU something implementing [Keypad].

use crate::error::{Error, Result};

/// Number of keys on the logical keypad
pub const KEYS: usize = 16;

/// Read-only key state, as queried by the CPU
pub trait Keypad {
    /// Is logical key `key` currently held?
    ///
    /// The CPU only ever asks about keys `0x0..=0xF`.
    fn is_held(&self, key: u8) -> bool;
    /// The lowest-indexed key which was freshly pressed, if any
    fn freshly_pressed(&self) -> Option<u8>;
}

/// Key state tracked from press and release events
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Keys {
    held: [bool; KEYS],
    fresh: [bool; KEYS],
}

impl Keys {
    /// Constructs a keypad with no keys held
    pub fn new() -> Self {
        Self::default()
    }

    /// Presses a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use chip8emu::*;
    /// let mut keys = Keys::new();
    ///
    /// // press key `7`
    /// let did_press = keys.press(0x7).unwrap();
    /// assert!(did_press);
    ///
    /// // press key `7` again, even though it's already pressed
    /// let did_press = keys.press(0x7).unwrap();
    /// // it was already pressed, so nothing's changed.
    /// assert!(!did_press);
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        let held = self.held.get_mut(key).ok_or(Error::InvalidKey { key })?;
        if *held {
            return Ok(false);
        }
        *held = true;
        self.fresh[key] = true;
        Ok(true)
    }

    /// Releases a key, and reports whether the key's state changed.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKey].
    /// # Examples
    /// ```rust
    /// # use chip8emu::*;
    /// let mut keys = Keys::new();
    /// keys.press(0x7).unwrap();
    /// assert!(keys.release(0x7).unwrap()); // key released
    /// assert!(!keys.release(0x7).unwrap()); // key was not held
    /// ```
    pub fn release(&mut self, key: usize) -> Result<bool> {
        let held = self.held.get_mut(key).ok_or(Error::InvalidKey { key })?;
        Ok(std::mem::replace(held, false))
    }

    /// Releases every key
    pub fn release_all(&mut self) {
        self.held = [false; KEYS];
    }

    /// Forgets which keys were freshly pressed. Call once per frame,
    /// after the CPU has had its chance to see them.
    pub fn settle(&mut self) {
        self.fresh = [false; KEYS];
    }

    /// Gets the held state of every key
    pub fn held(&self) -> &[bool; KEYS] {
        &self.held
    }
}

impl Keypad for Keys {
    fn is_held(&self, key: u8) -> bool {
        self.held.get(key as usize).copied().unwrap_or_default()
    }

    fn freshly_pressed(&self) -> Option<u8> {
        self.fresh.iter().position(|&fresh| fresh).map(|key| key as u8)
    }
}
