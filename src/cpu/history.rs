// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! A short memory of recently executed instructions

use std::{collections::VecDeque, fmt::Display};

/// One executed instruction
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Entry {
    /// Address the instruction was fetched from
    pub addr: u16,
    /// The raw instruction word
    pub word: u16,
    /// What the instruction did, in English
    pub description: String,
}

impl Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03x}: {:04x} {}", self.addr, self.word, self.description)
    }
}

/// A bounded ring of [Entry]s. Once full, the oldest entry is dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct History {
    capacity: usize,
    entries: VecDeque<Entry>,
}

impl History {
    /// Constructs an empty history which holds at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        History {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Records an entry, evicting the oldest if full
    /// # Examples
    /// ```rust
    ///# use chip8emu::*;
    /// let mut history = History::new(2);
    /// for addr in [0x200, 0x202, 0x204] {
    ///     history.record(addr, 0x00e0, "Clear the screen");
    /// }
    /// assert_eq!(2, history.len());
    /// assert_eq!(0x202, history.iter().next().unwrap().addr);
    /// assert_eq!(0x204, history.latest().unwrap().addr);
    /// ```
    pub fn record(&mut self, addr: u16, word: u16, description: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(Entry {
            addr,
            word,
            description: description.into(),
        });
    }

    /// The most recently recorded entry
    pub fn latest(&self) -> Option<&Entry> {
        self.entries.back()
    }

    /// Iterates from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.entries.iter()
    }

    /// Number of entries held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries held
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Forgets every entry
    pub fn clear(&mut self) {
        self.entries.clear()
    }
}

impl Display for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for entry in self.iter() {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}
