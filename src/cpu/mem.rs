// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The Mem represents the CPU's memory
//!
//! Every access is bounds-checked. Nothing is clamped or wrapped: touching
//! an address past the end of memory is an [Error].

use crate::error::{Error, Result};
use std::{
    fmt::{Display, Formatter},
    ops::Range,
};

/// Total size of addressable memory, in bytes
pub const MEM_SIZE: usize = 0x1000;
/// Address the built-in character set is loaded at
pub const FONT_ADDR: usize = 0x000;
/// Address programs are loaded at, and where execution begins
pub const PROGRAM_ADDR: usize = 0x200;
/// Bytes per character in the built-in character set
pub const FONT_STRIDE: usize = 5;

/// The built-in hexadecimal character set, `0`..=`F`, 4x5 pixels each
pub const CHARSET: &[u8; 0x50] = include_bytes!("mem/charset.bin");

/// Represents a named region in memory
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    /// Character ROM (but writable!)
    Charset,
    /// Program memory
    Program,
}

impl Region {
    /// Gets the range of addresses covered by this [Region]
    pub const fn range(self) -> Range<usize> {
        match self {
            Region::Charset => FONT_ADDR..FONT_ADDR + 0x50,
            Region::Program => PROGRAM_ADDR..MEM_SIZE,
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Region::Charset => "Charset",
                Region::Program => "Program",
            }
        )
    }
}

/// Flat, bounds-checked, byte-addressed memory
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Mem {
    memory: Vec<u8>,
}

impl Default for Mem {
    /// Zeroed memory with the character set loaded at [FONT_ADDR]
    fn default() -> Self {
        let mut mem = Mem::zeroed();
        mem.memory[Region::Charset.range()].copy_from_slice(CHARSET);
        mem
    }
}

impl Mem {
    /// Constructs a new [Mem], with the character set loaded
    /// # Examples
    /// ```rust
    ///# use chip8emu::*;
    /// let mem = Mem::new();
    /// assert_eq!(0xf0, mem.read(0).unwrap());
    /// assert_eq!(0x00, mem.read(0x200).unwrap());
    /// ```
    pub fn new() -> Self {
        Mem::default()
    }

    /// Constructs a [Mem] of all zeroes, without the character set
    pub fn zeroed() -> Self {
        Mem {
            memory: vec![0; MEM_SIZE],
        }
    }

    /// Gets the length of the backing memory
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Returns true if the backing memory contains no elements
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Reads the byte at `addr`
    ///
    /// Returns [Error::InvalidAddress] if `addr` is outside of memory
    #[inline(always)]
    pub fn read(&self, addr: usize) -> Result<u8> {
        self.memory
            .get(addr)
            .copied()
            .ok_or(Error::InvalidAddress { addr })
    }

    /// Writes `data` to the byte at `addr`
    ///
    /// Returns [Error::InvalidAddress] if `addr` is outside of memory
    /// # Examples
    /// ```rust
    ///# use chip8emu::*;
    ///# fn main() -> Result<()> {
    ///     let mut mem = Mem::new();
    ///     mem.write(0x234, 0x56)?;
    ///     assert_eq!(0x56, mem.read(0x234)?);
    ///     assert!(mem.write(0x1000, 0x56).is_err());
    ///#    Ok(())
    ///# }
    /// ```
    #[inline(always)]
    pub fn write(&mut self, addr: usize, data: u8) -> Result<()> {
        let byte = self
            .memory
            .get_mut(addr)
            .ok_or(Error::InvalidAddress { addr })?;
        *byte = data;
        Ok(())
    }

    /// Fetches the big-endian instruction word at `addr`
    ///
    /// Needs two bytes, so `addr` must be below `0xfff`.
    /// Otherwise, returns [Error::InvalidAddressRange]
    #[inline(always)]
    pub fn fetch(&self, addr: usize) -> Result<u16> {
        let range = addr..addr.saturating_add(2);
        match self.memory.get(range.clone()) {
            // Chip-8 is a big-endian system
            Some(&[hi, lo]) => Ok(u16::from_be_bytes([hi, lo])),
            _ => Err(Error::InvalidAddressRange { range }),
        }
    }

    /// Gets a slice of memory, if the whole range is in bounds
    #[inline(always)]
    pub fn grab(&self, range: Range<usize>) -> Result<&[u8]> {
        self.memory
            .get(range.clone())
            .ok_or(Error::InvalidAddressRange { range })
    }

    /// Gets a mutable slice of memory, if the whole range is in bounds
    #[inline(always)]
    pub fn grab_mut(&mut self, range: Range<usize>) -> Result<&mut [u8]> {
        self.memory
            .get_mut(range.clone())
            .ok_or(Error::InvalidAddressRange { range })
    }

    /// Loads data into a named [Region], starting at the region's first byte
    ///
    /// Fails with [Error::RomTooLarge] without touching memory
    /// if `data` doesn't fit in the region.
    pub fn load_region(&mut self, name: Region, data: &[u8]) -> Result<&mut Self> {
        let range = name.range();
        if data.len() > range.len() {
            return Err(Error::RomTooLarge {
                len: data.len(),
                capacity: range.len(),
            });
        }
        for (addr, &byte) in (range.start..).zip(data) {
            self.write(addr, byte)?;
        }
        Ok(self)
    }

    /// Fills a [Region] with zeroes
    pub fn clear_region(&mut self, name: Region) -> &mut Self {
        self.memory[name.range()].fill(0);
        self
    }

    /// Gets a slice of a named [Region] of memory
    #[inline(always)]
    pub fn get_region(&self, name: Region) -> &[u8] {
        &self.memory[name.range()]
    }
}

#[cfg(feature = "rhexdump")]
impl Display for Mem {
    /// Hex-dumps memory in two-byte groups, folding repeated lines
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use rhexdump::Rhexdump;
        let mut rhx = Rhexdump::default();
        rhx.set_bytes_per_group(2).map_err(|_| std::fmt::Error)?;
        rhx.display_duplicate_lines(false);
        write!(f, "{}", rhx.hexdump(&self.memory))
    }
}

#[cfg(not(feature = "rhexdump"))]
impl Display for Mem {
    /// Hex-dumps memory, sixteen bytes per line, skipping all-zero lines
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (line, chunk) in self.memory.chunks(16).enumerate() {
            if chunk.iter().all(|&byte| byte == 0) {
                continue;
            }
            write!(f, "{:03x}:", line * 16)?;
            for byte in chunk {
                write!(f, " {byte:02x}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
