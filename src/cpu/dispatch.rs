// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Routes instruction words to [Insn]s by successively narrower masks
//!
//! The top nibble picks a [Tier]. The word, masked by that tier, is then
//! looked up in a single closed table. Anything the table doesn't name
//! is an [Error::UnimplementedInstruction].

use super::instruction::Insn;
use crate::error::{Error, Result};

/// The part of an instruction word which selects its [Insn]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    /// `F000`: the top nibble alone
    Class,
    /// `FFFF`: the whole word
    Word,
    /// `F00F`: the top and bottom nibbles
    Nibble,
    /// `F0FF`: the top nibble and bottom byte
    Byte,
}

impl Tier {
    /// Picks the tier which decodes `word`
    /// # Examples
    /// ```rust
    ///# use chip8emu::*;
    /// assert_eq!(Tier::Word, Tier::of(0x00e0));
    /// assert_eq!(Tier::Class, Tier::of(0x1234));
    /// assert_eq!(Tier::Nibble, Tier::of(0x8124));
    /// assert_eq!(Tier::Byte, Tier::of(0xf165));
    /// ```
    pub const fn of(word: u16) -> Tier {
        match word >> 12 {
            0x0 => Tier::Word,
            0x5 | 0x8 | 0x9 => Tier::Nibble,
            0xe | 0xf => Tier::Byte,
            _ => Tier::Class,
        }
    }

    /// Gets the bit mask of this tier
    pub const fn mask(self) -> u16 {
        match self {
            Tier::Class => 0xf000,
            Tier::Word => 0xffff,
            Tier::Nibble => 0xf00f,
            Tier::Byte => 0xf0ff,
        }
    }
}

/// Decodes a single instruction word
/// # Examples
/// ```rust
///# use chip8emu::*;
/// assert_eq!(Insn::jmp { A: 0x234 }, decode(0x1234).unwrap());
/// assert_eq!(Insn::add { x: 1, y: 2 }, decode(0x8124).unwrap());
/// assert!(decode(0xffff).is_err());
/// ```
#[rustfmt::skip]
pub fn decode(word: u16) -> Result<Insn> {
    let x = (word >> 8 & 0xf) as usize;
    let y = (word >> 4 & 0xf) as usize;
    let (a, b, n) = (word & 0xfff, word as u8, (word & 0xf) as u8);

    Ok(match word & Tier::of(word).mask() {
        0x00e0 => Insn::cls,
        0x00ee => Insn::ret,
        0x1000 => Insn::jmp   { A: a },
        0x2000 => Insn::call  { A: a },
        0x3000 => Insn::seb   { x, B: b },
        0x4000 => Insn::sneb  { x, B: b },
        0x5000 => Insn::se    { x, y },
        0x6000 => Insn::movb  { x, B: b },
        0x7000 => Insn::addb  { x, B: b },
        0x8000 => Insn::mov   { x, y },
        0x8001 => Insn::or    { x, y },
        0x8002 => Insn::and   { x, y },
        0x8003 => Insn::xor   { x, y },
        0x8004 => Insn::add   { x, y },
        0x8005 => Insn::sub   { x, y },
        0x8006 => Insn::shr   { x, y },
        0x8007 => Insn::bsub  { x, y },
        0x800e => Insn::shl   { x, y },
        0x9000 => Insn::sne   { x, y },
        0xa000 => Insn::movi  { A: a },
        0xb000 => Insn::jmpr  { A: a },
        0xc000 => Insn::rand  { x, B: b },
        0xd000 => Insn::draw  { x, y, n },
        0xe09e => Insn::sek   { x },
        0xe0a1 => Insn::snek  { x },
        0xf007 => Insn::getdt { x },
        0xf00a => Insn::waitk { x },
        0xf015 => Insn::setdt { x },
        0xf018 => Insn::setst { x },
        0xf01e => Insn::addi  { x },
        0xf029 => Insn::font  { x },
        0xf033 => Insn::bcd   { x },
        0xf055 => Insn::dmao  { x },
        0xf065 => Insn::dmai  { x },
        _ => return Err(Error::UnimplementedInstruction { word }),
    })
}

impl TryFrom<u16> for Insn {
    type Error = Error;
    fn try_from(word: u16) -> Result<Self> {
        decode(word)
    }
}
