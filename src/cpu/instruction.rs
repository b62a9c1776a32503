// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)
#![allow(clippy::bad_bit_mask)]
//! Contains the definition of a Chip-8 [Insn]

pub mod disassembler;

use imperative_rs::InstructionSet;
use std::fmt::Display;

/// A decoded Chip-8 instruction.
///
/// The `#[opcode]` patterns give a second, independent decoder
/// (via [InstructionSet]) which the mask-based dispatch in
/// [super::dispatch] is checked against.
///
/// Operand fields: `A` 12-bit address, `B` immediate byte,
/// `x`/`y` register indices, `n` immediate nibble.
#[allow(non_camel_case_types, non_snake_case, missing_docs)]
#[derive(Clone, Copy, Debug, InstructionSet, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Insn {
    /// | 00e0 | Clear screen memory to 0s
    #[opcode = "0x00e0"]
    cls,
    /// | 00ee | Return from subroutine
    #[opcode = "0x00ee"]
    ret,
    /// | 1aaa | Jumps to an absolute address
    #[opcode = "0x1AAA"]
    jmp { A: u16 },
    /// | 2aaa | Pushes pc onto the stack, then jumps to a
    #[opcode = "0x2AAA"]
    call { A: u16 },
    /// | 3xbb | Skips next instruction if register X == b
    #[opcode = "0x3xBB"]
    seb { B: u8, x: usize },
    /// | 4xbb | Skips next instruction if register X != b
    #[opcode = "0x4xBB"]
    sneb { B: u8, x: usize },
    /// | 5xy0 | Skips next instruction if vX == vY
    #[opcode = "0x5xy0"]
    se { y: usize, x: usize },
    /// | 6xbb | Loads immediate byte b into register vX
    #[opcode = "0x6xBB"]
    movb { B: u8, x: usize },
    /// | 7xbb | Adds immediate byte b to register vX, without touching vF
    #[opcode = "0x7xBB"]
    addb { B: u8, x: usize },
    /// | 8xy0 | Loads the value of vY into vX
    #[opcode = "0x8xy0"]
    mov { y: usize, x: usize },
    /// | 8xy1 | vX |= vY, clobbering vF
    #[opcode = "0x8xy1"]
    or { y: usize, x: usize },
    /// | 8xy2 | vX &= vY, clobbering vF
    #[opcode = "0x8xy2"]
    and { y: usize, x: usize },
    /// | 8xy3 | vX ^= vY, clobbering vF
    #[opcode = "0x8xy3"]
    xor { y: usize, x: usize },
    /// | 8xy4 | vX += vY, carry in vF
    #[opcode = "0x8xy4"]
    add { y: usize, x: usize },
    /// | 8xy5 | vX -= vY, not-borrow in vF
    #[opcode = "0x8xy5"]
    sub { y: usize, x: usize },
    /// | 8xy6 | vX = vY >> 1, shifted-out bit in vF
    #[opcode = "0x8xy6"]
    shr { y: usize, x: usize },
    /// | 8xy7 | vX = vY - vX, not-borrow in vF
    #[opcode = "0x8xy7"]
    bsub { y: usize, x: usize },
    /// | 8xyE | vX = vY << 1, shifted-out bit in vF
    #[opcode = "0x8xye"]
    shl { y: usize, x: usize },
    /// | 9xy0 | Skip next instruction if vX != vY
    #[opcode = "0x9xy0"]
    sne { y: usize, x: usize },
    /// | Aaaa | Load address #a into register I
    #[opcode = "0xaAAA"]
    movi { A: u16 },
    /// | Baaa | Jump to &adr + v0
    #[opcode = "0xbAAA"]
    jmpr { A: u16 },
    /// | Cxbb | Stores a random number & the provided byte into vX
    #[opcode = "0xcxBB"]
    rand { B: u8, x: usize },
    /// | Dxyn | Draws n-byte sprite to the screen at coordinates (vX, vY)
    #[opcode = "0xdxyn"]
    draw { y: usize, x: usize, n: u8 },
    /// | eX9e | Skip next instruction if key vX is held
    #[opcode = "0xex9e"]
    sek { x: usize },
    /// | eXa1 | Skip next instruction if key vX is not held
    #[opcode = "0xexa1"]
    snek { x: usize },
    /// | fX07 | Set vX to value in delay timer
    #[opcode = "0xfx07"]
    getdt { x: usize },
    /// | fX0a | Wait for input, store key in vX
    #[opcode = "0xfx0a"]
    waitk { x: usize },
    /// | fX15 | Set delay timer to the value in vX
    #[opcode = "0xfx15"]
    setdt { x: usize },
    /// | fX18 | Set sound timer to the value in vX
    #[opcode = "0xfx18"]
    setst { x: usize },
    /// | fX1e | Add vX to I
    #[opcode = "0xfx1e"]
    addi { x: usize },
    /// | fX29 | Load sprite for character vX into I
    #[opcode = "0xfx29"]
    font { x: usize },
    /// | fX33 | BCD convert vX into I[0..3]
    #[opcode = "0xfx33"]
    bcd { x: usize },
    /// | fX55 | DMA Stor from registers 0..=X to I
    #[opcode = "0xfx55"]
    dmao { x: usize },
    /// | fX65 | DMA Load from I to registers 0..=X
    #[opcode = "0xfx65"]
    dmai { x: usize },
}

impl Insn {
    /// Describes what the instruction does, in a sentence
    /// # Examples
    /// ```rust
    ///# use chip8emu::*;
    /// let insn = Insn::try_from(0x3412_u16).unwrap();
    /// assert_eq!("Skip next instruction if v4 == 0x12", insn.explain());
    /// ```
    pub fn explain(&self) -> String {
        match *self {
            Insn::cls => "Clear the screen".into(),
            Insn::ret => "Return from subroutine".into(),
            Insn::jmp { A } => format!("Jump to {A:03x}"),
            Insn::call { A } => format!("Call subroutine at {A:03x}"),
            Insn::seb { B, x } => format!("Skip next instruction if v{x:X} == {B:#04x}"),
            Insn::sneb { B, x } => format!("Skip next instruction if v{x:X} != {B:#04x}"),
            Insn::se { y, x } => format!("Skip next instruction if v{x:X} == v{y:X}"),
            Insn::movb { B, x } => format!("Set v{x:X} to {B:#04x}"),
            Insn::addb { B, x } => format!("Add {B:#04x} to v{x:X}"),
            Insn::mov { y, x } => format!("Set v{x:X} to v{y:X}"),
            Insn::or { y, x } => format!("Set v{x:X} to v{x:X} OR v{y:X}"),
            Insn::and { y, x } => format!("Set v{x:X} to v{x:X} AND v{y:X}"),
            Insn::xor { y, x } => format!("Set v{x:X} to v{x:X} XOR v{y:X}"),
            Insn::add { y, x } => format!("Add v{y:X} to v{x:X}, carry in vF"),
            Insn::sub { y, x } => format!("Subtract v{y:X} from v{x:X}, no-borrow in vF"),
            Insn::shr { y, x } => format!("Set v{x:X} to v{y:X} shifted right by 1"),
            Insn::bsub { y, x } => format!("Set v{x:X} to v{y:X} - v{x:X}, no-borrow in vF"),
            Insn::shl { y, x } => format!("Set v{x:X} to v{y:X} shifted left by 1"),
            Insn::sne { y, x } => format!("Skip next instruction if v{x:X} != v{y:X}"),
            Insn::movi { A } => format!("Set I to {A:03x}"),
            Insn::jmpr { A } => format!("Jump to {A:03x} + v0"),
            Insn::rand { B, x } => format!("Set v{x:X} to a random byte AND {B:#04x}"),
            Insn::draw { y, x, n } => {
                format!("Draw {n}-byte sprite from I at (v{x:X}, v{y:X})")
            }
            Insn::sek { x } => format!("Skip next instruction if key v{x:X} is held"),
            Insn::snek { x } => format!("Skip next instruction if key v{x:X} is not held"),
            Insn::getdt { x } => format!("Set v{x:X} to the delay timer"),
            Insn::waitk { x } => format!("Wait for a key press, store it in v{x:X}"),
            Insn::setdt { x } => format!("Set the delay timer to v{x:X}"),
            Insn::setst { x } => format!("Set the sound timer to v{x:X}"),
            Insn::addi { x } => format!("Add v{x:X} to I"),
            Insn::font { x } => format!("Set I to the font sprite for digit v{x:X}"),
            Insn::bcd { x } => format!("Store v{x:X} as decimal digits at I, I+1, I+2"),
            Insn::dmao { x } => format!("Store v0 through v{x:X} at I"),
            Insn::dmai { x } => format!("Load v0 through v{x:X} from I"),
        }
    }
}

impl Display for Insn {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Insn::cls               => write!(f, "cls    "),
            Insn::ret               => write!(f, "ret    "),
            Insn::jmp { A }         => write!(f, "jmp    {A:03x}"),
            Insn::call { A }        => write!(f, "call   {A:03x}"),
            Insn::seb { B, x }      => write!(f, "se     #{B:02x}, v{x:X}"),
            Insn::sneb { B, x }     => write!(f, "sne    #{B:02x}, v{x:X}"),
            Insn::se { y, x }       => write!(f, "se     v{y:X}, v{x:X}"),
            Insn::movb { B, x }     => write!(f, "mov    #{B:02x}, v{x:X}"),
            Insn::addb { B, x }     => write!(f, "add    #{B:02x}, v{x:X}"),
            Insn::mov { y, x }      => write!(f, "mov    v{y:X}, v{x:X}"),
            Insn::or { y, x }       => write!(f, "or     v{y:X}, v{x:X}"),
            Insn::and { y, x }      => write!(f, "and    v{y:X}, v{x:X}"),
            Insn::xor { y, x }      => write!(f, "xor    v{y:X}, v{x:X}"),
            Insn::add { y, x }      => write!(f, "add    v{y:X}, v{x:X}"),
            Insn::sub { y, x }      => write!(f, "sub    v{y:X}, v{x:X}"),
            Insn::shr { y, x }      => write!(f, "shr    v{y:X}, v{x:X}"),
            Insn::bsub { y, x }     => write!(f, "bsub   v{y:X}, v{x:X}"),
            Insn::shl { y, x }      => write!(f, "shl    v{y:X}, v{x:X}"),
            Insn::sne { y, x }      => write!(f, "sne    v{y:X}, v{x:X}"),
            Insn::movi { A }        => write!(f, "mov    ${A:03x}, I"),
            Insn::jmpr { A }        => write!(f, "jmp    ${A:03x}+v0"),
            Insn::rand { B, x }     => write!(f, "rand   #{B:02x}, v{x:X}"),
            Insn::draw { y, x, n }  => write!(f, "draw   #{n:x}, v{x:X}, v{y:X}"),
            Insn::sek { x }         => write!(f, "sek    v{x:X}"),
            Insn::snek { x }        => write!(f, "snek   v{x:X}"),
            Insn::getdt { x }       => write!(f, "mov    DT, v{x:X}"),
            Insn::waitk { x }       => write!(f, "waitk  v{x:X}"),
            Insn::setdt { x }       => write!(f, "mov    v{x:X}, DT"),
            Insn::setst { x }       => write!(f, "mov    v{x:X}, ST"),
            Insn::addi { x }        => write!(f, "add    v{x:X}, I"),
            Insn::font { x }        => write!(f, "font   v{x:X}, I"),
            Insn::bcd { x }         => write!(f, "bcd    v{x:X}, &I"),
            Insn::dmao { x }        => write!(f, "dmao   v{x:X}"),
            Insn::dmai { x }        => write!(f, "dmai   v{x:X}"),
        }
    }
}
