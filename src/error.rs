// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for the interpreter

use std::ops::Range;
use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the interpreter.
///
/// Every variant is fatal to the running program: the engine never retries
/// or clamps, it reports and stops.
#[derive(Debug, Error)]
pub enum Error {
    /// The fetched word does not decode to any instruction
    #[error("opcode {word:04x} not recognized")]
    UnimplementedInstruction {
        /// The offending word
        word: u16,
    },
    /// Called a subroutine with all 16 stack slots in use
    #[error("stack overflow calling {addr:03x}")]
    StackOverflow {
        /// The address that would have been called
        addr: u16,
    },
    /// Returned from a subroutine with an empty stack
    #[error("stack underflow: return with nothing on the stack")]
    StackUnderflow,
    /// Tried to read or write a byte outside of memory
    #[error("address {addr:04x} is outside of memory")]
    InvalidAddress {
        /// The offending address
        addr: usize,
    },
    /// Tried to read several bytes, and some fell outside of memory
    #[error("range {range:04x?} is outside of memory")]
    InvalidAddressRange {
        /// The offending range
        range: Range<usize>,
    },
    /// Asked for the font sprite of a value which isn't a hex digit
    #[error("no font sprite for {digit:02x}")]
    InvalidDigit {
        /// The offending value
        digit: u8,
    },
    /// Tried to access a register that doesn't exist
    #[error("tried to access register v{reg:X} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
    /// Tried to query or press a key that doesn't exist
    #[error("tried to access key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// The program doesn't fit between the load address and the end of memory
    #[error("program is {len} bytes, but only {capacity} fit in memory")]
    RomTooLarge {
        /// Length of the program
        len: usize,
        /// Bytes available for programs
        capacity: usize,
    },
    /// Tried to parse a color which isn't six hex digits
    #[error("\"{color}\" is not a six digit hex color")]
    InvalidColor {
        /// The string which failed to become a color
        color: String,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
