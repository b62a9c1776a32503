// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! A disassembler for Chip-8 opcodes
use crate::cpu::dispatch::decode;
use owo_colors::{OwoColorize, Style};

/// Disassembles Chip-8 instructions
pub trait Disassembler {
    /// Disassemble a single instruction word
    fn once(&self, word: u16) -> String;

    /// Disassemble a run of big-endian words, starting at `addr`.
    ///
    /// A trailing odd byte is listed on its own.
    fn listing(&self, addr: usize, bytes: &[u8]) -> Vec<String> {
        let mut lines: Vec<String> = bytes
            .chunks_exact(2)
            .enumerate()
            .map(|(index, word)| {
                let word = u16::from_be_bytes([word[0], word[1]]);
                format!("{:03x}: {} {word:04x}", addr + index * 2, self.once(word))
            })
            .collect();
        if let [.., last] = bytes {
            if bytes.len() % 2 == 1 {
                lines.push(format!("{:03x}: {last:02x}", addr + bytes.len() - 1));
            }
        }
        lines
    }
}

/// Disassembles Chip-8 instructions, printing them in the provided [owo_colors::Style]s
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dis {
    /// Styles invalid instructions
    pub invalid: Style,
    /// Styles valid instruction
    pub normal: Style,
}

impl Dis {
    /// A disassembler which styles nothing, for piping to files
    pub fn plain() -> Self {
        Self {
            invalid: Style::new(),
            normal: Style::new(),
        }
    }
}

impl Default for Dis {
    fn default() -> Self {
        Self {
            invalid: Style::new().bold().red(),
            normal: Style::new().green(),
        }
    }
}

impl Disassembler for Dis {
    /// # Examples
    /// ```rust
    ///# use chip8emu::*;
    /// let dis = Dis::plain();
    /// assert!(dis.once(0x1234).contains("jmp    234"));
    /// assert!(dis.once(0xffff).contains("inval  ffff"));
    /// ```
    fn once(&self, word: u16) -> String {
        match decode(word) {
            Ok(insn) => format!("{}", insn.style(self.normal)),
            Err(_) => format!("{}", format_args!("inval  {word:04x}").style(self.invalid)),
        }
    }
}
