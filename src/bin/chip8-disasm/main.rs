// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Lists the instructions in a Chip-8 ROM
use chip8emu::{error::Result, *};
use gumdrop::*;
use owo_colors::OwoColorize;
use std::{fs::read, path::PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Show help text")]
    help: bool,
    #[options(help = "Load a ROM to disassemble", free, required)]
    pub file: PathBuf,
    #[options(
        help = "Load address (usually 200)",
        default = "200",
        parse(try_from_str = "parse_hex")
    )]
    pub loadaddr: u16,
    #[options(help = "Start disassembling at offset...")]
    pub offset: usize,
    #[options(help = "Don't color the output")]
    pub plain: bool,
}

fn parse_hex(value: &str) -> std::result::Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(value, 16)
}

fn main() {
    let options = Arguments::parse_args_default_or_exit();
    if let Err(e) = run(&options) {
        eprintln!("{}", e.bold().red());
        std::process::exit(1);
    }
}

fn run(options: &Arguments) -> Result<()> {
    let contents = read(&options.file)?;
    let disassembler = match options.plain {
        true => Dis::plain(),
        false => Dis::default(),
    };
    let start = options.offset.min(contents.len());
    for line in disassembler.listing(options.loadaddr as usize + start, &contents[start..]) {
        println!("{line}");
    }
    Ok(())
}
