// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


mod behavior;
pub mod dispatch;
pub mod flags;
pub mod history;
pub mod instruction;
pub mod mem;

use self::{
    dispatch::decode,
    flags::{Flags, RunState},
    history::History,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    mem::{Mem, Region, FONT_ADDR, FONT_STRIDE, PROGRAM_ADDR},
};
use crate::{
    config::Config,
    error::{Error, Result},
    io::Keypad,
    screen::Screen,
};
use log::{debug, info, trace};
use owo_colors::OwoColorize;
use rand::{rngs::StdRng, SeedableRng};
use std::fmt::{Debug, Display};

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// Depth of the call stack
pub const STACK_DEPTH: usize = 16;

/// What the sound timer asks of the speaker, reported once per frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Nothing to play
    #[default]
    Silent,
    /// The sound timer is running: the tone should be audible
    Playing,
    /// The sound timer ran out this frame: the tone should stop
    Stopping,
}

/// A copy of the CPU's registers, for display
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// Program counter
    pub pc: Adr,
    /// Index register
    pub i: Adr,
    /// Number of return addresses on the stack
    pub sp: usize,
    /// General purpose registers
    pub v: [u8; 16],
    /// Return addresses. Only the first `sp` are meaningful.
    pub stack: [Adr; STACK_DEPTH],
    /// Delay timer
    pub delay: u8,
    /// Sound timer
    pub sound: u8,
    /// Cycles executed since the last reset
    pub cycle: usize,
}

impl Display for Snapshot {
    /// ```text
    /// PC: 0200, SP: 00, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// ```
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "PC: {:04x}, SP: {:02x}, I: {:04x}", self.pc, self.sp, self.i)?;
        for (reg, gpr) in self.v.iter().enumerate() {
            write!(f, "v{reg:X}: {gpr:02x}")?;
            match reg % 4 {
                3 => writeln!(f)?,
                _ => write!(f, " ")?,
            }
        }
        if self.sp > 0 {
            write!(f, "STK:")?;
            for addr in &self.stack[..self.sp] {
                write!(f, " {addr:03x}")?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "DLY: {}, SND: {}, CYC: {:6}",
            self.delay, self.sound, self.cycle
        )
    }
}

/// Represents the internal state of the CPU interpreter
#[derive(Clone)]
pub struct CPU {
    /// Flags that control how the CPU behaves, but which aren't inherent to the
    /// chip-8. Includes the run state, target IPF, etc.
    pub flags: Flags,
    // memory
    mem: Mem,
    screen: Screen,
    stack: [Adr; STACK_DEPTH],
    sp: usize,
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    delay: u8,
    sound: u8,
    // Execution data
    cycle: usize,
    rng: StdRng,
    history: History,
    disassembler: Dis,
}

// public interface
impl CPU {
    /// Constructs a new CPU with the character set loaded and no program
    /// # Examples
    /// ```rust
    /// # use chip8emu::*;
    /// let config = Config { speed: 600, debug: true, ..Default::default() };
    /// let cpu = CPU::new(&config);
    /// assert_eq!(10, cpu.flags.ipf);
    /// assert!(cpu.flags.debug);
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn new(config: &Config) -> Self {
        CPU {
            flags: config.into(),
            mem: Mem::new(),
            screen: Screen::new(),
            stack: [0; STACK_DEPTH],
            sp: 0,
            pc: PROGRAM_ADDR as Adr,
            i: 0,
            v: [0; 16],
            delay: 0,
            sound: 0,
            cycle: 0,
            rng: StdRng::from_entropy(),
            history: History::new(config.history),
            disassembler: Dis::default(),
        }
    }

    /// Loads a program into the CPU's program space
    pub fn load_program(&mut self, rom: impl AsRef<std::path::Path>) -> Result<&mut Self> {
        let rom = rom.as_ref();
        info!("Loading {}", rom.display());
        self.load_program_bytes(&std::fs::read(rom)?)
    }

    /// Loads bytes into the CPU's program space, clearing whatever was there.
    ///
    /// Fails with [Error::RomTooLarge], before touching memory,
    /// if the program doesn't fit.
    /// # Examples
    /// ```rust
    /// # use chip8emu::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0x12, 0x34]).unwrap();
    /// assert_eq!(0x1234, cpu.mem().fetch(0x200).unwrap());
    /// assert!(cpu.load_program_bytes(&[0; 0xe01]).is_err());
    /// ```
    pub fn load_program_bytes(&mut self, rom: &[u8]) -> Result<&mut Self> {
        self.mem.load_region(Region::Program, rom)?;
        self.mem
            .grab_mut(PROGRAM_ADDR + rom.len()..Region::Program.range().end)?
            .fill(0);
        info!("Loaded {} byte program at {PROGRAM_ADDR:03x}", rom.len());
        Ok(self)
    }

    /// Sets a general purpose register in the CPU.
    /// If the register doesn't exist, returns [Error::InvalidRegister]
    /// # Examples
    /// ```rust
    /// # use chip8emu::*;
    /// // Create a new CPU, and set v4 to 0x41
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x4, 0x41).unwrap();
    /// assert_eq!(0x41, cpu.v()[4]);
    /// assert!(cpu.set_v(0x10, 0).is_err());
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        let gpr = self.v.get_mut(reg).ok_or(Error::InvalidRegister { reg })?;
        *gpr = value;
        Ok(())
    }

    /// Gets a slice of the entire general purpose registers
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use chip8emu::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the stack pointer: the number of return addresses on the stack
    pub fn sp(&self) -> usize {
        self.sp
    }

    /// Gets the return addresses currently on the stack, oldest first
    pub fn stack(&self) -> &[Adr] {
        &self.stack[..self.sp]
    }

    /// Gets the value in the Sound Timer register
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Gets the number of cycles the CPU has executed
    /// # Examples
    /// ```rust
    /// # use chip8emu::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0x0, cpu.cycle());
    /// ```
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Gets the framebuffer
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Gets the CPU's memory
    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    /// Gets the most recently executed instructions.
    /// Only recorded while [Flags::explain] is set.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Copies out the registers, stack, and timers
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pc: self.pc,
            i: self.i,
            sp: self.sp,
            v: self.v,
            stack: self.stack,
            delay: self.delay,
            sound: self.sound,
            cycle: self.cycle,
        }
    }

    /// Soft resets the CPU, releasing any key wait and
    /// reinitializing the program counter to 0x200
    /// # Examples
    /// ```rust
    /// # use chip8emu::*;
    /// let mut cpu = CPU::default();
    /// cpu.flags.state = RunState::AwaitingKey { x: 3 };
    /// cpu.soft_reset();
    /// assert_eq!(0x200, cpu.pc());
    /// assert_eq!(RunState::Running, cpu.flags.state);
    /// ```
    pub fn soft_reset(&mut self) {
        self.pc = PROGRAM_ADDR as Adr;
        self.flags.state = RunState::Running;
    }

    /// Resets the emulator.
    ///
    /// Touches the run state, stack, pc, registers, timers,
    /// screen, history, and cycle count.
    ///
    /// Does not touch memory, so the loaded program survives.
    pub fn reset(&mut self) {
        info!("Resetting after {} cycles", self.cycle);
        self.soft_reset();
        // clear the stack
        self.stack = [0; STACK_DEPTH];
        self.sp = 0;
        // Zero the registers
        self.i = 0;
        self.v = [0; 16];
        self.delay = 0;
        self.sound = 0;
        // Execution data
        self.cycle = 0;
        self.screen.clear();
        self.history.clear();
    }

    /// Unpauses the emulator for a single tick,
    /// even if cpu.flags.pause is set.
    ///
    /// Like with [CPU::tick], this returns [Error::UnimplementedInstruction]
    /// if the instruction is unimplemented.
    ///
    /// NOTE: does not tick the timers
    /// # Examples
    /// ```rust
    /// # use chip8emu::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.flags.pause = true;
    /// cpu.singlestep(&Keys::new()).unwrap();
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycle());
    /// assert!(cpu.flags.pause);
    /// ```
    pub fn singlestep(&mut self, keypad: &impl Keypad) -> Result<&mut Self> {
        let paused = std::mem::replace(&mut self.flags.pause, false);
        let result = self.tick(keypad).map(|_| ());
        self.flags.pause = paused;
        result?;
        Ok(self)
    }

    /// Executes a single instruction, unless paused
    ///
    /// While waiting on `Fx0A`, a tick only checks the keypad.
    ///
    /// Returns [Error::UnimplementedInstruction] if the instruction at `pc` is unimplemented.
    /// # Examples
    /// ```rust
    /// # use chip8emu::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.tick(&Keys::new())
    ///     .expect("0x00e0 (cls) should be a valid opcode.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycle());
    /// ```
    /// Returns [Error::UnimplementedInstruction] if the instruction is not implemented.
    /// ```rust
    /// # use chip8emu::*;
    /// let mut cpu = CPU::default();
    /// # cpu.flags.debug = true;        // enable live disassembly
    /// cpu.load_program_bytes(&[
    ///     0xff, 0xff, // invalid!
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// dbg!(cpu.tick(&Keys::new()))
    ///     .expect_err("Should return Error::UnimplementedInstruction { 0xffff }");
    /// ```
    pub fn tick(&mut self, keypad: &impl Keypad) -> Result<&mut Self> {
        // Do nothing if paused
        if self.flags.pause {
            return Ok(self);
        }
        self.cycle += 1;

        if let RunState::AwaitingKey { x } = self.flags.state {
            if let Some(key) = keypad.freshly_pressed() {
                debug!("Got key {key:X}, resuming at {:03x}", self.pc);
                self.v[x] = key;
                self.flags.state = RunState::Running;
            }
            return Ok(self);
        }

        // fetch opcode
        let pc = self.pc;
        let word = self.mem.fetch(pc as usize)?;

        // Print opcode disassembly:
        if self.flags.debug {
            std::println!(
                "{:3} {:03x}: {:<36}",
                self.cycle.bright_black(),
                pc,
                self.disassembler.once(word)
            );
        }

        // decode opcode
        let insn = decode(word);
        if self.flags.explain {
            let description = match &insn {
                Ok(insn) => insn.explain(),
                Err(_) => format!("Unknown instruction {word:04x}"),
            };
            self.history.record(pc, word, description);
        }
        let insn = insn?;
        trace!("{pc:03x}: {insn}");
        self.pc = pc.wrapping_add(2);
        self.execute(insn, keypad)?;
        Ok(self)
    }

    /// Runs one frame: [Flags::ipf] instructions, then one tick of each timer.
    ///
    /// Paused frames execute nothing and leave the timers alone.
    /// # Examples
    /// ```rust
    /// # use chip8emu::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x60, 0x02, // mov #02, v0
    ///     0xf0, 0x18, // mov v0, ST
    ///     0x12, 0x04, // jmp 204
    /// ]).unwrap();
    /// let keys = Keys::new();
    /// assert_eq!(Tone::Playing, cpu.frame(&keys).unwrap());
    /// assert_eq!(Tone::Stopping, cpu.frame(&keys).unwrap());
    /// assert_eq!(Tone::Silent, cpu.frame(&keys).unwrap());
    /// ```
    pub fn frame(&mut self, keypad: &impl Keypad) -> Result<Tone> {
        if self.flags.pause {
            return Ok(Tone::Silent);
        }
        for _ in 0..self.flags.ipf.max(1) {
            self.tick(keypad)?;
        }
        self.delay = self.delay.saturating_sub(1);
        let sounding = self.sound > 0;
        self.sound = self.sound.saturating_sub(1);
        Ok(match (sounding, self.sound) {
            (true, 0) => Tone::Stopping,
            (false, _) => Tone::Silent,
            _ => Tone::Playing,
        })
    }

    /// Dumps the current state of all CPU registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use chip8emu::*;
    /// let mut cpu = CPU::default();
    /// cpu.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 00, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// ```
    pub fn dump(&self) {
        std::println!("{}", self.snapshot());
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("flags", &self.flags)
            .field("stack", &self.stack())
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("delay", &self.delay)
            .field("sound", &self.sound)
            .field("cycle", &self.cycle)
            .field("history", &self.history)
            .field("disassembler", &self.disassembler)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    /// Constructs a new CPU with the default [Config]
    ///
    /// # Examples
    /// ```rust
    /// use chip8emu::*;
    /// let mut cpu = CPU::default();
    /// ```
    fn default() -> Self {
        CPU::new(&Config::default())
    }
}
