// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains implementations for each Chip-8 [Insn]

use super::{flags::RunState, *};
use rand::Rng;

impl CPU {
    /// Executes a single [Insn]
    ///
    /// By the time this runs, pc already points past the instruction.
    #[rustfmt::skip]
    #[inline(always)]
    pub(super) fn execute(&mut self, instruction: Insn, keypad: &impl Keypad) -> Result<()> {
        match instruction {
            Insn::cls               => self.clear_screen(),
            Insn::ret               => self.ret()?,
            Insn::jmp   {       A } => self.jump(A),
            Insn::call  {       A } => self.call(A)?,
            Insn::seb   {    x, B } => self.skip_equals_immediate(x, B),
            Insn::sneb  {    x, B } => self.skip_not_equals_immediate(x, B),
            Insn::se    { y, x    } => self.skip_equals(x, y),
            Insn::movb  {    x, B } => self.load_immediate(x, B),
            Insn::addb  {    x, B } => self.add_immediate(x, B),
            Insn::mov   { y, x    } => self.load(x, y),
            Insn::or    { y, x    } => self.or(x, y),
            Insn::and   { y, x    } => self.and(x, y),
            Insn::xor   { y, x    } => self.xor(x, y),
            Insn::add   { y, x    } => self.add(x, y),
            Insn::sub   { y, x    } => self.sub(x, y),
            Insn::shr   { y, x    } => self.shift_right(x, y),
            Insn::bsub  { y, x    } => self.backwards_sub(x, y),
            Insn::shl   { y, x    } => self.shift_left(x, y),
            Insn::sne   { y, x    } => self.skip_not_equals(x, y),
            Insn::movi  {       A } => self.load_i_immediate(A),
            Insn::jmpr  {       A } => self.jump_indexed(A),
            Insn::rand  {    x, B } => self.rand(x, B),
            Insn::draw  { y, x, n } => self.draw(x, y, n)?,
            Insn::sek   {    x    } => self.skip_key_equals(x, keypad)?,
            Insn::snek  {    x    } => self.skip_key_not_equals(x, keypad)?,
            Insn::getdt {    x    } => self.load_delay_timer(x),
            Insn::waitk {    x    } => self.wait_for_key(x, keypad),
            Insn::setdt {    x    } => self.store_delay_timer(x),
            Insn::setst {    x    } => self.store_sound_timer(x),
            Insn::addi  {    x    } => self.add_i(x),
            Insn::font  {    x    } => self.load_sprite(x)?,
            Insn::bcd   {    x    } => self.bcd_convert(x)?,
            Insn::dmao  {    x    } => self.store_dma(x)?,
            Insn::dmai  {    x    } => self.load_dma(x)?,
        }
        Ok(())
    }

    /// Skips the next instruction
    #[inline(always)]
    fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }
}

/// |`0aaa`| Issues a "System call" (ML routine)
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`00e0`| Clear screen memory to all 0       |
/// |`00ee`| Return from subroutine             |
impl CPU {
    /// |`00e0`| Clears the screen memory to 0
    #[inline(always)]
    pub(super) fn clear_screen(&mut self) {
        self.screen.clear();
    }
    /// |`00ee`| Returns from subroutine
    ///
    /// Fails with [Error::StackUnderflow] if nothing was called.
    #[inline(always)]
    pub(super) fn ret(&mut self) -> Result<()> {
        self.sp = self.sp.checked_sub(1).ok_or(Error::StackUnderflow)?;
        self.pc = self.stack[self.sp];
        Ok(())
    }
}

/// |`1aaa`| Sets pc to an absolute address
impl CPU {
    /// |`1aaa`| Sets the program counter to an absolute address
    #[inline(always)]
    pub(super) fn jump(&mut self, a: Adr) {
        self.pc = a;
    }
}

/// |`2aaa`| Pushes pc onto the stack, then jumps to a
impl CPU {
    /// |`2aaa`| Pushes pc onto the stack, then jumps to a
    ///
    /// Fails with [Error::StackOverflow] when all 16 slots are in use.
    #[inline(always)]
    pub(super) fn call(&mut self, a: Adr) -> Result<()> {
        let slot = self
            .stack
            .get_mut(self.sp)
            .ok_or(Error::StackOverflow { addr: a })?;
        *slot = self.pc;
        self.sp += 1;
        self.pc = a;
        Ok(())
    }
}

/// |`3xbb`| Skips next instruction if register X == b
impl CPU {
    /// |`3xbb`| Skips the next instruction if register X == b
    #[inline(always)]
    pub(super) fn skip_equals_immediate(&mut self, x: Reg, b: u8) {
        if self.v[x] == b {
            self.skip();
        }
    }
}

/// |`4xbb`| Skips next instruction if register X != b
impl CPU {
    /// |`4xbb`| Skips the next instruction if register X != b
    #[inline(always)]
    pub(super) fn skip_not_equals_immediate(&mut self, x: Reg, b: u8) {
        if self.v[x] != b {
            self.skip();
        }
    }
}

/// |`5xy0`| Skips next instruction if register X == register Y
impl CPU {
    /// |`5xy0`| Skips the next instruction if register X == register Y
    #[inline(always)]
    pub(super) fn skip_equals(&mut self, x: Reg, y: Reg) {
        if self.v[x] == self.v[y] {
            self.skip();
        }
    }
}

/// |`6xbb`| Loads immediate byte b into register vX
impl CPU {
    /// |`6xbb`| Loads immediate byte b into register vX
    #[inline(always)]
    pub(super) fn load_immediate(&mut self, x: Reg, b: u8) {
        self.v[x] = b;
    }
}

/// |`7xbb`| Adds immediate byte b to register vX
impl CPU {
    /// |`7xbb`| Adds immediate byte b to register vX. Never touches vF.
    #[inline(always)]
    pub(super) fn add_immediate(&mut self, x: Reg, b: u8) {
        self.v[x] = self.v[x].wrapping_add(b);
    }
}

/// |`8xyn`| Performs ALU operation
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`8xy0`| X = Y                              |
/// |`8xy1`| X = X \| Y, vF = 0                 |
/// |`8xy2`| X = X & Y, vF = 0                  |
/// |`8xy3`| X = X ^ Y, vF = 0                  |
/// |`8xy4`| X = X + Y; Set vF=carry            |
/// |`8xy5`| X = X - Y; Set vF=!borrow          |
/// |`8xy6`| X = Y >> 1; vF = shifted-out bit   |
/// |`8xy7`| X = Y - X; Set vF=!borrow          |
/// |`8xyE`| X = Y << 1; vF = shifted-out bit   |
///
/// Every flag is written after vX, so `vF` as the destination holds the flag.
impl CPU {
    /// |`8xy0`|
    /// Loads the value of vY into vX
    #[inline(always)]
    pub(super) fn load(&mut self, x: Reg, y: Reg) {
        self.v[x] = self.v[y];
    }
    /// |`8xy1`|
    /// Performs bitwise or of vX and vY, and stores the result in vX
    ///
    /// # Quirk
    /// The original chip-8 interpreter clobbered vF for any 8-series instruction.
    #[inline(always)]
    pub(super) fn or(&mut self, x: Reg, y: Reg) {
        self.v[x] |= self.v[y];
        self.v[0xf] = 0;
    }
    /// |`8xy2`|
    /// Performs bitwise and of vX and vY, and stores the result in vX
    ///
    /// # Quirk
    /// The original chip-8 interpreter clobbered vF for any 8-series instruction.
    #[inline(always)]
    pub(super) fn and(&mut self, x: Reg, y: Reg) {
        self.v[x] &= self.v[y];
        self.v[0xf] = 0;
    }
    /// |`8xy3`|
    /// Performs bitwise xor of vX and vY, and stores the result in vX
    ///
    /// # Quirk
    /// The original chip-8 interpreter clobbered vF for any 8-series instruction.
    #[inline(always)]
    pub(super) fn xor(&mut self, x: Reg, y: Reg) {
        self.v[x] ^= self.v[y];
        self.v[0xf] = 0;
    }
    /// |`8xy4`|
    /// Performs addition of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn add(&mut self, x: Reg, y: Reg) {
        let carry;
        (self.v[x], carry) = self.v[x].overflowing_add(self.v[y]);
        self.v[0xf] = carry.into();
    }
    /// |`8xy5`|
    /// Performs subtraction of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn sub(&mut self, x: Reg, y: Reg) {
        let borrow;
        (self.v[x], borrow) = self.v[x].overflowing_sub(self.v[y]);
        self.v[0xf] = (!borrow).into();
    }
    /// |`8xy6`|
    /// Performs bitwise right shift of vY, and stores the result in vX
    ///
    /// # Quirk
    /// On the original chip-8 interpreter, this shifts vY and stores the result in vX
    #[inline(always)]
    pub(super) fn shift_right(&mut self, x: Reg, y: Reg) {
        let src = self.v[y];
        self.v[x] = src >> 1;
        self.v[0xf] = src & 1;
    }
    /// |`8xy7`|
    /// Performs subtraction of vY and vX, and stores the result in vX
    #[inline(always)]
    pub(super) fn backwards_sub(&mut self, x: Reg, y: Reg) {
        let borrow;
        (self.v[x], borrow) = self.v[y].overflowing_sub(self.v[x]);
        self.v[0xf] = (!borrow).into();
    }
    /// |`8xyE`|
    /// Performs bitwise left shift of vY, and stores the result in vX
    ///
    /// # Quirk
    /// On the original chip-8 interpreter, this shifts vY and stores the result in vX
    #[inline(always)]
    pub(super) fn shift_left(&mut self, x: Reg, y: Reg) {
        let src = self.v[y];
        self.v[x] = src << 1;
        self.v[0xf] = src >> 7;
    }
}

/// |`9xy0`| Skip next instruction if X != y
impl CPU {
    /// |`9xy0`| Skip next instruction if X != y
    #[inline(always)]
    pub(super) fn skip_not_equals(&mut self, x: Reg, y: Reg) {
        if self.v[x] != self.v[y] {
            self.skip();
        }
    }
}

/// |`Aadr`| Load address #adr into register I
impl CPU {
    /// |`Aadr`| Load address #adr into register I
    #[inline(always)]
    pub(super) fn load_i_immediate(&mut self, a: Adr) {
        self.i = a;
    }
}

/// |`Badr`| Jump to &adr + v0
impl CPU {
    /// |`Badr`| Jump to &adr + v0
    ///
    /// The target may lie past the end of memory, in which case the next fetch fails.
    #[inline(always)]
    pub(super) fn jump_indexed(&mut self, a: Adr) {
        self.pc = a.wrapping_add(self.v[0] as Adr);
    }
}

/// |`Cxbb`| Stores a random number & the provided byte into vX
impl CPU {
    /// |`Cxbb`| Stores a random number & the provided byte into vX
    #[inline(always)]
    pub(super) fn rand(&mut self, x: Reg, b: u8) {
        self.v[x] = self.rng.gen::<u8>() & b;
    }
}

/// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
impl CPU {
    /// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
    ///
    /// Sets vF if any lit pixel was turned off.
    /// Fails if the sprite at I runs off the end of memory.
    ///
    /// # Quirk
    /// Sprites are clipped at the bottom edge, but wrap at the right edge.
    #[inline(always)]
    pub(super) fn draw(&mut self, x: Reg, y: Reg, n: Nib) -> Result<()> {
        let (x, y) = (self.v[x] as usize, self.v[y] as usize);
        let i = self.i as usize;
        let sprite = self.mem.grab(i..i + n as usize)?;
        let collided = self.screen.draw(x, y, sprite);
        self.v[0xf] = collided.into();
        Ok(())
    }
}

/// |`Exbb`| Skips instruction on value of keypress
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`eX9e`| Skip next instruction if key vX held |
/// |`eXa1`| Skip next instruction if key vX not held |
impl CPU {
    /// Gets the key named by vX, if there is such a key
    #[inline(always)]
    fn key_in(&self, x: Reg) -> Result<u8> {
        match self.v[x] {
            key @ 0..=0xf => Ok(key),
            key => Err(Error::InvalidKey { key: key as usize }),
        }
    }
    /// |`Ex9E`| Skip next instruction if key vX is held
    #[inline(always)]
    pub(super) fn skip_key_equals(&mut self, x: Reg, keypad: &impl Keypad) -> Result<()> {
        if keypad.is_held(self.key_in(x)?) {
            self.skip();
        }
        Ok(())
    }
    /// |`ExA1`| Skip next instruction if key vX is not held
    #[inline(always)]
    pub(super) fn skip_key_not_equals(&mut self, x: Reg, keypad: &impl Keypad) -> Result<()> {
        if !keypad.is_held(self.key_in(x)?) {
            self.skip();
        }
        Ok(())
    }
}

/// |`Fxbb`| Performs IO
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`fX07`| Set vX to value in delay timer     |
/// |`fX0a`| Wait for input, store key in vX    |
/// |`fX15`| Set delay timer to the value in vX |
/// |`fX18`| Set sound timer to the value in vX |
/// |`fX1e`| Add vX to I                        |
/// |`fX29`| Load sprite for character x into I |
/// |`fX33`| BCD convert X into I[0..3]         |
/// |`fX55`| DMA Stor from registers 0..=X to I |
/// |`fX65`| DMA Load from I to registers 0..=X |
impl CPU {
    /// |`Fx07`| Get the current DT, and put it in vX
    /// ```py
    /// vX = DT
    /// ```
    #[inline(always)]
    pub(super) fn load_delay_timer(&mut self, x: Reg) {
        self.v[x] = self.delay;
    }
    /// |`Fx0A`| Wait for key, then vX = K
    ///
    /// If no key was freshly pressed, the CPU stops executing instructions
    /// until one is. See [RunState::AwaitingKey].
    #[inline(always)]
    pub(super) fn wait_for_key(&mut self, x: Reg, keypad: &impl Keypad) {
        if let Some(key) = keypad.freshly_pressed() {
            self.v[x] = key;
        } else {
            debug!("Waiting for a key at {:03x}", self.pc.wrapping_sub(2));
            self.flags.state = RunState::AwaitingKey { x };
        }
    }
    /// |`Fx15`| Load vX into DT
    /// ```py
    /// DT = vX
    /// ```
    #[inline(always)]
    pub(super) fn store_delay_timer(&mut self, x: Reg) {
        self.delay = self.v[x];
    }
    /// |`Fx18`| Load vX into ST
    /// ```py
    /// ST = vX;
    /// ```
    #[inline(always)]
    pub(super) fn store_sound_timer(&mut self, x: Reg) {
        self.sound = self.v[x];
    }
    /// |`Fx1e`| Add vX to I,
    /// ```py
    /// I += vX;
    /// ```
    #[inline(always)]
    pub(super) fn add_i(&mut self, x: Reg) {
        self.i = self.i.wrapping_add(self.v[x] as Adr);
    }
    /// |`Fx29`| Load sprite for character x into I
    /// ```py
    /// I = sprite(X);
    /// ```
    /// Fails with [Error::InvalidDigit] when vX isn't a hex digit.
    #[inline(always)]
    pub(super) fn load_sprite(&mut self, x: Reg) -> Result<()> {
        let digit = self.v[x];
        if digit > 0xf {
            return Err(Error::InvalidDigit { digit });
        }
        self.i = (FONT_ADDR + FONT_STRIDE * digit as usize) as Adr;
        Ok(())
    }
    /// |`Fx33`| BCD convert X into I`[0..3]`
    #[inline(always)]
    pub(super) fn bcd_convert(&mut self, x: Reg) -> Result<()> {
        let (value, i) = (self.v[x], self.i as usize);
        self.mem
            .grab_mut(i..i + 3)?
            .copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
        Ok(())
    }
    /// |`Fx55`| DMA Stor from registers 0..=X to I
    ///
    /// # Quirk
    /// I is left one past where it started, however many registers were stored.
    #[inline(always)]
    pub(super) fn store_dma(&mut self, x: Reg) -> Result<()> {
        let i = self.i as usize;
        self.mem
            .grab_mut(i..i + x + 1)?
            .copy_from_slice(&self.v[..=x]);
        self.i = self.i.wrapping_add(1);
        Ok(())
    }
    /// |`Fx65`| DMA Load from I to registers 0..=X
    ///
    /// # Quirk
    /// I is left one past where it started, however many registers were loaded.
    #[inline(always)]
    pub(super) fn load_dma(&mut self, x: Reg) -> Result<()> {
        let i = self.i as usize;
        self.v[..=x].copy_from_slice(self.mem.grab(i..i + x + 1)?);
        self.i = self.i.wrapping_add(1);
        Ok(())
    }
}
