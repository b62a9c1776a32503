// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the Chip-8's screen memory
//!
//! The screen is a packed 1bpp bitmap, 8 pixels per byte, row-major,
//! most significant bit leftmost.

use std::fmt::{Display, Formatter, Result};

/// Width of the screen, in pixels
pub const WIDTH: usize = 64;
/// Height of the screen, in pixels
pub const HEIGHT: usize = 32;
/// Bytes in one row of the screen
pub const ROW_BYTES: usize = WIDTH / 8;

/// The monochrome framebuffer
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Screen {
    mem: [u8; ROW_BYTES * HEIGHT],
}

impl Default for Screen {
    fn default() -> Self {
        Screen {
            mem: [0; ROW_BYTES * HEIGHT],
        }
    }
}

impl Screen {
    /// Constructs a blank screen
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets every pixel to 0
    pub fn clear(&mut self) {
        self.mem.fill(0);
    }

    /// XORs a sprite onto the screen with its top left corner at (`x`, `y`).
    ///
    /// Coordinates are taken modulo the screen size. Rows of the sprite that
    /// fall past the bottom edge are clipped, while columns that fall past the
    /// right edge wrap around to the left edge of the same row.
    ///
    /// Returns true if any lit pixel was turned off.
    /// # Examples
    /// ```rust
    ///# use chip8emu::*;
    /// let mut screen = Screen::new();
    /// assert!(!screen.draw(0, 0, &[0xf0]));
    /// assert!(screen.pixel(3, 0));
    /// // Drawing the same sprite again erases it
    /// assert!(screen.draw(0, 0, &[0xf0]));
    /// assert!(!screen.pixel(3, 0));
    /// ```
    pub fn draw(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let (x, y) = (x % WIDTH, y % HEIGHT);
        sprite
            .iter()
            .enumerate()
            .fold(false, |collided, (line, &byte)| {
                self.draw_byte(byte, x, y + line) | collided
            })
    }

    /// XORs one byte of sprite data onto row `y`, starting at column `x`
    ///
    /// A byte that isn't aligned to the screen's bytes straddles two of them:
    /// the second is the next byte of the same row, wrapping to column 0.
    fn draw_byte(&mut self, byte: u8, x: usize, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        let row = y * ROW_BYTES;
        let shift = x % 8;
        let first = row + x / 8;
        let second = row + (x / 8 + 1) % ROW_BYTES;

        let (old_first, old_second) = (self.mem[first], self.mem[second]);
        self.mem[first] ^= byte >> shift;
        if shift != 0 {
            self.mem[second] ^= byte << (8 - shift);
        }
        old_first & !self.mem[first] != 0 || old_second & !self.mem[second] != 0
    }

    /// Gets the pixel at (`x`, `y`). Coordinates wrap.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let (x, y) = (x % WIDTH, y % HEIGHT);
        self.mem[y * ROW_BYTES + x / 8] & (0x80 >> (x % 8)) != 0
    }

    /// Gets the packed bitmap
    pub fn as_bytes(&self) -> &[u8] {
        &self.mem
    }

    /// Iterates over the rows of the bitmap, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.mem.chunks_exact(ROW_BYTES)
    }

    /// Prints the screen to stdout at 1bpp
    /// # Examples
    /// ```rust
    ///# use chip8emu::*;
    /// let mut screen = Screen::new();
    /// screen.draw(4, 4, &CHARSET[0..5]);
    /// screen.print_screen();
    /// ```
    pub fn print_screen(&self) {
        // draw with the drawille library, if available
        #[cfg(feature = "drawille")]
        {
            use drawille::Canvas;
            let mut canvas = Canvas::new(WIDTH as u32, HEIGHT as u32);
            (0..HEIGHT)
                .flat_map(|y| (0..WIDTH).map(move |x| (x, y)))
                .filter(|&(x, y)| self.pixel(x, y))
                .for_each(|(x, y)| canvas.set(x as u32, y as u32));
            println!("{}", canvas.frame());
        }
        #[cfg(not(feature = "drawille"))]
        print!("{self}");
    }
}

impl Display for Screen {
    /// Draws the screen with block characters, one line per row
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for (y, row) in self.rows().enumerate() {
            write!(f, "{y:02}|")?;
            for byte in row {
                write!(
                    f,
                    "{}",
                    format!("{byte:08b}").replace('0', " ").replace('1', "█")
                )?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}
