// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)
#![allow(missing_docs)]
//! Platform-specific IO/UI code, and some debug functionality.

use crate::error::Result;
use chip8emu::{Chip8, Config, Screen, Tone, HEIGHT, WIDTH};
use minifb::*;
use std::path::Path;

#[derive(Clone, Debug)]
pub struct UIBuilder {
    pub width: usize,
    pub height: usize,
    pub name: String,
    pub format: FrameBufferFormat,
    pub window_options: WindowOptions,
}

impl UIBuilder {
    pub fn new(config: &Config, rom: impl AsRef<Path>) -> Self {
        UIBuilder {
            width: WIDTH * config.scale,
            height: HEIGHT * config.scale,
            name: rom
                .as_ref()
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "chip8emu".into()),
            format: FrameBufferFormat {
                fg: config.fg.into(),
                bg: config.bg.into(),
            },
            ..Default::default()
        }
    }
    pub fn build(&self) -> Result<UI> {
        let ui = UI {
            window: Window::new(&self.name, self.width, self.height, self.window_options)?,
            keyboard: Default::default(),
            fb: FrameBuffer::new(self.format.clone()),
            name: self.name.clone(),
        };
        Ok(ui)
    }
}

impl Default for UIBuilder {
    fn default() -> Self {
        UIBuilder {
            width: WIDTH * 16,
            height: HEIGHT * 16,
            name: "chip8emu".into(),
            format: Default::default(),
            window_options: WindowOptions {
                title: true,
                resize: false,
                scale: Scale::X1,
                scale_mode: ScaleMode::Stretch,
                ..Default::default()
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBufferFormat {
    pub fg: u32,
    pub bg: u32,
}

impl Default for FrameBufferFormat {
    fn default() -> Self {
        let config = Config::default();
        FrameBufferFormat {
            fg: config.fg.into(),
            bg: config.bg.into(),
        }
    }
}

/// One `0x00RRGGBB` word per Chip-8 pixel. The window stretches it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameBuffer {
    buffer: Vec<u32>,
    format: FrameBufferFormat,
}

impl FrameBuffer {
    pub fn new(format: FrameBufferFormat) -> Self {
        FrameBuffer {
            buffer: vec![format.bg; WIDTH * HEIGHT],
            format,
        }
    }
    /// Expands the 1bpp screen into pixels
    pub fn fill(&mut self, screen: &Screen) {
        for (idx, byte) in screen.as_bytes().iter().enumerate() {
            for bit in 0..8 {
                self.buffer[8 * idx + bit] = if byte & (0x80 >> bit) != 0 {
                    self.format.fg
                } else {
                    self.format.bg
                }
            }
        }
    }
    pub fn render(&self, window: &mut Window) -> Result<()> {
        window.update_with_buffer(&self.buffer, WIDTH, HEIGHT)?;
        Ok(())
    }
    pub fn pixels(&self) -> &[u32] {
        &self.buffer
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(Default::default())
    }
}

#[derive(Debug)]
pub struct UI {
    window: Window,
    keyboard: Vec<Key>,
    fb: FrameBuffer,
    name: String,
}

impl UI {
    pub fn frame(&mut self, ch8: &Chip8, tone: Tone) -> Result<bool> {
        if !self.window.is_open() {
            return Ok(false);
        }
        self.window.set_title(&title(&self.name, ch8, tone));
        self.fb.fill(ch8.cpu.screen());
        self.fb.render(&mut self.window)?;
        Ok(true)
    }

    pub fn keys(&mut self, ch8: &mut Chip8) -> Result<bool> {
        // Diff against last frame's keys: minifb's own pressed/released lists drop events
        let held = self.window.get_keys();
        let pressed: Vec<Key> = held
            .iter()
            .filter(|key| !self.keyboard.contains(key))
            .copied()
            .collect();
        let released: Vec<Key> = self
            .keyboard
            .iter()
            .filter(|key| !held.contains(key))
            .copied()
            .collect();
        self.keyboard = held;

        for key in released {
            if let Some(key) = identify_key(key) {
                ch8.keys.release(key)?;
            }
        }
        // handle keybinds for the UI
        for key in pressed {
            use Key::*;
            match key {
                Space => eprintln!("{}.", {
                    ch8.cpu.flags.pause();
                    if ch8.cpu.flags.pause {
                        "Paused"
                    } else {
                        "Unpaused"
                    }
                }),
                Enter if ch8.cpu.flags.pause => {
                    ch8.singlestep()?;
                    eprintln!("Step: {:03x}", ch8.cpu.pc());
                }
                F1 => {
                    ch8.cpu.dump();
                    print!("{}", ch8.cpu.history());
                }
                F2 => ch8.cpu.screen().print_screen(),
                F3 => eprintln!("Debug {}.", {
                    ch8.cpu.flags.debug();
                    if ch8.cpu.flags.debug {
                        "enabled"
                    } else {
                        "disabled"
                    }
                }),
                Escape => return Ok(false),
                key => {
                    if let Some(key) = identify_key(key) {
                        ch8.keys.press(key)?;
                    }
                }
            }
        }
        Ok(true)
    }
}

/// Builds the window title: ROM name, run state, tone marker, latest instruction
pub fn title(name: &str, ch8: &Chip8, tone: Tone) -> String {
    let mut title = format!(
        "{name} {}",
        if ch8.cpu.flags.pause { "⏸" } else { "▶" }
    );
    if tone == Tone::Playing {
        title.push_str(" ♪");
    }
    if ch8.cpu.flags.explain {
        if let Some(entry) = ch8.cpu.history().latest() {
            title.push_str(&format!(" | {entry}"));
        }
    }
    title
}

/// Maps the left side of a QWERTY keyboard onto the hex keypad
pub fn identify_key(key: Key) -> Option<usize> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xc),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}
