// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Everything that can stop the front-end

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Problems that end an interactive session
#[derive(Debug, Error)]
pub enum Error {
    /// The interpreter stopped
    #[error(transparent)]
    Chip8(#[from] chip8emu::Error),
    /// Error originated in [std::io]
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Error originated in [minifb]
    #[error(transparent)]
    Window(#[from] minifb::Error),
    /// A logger was already installed
    #[error(transparent)]
    Logger(#[from] log::SetLoggerError),
}
