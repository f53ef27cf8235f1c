// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the OS facade.
///
/// Missing platform capabilities are never errors; accessors return `None`
/// for those. Everything here is a real failure the caller has to handle.
#[derive(Error, Debug)]
pub enum SystemError {
    // Font and surface loading
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {}: {message}", .path.display())]
    SurfaceDecode { path: PathBuf, message: String },

    #[error("Sprite sheet {} contains no glyphs", .path.display())]
    EmptyGlyphSheet { path: PathBuf },

    #[error("Invalid font data in {}: {message}", .path.display())]
    InvalidFontData { path: PathBuf, message: String },

    #[error("Invalid sprite sheet scale {scale} for a {width}x{height} sheet")]
    InvalidScale { scale: u32, width: u32, height: u32 },

    #[error("Invalid font size: {size}")]
    InvalidFontSize { size: f32 },

    // Native services
    #[error("Native dialog failed: {message}")]
    NativeDialog { message: String },

    #[error("Dialog kind not supported by this platform: {kind}")]
    UnsupportedDialog { kind: &'static str },

    // Lifecycle
    #[error("An OS system instance is already installed on this thread")]
    AlreadyInitialized,

    #[error("The OS system has been disposed")]
    Disposed,
}

pub type SystemResult<T> = Result<T, SystemError>;
