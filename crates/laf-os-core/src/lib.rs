//! LAF OS Core - toolkit-agnostic operating system services
//!
//! This crate provides one facade over the services a host application
//! needs from the OS (native file dialogs, the app menu, the event queue,
//! font loading and modifier keys), with the concrete variant chosen when
//! the crate is built.

#![deny(unsafe_code)]

pub mod config;
pub mod constants;
pub mod dialogs;
pub mod dummy_platform;
pub mod error;
pub mod event;
pub mod font;
pub mod keys;
pub mod menus;
pub mod platform;
pub mod registry;
pub mod surface;
pub mod system;
pub mod traits;

// Re-export main types
pub use config::SystemConfig;
pub use dialogs::{FileDialog, FileDialogKind, FileFilter};
pub use error::{SystemError, SystemResult};
pub use event::{Event, EventQueue};
pub use font::{Font, FontType, GlyphBitmap, GlyphProvider, OutlineFont, SpriteSheetFont};
pub use keys::{resolve_modifiers, KeyModifiers, KeyScancode};
pub use menus::{Menu, MenuItem, Shortcut};
pub use platform::ActivePlatform;
pub use surface::Surface;
pub use system::{create_system, dispose_instance, install, instance, CommonSystem, System};

// Re-export traits
pub use traits::*;
