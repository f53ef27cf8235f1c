//! LAF OS - one facade over the operating system services a host
//! application needs.
//!
//! This crate provides:
//! - Native file dialogs and the application menu, built lazily
//! - The per-thread event queue
//! - Sprite-sheet and outline font loading
//! - Modifier key resolution
//!
//! The platform variant (Windows, macOS, GTK or none) is picked at build time.

pub mod probe;

// Re-export the core for convenience
pub use laf_os_core::*;
