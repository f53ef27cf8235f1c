//! Platform variants
//!
//! The variant is picked when the crate is compiled: Windows and macOS by
//! target, GTK on other targets when the `gtk` feature is on, and the
//! service-less fallback everywhere else. [`ActivePlatform`] names it.

pub mod none;

#[cfg(target_os = "windows")]
pub mod win;
#[cfg(target_os = "windows")]
pub type ActivePlatform = win::WinPlatform;

#[cfg(target_os = "macos")]
pub mod osx;
#[cfg(target_os = "macos")]
pub type ActivePlatform = osx::OsxPlatform;

#[cfg(all(not(target_os = "windows"), not(target_os = "macos"), feature = "gtk"))]
pub mod gtk;
#[cfg(all(not(target_os = "windows"), not(target_os = "macos"), feature = "gtk"))]
pub type ActivePlatform = gtk::GtkPlatform;

#[cfg(all(not(target_os = "windows"), not(target_os = "macos"), not(feature = "gtk")))]
pub type ActivePlatform = none::NonePlatform;
