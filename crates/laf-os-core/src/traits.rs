use std::path::{Path, PathBuf};

use crate::dialogs::FileDialog;
use crate::error::SystemResult;
use crate::font::{FontdueEngine, OutlineEngine};
use crate::keys::KeyScancode;
use crate::menus::Menu;
use crate::surface::Surface;

/// Native file dialogs of the platform
pub trait NativeDialogs {
    /// Runs `dialog` modally.
    ///
    /// Returns the chosen paths, `Ok(None)` when the user cancels, or an error
    /// when the native dialog itself fails.
    fn show(&self, dialog: &FileDialog) -> SystemResult<Option<Vec<PathBuf>>>;
}

/// Application menu bar of the platform
pub trait Menus {
    /// Installs `menu` as the application menu, or removes it with `None`.
    fn set_app_menu(&self, menu: Option<&Menu>) -> SystemResult<()>;
}

/// Platform log sink
pub trait Logger {
    fn log_error(&self, message: &str);
}

/// Everything that differs between platform variants.
///
/// Exactly one implementation is active per build (see
/// [`ActivePlatform`](crate::platform::ActivePlatform)). Every capability has
/// a default standing in for a platform that lacks it: no dialogs, no menus,
/// no logger, no-op lifecycle hooks and no keys down.
pub trait Platform {
    fn name(&self) -> &'static str;

    /// Builds the native dialog provider. Called at most once per system.
    fn create_native_dialogs(&self) -> Option<Box<dyn NativeDialogs>> {
        None
    }

    /// Builds the menu provider. Called at most once per system.
    fn create_menus(&self) -> Option<Box<dyn Menus>> {
        None
    }

    fn logger(&self) -> Option<&dyn Logger> {
        None
    }

    fn activate_app(&self) {}

    fn finish_launching(&self) {}

    /// Whether the Wintab tablet flag means anything here.
    fn supports_wintab_api(&self) -> bool {
        false
    }

    fn is_key_pressed(&self, _key: KeyScancode) -> bool {
        false
    }

    fn load_rgba_surface(&self, path: &Path) -> SystemResult<Surface> {
        Surface::load_rgba(path)
    }

    /// Builds the shared outline engine. Called at most once per system.
    fn create_outline_engine(&self, cache_faces: bool) -> Box<dyn OutlineEngine> {
        Box::new(FontdueEngine::new(cache_faces))
    }
}
