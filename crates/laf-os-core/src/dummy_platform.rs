//! Dummy platform for exercising the facade without a native toolkit

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::dialogs::FileDialog;
use crate::error::SystemResult;
use crate::font::{FontdueEngine, OutlineEngine};
use crate::keys::KeyScancode;
use crate::menus::Menu;
use crate::surface::Surface;
use crate::traits::{Logger, Menus, NativeDialogs, Platform};

/// Everything the dummy platform and its services record.
///
/// Shared through an `Rc` so tests keep a handle after the platform has been
/// moved into a system.
#[derive(Default)]
pub struct DummyState {
    pub native_dialogs_requested: Cell<usize>,
    pub native_dialogs_created: Cell<usize>,
    pub menus_created: Cell<usize>,
    pub outline_engines_created: Cell<usize>,
    pub surfaces_loaded: Cell<usize>,
    pub activations: Cell<usize>,
    pub launches: Cell<usize>,
    pub shown_dialogs: RefCell<Vec<FileDialog>>,
    pub app_menu: RefCell<Option<Menu>>,
    pub log: RefCell<Vec<String>>,
    pressed: RefCell<HashSet<KeyScancode>>,
}

impl DummyState {
    pub fn press(&self, key: KeyScancode) {
        self.pressed.borrow_mut().insert(key);
    }

    pub fn release(&self, key: KeyScancode) {
        self.pressed.borrow_mut().remove(&key);
    }

    pub fn release_all(&self) {
        self.pressed.borrow_mut().clear();
    }

    pub fn is_pressed(&self, key: KeyScancode) -> bool {
        self.pressed.borrow().contains(&key)
    }
}

/// Platform whose capabilities are switched on one by one.
#[derive(Default)]
pub struct DummyPlatform {
    state: Rc<DummyState>,
    native_dialogs: bool,
    menus: bool,
    wintab: bool,
    logger: Option<DummyLogger>,
}

impl DummyPlatform {
    /// A platform with no optional capability at all.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_native_dialogs(mut self) -> Self {
        self.native_dialogs = true;
        self
    }

    pub fn with_menus(mut self) -> Self {
        self.menus = true;
        self
    }

    pub fn with_wintab(mut self) -> Self {
        self.wintab = true;
        self
    }

    pub fn with_logger(mut self) -> Self {
        self.logger = Some(DummyLogger {
            state: Rc::clone(&self.state),
        });
        self
    }

    pub fn state(&self) -> Rc<DummyState> {
        Rc::clone(&self.state)
    }
}

impl Platform for DummyPlatform {
    fn name(&self) -> &'static str {
        "dummy"
    }

    fn create_native_dialogs(&self) -> Option<Box<dyn NativeDialogs>> {
        self.state
            .native_dialogs_requested
            .set(self.state.native_dialogs_requested.get() + 1);
        if !self.native_dialogs {
            return None;
        }
        self.state
            .native_dialogs_created
            .set(self.state.native_dialogs_created.get() + 1);
        Some(Box::new(DummyNativeDialogs {
            state: Rc::clone(&self.state),
        }))
    }

    fn create_menus(&self) -> Option<Box<dyn Menus>> {
        if !self.menus {
            return None;
        }
        self.state.menus_created.set(self.state.menus_created.get() + 1);
        Some(Box::new(DummyMenus {
            state: Rc::clone(&self.state),
        }))
    }

    fn logger(&self) -> Option<&dyn Logger> {
        self.logger.as_ref().map(|logger| logger as &dyn Logger)
    }

    fn activate_app(&self) {
        self.state.activations.set(self.state.activations.get() + 1);
    }

    fn finish_launching(&self) {
        self.state.launches.set(self.state.launches.get() + 1);
    }

    fn supports_wintab_api(&self) -> bool {
        self.wintab
    }

    fn is_key_pressed(&self, key: KeyScancode) -> bool {
        self.state.is_pressed(key)
    }

    fn load_rgba_surface(&self, path: &Path) -> SystemResult<Surface> {
        self.state
            .surfaces_loaded
            .set(self.state.surfaces_loaded.get() + 1);
        Surface::load_rgba(path)
    }

    fn create_outline_engine(&self, cache_faces: bool) -> Box<dyn OutlineEngine> {
        self.state
            .outline_engines_created
            .set(self.state.outline_engines_created.get() + 1);
        Box::new(FontdueEngine::new(cache_faces))
    }
}

/// Records every request and "chooses" the requested file name.
pub struct DummyNativeDialogs {
    state: Rc<DummyState>,
}

impl NativeDialogs for DummyNativeDialogs {
    fn show(&self, dialog: &FileDialog) -> SystemResult<Option<Vec<PathBuf>>> {
        self.state.shown_dialogs.borrow_mut().push(dialog.clone());
        Ok(dialog.file_name_with_default_extension().map(|path| vec![path]))
    }
}

/// Remembers the last installed app menu.
pub struct DummyMenus {
    state: Rc<DummyState>,
}

impl Menus for DummyMenus {
    fn set_app_menu(&self, menu: Option<&Menu>) -> SystemResult<()> {
        *self.state.app_menu.borrow_mut() = menu.cloned();
        Ok(())
    }
}

pub struct DummyLogger {
    state: Rc<DummyState>,
}

impl Logger for DummyLogger {
    fn log_error(&self, message: &str) {
        self.state.log.borrow_mut().push(message.to_string());
    }
}
