//! macOS variant: AppKit panels, the main menu, NSApplication lifecycle and
//! modifier polling through `NSEvent`.
//!
//! AppKit objects may only be touched on the main thread; every entry point
//! checks for a [`MainThreadMarker`] and degrades to "unavailable" without one.

#![allow(unsafe_code)]

use std::path::PathBuf;

use objc2::rc::Retained;
use objc2::{MainThreadMarker, MainThreadOnly};
use objc2_app_kit::{
    NSApplication, NSEvent, NSEventModifierFlags, NSMenu, NSMenuItem, NSModalResponseOK,
    NSOpenPanel, NSSavePanel,
};
use objc2_foundation::NSString;

use crate::dialogs::{FileDialog, FileDialogKind};
use crate::error::{SystemError, SystemResult};
use crate::keys::{KeyModifiers, KeyScancode};
use crate::menus::{Menu, MenuItem, Shortcut};
use crate::traits::{Logger, Menus, NativeDialogs, Platform};

// Device-dependent modifier bits (NX_DEVICE*KEYMASK) used to tell left from right.
const DEVICE_LCTL: usize = 0x0000_0001;
const DEVICE_LSHIFT: usize = 0x0000_0002;
const DEVICE_RSHIFT: usize = 0x0000_0004;
const DEVICE_RCTL: usize = 0x0000_2000;

#[derive(Debug, Default)]
pub struct OsxPlatform {
    logger: OsxLogger,
}

impl Platform for OsxPlatform {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn create_native_dialogs(&self) -> Option<Box<dyn NativeDialogs>> {
        let mtm = MainThreadMarker::new()?;
        Some(Box::new(NativeDialogsOsx { mtm }))
    }

    fn create_menus(&self) -> Option<Box<dyn Menus>> {
        let mtm = MainThreadMarker::new()?;
        Some(Box::new(MenusOsx { mtm }))
    }

    fn logger(&self) -> Option<&dyn Logger> {
        Some(&self.logger)
    }

    fn activate_app(&self) {
        let Some(mtm) = MainThreadMarker::new() else {
            tracing::warn!("activate_app called off the main thread");
            return;
        };
        let app = NSApplication::sharedApplication(mtm);
        #[allow(deprecated)]
        // SAFETY: main thread, shared application instance.
        unsafe {
            app.activateIgnoringOtherApps(true)
        };
    }

    fn finish_launching(&self) {
        let Some(mtm) = MainThreadMarker::new() else {
            tracing::warn!("finish_launching called off the main thread");
            return;
        };
        let app = NSApplication::sharedApplication(mtm);
        // SAFETY: main thread. After this the delegate starts receiving
        // application:openFiles: and similar events.
        unsafe { app.finishLaunching() };
    }

    fn is_key_pressed(&self, key: KeyScancode) -> bool {
        // SAFETY: class property read, no receiver state involved.
        let flags = unsafe { NSEvent::modifierFlags_class() };
        let device = flags.0;
        match key {
            KeyScancode::LShift => device & DEVICE_LSHIFT != 0,
            KeyScancode::RShift => device & DEVICE_RSHIFT != 0,
            KeyScancode::LControl => device & DEVICE_LCTL != 0,
            KeyScancode::RControl => device & DEVICE_RCTL != 0,
            KeyScancode::Alt => flags.contains(NSEventModifierFlags::Option),
            KeyScancode::Command => flags.contains(NSEventModifierFlags::Command),
            KeyScancode::AltGr | KeyScancode::Space | KeyScancode::LWin | KeyScancode::RWin => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct OsxLogger;

impl Logger for OsxLogger {
    fn log_error(&self, message: &str) {
        tracing::error!(target: "laf_os::osx", "{}", message);
    }
}

pub struct NativeDialogsOsx {
    mtm: MainThreadMarker,
}

impl NativeDialogs for NativeDialogsOsx {
    fn show(&self, dialog: &FileDialog) -> SystemResult<Option<Vec<PathBuf>>> {
        match dialog.kind {
            FileDialogKind::SaveFile => self.show_save(dialog),
            _ => self.show_open(dialog),
        }
    }
}

impl NativeDialogsOsx {
    fn show_open(&self, dialog: &FileDialog) -> SystemResult<Option<Vec<PathBuf>>> {
        // SAFETY: constructed and run on the main thread (we hold `mtm`).
        unsafe {
            let panel = NSOpenPanel::openPanel(self.mtm);
            let folders = dialog.kind == FileDialogKind::OpenFolder;
            panel.setCanChooseFiles(!folders);
            panel.setCanChooseDirectories(folders);
            panel.setAllowsMultipleSelection(dialog.kind.allows_multiple());
            if !dialog.title.is_empty() {
                panel.setMessage(Some(&NSString::from_str(&dialog.title)));
            }

            if panel.runModal() != NSModalResponseOK {
                return Ok(None);
            }

            let paths: Vec<PathBuf> = panel
                .URLs()
                .iter()
                .filter_map(|url| url.path())
                .map(|path| PathBuf::from(path.to_string()))
                .collect();
            if paths.is_empty() {
                return Err(SystemError::NativeDialog {
                    message: "open panel returned no file URLs".to_string(),
                });
            }
            Ok(Some(paths))
        }
    }

    fn show_save(&self, dialog: &FileDialog) -> SystemResult<Option<Vec<PathBuf>>> {
        // SAFETY: constructed and run on the main thread (we hold `mtm`).
        unsafe {
            let panel = NSSavePanel::savePanel(self.mtm);
            panel.setCanCreateDirectories(true);
            if !dialog.title.is_empty() {
                panel.setMessage(Some(&NSString::from_str(&dialog.title)));
            }
            if let Some(name) = dialog.file_name_with_default_extension() {
                panel.setNameFieldStringValue(&NSString::from_str(&name.to_string_lossy()));
            }

            if panel.runModal() != NSModalResponseOK {
                return Ok(None);
            }

            match panel.URL().and_then(|url| url.path()) {
                Some(path) => Ok(Some(vec![PathBuf::from(path.to_string())])),
                None => Err(SystemError::NativeDialog {
                    message: "save panel returned no file URL".to_string(),
                }),
            }
        }
    }
}

pub struct MenusOsx {
    mtm: MainThreadMarker,
}

impl Menus for MenusOsx {
    fn set_app_menu(&self, menu: Option<&Menu>) -> SystemResult<()> {
        let app = NSApplication::sharedApplication(self.mtm);
        let native = menu.map(|menu| self.build_menu("", menu));
        // SAFETY: main thread; AppKit retains the menu.
        unsafe { app.setMainMenu(native.as_deref()) };
        Ok(())
    }
}

impl MenusOsx {
    fn build_menu(&self, title: &str, menu: &Menu) -> Retained<NSMenu> {
        // SAFETY: all objects are created and wired on the main thread.
        unsafe {
            let native = NSMenu::initWithTitle(NSMenu::alloc(self.mtm), &NSString::from_str(title));
            for item in &menu.items {
                let native_item = match item {
                    MenuItem::Separator => NSMenuItem::separatorItem(self.mtm),
                    MenuItem::Action {
                        id,
                        text,
                        shortcut,
                        enabled,
                    } => {
                        let key = shortcut
                            .as_ref()
                            .map(|s| s.key.to_lowercase().to_string())
                            .unwrap_or_default();
                        let native_item = NSMenuItem::initWithTitle_action_keyEquivalent(
                            NSMenuItem::alloc(self.mtm),
                            &NSString::from_str(text),
                            None,
                            &NSString::from_str(&key),
                        );
                        if let Some(shortcut) = shortcut {
                            native_item.setKeyEquivalentModifierMask(modifier_mask(shortcut));
                        }
                        native_item.setTag(*id as isize);
                        native_item.setEnabled(*enabled);
                        native_item
                    }
                    MenuItem::Submenu { text, menu } => {
                        let native_item = NSMenuItem::initWithTitle_action_keyEquivalent(
                            NSMenuItem::alloc(self.mtm),
                            &NSString::from_str(text),
                            None,
                            &NSString::from_str(""),
                        );
                        let submenu = self.build_menu(text, menu);
                        native_item.setSubmenu(Some(&submenu));
                        native_item
                    }
                };
                native.addItem(&native_item);
            }
            native
        }
    }
}

fn modifier_mask(shortcut: &Shortcut) -> NSEventModifierFlags {
    let mut mask = NSEventModifierFlags::empty();
    if shortcut.modifiers.contains(KeyModifiers::SHIFT) {
        mask |= NSEventModifierFlags::Shift;
    }
    if shortcut.modifiers.contains(KeyModifiers::CTRL) {
        mask |= NSEventModifierFlags::Control;
    }
    if shortcut.modifiers.contains(KeyModifiers::ALT) {
        mask |= NSEventModifierFlags::Option;
    }
    if shortcut.modifiers.contains(KeyModifiers::CMD) {
        mask |= NSEventModifierFlags::Command;
    }
    mask
}
