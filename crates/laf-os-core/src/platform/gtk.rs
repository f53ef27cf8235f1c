//! GTK 4 variant for Linux and the BSDs.
//!
//! Dialogs use the portal-aware `gtk::FileDialog` and are driven to
//! completion on the default main context, so `show` stays synchronous.

use std::path::PathBuf;

use gtk4::prelude::*;
use gtk4::{gdk, gio};

use crate::dialogs::{FileDialog, FileDialogKind};
use crate::error::{SystemError, SystemResult};
use crate::keys::KeyScancode;
use crate::traits::{NativeDialogs, Platform};

#[derive(Debug, Default)]
pub struct GtkPlatform;

impl GtkPlatform {
    fn ensure_gtk() -> bool {
        if gtk4::is_initialized() {
            return true;
        }
        match gtk4::init() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("GTK unavailable: {}", e);
                false
            }
        }
    }

    fn modifier_state() -> Option<gdk::ModifierType> {
        if !gtk4::is_initialized() {
            return None;
        }
        let keyboard = gdk::Display::default()?.default_seat()?.keyboard()?;
        Some(keyboard.modifier_state())
    }
}

impl Platform for GtkPlatform {
    fn name(&self) -> &'static str {
        "gtk"
    }

    fn create_native_dialogs(&self) -> Option<Box<dyn NativeDialogs>> {
        if !Self::ensure_gtk() {
            return None;
        }
        Some(Box::new(NativeDialogsGtk))
    }

    // GDK only reports the merged modifier mask, so both sides of a pair read
    // as down together.
    fn is_key_pressed(&self, key: KeyScancode) -> bool {
        let Some(state) = Self::modifier_state() else {
            return false;
        };
        match key {
            KeyScancode::LShift | KeyScancode::RShift => state.contains(gdk::ModifierType::SHIFT_MASK),
            KeyScancode::LControl | KeyScancode::RControl => {
                state.contains(gdk::ModifierType::CONTROL_MASK)
            }
            KeyScancode::Alt => state.contains(gdk::ModifierType::ALT_MASK),
            KeyScancode::LWin | KeyScancode::RWin => state.contains(gdk::ModifierType::SUPER_MASK),
            KeyScancode::AltGr | KeyScancode::Command | KeyScancode::Space => false,
        }
    }
}

pub struct NativeDialogsGtk;

impl NativeDialogs for NativeDialogsGtk {
    fn show(&self, dialog: &FileDialog) -> SystemResult<Option<Vec<PathBuf>>> {
        let native = build_dialog(dialog);
        let context = glib::MainContext::default();
        let parent = None::<&gtk4::Window>;

        let result = match dialog.kind {
            FileDialogKind::OpenFile => context
                .block_on(native.open_future(parent))
                .map(|file| file.path().into_iter().collect()),
            FileDialogKind::OpenFiles => context
                .block_on(native.open_multiple_future(parent))
                .map(|files| paths_from_model(&files)),
            FileDialogKind::OpenFolder => context
                .block_on(native.select_folder_future(parent))
                .map(|file| file.path().into_iter().collect()),
            FileDialogKind::SaveFile => context
                .block_on(native.save_future(parent))
                .map(|file| file.path().into_iter().collect()),
        };

        match result {
            Ok(paths) => Ok(Some(paths)),
            Err(e)
                if e.matches(gtk4::DialogError::Dismissed)
                    || e.matches(gtk4::DialogError::Cancelled) =>
            {
                Ok(None)
            }
            Err(e) => Err(SystemError::NativeDialog {
                message: e.to_string(),
            }),
        }
    }
}

fn build_dialog(dialog: &FileDialog) -> gtk4::FileDialog {
    let native = gtk4::FileDialog::new();
    native.set_modal(true);
    if !dialog.title.is_empty() {
        native.set_title(&dialog.title);
    }
    if let Some(name) = dialog.file_name_with_default_extension() {
        native.set_initial_name(Some(&name.to_string_lossy()));
    }

    if !dialog.filters.is_empty() {
        let store = gio::ListStore::new::<gtk4::FileFilter>();
        for filter in &dialog.filters {
            let native_filter = gtk4::FileFilter::new();
            native_filter.set_name(Some(&filter.description));
            native_filter.add_suffix(&filter.extension);
            store.append(&native_filter);
        }
        native.set_filters(Some(&store));
    }
    native
}

fn paths_from_model(files: &gio::ListModel) -> Vec<PathBuf> {
    (0..files.n_items())
        .filter_map(|i| files.item(i))
        .filter_map(|item| item.downcast::<gio::File>().ok())
        .filter_map(|file| file.path())
        .collect()
}
