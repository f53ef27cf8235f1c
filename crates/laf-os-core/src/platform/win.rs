//! Windows variant: common file dialogs, async key state and the Wintab flag.
//!
//! All Win32 FFI for the crate lives in this file.

#![allow(unsafe_code)]

use std::path::PathBuf;

use windows::core::{PCWSTR, PWSTR};
use windows::Win32::UI::Controls::Dialogs::{
    CommDlgExtendedError, GetOpenFileNameW, GetSaveFileNameW, OFN_ALLOWMULTISELECT, OFN_EXPLORER,
    OFN_FILEMUSTEXIST, OFN_HIDEREADONLY, OFN_NOCHANGEDIR, OFN_OVERWRITEPROMPT, OFN_PATHMUSTEXIST,
    OPENFILENAMEW,
};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    GetAsyncKeyState, VIRTUAL_KEY, VK_LCONTROL, VK_LMENU, VK_LSHIFT, VK_LWIN, VK_RCONTROL, VK_RMENU,
    VK_RSHIFT, VK_RWIN, VK_SPACE,
};

use crate::dialogs::{FileDialog, FileDialogKind};
use crate::error::{SystemError, SystemResult};
use crate::keys::KeyScancode;
use crate::traits::{NativeDialogs, Platform};

/// Buffer size in `WCHAR`s; large enough for `\\?\` paths and multi-select
/// results.
const PATH_BUF_LEN: usize = 32_768;

#[derive(Debug, Default)]
pub struct WinPlatform;

impl Platform for WinPlatform {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn create_native_dialogs(&self) -> Option<Box<dyn NativeDialogs>> {
        Some(Box::new(NativeDialogsWin32))
    }

    fn supports_wintab_api(&self) -> bool {
        true
    }

    fn is_key_pressed(&self, key: KeyScancode) -> bool {
        let Some(vk) = virtual_key(key) else {
            return false;
        };
        // SAFETY: GetAsyncKeyState only reads global keyboard state.
        let state = unsafe { GetAsyncKeyState(i32::from(vk.0)) };
        // High bit set means the key is down right now.
        state < 0
    }
}

fn virtual_key(key: KeyScancode) -> Option<VIRTUAL_KEY> {
    match key {
        KeyScancode::LShift => Some(VK_LSHIFT),
        KeyScancode::RShift => Some(VK_RSHIFT),
        KeyScancode::LControl => Some(VK_LCONTROL),
        KeyScancode::RControl => Some(VK_RCONTROL),
        KeyScancode::Alt => Some(VK_LMENU),
        KeyScancode::AltGr => Some(VK_RMENU),
        KeyScancode::Space => Some(VK_SPACE),
        KeyScancode::LWin => Some(VK_LWIN),
        KeyScancode::RWin => Some(VK_RWIN),
        KeyScancode::Command => None,
    }
}

pub struct NativeDialogsWin32;

impl NativeDialogs for NativeDialogsWin32 {
    fn show(&self, dialog: &FileDialog) -> SystemResult<Option<Vec<PathBuf>>> {
        if dialog.kind == FileDialogKind::OpenFolder {
            return Err(SystemError::UnsupportedDialog {
                kind: dialog.kind.as_str(),
            });
        }

        let mut buf = vec![0u16; PATH_BUF_LEN];
        if let Some(name) = dialog.file_name.as_ref() {
            let wide: Vec<u16> = name.to_string_lossy().encode_utf16().collect();
            let len = wide.len().min(PATH_BUF_LEN - 1);
            buf[..len].copy_from_slice(&wide[..len]);
        }

        let filter = filter_string(dialog);
        let title = wide_z(&dialog.title);
        let def_ext = dialog.default_extension.as_deref().map(wide_z);

        let flags = OFN_NOCHANGEDIR | OFN_PATHMUSTEXIST | OFN_HIDEREADONLY | match dialog.kind {
            FileDialogKind::SaveFile => OFN_OVERWRITEPROMPT,
            FileDialogKind::OpenFiles => OFN_FILEMUSTEXIST | OFN_ALLOWMULTISELECT | OFN_EXPLORER,
            _ => OFN_FILEMUSTEXIST,
        };

        let mut ofn = OPENFILENAMEW {
            lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
            lpstrFilter: PCWSTR(filter.as_ptr()),
            lpstrFile: PWSTR(buf.as_mut_ptr()),
            nMaxFile: PATH_BUF_LEN as u32,
            lpstrTitle: if dialog.title.is_empty() {
                PCWSTR::null()
            } else {
                PCWSTR(title.as_ptr())
            },
            lpstrDefExt: def_ext
                .as_ref()
                .map_or(PCWSTR::null(), |ext| PCWSTR(ext.as_ptr())),
            Flags: flags,
            ..Default::default()
        };

        // SAFETY: `ofn` is fully initialised and every buffer it points to
        // (`buf`, `filter`, `title`, `def_ext`) outlives the call. The dialog
        // runs modally on the calling (UI) thread.
        let ok = unsafe {
            if dialog.kind == FileDialogKind::SaveFile {
                GetSaveFileNameW(&mut ofn)
            } else {
                GetOpenFileNameW(&mut ofn)
            }
        };

        if ok.as_bool() {
            return Ok(Some(paths_from_buf(&buf, dialog.kind.allows_multiple())));
        }

        // SAFETY: reads the thread's last common-dialog error.
        let code = unsafe { CommDlgExtendedError() }.0;
        if code == 0 {
            Ok(None)
        } else {
            Err(SystemError::NativeDialog {
                message: format!("common dialog error {code:#06x}"),
            })
        }
    }
}

/// Null-terminated UTF-16 copy of `s`.
fn wide_z(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// `"Desc (*.ext)\0*.ext\0...\0\0"`, with an "All files" entry at the end.
fn filter_string(dialog: &FileDialog) -> Vec<u16> {
    let mut filter = String::new();
    for f in &dialog.filters {
        filter.push_str(&format!("{} (*.{})\0*.{}\0", f.description, f.extension, f.extension));
    }
    filter.push_str("All Files (*.*)\0*.*\0\0");
    filter.encode_utf16().collect()
}

/// Splits the result buffer. With multi-select the buffer holds the directory
/// followed by file names, each null-terminated; a single pick is just the
/// full path.
fn paths_from_buf(buf: &[u16], multiple: bool) -> Vec<PathBuf> {
    let parts: Vec<String> = buf
        .split(|&c| c == 0)
        .take_while(|part| !part.is_empty())
        .map(String::from_utf16_lossy)
        .collect();

    match parts.as_slice() {
        [] => Vec::new(),
        [single] => vec![PathBuf::from(single)],
        [dir, files @ ..] if multiple => files.iter().map(|f| PathBuf::from(dir).join(f)).collect(),
        [first, ..] => vec![PathBuf::from(first)],
    }
}
