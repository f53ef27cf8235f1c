//! Physical key identities and the combined modifier state derived from them.

use bitflags::bitflags;

/// Physical keys that can be polled through [`Platform::is_key_pressed`].
///
/// [`Platform::is_key_pressed`]: crate::traits::Platform::is_key_pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyScancode {
    LShift,
    RShift,
    LControl,
    RControl,
    Alt,
    AltGr,
    Command,
    Space,
    LWin,
    RWin,
}

impl KeyScancode {
    pub const ALL: [KeyScancode; 10] = [
        KeyScancode::LShift,
        KeyScancode::RShift,
        KeyScancode::LControl,
        KeyScancode::RControl,
        KeyScancode::Alt,
        KeyScancode::AltGr,
        KeyScancode::Command,
        KeyScancode::Space,
        KeyScancode::LWin,
        KeyScancode::RWin,
    ];
}

bitflags! {
    /// Logical modifier keys held down at a given moment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u32 {
        const SHIFT = 1 << 0;
        const CTRL  = 1 << 1;
        const ALT   = 1 << 2;
        const CMD   = 1 << 3;
        const SPACE = 1 << 4;
        const WIN   = 1 << 5;
    }
}

/// Folds raw per-key state into a modifier set.
///
/// Every rule is evaluated on its own and the results are OR-ed together.
/// AltGr counts as Ctrl+Alt whether or not the physical Ctrl/Alt keys are down.
pub fn resolve_modifiers<F>(is_pressed: F) -> KeyModifiers
where
    F: Fn(KeyScancode) -> bool,
{
    use KeyScancode::*;

    let mut modifiers = KeyModifiers::empty();
    if is_pressed(LShift) || is_pressed(RShift) {
        modifiers |= KeyModifiers::SHIFT;
    }
    if is_pressed(LControl) || is_pressed(RControl) {
        modifiers |= KeyModifiers::CTRL;
    }
    if is_pressed(Alt) {
        modifiers |= KeyModifiers::ALT;
    }
    if is_pressed(AltGr) {
        modifiers |= KeyModifiers::CTRL | KeyModifiers::ALT;
    }
    if is_pressed(Command) {
        modifiers |= KeyModifiers::CMD;
    }
    if is_pressed(Space) {
        modifiers |= KeyModifiers::SPACE;
    }
    if is_pressed(LWin) || is_pressed(RWin) {
        modifiers |= KeyModifiers::WIN;
    }
    modifiers
}
