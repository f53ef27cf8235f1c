//! Lazily constructed platform services.
//!
//! Each service is built on first request, at most once, and the outcome is
//! remembered even when the platform had nothing to offer. Everything here
//! lives on the UI thread, so plain `RefCell`s are enough.

use std::cell::RefCell;
use std::rc::Rc;

use crate::font::OutlineEngine;
use crate::traits::{Menus, NativeDialogs, Platform};

enum SlotState<T: ?Sized> {
    Empty,
    Ready(Option<Rc<T>>),
    Disposed,
}

/// Owning slot filled by the first `get_or_init` call.
pub struct LazySlot<T: ?Sized> {
    state: RefCell<SlotState<T>>,
}

impl<T: ?Sized> Default for LazySlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> LazySlot<T> {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(SlotState::Empty),
        }
    }

    /// Returns the stored value, running `init` only if the slot was never
    /// filled. A disposed slot yields `None` and never runs `init`.
    pub fn get_or_init<F>(&self, init: F) -> Option<Rc<T>>
    where
        F: FnOnce() -> Option<Box<T>>,
    {
        match &*self.state.borrow() {
            SlotState::Ready(value) => return value.clone(),
            SlotState::Disposed => return None,
            SlotState::Empty => {}
        }

        let value: Option<Rc<T>> = init().map(Rc::from);
        *self.state.borrow_mut() = SlotState::Ready(value.clone());
        value
    }

    pub fn is_initialized(&self) -> bool {
        matches!(&*self.state.borrow(), SlotState::Ready(_))
    }

    pub fn is_disposed(&self) -> bool {
        matches!(&*self.state.borrow(), SlotState::Disposed)
    }

    /// Drops the owned value and seals the slot. Returns `false` if it was
    /// already disposed.
    pub fn dispose(&self) -> bool {
        let previous = std::mem::replace(&mut *self.state.borrow_mut(), SlotState::Disposed);
        !matches!(previous, SlotState::Disposed)
    }
}

/// The services a system owns: native dialogs, menus and the outline engine.
#[derive(Default)]
pub struct ServiceRegistry {
    native_dialogs: LazySlot<dyn NativeDialogs>,
    menus: LazySlot<dyn Menus>,
    outline_engine: LazySlot<dyn OutlineEngine>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn native_dialogs<P>(&self, platform: &P) -> Option<Rc<dyn NativeDialogs>>
    where
        P: Platform + ?Sized,
    {
        self.native_dialogs.get_or_init(|| {
            let dialogs = platform.create_native_dialogs();
            tracing::debug!(
                "Native dialogs for {}: {}",
                platform.name(),
                if dialogs.is_some() { "created" } else { "unavailable" }
            );
            dialogs
        })
    }

    pub fn menus<P>(&self, platform: &P) -> Option<Rc<dyn Menus>>
    where
        P: Platform + ?Sized,
    {
        self.menus.get_or_init(|| {
            let menus = platform.create_menus();
            tracing::debug!(
                "Menus for {}: {}",
                platform.name(),
                if menus.is_some() { "created" } else { "unavailable" }
            );
            menus
        })
    }

    /// The shared outline engine; `None` only once the registry is disposed.
    pub fn outline_engine<P>(&self, platform: &P, cache_faces: bool) -> Option<Rc<dyn OutlineEngine>>
    where
        P: Platform + ?Sized,
    {
        self.outline_engine.get_or_init(|| {
            tracing::debug!("Creating outline font engine");
            Some(platform.create_outline_engine(cache_faces))
        })
    }

    pub fn has_native_dialogs(&self) -> bool {
        self.native_dialogs.is_initialized()
    }

    pub fn has_menus(&self) -> bool {
        self.menus.is_initialized()
    }

    pub fn has_outline_engine(&self) -> bool {
        self.outline_engine.is_initialized()
    }

    /// Releases every owned service. Safe to call more than once.
    pub fn dispose(&self) {
        let dialogs = self.native_dialogs.dispose();
        let menus = self.menus.dispose();
        let engine = self.outline_engine.dispose();
        if dialogs || menus || engine {
            tracing::debug!("Service registry disposed");
        }
    }
}
