//! UI-thread event queue.
//!
//! Platform variants push events; the host drains them. There is one queue
//! per UI thread, reachable through [`EventQueue::instance`].

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;

use crate::keys::{KeyModifiers, KeyScancode};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The user asked the application to quit.
    CloseApp,
    /// Files were dropped on a window or opened through the OS.
    DropFiles(Vec<PathBuf>),
    KeyDown {
        scancode: KeyScancode,
        modifiers: KeyModifiers,
        unicode: Option<char>,
    },
    KeyUp {
        scancode: KeyScancode,
        modifiers: KeyModifiers,
    },
}

#[derive(Debug, Default)]
pub struct EventQueue {
    events: RefCell<VecDeque<Event>>,
}

thread_local! {
    static EVENT_QUEUE: Rc<EventQueue> = Rc::new(EventQueue::default());
}

impl EventQueue {
    /// The queue owned by the current UI thread, created on first use.
    pub fn instance() -> Rc<EventQueue> {
        EVENT_QUEUE.with(Rc::clone)
    }

    pub fn queue_event(&self, event: Event) {
        self.events.borrow_mut().push_back(event);
    }

    /// Pops the oldest pending event without blocking.
    pub fn get_event(&self) -> Option<Event> {
        self.events.borrow_mut().pop_front()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }
}
