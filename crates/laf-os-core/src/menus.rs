//! Application menu model handed to [`Menus::set_app_menu`].
//!
//! [`Menus::set_app_menu`]: crate::traits::Menus::set_app_menu

use crate::keys::KeyModifiers;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub key: char,
    pub modifiers: KeyModifiers,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Action {
        id: u32,
        text: String,
        shortcut: Option<Shortcut>,
        enabled: bool,
    },
    Submenu {
        text: String,
        menu: Menu,
    },
    Separator,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    pub items: Vec<MenuItem>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(mut self, id: u32, text: &str) -> Self {
        self.items.push(MenuItem::Action {
            id,
            text: text.to_string(),
            shortcut: None,
            enabled: true,
        });
        self
    }

    pub fn action_with_shortcut(mut self, id: u32, text: &str, shortcut: Shortcut) -> Self {
        self.items.push(MenuItem::Action {
            id,
            text: text.to_string(),
            shortcut: Some(shortcut),
            enabled: true,
        });
        self
    }

    pub fn submenu(mut self, text: &str, menu: Menu) -> Self {
        self.items.push(MenuItem::Submenu {
            text: text.to_string(),
            menu,
        });
        self
    }

    pub fn separator(mut self) -> Self {
        self.items.push(MenuItem::Separator);
        self
    }

    /// Looks up an action by id, descending into submenus.
    pub fn find_action(&self, wanted: u32) -> Option<&MenuItem> {
        self.items.iter().find_map(|item| match item {
            MenuItem::Action { id, .. } if *id == wanted => Some(item),
            MenuItem::Submenu { menu, .. } => menu.find_action(wanted),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
