//! Fallback platform: no native dialogs, menus, logger or key polling.

use crate::traits::Platform;

#[derive(Debug, Default, Clone, Copy)]
pub struct NonePlatform;

impl Platform for NonePlatform {
    fn name(&self) -> &'static str {
        "none"
    }
}
