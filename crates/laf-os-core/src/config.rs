// src/config.rs
use crate::constants::{DEFAULT_CACHE_OUTLINE_FACES, DEFAULT_USE_WINTAB_API};

#[derive(Clone, Debug)]
pub struct SystemConfig {
    /// Use the Wintab tablet API for pen input. Only meaningful on Windows;
    /// other platforms accept and ignore it.
    pub use_wintab_api: bool,
    /// Keep parsed outline faces around so the same file loaded at another
    /// pixel height is not parsed again.
    pub cache_outline_faces: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            use_wintab_api: DEFAULT_USE_WINTAB_API,
            cache_outline_faces: DEFAULT_CACHE_OUTLINE_FACES,
        }
    }
}

impl SystemConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wintab_api(mut self, enabled: bool) -> Self {
        self.use_wintab_api = enabled;
        self
    }

    pub fn with_outline_face_cache(mut self, enabled: bool) -> Self {
        self.cache_outline_faces = enabled;
        self
    }
}
