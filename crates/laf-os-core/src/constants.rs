// src/constants.rs

// Feature flags
pub const DEFAULT_USE_WINTAB_API: bool = true;
pub const DEFAULT_CACHE_OUTLINE_FACES: bool = true;

// Sprite sheet layout
/// First character stored in a sprite sheet; glyph slot 0 maps to it.
pub const SHEET_FIRST_CHAR: u32 = ' ' as u32;
/// Glyph used for characters the sheet does not cover.
pub const SHEET_FALLBACK_CHAR: u32 = 128;
/// A glyph whose first pixel has this colour marks an unused slot.
pub const SHEET_UNUSED_GLYPH_MARK: u32 = rgba(255, 0, 0, 255);
/// Upper bound on the pixel count of a scaled surface (1 GiB of RGBA).
pub const MAX_SURFACE_PIXELS: usize = 1 << 28;

// Outline fonts
pub const MIN_OUTLINE_PIXEL_HEIGHT: f32 = 1.0;

/// Packs a colour as `0xRRGGBBAA`.
pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) << 24 | (g as u32) << 16 | (b as u32) << 8 | a as u32
}
