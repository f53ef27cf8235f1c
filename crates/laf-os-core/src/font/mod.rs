//! Fonts loaded through the OS facade
//!
//! Two unrelated representations live behind one [`Font`] type: bitmap
//! sprite sheets with fixed glyph rectangles, and outline fonts rasterized on
//! demand by the shared [`OutlineEngine`]. Both answer the same
//! [`GlyphProvider`] queries.

pub mod outline;
pub mod sprite_sheet;

pub use outline::{FontdueEngine, OutlineEngine, OutlineFont};
pub use sprite_sheet::{GlyphRect, SpriteSheetFont};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontType {
    SpriteSheet,
    Outline,
}

/// 8-bit coverage bitmap of a single glyph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
    pub width: usize,
    pub height: usize,
    pub coverage: Vec<u8>,
}

/// Measuring and rasterizing glyphs
pub trait GlyphProvider {
    fn font_type(&self) -> FontType;

    /// Line height in pixels.
    fn height(&self) -> f32;

    /// Horizontal advance of `ch` in pixels, 0 when the font cannot draw it.
    fn advance(&self, ch: char) -> f32;

    /// Whether the font has a dedicated glyph for `ch`.
    fn has_glyph(&self, ch: char) -> bool;

    fn rasterize(&self, ch: char) -> Option<GlyphBitmap>;

    fn text_length(&self, text: &str) -> f32 {
        text.chars().map(|ch| self.advance(ch)).sum()
    }
}

/// A loaded font of either kind.
#[derive(Debug, Clone)]
pub enum Font {
    SpriteSheet(SpriteSheetFont),
    Outline(OutlineFont),
}

impl Font {
    fn provider(&self) -> &dyn GlyphProvider {
        match self {
            Font::SpriteSheet(font) => font,
            Font::Outline(font) => font,
        }
    }

    pub fn as_sprite_sheet(&self) -> Option<&SpriteSheetFont> {
        match self {
            Font::SpriteSheet(font) => Some(font),
            Font::Outline(_) => None,
        }
    }

    pub fn as_outline(&self) -> Option<&OutlineFont> {
        match self {
            Font::Outline(font) => Some(font),
            Font::SpriteSheet(_) => None,
        }
    }
}

impl GlyphProvider for Font {
    fn font_type(&self) -> FontType {
        self.provider().font_type()
    }

    fn height(&self) -> f32 {
        self.provider().height()
    }

    fn advance(&self, ch: char) -> f32 {
        self.provider().advance(ch)
    }

    fn has_glyph(&self, ch: char) -> bool {
        self.provider().has_glyph(ch)
    }

    fn rasterize(&self, ch: char) -> Option<GlyphBitmap> {
        self.provider().rasterize(ch)
    }

    fn text_length(&self, text: &str) -> f32 {
        self.provider().text_length(text)
    }
}

impl From<SpriteSheetFont> for Font {
    fn from(font: SpriteSheetFont) -> Self {
        Font::SpriteSheet(font)
    }
}

impl From<OutlineFont> for Font {
    fn from(font: OutlineFont) -> Self {
        Font::Outline(font)
    }
}
