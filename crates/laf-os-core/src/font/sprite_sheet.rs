//! Bitmap fonts stored as sprite sheets.
//!
//! The sheet is a grid of glyph cells separated by a key colour, which is
//! whatever colour sits at pixel (0,0). Glyphs are discovered left to right,
//! top to bottom; slot `i` holds character `' ' + i`.

use crate::constants::{SHEET_FALLBACK_CHAR, SHEET_FIRST_CHAR, SHEET_UNUSED_GLYPH_MARK};
use crate::font::{FontType, GlyphBitmap, GlyphProvider};
use crate::surface::Surface;

/// Glyph rectangle in sheet pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone)]
pub struct SpriteSheetFont {
    sheet: Surface,
    /// `None` marks a slot the sheet flagged as unused.
    glyphs: Vec<Option<GlyphRect>>,
}

impl SpriteSheetFont {
    /// Scans `sheet` for glyph cells. Returns `None` if it holds no cells.
    pub fn from_surface(sheet: Surface) -> Option<Self> {
        let glyphs = scan_glyphs(&sheet);
        if glyphs.is_empty() {
            return None;
        }
        tracing::debug!(
            "Sprite sheet {}x{} has {} glyph slots",
            sheet.width(),
            sheet.height(),
            glyphs.len()
        );
        Some(Self { sheet, glyphs })
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn sheet(&self) -> &Surface {
        &self.sheet
    }

    fn slot(&self, ch: char) -> Option<GlyphRect> {
        let index = (ch as u32).checked_sub(SHEET_FIRST_CHAR)?;
        self.glyphs.get(index as usize).copied().flatten()
    }

    /// Glyph rectangle used to draw `ch`, falling back to the sheet's
    /// replacement glyph for uncovered characters.
    pub fn char_bounds(&self, ch: char) -> Option<GlyphRect> {
        self.slot(ch).or_else(|| {
            if ch as u32 == SHEET_FALLBACK_CHAR {
                return None;
            }
            char::from_u32(SHEET_FALLBACK_CHAR).and_then(|fallback| self.slot(fallback))
        })
    }
}

impl GlyphProvider for SpriteSheetFont {
    fn font_type(&self) -> FontType {
        FontType::SpriteSheet
    }

    fn height(&self) -> f32 {
        self.slot(' ').map_or(0.0, |rect| rect.h as f32)
    }

    fn advance(&self, ch: char) -> f32 {
        self.char_bounds(ch).map_or(0.0, |rect| rect.w as f32)
    }

    fn has_glyph(&self, ch: char) -> bool {
        self.slot(ch).is_some()
    }

    fn rasterize(&self, ch: char) -> Option<GlyphBitmap> {
        let rect = self.char_bounds(ch)?;
        let mut coverage = Vec::with_capacity(rect.w as usize * rect.h as usize);
        for y in rect.y..rect.y + rect.h {
            for x in rect.x..rect.x + rect.w {
                coverage.push((self.sheet.pixel(x, y) & 0xff) as u8);
            }
        }
        Some(GlyphBitmap {
            width: rect.w as usize,
            height: rect.h as usize,
            coverage,
        })
    }
}

/// Scan cursor; `h` is the height of the current row strip.
struct Probe {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

fn scan_glyphs(sheet: &Surface) -> Vec<Option<GlyphRect>> {
    let mut glyphs = Vec::new();
    let mut probe = Probe { x: 0, y: 0, w: 1, h: 1 };
    while let Some(slot) = next_glyph(sheet, &mut probe) {
        glyphs.push(slot);
        probe.x += probe.w;
    }
    glyphs
}

/// Advances `probe` to the next glyph cell. The outer `None` means the sheet
/// is exhausted; the inner one means the cell is flagged unused.
fn next_glyph(sheet: &Surface, probe: &mut Probe) -> Option<Option<GlyphRect>> {
    let (width, height) = (sheet.width(), sheet.height());
    let key = sheet.pixel(0, 0);

    while probe.x >= width || sheet.pixel(probe.x, probe.y) == key {
        probe.x += 1;
        if probe.x >= width {
            probe.x = 0;
            probe.y += probe.h;
            probe.h = 1;
            if probe.y >= height {
                return None;
            }
        }
    }

    let first_pixel = sheet.pixel(probe.x, probe.y);

    probe.w = 0;
    while probe.x + probe.w < width && sheet.pixel(probe.x + probe.w, probe.y) != key {
        probe.w += 1;
    }
    probe.h = 0;
    while probe.y + probe.h < height && sheet.pixel(probe.x, probe.y + probe.h) != key {
        probe.h += 1;
    }

    let rect = GlyphRect {
        x: probe.x,
        y: probe.y,
        w: probe.w,
        h: probe.h,
    };
    if first_pixel == SHEET_UNUSED_GLYPH_MARK {
        Some(None)
    } else {
        Some(Some(rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::rgba;

    const KEY: u32 = rgba(255, 0, 255, 255);
    const INK: u32 = rgba(255, 255, 255, 255);
    const BLANK: u32 = rgba(0, 0, 0, 0);
    const RED: u32 = SHEET_UNUSED_GLYPH_MARK;

    /// Builds a one-row sheet: key border, then cells of the given widths
    /// (filled with `fill[i]`) separated by one key column.
    fn row_sheet(cells: &[(u32, u32)], cell_h: u32) -> Surface {
        let width = 1 + cells.iter().map(|(w, _)| w + 1).sum::<u32>();
        let height = cell_h + 2;
        let mut pixels = vec![KEY; (width * height) as usize];
        let mut x0 = 1;
        for (w, fill) in cells {
            for y in 1..=cell_h {
                for x in x0..x0 + w {
                    pixels[(y * width + x) as usize] = *fill;
                }
            }
            x0 += w + 1;
        }
        Surface::from_pixels(width, height, pixels).unwrap()
    }

    #[test]
    fn finds_cells_in_order() {
        let sheet = row_sheet(&[(3, BLANK), (2, INK), (4, INK)], 5);
        let font = SpriteSheetFont::from_surface(sheet).unwrap();

        assert_eq!(font.glyph_count(), 3);
        assert_eq!(font.char_bounds(' '), Some(GlyphRect { x: 1, y: 1, w: 3, h: 5 }));
        assert_eq!(font.char_bounds('!'), Some(GlyphRect { x: 5, y: 1, w: 2, h: 5 }));
        assert_eq!(font.char_bounds('"'), Some(GlyphRect { x: 8, y: 1, w: 4, h: 5 }));
        assert_eq!(font.height(), 5.0);
    }

    #[test]
    fn text_length_sums_advances() {
        let sheet = row_sheet(&[(3, BLANK), (2, INK)], 4);
        let font = SpriteSheetFont::from_surface(sheet).unwrap();
        assert_eq!(font.text_length(" ! !"), 3.0 + 2.0 + 3.0 + 2.0);
    }

    #[test]
    fn red_cells_are_unused_slots() {
        let sheet = row_sheet(&[(3, BLANK), (2, RED), (2, INK)], 4);
        let font = SpriteSheetFont::from_surface(sheet).unwrap();

        assert_eq!(font.glyph_count(), 3);
        assert!(!font.has_glyph('!'));
        assert!(font.has_glyph('"'));
        assert_eq!(font.advance('!'), 0.0);
    }

    #[test]
    fn uncovered_chars_fall_back_to_slot_128() {
        // 96 slots reach code point 127; slot 96 is the replacement glyph.
        let mut cells = vec![(1, INK); 96];
        cells.push((7, INK));
        let sheet = row_sheet(&cells, 3);
        let font = SpriteSheetFont::from_surface(sheet).unwrap();

        assert_eq!(font.glyph_count(), 97);
        assert!(!font.has_glyph('é'));
        assert_eq!(font.advance('é'), 7.0);
        assert_eq!(font.advance('\u{80}'), 7.0);
        assert_eq!(font.advance('A'), 1.0);
        // Control chars are below the first slot and fall back as well.
        assert_eq!(font.advance('\n'), 7.0);
    }

    #[test]
    fn no_fallback_glyph_means_no_glyph() {
        let sheet = row_sheet(&[(3, BLANK)], 3);
        let font = SpriteSheetFont::from_surface(sheet).unwrap();
        assert_eq!(font.char_bounds('x'), None);
        assert!(font.rasterize('x').is_none());
    }

    #[test]
    fn multiple_rows() {
        // Two strips of 2x2 cells.
        //   K K K K K K
        //   K A A K A A
        //   K A A K A A
        //   K K K K K K
        //   K A A K K K
        //   K A A K K K
        let k = KEY;
        let a = INK;
        let pixels = vec![
            k, k, k, k, k, k,
            k, a, a, k, a, a,
            k, a, a, k, a, a,
            k, k, k, k, k, k,
            k, a, a, k, k, k,
            k, a, a, k, k, k,
        ];
        let sheet = Surface::from_pixels(6, 6, pixels).unwrap();
        let font = SpriteSheetFont::from_surface(sheet).unwrap();

        assert_eq!(font.glyph_count(), 3);
        assert_eq!(font.char_bounds('"'), Some(GlyphRect { x: 1, y: 4, w: 2, h: 2 }));
    }

    #[test]
    fn rasterize_reads_alpha() {
        let sheet = row_sheet(&[(2, rgba(10, 20, 30, 200))], 2);
        let font = SpriteSheetFont::from_surface(sheet).unwrap();
        let glyph = font.rasterize(' ').unwrap();
        assert_eq!((glyph.width, glyph.height), (2, 2));
        assert!(glyph.coverage.iter().all(|&a| a == 200));
    }

    #[test]
    fn sheet_without_cells_is_rejected() {
        let sheet = Surface::from_pixels(3, 3, vec![KEY; 9]).unwrap();
        assert!(SpriteSheetFont::from_surface(sheet).is_none());

        let empty = Surface::from_pixels(0, 0, Vec::new()).unwrap();
        assert!(SpriteSheetFont::from_surface(empty).is_none());
    }
}
