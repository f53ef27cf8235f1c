//! Outline (TrueType/OpenType) fonts rasterized with fontdue.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use fontdue::FontSettings;

use crate::constants::MIN_OUTLINE_PIXEL_HEIGHT;
use crate::error::{SystemError, SystemResult};
use crate::font::{FontType, GlyphBitmap, GlyphProvider};

/// Parses outline font files into [`OutlineFont`]s.
///
/// One engine is shared by every outline load of a system, so
/// implementations must not depend on which file they loaded last.
pub trait OutlineEngine {
    fn load_font(&self, path: &Path, pixel_height: f32) -> SystemResult<OutlineFont>;
}

/// Default engine backed by fontdue.
pub struct FontdueEngine {
    cache_faces: bool,
    faces: RefCell<HashMap<PathBuf, Rc<fontdue::Font>>>,
}

impl FontdueEngine {
    pub fn new(cache_faces: bool) -> Self {
        Self {
            cache_faces,
            faces: RefCell::new(HashMap::new()),
        }
    }

    pub fn cached_faces(&self) -> usize {
        self.faces.borrow().len()
    }

    fn parse_face(&self, path: &Path, pixel_height: f32) -> SystemResult<Rc<fontdue::Font>> {
        if let Some(face) = self.faces.borrow().get(path) {
            return Ok(Rc::clone(face));
        }

        let data = std::fs::read(path).map_err(|source| SystemError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = FontSettings {
            scale: pixel_height,
            ..Default::default()
        };
        let face = fontdue::Font::from_bytes(data, settings).map_err(|message| {
            SystemError::InvalidFontData {
                path: path.to_path_buf(),
                message: message.to_string(),
            }
        })?;

        let face = Rc::new(face);
        if self.cache_faces {
            self.faces
                .borrow_mut()
                .insert(path.to_path_buf(), Rc::clone(&face));
        }
        Ok(face)
    }
}

impl Default for FontdueEngine {
    fn default() -> Self {
        Self::new(true)
    }
}

impl OutlineEngine for FontdueEngine {
    fn load_font(&self, path: &Path, pixel_height: f32) -> SystemResult<OutlineFont> {
        if !pixel_height.is_finite() || pixel_height < MIN_OUTLINE_PIXEL_HEIGHT {
            return Err(SystemError::InvalidFontSize { size: pixel_height });
        }

        let face = self.parse_face(path, pixel_height)?;
        tracing::debug!("Loaded outline font {} at {}px", path.display(), pixel_height);
        Ok(OutlineFont {
            face,
            pixel_height,
            path: path.to_path_buf(),
        })
    }
}

/// An outline font bound to one pixel height.
#[derive(Clone)]
pub struct OutlineFont {
    face: Rc<fontdue::Font>,
    pixel_height: f32,
    path: PathBuf,
}

impl OutlineFont {
    pub fn pixel_height(&self) -> f32 {
        self.pixel_height
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether two handles were parsed from the same face data.
    pub fn shares_face_with(&self, other: &OutlineFont) -> bool {
        Rc::ptr_eq(&self.face, &other.face)
    }
}

impl fmt::Debug for OutlineFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutlineFont")
            .field("path", &self.path)
            .field("pixel_height", &self.pixel_height)
            .field("glyphs", &self.face.glyph_count())
            .finish()
    }
}

impl GlyphProvider for OutlineFont {
    fn font_type(&self) -> FontType {
        FontType::Outline
    }

    fn height(&self) -> f32 {
        self.face
            .horizontal_line_metrics(self.pixel_height)
            .map_or(self.pixel_height, |m| m.new_line_size)
    }

    fn advance(&self, ch: char) -> f32 {
        self.face.metrics(ch, self.pixel_height).advance_width
    }

    fn has_glyph(&self, ch: char) -> bool {
        self.face.lookup_glyph_index(ch) != 0
    }

    fn rasterize(&self, ch: char) -> Option<GlyphBitmap> {
        if !self.has_glyph(ch) {
            return None;
        }
        let (metrics, coverage) = self.face.rasterize(ch, self.pixel_height);
        Some(GlyphBitmap {
            width: metrics.width,
            height: metrics.height,
            coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// First TrueType font found in the usual system locations.
    fn find_system_font() -> Option<PathBuf> {
        let candidates = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ];
        candidates
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    #[test]
    fn missing_file_is_io_error() {
        let engine = FontdueEngine::default();
        let err = engine
            .load_font(Path::new("/nonexistent/path/font.ttf"), 16.0)
            .unwrap_err();
        assert!(matches!(err, SystemError::Io { .. }), "got {err}");
        assert_eq!(engine.cached_faces(), 0);
    }

    #[test]
    fn garbage_is_invalid_font_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font at all").unwrap();

        let engine = FontdueEngine::default();
        let err = engine.load_font(&path, 16.0).unwrap_err();
        assert!(matches!(err, SystemError::InvalidFontData { .. }), "got {err}");
    }

    #[test]
    fn rejects_bad_sizes() {
        let engine = FontdueEngine::default();
        for size in [0.0, -3.0, f32::NAN, f32::INFINITY] {
            let err = engine.load_font(Path::new("whatever.ttf"), size).unwrap_err();
            assert!(matches!(err, SystemError::InvalidFontSize { .. }));
        }
    }

    #[test]
    fn cached_face_is_reused_across_heights() {
        let Some(path) = find_system_font() else {
            eprintln!("No system TrueType font found, skipping");
            return;
        };

        let engine = FontdueEngine::default();
        let small = engine.load_font(&path, 12.0).unwrap();
        let large = engine.load_font(&path, 24.0).unwrap();

        assert!(small.shares_face_with(&large));
        assert_eq!(engine.cached_faces(), 1);
        assert!(large.height() > small.height());
        assert!(small.has_glyph('A'));
        assert!(small.rasterize('A').is_some());
        assert!(small.text_length("AAA") > 0.0);
    }

    #[test]
    fn uncached_engine_parses_each_time() {
        let Some(path) = find_system_font() else {
            eprintln!("No system TrueType font found, skipping");
            return;
        };

        let engine = FontdueEngine::new(false);
        let a = engine.load_font(&path, 12.0).unwrap();
        let b = engine.load_font(&path, 12.0).unwrap();
        assert!(!a.shares_face_with(&b));
        assert_eq!(engine.cached_faces(), 0);
    }
}
