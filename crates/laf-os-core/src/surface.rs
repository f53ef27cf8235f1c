//! In-memory RGBA surfaces used as glyph sheets.

use std::path::Path;

use crate::constants::{rgba, MAX_SURFACE_PIXELS};
use crate::error::{SystemError, SystemResult};

/// An RGBA bitmap, one `0xRRGGBBAA` word per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Surface {
    /// Wraps existing pixels. Returns `None` if the buffer size does not match.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(Self { width, height, pixels })
    }

    /// Decodes an image file into an RGBA surface.
    pub fn load_rgba(path: &Path) -> SystemResult<Self> {
        let image = image::open(path).map_err(|err| match err {
            image::ImageError::IoError(source) => SystemError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => SystemError::SurfaceDecode {
                path: path.to_path_buf(),
                message: other.to_string(),
            },
        })?;

        let rgba8 = image.to_rgba8();
        let (width, height) = rgba8.dimensions();
        let pixels = rgba8
            .pixels()
            .map(|p| rgba(p.0[0], p.0[1], p.0[2], p.0[3]))
            .collect();

        tracing::debug!("Loaded {}x{} surface from {}", width, height, path.display());
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`; out-of-bounds reads return transparent black.
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.pixels[(y * self.width + x) as usize]
    }

    /// Enlarges the surface by an integer factor with nearest-neighbour
    /// sampling. Factors of 0 and 1 leave it unchanged.
    ///
    /// Fails without touching the surface when the scaled size would
    /// overflow or exceed [`MAX_SURFACE_PIXELS`].
    pub fn apply_scale(&mut self, scale: u32) -> SystemResult<()> {
        if scale <= 1 || self.pixels.is_empty() {
            return Ok(());
        }

        let invalid = || SystemError::InvalidScale {
            scale,
            width: self.width,
            height: self.height,
        };
        let new_width = self.width.checked_mul(scale).ok_or_else(invalid)?;
        let new_height = self.height.checked_mul(scale).ok_or_else(invalid)?;
        let count = (new_width as usize)
            .checked_mul(new_height as usize)
            .filter(|&count| count <= MAX_SURFACE_PIXELS)
            .ok_or_else(invalid)?;

        let mut scaled = Vec::with_capacity(count);
        for y in 0..new_height {
            let row = (y / scale * self.width) as usize;
            for x in 0..new_width {
                scaled.push(self.pixels[row + (x / scale) as usize]);
            }
        }

        self.width = new_width;
        self.height = new_height;
        self.pixels = scaled;
        Ok(())
    }
}
