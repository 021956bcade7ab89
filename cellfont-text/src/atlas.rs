//! Glyph atlas — a single image holding 256 glyph cells in a 16×16 grid.
//!
//! Cell geometry is derived from the image dimensions alone: a
//! `W × H` image has `W / 16 × H / 16` cells, and byte `c` lives in
//! column `c % 16`, row `c / 16`. Images whose sides are not multiples
//! of 16 are accepted; the leftover pixels on the right and bottom edges
//! are simply never addressed by any cell.
//!
//! Two construction paths are provided:
//!
//! 1. **File-backed** (`GlyphAtlas::from_file`) — decode an image from disk.
//! 2. **Embedded** (`GlyphAtlas::embedded`) — unpack the built-in 1-bpp font.

use std::path::Path;

use cellfont_image::{Color, Image, LoadError, Rect, MASK_OPAQUE, MASK_TRANSPARENT};
use log::{debug, warn};

use crate::font_data::{FONT_DATA, FONT_HEIGHT, FONT_WIDTH};

/// Number of cells along each side of the atlas grid.
pub const GRID_SIZE: u32 = 16;

/// Color given to set bits when unpacking a 1-bpp bitmap.
pub const GLYPH_COLOR: Color = Color::WHITE;

/// An owned glyph atlas image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphAtlas {
    image: Image,
}

impl GlyphAtlas {
    /// Load an atlas image from `path`.
    ///
    /// Any decoder failure is returned as-is; nothing is kept on error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let image = Image::load(path)?;
        Ok(Self::from_image(image))
    }

    /// Use an already-decoded image as the atlas.
    pub fn from_image(image: Image) -> Self {
        if image.width % GRID_SIZE != 0 || image.height % GRID_SIZE != 0 {
            warn!(
                "Atlas {}x{} is not a multiple of {GRID_SIZE}; the last {}px column and {}px row are unused",
                image.width,
                image.height,
                image.width % GRID_SIZE,
                image.height % GRID_SIZE,
            );
        }
        let atlas = Self { image };
        debug!(
            "Glyph atlas {}x{}, cell {}x{}",
            atlas.width(),
            atlas.height(),
            atlas.cell_width(),
            atlas.cell_height()
        );
        atlas
    }

    /// The built-in 8×16 font. Infallible.
    pub fn embedded() -> Self {
        Self::from_packed(FONT_WIDTH, FONT_HEIGHT, &FONT_DATA)
    }

    /// Unpack a 1-bit-per-pixel bitmap (see [`decode_packed`]) into an atlas.
    pub fn from_packed(width: u32, height: u32, bits: &[u8]) -> Self {
        Self::from_image(decode_packed(width, height, bits))
    }

    /// Drop the atlas and its pixel buffers.
    pub fn release(self) {
        debug!("Releasing glyph atlas {}x{}", self.width(), self.height());
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn into_image(self) -> Image {
        self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width
    }

    pub fn height(&self) -> u32 {
        self.image.height
    }

    /// Width of one glyph cell in pixels.
    pub fn cell_width(&self) -> i32 {
        (self.image.width / GRID_SIZE) as i32
    }

    /// Height of one glyph cell in pixels.
    pub fn cell_height(&self) -> i32 {
        (self.image.height / GRID_SIZE) as i32
    }

    /// Top-left corner of the cell for byte `c`.
    pub fn cell_origin(&self, c: u8) -> (i32, i32) {
        let grid = GRID_SIZE as i32;
        let c = c as i32;
        (self.cell_width() * (c % grid), self.cell_height() * (c / grid))
    }

    /// Source rectangle of the cell for byte `c`.
    pub fn cell_rect(&self, c: u8) -> Rect {
        let (x, y) = self.cell_origin(c);
        Rect::new(x, y, self.cell_width(), self.cell_height())
    }
}

/// Unpack a 1-bit-per-pixel bitmap into a two-channel image.
///
/// Byte `i / 8` covers pixels `i..i + 8` in row-major order, bit `j`
/// (LSB first) mapping to pixel `i + j`. Set bits become opaque
/// [`GLYPH_COLOR`]; clear bits become fully transparent. If `bits` is
/// shorter than the image, the remaining pixels stay transparent.
pub fn decode_packed(width: u32, height: u32, bits: &[u8]) -> Image {
    let mut image = Image::blank(width, height);
    let len = image.len();

    for (i, &byte) in bits.iter().enumerate().take(len.div_ceil(8)) {
        let base = i * 8;
        for j in 0..8usize.min(len - base) {
            let p = base + j;
            if (byte >> j) & 1 == 1 {
                image.data[p] = GLYPH_COLOR;
                image.mask[p] = MASK_OPAQUE;
            } else {
                image.data[p] = Color::TRANSPARENT;
                image.mask[p] = MASK_TRANSPARENT;
            }
        }
    }

    image
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque_in_cell(atlas: &GlyphAtlas, c: u8) -> usize {
        let r = atlas.cell_rect(c);
        let mut n = 0;
        for y in r.y..r.y + r.height {
            for x in r.x..r.x + r.width {
                if atlas.image().mask_at(x as u32, y as u32) == Some(MASK_OPAQUE) {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_cell_geometry_from_dimensions() {
        let atlas = GlyphAtlas::from_image(Image::blank(256, 128));
        assert_eq!(atlas.cell_width(), 16);
        assert_eq!(atlas.cell_height(), 8);
    }

    #[test]
    fn test_cell_origin_for_every_byte() {
        let atlas = GlyphAtlas::from_image(Image::blank(160, 320));
        let (cw, ch) = (atlas.cell_width(), atlas.cell_height());
        for c in 0..=255u8 {
            let expected = (cw * (c as i32 % 16), ch * (c as i32 / 16));
            assert_eq!(atlas.cell_origin(c), expected, "byte {c}");
        }
        assert_eq!(atlas.cell_rect(255), Rect::new(150, 300, 10, 20));
    }

    #[test]
    fn test_non_multiple_dimensions_truncate() {
        let atlas = GlyphAtlas::from_image(Image::blank(130, 70));
        assert_eq!(atlas.cell_width(), 8);
        assert_eq!(atlas.cell_height(), 4);
        // Last cell ends before the leftover column/row.
        let last = atlas.cell_rect(255);
        assert_eq!(last.x + last.width, 128);
        assert_eq!(last.y + last.height, 64);
    }

    #[test]
    fn test_tiny_atlas_has_empty_cells() {
        let atlas = GlyphAtlas::from_image(Image::blank(8, 8));
        assert_eq!(atlas.cell_width(), 0);
        assert!(atlas.cell_rect(b'A').is_empty());
    }

    #[test]
    fn test_decode_lsb_first() {
        let img = decode_packed(8, 2, &[0b0000_0101, 0b1000_0000]);
        let opaque: Vec<usize> = img
            .mask
            .iter()
            .enumerate()
            .filter(|(_, &m)| m == MASK_OPAQUE)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(opaque, vec![0, 2, 15]);
        assert_eq!(img.data[0], GLYPH_COLOR);
        assert_eq!(img.data[1], Color::TRANSPARENT);
        assert_eq!(img.mask[1], MASK_TRANSPARENT);
    }

    #[test]
    fn test_decode_short_input_leaves_rest_transparent() {
        let img = decode_packed(16, 1, &[0xFF]);
        assert!(img.mask[..8].iter().all(|&m| m == MASK_OPAQUE));
        assert!(img.mask[8..].iter().all(|&m| m == MASK_TRANSPARENT));
    }

    #[test]
    fn test_decode_partial_last_byte() {
        // 3x3 = 9 pixels; the second byte contributes only one pixel.
        let img = decode_packed(3, 3, &[0x00, 0xFF]);
        assert_eq!(img.mask[8], MASK_OPAQUE);
        assert_eq!(img.mask.iter().filter(|&&m| m == MASK_OPAQUE).count(), 1);
    }

    #[test]
    fn test_embedded_dimensions() {
        let atlas = GlyphAtlas::embedded();
        assert_eq!((atlas.width(), atlas.height()), (FONT_WIDTH, FONT_HEIGHT));
        assert_eq!(atlas.cell_width(), 8);
        assert_eq!(atlas.cell_height(), 16);
    }

    #[test]
    fn test_embedded_is_deterministic() {
        let a = GlyphAtlas::embedded();
        let b = GlyphAtlas::embedded();
        assert_eq!(a.image().data, b.image().data);
        assert_eq!(a.image().mask, b.image().mask);
    }

    #[test]
    fn test_embedded_glyph_cells() {
        let atlas = GlyphAtlas::embedded();
        assert_eq!(opaque_in_cell(&atlas, b' '), 0);
        assert_eq!(opaque_in_cell(&atlas, 0), 0);
        assert_eq!(opaque_in_cell(&atlas, 0xFF), 0);
        for c in [b'A', b'z', b'0', b'~', b'!'] {
            assert!(opaque_in_cell(&atlas, c) > 0, "glyph {:?} is blank", c as char);
        }
    }

    #[test]
    fn test_embedded_only_uses_two_colors() {
        let atlas = GlyphAtlas::embedded();
        let img = atlas.image();
        for (c, m) in img.data.iter().zip(&img.mask) {
            match *m {
                MASK_OPAQUE => assert_eq!(*c, GLYPH_COLOR),
                MASK_TRANSPARENT => assert_eq!(*c, Color::TRANSPARENT),
                other => panic!("unexpected mask value {other:#x}"),
            }
        }
    }

    #[test]
    fn test_from_file_missing_path() {
        let result = GlyphAtlas::from_file("/nonexistent/font.png");
        assert!(result.is_err());
    }

    #[test]
    fn test_release_consumes() {
        let atlas = GlyphAtlas::embedded();
        atlas.release();
    }
}
