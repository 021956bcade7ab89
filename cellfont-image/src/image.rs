//! Owned two-channel images.
//!
//! An [`Image`] pairs a color buffer with a same-sized mask buffer.
//! Mask `0x00` is opaque and `0xFF` is fully transparent; the blit
//! primitive combines the two with the destination according to the
//! active [`BlendMode`](crate::BlendMode).

use std::path::Path;

use log::debug;

use crate::color::{Color, MASK_OPAQUE, MASK_TRANSPARENT};
use crate::error::LoadError;

/// Alpha values at or above this are treated as opaque when loading.
const ALPHA_THRESHOLD: u8 = 0x80;

/// Color + mask pixel buffers of identical dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    /// Row-major color channel (`width * height` entries).
    pub data: Vec<Color>,
    /// Row-major mask channel (`width * height` entries).
    pub mask: Vec<u8>,
}

impl Image {
    /// Allocate a fully transparent image.
    pub fn blank(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            data: vec![Color::TRANSPARENT; len],
            mask: vec![MASK_TRANSPARENT; len],
        }
    }

    /// Decode an image file (any format enabled on the `image` crate).
    ///
    /// Pixels with alpha below 50% become transparent in the mask; all
    /// others are opaque.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let rgba = ::image::open(path)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(LoadError::TooLarge { width, height });
        }
        debug!("Loaded image {}: {width}x{height}", path.display());
        Ok(Self::from_rgba(width, height, rgba.as_raw()))
    }

    /// Build an image from tightly packed RGBA8 bytes.
    ///
    /// # Panics
    ///
    /// Panics if `bytes.len() != width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, bytes: &[u8]) -> Self {
        let pixels: &[Color] = bytemuck::cast_slice(bytes);
        assert_eq!(
            pixels.len(),
            width as usize * height as usize,
            "RGBA buffer does not match {width}x{height}"
        );
        let mask = pixels
            .iter()
            .map(|p| if p.a >= ALPHA_THRESHOLD { MASK_OPAQUE } else { MASK_TRANSPARENT })
            .collect();
        Self {
            width,
            height,
            data: pixels.to_vec(),
            mask,
        }
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Color at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|i| self.data[i])
    }

    /// Mask at `(x, y)`, or `None` outside the image.
    pub fn mask_at(&self, x: u32, y: u32) -> Option<u8> {
        self.index(x, y).map(|i| self.mask[i])
    }

    /// Set both channels at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, color: Color, mask: u8) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = color;
            self.mask[i] = mask;
        }
    }

    /// Flatten color + mask into RGBA8, with masked pixels at alpha 0.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let out: Vec<Color> = self
            .data
            .iter()
            .zip(&self.mask)
            .map(|(&c, &m)| if m == MASK_TRANSPARENT { Color { a: 0, ..c } } else { c })
            .collect();
        bytemuck::cast_slice(&out).to_vec()
    }

    /// Write the image as PNG, encoding the mask into the alpha channel.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), ::image::ImageError> {
        ::image::save_buffer(
            path,
            &self.to_rgba8(),
            self.width,
            self.height,
            ::image::ColorType::Rgba8,
        )
    }
}

/// Write a raw destination buffer as PNG.
pub fn save_buffer_png(
    path: impl AsRef<Path>,
    pixels: &[Color],
    width: u32,
    height: u32,
) -> Result<(), ::image::ImageError> {
    ::image::save_buffer(
        path,
        bytemuck::cast_slice(pixels),
        width,
        height,
        ::image::ColorType::Rgba8,
    )
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_transparent() {
        let img = Image::blank(16, 8);
        assert_eq!(img.len(), 128);
        assert!(img.mask.iter().all(|&m| m == MASK_TRANSPARENT));
        assert!(img.data.iter().all(|&c| c == Color::TRANSPARENT));
    }

    #[test]
    fn test_blank_zero_size() {
        let img = Image::blank(0, 0);
        assert!(img.is_empty());
        assert!(img.pixel(0, 0).is_none());
    }

    #[test]
    fn test_from_rgba_thresholds_alpha() {
        let bytes = [
            255, 0, 0, 255, // opaque red
            0, 255, 0, 0, // transparent green
            0, 0, 255, 0x80, // half alpha -> opaque
            9, 9, 9, 0x7F, // just under -> transparent
        ];
        let img = Image::from_rgba(2, 2, &bytes);
        assert_eq!(img.mask, vec![MASK_OPAQUE, MASK_TRANSPARENT, MASK_OPAQUE, MASK_TRANSPARENT]);
        assert_eq!(img.pixel(0, 0), Some(Color::rgb(255, 0, 0)));
        assert_eq!(img.pixel(0, 1), Some(Color::rgba(0, 0, 255, 0x80)));
    }

    #[test]
    #[should_panic]
    fn test_from_rgba_size_mismatch_panics() {
        Image::from_rgba(2, 2, &[0u8; 12]);
    }

    #[test]
    fn test_set_and_read_back() {
        let mut img = Image::blank(4, 4);
        img.set(3, 2, Color::WHITE, MASK_OPAQUE);
        assert_eq!(img.pixel(3, 2), Some(Color::WHITE));
        assert_eq!(img.mask_at(3, 2), Some(MASK_OPAQUE));
        // Out of bounds is a no-op.
        img.set(4, 0, Color::WHITE, MASK_OPAQUE);
        assert_eq!(img.mask.iter().filter(|&&m| m == MASK_OPAQUE).count(), 1);
    }

    #[test]
    fn test_to_rgba8_clears_masked_alpha() {
        let mut img = Image::blank(2, 1);
        img.data[0] = Color::rgb(1, 2, 3);
        img.data[1] = Color::rgb(4, 5, 6);
        img.mask[0] = MASK_OPAQUE;
        assert_eq!(img.to_rgba8(), vec![1, 2, 3, 255, 4, 5, 6, 0]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Image::load("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
        assert!(!err.to_string().is_empty());
    }
}
