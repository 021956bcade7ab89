//! Pixel types shared by images and destination buffers.
//!
//! `Color` derives `bytemuck::Pod` + `Zeroable` so whole buffers can be
//! viewed as raw RGBA8 bytes for encoding without a copy.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Mask value for a fully opaque pixel.
pub const MASK_OPAQUE: u8 = 0x00;
/// Mask value for a fully transparent pixel.
pub const MASK_TRANSPARENT: u8 = 0xFF;

/// An 8-bit-per-channel RGBA pixel.
///
/// Serialized as a `[r, g, b, a]` array.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 0xFF)
    }

    /// Apply `f` to each channel pair of `self` and `other`.
    #[inline]
    pub(crate) fn zip_with(self, other: Color, f: impl Fn(u8, u8) -> u8) -> Color {
        Color {
            r: f(self.r, other.r),
            g: f(self.g, other.g),
            b: f(self.b, other.b),
            a: f(self.a, other.a),
        }
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Color> for [u8; 4] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}
