//! # cellfont-text
//!
//! Bitmap-font text rendering: a 16×16 grid of fixed-size glyph cells
//! packed into one image, measured and blitted byte by byte.
//!
//! ## Architecture
//!
//! ```text
//! GlyphAtlas (file-backed or embedded 1-bpp font)
//!     │
//!     ▼
//! TextCompositor { atlas, Spacing }
//!     │
//!     ├── measure(text) ──► TextMetrics { width, height }
//!     │
//!     └── draw(blitter, buffer, …) ──► Blitter.blit() per glyph cell
//! ```
//!
//! - **`atlas`** — cell geometry and the embedded font decoder.
//! - **`compositor`** — spacing, metrics, glyph layout and drawing.

pub mod atlas;
pub mod compositor;
mod font_data;

// Re-exports for ergonomic use.
pub use atlas::{decode_packed, GlyphAtlas, GLYPH_COLOR, GRID_SIZE};
pub use compositor::{Glyphs, PlacedGlyph, Spacing, TextCompositor, TextMetrics, GLYPH_BLIT};
pub use cellfont_image::{Blitter, Color, LoadError};
