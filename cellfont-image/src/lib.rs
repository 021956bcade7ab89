//! # cellfont-image
//!
//! CPU-side pixel buffers and the blit primitive used by `cellfont-text`.
//!
//! ## Architecture
//!
//! ```text
//!  Image::load(path) / Image::blank(w, h)
//!       │
//!       ▼
//!  Image { data: Vec<Color>, mask: Vec<u8> }
//!       │
//!       ▼
//!  Blitter.blit(src, dst, …)   ◀─── honours BlitState { mode, flip }
//! ```
//!
//! ## Crate modules
//!
//! - [`color`] — `Color` pixel type and mask constants
//! - [`image`] — owned color + mask buffers, PNG load/save
//! - [`blit`] — blend modes, ambient blit state, clipped rect copies
//! - [`error`] — `LoadError`

pub mod blit;
pub mod color;
pub mod error;
pub mod image;

// Re-exports for convenience
pub use blit::{BlendMode, BlitScope, BlitState, Blitter, Rect};
pub use color::{Color, MASK_OPAQUE, MASK_TRANSPARENT};
pub use error::LoadError;
pub use self::image::{save_buffer_png, Image};
pub use ::image::ImageError;
