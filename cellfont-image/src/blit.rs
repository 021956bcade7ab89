//! Blit primitive — clipped rectangle copies from an [`Image`] into a
//! raw destination buffer.
//!
//! How source pixels combine with the destination is decided by the
//! blitter's ambient [`BlitState`]. Callers that need a specific mode for
//! a stretch of work take a [`BlitScope`] via [`Blitter::scoped`]; the
//! previous state comes back when the scope is dropped, whichever way the
//! caller leaves.
//!
//! ```text
//!  Blitter { state: Normal }
//!     │ scoped(Color, no flip)
//!     ▼
//!  BlitScope ── blit() … blit() ── drop ──► Blitter { state: Normal }
//! ```

use std::ops::{Deref, DerefMut};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::color::{Color, MASK_TRANSPARENT};
use crate::image::Image;

// ── Blend mode ──────────────────────────────────────────────────────

/// How a masked source pixel is combined with the destination.
///
/// `m` below is the source mask byte (`0x00` opaque, `0xFF` clear),
/// applied per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// `dst = (dst & m) | (src & !m)`
    #[default]
    Normal,
    /// `dst = src`, mask ignored.
    Fast,
    /// `dst = dst & (src | m)`
    And,
    /// `dst = dst | (src & !m)`
    Or,
    /// `dst = src` wherever the mask is not fully clear.
    Color,
}

/// Ambient state consulted by every [`Blitter::blit`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlitState {
    pub mode: BlendMode,
    /// Mirror the source rectangle horizontally.
    pub flip: bool,
}

impl BlitState {
    pub const fn new(mode: BlendMode, flip: bool) -> Self {
        Self { mode, flip }
    }
}

// ── Rect ────────────────────────────────────────────────────────────

/// Signed pixel rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether `(px, py)` lies inside the rectangle.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x
            && py >= self.y
            && (px as i64) < self.x as i64 + self.width as i64
            && (py as i64) < self.y as i64 + self.height as i64
    }
}

// ── Blitter ─────────────────────────────────────────────────────────

/// Owner of the ambient blend/flip state.
///
/// There is no process-wide state: each rendering context holds its own
/// `Blitter` and lends it to whoever draws.
#[derive(Clone, Debug, Default)]
pub struct Blitter {
    state: BlitState,
}

impl Blitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: BlitState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> BlitState {
        self.state
    }

    pub fn set_state(&mut self, state: BlitState) {
        self.state = state;
    }

    pub fn set_mode(&mut self, mode: BlendMode) {
        self.state.mode = mode;
    }

    pub fn set_flip(&mut self, flip: bool) {
        self.state.flip = flip;
    }

    /// Switch to `state` until the returned guard is dropped.
    pub fn scoped(&mut self, state: BlitState) -> BlitScope<'_> {
        let saved = self.state;
        trace!("blit scope enter: {saved:?} -> {state:?}");
        self.state = state;
        BlitScope {
            blitter: self,
            saved,
        }
    }

    /// Composite `src_rect` of `src` onto `dst` with its top-left corner at
    /// `(dx, dy)`.
    ///
    /// `dst` is a row-major buffer of `dst_width * dst_height` pixels.
    /// The copy is clipped to the source image, to the destination bounds
    /// and to the actual length of `dst`; anything outside is skipped.
    #[allow(clippy::too_many_arguments)]
    pub fn blit(
        &self,
        src: &Image,
        dst: &mut [Color],
        dst_width: u32,
        dst_height: u32,
        dx: i32,
        dy: i32,
        src_rect: Rect,
    ) {
        if dst_width == 0 || src_rect.is_empty() {
            return;
        }
        let dst_w = dst_width as i64;
        let dst_h = (dst_height as i64).min(dst.len() as i64 / dst_w);

        // Clip the source rect to the image, shifting the destination with it.
        let sx0 = (src_rect.x as i64).max(0);
        let sy0 = (src_rect.y as i64).max(0);
        let sx1 = (src_rect.x as i64 + src_rect.width as i64).min(src.width as i64);
        let sy1 = (src_rect.y as i64 + src_rect.height as i64).min(src.height as i64);
        if sx0 >= sx1 || sy0 >= sy1 {
            return;
        }
        let w = sx1 - sx0;
        let h = sy1 - sy0;
        let ox = dx as i64 + (sx0 - src_rect.x as i64);
        let oy = dy as i64 + (sy0 - src_rect.y as i64);

        // Clip to the destination.
        let col0 = (-ox).max(0);
        let col1 = w.min(dst_w - ox);
        let row0 = (-oy).max(0);
        let row1 = h.min(dst_h - oy);
        if col0 >= col1 || row0 >= row1 {
            return;
        }

        let src_w = src.width as i64;
        let BlitState { mode, flip } = self.state;

        for row in row0..row1 {
            let src_row = (sy0 + row) * src_w;
            let dst_row = (oy + row) * dst_w + ox;
            for col in col0..col1 {
                let sx = if flip { sx1 - 1 - col } else { sx0 + col };
                let si = (src_row + sx) as usize;
                let di = (dst_row + col) as usize;
                dst[di] = blend(mode, dst[di], src.data[si], src.mask[si]);
            }
        }
    }
}

#[inline]
fn blend(mode: BlendMode, dst: Color, src: Color, m: u8) -> Color {
    match mode {
        BlendMode::Normal => dst.zip_with(src, |d, s| (d & m) | (s & !m)),
        BlendMode::Fast => src,
        BlendMode::And => dst.zip_with(src, |d, s| d & (s | m)),
        BlendMode::Or => dst.zip_with(src, |d, s| d | (s & !m)),
        BlendMode::Color => {
            if m == MASK_TRANSPARENT {
                dst
            } else {
                src
            }
        }
    }
}

// ── Scope guard ─────────────────────────────────────────────────────

/// Temporary blit state; restores the previous state on drop.
pub struct BlitScope<'a> {
    blitter: &'a mut Blitter,
    saved: BlitState,
}

impl BlitScope<'_> {
    /// State that will be restored when this scope ends.
    pub fn saved(&self) -> BlitState {
        self.saved
    }
}

impl Deref for BlitScope<'_> {
    type Target = Blitter;

    fn deref(&self) -> &Blitter {
        self.blitter
    }
}

impl DerefMut for BlitScope<'_> {
    fn deref_mut(&mut self) -> &mut Blitter {
        self.blitter
    }
}

impl Drop for BlitScope<'_> {
    fn drop(&mut self) {
        trace!("blit scope exit: restoring {:?}", self.saved);
        self.blitter.state = self.saved;
    }
}

// ===================================================================
// Tests
// ===================================================================
