//! Text compositor — measures and draws byte strings with a [`GlyphAtlas`].
//!
//! Every character occupies one fixed-size cell. The cursor advances by
//! `cell_width + char_spacing` per byte and by `cell_height + line_spacing`
//! per `\n`. Measurement and drawing both go through [`TextCompositor::advance`]
//! and [`TextCompositor::line_advance`], so the measured box always matches
//! what [`TextCompositor::draw`] covers.

use cellfont_image::{BlendMode, BlitState, Blitter, Color};
use serde::{Deserialize, Serialize};

use crate::atlas::GlyphAtlas;

/// Blit state used for glyphs: source color where unmasked, never flipped.
pub const GLYPH_BLIT: BlitState = BlitState::new(BlendMode::Color, false);

/// Extra pixels between characters and between lines.
///
/// Negative values are allowed and make glyphs overlap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Spacing {
    pub char_spacing: i32,
    pub line_spacing: i32,
}

/// Pixel size of a block of text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextMetrics {
    pub width: i32,
    pub height: i32,
}

/// A glyph placed at its cursor position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacedGlyph {
    pub byte: u8,
    pub x: i32,
    pub y: i32,
}

/// Character/line counts gathered in one pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LineStats {
    /// Longest line, in characters (newlines excluded).
    max_chars: i32,
    /// Number of lines; at least 1.
    lines: i32,
}

fn saturating_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

fn scan(text: &[u8]) -> LineStats {
    let mut count = 0usize;
    let mut max = 0usize;
    let mut lines = 1usize;
    for &c in text {
        if c == b'\n' {
            max = max.max(count);
            count = 0;
            lines += 1;
        } else {
            count += 1;
        }
    }
    LineStats {
        max_chars: saturating_i32(max.max(count)),
        lines: saturating_i32(lines),
    }
}

/// Glyph atlas plus spacing configuration.
#[derive(Clone, Debug)]
pub struct TextCompositor {
    atlas: GlyphAtlas,
    spacing: Spacing,
}

impl TextCompositor {
    /// Compositor with zero spacing.
    pub fn new(atlas: GlyphAtlas) -> Self {
        Self::with_spacing(atlas, Spacing::default())
    }

    pub fn with_spacing(atlas: GlyphAtlas, spacing: Spacing) -> Self {
        Self { atlas, spacing }
    }

    /// Compositor over the built-in font.
    pub fn embedded() -> Self {
        Self::new(GlyphAtlas::embedded())
    }

    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    pub fn into_atlas(self) -> GlyphAtlas {
        self.atlas
    }

    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    pub fn set_spacing(&mut self, spacing: Spacing) {
        self.spacing = spacing;
    }

    pub fn set_char_spacing(&mut self, n: i32) {
        self.spacing.char_spacing = n;
    }

    pub fn set_line_spacing(&mut self, n: i32) {
        self.spacing.line_spacing = n;
    }

    /// Horizontal cursor step per character.
    pub fn advance(&self) -> i32 {
        self.atlas.cell_width().saturating_add(self.spacing.char_spacing)
    }

    /// Vertical cursor step per line.
    pub fn line_advance(&self) -> i32 {
        self.atlas.cell_height().saturating_add(self.spacing.line_spacing)
    }

    /// Width and height of `text`.
    ///
    /// Width is the longest line's character count times [`advance`](Self::advance),
    /// spaces included; height is the line count times
    /// [`line_advance`](Self::line_advance). Empty text is one line tall.
    pub fn measure(&self, text: impl AsRef<[u8]>) -> TextMetrics {
        let stats = scan(text.as_ref());
        TextMetrics {
            width: stats.max_chars.saturating_mul(self.advance()),
            height: stats.lines.saturating_mul(self.line_advance()),
        }
    }

    /// Width of the longest line of `text`.
    pub fn measure_width(&self, text: impl AsRef<[u8]>) -> i32 {
        self.measure(text).width
    }

    /// Total height of `text`.
    pub fn measure_height(&self, text: impl AsRef<[u8]>) -> i32 {
        self.measure(text).height
    }

    /// Cursor positions of every drawn glyph, relative to `(x, y)`.
    ///
    /// Newlines and spaces move the cursor but yield nothing.
    pub fn layout<'a>(&self, text: &'a [u8], x: i32, y: i32) -> Glyphs<'a> {
        Glyphs {
            bytes: text.iter(),
            origin_x: x,
            x,
            y,
            advance: self.advance(),
            line_advance: self.line_advance(),
        }
    }

    /// Draw `text` into `buffer` with its top-left corner at `(x, y)`.
    ///
    /// `buffer` is a row-major `buffer_width × buffer_height` pixel array.
    /// Glyphs are composited in [`GLYPH_BLIT`] state; `blitter`'s own state
    /// is restored before this returns. Pixels outside the buffer are
    /// clipped by the blitter.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        blitter: &mut Blitter,
        buffer: &mut [Color],
        buffer_width: u32,
        buffer_height: u32,
        text: impl AsRef<[u8]>,
        x: i32,
        y: i32,
    ) {
        let scope = blitter.scoped(GLYPH_BLIT);
        let image = self.atlas.image();
        for glyph in self.layout(text.as_ref(), x, y) {
            scope.blit(
                image,
                buffer,
                buffer_width,
                buffer_height,
                glyph.x,
                glyph.y,
                self.atlas.cell_rect(glyph.byte),
            );
        }
    }
}

/// Iterator over [`PlacedGlyph`]s, produced by [`TextCompositor::layout`].
#[derive(Clone, Debug)]
pub struct Glyphs<'a> {
    bytes: std::slice::Iter<'a, u8>,
    origin_x: i32,
    x: i32,
    y: i32,
    advance: i32,
    line_advance: i32,
}

impl Iterator for Glyphs<'_> {
    type Item = PlacedGlyph;

    fn next(&mut self) -> Option<PlacedGlyph> {
        for &byte in self.bytes.by_ref() {
            match byte {
                b'\n' => {
                    self.x = self.origin_x;
                    self.y = self.y.saturating_add(self.line_advance);
                }
                b' ' => self.x = self.x.saturating_add(self.advance),
                _ => {
                    let glyph = PlacedGlyph {
                        byte,
                        x: self.x,
                        y: self.y,
                    };
                    self.x = self.x.saturating_add(self.advance);
                    return Some(glyph);
                }
            }
        }
        None
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cellfont_image::{Image, MASK_OPAQUE};

    /// 160x320 atlas: 10x20 cells, every cell fully opaque in a color
    /// derived from its byte.
    fn solid_atlas() -> GlyphAtlas {
        let mut img = Image::blank(160, 320);
        for y in 0..320u32 {
            for x in 0..160u32 {
                let c = (y / 20) * 16 + x / 10;
                img.set(x, y, Color::rgb(c as u8, 0, 0), MASK_OPAQUE);
            }
        }
        GlyphAtlas::from_image(img)
    }

    fn compositor() -> TextCompositor {
        TextCompositor::new(solid_atlas())
    }

    #[test]
    fn test_default_spacing_is_zero() {
        let tc = compositor();
        assert_eq!(tc.spacing(), Spacing::default());
        assert_eq!(tc.advance(), 10);
        assert_eq!(tc.line_advance(), 20);
    }

    #[test]
    fn test_measure_empty() {
        let tc = compositor();
        assert_eq!(tc.measure(""), TextMetrics { width: 0, height: 20 });
    }

    #[test]
    fn test_measure_multiline() {
        let tc = compositor();
        assert_eq!(tc.measure("AB\nC"), TextMetrics { width: 20, height: 40 });
    }

    #[test]
    fn test_measure_counts_spaces() {
        let tc = compositor();
        assert_eq!(tc.measure("A B").width, 30);
    }

    #[test]
    fn test_measure_trailing_newline_adds_line() {
        let tc = compositor();
        assert_eq!(tc.measure("AB\n"), TextMetrics { width: 20, height: 40 });
        assert_eq!(tc.measure("\n\n"), TextMetrics { width: 0, height: 60 });
    }

    #[test]
    fn test_char_spacing_applies_after_every_char() {
        let mut tc = compositor();
        tc.set_char_spacing(2);
        assert_eq!(tc.measure("AB").width, 2 * 10 + 2 * 2);
    }

    #[test]
    fn test_negative_spacing_allowed() {
        let mut tc = compositor();
        tc.set_char_spacing(-3);
        tc.set_line_spacing(-5);
        assert_eq!(tc.measure("ABCD\nE"), TextMetrics { width: 28, height: 30 });
    }

    #[test]
    fn test_measure_matches_width_and_height() {
        let mut tc = compositor();
        for spacing in [(0, 0), (3, -2), (-1, 7)] {
            tc.set_char_spacing(spacing.0);
            tc.set_line_spacing(spacing.1);
            for s in ["", "x", "hello\nworld!!", "a\n\nbcd \n", "   "] {
                let m = tc.measure(s);
                assert_eq!(m.width, tc.measure_width(s), "{s:?}");
                assert_eq!(m.height, tc.measure_height(s), "{s:?}");
                assert_eq!(m, tc.measure(s));
            }
        }
    }

    #[test]
    fn test_spacing_monotonicity() {
        let text = "one\nthree\nfive5";
        let mut tc = compositor();
        let base = tc.measure(text);
        tc.set_char_spacing(4);
        tc.set_line_spacing(6);
        let wider = tc.measure(text);
        assert_eq!(wider.width - base.width, 4 * 5);
        assert_eq!(wider.height - base.height, 6 * 3);
    }

    #[test]
    fn test_measure_accepts_bytes() {
        let tc = compositor();
        assert_eq!(tc.measure([0xC3u8, 0xA9, b'\n', 0xFF]).width, 20);
    }

    #[test]
    fn test_layout_positions() {
        let mut tc = compositor();
        tc.set_spacing(Spacing { char_spacing: 1, line_spacing: 2 });
        let glyphs: Vec<_> = tc.layout(b"A B\nC", 5, 7).collect();
        assert_eq!(
            glyphs,
            vec![
                PlacedGlyph { byte: b'A', x: 5, y: 7 },
                PlacedGlyph { byte: b'B', x: 27, y: 7 },
                PlacedGlyph { byte: b'C', x: 5, y: 29 },
            ]
        );
    }

    #[test]
    fn test_layout_fits_inside_measure() {
        let mut tc = compositor();
        tc.set_char_spacing(3);
        tc.set_line_spacing(1);
        let text = b"ab c\n\ndefgh\ni";
        let m = tc.measure(text);
        let cw = tc.atlas().cell_width();
        let ch = tc.atlas().cell_height();
        for g in tc.layout(text, 0, 0) {
            assert!(g.x + cw <= m.width, "{g:?} exceeds width {}", m.width);
            assert!(g.y + ch <= m.height, "{g:?} exceeds height {}", m.height);
        }
    }

    #[test]
    fn test_draw_single_glyph() {
        let tc = compositor();
        let (w, h) = (40u32, 30u32);
        let bg = Color::rgb(1, 2, 3);
        let mut buf = vec![bg; (w * h) as usize];
        tc.draw(&mut Blitter::new(), &mut buf, w, h, "A", 0, 0);

        for y in 0..h as usize {
            for x in 0..w as usize {
                let expected = if x < 10 && y < 20 { Color::rgb(b'A', 0, 0) } else { bg };
                assert_eq!(buf[y * w as usize + x], expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_draw_skips_spaces_and_breaks_lines() {
        let tc = compositor();
        let (w, h) = (30u32, 40u32);
        let bg = Color::BLACK;
        let mut buf = vec![bg; (w * h) as usize];
        tc.draw(&mut Blitter::new(), &mut buf, w, h, " B\nC", 0, 0);

        let at = |x: usize, y: usize| buf[y * w as usize + x];
        assert_eq!(at(0, 0), bg, "space cell must not be drawn");
        assert_eq!(at(10, 0), Color::rgb(b'B', 0, 0));
        assert_eq!(at(0, 20), Color::rgb(b'C', 0, 0));
        assert_eq!(at(20, 0), bg);
        assert_eq!(at(15, 25), bg);
    }

    #[test]
    fn test_draw_clips_offscreen() {
        let tc = compositor();
        let mut buf = vec![Color::BLACK; 16];
        tc.draw(&mut Blitter::new(), &mut buf, 4, 4, "AB\nCD", -8, -18);
        // Each glyph contributes only the 2x2 corner that overlaps the buffer.
        let red = |c: u8| Color::rgb(c, 0, 0);
        assert_eq!(&buf[0..4], &[red(b'A'), red(b'A'), red(b'B'), red(b'B')]);
        assert_eq!(&buf[12..16], &[red(b'C'), red(b'C'), red(b'D'), red(b'D')]);
    }

    #[test]
    fn test_draw_restores_blit_state() {
        let tc = compositor();
        let ambient = BlitState::new(BlendMode::Or, true);
        let mut blitter = Blitter::with_state(ambient);
        let mut buf = vec![Color::BLACK; 100];
        tc.draw(&mut blitter, &mut buf, 10, 10, "xyz\n!", 0, 0);
        assert_eq!(blitter.state(), ambient);
    }

    #[test]
    fn test_draw_ignores_ambient_flip() {
        // Left half of the glyph cell red, right half transparent.
        let mut img = Image::blank(32, 16);
        img.set(0, 0, Color::rgb(255, 0, 0), MASK_OPAQUE);
        let tc = TextCompositor::new(GlyphAtlas::from_image(img));
        let mut blitter = Blitter::with_state(BlitState::new(BlendMode::Fast, true));
        let mut buf = vec![Color::BLACK; 2];
        tc.draw(&mut blitter, &mut buf, 2, 1, [0u8], 0, 0);
        assert_eq!(buf, vec![Color::rgb(255, 0, 0), Color::BLACK]);
    }

    #[test]
    fn test_spacing_deserializes_with_defaults() {
        let s: Spacing = serde_json::from_str(r#"{ "line_spacing": 3 }"#).unwrap();
        assert_eq!(s, Spacing { char_spacing: 0, line_spacing: 3 });
    }
}
