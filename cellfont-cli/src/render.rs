//! Offscreen rendering of a text block into a freshly allocated buffer.

use cellfont_text::{Blitter, Color, TextCompositor};

/// A filled pixel buffer and its dimensions.
pub struct Rendered {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

/// Draw `text` into a buffer sized by `measure` plus `padding` on every side.
pub fn render(tc: &TextCompositor, text: &str, background: Color, padding: u32) -> Rendered {
    let metrics = tc.measure(text);
    let width = metrics.width.max(0) as u32 + 2 * padding;
    let height = metrics.height.max(0) as u32 + 2 * padding;
    let mut pixels = vec![background; width as usize * height as usize];

    let mut blitter = Blitter::new();
    tc.draw(
        &mut blitter,
        &mut pixels,
        width,
        height,
        text,
        padding as i32,
        padding as i32,
    );

    Rendered {
        width,
        height,
        pixels,
    }
}
