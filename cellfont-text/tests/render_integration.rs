//! End-to-end tests: build an atlas, measure text, draw it, inspect pixels.

use cellfont_image::{BlendMode, BlitState, Image, LoadError, MASK_OPAQUE};
use cellfont_text::{Blitter, Color, GlyphAtlas, TextCompositor, GLYPH_COLOR};

const BG: Color = Color::rgb(0x20, 0x20, 0x20);

/// Render `text` into a buffer sized exactly by `measure`.
fn render(tc: &TextCompositor, text: &str) -> (Vec<Color>, u32, u32) {
    let m = tc.measure(text);
    let (w, h) = (m.width as u32, m.height as u32);
    let mut buf = vec![BG; (w * h) as usize];
    tc.draw(&mut Blitter::new(), &mut buf, w, h, text, 0, 0);
    (buf, w, h)
}

#[test]
fn test_embedded_glyph_pixels_match_atlas() {
    let tc = TextCompositor::embedded();
    let (buf, w, _) = render(&tc, "A");
    let atlas = tc.atlas();
    let cell = atlas.cell_rect(b'A');

    for y in 0..cell.height {
        for x in 0..cell.width {
            let mask = atlas.image().mask_at((cell.x + x) as u32, (cell.y + y) as u32);
            let expected = if mask == Some(MASK_OPAQUE) { GLYPH_COLOR } else { BG };
            assert_eq!(buf[(y as u32 * w + x as u32) as usize], expected, "({x}, {y})");
        }
    }
}

#[test]
fn test_rendered_ink_stays_inside_measured_box() {
    let mut tc = TextCompositor::embedded();
    tc.set_char_spacing(1);
    tc.set_line_spacing(2);
    let text = "Hello, world!\nsecond line\n\n~";
    let m = tc.measure(text);

    // Oversized buffer; everything outside the measured box must stay blank.
    let (w, h) = (m.width as u32 + 40, m.height as u32 + 40);
    let mut buf = vec![BG; (w * h) as usize];
    tc.draw(&mut Blitter::new(), &mut buf, w, h, text, 0, 0);

    let mut ink = 0;
    for y in 0..h {
        for x in 0..w {
            if buf[(y * w + x) as usize] != BG {
                ink += 1;
                assert!((x as i32) < m.width && (y as i32) < m.height, "ink at ({x}, {y})");
            }
        }
    }
    assert!(ink > 0);
}

#[test]
fn test_file_backed_atlas_draws_like_source_image() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("atlas.png");

    // 64x64 atlas (4x4 cells); paint the 'A' cell diagonal green.
    let mut img = Image::blank(64, 64);
    let green = Color::rgb(0, 200, 0);
    let (cx, cy) = (4 * (b'A' as u32 % 16), 4 * (b'A' as u32 / 16));
    for i in 0..4 {
        img.set(cx + i, cy + i, green, MASK_OPAQUE);
    }
    img.save_png(&path).unwrap();

    let tc = TextCompositor::new(GlyphAtlas::from_file(&path).unwrap());
    assert_eq!(tc.atlas().cell_width(), 4);
    let (buf, w, h) = render(&tc, "A");
    assert_eq!((w, h), (4, 4));
    for i in 0..4 {
        assert_eq!(buf[(i * w + i) as usize], green);
    }
    assert_eq!(buf.iter().filter(|&&c| c == green).count(), 4);
}

#[test]
fn test_missing_atlas_file() {
    let err = GlyphAtlas::from_file("/nonexistent/dir/font.png").unwrap_err();
    assert!(matches!(err, LoadError::Decode(_)));
}

#[test]
fn test_interleaved_draws_keep_caller_state() {
    let tc = TextCompositor::embedded();
    let mut blitter = Blitter::with_state(BlitState::new(BlendMode::And, true));
    let mut buf = vec![BG; 64 * 32];
    tc.draw(&mut blitter, &mut buf, 64, 32, "ab", 0, 0);
    tc.draw(&mut blitter, &mut buf, 64, 32, "cd", 16, 16);
    assert_eq!(blitter.state(), BlitState::new(BlendMode::And, true));
}

#[test]
fn test_spacing_from_json_config() {
    let spacing = serde_json::from_str(r#"{ "char_spacing": 2, "line_spacing": 4 }"#).unwrap();
    let tc = TextCompositor::with_spacing(GlyphAtlas::embedded(), spacing);
    assert_eq!(tc.measure("AB\nC").width, 2 * (8 + 2));
    assert_eq!(tc.measure("AB\nC").height, 2 * (16 + 4));
}
