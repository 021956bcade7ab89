use cellfont_text::{Blitter, Color, GlyphAtlas, TextCompositor};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

const PARAGRAPH: &str = "The quick brown fox jumps over the lazy dog.\n\
    Lorem ipsum dolor sit amet, consectetur adipiscing elit.\n\
    Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";

fn bench_decode_embedded(c: &mut Criterion) {
    c.bench_function("decode_embedded_font", |b| {
        b.iter(|| black_box(GlyphAtlas::embedded()));
    });
}

fn bench_measure_short(c: &mut Criterion) {
    let tc = TextCompositor::embedded();
    c.bench_function("measure_short_text", |b| {
        b.iter(|| tc.measure(black_box("Hello, cellfont!")));
    });
}

fn bench_measure_paragraph(c: &mut Criterion) {
    let tc = TextCompositor::embedded();
    c.bench_function("measure_paragraph", |b| {
        b.iter(|| tc.measure(black_box(PARAGRAPH)));
    });
}

fn bench_draw_short(c: &mut Criterion) {
    let tc = TextCompositor::embedded();
    let mut blitter = Blitter::new();
    let mut buf = vec![Color::BLACK; 320 * 240];
    c.bench_function("draw_short_text", |b| {
        b.iter(|| {
            tc.draw(&mut blitter, &mut buf, 320, 240, black_box("Hello, cellfont!"), 8, 8);
        });
    });
}

fn bench_draw_paragraph(c: &mut Criterion) {
    let tc = TextCompositor::embedded();
    let m = tc.measure(PARAGRAPH);
    let (w, h) = (m.width as u32, m.height as u32);
    let mut blitter = Blitter::new();
    let mut buf = vec![Color::BLACK; (w * h) as usize];
    c.bench_function("draw_paragraph", |b| {
        b.iter(|| {
            tc.draw(&mut blitter, &mut buf, w, h, black_box(PARAGRAPH), 0, 0);
        });
    });
}

criterion_group!(
    benches,
    bench_decode_embedded,
    bench_measure_short,
    bench_measure_paragraph,
    bench_draw_short,
    bench_draw_paragraph,
);
criterion_main!(benches);
