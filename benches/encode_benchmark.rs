//! Encode benchmark: Measure frame-to-ANSI serialization.
//!
//! Target: a 100x34 frame encodes well under one frame delay.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use phosphor::render::encoder::encode_frame;
use phosphor::{Color, FrameBuffer, OutputBuffer};

fn checkered_frame() -> FrameBuffer {
    let mut frame = FrameBuffer::new(100, 34);
    for y in 0..34 {
        for x in 0..100 {
            // Color runs of eight cells; mirrors typical scene output.
            let color = Color::new(30 + (x / 8 % 8) as u8);
            frame.set(x, y, b'#', Some(color), 1.0);
        }
    }
    frame
}

fn encode_blank_frame(c: &mut Criterion) {
    let frame = FrameBuffer::new(100, 34);
    let mut out = OutputBuffer::new();
    c.bench_function("encode_blank_100x34", |b| {
        b.iter(|| {
            out.clear();
            encode_frame(black_box(&frame), &mut out);
        });
    });
}

fn encode_colored_frame(c: &mut Criterion) {
    let frame = checkered_frame();
    let mut out = OutputBuffer::new();
    c.bench_function("encode_colored_100x34", |b| {
        b.iter(|| {
            out.clear();
            encode_frame(black_box(&frame), &mut out);
        });
    });
}

criterion_group!(benches, encode_blank_frame, encode_colored_frame);
criterion_main!(benches);
