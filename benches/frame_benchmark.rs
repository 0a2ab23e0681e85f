//! Frame benchmark: Measure composition primitives.
//!
//! Target: a full 100x34 clear + composite well under one frame delay.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use phosphor::{Color, FrameBuffer};

fn frame_clear(c: &mut Criterion) {
    let mut frame = FrameBuffer::new(100, 34);
    c.bench_function("frame_clear_100x34", |b| {
        b.iter(|| black_box(&mut frame).clear());
    });
}

fn frame_set_depth(c: &mut Criterion) {
    let mut frame = FrameBuffer::new(100, 34);
    c.bench_function("frame_set_depth_contended", |b| {
        b.iter(|| {
            // Alternating depths at one coordinate exercises the occlusion
            // comparison on both the accept and reject paths.
            frame.set(black_box(50), 17, b'X', Some(Color::new(45)), 1.0);
            frame.set(black_box(50), 17, b'Y', Some(Color::new(81)), 2.0);
        });
    });
}

fn frame_set_if_empty_full_field(c: &mut Criterion) {
    let mut frame = FrameBuffer::new(100, 34);
    c.bench_function("frame_claim_full_field", |b| {
        b.iter(|| {
            frame.clear();
            for y in 0..34 {
                for x in 0..100 {
                    frame.set_if_empty(x, y, b'.', Some(Color::new(33)));
                }
            }
        });
    });
}

fn frame_out_of_bounds_writes(c: &mut Criterion) {
    let mut frame = FrameBuffer::new(100, 34);
    c.bench_function("frame_set_out_of_bounds", |b| {
        b.iter(|| {
            frame.set(black_box(-5), black_box(200), b'X', None, 1.0);
        });
    });
}

criterion_group!(
    benches,
    frame_clear,
    frame_set_depth,
    frame_set_if_empty_full_field,
    frame_out_of_bounds_writes,
);
criterion_main!(benches);
