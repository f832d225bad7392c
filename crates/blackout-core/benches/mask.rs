//! Benchmarks for the background-removal pipeline.
//!
//! Run with: cargo bench -p blackout-core

use blackout_core::pipeline::mask;
use blackout_core::MaskConfig;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};

/// A 1080p frame: dark background with a bright disc in the middle.
fn frame() -> RgbImage {
    RgbImage::from_fn(1920, 1080, |x, y| {
        let dx = x as i64 - 960;
        let dy = y as i64 - 540;
        if dx * dx + dy * dy < 400 * 400 {
            Rgb([200, 160, 120])
        } else {
            Rgb([(x % 16) as u8, (y % 16) as u8, 4])
        }
    })
}

fn benchmark_background_mask(c: &mut Criterion) {
    let img = frame();

    c.bench_function("background_mask_1080p", |b| {
        b.iter(|| mask::background_mask(black_box(&img), 20))
    });
}

fn benchmark_dilate(c: &mut Criterion) {
    let m = mask::background_mask(&frame(), 20);

    c.bench_function("dilate_mask_1080p", |b| {
        b.iter(|| mask::dilate_mask(black_box(&m), 1))
    });
}

fn benchmark_feather(c: &mut Criterion) {
    let alpha = mask::invert_mask(mask::background_mask(&frame(), 20));

    c.bench_function("feather_alpha_k3_1080p", |b| {
        b.iter(|| mask::feather_alpha(black_box(&alpha), 3))
    });
    c.bench_function("feather_alpha_k9_1080p", |b| {
        b.iter(|| mask::feather_alpha(black_box(&alpha), 9))
    });
}

fn benchmark_remove_background(c: &mut Criterion) {
    let img = frame();
    let settings = MaskConfig::default();

    c.bench_function("remove_background_1080p_defaults", |b| {
        b.iter(|| mask::remove_background(black_box(&img), &settings))
    });
}

criterion_group!(
    benches,
    benchmark_background_mask,
    benchmark_dilate,
    benchmark_feather,
    benchmark_remove_background,
);
criterion_main!(benches);
