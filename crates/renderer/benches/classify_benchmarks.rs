//! Benchmarks for overlay colorization and PNG encoding.
//!
//! Run with: cargo bench --package renderer --bench classify_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use map_common::LayerKind;
use renderer::classify::colorize_values;
use renderer::png;

/// Class grid shaped like a ward-level raster: bands of classes with
/// a no-data margin outside the county boundary.
fn generate_class_grid(width: usize, height: usize, max_class: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let margin = x < width / 10 || y < height / 10;
            if margin {
                data.push(f64::NAN);
            } else {
                data.push(((x / 16 + y / 16) % max_class + 1) as f64);
            }
        }
    }
    data
}

fn bench_colorize(c: &mut Criterion) {
    let mut group = c.benchmark_group("colorize");

    for &(width, height) in &[(256, 256), (1024, 768), (2048, 1536)] {
        let data = generate_class_grid(width, height, 4);
        group.throughput(Throughput::Elements((width * height) as u64));
        group.bench_with_input(
            BenchmarkId::new("scarcity", format!("{}x{}", width, height)),
            &data,
            |b, data| b.iter(|| colorize_values(black_box(data), width, height, LayerKind::Scarcity)),
        );
    }

    group.finish();
}

fn bench_png_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("png_encoding");

    for &(width, height) in &[(256, 256), (1024, 768)] {
        let data = generate_class_grid(width, height, 3);
        let image = colorize_values(&data, width, height, LayerKind::Risk);
        group.throughput(Throughput::Bytes(image.pixels.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("auto", format!("{}x{}", width, height)),
            &image,
            |b, image| b.iter(|| png::encode_image(black_box(image))),
        );
        group.bench_with_input(
            BenchmarkId::new("rgba", format!("{}x{}", width, height)),
            &image,
            |b, image| b.iter(|| png::create_png(black_box(&image.pixels), width, height)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_colorize, bench_png_encoding);
criterion_main!(benches);
