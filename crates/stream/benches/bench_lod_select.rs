use std::hint::black_box;
use std::time::Instant;

use glam::Vec3;
use seascape_common::{CameraInfo, ProceduralSampler};
use seascape_stream::{LodConfig, LodSelector, LodStreamer, diff};

fn config(max_depth: u32) -> LodConfig {
    LodConfig {
        max_depth,
        initial_tiles: 1024,
        ..LodConfig::default()
    }
}

fn bench_select(max_depth: u32, iterations: usize) {
    let sampler = ProceduralSampler::default();
    let mut selector = LodSelector::new(&config(max_depth)).expect("valid config");
    let camera = CameraInfo::at(Vec3::new(37.0, 20.0, -91.0));

    let start = Instant::now();
    let mut visible = 0;
    for _ in 0..iterations {
        visible = black_box(selector.select(black_box(&camera), &sampler)).len();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  select (depth {max_depth}, {visible} visible, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_diff(max_depth: u32, iterations: usize) {
    let sampler = ProceduralSampler::default();
    let mut selector = LodSelector::new(&config(max_depth)).expect("valid config");
    let a = selector.select(&CameraInfo::at(Vec3::ZERO), &sampler);
    let b = selector.select(&CameraInfo::at(Vec3::new(40.0, 0.0, 0.0)), &sampler);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(diff(black_box(&a), black_box(&b)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  diff ({} vs {} nodes, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        a.len(),
        b.len()
    );
}

fn bench_fly(max_depth: u32, frames: usize) {
    let sampler = ProceduralSampler::default();
    let cfg = config(max_depth);
    let mut selector = LodSelector::new(&cfg).expect("valid config");
    let mut streamer = LodStreamer::new(&cfg, selector.distances().to_vec());

    let start = Instant::now();
    let mut churn = 0;
    for i in 0..frames {
        let camera = CameraInfo::at(Vec3::new(i as f32 * 8.0 - 1000.0, 10.0, 0.0));
        let visible = selector.select(&camera, &sampler);
        let (changes, _) = black_box(streamer.update(&visible));
        churn += changes.churn();
    }
    let elapsed = start.elapsed();
    let per_frame = elapsed / frames as u32;
    println!(
        "  fly (depth {max_depth}, {frames} frames, {churn} churn): {per_frame:?}/frame, total {elapsed:?}"
    );
}

fn main() {
    println!("=== LOD Selection Benchmarks ===\n");

    println!("Expansion:");
    bench_select(4, 10000);
    bench_select(6, 2000);
    bench_select(8, 500);

    println!("\nDiff:");
    bench_diff(6, 10000);
    bench_diff(8, 2000);

    println!("\nFly-through (select + diff + apply):");
    bench_fly(6, 250);
    bench_fly(8, 250);

    println!("\n=== Done ===");
}
