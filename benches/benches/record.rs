// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_recorder` appending into an `understory_record::Record`.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{BezPath, Point};

use understory_record::{
    Canvas, CanvasExt, ClipEdgeStyle, Color, Paint, Path, Rect, Record, RegionOp, SaveLayerFlags,
};
use understory_recorder::Recorder;

fn star(points: usize) -> Path {
    let mut path = BezPath::new();
    for i in 0..points * 2 {
        let radius = if i % 2 == 0 { 50.0 } else { 20.0 };
        let angle = core::f64::consts::PI * i as f64 / points as f64;
        let p = Point::new(radius * angle.cos(), radius * angle.sin());
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    Path::new(path)
}

fn bench_rects(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_rects");
    let paint = Paint::from_color(Color::from_rgb8(10, 20, 30));
    for &n in &[100_usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut record = Record::with_capacity(n);
                {
                    let mut recorder = Recorder::new(&mut record, 1024, 1024);
                    for i in 0..n {
                        let x = (i % 100) as f64 * 10.0;
                        let y = (i / 100) as f64 * 10.0;
                        recorder.draw_rect(&Rect::new(x, y, x + 8.0, y + 8.0), &paint);
                    }
                }
                black_box(record.len())
            });
        });
    }
    group.finish();
}

fn bench_nested_state(c: &mut Criterion) {
    let paint = Paint::default();
    let path = star(32);
    c.bench_function("record_nested_clips", |b| {
        b.iter(|| {
            let mut record = Record::new();
            {
                let mut recorder = Recorder::new(&mut record, 1024, 1024);
                for depth in 0..64 {
                    let layer = depth % 4 == 0;
                    if layer {
                        recorder.save_layer(None, Some(&paint), SaveLayerFlags::ARGB_CLIP_LAYER);
                    } else {
                        recorder.save();
                    }
                    recorder.translate(4.0, 4.0);
                    recorder.clip_path(&path, RegionOp::Intersect, ClipEdgeStyle::Soft);
                    recorder.draw_path(&path, &paint);
                }
                recorder.restore_to_count(1);
            }
            black_box(record.arena_bytes())
        });
    });
}

criterion_group!(benches, bench_rects, bench_nested_state);
criterion_main!(benches);
