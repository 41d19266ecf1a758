//! 渲染性能基准测试
//!
//! 测试路径编译、图层描边与合成的性能。
//! 运行: `cargo bench --bench rendering_bench`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use sketch_canvas::{
    BrushKind, CanvasRenderer, Color, ImageFormat, PathCache, Point, Stroke, Tier,
};

fn stroke_with_points(id: u64, count: usize) -> Stroke {
    Stroke {
        id,
        points: (0..count)
            .map(|i| Point::new(i as f32 * 5.0, ((i * 7) % 40) as f32 * 3.0))
            .collect(),
        color: Color::BLACK,
        width: 4.0,
        kind: BrushKind::Pen,
        created_at: 0,
    }
}

/// 测试不同点数下的路径编译性能（缓存未命中路径）
fn bench_path_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("Path Compile");

    for point_count in [10, 50, 100, 500] {
        group.bench_with_input(
            BenchmarkId::from_parameter(point_count),
            &point_count,
            |b, &count| {
                let stroke = stroke_with_points(1, count);
                b.iter(|| {
                    // 每次新建缓存以测量未命中路径
                    let mut cache = PathCache::new();
                    black_box(cache.compile(black_box(&stroke)).is_some())
                });
            },
        );
    }

    group.finish();
}

/// 测试缓存命中路径的性能
fn bench_path_cache_hit(c: &mut Criterion) {
    let mut cache = PathCache::new();
    let stroke = stroke_with_points(1, 100);
    cache.compile(&stroke);

    c.bench_function("Path Cache Hit", |b| {
        b.iter(|| black_box(cache.compile(black_box(&stroke)).is_some()));
    });
}

/// 测试按档位配置的一帧绘制加合成
fn bench_draw_and_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("Draw And Composite");

    for tier in [Tier::Low, Tier::Medium, Tier::High] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{tier:?}")),
            &tier,
            |b, &tier| {
                let mut renderer =
                    CanvasRenderer::new(800, 600, tier.rendering_options()).unwrap();
                // 循环使用固定的笔画集合，缓存条目数保持有界
                let strokes: Vec<_> = (1..=64).map(|id| stroke_with_points(id, 50)).collect();
                let mut i = 0usize;
                let mut clock = 0.0;
                b.iter(|| {
                    renderer.draw_stroke(strokes[i % strokes.len()].clone(), "drawing");
                    i += 1;
                    clock += 100.0;
                    black_box(renderer.tick(clock))
                });
            },
        );
    }

    group.finish();
}

/// 测试 PNG 导出
fn bench_export(c: &mut Criterion) {
    let mut renderer = CanvasRenderer::new(800, 600, Tier::High.rendering_options()).unwrap();
    for i in 0..20 {
        renderer.draw_stroke(stroke_with_points(i, 100), "drawing");
    }
    renderer.tick(0.0);

    c.bench_function("Export PNG 800x600", |b| {
        b.iter(|| black_box(renderer.get_image_data(ImageFormat::Png, 0).unwrap().len()));
    });
}

criterion_group!(
    benches,
    bench_path_compile,
    bench_path_cache_hit,
    bench_draw_and_composite,
    bench_export
);
criterion_main!(benches);
