use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use heatmap_common::{BoundingBox, ColorSchema, GridField, ScalarGrid, TileCoord, TileGrid};
use heatmap_render::raster::{RenderMode, TileRasterizer};
use heatmap_render::scale::ColorScale;
use heatmap_render::transform::CoordTransform;

fn random_world_field(width: usize, height: usize) -> GridField {
    let mut rng = StdRng::seed_from_u64(42);
    let samples: Vec<u8> = (0..width * height).map(|_| rng.gen()).collect();
    let grid = ScalarGrid::from_samples(&samples, width, height).unwrap();
    GridField::new(grid, BoundingBox::WORLD_GEOGRAPHIC).unwrap()
}

fn bench_heatmap_tile(c: &mut Criterion) {
    let field = random_world_field(360, 180);
    let scale = ColorScale::new(&ColorSchema::default_palette()).unwrap();
    let tile_grid = TileGrid::geographic();
    let transform = CoordTransform::Identity;

    let mut group = c.benchmark_group("heatmap");
    for stride in [1u32, 4, 16] {
        let rasterizer = TileRasterizer::new(
            &field,
            &scale,
            BoundingBox::WORLD_GEOGRAPHIC,
            &transform,
            &tile_grid,
            RenderMode::Heatmap,
            Some(stride),
        );
        group.bench_function(format!("256px_stride{}", stride), |b| {
            b.iter(|| {
                rasterizer
                    .rasterize(black_box(&TileCoord::new(2, 3, 1)))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_mercator_transform(c: &mut Criterion) {
    let field = random_world_field(360, 180);
    let scale = ColorScale::new(&ColorSchema::default_palette()).unwrap();
    let tile_grid = TileGrid::web_mercator();
    let transform = CoordTransform::WebMercatorToGeographic;
    let rasterizer = TileRasterizer::new(
        &field,
        &scale,
        BoundingBox::WORLD_GEOGRAPHIC,
        &transform,
        &tile_grid,
        RenderMode::Heatmap,
        None,
    );

    c.bench_function("heatmap_mercator_256px", |b| {
        b.iter(|| {
            rasterizer
                .rasterize(black_box(&TileCoord::new(3, 4, 3)))
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_heatmap_tile, bench_mercator_transform);
criterion_main!(benches);
