use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rastly::colors;
use rastly::framebuffer::Framebuffer;
use rastly::math::Vec2;
use rastly::raster::{fill_triangle, SampleMode, ScreenVertex, ShadingMode};
use rastly::texture::Texture;

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

fn vertex(x: f32, y: f32, w: f32, u: f32, v: f32, color: u32) -> ScreenVertex {
    ScreenVertex {
        x,
        y,
        w,
        uv: Vec2::new(u, v),
        color,
    }
}

fn small_triangle() -> [ScreenVertex; 3] {
    [
        vertex(100.0, 100.0, 1.0, 0.0, 0.0, colors::RED),
        vertex(120.0, 100.0, 1.2, 1.0, 0.0, colors::GREEN),
        vertex(110.0, 120.0, 1.5, 0.5, 1.0, colors::BLUE),
    ]
}

fn medium_triangle() -> [ScreenVertex; 3] {
    [
        vertex(100.0, 100.0, 1.0, 0.0, 0.0, colors::RED),
        vertex(300.0, 100.0, 2.0, 1.0, 0.0, colors::GREEN),
        vertex(200.0, 300.0, 1.5, 0.5, 1.0, colors::BLUE),
    ]
}

fn large_triangle() -> [ScreenVertex; 3] {
    [
        vertex(50.0, 50.0, 1.0, 0.0, 0.0, colors::RED),
        vertex(750.0, 100.0, 3.0, 1.0, 0.0, colors::GREEN),
        vertex(400.0, 550.0, 2.0, 0.5, 1.0, colors::BLUE),
    ]
}

fn checkerboard(size: u32) -> Texture {
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let c = if (x / 8 + y / 8) % 2 == 0 { 255 } else { 40 };
            data.extend_from_slice(&[c, c, c, 255]);
        }
    }
    Texture::from_rgba8(size, size, data)
}

fn benchmark_fill_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_variants");
    let texture = checkerboard(64);

    let variants: [(&str, ShadingMode, SampleMode, bool); 6] = [
        ("flat_colored", ShadingMode::Flat, SampleMode::Nearest, false),
        ("gouraud_colored", ShadingMode::Gouraud, SampleMode::Nearest, false),
        ("flat_textured", ShadingMode::Flat, SampleMode::Nearest, true),
        ("gouraud_textured", ShadingMode::Gouraud, SampleMode::Nearest, true),
        ("flat_bilinear", ShadingMode::Flat, SampleMode::Bilinear, true),
        ("gouraud_bilinear", ShadingMode::Gouraud, SampleMode::Bilinear, true),
    ];

    for (size_name, tri) in [
        ("small", small_triangle()),
        ("medium", medium_triangle()),
        ("large", large_triangle()),
    ] {
        for (variant, shading, sampling, textured) in variants {
            group.bench_with_input(BenchmarkId::new(variant, size_name), &tri, |b, tri| {
                let mut fb = Framebuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
                let tex = textured.then_some(&texture);
                b.iter(|| {
                    fb.clear_depth();
                    fill_triangle(
                        &mut fb,
                        black_box(tri[0]),
                        black_box(tri[1]),
                        black_box(tri[2]),
                        shading,
                        sampling,
                        tex,
                    );
                });
            });
        }
    }

    group.finish();
}

fn benchmark_many_triangles(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_triangles");

    // Grid of small gouraud triangles across the whole buffer.
    let triangles: Vec<[ScreenVertex; 3]> = (0..20)
        .flat_map(|row| {
            (0..20).map(move |col| {
                let x = col as f32 * 40.0;
                let y = row as f32 * 30.0;
                [
                    vertex(x, y, 1.0, 0.0, 0.0, colors::RED),
                    vertex(x + 35.0, y, 1.0, 1.0, 0.0, colors::GREEN),
                    vertex(x + 17.5, y + 25.0, 1.0, 0.5, 1.0, colors::BLUE),
                ]
            })
        })
        .collect();

    group.bench_function("gouraud_colored_400", |b| {
        let mut fb = Framebuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
        b.iter(|| {
            fb.clear_depth();
            for tri in &triangles {
                fill_triangle(
                    &mut fb,
                    black_box(tri[0]),
                    black_box(tri[1]),
                    black_box(tri[2]),
                    ShadingMode::Gouraud,
                    SampleMode::Nearest,
                    None,
                );
            }
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_fill_variants, benchmark_many_triangles);
criterion_main!(benches);
