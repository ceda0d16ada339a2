//! Benchmarks for quadric and edge-length decimation on curved grids

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use proxymesh_core::{MeshHost, Point3d, PolygonMesh, Vector3d};
use proxymesh_decimate::{CostMetric, DecimateParams, QuadricDecimator};

fn generate_grid_mesh(size: usize) -> PolygonMesh {
    let mut vertices = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let fx = x as f64 / (size - 1) as f64 * std::f64::consts::PI;
            let fy = y as f64 / (size - 1) as f64 * std::f64::consts::PI;
            vertices.push(Point3d::new(x as f64, y as f64, (fx.sin() * fy.sin()) * 2.0));
        }
    }
    let mut faces = Vec::with_capacity((size - 1) * (size - 1) * 2);
    for y in 0..(size - 1) {
        for x in 0..(size - 1) {
            let tl = y * size + x;
            let tr = tl + 1;
            let bl = (y + 1) * size + x;
            let br = bl + 1;
            faces.push([tl, bl, tr]);
            faces.push([tr, bl, br]);
        }
    }
    PolygonMesh::from_triangles(vertices, &faces)
}

fn bench_decimation(c: &mut Criterion) {
    let sizes = [10, 20, 40];
    let percentages = [30.0, 50.0, 70.0];

    let mut group = c.benchmark_group("decimation");

    for &size in &sizes {
        let mesh = generate_grid_mesh(size);
        let vertex_count = mesh.vertex_count();

        for &percentage in &percentages {
            for (name, metric) in [("qem", CostMetric::Quadric), ("edge_length", CostMetric::EdgeLength)] {
                group.bench_with_input(
                    BenchmarkId::new(name, format!("{}v_p{}", vertex_count, percentage as u32)),
                    &(&mesh, percentage),
                    |b, &(mesh, percentage)| {
                        let decimator = QuadricDecimator::new(
                            DecimateParams::with_percentage(percentage)
                                .with_view_direction(Vector3d::new(1.0, 0.0, 0.0))
                                .with_cost_metric(metric),
                        );
                        b.iter(|| {
                            let mut host = MeshHost::new(black_box(mesh).clone());
                            let result = decimator.decimate(&mut host).unwrap();
                            black_box(result);
                        });
                    },
                );
            }
        }
    }

    group.finish();
}

criterion_group!(benches, bench_decimation);
criterion_main!(benches);
