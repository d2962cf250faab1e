#[macro_use]
extern crate bencher;

use shapemesh::extra::fixtures::{calibration_shapes, regular_polygon, SHARP};
use shapemesh::math::Point;
use shapemesh::tessellation::{
    EdgeMesh, EdgeOptions, EdgeTessellator, Execution, FaceMesh, FaceTessellator, MeshBatch,
    Polyline, Shape,
};

use bencher::Bencher;

const N: usize = 100;

fn circle() -> Polyline {
    Polyline::new(regular_polygon(1000, 100.0), true).unwrap()
}

fn star() -> Polyline {
    Polyline::new(SHARP, true).unwrap()
}

fn edge_circle(bench: &mut Bencher) {
    let path = circle();
    let mut tess = EdgeTessellator::new();
    let options = EdgeOptions::default();
    let mut mesh = EdgeMesh::with_capacity(2000, 2000);

    bench.iter(|| {
        for _ in 0..N {
            mesh.clear();
            tess.tessellate(&path, &options, &mut mesh.builder()).unwrap();
        }
    })
}

fn edge_star(bench: &mut Bencher) {
    let path = star();
    let mut tess = EdgeTessellator::new();
    let options = EdgeOptions::default();
    let mut mesh = EdgeMesh::new();

    bench.iter(|| {
        for _ in 0..N {
            mesh.clear();
            tess.tessellate(&path, &options, &mut mesh.builder()).unwrap();
        }
    })
}

fn face_circle(bench: &mut Bencher) {
    let path = circle();
    let mut tess = FaceTessellator::new();
    let mut mesh = FaceMesh::with_capacity(1000, 998);

    bench.iter(|| {
        mesh.clear();
        tess.tessellate(&path, &mut mesh.builder()).unwrap();
    })
}

fn face_star(bench: &mut Bencher) {
    let path = star();
    let mut tess = FaceTessellator::new();
    let mut mesh = FaceMesh::new();

    bench.iter(|| {
        for _ in 0..N {
            mesh.clear();
            tess.tessellate(&path, &mut mesh.builder()).unwrap();
        }
    })
}

fn many_shapes() -> Vec<Shape> {
    let mut shapes = Vec::new();
    for i in 0..100 {
        for shape in calibration_shapes() {
            let offset = (i as f64) * 100.0;
            let points: Vec<Point> = shape.points.iter().map(|p| Point::new(p.x + offset, p.y)).collect();
            shapes.push(Shape::new(points, shape.closed));
        }
    }

    shapes
}

fn batch_sequential(bench: &mut Bencher) {
    let shapes = many_shapes();
    bench.iter(|| MeshBatch::compute_with(&shapes, Execution::Sequential))
}

fn batch_parallel(bench: &mut Bencher) {
    let shapes = many_shapes();
    bench.iter(|| MeshBatch::compute_with(&shapes, Execution::Parallel))
}

benchmark_group!(edge_tess,
  edge_circle,
  edge_star
);

benchmark_group!(face_tess,
  face_circle,
  face_star
);

benchmark_group!(batch,
  batch_sequential,
  batch_parallel
);

benchmark_main!(edge_tess, face_tess, batch);
