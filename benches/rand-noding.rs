use criterion::*;
use geo::{line_intersection::line_intersection, Line, Rect};
use rand::thread_rng;

use geo_noding::{MonoChainNoder, Noder, SegmentString, SnapRounder};

#[path = "utils/random.rs"]
mod random;
use random::*;

const BBOX: [f64; 2] = [1024., 1024.];

fn noding(c: &mut Criterion) {
    const NUM_EDGES: usize = 256;
    const STEPS: usize = 8;

    let bbox: Rect<f64> = Rect::new([0., 0.], BBOX);
    let step_len = BBOX[0] / 16.;

    let polylines: Vec<_> = (0..NUM_EDGES)
        .map(|_| random_polyline(&mut thread_rng(), bbox, STEPS, step_len))
        .collect();

    c.bench_function("monotone-chain noding - random polylines", |b| {
        b.iter(|| {
            let edges: Vec<_> = polylines
                .iter()
                .map(|p| SegmentString::from_coords(p.clone()))
                .collect();
            black_box(MonoChainNoder::new().compute_nodes(edges).unwrap().len());
        })
    });

    c.bench_function("snap-rounding - random polylines", |b| {
        b.iter(|| {
            let edges: Vec<_> = polylines
                .iter()
                .map(|p| SegmentString::from_coords(p.clone()))
                .collect();
            let mut noder = SnapRounder::new(1.).unwrap();
            black_box(noder.compute_nodes(edges).unwrap().len());
        })
    });

    c.bench_function("brute-force intersections - random polylines", |b| {
        let segments: Vec<Line<f64>> = polylines
            .iter()
            .flat_map(|p| p.windows(2).map(|w| Line::new(w[0], w[1])))
            .collect();
        b.iter(|| {
            for l1 in segments.iter() {
                for l2 in segments.iter() {
                    black_box(line_intersection(*l1, *l2));
                }
            }
        })
    });
}

criterion_group!(random_noding, noding);
criterion_main!(random_noding);
