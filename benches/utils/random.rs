use geo::{Coordinate, Rect};

use rand::Rng;
use rand_distr::Standard;

#[inline]
pub fn uniform_point<R: Rng>(rng: &mut R, bounds: Rect<f64>) -> Coordinate<f64> {
    let coords: [f64; 2] = rng.sample(Standard);
    let dims = bounds.max() - bounds.min();
    Coordinate {
        x: bounds.min().x + dims.x * coords[0],
        y: bounds.min().y + dims.y * coords[1],
    }
}

/// Random polyline: a uniform starting point followed by `steps`
/// bounded random steps. Adjacent edges frequently reverse direction,
/// which keeps the monotone-chain decomposition honest.
pub fn random_polyline<R: Rng>(
    rng: &mut R,
    bounds: Rect<f64>,
    steps: usize,
    step_len: f64,
) -> Vec<Coordinate<f64>> {
    let mut pts = Vec::with_capacity(steps + 1);
    let mut cur = uniform_point(rng, bounds);
    pts.push(cur);
    for _ in 0..steps {
        let d: [f64; 2] = rng.sample(Standard);
        cur = Coordinate {
            x: cur.x + (d[0] - 0.5) * 2. * step_len,
            y: cur.y + (d[1] - 0.5) * 2. * step_len,
        };
        pts.push(cur);
    }
    pts
}
