use geo::{intersects::Intersects, Coordinate, GeoFloat, Rect};
use smallvec::{smallvec, SmallVec};

const STARTS_STACK_SIZE: usize = 8;

/// Monotone-chain partition of one segment string.
///
/// A new chain starts wherever the x or y direction of the path
/// reverses, so within a chain both coordinate deltas keep a constant
/// sign. Two consequences the rest of the engine relies on: the chain
/// envelope is exactly the rect spanned by its two end points, and two
/// chains can be searched for crossing segments by recursive envelope
/// subdivision ([`chain_overlap_pairs`]).
#[derive(Debug, Clone)]
pub struct MonotoneChainEdge<T: GeoFloat> {
    edge: usize,
    starts: SmallVec<[usize; STARTS_STACK_SIZE]>,
    envs: Vec<Rect<T>>,
}

impl<T: GeoFloat> MonotoneChainEdge<T> {
    /// Partition `coords` into maximal monotone runs. `edge` is the
    /// caller's index for the string the coordinates belong to.
    ///
    /// Zero-length segments never break a run, so duplicate consecutive
    /// points are tolerated.
    pub fn new(edge: usize, coords: &[Coordinate<T>]) -> Self {
        debug_assert!(coords.len() >= 2);
        let mut starts: SmallVec<[usize; STARTS_STACK_SIZE]> = smallvec![0];
        let mut sx = 0i8;
        let mut sy = 0i8;
        for i in 0..coords.len() - 1 {
            let dx = sign(coords[i + 1].x - coords[i].x);
            let dy = sign(coords[i + 1].y - coords[i].y);
            if dx == 0 && dy == 0 {
                continue;
            }
            if (dx != 0 && sx != 0 && dx != sx) || (dy != 0 && sy != 0 && dy != sy) {
                starts.push(i);
                sx = dx;
                sy = dy;
            } else {
                if sx == 0 {
                    sx = dx;
                }
                if sy == 0 {
                    sy = dy;
                }
            }
        }
        starts.push(coords.len() - 1);
        let envs = starts
            .windows(2)
            .map(|w| Rect::new(coords[w[0]], coords[w[1]]))
            .collect();
        MonotoneChainEdge { edge, starts, envs }
    }

    /// The caller's index for the parent string.
    #[inline]
    pub fn edge(&self) -> usize {
        self.edge
    }

    #[inline]
    pub fn chain_count(&self) -> usize {
        self.starts.len() - 1
    }

    /// Inclusive coordinate-index range `(start, end)` of the `i`-th
    /// chain; its segments are `start..end`.
    #[inline]
    pub fn chain_range(&self, i: usize) -> (usize, usize) {
        (self.starts[i], self.starts[i + 1])
    }

    /// Envelope of the `i`-th chain.
    #[inline]
    pub fn envelope(&self, i: usize) -> Rect<T> {
        self.envs[i]
    }

    /// Minimum x of the `i`-th chain, used to place sweep events.
    #[inline]
    pub fn min_x(&self, i: usize) -> T {
        self.envs[i].min().x
    }

    /// Maximum x of the `i`-th chain, used to place sweep events.
    #[inline]
    pub fn max_x(&self, i: usize) -> T {
        self.envs[i].max().x
    }
}

#[inline]
fn sign<T: GeoFloat>(d: T) -> i8 {
    if d > T::zero() {
        1
    } else if d < T::zero() {
        -1
    } else {
        0
    }
}

/// Collect the candidate segment pairs of two chains by recursive
/// envelope subdivision.
///
/// `(start, end)` are inclusive coordinate-index ranges into the
/// respective coordinate runs; emitted pairs are segment indices. The
/// monotone invariant makes every sub-run's envelope the rect over its
/// two boundary points, so each level of the recursion costs O(1).
/// Single-segment pairs are emitted without an envelope test; the
/// receiver performs the exact intersection math.
pub(crate) fn chain_overlap_pairs<T: GeoFloat>(
    coords0: &[Coordinate<T>],
    (start0, end0): (usize, usize),
    coords1: &[Coordinate<T>],
    (start1, end1): (usize, usize),
    pairs: &mut Vec<(usize, usize)>,
) {
    if end0 - start0 == 1 && end1 - start1 == 1 {
        pairs.push((start0, start1));
        return;
    }
    let env0 = Rect::new(coords0[start0], coords0[end0]);
    let env1 = Rect::new(coords1[start1], coords1[end1]);
    if !env0.intersects(&env1) {
        return;
    }
    let mid0 = (start0 + end0) / 2;
    let mid1 = (start1 + end1) / 2;
    if start0 < mid0 {
        if start1 < mid1 {
            chain_overlap_pairs(coords0, (start0, mid0), coords1, (start1, mid1), pairs);
        }
        if mid1 < end1 {
            chain_overlap_pairs(coords0, (start0, mid0), coords1, (mid1, end1), pairs);
        }
    }
    if mid0 < end0 {
        if start1 < mid1 {
            chain_overlap_pairs(coords0, (mid0, end0), coords1, (start1, mid1), pairs);
        }
        if mid1 < end1 {
            chain_overlap_pairs(coords0, (mid0, end0), coords1, (mid1, end1), pairs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(pts: &[(f64, f64)]) -> Vec<Coordinate<f64>> {
        pts.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn single_monotone_run() {
        let c = coords(&[(0., 0.), (1., 2.), (3., 5.), (6., 6.)]);
        let mce = MonotoneChainEdge::new(0, &c);
        assert_eq!(mce.chain_count(), 1);
        assert_eq!(mce.chain_range(0), (0, 3));
        assert_eq!(mce.min_x(0), 0.);
        assert_eq!(mce.max_x(0), 6.);
    }

    #[test]
    fn direction_reversal_starts_a_new_chain() {
        // up, then down: two chains
        let c = coords(&[(0., 0.), (5., 5.), (10., 0.)]);
        let mce = MonotoneChainEdge::new(0, &c);
        assert_eq!(mce.chain_count(), 2);
        assert_eq!(mce.chain_range(0), (0, 1));
        assert_eq!(mce.chain_range(1), (1, 2));
    }

    #[test]
    fn axis_aligned_steps_share_a_chain() {
        // east then north never reverses either axis
        let c = coords(&[(0., 0.), (1., 0.), (1., 1.)]);
        let mce = MonotoneChainEdge::new(0, &c);
        assert_eq!(mce.chain_count(), 1);
    }

    #[test]
    fn zigzag_chain_count() {
        let c = coords(&[(0., 0.), (1., 1.), (2., 0.), (3., 1.), (4., 0.)]);
        let mce = MonotoneChainEdge::new(0, &c);
        assert_eq!(mce.chain_count(), 4);
    }

    #[test]
    fn duplicate_points_do_not_break_a_chain() {
        let c = coords(&[(0., 0.), (1., 1.), (1., 1.), (2., 2.)]);
        let mce = MonotoneChainEdge::new(0, &c);
        assert_eq!(mce.chain_count(), 1);
    }

    #[test]
    fn envelope_covers_interior_vertices() {
        let c = coords(&[(0., 0.), (1., 0.), (1., 1.)]);
        let mce = MonotoneChainEdge::new(0, &c);
        let env = mce.envelope(0);
        assert_eq!(env.min(), (0., 0.).into());
        assert_eq!(env.max(), (1., 1.).into());
    }

    #[test]
    fn overlap_pairs_prunes_disjoint_runs() {
        let a = coords(&[(0., 0.), (1., 1.), (2., 2.), (3., 3.), (4., 4.)]);
        let b = coords(&[(10., 10.), (11., 11.), (12., 12.)]);
        let mut pairs = Vec::new();
        chain_overlap_pairs(&a, (0, 4), &b, (0, 2), &mut pairs);
        assert!(pairs.is_empty());
    }

    #[test]
    fn overlap_pairs_finds_the_crossing_segment_pair() {
        let a = coords(&[(0., 0.), (2., 2.), (4., 4.), (6., 6.), (8., 8.)]);
        let b = coords(&[(0., 5.), (2., 4.5), (4., 4.2), (6., 3.), (8., 1.)]);
        let mut pairs = Vec::new();
        chain_overlap_pairs(&a, (0, 4), &b, (0, 4), &mut pairs);
        // the true crossing (between a[2..3] and b[2..3]) must be among
        // the candidates
        assert!(pairs.contains(&(2, 2)));
    }
}
