use std::cmp::Ordering;

use geo::{Coordinate, GeoFloat};
use log::{debug, trace};
use slab::Slab;

use crate::{
    monotone::{chain_overlap_pairs, MonotoneChainEdge},
    segment_string::SegmentString,
};

/// Callback invoked by the sweep for every candidate segment pair whose
/// monotone chains overlap.
///
/// Implementations decide what a candidate pair means: add intersection
/// nodes, collect intersection points, or just detect one. Candidate
/// pairs are a superset of the truly intersecting pairs; the callback
/// performs the exact intersection math.
///
/// Both segments of a pair may come from one string (a self-crossing
/// edge); since a string cannot be borrowed mutably twice, that case
/// has its own entry point.
pub trait SegmentIntersector<T: GeoFloat, D> {
    /// A candidate pair drawn from two distinct strings.
    fn process_intersections(
        &mut self,
        e0: &mut SegmentString<T, D>,
        seg0: usize,
        e1: &mut SegmentString<T, D>,
        seg1: usize,
    );

    /// A candidate pair drawn from a single string (self-intersection
    /// check). `seg0 == seg1` may occur and must be ignored.
    fn process_self_intersections(&mut self, e: &mut SegmentString<T, D>, seg0: usize, seg1: usize);

    /// When this returns `true` the sweep stops early.
    fn is_done(&self) -> bool {
        false
    }
}

/// Insert events sort before Delete events at equal x, so chains that
/// merely touch at an x-extreme are still tested against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    Insert,
    Delete,
}

/// A sweep event at one x-extreme of a monotone chain. The chain key
/// doubles as the Insert/Delete pairing: each chain emits exactly one
/// event of either kind.
#[derive(Debug, Clone, Copy)]
struct SweepLineEvent<T: GeoFloat> {
    x: T,
    kind: EventKind,
    chain: usize,
}

impl<T: GeoFloat> PartialEq for SweepLineEvent<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: GeoFloat> Eq for SweepLineEvent<T> {}

impl<T: GeoFloat> PartialOrd for SweepLineEvent<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.x.partial_cmp(&other.x).map(|o| {
            o.then_with(|| self.kind.cmp(&other.kind))
                .then_with(|| self.chain.cmp(&other.chain))
        })
    }
}

/// Derive `Ord` from `PartialOrd` and expect to not fail: event x
/// values come from finite coordinates, and the chain key breaks any
/// remaining tie, so the order is total and deterministic.
impl<T: GeoFloat> Ord for SweepLineEvent<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other)
            .expect("sweep events must be comparable")
    }
}

/// One monotone chain registered with the sweep.
#[derive(Debug, Clone, Copy)]
struct SweepChain {
    /// Index into the per-edge chain table.
    mce: usize,
    /// Chain ordinal within its edge.
    chain: usize,
    /// Which input set (0 or 1) the edge belongs to.
    set: usize,
}

/// Sweep-line intersector over the monotone chains of one or two edge
/// sets.
///
/// Every chain contributes an Insert event at its minimum x and a
/// Delete event at its maximum x. After sorting, the half-open event
/// span between an Insert and its Delete contains exactly the chains
/// live while this chain is, so scanning it tests every overlapping
/// chain pair exactly once and never a pair already swept apart.
#[derive(Debug, Default)]
pub struct SweepLineIntersector<T: GeoFloat> {
    events: Vec<SweepLineEvent<T>>,
    chains: Slab<SweepChain>,
    mces: Vec<MonotoneChainEdge<T>>,
    delete_pos: Vec<usize>,
    overlaps: usize,
}

impl<T: GeoFloat> SweepLineIntersector<T> {
    pub fn new() -> Self {
        SweepLineIntersector {
            events: Vec::new(),
            chains: Slab::new(),
            mces: Vec::new(),
            delete_pos: Vec::new(),
            overlaps: 0,
        }
    }

    /// Number of chain pairs tested during the last sweep.
    #[inline]
    pub fn overlap_count(&self) -> usize {
        self.overlaps
    }

    /// Test all edges of one set against each other (full noding mode,
    /// self-intersections included).
    pub fn compute_intersections<D, I>(&mut self, edges: &mut [SegmentString<T, D>], si: &mut I)
    where
        I: SegmentIntersector<T, D>,
    {
        self.clear();
        self.add_set(edges, 0);
        self.run(edges, &mut [], si, false);
    }

    /// Test the edges of two sets against each other; only cross-set
    /// chain pairs are examined.
    pub fn compute_intersections_between<D, I>(
        &mut self,
        edges0: &mut [SegmentString<T, D>],
        edges1: &mut [SegmentString<T, D>],
        si: &mut I,
    ) where
        I: SegmentIntersector<T, D>,
    {
        self.clear();
        self.add_set(edges0, 0);
        self.add_set(edges1, 1);
        self.run(edges0, edges1, si, true);
    }

    fn clear(&mut self) {
        self.events.clear();
        self.chains.clear();
        self.mces.clear();
        self.delete_pos.clear();
        self.overlaps = 0;
    }

    fn add_set<D>(&mut self, edges: &[SegmentString<T, D>], set: usize) {
        for (e, string) in edges.iter().enumerate() {
            let mce = MonotoneChainEdge::new(e, string.coords());
            let mce_idx = self.mces.len();
            for c in 0..mce.chain_count() {
                let key = self.chains.insert(SweepChain {
                    mce: mce_idx,
                    chain: c,
                    set,
                });
                self.events.push(SweepLineEvent {
                    x: mce.min_x(c),
                    kind: EventKind::Insert,
                    chain: key,
                });
                self.events.push(SweepLineEvent {
                    x: mce.max_x(c),
                    kind: EventKind::Delete,
                    chain: key,
                });
            }
            self.mces.push(mce);
        }
    }

    /// Sort the events and record, per chain, the sorted position of
    /// its Delete event. Each Insert's half-open active span is then
    /// `[insert_pos, delete_pos)`.
    fn prepare_events(&mut self) {
        self.events.sort_unstable();
        self.delete_pos = vec![0; self.chains.len()];
        for (i, ev) in self.events.iter().enumerate() {
            if ev.kind == EventKind::Delete {
                self.delete_pos[ev.chain] = i;
            }
        }
    }

    fn run<D, I>(
        &mut self,
        edges0: &mut [SegmentString<T, D>],
        edges1: &mut [SegmentString<T, D>],
        si: &mut I,
        mutual_only: bool,
    ) where
        I: SegmentIntersector<T, D>,
    {
        self.prepare_events();
        debug!(
            "sweep: {} events over {} chains",
            self.events.len(),
            self.chains.len()
        );
        for i in 0..self.events.len() {
            let ev = self.events[i];
            if ev.kind == EventKind::Insert {
                self.process_overlaps(i, self.delete_pos[ev.chain], ev.chain, edges0, edges1, si, mutual_only);
            }
            if si.is_done() {
                break;
            }
        }
        debug!("sweep: tested {} chain overlaps", self.overlaps);
    }

    /// Scan the active span of the chain inserted at `start`. The span
    /// includes the chain's own Insert event, so self-intersection of
    /// an edge is checked too; the half-open end excludes its Delete.
    #[allow(clippy::too_many_arguments)]
    fn process_overlaps<D, I>(
        &mut self,
        start: usize,
        end: usize,
        key0: usize,
        edges0: &mut [SegmentString<T, D>],
        edges1: &mut [SegmentString<T, D>],
        si: &mut I,
        mutual_only: bool,
    ) where
        I: SegmentIntersector<T, D>,
    {
        let c0 = self.chains[key0];
        for i in start..end {
            let ev = self.events[i];
            if ev.kind != EventKind::Insert {
                continue;
            }
            let c1 = self.chains[ev.chain];
            if mutual_only && c0.set == c1.set {
                continue;
            }
            self.test_chains(c0, c1, edges0, edges1, si);
            self.overlaps += 1;
            if si.is_done() {
                return;
            }
        }
    }

    fn test_chains<D, I>(
        &mut self,
        c0: SweepChain,
        c1: SweepChain,
        edges0: &mut [SegmentString<T, D>],
        edges1: &mut [SegmentString<T, D>],
        si: &mut I,
    ) where
        I: SegmentIntersector<T, D>,
    {
        let mce0 = &self.mces[c0.mce];
        let mce1 = &self.mces[c1.mce];
        let (e0, e1) = (mce0.edge(), mce1.edge());
        let range0 = mce0.chain_range(c0.chain);
        let range1 = mce1.chain_range(c1.chain);

        let mut pairs = Vec::new();
        {
            let ed0: &[SegmentString<T, D>] = edges0;
            let ed1: &[SegmentString<T, D>] = edges1;
            let coords0: &[Coordinate<T>] = if c0.set == 0 {
                ed0[e0].coords()
            } else {
                ed1[e0].coords()
            };
            let coords1: &[Coordinate<T>] = if c1.set == 0 {
                ed0[e1].coords()
            } else {
                ed1[e1].coords()
            };
            chain_overlap_pairs(coords0, range0, coords1, range1, &mut pairs);
        }
        if pairs.is_empty() {
            return;
        }
        trace!(
            "chains ({}, {}) x ({}, {}): {} candidate segment pairs",
            e0,
            c0.chain,
            e1,
            c1.chain,
            pairs.len()
        );

        if c0.set == c1.set {
            let edges = if c0.set == 0 { edges0 } else { edges1 };
            if e0 == e1 {
                let e = &mut edges[e0];
                for (s0, s1) in pairs {
                    si.process_self_intersections(e, s0, s1);
                }
            } else {
                let (a, b) = two_mut(edges, e0, e1);
                for (s0, s1) in pairs {
                    si.process_intersections(a, s0, b, s1);
                }
            }
        } else {
            let (a, b) = if c0.set == 0 {
                (&mut edges0[e0], &mut edges1[e1])
            } else {
                (&mut edges1[e0], &mut edges0[e1])
            };
            for (s0, s1) in pairs {
                si.process_intersections(a, s0, b, s1);
            }
        }
    }
}

/// Distinct mutable references to two elements of one slice.
fn two_mut<S>(slice: &mut [S], a: usize, b: usize) -> (&mut S, &mut S) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = slice.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = slice.split_at_mut(a);
        let second = &mut lo[b];
        (&mut hi[0], second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adder::InteriorIntersectionCollector;

    fn init_log() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn string(pts: &[(f64, f64)]) -> SegmentString<f64> {
        SegmentString::from_coords(pts.iter().map(|&p| p.into()).collect())
    }

    /// Boundary of the axis-aligned unit square with lower-left corner
    /// at `(x, y)`, as one closed string.
    fn unit_square(x: f64, y: f64) -> SegmentString<f64> {
        string(&[
            (x, y),
            (x + 1., y),
            (x + 1., y + 1.),
            (x, y + 1.),
            (x, y),
        ])
    }

    #[test]
    fn empty_input_reports_no_overlaps() {
        let mut sweep = SweepLineIntersector::<f64>::new();
        let mut collector = InteriorIntersectionCollector::new();
        let mut edges: [SegmentString<f64>; 0] = [];
        sweep.compute_intersections(&mut edges, &mut collector);
        assert_eq!(sweep.overlap_count(), 0);
        assert!(collector.points().is_empty());
    }

    #[test]
    fn disjoint_squares_have_no_mutual_overlaps() {
        init_log();
        let mut a = [unit_square(0., 0.)];
        let mut b = [unit_square(3., 0.)];
        let mut sweep = SweepLineIntersector::new();
        let mut collector = InteriorIntersectionCollector::new();
        sweep.compute_intersections_between(&mut a, &mut b, &mut collector);
        assert_eq!(sweep.overlap_count(), 0);
        assert!(collector.points().is_empty());
    }

    #[test]
    fn offset_squares_cross_exactly_twice() {
        init_log();
        let mut a = [unit_square(0., 0.)];
        let mut b = [unit_square(0.5, 0.5)];
        let mut sweep = SweepLineIntersector::new();
        let mut collector = InteriorIntersectionCollector::new();
        sweep.compute_intersections_between(&mut a, &mut b, &mut collector);
        let mut points = collector.into_points();
        points.sort_by(|p, q| p.x.partial_cmp(&q.x).unwrap());
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], (0.5, 1.).into());
        assert_eq!(points[1], (1., 0.5).into());
    }

    #[test]
    fn single_set_finds_self_crossing() {
        init_log();
        // bow-tie: one string crossing itself at (1, 1)
        let mut edges = [string(&[(0., 0.), (2., 2.), (2., 0.), (0., 2.)])];
        let mut sweep = SweepLineIntersector::new();
        let mut collector = InteriorIntersectionCollector::new();
        sweep.compute_intersections(&mut edges, &mut collector);
        assert_eq!(collector.points(), &[Coordinate::from((1., 1.))]);
    }

    #[test]
    fn mutual_only_suppresses_same_set_crossings() {
        init_log();
        let a = || string(&[(0., 0.), (10., 10.)]);
        let b = || string(&[(0., 10.), (10., 0.)]);
        let c = || string(&[(0., 8.), (10., 8.)]);

        // single set: all three pairwise crossings
        let mut all = [a(), b(), c()];
        let mut sweep = SweepLineIntersector::new();
        let mut collector = InteriorIntersectionCollector::new();
        sweep.compute_intersections(&mut all, &mut collector);
        assert_eq!(collector.points().len(), 3);

        // a alone vs {b, c}: the b x c crossing at (2, 8) disappears
        let mut set0 = [a()];
        let mut set1 = [b(), c()];
        let mut collector = InteriorIntersectionCollector::new();
        sweep.compute_intersections_between(&mut set0, &mut set1, &mut collector);
        let mut points = collector.into_points();
        points.sort_by(|p, q| p.x.partial_cmp(&q.x).unwrap());
        assert_eq!(points, vec![(5., 5.).into(), (8., 8.).into()]);
    }

    #[test]
    fn overlap_count_is_stable_across_runs() {
        let mut edges = [unit_square(0., 0.), unit_square(0.5, 0.5)];
        let mut sweep = SweepLineIntersector::new();
        let mut collector = InteriorIntersectionCollector::new();
        sweep.compute_intersections(&mut edges, &mut collector);
        let first = sweep.overlap_count();
        assert!(first > 0);
        let mut collector = InteriorIntersectionCollector::new();
        sweep.compute_intersections(&mut edges, &mut collector);
        assert_eq!(sweep.overlap_count(), first);
    }
}
