use float_next_after::NextAfter;
use geo::{intersects::Intersects, Coordinate, GeoFloat, Line, Rect};
use itertools::Itertools;
use log::debug;
use rstar::{RTree, RTreeNum, RTreeObject, AABB};

use crate::{
    adder::InteriorIntersectionCollector,
    error::{NodingError, Result},
    intersect::{LineIntersector, RobustLineIntersector},
    monotone::MonotoneChainEdge,
    noder::Noder,
    segment_string::SegmentString,
    sweep::SweepLineIntersector,
    validate::NodingValidator,
};

/// Round a coordinate onto the grid defined by `scale` (grid spacing
/// `1 / scale`, cell centers at multiples of it).
pub fn round_coord<T: GeoFloat>(c: Coordinate<T>, scale: T) -> Coordinate<T> {
    Coordinate {
        x: (c.x * scale).round() / scale,
        y: (c.y * scale).round() / scale,
    }
}

/// One cell of the snapping grid, placed around a candidate point.
///
/// All raw coordinates mapping into the cell collapse to its single
/// representative point [`rounded`](HotPixel::rounded) after snapping.
#[derive(Debug, Clone)]
pub struct HotPixel<T: GeoFloat> {
    pt: Coordinate<T>,
    center: Coordinate<T>,
    scale: T,
    min: Coordinate<T>,
    max: Coordinate<T>,
}

impl<T: GeoFloat> HotPixel<T> {
    /// The pixel containing `pt` at the given scale factor.
    pub fn new(pt: Coordinate<T>, scale: T) -> Self {
        debug_assert!(scale > T::zero());
        let center = round_coord(pt, scale);
        let two = T::one() + T::one();
        let half = T::one() / (two * scale);
        HotPixel {
            pt,
            center,
            scale,
            min: Coordinate {
                x: center.x - half,
                y: center.y - half,
            },
            max: Coordinate {
                x: center.x + half,
                y: center.y + half,
            },
        }
    }

    /// The original, unrounded candidate point.
    #[inline]
    pub fn point(&self) -> Coordinate<T> {
        self.pt
    }

    /// The cell's representative point; snapped nodes get this
    /// coordinate.
    #[inline]
    pub fn rounded(&self) -> Coordinate<T> {
        self.center
    }

    /// The corner envelope of the cell.
    pub fn envelope(&self) -> Rect<T> {
        Rect::new(self.min, self.max)
    }

    /// Padding for index queries: three quarters of a cell around the
    /// candidate point, enough to catch every segment that can touch
    /// the pixel.
    pub(crate) fn safe_pad(&self) -> T {
        let two = T::one() + T::one();
        let three = two + T::one();
        three / (two * two * self.scale)
    }

    /// Whether the segment `p0`–`p1` passes through this pixel.
    ///
    /// Boundary semantics follow the tolerance-square rule: a proper
    /// crossing of any side counts, a non-proper touch counts only on
    /// the bottom and left sides, and a segment endpoint equal to the
    /// pixel's candidate point counts. The half-open boundary keeps a
    /// segment grazing two adjacent cells from snapping into both.
    pub fn intersects_segment<L: LineIntersector<T>>(
        &self,
        p0: Coordinate<T>,
        p1: Coordinate<T>,
        li: &L,
    ) -> bool {
        if !Rect::new(p0, p1).intersects(&self.envelope()) {
            return false;
        }
        self.intersects_tolerance_square(Line::new(p0, p1), li)
    }

    fn intersects_tolerance_square<L: LineIntersector<T>>(&self, seg: Line<T>, li: &L) -> bool {
        // corners, clockwise from the upper right
        let c0 = self.max;
        let c1 = Coordinate {
            x: self.min.x,
            y: self.max.y,
        };
        let c2 = self.min;
        let c3 = Coordinate {
            x: self.max.x,
            y: self.min.y,
        };

        let top = li.compute(seg, Line::new(c0, c1));
        if top.is_proper() {
            return true;
        }
        let left = li.compute(seg, Line::new(c1, c2));
        if left.is_proper() {
            return true;
        }
        let bottom = li.compute(seg, Line::new(c2, c3));
        if bottom.is_proper() {
            return true;
        }
        let right = li.compute(seg, Line::new(c3, c0));
        if right.is_proper() {
            return true;
        }
        if left.has_intersection() && bottom.has_intersection() {
            return true;
        }
        seg.start == self.pt || seg.end == self.pt
    }
}

/// Envelope entry for one monotone chain in the snapper's tree.
#[derive(Debug, Clone)]
struct ChainRef<T: GeoFloat + RTreeNum> {
    env: AABB<[T; 2]>,
    edge: usize,
    start: usize,
    end: usize,
}

impl<T: GeoFloat + RTreeNum> RTreeObject for ChainRef<T> {
    type Envelope = AABB<[T; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.env
    }
}

/// Forces hot pixels onto every indexed segment passing through them.
///
/// Holds an r-tree over the monotone-chain envelopes of all edges, so
/// each snap only examines the chains near the pixel.
#[derive(Debug)]
pub struct PointSnapper<T: GeoFloat + RTreeNum> {
    tree: RTree<ChainRef<T>>,
}

impl<T: GeoFloat + RTreeNum + NextAfter> PointSnapper<T> {
    /// Index the monotone chains of every edge.
    pub fn new<D>(edges: &[SegmentString<T, D>]) -> Self {
        let mut entries = Vec::new();
        for (e, string) in edges.iter().enumerate() {
            let mce = MonotoneChainEdge::new(e, string.coords());
            for c in 0..mce.chain_count() {
                let (start, end) = mce.chain_range(c);
                let env = mce.envelope(c);
                entries.push(ChainRef {
                    env: AABB::from_corners(
                        [env.min().x, env.min().y],
                        [env.max().x, env.max().y],
                    ),
                    edge: e,
                    start,
                    end,
                });
            }
        }
        PointSnapper {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Snap every indexed segment passing through `pixel`, inserting a
    /// node at the pixel's representative point. Returns whether any
    /// node was inserted.
    pub fn snap<D, L>(
        &self,
        pixel: &HotPixel<T>,
        edges: &mut [SegmentString<T, D>],
        li: &L,
    ) -> bool
    where
        L: LineIntersector<T>,
    {
        self.snap_excluding(pixel, edges, None, li)
    }

    /// Vertex form of [`snap`](PointSnapper::snap): the pixel belongs
    /// to vertex `vertex` of edge `edge`, whose two incident segments
    /// are skipped so the vertex does not snap onto itself.
    pub fn snap_vertex<D, L>(
        &self,
        pixel: &HotPixel<T>,
        edges: &mut [SegmentString<T, D>],
        edge: usize,
        vertex: usize,
        li: &L,
    ) -> bool
    where
        L: LineIntersector<T>,
    {
        self.snap_excluding(pixel, edges, Some((edge, vertex)), li)
    }

    fn snap_excluding<D, L>(
        &self,
        pixel: &HotPixel<T>,
        edges: &mut [SegmentString<T, D>],
        exclude: Option<(usize, usize)>,
        li: &L,
    ) -> bool
    where
        L: LineIntersector<T>,
    {
        let query = self.safe_envelope(pixel);
        let mut added = false;
        for chain in self.tree.locate_in_envelope_intersecting(&query) {
            for seg in chain.start..chain.end {
                if let Some((x_edge, x_vertex)) = exclude {
                    if chain.edge == x_edge && (seg == x_vertex || seg + 1 == x_vertex) {
                        continue;
                    }
                }
                let line = edges[chain.edge].line(seg);
                if pixel.intersects_segment(line.start, line.end, li) {
                    edges[chain.edge].add_intersection(pixel.rounded(), seg);
                    added = true;
                }
            }
        }
        added
    }

    /// Query envelope around the pixel's candidate point, widened one
    /// ULP outward so boundary-sitting chain envelopes are never missed
    /// by the index.
    fn safe_envelope(&self, pixel: &HotPixel<T>) -> AABB<[T; 2]> {
        let pad = pixel.safe_pad();
        let p = pixel.point();
        AABB::from_corners(
            [
                (p.x - pad).next_after(T::neg_infinity()),
                (p.y - pad).next_after(T::neg_infinity()),
            ],
            [
                (p.x + pad).next_after(T::infinity()),
                (p.y + pad).next_after(T::infinity()),
            ],
        )
    }
}

/// Snap-rounding noder: nodes a set of segment strings and forces all
/// vertices and intersection points onto a fixed-precision grid, so
/// the output contains no interior intersections even in the presence
/// of floating-point rounding.
///
/// One `compute_nodes` call runs a fixed, single-pass sequence: round
/// the input vertices onto the grid, find all interior intersections,
/// snap a hot pixel onto each, then snap every original vertex
/// (rounding can create new crossings, so vertices must be revisited),
/// and finally split the strings at the accumulated nodes. No state
/// survives between calls.
#[derive(Debug, Clone)]
pub struct SnapRounder<T: GeoFloat, L = RobustLineIntersector> {
    scale: T,
    li: L,
    validate: bool,
}

impl<T: GeoFloat> SnapRounder<T> {
    /// A snap rounder with grid scale factor `scale` (grid spacing
    /// `1 / scale`) and the default intersector.
    ///
    /// `scale` must be finite and positive; anything else is rejected
    /// with [`NodingError::InvalidScaleFactor`], never clamped.
    pub fn new(scale: T) -> Result<Self> {
        SnapRounder::with_intersector(scale, RobustLineIntersector)
    }
}

impl<T: GeoFloat, L> SnapRounder<T, L> {
    /// Like [`new`](SnapRounder::new), with an injected intersector.
    pub fn with_intersector(scale: T, li: L) -> Result<Self> {
        if !scale.is_finite() || scale <= T::zero() {
            return Err(NodingError::InvalidScaleFactor(
                scale.to_f64().unwrap_or(f64::NAN),
            ));
        }
        Ok(SnapRounder {
            scale,
            li,
            validate: false,
        })
    }

    /// Check the noding post-condition on the output and fail with
    /// [`NodingError::NotNoded`] if it does not hold.
    pub fn validating(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    #[inline]
    pub fn scale(&self) -> T {
        self.scale
    }

    /// Round one input string onto the grid, dropping repeated points.
    /// A string collapsing below two points contributes nothing.
    fn rounded_string<D>(&self, string: SegmentString<T, D>) -> Option<SegmentString<T, D>> {
        let scale = self.scale;
        let (coords, data) = string.into_parts();
        let coords: Vec<_> = coords
            .into_iter()
            .map(|c| round_coord(c, scale))
            .dedup()
            .collect();
        if coords.len() < 2 {
            debug!("snap-round: edge collapsed to a point, dropped");
            None
        } else {
            Some(SegmentString::new(coords, data))
        }
    }
}

impl<T, D, L> Noder<T, D> for SnapRounder<T, L>
where
    T: GeoFloat + RTreeNum + NextAfter,
    D: Clone,
    L: LineIntersector<T> + Clone,
{
    fn compute_nodes(
        &mut self,
        edges: Vec<SegmentString<T, D>>,
    ) -> Result<Vec<SegmentString<T, D>>> {
        let mut edges: Vec<_> = edges
            .into_iter()
            .filter_map(|s| self.rounded_string(s))
            .collect();

        let snapper = PointSnapper::new(&edges);

        let mut sweep = SweepLineIntersector::new();
        let mut collector = InteriorIntersectionCollector::with_intersector(self.li.clone());
        sweep.compute_intersections(&mut edges, &mut collector);
        let intersections = collector.into_points();
        debug!(
            "snap-round: {} interior intersection points over {} chain overlaps",
            intersections.len(),
            sweep.overlap_count()
        );

        for pt in intersections {
            let pixel = HotPixel::new(pt, self.scale);
            snapper.snap(&pixel, &mut edges, &self.li);
        }

        // A vertex whose pixel captured another edge becomes a node on
        // its own string as well.
        for e in 0..edges.len() {
            for i in 0..edges[e].len() - 1 {
                let pt = edges[e].coords()[i];
                let pixel = HotPixel::new(pt, self.scale);
                if snapper.snap_vertex(&pixel, &mut edges, e, i, &self.li) {
                    edges[e].add_intersection(pt, i);
                }
            }
        }

        let mut result = SegmentString::noded_substrings(edges);
        if self.validate {
            NodingValidator::with_intersector(self.li.clone()).check_valid(&mut result)?;
        }
        Ok(result)
    }
}
