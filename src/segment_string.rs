use geo::{Coordinate, GeoFloat, Line};
use itertools::Itertools;

use crate::{
    intersect::{edge_distance, SegmentIntersection},
    node_list::{SegmentNode, SegmentNodeList},
};

/// One edge participating in noding: an immutable run of coordinates
/// with a list of intersection nodes discovered on it.
///
/// The coordinates never change after construction; only the node list
/// mutates. `D` is an opaque caller-owned handle (a parent-geometry id,
/// a label, ...) carried along and cloned into every substring; the
/// engine never inspects it.
#[derive(Debug, Clone)]
pub struct SegmentString<T: GeoFloat, D = ()> {
    coords: Vec<Coordinate<T>>,
    data: D,
    isolated: bool,
    nodes: SegmentNodeList<T>,
}

impl<T: GeoFloat> SegmentString<T> {
    /// Build a string with no attached data.
    pub fn from_coords(coords: Vec<Coordinate<T>>) -> Self {
        SegmentString::new(coords, ())
    }
}

impl<T: GeoFloat, D> SegmentString<T, D> {
    /// Build a string over `coords`, attaching the caller data `data`.
    ///
    /// # Panics
    ///
    /// If `coords` has fewer than two points or contains a non-finite
    /// coordinate.
    pub fn new(coords: Vec<Coordinate<T>>, data: D) -> Self {
        assert!(
            coords.len() >= 2,
            "a segment string requires at least two coordinates"
        );
        assert!(
            coords.iter().all(|c| c.x.is_finite() && c.y.is_finite()),
            "a segment string requires finite coordinates"
        );
        SegmentString {
            coords,
            data,
            isolated: false,
            nodes: SegmentNodeList::new(),
        }
    }

    #[inline]
    pub fn coords(&self) -> &[Coordinate<T>] {
        &self.coords
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Number of line segments (one less than the number of points).
    #[inline]
    pub fn num_segments(&self) -> usize {
        self.coords.len() - 1
    }

    /// The `i`-th segment as a [`Line`].
    #[inline]
    pub fn line(&self, i: usize) -> Line<T> {
        Line::new(self.coords[i], self.coords[i + 1])
    }

    #[inline]
    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn is_closed(&self) -> bool {
        self.coords[0] == self.coords[self.coords.len() - 1]
    }

    /// Whether the string takes part in no result component.
    #[inline]
    pub fn is_isolated(&self) -> bool {
        self.isolated
    }

    pub fn set_isolated(&mut self, isolated: bool) {
        self.isolated = isolated;
    }

    /// The intersection nodes recorded so far.
    #[inline]
    pub fn nodes(&self) -> &SegmentNodeList<T> {
        &self.nodes
    }

    /// Decompose into the coordinate vector and the caller data.
    pub fn into_parts(self) -> (Vec<Coordinate<T>>, D) {
        (self.coords, self.data)
    }

    /// Register an intersection point lying on segment `segment_index`.
    pub fn add_intersection(&mut self, pt: Coordinate<T>, segment_index: usize) {
        let dist = edge_distance(pt, self.line(segment_index));
        self.add_intersection_at(pt, segment_index, dist);
    }

    /// Register an intersection with a precomputed distance along the
    /// segment.
    ///
    /// A point that coincides with the segment's end vertex is
    /// normalized to `(segment_index + 1, dist = 0)`, so vertex-incident
    /// intersections always have a single canonical representation.
    pub fn add_intersection_at(&mut self, pt: Coordinate<T>, segment_index: usize, dist: T) {
        let next = segment_index + 1;
        if next < self.coords.len() && pt == self.coords[next] {
            self.nodes.add(pt, next, T::zero());
        } else {
            self.nodes.add(pt, segment_index, dist);
        }
    }

    /// Register every point of an intersection computed for segment
    /// `segment_index` of this string. `slot` states which of the two
    /// intersected segments (0 or 1) belongs to this string.
    pub fn add_intersections(
        &mut self,
        sect: &SegmentIntersection<T>,
        segment_index: usize,
        slot: usize,
    ) {
        for i in 0..sect.num_points() {
            self.add_intersection_at(sect.point(i), segment_index, sect.edge_distance(slot, i));
        }
    }

    /// Split every string of a collection at its intersection nodes.
    ///
    /// A string with no interior nodes yields itself unchanged. Each
    /// substring runs from one node to the next, with the string's own
    /// start and end as implicit outermost nodes; substrings that
    /// collapse to a single point are dropped.
    pub fn noded_substrings<I>(strings: I) -> Vec<SegmentString<T, D>>
    where
        D: Clone,
        I: IntoIterator<Item = SegmentString<T, D>>,
    {
        let mut out = Vec::new();
        for string in strings {
            string.append_substrings(&mut out);
        }
        out
    }

    fn append_substrings(self, out: &mut Vec<Self>)
    where
        D: Clone,
    {
        if self.nodes.is_empty() {
            out.push(self);
            return;
        }
        let nodes = self.nodes.completed(&self.coords);
        for (n0, n1) in nodes.iter().tuple_windows() {
            if let Some(coords) = split_coords(n0, n1, &self.coords) {
                out.push(SegmentString::new(coords, self.data.clone()));
            }
        }
    }
}

/// Coordinates of the substring between two consecutive nodes: the
/// first node's point, the vertices strictly between the nodes, and the
/// second node's point unless it merely repeats the final segment
/// start.
fn split_coords<T: GeoFloat>(
    n0: &SegmentNode<T>,
    n1: &SegmentNode<T>,
    coords: &[Coordinate<T>],
) -> Option<Vec<Coordinate<T>>> {
    let mut pts = Vec::with_capacity(n1.segment_index() - n0.segment_index() + 2);
    pts.push(n0.coord());
    for c in &coords[n0.segment_index() + 1..=n1.segment_index()] {
        pts.push(*c);
    }
    let last_seg_start = coords[n1.segment_index()];
    if n1.dist() > T::zero() || n1.coord() != last_seg_start {
        pts.push(n1.coord());
    }
    let pts: Vec<_> = pts.into_iter().dedup().collect();
    if pts.len() < 2 {
        None
    } else {
        Some(pts)
    }
}
