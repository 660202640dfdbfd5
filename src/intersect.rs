use geo::{
    line_intersection::{line_intersection, LineIntersection},
    Coordinate, GeoFloat, Line,
};
use smallvec::SmallVec;

/// The outcome of intersecting one pair of line segments.
///
/// Holds the 0, 1 or 2 intersection points (2 for a collinear overlap)
/// together with the input segments, so the distance of each point
/// along either segment can be queried when registering nodes.
#[derive(Debug, Clone)]
pub struct SegmentIntersection<T: GeoFloat> {
    lines: [Line<T>; 2],
    points: SmallVec<[Coordinate<T>; 2]>,
    proper: bool,
}

impl<T: GeoFloat> SegmentIntersection<T> {
    /// Assemble an intersection result for the segment pair
    /// `(l0, l1)`. `proper` must only be set for a single point
    /// interior to both segments. Intersector implementations use this
    /// to report their findings.
    pub fn new(l0: Line<T>, l1: Line<T>, points: &[Coordinate<T>], proper: bool) -> Self {
        debug_assert!(points.len() <= 2);
        SegmentIntersection {
            lines: [l0, l1],
            points: SmallVec::from_slice(points),
            proper,
        }
    }

    /// Whether any intersection exists.
    #[inline]
    pub fn has_intersection(&self) -> bool {
        !self.points.is_empty()
    }

    /// Number of intersection points (0, 1 or 2).
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// The `i`-th intersection point.
    #[inline]
    pub fn point(&self, i: usize) -> Coordinate<T> {
        self.points[i]
    }

    /// Whether the intersection is a single point in the interior of
    /// both segments.
    #[inline]
    pub fn is_proper(&self) -> bool {
        self.proper
    }

    /// Whether some intersection point lies in the interior of the
    /// segment in `slot` (0 or 1), i.e. is not one of its endpoints.
    pub fn is_interior_to(&self, slot: usize) -> bool {
        let line = self.lines[slot];
        self.points
            .iter()
            .any(|&p| p != line.start && p != line.end)
    }

    /// Whether some intersection point is interior to either segment.
    ///
    /// This is the condition under which a node must be introduced: it
    /// covers proper crossings as well as T-junctions, where an
    /// endpoint of one segment lies inside the other.
    pub fn is_interior(&self) -> bool {
        self.is_interior_to(0) || self.is_interior_to(1)
    }

    /// Distance of the `i`-th intersection point along the segment in
    /// `slot`, using the dominant-axis metric of [`edge_distance`].
    pub fn edge_distance(&self, slot: usize, i: usize) -> T {
        edge_distance(self.points[i], self.lines[slot])
    }
}

/// Distance metric of a point along a segment, measured on the
/// segment's dominant axis.
///
/// The value is only comparable between points on the same segment; it
/// is used as the secondary sort key of intersection nodes. A point
/// distinct from the segment start always gets a non-zero distance.
pub fn edge_distance<T: GeoFloat>(p: Coordinate<T>, line: Line<T>) -> T {
    let dx = (line.end.x - line.start.x).abs();
    let dy = (line.end.y - line.start.y).abs();
    if p == line.start {
        T::zero()
    } else if p == line.end {
        if dx > dy {
            dx
        } else {
            dy
        }
    } else {
        let pdx = (p.x - line.start.x).abs();
        let pdy = (p.y - line.start.y).abs();
        let dist = if dx > dy { pdx } else { pdy };
        if dist == T::zero() {
            // point is off the start but flat on the dominant axis
            if pdx > pdy {
                pdx
            } else {
                pdy
            }
        } else {
            dist
        }
    }
}

/// Strategy for intersecting two line segments.
///
/// The engine never intersects segments directly; it goes through this
/// trait, so an exact-arithmetic variant can be substituted without
/// touching the sweep or the snapper.
pub trait LineIntersector<T: GeoFloat> {
    fn compute(&self, l0: Line<T>, l1: Line<T>) -> SegmentIntersection<T>;
}

/// Default intersector, delegating to the robust predicates shipped
/// with [`geo`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RobustLineIntersector;

impl<T: GeoFloat> LineIntersector<T> for RobustLineIntersector {
    fn compute(&self, l0: Line<T>, l1: Line<T>) -> SegmentIntersection<T> {
        // Zero-length segments carry no direction and contribute nothing.
        if l0.start == l0.end || l1.start == l1.end {
            return SegmentIntersection::new(l0, l1, &[], false);
        }
        match line_intersection(l0, l1) {
            None => SegmentIntersection::new(l0, l1, &[], false),
            Some(LineIntersection::SinglePoint {
                intersection,
                is_proper,
            }) => SegmentIntersection::new(l0, l1, &[intersection], is_proper),
            Some(LineIntersection::Collinear { intersection }) => SegmentIntersection::new(
                l0,
                l1,
                &[intersection.start, intersection.end],
                false,
            ),
        }
    }
}
