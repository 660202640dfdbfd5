use geo::{Coordinate, GeoFloat};

use crate::{
    intersect::{LineIntersector, RobustLineIntersector, SegmentIntersection},
    segment_string::SegmentString,
    sweep::SegmentIntersector,
};

/// Computes the intersection of every candidate segment pair and
/// records it as nodes on both strings (full-noding callback).
///
/// Counters distinguish proper crossings and interior intersections
/// for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct IntersectionAdder<L = RobustLineIntersector> {
    li: L,
    num_intersections: usize,
    num_proper: usize,
    num_interior: usize,
}

impl IntersectionAdder {
    pub fn new() -> Self {
        IntersectionAdder::with_intersector(RobustLineIntersector)
    }
}

impl<L> IntersectionAdder<L> {
    pub fn with_intersector(li: L) -> Self {
        IntersectionAdder {
            li,
            num_intersections: 0,
            num_proper: 0,
            num_interior: 0,
        }
    }

    #[inline]
    pub fn has_intersections(&self) -> bool {
        self.num_intersections > 0
    }

    #[inline]
    pub fn num_intersections(&self) -> usize {
        self.num_intersections
    }

    #[inline]
    pub fn num_proper_intersections(&self) -> usize {
        self.num_proper
    }

    #[inline]
    pub fn num_interior_intersections(&self) -> usize {
        self.num_interior
    }

    fn record<T: GeoFloat>(&mut self, sect: &SegmentIntersection<T>) {
        self.num_intersections += 1;
        if sect.is_proper() {
            self.num_proper += 1;
        }
        if sect.is_interior() {
            self.num_interior += 1;
        }
    }
}

/// A single-point intersection of adjacent segments of one string is
/// their shared vertex; splitting there would be a no-op.
fn is_trivial<T: GeoFloat, D>(
    e: &SegmentString<T, D>,
    seg0: usize,
    seg1: usize,
    sect: &SegmentIntersection<T>,
) -> bool {
    if sect.num_points() != 1 {
        return false;
    }
    let (lo, hi) = if seg0 < seg1 { (seg0, seg1) } else { (seg1, seg0) };
    if hi - lo == 1 {
        return true;
    }
    e.is_closed() && lo == 0 && hi == e.num_segments() - 1
}

impl<T: GeoFloat, D, L: LineIntersector<T>> SegmentIntersector<T, D> for IntersectionAdder<L> {
    fn process_intersections(
        &mut self,
        e0: &mut SegmentString<T, D>,
        seg0: usize,
        e1: &mut SegmentString<T, D>,
        seg1: usize,
    ) {
        let sect = self.li.compute(e0.line(seg0), e1.line(seg1));
        if !sect.has_intersection() {
            return;
        }
        self.record(&sect);
        e0.add_intersections(&sect, seg0, 0);
        e1.add_intersections(&sect, seg1, 1);
    }

    fn process_self_intersections(
        &mut self,
        e: &mut SegmentString<T, D>,
        seg0: usize,
        seg1: usize,
    ) {
        if seg0 == seg1 {
            return;
        }
        let sect = self.li.compute(e.line(seg0), e.line(seg1));
        if !sect.has_intersection() || is_trivial(e, seg0, seg1, &sect) {
            return;
        }
        self.record(&sect);
        e.add_intersections(&sect, seg0, 0);
        e.add_intersections(&sect, seg1, 1);
    }
}

/// Collects the interior intersection points of candidate pairs
/// without touching the strings (first pass of snap rounding).
#[derive(Debug, Clone, Default)]
pub struct InteriorIntersectionCollector<T: GeoFloat, L = RobustLineIntersector> {
    li: L,
    points: Vec<Coordinate<T>>,
}

impl<T: GeoFloat> InteriorIntersectionCollector<T> {
    pub fn new() -> Self {
        InteriorIntersectionCollector::with_intersector(RobustLineIntersector)
    }
}

impl<T: GeoFloat, L> InteriorIntersectionCollector<T, L> {
    pub fn with_intersector(li: L) -> Self {
        InteriorIntersectionCollector {
            li,
            points: Vec::new(),
        }
    }

    pub fn points(&self) -> &[Coordinate<T>] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Coordinate<T>> {
        self.points
    }

    fn collect(&mut self, sect: &SegmentIntersection<T>) {
        if sect.has_intersection() && sect.is_interior() {
            for i in 0..sect.num_points() {
                self.points.push(sect.point(i));
            }
        }
    }
}

impl<T: GeoFloat, D, L: LineIntersector<T>> SegmentIntersector<T, D>
    for InteriorIntersectionCollector<T, L>
{
    fn process_intersections(
        &mut self,
        e0: &mut SegmentString<T, D>,
        seg0: usize,
        e1: &mut SegmentString<T, D>,
        seg1: usize,
    ) {
        let sect = self.li.compute(e0.line(seg0), e1.line(seg1));
        self.collect(&sect);
    }

    fn process_self_intersections(
        &mut self,
        e: &mut SegmentString<T, D>,
        seg0: usize,
        seg1: usize,
    ) {
        if seg0 == seg1 {
            return;
        }
        let sect = self.li.compute(e.line(seg0), e.line(seg1));
        self.collect(&sect);
    }
}

/// Detects whether any candidate pair intersects away from both
/// segments' endpoints, stopping the sweep at the first hit. Backs the
/// noding validator.
#[derive(Debug, Clone, Default)]
pub struct InteriorIntersectionDetector<T: GeoFloat, L = RobustLineIntersector> {
    li: L,
    found: Option<Coordinate<T>>,
}

impl<T: GeoFloat> InteriorIntersectionDetector<T> {
    pub fn new() -> Self {
        InteriorIntersectionDetector::with_intersector(RobustLineIntersector)
    }
}

impl<T: GeoFloat, L> InteriorIntersectionDetector<T, L> {
    pub fn with_intersector(li: L) -> Self {
        InteriorIntersectionDetector { li, found: None }
    }

    /// The first interior intersection found, if any.
    pub fn intersection(&self) -> Option<Coordinate<T>> {
        self.found
    }

    fn detect(&mut self, sect: &SegmentIntersection<T>) {
        if self.found.is_none() && sect.has_intersection() && sect.is_interior() {
            self.found = Some(sect.point(0));
        }
    }
}

impl<T: GeoFloat, D, L: LineIntersector<T>> SegmentIntersector<T, D>
    for InteriorIntersectionDetector<T, L>
{
    fn process_intersections(
        &mut self,
        e0: &mut SegmentString<T, D>,
        seg0: usize,
        e1: &mut SegmentString<T, D>,
        seg1: usize,
    ) {
        if <Self as SegmentIntersector<T, D>>::is_done(self) {
            return;
        }
        let sect = self.li.compute(e0.line(seg0), e1.line(seg1));
        self.detect(&sect);
    }

    fn process_self_intersections(
        &mut self,
        e: &mut SegmentString<T, D>,
        seg0: usize,
        seg1: usize,
    ) {
        if <Self as SegmentIntersector<T, D>>::is_done(self) || seg0 == seg1 {
            return;
        }
        let sect = self.li.compute(e.line(seg0), e.line(seg1));
        self.detect(&sect);
    }

    fn is_done(&self) -> bool {
        self.found.is_some()
    }
}
