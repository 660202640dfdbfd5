use geo::GeoFloat;
use log::debug;

use crate::{
    adder::IntersectionAdder,
    error::Result,
    intersect::{LineIntersector, RobustLineIntersector},
    segment_string::SegmentString,
    sweep::SweepLineIntersector,
};

/// Computes the intersection nodes of a set of segment strings and
/// splits them there.
///
/// Implementations consume the input strings and return the fully
/// noded substrings; invoking `compute_nodes` again starts from
/// scratch, no state is carried across calls.
pub trait Noder<T: GeoFloat, D> {
    fn compute_nodes(
        &mut self,
        edges: Vec<SegmentString<T, D>>,
    ) -> Result<Vec<SegmentString<T, D>>>;
}

/// Plain full noder: finds every intersection with the monotone-chain
/// sweep and splits the strings there, without snapping coordinates to
/// a grid.
///
/// The output is only guaranteed free of interior intersections when
/// the input coordinates are well-conditioned; for a robustness
/// guarantee use [`SnapRounder`](crate::SnapRounder).
#[derive(Debug, Clone, Default)]
pub struct MonoChainNoder<L = RobustLineIntersector> {
    li: L,
}

impl MonoChainNoder {
    pub fn new() -> Self {
        MonoChainNoder::with_intersector(RobustLineIntersector)
    }
}

impl<L> MonoChainNoder<L> {
    pub fn with_intersector(li: L) -> Self {
        MonoChainNoder { li }
    }
}

impl<T, D, L> Noder<T, D> for MonoChainNoder<L>
where
    T: GeoFloat,
    D: Clone,
    L: LineIntersector<T> + Clone,
{
    fn compute_nodes(
        &mut self,
        mut edges: Vec<SegmentString<T, D>>,
    ) -> Result<Vec<SegmentString<T, D>>> {
        let mut sweep = SweepLineIntersector::new();
        let mut adder = IntersectionAdder::with_intersector(self.li.clone());
        sweep.compute_intersections(&mut edges, &mut adder);
        debug!(
            "noding: {} intersections ({} proper) over {} chain overlaps",
            adder.num_intersections(),
            adder.num_proper_intersections(),
            sweep.overlap_count()
        );
        Ok(SegmentString::noded_substrings(edges))
    }
}
