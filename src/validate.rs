use geo::GeoFloat;
use log::debug;

use crate::{
    adder::InteriorIntersectionDetector,
    error::{NodingError, Result},
    intersect::{LineIntersector, RobustLineIntersector},
    segment_string::SegmentString,
    sweep::SweepLineIntersector,
};

/// Post-condition checker for noded output.
///
/// Re-runs the sweep over the noded substrings in full-noding mode; if
/// any pair still intersects away from both segments' endpoints, the
/// noding failed. The violation is reported to the caller, never
/// repaired: it signals a defect in the noding pipeline, not a data
/// problem in the input.
#[derive(Debug, Clone, Default)]
pub struct NodingValidator<L = RobustLineIntersector> {
    li: L,
}

impl NodingValidator {
    pub fn new() -> Self {
        NodingValidator::with_intersector(RobustLineIntersector)
    }
}

impl<L> NodingValidator<L> {
    pub fn with_intersector(li: L) -> Self {
        NodingValidator { li }
    }

    /// Check that no two strings intersect in their interiors.
    ///
    /// The strings are only read; the mutable borrow is imposed by the
    /// sweep callback contract.
    pub fn check_valid<T, D>(&self, edges: &mut [SegmentString<T, D>]) -> Result<()>
    where
        T: GeoFloat,
        L: LineIntersector<T> + Clone,
    {
        let mut detector = InteriorIntersectionDetector::with_intersector(self.li.clone());
        SweepLineIntersector::new().compute_intersections(edges, &mut detector);
        match detector.intersection() {
            Some(pt) => {
                debug!("noding validation failed at {:?}", pt);
                Err(NodingError::NotNoded {
                    x: pt.x.to_f64().unwrap_or(f64::NAN),
                    y: pt.y.to_f64().unwrap_or(f64::NAN),
                })
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(pts: &[(f64, f64)]) -> SegmentString<f64> {
        SegmentString::from_coords(pts.iter().map(|&p| p.into()).collect())
    }

    #[test]
    fn properly_noded_strings_pass() {
        // four substrings meeting at (5, 5)
        let mut edges = [
            string(&[(0., 0.), (5., 5.)]),
            string(&[(5., 5.), (10., 10.)]),
            string(&[(0., 10.), (5., 5.)]),
            string(&[(5., 5.), (10., 0.)]),
        ];
        assert!(NodingValidator::new().check_valid(&mut edges).is_ok());
    }

    #[test]
    fn unnoded_crossing_is_reported() {
        let mut edges = [
            string(&[(0., 0.), (10., 10.)]),
            string(&[(0., 10.), (10., 0.)]),
        ];
        let err = NodingValidator::new().check_valid(&mut edges).unwrap_err();
        assert_eq!(err, NodingError::NotNoded { x: 5., y: 5. });
    }

    #[test]
    fn t_junction_is_reported() {
        // endpoint of the stem rests on the interior of the bar
        let mut edges = [
            string(&[(0., 0.), (10., 0.)]),
            string(&[(5., 0.), (5., 10.)]),
        ];
        assert!(NodingValidator::new().check_valid(&mut edges).is_err());
    }

    #[test]
    fn empty_input_is_valid() {
        let mut edges: [SegmentString<f64>; 0] = [];
        assert!(NodingValidator::new().check_valid(&mut edges).is_ok());
    }
}
