//! Robust noding and snap-rounding of 2-D line segments.
//!
//! 1. [Noding](#noding)
//! 1. [Snap-Rounding](#snap-rounding)
//!
//! # Noding
//!
//! Noding computes all intersection points among a collection of
//! polyline edges ([`SegmentString`]s) and splits every edge there, so
//! that no two output segments cross except at shared endpoints.
//! Candidate segment pairs are found with a sweep over monotone chains
//! ([`SweepLineIntersector`]), which prunes the all-pairs search down
//! to close to O(n log n + k). The exact segment arithmetic is an
//! injected strategy ([`LineIntersector`]); the default delegates to
//! the robust intersector shipped with [`geo`].
//!
//! # Snap-Rounding
//!
//! Floating-point noding alone can leave near-misses that break
//! downstream overlay operations. [`SnapRounder`] additionally forces
//! every vertex and intersection point onto a fixed-precision grid
//! using hot pixels ([`HotPixel`]), yielding output that stays valid
//! under further computation. The optional [`NodingValidator`] checks
//! the post-condition.
//!
//! ## Usage
//!
//! ```rust
//! use geo_noding::{Noder, SegmentString, SnapRounder};
//!
//! let edges = vec![
//!     SegmentString::from_coords(vec![(0., 0.).into(), (10., 10.).into()]),
//!     SegmentString::from_coords(vec![(0., 10.).into(), (10., 0.).into()]),
//! ];
//! let mut noder = SnapRounder::new(1.0).unwrap();
//! let noded = noder.compute_nodes(edges).unwrap();
//! // both inputs are split at the crossing
//! assert_eq!(noded.len(), 4);
//! ```

mod error;
pub use error::{NodingError, Result};

mod intersect;
pub use intersect::{edge_distance, LineIntersector, RobustLineIntersector, SegmentIntersection};

mod node_list;
pub use node_list::{SegmentNode, SegmentNodeList};

mod segment_string;
pub use segment_string::SegmentString;

pub mod monotone;
pub use monotone::MonotoneChainEdge;

pub mod sweep;
pub use sweep::{SegmentIntersector, SweepLineIntersector};

mod adder;
pub use adder::{IntersectionAdder, InteriorIntersectionCollector, InteriorIntersectionDetector};

mod noder;
pub use noder::{MonoChainNoder, Noder};

pub mod snapround;
pub use snapround::{round_coord, HotPixel, PointSnapper, SnapRounder};

mod validate;
pub use validate::NodingValidator;
