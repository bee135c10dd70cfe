mod aabb;
mod boolean;
mod classify;
#[cfg(test)]
pub(crate) mod compare;
pub mod consts;
mod error;
mod flatten;
mod intersection;
mod math;
mod path;
mod segment;
mod subpath;
mod util {
	pub(crate) mod grid;
}

pub use aabb::Aabb;
pub use boolean::{BooleanOperation, BooleanOptions, BooleanResult, BooleanWarning, combine, combine_with_options};
pub use classify::{Classification, classify, classify_with_epsilons, winding_number};
pub use consts::{EPS, Epsilons};
pub use error::GeometryError;
pub use flatten::flatten;
pub use glam::{DAffine2, DVec2};
pub use intersection::{IntersectionRecord, intersect, intersect_paths};
pub use path::{FillRule, Path};
pub use segment::{NearestPointOptions, Segment, SegmentHandles};
pub use subpath::{PathPoint, Subpath};
