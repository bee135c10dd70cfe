// Method argument defaults:
/// Default error tolerance for [`crate::Segment::length`].
pub const DEFAULT_LENGTH_TOLERANCE: f64 = 0.005;
/// Default tolerance on the reached length for [`crate::Segment::param_at_length`].
pub const DEFAULT_PARAM_LENGTH_TOLERANCE: f64 = 0.001;
/// Default tolerance for [`crate::Segment::is_flat`].
pub const DEFAULT_FLATNESS: f64 = 0.01;

// Recursion caps:
/// Depth cap shared by length computation and flattening. At the cap the chord is used.
pub const MAX_SUBDIVISION_DEPTH: usize = 32;
/// Depth cap of the subdivision intersection search. Branches past the cap are dropped.
pub const MAX_INTERSECTION_DEPTH: usize = 48;
/// Upper bound on live candidate pairs per subdivision level of one intersection search.
pub const MAX_INTERSECTION_PAIRS: usize = 1 << 12;
/// Iteration cap of the length bisection in [`crate::Segment::param_at_length`].
pub const MAX_PARAM_LENGTH_ITERATIONS: usize = 64;

// Implementation constants:
/// Below this magnitude a 2x2 determinant is treated as singular.
pub const COLLINEAR_EPS: f64 = f64::EPSILON * 64.;
/// Newton steps used to polish an intersection parameter pair.
pub const INTERSECTION_POLISH_ITERATIONS: usize = 4;
/// Parameter offset used to probe both sides of an intersection when testing for a sign change.
pub const CROSSING_PROBE_OFFSET: f64 = 1e-4;
/// Distance by which the boolean engine offsets arc midpoints to sample the regions on either side, for operands of unit size.
pub const SIDE_SAMPLE_DISTANCE: f64 = 1e-4;
/// Cosine above which two unit tangents count as parallel in [`crate::Segment::is_smooth_with`].
pub const PARALLEL_TOLERANCE: f64 = 1. - 1e-3;
/// Below this cubed speed the curvature is reported as zero.
pub const CURVATURE_DENOMINATOR_EPS: f64 = 1e-12;
/// Cell size of the spatial hash used to weld graph nodes, for operands of unit size.
pub const NODE_GRID_CELL_SIZE: f64 = 1e-3;
/// Graph nodes closer than `Epsilons::point` times this factor are welded together.
pub const NODE_WELD_FACTOR: f64 = 16.;

/// Distance thresholds used by the intersection search, the classifier, and graph assembly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Epsilons {
	/// Two points closer than this are the same point. Also the "on boundary" distance.
	pub point: f64,
	/// A sub-segment whose control points lie within this distance of its chord is treated as a line.
	pub linear: f64,
	/// Parameter pairs closer than this on both curves are merged into one record.
	pub param: f64,
}

impl Epsilons {
	/// The same thresholds for geometry `factor` times the size. Parameter distances do not change.
	#[must_use]
	pub fn scaled(self, factor: f64) -> Epsilons {
		Epsilons {
			point: self.point * factor,
			linear: self.linear * factor,
			param: self.param,
		}
	}
}

impl Default for Epsilons {
	fn default() -> Self {
		EPS
	}
}

pub const EPS: Epsilons = Epsilons {
	point: 1e-6,
	linear: 1e-6,
	param: 1e-7,
};
