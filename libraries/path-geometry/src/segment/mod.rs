mod core;
mod solvers;

use glam::DVec2;
use std::fmt::{Debug, Formatter};

/// Representation of the control point(s) of a segment. The variant is the segment's degree.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SegmentHandles {
	Linear,
	/// Control point of a quadratic curve.
	Quadratic { handle: DVec2 },
	/// Control points of a cubic curve.
	Cubic {
		/// Control point associated with the start point.
		handle_start: DVec2,
		/// Control point associated with the end point.
		handle_end: DVec2,
	},
}

impl SegmentHandles {
	/// The first control point. This is the only one of a quadratic segment.
	pub fn start(&self) -> Option<DVec2> {
		match *self {
			SegmentHandles::Cubic { handle_start, .. } | SegmentHandles::Quadratic { handle: handle_start } => Some(handle_start),
			SegmentHandles::Linear => None,
		}
	}

	/// The second control point, only present on cubic segments.
	pub fn end(&self) -> Option<DVec2> {
		match *self {
			SegmentHandles::Cubic { handle_end, .. } => Some(handle_end),
			_ => None,
		}
	}

	pub fn move_start(&mut self, delta: DVec2) {
		if let SegmentHandles::Cubic { handle_start, .. } | SegmentHandles::Quadratic { handle: handle_start } = self {
			*handle_start += delta
		}
	}

	pub fn move_end(&mut self, delta: DVec2) {
		if let SegmentHandles::Cubic { handle_end, .. } = self {
			*handle_end += delta
		}
	}

	#[must_use]
	pub fn apply_transformation(&self, transformation_function: impl Fn(DVec2) -> DVec2) -> Self {
		match *self {
			SegmentHandles::Linear => Self::Linear,
			SegmentHandles::Quadratic { handle } => Self::Quadratic { handle: transformation_function(handle) },
			SegmentHandles::Cubic { handle_start, handle_end } => Self::Cubic {
				handle_start: transformation_function(handle_start),
				handle_end: transformation_function(handle_end),
			},
		}
	}

	#[must_use]
	pub fn reversed(self) -> Self {
		match self {
			SegmentHandles::Cubic { handle_start, handle_end } => Self::Cubic {
				handle_start: handle_end,
				handle_end: handle_start,
			},
			_ => self,
		}
	}
}

/// A line, quadratic, or cubic Bezier curve between two points.
///
/// Segments are plain values: they are built from the points of a [`crate::Subpath`] on demand and never refer back to it.
/// Zero-length segments are allowed.
#[derive(Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
	pub start: DVec2,
	pub handles: SegmentHandles,
	pub end: DVec2,
}

impl Debug for Segment {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let mut debug_struct = f.debug_struct("Segment");
		let mut debug_struct_ref = debug_struct.field("start", &self.start);
		debug_struct_ref = match self.handles {
			SegmentHandles::Linear => debug_struct_ref,
			SegmentHandles::Quadratic { handle } => debug_struct_ref.field("handle", &handle),
			SegmentHandles::Cubic { handle_start, handle_end } => debug_struct_ref.field("handle_start", &handle_start).field("handle_end", &handle_end),
		};
		debug_struct_ref.field("end", &self.end).finish()
	}
}

/// Optional parameters of [`Segment::nearest_point_with_options`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NearestPointOptions {
	/// Number of evenly spaced samples used to bracket the minimum. The default value is `20`.
	pub lut_size: usize,
	/// Width of the parameter bracket at which the golden-section refinement stops. The default value is `1e-10`.
	pub convergence_epsilon: f64,
	/// Maximum number of golden-section iterations. The default value is `64`.
	pub iteration_limit: usize,
}

impl Default for NearestPointOptions {
	fn default() -> Self {
		Self {
			lut_size: 20,
			convergence_epsilon: 1e-10,
			iteration_limit: 64,
		}
	}
}
