use super::*;
use glam::DAffine2;
use smallvec::{SmallVec, smallvec};

/// Functionality relating to core `Segment` operations, such as constructors and `abs_diff_eq`.
impl Segment {
	/// Create a line segment between two points.
	pub fn new_line(start: DVec2, end: DVec2) -> Self {
		Segment {
			start,
			handles: SegmentHandles::Linear,
			end,
		}
	}

	pub fn new_quadratic(start: DVec2, handle: DVec2, end: DVec2) -> Self {
		Segment {
			start,
			handles: SegmentHandles::Quadratic { handle },
			end,
		}
	}

	pub fn new_cubic(start: DVec2, handle_start: DVec2, handle_end: DVec2, end: DVec2) -> Self {
		Segment {
			start,
			handles: SegmentHandles::Cubic { handle_start, handle_end },
			end,
		}
	}

	/// Create a segment whose degree is inferred from the active control points:
	/// none gives a line, exactly one gives a quadratic curve, both give a cubic curve.
	pub fn from_points(start: DVec2, control_1: Option<DVec2>, control_2: Option<DVec2>, end: DVec2) -> Self {
		match (control_1, control_2) {
			(None, None) => Self::new_line(start, end),
			(Some(handle), None) | (None, Some(handle)) => Self::new_quadratic(start, handle, end),
			(Some(handle_start), Some(handle_end)) => Self::new_cubic(start, handle_start, handle_end, end),
		}
	}

	pub fn start(&self) -> DVec2 {
		self.start
	}

	pub fn end(&self) -> DVec2 {
		self.end
	}

	/// 1 for lines, 2 for quadratic and 3 for cubic curves.
	pub fn degree(&self) -> usize {
		match self.handles {
			SegmentHandles::Linear => 1,
			SegmentHandles::Quadratic { .. } => 2,
			SegmentHandles::Cubic { .. } => 3,
		}
	}

	/// The defining points in curve order, including both endpoints.
	pub fn control_points(&self) -> SmallVec<[DVec2; 4]> {
		match self.handles {
			SegmentHandles::Linear => smallvec![self.start, self.end],
			SegmentHandles::Quadratic { handle } => smallvec![self.start, handle, self.end],
			SegmentHandles::Cubic { handle_start, handle_end } => smallvec![self.start, handle_start, handle_end, self.end],
		}
	}

	/// The same curve traversed from `end` to `start`.
	#[must_use]
	pub fn reversed(&self) -> Segment {
		Segment {
			start: self.end,
			handles: self.handles.reversed(),
			end: self.start,
		}
	}

	#[must_use]
	pub fn apply_transformation(&self, transformation_function: impl Fn(DVec2) -> DVec2) -> Segment {
		Segment {
			start: transformation_function(self.start),
			handles: self.handles.apply_transformation(&transformation_function),
			end: transformation_function(self.end),
		}
	}

	/// Applies an affine transform to every defining point. Bezier curves are closed under affine maps, so this is exact.
	#[must_use]
	pub fn transformed(&self, transform: DAffine2) -> Segment {
		self.apply_transformation(|point| transform.transform_point2(point))
	}

	/// Degree elevation to a cubic curve describing exactly the same points.
	#[must_use]
	pub fn to_cubic(&self) -> Segment {
		match self.handles {
			SegmentHandles::Linear => Segment::new_cubic(self.start, self.start.lerp(self.end, 1. / 3.), self.start.lerp(self.end, 2. / 3.), self.end),
			SegmentHandles::Quadratic { handle } => Segment::new_cubic(self.start, self.start + (handle - self.start) * (2. / 3.), self.end + (handle - self.end) * (2. / 3.), self.end),
			SegmentHandles::Cubic { .. } => *self,
		}
	}

	/// Returns true if every defining point lies within `max_radius` of the start point.
	pub fn is_point(&self, max_radius: f64) -> bool {
		self.control_points().iter().all(|point| point.distance(self.start) <= max_radius)
	}

	/// Returns true if the corresponding points of the two segments are within the provided absolute value difference from each other.
	/// The segments must have the same degree.
	pub fn abs_diff_eq(&self, other: &Segment, max_abs_diff: f64) -> bool {
		let self_points = self.control_points();
		let other_points = other.control_points();
		self_points.len() == other_points.len() && self_points.iter().zip(other_points.iter()).all(|(a, b)| a.abs_diff_eq(*b, max_abs_diff))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::compare::compare_points;

	#[test]
	fn degree_is_inferred_from_active_control_points() {
		let p0 = DVec2::new(0., 0.);
		let p1 = DVec2::new(10., 0.);
		let c = DVec2::new(5., 5.);
		assert_eq!(Segment::from_points(p0, None, None, p1).degree(), 1);
		assert_eq!(Segment::from_points(p0, Some(c), None, p1).degree(), 2);
		assert_eq!(Segment::from_points(p0, None, Some(c), p1), Segment::new_quadratic(p0, c, p1));
		assert_eq!(Segment::from_points(p0, Some(c), Some(c), p1).degree(), 3);
	}

	#[test]
	fn reversed_swaps_handles() {
		let segment = Segment::new_cubic(DVec2::new(0., 0.), DVec2::new(1., 2.), DVec2::new(3., 2.), DVec2::new(4., 0.));
		let reversed = segment.reversed();
		assert_eq!(reversed.control_points().as_slice(), &[DVec2::new(4., 0.), DVec2::new(3., 2.), DVec2::new(1., 2.), DVec2::new(0., 0.)]);
		assert_eq!(reversed.reversed(), segment);
	}

	#[test]
	fn to_cubic_preserves_the_curve() {
		let line = Segment::new_line(DVec2::new(0., 0.), DVec2::new(9., 3.));
		let quadratic = Segment::new_quadratic(DVec2::new(0., 0.), DVec2::new(5., 10.), DVec2::new(10., 0.));
		for segment in [line, quadratic] {
			let cubic = segment.to_cubic();
			assert_eq!(cubic.degree(), 3);
			for i in 0..=10 {
				let t = i as f64 / 10.;
				assert!(compare_points(cubic.evaluate(t), segment.evaluate(t)));
			}
		}
	}

	#[test]
	fn transformed() {
		let segment = Segment::new_quadratic(DVec2::new(0., 0.), DVec2::new(1., 1.), DVec2::new(2., 0.));
		let moved = segment.transformed(DAffine2::from_translation(DVec2::new(5., -1.)));
		assert_eq!(moved, Segment::new_quadratic(DVec2::new(5., -1.), DVec2::new(6., 0.), DVec2::new(7., -1.)));
	}
}
