use super::*;
use crate::aabb::{Aabb, extend_bounding_box};
use crate::consts::*;
use crate::error::{GeometryError, check_parameter};
use crate::intersection;
use crate::math::{self, distance_to_line_segment};
use smallvec::SmallVec;

/// Functionality that solves for points, parameters, lengths and bounds of a `Segment`.
impl Segment {
	/// Unchecked de Casteljau evaluation.
	pub(crate) fn evaluate(&self, t: f64) -> DVec2 {
		match self.handles {
			SegmentHandles::Linear => self.start.lerp(self.end, t),
			SegmentHandles::Quadratic { handle } => {
				let p01 = self.start.lerp(handle, t);
				let p12 = handle.lerp(self.end, t);
				p01.lerp(p12, t)
			}
			SegmentHandles::Cubic { handle_start, handle_end } => {
				let p01 = self.start.lerp(handle_start, t);
				let p12 = handle_start.lerp(handle_end, t);
				let p23 = handle_end.lerp(self.end, t);
				let p012 = p01.lerp(p12, t);
				let p123 = p12.lerp(p23, t);
				p012.lerp(p123, t)
			}
		}
	}

	/// Point on the curve at parameter `t`, which must lie in `[0, 1]`.
	pub fn point_at(&self, t: f64) -> Result<DVec2, GeometryError> {
		Ok(self.evaluate(check_parameter(t)?))
	}

	/// Unchecked de Casteljau subdivision. Both halves share the evaluated split point exactly.
	pub(crate) fn split(&self, t: f64) -> [Segment; 2] {
		match self.handles {
			SegmentHandles::Linear => {
				let split_point = self.evaluate(t);
				[Segment::new_line(self.start, split_point), Segment::new_line(split_point, self.end)]
			}
			SegmentHandles::Quadratic { handle } => {
				let p01 = self.start.lerp(handle, t);
				let p12 = handle.lerp(self.end, t);
				let split_point = p01.lerp(p12, t);
				[Segment::new_quadratic(self.start, p01, split_point), Segment::new_quadratic(split_point, p12, self.end)]
			}
			SegmentHandles::Cubic { handle_start, handle_end } => {
				let p01 = self.start.lerp(handle_start, t);
				let p12 = handle_start.lerp(handle_end, t);
				let p23 = handle_end.lerp(self.end, t);
				let p012 = p01.lerp(p12, t);
				let p123 = p12.lerp(p23, t);
				let split_point = p012.lerp(p123, t);
				[Segment::new_cubic(self.start, p01, p012, split_point), Segment::new_cubic(split_point, p123, p23, self.end)]
			}
		}
	}

	/// Splits the segment into the parts before and after `t`, which must lie in `[0, 1]`.
	pub fn split_at(&self, t: f64) -> Result<(Segment, Segment), GeometryError> {
		let [first, second] = self.split(check_parameter(t)?);
		Ok((first, second))
	}

	/// The part of the curve between `t1 < t2`.
	pub(crate) fn trim(&self, t1: f64, t2: f64) -> Segment {
		let (right, local_t2) = if t1 <= 0. { (*self, t2) } else { (self.split(t1)[1], (t2 - t1) / (1. - t1)) };
		if local_t2 >= 1. { right } else { right.split(local_t2)[0] }
	}

	/// The hodograph of the curve, or `None` for lines whose derivative is constant.
	pub fn derivative(&self) -> Option<Segment> {
		match self.handles {
			SegmentHandles::Linear => None,
			SegmentHandles::Quadratic { handle } => Some(Segment::new_line(2. * (handle - self.start), 2. * (self.end - handle))),
			SegmentHandles::Cubic { handle_start, handle_end } => Some(Segment::new_quadratic(3. * (handle_start - self.start), 3. * (handle_end - handle_start), 3. * (self.end - handle_end))),
		}
	}

	pub(crate) fn non_normalized_tangent(&self, t: f64) -> DVec2 {
		match self.handles {
			SegmentHandles::Linear => self.end - self.start,
			SegmentHandles::Quadratic { handle } => 2. * ((1. - t) * (handle - self.start) + t * (self.end - handle)),
			SegmentHandles::Cubic { handle_start, handle_end } => {
				let one_minus_t = 1. - t;
				3. * (one_minus_t * one_minus_t * (handle_start - self.start) + 2. * t * one_minus_t * (handle_end - handle_start) + t * t * (self.end - handle_end))
			}
		}
	}

	/// Direction of travel at `t`, not normalized. Stays meaningful where a handle coincides with its anchor.
	pub(crate) fn direction_at(&self, t: f64) -> DVec2 {
		let derivative = self.non_normalized_tangent(t);
		if derivative.length() > self.control_polygon_length() * 1e-9 {
			return derivative;
		}
		let nearby = if t < 0.5 { self.evaluate(t + 1e-6) - self.evaluate(t) } else { self.evaluate(t) - self.evaluate(t - 1e-6) };
		if nearby != DVec2::ZERO { nearby } else { self.end - self.start }
	}

	/// Unit tangent at `t`. Zero-length segments have a zero tangent.
	pub fn tangent(&self, t: f64) -> Result<DVec2, GeometryError> {
		Ok(self.direction_at(check_parameter(t)?).normalize_or_zero())
	}

	/// Unit normal at `t`, pointing to the left of the direction of travel.
	pub fn normal(&self, t: f64) -> Result<DVec2, GeometryError> {
		Ok(self.tangent(t)?.perp())
	}

	/// Signed curvature at `t`, positive where the curve turns left. Lines and stationary points have zero curvature.
	///
	/// <https://pomax.github.io/bezierinfo/#curvature>
	pub fn curvature(&self, t: f64) -> Result<f64, GeometryError> {
		let t = check_parameter(t)?;
		let (d, dd) = match self.derivative() {
			Some(first_derivative) => match first_derivative.derivative() {
				Some(second_derivative) => (first_derivative.evaluate(t), second_derivative.evaluate(t)),
				None => (first_derivative.evaluate(t), first_derivative.end - first_derivative.start),
			},
			None => (self.end - self.start, DVec2::ZERO),
		};
		let numerator = d.perp_dot(dd);
		let denominator = d.length_squared().powf(1.5);
		Ok(if denominator < CURVATURE_DENOMINATOR_EPS { 0. } else { numerator / denominator })
	}

	pub fn chord_length(&self) -> f64 {
		self.start.distance(self.end)
	}

	/// Length of the polyline through all defining points. An upper bound of [`Segment::length`].
	pub fn control_polygon_length(&self) -> f64 {
		self.control_points().windows(2).map(|pair| pair[0].distance(pair[1])).sum()
	}

	/// Returns true if every control point lies within `tolerance` of the chord. Lines are always flat.
	pub fn is_flat(&self, tolerance: f64) -> bool {
		let chord = [self.start, self.end];
		match self.handles {
			SegmentHandles::Linear => true,
			SegmentHandles::Quadratic { handle } => distance_to_line_segment(handle, chord) <= tolerance,
			SegmentHandles::Cubic { handle_start, handle_end } => distance_to_line_segment(handle_start, chord) <= tolerance && distance_to_line_segment(handle_end, chord) <= tolerance,
		}
	}

	/// Arc length, approximated by recursively halving the curve until every piece is flat within `tolerance`.
	///
	/// See [`crate::consts::DEFAULT_LENGTH_TOLERANCE`] for the usual tolerance.
	/// Pieces that reach [`MAX_SUBDIVISION_DEPTH`] contribute their chord.
	pub fn length(&self, tolerance: f64) -> f64 {
		// A zero tolerance would only ever stop at the depth cap
		let tolerance = tolerance.max(self.control_polygon_length() * 1e-12);
		self.length_recursive(tolerance, 0)
	}

	fn length_recursive(&self, tolerance: f64, depth: usize) -> f64 {
		if depth >= MAX_SUBDIVISION_DEPTH || self.is_flat(tolerance) {
			return self.chord_length();
		}
		let [first, second] = self.split(0.5);
		first.length_recursive(tolerance, depth + 1) + second.length_recursive(tolerance, depth + 1)
	}

	/// Length of the curve between parameter 0 and `t`, which must lie in `[0, 1]`.
	pub fn length_at(&self, t: f64, tolerance: f64) -> Result<f64, GeometryError> {
		let t = check_parameter(t)?;
		if t == 0. {
			return Ok(0.);
		}
		Ok(self.split(t)[0].length(tolerance))
	}

	/// Parameter at which the curve has travelled `target_length`, found by bisection on [`Segment::length_at`].
	///
	/// Returns 0 for targets at or below zero and 1 for targets at or beyond the total length.
	pub fn param_at_length(&self, target_length: f64, tolerance: f64) -> f64 {
		if target_length <= 0. {
			return 0.;
		}
		let length_tolerance = tolerance.min(DEFAULT_LENGTH_TOLERANCE);
		let total_length = self.length(length_tolerance);
		if target_length >= total_length {
			return 1.;
		}
		if let SegmentHandles::Linear = self.handles {
			return target_length / total_length;
		}

		let (mut low, mut high) = (0., 1.);
		for _ in 0..MAX_PARAM_LENGTH_ITERATIONS {
			let middle = (low + high) / 2.;
			let length = self.split(middle)[0].length(length_tolerance);
			if (length - target_length).abs() < tolerance {
				return middle;
			}
			if length < target_length {
				low = middle;
			} else {
				high = middle;
			}
		}
		(low + high) / 2.
	}

	/// Parameter of the point on the curve closest to `point`, using [`NearestPointOptions::default`].
	pub fn nearest_point(&self, point: DVec2) -> f64 {
		self.nearest_point_with_options(point, NearestPointOptions::default())
	}

	/// Parameter of the point on the curve closest to `point`.
	///
	/// The curve is sampled at `lut_size` evenly spaced parameters. The interval around the closest sample is then narrowed with a
	/// golden-section search. The result is deterministic but may be a local minimum for curves that loop back near `point`.
	pub fn nearest_point_with_options(&self, point: DVec2, options: NearestPointOptions) -> f64 {
		if let SegmentHandles::Linear = self.handles {
			let direction = self.end - self.start;
			let length_squared = direction.length_squared();
			if length_squared == 0. {
				return 0.;
			}
			return ((point - self.start).dot(direction) / length_squared).clamp(0., 1.);
		}

		let distance = |t: f64| self.evaluate(t).distance_squared(point);
		let lut_size = options.lut_size.max(2);
		let step = 1. / (lut_size - 1) as f64;
		let (mut best_t, mut best_distance) = (0., f64::INFINITY);
		for index in 0..lut_size {
			let t = index as f64 / (lut_size - 1) as f64;
			let sample_distance = distance(t);
			if sample_distance < best_distance {
				best_t = t;
				best_distance = sample_distance;
			}
		}

		// Golden-section search on the bracket around the best sample
		let inverse_phi = (5_f64.sqrt() - 1.) / 2.;
		let (mut low, mut high) = ((best_t - step).max(0.), (best_t + step).min(1.));
		let mut left = high - inverse_phi * (high - low);
		let mut right = low + inverse_phi * (high - low);
		let (mut left_distance, mut right_distance) = (distance(left), distance(right));
		for _ in 0..options.iteration_limit {
			if high - low < options.convergence_epsilon {
				break;
			}
			if left_distance < right_distance {
				high = right;
				right = left;
				right_distance = left_distance;
				left = high - inverse_phi * (high - low);
				left_distance = distance(left);
			} else {
				low = left;
				left = right;
				left_distance = right_distance;
				right = low + inverse_phi * (high - low);
				right_distance = distance(right);
			}
		}

		let refined_t = (low + high) / 2.;
		if distance(refined_t) < best_distance { refined_t } else { best_t }
	}

	/// Distance from `point` to the closest point on the curve.
	pub fn distance_to_point(&self, point: DVec2) -> f64 {
		self.evaluate(self.nearest_point(point)).distance(point)
	}

	/// Power basis coefficients `[c0, c1, c2, c3]` with `B(t) = c0 + c1 t + c2 t^2 + c3 t^3`.
	pub(crate) fn polynomial_coefficients(&self) -> [DVec2; 4] {
		match self.handles {
			SegmentHandles::Linear => [self.start, self.end - self.start, DVec2::ZERO, DVec2::ZERO],
			SegmentHandles::Quadratic { handle } => [self.start, 2. * (handle - self.start), self.start - 2. * handle + self.end, DVec2::ZERO],
			SegmentHandles::Cubic { handle_start, handle_end } => [
				self.start,
				3. * (handle_start - self.start),
				3. * (self.start - 2. * handle_start + handle_end),
				self.end - self.start + 3. * (handle_start - handle_end),
			],
		}
	}

	/// Parameters in the open interval `(0, 1)` where `x(t)` and `y(t)` respectively reach a local extremum.
	pub fn local_extrema(&self) -> [SmallVec<[f64; 2]>; 2] {
		let [_, c1, c2, c3] = self.polynomial_coefficients();
		let solve = |c1: f64, c2: f64, c3: f64| -> SmallVec<[f64; 2]> {
			let mut roots: SmallVec<[f64; 2]> = roots::find_roots_quadratic(3. * c3, 2. * c2, c1).as_ref().iter().copied().filter(|&t| t > 0. && t < 1.).collect();
			roots.sort_by(f64::total_cmp);
			roots
		};
		[solve(c1.x, c2.x, c3.x), solve(c1.y, c2.y, c3.y)]
	}

	/// The tight axis-aligned bounding box of the curve.
	pub fn bounding_rect(&self) -> Aabb {
		let [x_extrema, y_extrema] = self.local_extrema();
		x_extrema.iter().chain(y_extrema.iter()).fold(Aabb::new(self.start, self.end), |bounding_box, &t| extend_bounding_box(Some(bounding_box), self.evaluate(t)))
	}

	/// The bounding box of all defining points, which always contains the curve.
	pub fn control_point_rect(&self) -> Aabb {
		self.control_points().iter().fold(Aabb::new(self.start, self.end), |bounding_box, &point| extend_bounding_box(Some(bounding_box), point))
	}

	/// Convex hull of the defining points in counter-clockwise order.
	pub fn convex_hull(&self) -> Vec<DVec2> {
		math::convex_hull(&self.control_points())
	}

	/// Points where this segment crosses `other`. Tangential touches that do not pass to the other side are excluded.
	pub fn intersections(&self, other: &Segment) -> Vec<DVec2> {
		intersection::intersect(self, other)
			.into_iter()
			.filter(|&(t_self, t_other)| intersection::is_crossing(self, t_self, other, t_other))
			.map(|(t_self, _)| self.evaluate(t_self))
			.collect()
	}

	/// Contribution of this segment to the signed area enclosed by a closed outline, by Green's theorem.
	/// Counter-clockwise outlines have positive area.
	pub fn signed_area(&self) -> f64 {
		let p0 = self.start;
		let p3 = self.end;
		match self.handles {
			SegmentHandles::Linear => p0.perp_dot(p3) / 2.,
			SegmentHandles::Quadratic { handle: p1 } => (p0.x * (2. * p1.y + p3.y) + 2. * p1.x * (p3.y - p0.y) - p3.x * (p0.y + 2. * p1.y)) / 6.,
			SegmentHandles::Cubic { handle_start: p1, handle_end: p2 } => {
				(p0.x * (6. * p1.y + 3. * p2.y + p3.y) + 3. * (p1.x * (-2. * p0.y + p2.y + p3.y) - p2.x * (p0.y + p1.y - 2. * p3.y)) - p3.x * (p0.y + 3. * p1.y + 6. * p2.y)) / 20.
			}
		}
	}

	/// Returns true if `next` continues this segment without a corner, i.e. the tangents at the joint are parallel and point the same way.
	pub fn is_smooth_with(&self, next: &Segment) -> bool {
		let incoming = self.direction_at(1.).normalize_or_zero();
		let outgoing = next.direction_at(0.).normalize_or_zero();
		incoming.dot(outgoing) > PARALLEL_TOLERANCE
	}

	/// Appends a polyline approximation of the curve to `points`, excluding the start point.
	///
	/// Curves are halved until every piece is flat within `tolerance`, which keeps the polyline within `tolerance` of the curve.
	pub fn flatten_into(&self, tolerance: f64, points: &mut Vec<DVec2>) {
		let tolerance = tolerance.max(self.control_polygon_length() * 1e-12);
		self.flatten_recursive(tolerance, 0, points);
	}

	fn flatten_recursive(&self, tolerance: f64, depth: usize, points: &mut Vec<DVec2>) {
		if depth >= MAX_SUBDIVISION_DEPTH || self.is_flat(tolerance) {
			points.push(self.end);
			return;
		}
		let [first, second] = self.split(0.5);
		first.flatten_recursive(tolerance, depth + 1, points);
		second.flatten_recursive(tolerance, depth + 1, points);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::compare::{compare_f64s, compare_points, compare_vec_of_points};

	fn arch() -> Segment {
		Segment::new_cubic(DVec2::new(0., 0.), DVec2::new(0., 10.), DVec2::new(10., 10.), DVec2::new(10., 0.))
	}

	fn samples() -> [Segment; 3] {
		[
			Segment::new_line(DVec2::new(1., 2.), DVec2::new(7., -3.)),
			Segment::new_quadratic(DVec2::new(0., 0.), DVec2::new(5., 12.), DVec2::new(10., 0.)),
			Segment::new_cubic(DVec2::new(0., 0.), DVec2::new(20., 15.), DVec2::new(-10., 15.), DVec2::new(10., 0.)),
		]
	}

	#[test]
	fn split_halves_meet_at_the_split_point() {
		for segment in samples().into_iter().chain([arch()]) {
			for i in 0..=20 {
				let t = i as f64 / 20.;
				let (first, second) = segment.split_at(t).unwrap();
				let point = segment.point_at(t).unwrap();
				assert!(first.point_at(1.).unwrap().abs_diff_eq(point, 1e-9));
				assert!(second.point_at(0.).unwrap().abs_diff_eq(point, 1e-9));
				assert_eq!(first.degree(), segment.degree());
			}
		}
	}

	#[test]
	fn split_reproduces_the_curve() {
		let segment = arch();
		let (first, second) = segment.split_at(0.3).unwrap();
		for i in 0..=10 {
			let s = i as f64 / 10.;
			assert!(compare_points(first.evaluate(s), segment.evaluate(0.3 * s)));
			assert!(compare_points(second.evaluate(s), segment.evaluate(0.3 + 0.7 * s)));
		}
	}

	#[test]
	fn parameters_outside_the_unit_interval_are_rejected() {
		let segment = arch();
		assert_eq!(segment.point_at(1.5), Err(GeometryError::InvalidParameter { t: 1.5 }));
		assert_eq!(segment.split_at(-0.1), Err(GeometryError::InvalidParameter { t: -0.1 }));
		assert!(segment.length_at(2., DEFAULT_LENGTH_TOLERANCE).is_err());
		assert!(segment.tangent(f64::NAN).is_err());
	}

	#[test]
	fn trim() {
		let segment = arch();
		let trimmed = segment.trim(0.25, 0.75);
		assert!(compare_points(trimmed.start, segment.evaluate(0.25)));
		assert!(compare_points(trimmed.end, segment.evaluate(0.75)));
		assert!(compare_points(trimmed.evaluate(0.5), segment.evaluate(0.5)));
		assert_eq!(segment.trim(0., 1.), segment);
	}

	#[test]
	fn line_length_is_exact() {
		let line = Segment::new_line(DVec2::new(0., 0.), DVec2::new(3., 4.));
		assert_eq!(line.length(DEFAULT_LENGTH_TOLERANCE), 5.);
		assert_eq!(line.length_at(0.5, DEFAULT_LENGTH_TOLERANCE), Ok(2.5));
	}

	#[test]
	fn cubic_length_converges() {
		let segment = arch();
		let coarse = segment.length(DEFAULT_LENGTH_TOLERANCE);
		assert!((coarse - 20.).abs() < 5e-3);
		let fine = segment.length(1e-4);
		let finer = segment.length(1e-6);
		assert!((fine - finer).abs() < 1e-4);
		assert!(finer <= segment.control_polygon_length());
	}

	#[test]
	fn length_at_is_monotonic() {
		for segment in samples().into_iter().chain([arch()]) {
			let mut previous = 0.;
			for i in 0..=40 {
				let length = segment.length_at(i as f64 / 40., DEFAULT_LENGTH_TOLERANCE).unwrap();
				assert!(length >= previous - 1e-12, "{length} < {previous} for {segment:?}");
				previous = length;
			}
		}
	}

	#[test]
	fn param_at_length() {
		let line = Segment::new_line(DVec2::new(0., 0.), DVec2::new(10., 0.));
		assert!(compare_f64s(line.param_at_length(2.5, DEFAULT_PARAM_LENGTH_TOLERANCE), 0.25));
		assert_eq!(line.param_at_length(-1., DEFAULT_PARAM_LENGTH_TOLERANCE), 0.);
		assert_eq!(line.param_at_length(11., DEFAULT_PARAM_LENGTH_TOLERANCE), 1.);

		let segment = arch();
		let half = segment.length(DEFAULT_PARAM_LENGTH_TOLERANCE) / 2.;
		let t = segment.param_at_length(half, DEFAULT_PARAM_LENGTH_TOLERANCE);
		assert!((t - 0.5).abs() < 1e-3);
		assert!((segment.length_at(t, DEFAULT_LENGTH_TOLERANCE).unwrap() - half).abs() < 2. * DEFAULT_PARAM_LENGTH_TOLERANCE);
	}

	#[test]
	fn flatness() {
		let bowed = Segment::new_cubic(DVec2::new(0., 0.), DVec2::new(3., 0.02), DVec2::new(7., 0.02), DVec2::new(10., 0.));
		assert!(bowed.is_flat(0.05));
		assert!(!bowed.is_flat(DEFAULT_FLATNESS));
		assert!(Segment::new_line(DVec2::ZERO, DVec2::ONE).is_flat(0.));
	}

	#[test]
	fn nearest_point() {
		let line = Segment::new_line(DVec2::new(0., 0.), DVec2::new(10., 0.));
		assert!(compare_f64s(line.nearest_point(DVec2::new(4., 3.)), 0.4));
		assert_eq!(line.nearest_point(DVec2::new(-4., 3.)), 0.);

		let segment = arch();
		for t in [0.1, 0.3, 0.5, 0.8] {
			assert!((segment.nearest_point(segment.evaluate(t)) - t).abs() < 1e-6);
		}
		assert_eq!(segment.nearest_point(DVec2::new(-5., -5.)), 0.);
		assert_eq!(segment.nearest_point(DVec2::new(15., -5.)), 1.);
		assert!((segment.distance_to_point(DVec2::new(5., 10.)) - 2.5).abs() < 1e-6);
	}

	#[test]
	fn bounds() {
		let segment = arch();
		assert!(segment.bounding_rect().min().abs_diff_eq(DVec2::new(0., 0.), 1e-9));
		assert!(segment.bounding_rect().max().abs_diff_eq(DVec2::new(10., 7.5), 1e-9));
		assert_eq!(segment.control_point_rect(), Aabb::new(DVec2::new(0., 0.), DVec2::new(10., 10.)));
		assert_eq!(segment.local_extrema()[1].as_slice(), &[0.5]);
		assert!(segment.local_extrema()[0].is_empty());
	}

	#[test]
	fn convex_hull() {
		assert_eq!(arch().convex_hull(), vec![DVec2::new(0., 0.), DVec2::new(10., 0.), DVec2::new(10., 10.), DVec2::new(0., 10.)]);
		assert_eq!(Segment::new_line(DVec2::new(1., 1.), DVec2::ZERO).convex_hull(), vec![DVec2::ZERO, DVec2::new(1., 1.)]);
	}

	#[test]
	fn derivative_and_tangent() {
		let segment = arch();
		assert_eq!(segment.derivative(), Some(Segment::new_quadratic(DVec2::new(0., 30.), DVec2::new(30., 0.), DVec2::new(0., -30.))));
		assert!(compare_points(segment.tangent(0.).unwrap(), DVec2::Y));
		assert!(compare_points(segment.tangent(0.5).unwrap(), DVec2::X));
		assert!(compare_points(segment.normal(0.5).unwrap(), DVec2::Y));

		// Handle on top of the anchor
		let degenerate = Segment::new_cubic(DVec2::new(0., 0.), DVec2::new(0., 0.), DVec2::new(10., 10.), DVec2::new(10., 0.));
		let tangent = degenerate.tangent(0.).unwrap();
		assert!(tangent.x > 0. && tangent.y > 0.);
	}

	#[test]
	fn curvature() {
		let p1 = DVec2::new(10., 10.);
		let p2 = DVec2::new(50., 10.);
		let p3 = DVec2::new(50., 50.);
		let p4 = DVec2::new(50., 10.);
		let close = |value: f64, expected: f64| (value - expected).abs() < 1e-6;

		let linear = Segment::new_line(p1, p2);
		assert_eq!(linear.curvature(0.), Ok(0.));
		assert_eq!(linear.curvature(0.5), Ok(0.));

		let quadratic = Segment::new_quadratic(p1, p2, p3);
		assert!(close(quadratic.curvature(0.).unwrap(), 0.0125));
		assert!(close(quadratic.curvature(0.5).unwrap(), 0.03535534));
		assert!(close(quadratic.curvature(1.).unwrap(), 0.0125));

		let cubic = Segment::new_cubic(p1, p2, p3, p4);
		assert!(close(cubic.curvature(0.).unwrap(), 1. / 60.));
		assert!(close(cubic.curvature(0.5).unwrap(), 0.));
		assert!(close(cubic.curvature(1.).unwrap(), 0.));

		// The arch turns right all the way
		assert!(arch().curvature(0.5).unwrap() < 0.);
		assert_eq!(arch().curvature(1.5), Err(GeometryError::InvalidParameter { t: 1.5 }));
	}

	#[test]
	fn signed_area() {
		assert!(compare_f64s(arch().signed_area(), -60.));
		// Closing the arch with its chord gives the enclosed area
		assert!(compare_f64s(arch().signed_area() + Segment::new_line(DVec2::new(10., 0.), DVec2::new(0., 0.)).signed_area(), -60.));
		let quadratic = Segment::new_quadratic(DVec2::new(1., 0.), DVec2::new(1., 0.5), DVec2::new(1., 1.));
		assert!(compare_f64s(quadratic.signed_area(), 0.5));
	}

	#[test]
	fn smoothness() {
		let first = Segment::new_cubic(DVec2::new(0., 0.), DVec2::new(1., 1.), DVec2::new(2., 1.), DVec2::new(3., 1.));
		let smooth = Segment::new_line(DVec2::new(3., 1.), DVec2::new(5., 1.));
		let corner = Segment::new_line(DVec2::new(3., 1.), DVec2::new(3., 3.));
		assert!(first.is_smooth_with(&smooth));
		assert!(!first.is_smooth_with(&corner));
	}

	#[test]
	fn crossing_points() {
		let line = Segment::new_line(DVec2::new(0., 5.), DVec2::new(10., 5.));
		let mut points = arch().intersections(&line);
		points.sort_by(|a, b| a.x.total_cmp(&b.x));
		assert!(compare_vec_of_points(points, vec![DVec2::new(1.150998205, 5.), DVec2::new(8.849001795, 5.)], 1e-6));

		let far = Segment::new_line(DVec2::new(0., 20.), DVec2::new(10., 20.));
		assert!(arch().intersections(&far).is_empty());
	}

	#[test]
	fn tangential_touch_is_not_a_crossing() {
		let touching = Segment::new_line(DVec2::new(0., 7.5), DVec2::new(10., 7.5));
		assert!(arch().intersections(&touching).is_empty());
		assert!(touching.intersections(&arch()).is_empty());
	}

	#[test]
	fn recursion_stops_at_the_depth_cap() {
		let segment = arch();
		// Four levels above the cap with a tolerance nothing meets leaves sixteen pieces
		let mut points = Vec::new();
		segment.flatten_recursive(0., MAX_SUBDIVISION_DEPTH - 4, &mut points);
		assert_eq!(points.len(), 16);
		assert_eq!(points.last(), Some(&segment.end));

		let length = segment.length_recursive(0., MAX_SUBDIVISION_DEPTH - 4);
		assert!(length > segment.chord_length() && length < segment.control_polygon_length());
		assert!((length - segment.length(1e-9)).abs() < 0.05);
	}

	#[test]
	fn huge_control_points() {
		let segment = Segment::new_cubic(DVec2::new(0., 0.), DVec2::new(1e12, -1e12), DVec2::new(-1e12, 1e12), DVec2::new(1., 0.));
		let mut points = vec![segment.start];
		segment.flatten_into(1e-9, &mut points);
		assert_eq!(points.last(), Some(&segment.end));
		assert!(points.iter().all(|point| point.is_finite()));

		let length = segment.length(1e-9);
		assert!(length.is_finite());
		assert!(length >= segment.chord_length() && length <= segment.control_polygon_length());
	}

	#[test]
	fn flattening_stays_within_tolerance() {
		let [line, quadratic, _] = samples();
		for tolerance in [0.5, 0.01] {
			for segment in [line, quadratic, arch()] {
				let mut points = vec![segment.start];
				segment.flatten_into(tolerance, &mut points);
				assert_eq!(points.last(), Some(&segment.end));
				for pair in points.windows(2) {
					for i in 0..=8 {
						let point = pair[0].lerp(pair[1], i as f64 / 8.);
						assert!(segment.distance_to_point(point) <= tolerance + 1e-9);
					}
				}
			}
		}
	}
}
