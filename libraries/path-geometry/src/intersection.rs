use crate::aabb::Aabb;
use crate::consts::*;
use crate::math::{LineSegment, lerp_range, line_segment_intersection};
use crate::{Path, Segment};
use glam::{DVec2, FloatExt};
use smallvec::{SmallVec, smallvec};
use std::ops::Range;

/// A point where a segment of one path meets a segment of another.
///
/// Segment indices count the segments of every subpath in order, as produced by [`Path::segments`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionRecord {
	pub segment_a: usize,
	pub t_a: f64,
	pub segment_b: usize,
	pub t_b: f64,
	pub point: DVec2,
}

#[derive(Clone)]
struct SubSegment {
	segment: Segment,
	range: Range<f64>,
	bounding_box: Aabb,
}

impl SubSegment {
	fn new(segment: Segment, range: Range<f64>) -> Self {
		SubSegment {
			bounding_box: segment.control_point_rect(),
			segment,
			range,
		}
	}

	fn subdivide(&self) -> [SubSegment; 2] {
		let [first, second] = self.segment.split(0.5);
		let middle = (self.range.start + self.range.end) / 2.;
		[SubSegment::new(first, self.range.start..middle), SubSegment::new(second, middle..self.range.end)]
	}

	fn chord(&self) -> LineSegment {
		[self.segment.start, self.segment.end]
	}
}

/// Parameter pairs `(t_a, t_b)` where `a` and `b` meet, including tangential touches, using the default [`EPS`].
pub fn intersect(a: &Segment, b: &Segment) -> Vec<(f64, f64)> {
	segment_intersections(a, b, &EPS)
}

/// Every meeting point between a segment of `a` and a segment of `b`, using the default [`EPS`].
///
/// Besides crossings this reports touches, the ends of overlapping stretches,
/// and vertices of either path that lie on a segment interior of the other.
pub fn intersect_paths(a: &Path, b: &Path) -> Vec<IntersectionRecord> {
	let segments_a: Vec<Segment> = a.segments().collect();
	let segments_b: Vec<Segment> = b.segments().collect();
	segment_list_intersections(&segments_a, &segments_b, &EPS)
}

pub(crate) fn segment_intersections(a: &Segment, b: &Segment, eps: &Epsilons) -> Vec<(f64, f64)> {
	if !a.control_point_rect().expanded(eps.point).overlaps(&b.control_point_rect()) {
		return Vec::new();
	}

	// Overlapping curves meet everywhere along the overlap, only the ends of the overlap are reported
	let touches = endpoint_touches(a, b, eps);
	if let Some(span_ends) = coincident_span(a, b, &touches, eps) {
		return span_ends;
	}

	// Endpoints resting on the other curve go first so their exact parameters survive the merge
	let mut params: Vec<(f64, f64)> = touches.into_vec();
	if a.degree() == 1 && b.degree() == 1 {
		params.extend(line_segment_intersection([a.start, a.end], [b.start, b.end], eps.param).map(|(s, t)| (s.clamp(0., 1.), t.clamp(0., 1.))));
	} else {
		params.extend(subdivision_intersections(a, b, eps));
	}

	let mut merged: Vec<(f64, f64)> = Vec::with_capacity(params.len());
	for (t_a, t_b) in params.into_iter().map(|pair| polish(a, b, pair)) {
		let t_a = snap_to_ends(t_a, eps.param);
		let t_b = snap_to_ends(t_b, eps.param);
		let duplicate = merged.iter().any(|&(other_a, other_b)| {
			let close_params = (other_a - t_a).abs() < eps.param && (other_b - t_b).abs() < eps.param;
			let close_points = a.evaluate(other_a).distance(a.evaluate(t_a)) < eps.point && b.evaluate(other_b).distance(b.evaluate(t_b)) < eps.point;
			close_params || close_points
		});
		if !duplicate {
			merged.push((t_a, t_b));
		}
	}
	merged.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.total_cmp(&y.1)));
	merged
}

// https://math.stackexchange.com/questions/20321/how-can-i-tell-when-two-cubic-b%C3%A9zier-curves-intersect
fn subdivision_intersections(a: &Segment, b: &Segment, eps: &Epsilons) -> Vec<(f64, f64)> {
	let mut pairs = vec![(SubSegment::new(*a, 0. ..1.), SubSegment::new(*b, 0. ..1.))];
	let mut params = Vec::new();

	for _ in 0..MAX_INTERSECTION_DEPTH {
		if pairs.is_empty() {
			break;
		}
		let mut next_pairs = Vec::new();

		for (sub_a, sub_b) in pairs {
			let is_flat_a = sub_a.segment.is_flat(eps.linear);
			let is_flat_b = sub_b.segment.is_flat(eps.linear);

			if is_flat_a && is_flat_b {
				if let Some((s, t)) = line_segment_intersection(sub_a.chord(), sub_b.chord(), eps.param) {
					params.push((lerp_range(&sub_a.range, s.clamp(0., 1.)), lerp_range(&sub_b.range, t.clamp(0., 1.))));
				}
				continue;
			}

			let subdivided_a: SmallVec<[SubSegment; 2]> = if is_flat_a { smallvec![sub_a] } else { SmallVec::from(sub_a.subdivide()) };
			let subdivided_b: SmallVec<[SubSegment; 2]> = if is_flat_b { smallvec![sub_b] } else { SmallVec::from(sub_b.subdivide()) };

			for sub_a in &subdivided_a {
				for sub_b in &subdivided_b {
					if sub_a.bounding_box.expanded(eps.point).overlaps(&sub_b.bounding_box) {
						next_pairs.push((sub_a.clone(), sub_b.clone()));
					}
				}
			}
		}

		if next_pairs.len() > MAX_INTERSECTION_PAIRS {
			log::debug!("Intersection search exceeded {MAX_INTERSECTION_PAIRS} candidate pairs, dropping {}", next_pairs.len() - MAX_INTERSECTION_PAIRS);
			next_pairs.truncate(MAX_INTERSECTION_PAIRS);
		}
		pairs = next_pairs;
	}

	if !pairs.is_empty() {
		log::debug!("Intersection search reached depth {MAX_INTERSECTION_DEPTH}, dropping {} candidate pairs", pairs.len());
	}

	params
}

/// Parameter pairs where an endpoint of one segment lies on the other, sorted along `a` and deduplicated.
fn endpoint_touches(a: &Segment, b: &Segment, eps: &Epsilons) -> SmallVec<[(f64, f64); 4]> {
	let mut touches: SmallVec<[(f64, f64); 4]> = SmallVec::new();
	for t_a in [0., 1.] {
		let point = a.evaluate(t_a);
		let t_b = b.nearest_point(point);
		if b.evaluate(t_b).distance(point) < eps.point {
			touches.push((t_a, snap_to_ends(t_b, eps.param)));
		}
	}
	for t_b in [0., 1.] {
		let point = b.evaluate(t_b);
		let t_a = a.nearest_point(point);
		if a.evaluate(t_a).distance(point) < eps.point {
			touches.push((snap_to_ends(t_a, eps.param), t_b));
		}
	}
	touches.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.total_cmp(&y.1)));
	touches.dedup_by(|x, y| (x.0 - y.0).abs() < eps.param && (x.1 - y.1).abs() < eps.param);
	touches
}

/// Detects `a` and `b` running along each other. Returns the parameter pairs bounding the shared stretch.
fn coincident_span(a: &Segment, b: &Segment, touches: &[(f64, f64)], eps: &Epsilons) -> Option<Vec<(f64, f64)>> {
	let mut candidates: SmallVec<[(f64, f64); 4]> = SmallVec::from_slice(touches);
	candidates.dedup_by(|x, y| (x.0 - y.0).abs() < eps.param);
	if candidates.len() < 2 {
		return None;
	}

	for pair in candidates.windows(2) {
		let [(start_a, start_b), (end_a, end_b)] = [pair[0], pair[1]];
		if (end_b - start_b).abs() < eps.param {
			return None;
		}
		for s in [0.25, 0.5, 0.75] {
			if b.distance_to_point(a.evaluate(start_a.lerp(end_a, s))) >= eps.point {
				return None;
			}
		}
	}

	Some(candidates.into_vec())
}

/// Newton iterations on `a(t_a) - b(t_b) = 0`. Steps that do not reduce the residual are rejected.
fn polish(a: &Segment, b: &Segment, (mut t_a, mut t_b): (f64, f64)) -> (f64, f64) {
	let mut residual = a.evaluate(t_a) - b.evaluate(t_b);
	for _ in 0..INTERSECTION_POLISH_ITERATIONS {
		if residual == DVec2::ZERO {
			break;
		}
		let derivative_a = a.non_normalized_tangent(t_a);
		let derivative_b = b.non_normalized_tangent(t_b);
		// Solve derivative_a * d_a - derivative_b * d_b = -residual
		let determinant = -derivative_a.perp_dot(derivative_b);
		if determinant.abs() <= COLLINEAR_EPS * derivative_a.length() * derivative_b.length() {
			break;
		}
		let d_a = residual.perp_dot(derivative_b) / determinant;
		let d_b = -derivative_a.perp_dot(residual) / determinant;

		let next_a = (t_a + d_a).clamp(0., 1.);
		let next_b = (t_b + d_b).clamp(0., 1.);
		let next_residual = a.evaluate(next_a) - b.evaluate(next_b);
		if next_residual.length_squared() >= residual.length_squared() {
			break;
		}
		(t_a, t_b, residual) = (next_a, next_b, next_residual);
	}
	(t_a, t_b)
}

fn snap_to_ends(t: f64, param_epsilon: f64) -> f64 {
	if t < param_epsilon {
		0.
	} else if t > 1. - param_epsilon {
		1.
	} else {
		t
	}
}

/// Returns true if the curves pass through each other at the given parameters, rather than only touching.
pub(crate) fn is_crossing(a: &Segment, t_a: f64, b: &Segment, t_b: f64) -> bool {
	!stays_on_one_side(a, t_a, b, t_b) && !stays_on_one_side(b, t_b, a, t_a)
}

/// Probes `curve` just before and after `t` against the tangent line of `other` at `other_t`.
fn stays_on_one_side(curve: &Segment, t: f64, other: &Segment, other_t: f64) -> bool {
	let origin = other.evaluate(other_t);
	let normal = other.direction_at(other_t).normalize_or_zero().perp();
	let before = (curve.evaluate((t - CROSSING_PROBE_OFFSET).max(0.)) - origin).dot(normal);
	let after = (curve.evaluate((t + CROSSING_PROBE_OFFSET).min(1.)) - origin).dot(normal);
	let noise = f64::EPSILON * 16. * (1. + origin.abs().max_element());
	before.abs() > noise && after.abs() > noise && before.signum() == after.signum()
}

pub(crate) fn segment_list_intersections(segments_a: &[Segment], segments_b: &[Segment], eps: &Epsilons) -> Vec<IntersectionRecord> {
	let boxes_a: Vec<Aabb> = segments_a.iter().map(|segment| segment.control_point_rect().expanded(eps.point)).collect();
	let boxes_b: Vec<Aabb> = segments_b.iter().map(|segment| segment.control_point_rect()).collect();

	let mut records = Vec::new();
	for (segment_a, (a, box_a)) in segments_a.iter().zip(&boxes_a).enumerate() {
		for (segment_b, (b, box_b)) in segments_b.iter().zip(&boxes_b).enumerate() {
			if !box_a.overlaps(box_b) {
				continue;
			}
			for (t_a, t_b) in segment_intersections(a, b, eps) {
				records.push(IntersectionRecord {
					segment_a,
					t_a,
					segment_b,
					t_b,
					point: a.evaluate(t_a),
				});
			}
		}
	}

	// Vertices resting on the interior of a segment of the other path
	for (segment_a, a) in segments_a.iter().enumerate() {
		for t_a in [0., 1.] {
			let vertex = a.evaluate(t_a);
			for (segment_b, (b, box_b)) in segments_b.iter().zip(&boxes_b).enumerate() {
				if let Some(t_b) = interior_parameter(vertex, b, box_b, eps) {
					push_unique(&mut records, IntersectionRecord { segment_a, t_a, segment_b, t_b, point: vertex }, eps);
				}
			}
		}
	}
	for (segment_b, b) in segments_b.iter().enumerate() {
		for t_b in [0., 1.] {
			let vertex = b.evaluate(t_b);
			for (segment_a, (a, box_a)) in segments_a.iter().zip(&boxes_a).enumerate() {
				if let Some(t_a) = interior_parameter(vertex, a, box_a, eps) {
					push_unique(&mut records, IntersectionRecord { segment_a, t_a, segment_b, t_b, point: vertex }, eps);
				}
			}
		}
	}

	records.sort_by(|x, y| x.segment_a.cmp(&y.segment_a).then(x.t_a.total_cmp(&y.t_a)).then(x.segment_b.cmp(&y.segment_b)));
	records
}

fn interior_parameter(vertex: DVec2, segment: &Segment, bounding_box: &Aabb, eps: &Epsilons) -> Option<f64> {
	if !bounding_box.expanded(eps.point).contains(vertex) {
		return None;
	}
	let t = segment.nearest_point(vertex);
	let is_interior = t > eps.param && t < 1. - eps.param;
	(is_interior && segment.evaluate(t).distance(vertex) < eps.point).then_some(t)
}

fn push_unique(records: &mut Vec<IntersectionRecord>, record: IntersectionRecord, eps: &Epsilons) {
	let exists = records.iter().any(|other| {
		other.segment_a == record.segment_a && other.segment_b == record.segment_b && (other.t_a - record.t_a).abs() < eps.param && (other.t_b - record.t_b).abs() < eps.param
	});
	if !exists {
		records.push(record);
	}
}
