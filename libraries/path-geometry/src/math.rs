use crate::consts::COLLINEAR_EPS;
use glam::{DVec2, FloatExt};
use std::ops::Range;

pub(crate) type LineSegment = [DVec2; 2];

/// Maps a parameter of a sub-curve back to the parameter range the sub-curve was cut from.
#[inline]
pub(crate) fn lerp_range(range: &Range<f64>, t: f64) -> f64 {
	range.start.lerp(range.end, t)
}

/// Solves `p1 + s * (p2 - p1) = p3 + t * (p4 - p3)`.
///
/// Returns `None` for parallel or coincident lines, and for solutions outside of both unit intervals widened by `eps`.
#[inline(never)]
pub(crate) fn line_segment_intersection([p1, p2]: LineSegment, [p3, p4]: LineSegment, eps: f64) -> Option<(f64, f64)> {
	// https://en.wikipedia.org/wiki/Intersection_(geometry)#Two_line_segments

	let a = p2 - p1;
	let b = p3 - p4;
	let c = p3 - p1;

	let denom = a.x * b.y - a.y * b.x;

	if denom.abs() < COLLINEAR_EPS * a.length() * b.length() || denom == 0. {
		return None;
	}

	let s = (c.x * b.y - c.y * b.x) / denom;
	let t = (a.x * c.y - a.y * c.x) / denom;

	if (-eps..=1. + eps).contains(&s) && (-eps..=1. + eps).contains(&t) { Some((s, t)) } else { None }
}

/// Distance from `point` to the closed line segment `[a, b]`. Degenerate segments measure the distance to `a`.
pub(crate) fn distance_to_line_segment(point: DVec2, [a, b]: LineSegment) -> f64 {
	let direction = b - a;
	let length_squared = direction.length_squared();
	if length_squared == 0. {
		return point.distance(a);
	}
	let t = ((point - a).dot(direction) / length_squared).clamp(0., 1.);
	point.distance(a + direction * t)
}

/// Signed angle in `(-PI, PI]` that rotates `u` onto `v`. Positive values turn left (counter-clockwise).
pub(crate) fn signed_turn(u: DVec2, v: DVec2) -> f64 {
	u.perp_dot(v).atan2(u.dot(v))
}

/// Convex hull using Andrew's monotone chain, ordered counter-clockwise, without repeating the first point.
/// Collinear points on the hull boundary are dropped.
pub(crate) fn convex_hull(points: &[DVec2]) -> Vec<DVec2> {
	let mut sorted = points.to_vec();
	sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
	sorted.dedup();
	if sorted.len() < 3 {
		return sorted;
	}

	let reversed: Vec<DVec2> = sorted.iter().rev().copied().collect();
	let mut hull: Vec<DVec2> = Vec::with_capacity(sorted.len() * 2);
	for pass in [&sorted, &reversed] {
		let lower_bound = hull.len();
		for &point in pass.iter() {
			while hull.len() >= lower_bound + 2 {
				let a = hull[hull.len() - 2];
				let b = hull[hull.len() - 1];
				if (b - a).perp_dot(point - a) > 0. {
					break;
				}
				hull.pop();
			}
			hull.push(point);
		}
		// The last point of each chain starts the other one
		hull.pop();
	}
	hull
}
