use crate::consts::{EPS, Epsilons};
use crate::{Path, Segment};
use glam::DVec2;
use smallvec::{SmallVec, smallvec};

/// Where a point lies relative to the filled region of a [`Path`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
	Inside,
	Outside,
	/// Within [`Epsilons::point`] of a segment.
	OnBoundary,
}

/// Classifies `point` against `path` using the default [`EPS`].
pub fn classify(point: DVec2, path: &Path) -> Classification {
	classify_with_epsilons(point, path, &EPS)
}

/// Classifies `point` against `path`. Points near the outline are reported as on the boundary,
/// every other point is tested with a ray cast towards positive x under the path's fill rule.
pub fn classify_with_epsilons(point: DVec2, path: &Path, eps: &Epsilons) -> Classification {
	if is_on_boundary(point, path.segments(), eps.point) {
		Classification::OnBoundary
	} else if path.fill_rule().is_inside(winding_number(point, path)) {
		Classification::Inside
	} else {
		Classification::Outside
	}
}

pub(crate) fn is_on_boundary(point: DVec2, mut segments: impl Iterator<Item = Segment>, distance: f64) -> bool {
	segments.any(|segment| segment.control_point_rect().expanded(distance).contains(point) && segment.distance_to_point(point) < distance)
}

/// Sum of signed crossings of a ray from `point` towards positive x. Upward crossings count +1, so counter-clockwise outlines wind positively.
///
/// Open subpaths are treated as closed by a straight line, matching how they are filled.
pub fn winding_number(point: DVec2, path: &Path) -> i32 {
	path.subpaths()
		.iter()
		.map(|subpath| {
			let closing_line = match (subpath.is_closed(), subpath.points().first(), subpath.points().last()) {
				(false, Some(first), Some(last)) => Some(Segment::new_line(last.position, first.position)),
				_ => None,
			};
			subpath.iter().chain(closing_line).map(|segment| segment_winding(&segment, point)).sum::<i32>()
		})
		.sum()
}

/// Winding contribution of one segment.
///
/// The curve is cut at its y extrema into monotonic pieces. Each piece covers the half-open range from its lower end
/// (inclusive) to its upper end (exclusive), so a ray through a shared vertex is counted exactly once.
pub(crate) fn segment_winding(segment: &Segment, point: DVec2) -> i32 {
	let bounds = segment.control_point_rect();
	if point.y < bounds.min().y || point.y > bounds.max().y || point.x > bounds.max().x {
		return 0;
	}

	let [_, y_extrema] = segment.local_extrema();
	let mut params: SmallVec<[f64; 4]> = smallvec![0.];
	params.extend(y_extrema);
	params.push(1.);
	let heights: SmallVec<[f64; 4]> = params
		.iter()
		.map(|&t| {
			if t == 0. {
				segment.start.y
			} else if t == 1. {
				segment.end.y
			} else {
				segment.evaluate(t).y
			}
		})
		.collect();

	let mut winding = 0;
	for i in 0..params.len() - 1 {
		let (y0, y1) = (heights[i], heights[i + 1]);
		let upward = y1 > y0;
		let in_range = if upward { y0 <= point.y && point.y < y1 } else { y1 <= point.y && point.y < y0 };
		if !in_range {
			continue;
		}
		let t = monotonic_root(segment, point.y, params[i], params[i + 1], upward);
		if segment.evaluate(t).x > point.x {
			winding += if upward { 1 } else { -1 };
		}
	}
	winding
}

/// Parameter in `[t0, t1]` where the segment reaches height `y`, given that `y(t)` is monotonic on the interval.
fn monotonic_root(segment: &Segment, y: f64, t0: f64, t1: f64, upward: bool) -> f64 {
	let [c0, c1, c2, c3] = segment.polynomial_coefficients();
	let slack = 1e-9;
	let roots = roots::find_roots_cubic(c3.y, c2.y, c1.y, c0.y - y);
	let root = roots.as_ref().iter().map(|&t| t.clamp(t0, t1)).find(|&t| {
		let on_interval = t >= t0 - slack && t <= t1 + slack;
		on_interval && (segment.evaluate(t).y - y).abs() <= 1e-9 * (1. + y.abs())
	});
	if let Some(t) = root {
		return t;
	}

	// Bisection for nearly degenerate polynomials
	let (mut low, mut high) = (t0, t1);
	for _ in 0..64 {
		let middle = (low + high) / 2.;
		if (segment.evaluate(middle).y < y) == upward {
			low = middle;
		} else {
			high = middle;
		}
	}
	(low + high) / 2.
}
