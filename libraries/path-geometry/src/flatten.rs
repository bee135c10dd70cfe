use crate::{Path, Subpath};

/// Replaces every curve of `path` with a polyline within `tolerance` of it.
///
/// Lines are kept as they are. The result has the same subpaths, closedness and fill rule, and contains only line segments.
pub fn flatten(path: &Path, tolerance: f64) -> Path {
	Path::from_subpaths(path.subpaths().iter().map(|subpath| flatten_subpath(subpath, tolerance)), path.fill_rule())
}

fn flatten_subpath(subpath: &Subpath, tolerance: f64) -> Subpath {
	let Some(first) = subpath.points().first() else {
		return Subpath::new(Vec::new(), subpath.is_closed());
	};

	let mut points = vec![first.position];
	for segment in subpath.iter() {
		segment.flatten_into(tolerance, &mut points);
	}
	// The closing segment ended back on the first point
	if subpath.is_closed() && points.len() > 1 {
		points.pop();
	}
	Subpath::from_anchors(points, subpath.is_closed())
}
