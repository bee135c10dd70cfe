use crate::aabb::{Aabb, merge_bounding_boxes};
use crate::classify::{self, Classification};
use crate::consts::EPS;
use crate::flatten::flatten;
use crate::{Segment, Subpath};
use glam::{DAffine2, DVec2};

/// Rule deciding which points a [`Path`] fills, from the winding number around them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillRule {
	/// Filled where the winding number is not zero.
	#[default]
	NonZero,
	/// Filled where the winding number is odd.
	EvenOdd,
}

impl FillRule {
	pub fn is_inside(self, winding: i32) -> bool {
		match self {
			FillRule::NonZero => winding != 0,
			FillRule::EvenOdd => winding % 2 != 0,
		}
	}
}

/// An ordered collection of [`Subpath`]s filled under one [`FillRule`].
///
/// Subpath order only matters for painting. Paths are plain owned values and share nothing with each other.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
	subpaths: Vec<Subpath>,
	fill_rule: FillRule,
}

impl From<Subpath> for Path {
	fn from(subpath: Subpath) -> Self {
		Path {
			subpaths: vec![subpath],
			fill_rule: FillRule::default(),
		}
	}
}

impl Path {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_fill_rule(fill_rule: FillRule) -> Self {
		Path { subpaths: Vec::new(), fill_rule }
	}

	pub fn from_subpaths(subpaths: impl IntoIterator<Item = Subpath>, fill_rule: FillRule) -> Self {
		Path {
			subpaths: subpaths.into_iter().collect(),
			fill_rule,
		}
	}

	pub fn push_subpath(&mut self, subpath: Subpath) {
		self.subpaths.push(subpath);
	}

	pub fn subpaths(&self) -> &[Subpath] {
		&self.subpaths
	}

	/// All segments of all subpaths, in order.
	pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
		self.subpaths.iter().flat_map(|subpath| subpath.iter())
	}

	pub fn fill_rule(&self) -> FillRule {
		self.fill_rule
	}

	pub fn set_fill_rule(&mut self, fill_rule: FillRule) {
		self.fill_rule = fill_rule;
	}

	/// Returns true if the path has no subpaths.
	pub fn is_empty(&self) -> bool {
		self.subpaths.is_empty()
	}

	/// Returns true if every subpath is closed.
	pub fn is_closed(&self) -> bool {
		self.subpaths.iter().all(Subpath::is_closed)
	}

	/// The tight bounding box of all subpaths, or `None` for a path without points.
	pub fn bounding_rect(&self) -> Option<Aabb> {
		self.subpaths.iter().filter_map(Subpath::bounding_rect).fold(None, |bounding_box, subpath_box| Some(merge_bounding_boxes(bounding_box, &subpath_box)))
	}

	/// Sum of the signed areas of all subpaths. Holes wound against their outer outline subtract from it.
	pub fn signed_area(&self) -> f64 {
		self.subpaths.iter().map(Subpath::signed_area).sum()
	}

	/// Absolute value of [`Path::signed_area`].
	pub fn area(&self) -> f64 {
		self.signed_area().abs()
	}

	/// The same outline with every subpath traversed in the opposite direction.
	#[must_use]
	pub fn reversed(&self) -> Path {
		Path {
			subpaths: self.subpaths.iter().map(Subpath::reversed).collect(),
			fill_rule: self.fill_rule,
		}
	}

	/// Moves the subpaths of `other` to the end of this path. The fill rule of this path is kept.
	pub fn append(&mut self, other: Path) {
		self.subpaths.extend(other.subpaths);
	}

	/// Splits the path into one path per subpath, each keeping the fill rule.
	pub fn separate(self) -> Vec<Path> {
		let fill_rule = self.fill_rule;
		self.subpaths.into_iter().map(|subpath| Path { subpaths: vec![subpath], fill_rule }).collect()
	}

	pub fn transform(&mut self, transform: DAffine2) {
		for subpath in &mut self.subpaths {
			subpath.transform(transform);
		}
	}

	/// Winding number of the outline around `point`.
	pub fn winding_number(&self, point: DVec2) -> i32 {
		classify::winding_number(point, self)
	}

	/// Returns true if `point` is filled or lies on the outline.
	pub fn contains_point(&self, point: DVec2) -> bool {
		self.classify_point(point) != Classification::Outside
	}

	pub fn classify_point(&self, point: DVec2) -> Classification {
		classify::classify_with_epsilons(point, self, &EPS)
	}

	/// A copy made only of line segments staying within `tolerance` of this path.
	pub fn flattened(&self, tolerance: f64) -> Path {
		flatten(self, tolerance)
	}
}
