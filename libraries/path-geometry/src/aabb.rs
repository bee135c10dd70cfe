use glam::{BVec2, DVec2};

/// Axis-aligned rectangle given by its minimum and maximum corners.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
	min: DVec2,
	max: DVec2,
}

impl Default for Aabb {
	fn default() -> Self {
		Self {
			min: DVec2::INFINITY,
			max: DVec2::NEG_INFINITY,
		}
	}
}

impl Aabb {
	/// Creates the rectangle spanned by two opposite corners, given in any order.
	pub fn new(corner1: DVec2, corner2: DVec2) -> Self {
		Aabb {
			min: corner1.min(corner2),
			max: corner1.max(corner2),
		}
	}

	/// Smallest rectangle containing every point, or `None` for an empty iterator.
	pub fn from_points(points: impl IntoIterator<Item = DVec2>) -> Option<Self> {
		points.into_iter().fold(None, |bounding_box, point| Some(extend_bounding_box(bounding_box, point)))
	}

	#[inline]
	pub fn min(&self) -> DVec2 {
		self.min
	}
	#[inline]
	pub fn max(&self) -> DVec2 {
		self.max
	}
	#[inline]
	pub fn width(&self) -> f64 {
		self.max.x - self.min.x
	}
	#[inline]
	pub fn height(&self) -> f64 {
		self.max.y - self.min.y
	}
	#[inline]
	pub fn center(&self) -> DVec2 {
		(self.min + self.max) / 2.
	}

	/// The larger of width and height.
	pub fn max_extent(&self) -> f64 {
		(self.max - self.min).max_element()
	}

	/// Closed-interval overlap test: rectangles that merely touch overlap.
	#[inline]
	pub fn overlaps(&self, other: &Aabb) -> bool {
		(self.min.cmple(other.max) & other.min.cmple(self.max)) == BVec2::TRUE
	}

	#[inline]
	pub fn contains(&self, point: DVec2) -> bool {
		(self.min.cmple(point) & point.cmple(self.max)) == BVec2::TRUE
	}

	#[must_use]
	pub fn union(&self, other: &Aabb) -> Aabb {
		Aabb {
			min: self.min.min(other.min),
			max: self.max.max(other.max),
		}
	}

	#[must_use]
	pub fn expanded(&self, padding: f64) -> Aabb {
		Aabb {
			min: self.min - DVec2::splat(padding),
			max: self.max + DVec2::splat(padding),
		}
	}
}

#[inline]
pub(crate) fn extend_bounding_box(bounding_box: Option<Aabb>, point: DVec2) -> Aabb {
	match bounding_box {
		Some(bb) => Aabb {
			min: bb.min.min(point),
			max: bb.max.max(point),
		},
		None => Aabb { min: point, max: point },
	}
}

pub(crate) fn merge_bounding_boxes(a: Option<Aabb>, b: &Aabb) -> Aabb {
	match a {
		Some(a) => a.union(b),
		None => *b,
	}
}
