use crate::aabb::{Aabb, merge_bounding_boxes};
use crate::{Segment, SegmentHandles};
use glam::{DAffine2, DVec2};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Based on <https://pomax.github.io/bezierinfo/#circles_cubic>
const HANDLE_OFFSET_FACTOR: f64 = 0.551784777779014;

/// A vertex of a [`Subpath`]: a position with optional control points stored as offsets from it.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathPoint {
	pub position: DVec2,
	/// Control point of the segment arriving at this point, relative to `position`.
	pub in_offset: Option<DVec2>,
	/// Control point of the segment leaving this point, relative to `position`.
	pub out_offset: Option<DVec2>,
	/// Whether editing should keep the two control points collinear.
	pub smooth: bool,
}

impl PathPoint {
	/// A corner point without control points.
	pub fn corner(position: DVec2) -> Self {
		PathPoint {
			position,
			in_offset: None,
			out_offset: None,
			smooth: false,
		}
	}

	/// A smooth point whose incoming control point mirrors the outgoing one.
	pub fn smooth(position: DVec2, out_offset: DVec2) -> Self {
		PathPoint {
			position,
			in_offset: Some(-out_offset),
			out_offset: Some(out_offset),
			smooth: true,
		}
	}

	/// A corner point from absolute control point positions.
	pub fn with_handles(position: DVec2, in_handle: Option<DVec2>, out_handle: Option<DVec2>) -> Self {
		PathPoint {
			position,
			in_offset: in_handle.map(|handle| handle - position),
			out_offset: out_handle.map(|handle| handle - position),
			smooth: false,
		}
	}

	pub fn in_handle(&self) -> Option<DVec2> {
		self.in_offset.map(|offset| self.position + offset)
	}

	pub fn out_handle(&self) -> Option<DVec2> {
		self.out_offset.map(|offset| self.position + offset)
	}

	/// Swaps the incoming and outgoing control points, for traversal in the opposite direction.
	#[must_use]
	pub fn reversed(&self) -> Self {
		PathPoint {
			in_offset: self.out_offset,
			out_offset: self.in_offset,
			..*self
		}
	}

	/// The segment from this point to `next`, with its degree given by which of the two control points are present.
	pub fn to_segment(&self, next: &PathPoint) -> Segment {
		Segment::from_points(self.position, self.out_handle(), next.in_handle(), next.position)
	}

	fn transformed(&self, transform: DAffine2) -> Self {
		PathPoint {
			position: transform.transform_point2(self.position),
			in_offset: self.in_offset.map(|offset| transform.transform_vector2(offset)),
			out_offset: self.out_offset.map(|offset| transform.transform_vector2(offset)),
			smooth: self.smooth,
		}
	}
}

/// An ordered chain of [`PathPoint`]s. A closed subpath has an implicit segment from the last point back to the first.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subpath {
	points: Vec<PathPoint>,
	closed: bool,
}

impl Subpath {
	pub fn new(points: Vec<PathPoint>, closed: bool) -> Self {
		Subpath { points, closed }
	}

	/// A polyline through the given positions.
	pub fn from_anchors(anchor_positions: impl IntoIterator<Item = DVec2>, closed: bool) -> Self {
		Self::new(anchor_positions.into_iter().map(PathPoint::corner).collect(), closed)
	}

	/// Builds a subpath from consecutive segments. Each segment is expected to start where the previous one ends.
	///
	/// For a closed subpath the last segment should end at the start of the first one, it becomes the closing segment.
	pub fn from_segments(segments: &[Segment], closed: bool) -> Self {
		let Some(first) = segments.first() else {
			return Subpath::new(Vec::new(), closed);
		};

		let mut points = Vec::with_capacity(segments.len() + 1);
		points.push(PathPoint::with_handles(first.start, None, first.handles.start()));
		for pair in segments.windows(2) {
			points.push(PathPoint::with_handles(pair[1].start, incoming_handle(&pair[0]), pair[1].handles.start()));
		}

		let last = segments[segments.len() - 1];
		if closed {
			points[0].in_offset = incoming_handle(&last).map(|handle| handle - points[0].position);
		} else {
			points.push(PathPoint::with_handles(last.end, incoming_handle(&last), None));
		}
		Subpath::new(points, closed)
	}

	/// Constructs a rectangle with `corner1` and `corner2` as the two corners.
	pub fn new_rect(corner1: DVec2, corner2: DVec2) -> Self {
		Self::from_anchors([corner1, DVec2::new(corner2.x, corner1.y), corner2, DVec2::new(corner1.x, corner2.y)], true)
	}

	/// Constructs an ellipse with `corner1` and `corner2` as the two corners of the bounding box,
	/// counter-clockwise starting from the rightmost point.
	pub fn new_ellipse(corner1: DVec2, corner2: DVec2) -> Self {
		let radius = (corner1 - corner2).abs() / 2.;
		let center = (corner1 + corner2) / 2.;
		let offset = radius * HANDLE_OFFSET_FACTOR;

		let points = vec![
			PathPoint::smooth(center + DVec2::new(radius.x, 0.), DVec2::new(0., offset.y)),
			PathPoint::smooth(center + DVec2::new(0., radius.y), DVec2::new(-offset.x, 0.)),
			PathPoint::smooth(center - DVec2::new(radius.x, 0.), DVec2::new(0., -offset.y)),
			PathPoint::smooth(center - DVec2::new(0., radius.y), DVec2::new(offset.x, 0.)),
		];
		Self::new(points, true)
	}

	/// Constructs a regular polygon with `sides` vertices at `radius` from `center`, counter-clockwise from the top vertex.
	pub fn new_polygon(center: DVec2, sides: usize, radius: f64) -> Self {
		let anchor_positions = (0..sides).map(|i| {
			let angle = FRAC_PI_2 + i as f64 * TAU / sides as f64;
			center + radius * DVec2::from_angle(angle)
		});
		Self::from_anchors(anchor_positions, true)
	}

	pub fn points(&self) -> &[PathPoint] {
		&self.points
	}

	pub fn push(&mut self, point: PathPoint) {
		self.points.push(point);
	}

	/// Number of points.
	pub fn len(&self) -> usize {
		self.points.len()
	}

	pub fn is_empty(&self) -> bool {
		self.points.is_empty()
	}

	/// Number of segments, including the closing segment of a closed subpath.
	pub fn len_segments(&self) -> usize {
		match self.points.len() {
			0 => 0,
			len if self.closed => len,
			len => len - 1,
		}
	}

	pub fn get_segment(&self, index: usize) -> Option<Segment> {
		if index >= self.len_segments() {
			return None;
		}
		let next = (index + 1) % self.points.len();
		Some(self.points[index].to_segment(&self.points[next]))
	}

	/// Iterates over the segments in traversal order.
	pub fn iter(&self) -> impl Iterator<Item = Segment> + '_ {
		(0..self.len_segments()).filter_map(|index| self.get_segment(index))
	}

	pub fn is_closed(&self) -> bool {
		self.closed
	}

	pub fn set_closed(&mut self, closed: bool) {
		self.closed = closed;
	}

	/// Closes the subpath. A last point lying on the first one is merged into it, keeping its incoming control point.
	pub fn close(&mut self) {
		if self.points.len() > 1 {
			let first = self.points[0].position;
			if let Some(last) = self.points.last().filter(|last| last.position == first).copied() {
				self.points.pop();
				self.points[0].in_offset = last.in_offset;
			}
		}
		self.closed = true;
	}

	/// Reverses the direction of travel.
	pub fn reverse(&mut self) {
		self.points.reverse();
		for point in &mut self.points {
			*point = point.reversed();
		}
		// Keep the same starting point for closed subpaths
		if self.closed && !self.points.is_empty() {
			self.points.rotate_right(1);
		}
	}

	#[must_use]
	pub fn reversed(&self) -> Subpath {
		let mut reversed = self.clone();
		reversed.reverse();
		reversed
	}

	/// The tight bounding box of all segments, or `None` for an empty subpath.
	pub fn bounding_rect(&self) -> Option<Aabb> {
		match self.points.as_slice() {
			[] => None,
			[point] => Some(Aabb::new(point.position, point.position)),
			_ => self.iter().fold(None, |bounding_box, segment| Some(merge_bounding_boxes(bounding_box, &segment.bounding_rect()))),
		}
	}

	/// Signed area, positive for counter-clockwise subpaths. Open subpaths are measured as if closed by a straight line.
	pub fn signed_area(&self) -> f64 {
		let mut area: f64 = self.iter().map(|segment| segment.signed_area()).sum();
		if !self.closed {
			if let (Some(first), Some(last)) = (self.points.first(), self.points.last()) {
				area += Segment::new_line(last.position, first.position).signed_area();
			}
		}
		area
	}

	pub fn transform(&mut self, transform: DAffine2) {
		for point in &mut self.points {
			*point = point.transformed(transform);
		}
	}
}

fn incoming_handle(segment: &Segment) -> Option<DVec2> {
	match segment.handles {
		SegmentHandles::Cubic { handle_end, .. } => Some(handle_end),
		_ => None,
	}
}
