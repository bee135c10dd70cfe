//! Planar graph built from both operands: every input segment is cut at its intersection parameters into arcs,
//! arc endpoints are welded into shared nodes, and the arcs bounding the result are walked into closed subpaths.

use super::{BooleanOperation, BooleanWarning};
use crate::classify::{is_on_boundary, winding_number};
use crate::consts::{Epsilons, NODE_GRID_CELL_SIZE, NODE_WELD_FACTOR, SIDE_SAMPLE_DISTANCE};
use crate::intersection::segment_list_intersections;
use crate::math::signed_turn;
use crate::util::grid::PointWelder;
use crate::{Path, Segment, Subpath};
use glam::DVec2;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operand {
	A,
	B,
}

/// Piece of an input segment between two consecutive split points, leading from node `start` to node `end`.
#[derive(Clone, Copy, Debug)]
struct Arc {
	segment: Segment,
	start: usize,
	end: usize,
	operand: Operand,
}

impl Arc {
	fn reversed(self) -> Arc {
		Arc {
			segment: self.segment.reversed(),
			start: self.end,
			end: self.start,
			operand: self.operand,
		}
	}
}

type SplitParameters = SmallVec<[f64; 4]>;

pub(super) fn assemble(a: &Path, b: &Path, operation: BooleanOperation, eps: &Epsilons, warnings: &mut Vec<BooleanWarning>) -> Vec<Subpath> {
	let scale = operand_scale(a, b);
	let eps = &eps.scaled(scale);
	let segments_a: Vec<Segment> = a.segments().collect();
	let segments_b: Vec<Segment> = b.segments().collect();
	let records = segment_list_intersections(&segments_a, &segments_b, eps);
	log::trace!("{} intersection records between {} and {} segments at scale {scale}", records.len(), segments_a.len(), segments_b.len());

	let mut splits_a = vec![SplitParameters::new(); segments_a.len()];
	let mut splits_b = vec![SplitParameters::new(); segments_b.len()];
	for record in &records {
		splits_a[record.segment_a].push(record.t_a);
		splits_b[record.segment_b].push(record.t_b);
	}

	let weld_radius = eps.point * NODE_WELD_FACTOR;
	let capacity = 2 * (segments_a.len() + segments_b.len() + records.len());
	let mut welder = PointWelder::new((NODE_GRID_CELL_SIZE * scale).max(weld_radius), weld_radius, capacity);
	let mut arcs = Vec::with_capacity(capacity);
	split_into_arcs(&segments_a, &mut splits_a, Operand::A, eps, &mut welder, &mut arcs);
	split_into_arcs(&segments_b, &mut splits_b, Operand::B, eps, &mut welder, &mut arcs);

	let arc_count = arcs.len();
	let side_distance = SIDE_SAMPLE_DISTANCE * scale;
	let kept: Vec<Arc> = arcs.into_iter().filter_map(|arc| keep_arc(arc, a, b, &segments_a, operation, weld_radius, side_distance)).collect();
	log::trace!("kept {} of {arc_count} arcs on {} nodes", kept.len(), welder.positions().len());

	walk(&kept, welder.positions().len(), warnings)
}

/// Size of the operands, capped at 1. Distance thresholds are tuned for unit-sized geometry and shrink with smaller operands.
fn operand_scale(a: &Path, b: &Path) -> f64 {
	let bounds = match (a.bounding_rect(), b.bounding_rect()) {
		(Some(box_a), Some(box_b)) => box_a.union(&box_b),
		(Some(bounds), None) | (None, Some(bounds)) => bounds,
		(None, None) => return 1.,
	};
	let extent = bounds.max_extent();
	if extent > 0. && extent.is_finite() { extent.min(1.) } else { 1. }
}

fn split_into_arcs(segments: &[Segment], splits: &mut [SplitParameters], operand: Operand, eps: &Epsilons, welder: &mut PointWelder, arcs: &mut Vec<Arc>) {
	for (segment, parameters) in segments.iter().zip(splits) {
		parameters.sort_by(f64::total_cmp);
		parameters.dedup_by(|next, previous| *next - *previous < eps.param);
		parameters.retain(|t| *t > eps.param && *t < 1. - eps.param);

		let mut start_t = 0.;
		for end_t in parameters.iter().copied().chain([1.]) {
			let mut piece = segment.trim(start_t, end_t);
			start_t = end_t;

			let start = welder.weld(piece.start);
			let end = welder.weld(piece.end);
			let (start_position, end_position) = (welder.positions()[start], welder.positions()[end]);
			piece.handles.move_start(start_position - piece.start);
			piece.handles.move_end(end_position - piece.end);
			piece.start = start_position;
			piece.end = end_position;

			if start == end && piece.is_point(eps.point * NODE_WELD_FACTOR) {
				continue;
			}
			arcs.push(Arc { segment: piece, start, end, operand });
		}
	}
}

/// Keeps the arcs separating filled from unfilled result regions, oriented with the filled side on the left.
///
/// Arcs of `b` lying on the outline of `a` are dropped, the coincident arc of `a` already gets the same decision.
fn keep_arc(arc: Arc, a: &Path, b: &Path, segments_a: &[Segment], operation: BooleanOperation, weld_radius: f64, side_distance: f64) -> Option<Arc> {
	let middle = arc.segment.evaluate(0.5);
	if arc.operand == Operand::B && is_on_boundary(middle, segments_a.iter().copied(), weld_radius) {
		return None;
	}

	let normal = arc.segment.direction_at(0.5).normalize_or_zero().perp();
	if normal == DVec2::ZERO {
		return None;
	}
	let offset = normal * side_distance.min(arc.segment.control_polygon_length() / 4.);
	let filled = |point: DVec2| {
		let in_a = a.fill_rule().is_inside(winding_number(point, a));
		let in_b = b.fill_rule().is_inside(winding_number(point, b));
		operation.apply(in_a, in_b)
	};

	match (filled(middle + offset), filled(middle - offset)) {
		(true, false) => Some(arc),
		(false, true) => Some(arc.reversed()),
		_ => None,
	}
}

/// Links the kept arcs into closed subpaths. At nodes with several ways on, the sharpest left turn is taken.
fn walk(arcs: &[Arc], node_count: usize, warnings: &mut Vec<BooleanWarning>) -> Vec<Subpath> {
	let mut outgoing = vec![SmallVec::<[usize; 4]>::new(); node_count];
	for (index, arc) in arcs.iter().enumerate() {
		outgoing[arc.start].push(index);
	}
	let mut visited = vec![false; arcs.len()];

	let mut subpaths = Vec::new();
	for first in 0..arcs.len() {
		if visited[first] {
			continue;
		}
		let start_node = arcs[first].start;
		let mut segments = Vec::new();
		let mut current = first;
		loop {
			visited[current] = true;
			let arc = &arcs[current];
			segments.push(arc.segment);
			if arc.end == start_node {
				break;
			}

			let incoming = arc.segment.end - arc.segment.evaluate(0.99);
			let next = outgoing[arc.end]
				.iter()
				.copied()
				.filter(|&index| !visited[index])
				.max_by(|&x, &y| turn_towards(incoming, &arcs[x]).total_cmp(&turn_towards(incoming, &arcs[y])));
			match next {
				Some(next) => current = next,
				None => {
					let position = arc.segment.end;
					log::warn!("dead end at {position} while assembling output subpath {}", subpaths.len());
					warnings.push(BooleanWarning::IncompleteBoundary {
						subpath_index: subpaths.len(),
						position,
					});
					segments.push(Segment::new_line(position, arcs[first].segment.start));
					break;
				}
			}
		}
		subpaths.push(Subpath::from_segments(&segments, true));
	}
	subpaths
}

fn turn_towards(incoming: DVec2, arc: &Arc) -> f64 {
	signed_turn(incoming, arc.segment.evaluate(0.01) - arc.segment.start)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::compare::compare_f64s;
	use crate::consts::EPS;

	fn square(min: DVec2, max: DVec2) -> Path {
		Path::from(Subpath::new_rect(min, max))
	}

	fn area(subpaths: &[Subpath]) -> f64 {
		subpaths.iter().map(Subpath::signed_area).sum()
	}

	#[test]
	fn squares_touching_at_a_corner_stay_separate() {
		let a = square(DVec2::new(0., 0.), DVec2::new(1., 1.));
		let b = square(DVec2::new(1., 1.), DVec2::new(2., 2.));
		let mut warnings = Vec::new();

		let union = assemble(&a, &b, BooleanOperation::Union, &EPS, &mut warnings);
		assert!(warnings.is_empty());
		assert_eq!(union.len(), 2);
		assert!(compare_f64s(area(&union), 2.));

		let intersection = assemble(&a, &b, BooleanOperation::Intersection, &EPS, &mut warnings);
		assert!(intersection.is_empty());
	}

	#[test]
	fn shared_edges_are_dropped_or_kept_once() {
		let a = square(DVec2::new(0., 0.), DVec2::new(1., 1.));
		let b = square(DVec2::new(1., 0.), DVec2::new(2., 1.));
		let mut warnings = Vec::new();

		let union = assemble(&a, &b, BooleanOperation::Union, &EPS, &mut warnings);
		assert_eq!(union.len(), 1);
		assert!(compare_f64s(area(&union), 2.));
		assert!(assemble(&a, &b, BooleanOperation::Intersection, &EPS, &mut warnings).is_empty());

		let subtraction = assemble(&a, &b, BooleanOperation::Subtraction, &EPS, &mut warnings);
		assert_eq!(subtraction.len(), 1);
		assert!(compare_f64s(area(&subtraction), 1.));
		assert!(warnings.is_empty());
	}

	#[test]
	fn crossing_outlines_are_split_at_the_crossings() {
		let a = square(DVec2::new(0., 0.), DVec2::new(10., 10.));
		let b = square(DVec2::new(5., 5.), DVec2::new(15., 15.));
		let mut warnings = Vec::new();

		let intersection = assemble(&a, &b, BooleanOperation::Intersection, &EPS, &mut warnings);
		assert_eq!(intersection.len(), 1);
		assert_eq!(intersection[0].len(), 4);
		assert!(compare_f64s(area(&intersection), 25.));
		let bounds = intersection[0].bounding_rect().unwrap();
		assert!(bounds.min().abs_diff_eq(DVec2::splat(5.), 1e-9));
		assert!(bounds.max().abs_diff_eq(DVec2::splat(10.), 1e-9));
	}

	#[test]
	fn thresholds_follow_the_operand_size() {
		let a = square(DVec2::new(0., 0.), DVec2::new(1e-5, 1e-5));
		let b = square(DVec2::new(5e-6, 5e-6), DVec2::new(1.5e-5, 1.5e-5));
		assert_eq!(operand_scale(&a, &b), 1.5e-5);
		assert_eq!(operand_scale(&a, &square(DVec2::splat(-10.), DVec2::splat(10.))), 1.);
		assert_eq!(operand_scale(&Path::new(), &Path::new()), 1.);

		let mut warnings = Vec::new();
		let union = assemble(&a, &b, BooleanOperation::Union, &EPS, &mut warnings);
		assert!(warnings.is_empty());
		assert_eq!(union.len(), 1);
		assert_eq!(union[0].len(), 8);
		assert!((area(&union) - 1.75e-10).abs() < 1e-18);
	}

	#[test]
	fn dead_ends_close_with_a_line() {
		let arcs = [
			Arc {
				segment: Segment::new_line(DVec2::new(0., 0.), DVec2::new(1., 0.)),
				start: 0,
				end: 1,
				operand: Operand::A,
			},
			Arc {
				segment: Segment::new_line(DVec2::new(1., 0.), DVec2::new(1., 1.)),
				start: 1,
				end: 2,
				operand: Operand::A,
			},
		];
		let mut warnings = Vec::new();
		let subpaths = walk(&arcs, 3, &mut warnings);

		assert_eq!(subpaths.len(), 1);
		assert_eq!(subpaths[0].len_segments(), 3);
		assert!(compare_f64s(subpaths[0].signed_area(), 0.5));
		assert_eq!(
			warnings,
			vec![BooleanWarning::IncompleteBoundary {
				subpath_index: 0,
				position: DVec2::new(1., 1.)
			}]
		);
	}

	#[test]
	fn sharpest_left_turn_wins() {
		let incoming = DVec2::X;
		let arc = |end: DVec2| Arc {
			segment: Segment::new_line(DVec2::ZERO, end),
			start: 0,
			end: 1,
			operand: Operand::B,
		};
		assert!(turn_towards(incoming, &arc(DVec2::new(-1., 0.1))) > turn_towards(incoming, &arc(DVec2::Y)));
		assert!(turn_towards(incoming, &arc(DVec2::Y)) > turn_towards(incoming, &arc(DVec2::X)));
		assert!(turn_towards(incoming, &arc(DVec2::X)) > turn_towards(incoming, &arc(DVec2::NEG_Y)));
	}
}
