mod graph;

use crate::consts::{EPS, Epsilons};
use crate::error::GeometryError;
use crate::{FillRule, Path};
use glam::DVec2;
use thiserror::Error;

/// Set operation combining the regions filled by two paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BooleanOperation {
	Union,
	Intersection,
	/// The first path minus the second one.
	Subtraction,
	/// Points covered by exactly one of the paths.
	Exclusion,
}

impl BooleanOperation {
	/// Whether a point is filled in the result, given whether it is filled in either operand.
	pub fn apply(self, in_a: bool, in_b: bool) -> bool {
		match self {
			BooleanOperation::Union => in_a || in_b,
			BooleanOperation::Intersection => in_a && in_b,
			BooleanOperation::Subtraction => in_a && !in_b,
			BooleanOperation::Exclusion => in_a != in_b,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BooleanOptions {
	pub epsilons: Epsilons,
}

/// Recoverable trouble met while assembling a result.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum BooleanWarning {
	/// The walk along the kept boundary found no way to continue, so the subpath was closed with a straight line.
	#[error("output subpath {subpath_index} could not be closed along the boundary, it was cut short at {position}")]
	IncompleteBoundary { subpath_index: usize, position: DVec2 },
	/// Operands enclosing some area were united into nothing, their geometry is too small for the distance thresholds.
	#[error("the union of operands enclosing an area of {operand_area} came out empty")]
	EmptyUnion { operand_area: f64 },
}

/// Outcome of [`combine`]. The path is always usable, the warnings tell how much of it is best effort.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BooleanResult {
	pub path: Path,
	pub warnings: Vec<BooleanWarning>,
}

impl BooleanResult {
	/// Returns true if every output subpath was closed along the boundary.
	pub fn is_complete(&self) -> bool {
		self.warnings.is_empty()
	}
}

/// Combines the regions filled by `a` and `b` with the default [`EPS`].
pub fn combine(a: &Path, b: &Path, operation: BooleanOperation) -> Result<BooleanResult, GeometryError> {
	combine_with_options(a, b, operation, &BooleanOptions { epsilons: EPS })
}

/// Combines the regions filled by `a` and `b`.
///
/// Both paths must be made of closed subpaths only. The output subpaths wind counter-clockwise around filled
/// regions and clockwise around holes, under the [`FillRule::NonZero`] rule. When the two paths are far apart
/// the inputs are reused as they are instead.
pub fn combine_with_options(a: &Path, b: &Path, operation: BooleanOperation, options: &BooleanOptions) -> Result<BooleanResult, GeometryError> {
	check_closed(a)?;
	check_closed(b)?;

	if let Some(path) = disjoint_result(a, b, operation) {
		log::trace!("{operation:?} of disjoint paths, reusing the inputs");
		return Ok(BooleanResult { path, warnings: Vec::new() });
	}

	let mut warnings = Vec::new();
	let subpaths = graph::assemble(a, b, operation, &options.epsilons, &mut warnings);
	if operation == BooleanOperation::Union && subpaths.is_empty() {
		let operand_area = outline_area(a) + outline_area(b);
		if operand_area > 0. {
			log::warn!("union of operands enclosing an area of {operand_area} came out empty");
			warnings.push(BooleanWarning::EmptyUnion { operand_area });
		}
	}
	log::trace!("{operation:?} produced {} subpaths with {} warnings", subpaths.len(), warnings.len());
	Ok(BooleanResult {
		path: Path::from_subpaths(subpaths, FillRule::NonZero),
		warnings,
	})
}

fn check_closed(path: &Path) -> Result<(), GeometryError> {
	match path.subpaths().iter().position(|subpath| !subpath.is_closed()) {
		Some(subpath_index) => Err(GeometryError::OpenPath { subpath_index }),
		None => Ok(()),
	}
}

fn outline_area(path: &Path) -> f64 {
	path.subpaths().iter().map(|subpath| subpath.signed_area().abs()).sum()
}

/// Result for operands whose bounding boxes are apart. The fill rules must agree to concatenate the outlines.
fn disjoint_result(a: &Path, b: &Path, operation: BooleanOperation) -> Option<Path> {
	if a.fill_rule() != b.fill_rule() {
		return None;
	}
	if let (Some(box_a), Some(box_b)) = (a.bounding_rect(), b.bounding_rect()) {
		if box_a.overlaps(&box_b) {
			return None;
		}
	}

	Some(match operation {
		BooleanOperation::Union | BooleanOperation::Exclusion => {
			let mut path = a.clone();
			path.append(b.clone());
			path
		}
		BooleanOperation::Intersection => Path::with_fill_rule(a.fill_rule()),
		BooleanOperation::Subtraction => a.clone(),
	})
}
