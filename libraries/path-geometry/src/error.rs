use thiserror::Error;

/// Precondition violations reported by segment queries and boolean operations.
///
/// Numerical trouble (recursion caps, near-tangential crossings) is never reported here.
/// Those cases degrade to a best-effort answer instead, see [`crate::BooleanWarning`].
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum GeometryError {
	#[error("curve parameter {t} lies outside of [0, 1]")]
	InvalidParameter { t: f64 },

	#[error("boolean operations need closed outlines, but subpath {subpath_index} is open")]
	OpenPath { subpath_index: usize },
}

pub(crate) fn check_parameter(t: f64) -> Result<f64, GeometryError> {
	if (0. ..=1.).contains(&t) { Ok(t) } else { Err(GeometryError::InvalidParameter { t }) }
}
