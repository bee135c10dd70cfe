use crate::aabb::Aabb;
use glam::{DVec2, I64Vec2};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Uniform spatial hash. Every entry is registered in each cell its box touches.
pub(crate) struct Grid {
	cell_factor: f64,
	cells: FxHashMap<I64Vec2, SmallVec<[usize; 6]>>,
}

impl Grid {
	pub(crate) fn new(cell_size: f64, capacity: usize) -> Self {
		Grid {
			cell_factor: cell_size.recip(),
			cells: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
		}
	}

	pub(crate) fn insert(&mut self, bbox: &Aabb, index: usize) {
		let min_cell = self.point_to_cell_floor(bbox.min());
		let max_cell = self.point_to_cell_ceil(bbox.max());

		for i in min_cell.x..=max_cell.x {
			for j in min_cell.y..=max_cell.y {
				self.cells.entry(I64Vec2::new(i, j)).or_default().push(index);
			}
		}
	}

	/// Collects the sorted, deduplicated indices of all entries sharing a cell with `bbox`.
	pub(crate) fn query(&self, bbox: &Aabb, result: &mut SmallVec<[usize; 8]>) {
		let min_cell = self.point_to_cell_floor(bbox.min());
		let max_cell = self.point_to_cell_ceil(bbox.max());

		for i in min_cell.x..=max_cell.x {
			for j in min_cell.y..=max_cell.y {
				if let Some(indices) = self.cells.get(&I64Vec2::new(i, j)) {
					result.extend_from_slice(indices);
				}
			}
		}
		result.sort_unstable();
		result.dedup();
	}

	fn point_to_cell_ceil(&self, point: DVec2) -> I64Vec2 {
		(point * self.cell_factor).ceil().as_i64vec2()
	}
	fn point_to_cell_floor(&self, point: DVec2) -> I64Vec2 {
		(point * self.cell_factor).floor().as_i64vec2()
	}
}

/// Assigns one index to all points within `radius` of each other, using a [`Grid`] to find earlier points nearby.
pub(crate) struct PointWelder {
	positions: Vec<DVec2>,
	grid: Grid,
	radius: f64,
}

impl PointWelder {
	pub(crate) fn new(cell_size: f64, radius: f64, capacity: usize) -> Self {
		PointWelder {
			positions: Vec::with_capacity(capacity),
			grid: Grid::new(cell_size, capacity),
			radius,
		}
	}

	/// Index of the closest known point within the weld radius, or of `point` as a new entry.
	pub(crate) fn weld(&mut self, point: DVec2) -> usize {
		let mut candidates = SmallVec::new();
		self.grid.query(&Aabb::new(point, point).expanded(self.radius), &mut candidates);
		let closest = candidates
			.into_iter()
			.map(|index| (index, self.positions[index].distance(point)))
			.filter(|&(_, distance)| distance <= self.radius)
			.min_by(|a, b| a.1.total_cmp(&b.1));
		if let Some((index, _)) = closest {
			return index;
		}

		let index = self.positions.len();
		self.positions.push(point);
		self.grid.insert(&Aabb::new(point, point), index);
		index
	}

	pub(crate) fn positions(&self) -> &[DVec2] {
		&self.positions
	}
}
