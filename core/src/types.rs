use core::fmt;

use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board width, height, and positions.
pub type Axis = u16;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Column/row position of a cell, `i` along the width and `j` along the height.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub i: Axis,
    pub j: Axis,
}

impl Coord {
    pub const fn new(i: Axis, j: Axis) -> Self {
        Self { i, j }
    }

    /// `[row, column]` index into the `(height, width)` grid.
    pub(crate) fn to_nd_index(self) -> [usize; 2] {
        [self.j.into(), self.i.into()]
    }
}

impl From<(Axis, Axis)> for Coord {
    fn from((i, j): (Axis, Axis)) -> Self {
        Self { i, j }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

pub const fn mult(a: Axis, b: Axis) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Offsets in west, east, north, south, north-west, north-east, south-west, south-east order.
const DISPLACEMENTS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord, delta: (i32, i32), bounds: (Axis, Axis)) -> Option<Coord> {
    let (dx, dy) = delta;
    let (max_i, max_j) = bounds;

    let next_i = coords.i.checked_add_signed(dx.try_into().ok()?)?;
    if next_i >= max_i {
        return None;
    }

    let next_j = coords.j.checked_add_signed(dy.try_into().ok()?)?;
    if next_j >= max_j {
        return None;
    }

    Some(Coord::new(next_i, next_j))
}

/// In-bounds neighbors of a coordinate, between 3 (corner) and 8 (interior) of them.
#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: Coord,
    bounds: (Axis, Axis),
    index: u8,
}

impl NeighborIter {
    /// `bounds` is `(width, height)`: the exclusive limits for `i` and `j`.
    pub(crate) fn new(center: Coord, bounds: (Axis, Axis)) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}
