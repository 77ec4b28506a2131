use core::ops::{Index, IndexMut};

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Grid of cells stored row by row, so the flat index of `(i, j)` is `j * width + i`.
///
/// Serializes as `{ width, height, cells }` with `cells` a flat list in index
/// order. The counters are derived from the cells when deserializing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "BoardRepr", try_from = "BoardRepr")]
pub struct Board {
    width: Axis,
    height: Axis,
    cells: Array2<Cell>,
    mine_count: CellCount,
    revealed_safe: CellCount,
    flag_count: CellCount,
}

#[derive(Serialize, Deserialize)]
struct BoardRepr {
    width: Axis,
    height: Axis,
    cells: Vec<Cell>,
}

impl From<Board> for BoardRepr {
    fn from(board: Board) -> Self {
        let cells = board.cells.iter().copied().collect();
        Self {
            width: board.width,
            height: board.height,
            cells,
        }
    }
}

impl TryFrom<BoardRepr> for Board {
    type Error = GameError;

    fn try_from(repr: BoardRepr) -> Result<Self> {
        let shape = (usize::from(repr.height), usize::from(repr.width));
        let cells =
            Array2::from_shape_vec(shape, repr.cells).map_err(|_| GameError::InvalidBoardShape)?;
        let mut board = Self {
            width: repr.width,
            height: repr.height,
            cells,
            mine_count: 0,
            revealed_safe: 0,
            flag_count: 0,
        };
        for ((j, i), cell) in board.cells.indexed_iter() {
            if usize::from(cell.position().i) != i || usize::from(cell.position().j) != j {
                return Err(GameError::InvalidBoardShape);
            }
        }
        board.mine_count = board.count_cells(Cell::is_mine);
        board.revealed_safe = board.count_cells(|cell| cell.is_revealed() && !cell.is_mine());
        board.flag_count = board.count_cells(Cell::is_flagged);
        Ok(board)
    }
}

impl Board {
    pub fn new(width: Axis, height: Axis) -> Self {
        let cells = Array2::from_shape_fn((usize::from(height), usize::from(width)), |(j, i)| {
            // both bounded by the Axis-sized shape
            Cell::new(Coord::new(i as Axis, j as Axis))
        });
        Self {
            width,
            height,
            cells,
            mine_count: 0,
            revealed_safe: 0,
            flag_count: 0,
        }
    }

    pub fn width(&self) -> Axis {
        self.width
    }

    pub fn height(&self) -> Axis {
        self.height
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    pub fn validate_coords(&self, coords: Coord) -> Result<Coord> {
        if coords.i < self.width && coords.j < self.height {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    /// Flat index of `coords`.
    pub fn at(&self, coords: Coord) -> Result<usize> {
        let coords = self.validate_coords(coords)?;
        Ok(usize::from(coords.j) * usize::from(self.width) + usize::from(coords.i))
    }

    /// Coordinates of the flat `index`, the inverse of [`Board::at`].
    pub fn resolve_position(&self, index: usize) -> Result<Coord> {
        let width = usize::from(self.width);
        if index >= self.cells.len() {
            return Err(GameError::OutOfBounds);
        }
        // index < width * height keeps both parts within Axis
        Ok(Coord::new((index % width) as Axis, (index / width) as Axis))
    }

    pub fn cell(&self, coords: Coord) -> Result<&Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(&self[coords])
    }

    /// All cells in flat index order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn iter_neighbors(&self, coords: Coord) -> NeighborIter {
        NeighborIter::new(coords, (self.width, self.height))
    }

    pub fn neighbor_cells(&self, coords: Coord) -> Result<SmallVec<[&Cell; 8]>> {
        let coords = self.validate_coords(coords)?;
        Ok(self.iter_neighbors(coords).map(|pos| &self[pos]).collect())
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn revealed_safe_count(&self) -> CellCount {
        self.revealed_safe
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    pub fn adjacent_mine_count(&self, coords: Coord) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_mine())
            .count()
            .try_into()
            .unwrap_or(u8::MAX)
    }

    /// Stores the neighboring mine count on every cell without a mine.
    pub fn update_numbers(&mut self) {
        let (width, height) = (self.width, self.height);
        for j in 0..height {
            for i in 0..width {
                let coords = Coord::new(i, j);
                if self[coords].is_mine() {
                    continue;
                }
                let count = self.adjacent_mine_count(coords);
                self[coords].set_adjacent_mines(count);
            }
        }
    }

    /// Every non-mine cell has been revealed.
    pub fn all_safe_revealed(&self) -> bool {
        self.revealed_safe == self.total_cells() - self.mine_count
    }

    /// Places a mine, returning `false` when the cell already holds one.
    pub(crate) fn place_mine(&mut self, coords: Coord) -> bool {
        let cell = &mut self[coords];
        if cell.is_mine() {
            false
        } else {
            cell.set_mine();
            self.mine_count += 1;
            true
        }
    }

    /// Marks a cell revealed, returning `false` when it already was.
    pub(crate) fn reveal(&mut self, coords: Coord) -> bool {
        let cell = &mut self[coords];
        if cell.is_revealed() {
            return false;
        }
        cell.set_revealed();
        if !cell.is_mine() {
            self.revealed_safe += 1;
        }
        true
    }

    /// Sets the flag of an unrevealed cell, returning whether anything changed.
    pub(crate) fn set_flag(&mut self, coords: Coord, flagged: bool) -> bool {
        let cell = &mut self[coords];
        if cell.is_revealed() || cell.is_flagged() == flagged {
            return false;
        }
        cell.set_flagged(flagged);
        if flagged {
            self.flag_count += 1;
        } else {
            self.flag_count -= 1;
        }
        true
    }

    /// Reveals every mine, returning how many were newly revealed.
    pub fn show_all_mines(&mut self) -> CellCount {
        let mut shown = 0;
        for cell in self.cells.iter_mut().filter(|cell| cell.is_mine()) {
            if !cell.is_revealed() {
                cell.set_revealed();
                shown += 1;
            }
        }
        shown
    }

    fn count_cells(&self, predicate: impl Fn(&Cell) -> bool) -> CellCount {
        // cell count never exceeds mult(width, height)
        self.cells.iter().filter(|cell| predicate(cell)).count() as CellCount
    }
}

impl Index<Coord> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord> for Board {
    fn index_mut(&mut self, coords: Coord) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with_mines(width: Axis, height: Axis, mines: &[(Axis, Axis)]) -> Board {
        let mut board = Board::new(width, height);
        for &pos in mines {
            assert!(board.place_mine(pos.into()));
        }
        board.update_numbers();
        board
    }

    #[test]
    fn new_board_is_fresh_and_row_major() {
        let board = Board::new(3, 2);

        assert_eq!(board.total_cells(), 6);
        assert_eq!(board.cells().count(), 6);
        for (index, cell) in board.cells().enumerate() {
            assert_eq!(board.at(cell.position()).unwrap(), index);
            assert!(!cell.is_revealed());
            assert!(!cell.is_mine());
            assert!(!cell.is_flagged());
            assert_eq!(cell.adjacent_mines(), 0);
        }
    }

    #[test]
    fn at_and_resolve_position_are_inverse() {
        // non-square so a width/height mixup would show
        let board = Board::new(4, 3);

        for j in 0..3 {
            for i in 0..4 {
                let coords = Coord::new(i, j);
                let index = board.at(coords).unwrap();
                assert_eq!(board.resolve_position(index).unwrap(), coords);
            }
        }
        for index in 0..12 {
            assert_eq!(board.at(board.resolve_position(index).unwrap()).unwrap(), index);
        }
        assert_eq!(board.at(Coord::new(3, 1)).unwrap(), 7);
    }

    #[test]
    fn out_of_range_lookups_fail() {
        let board = Board::new(4, 3);

        assert_eq!(board.at(Coord::new(4, 0)), Err(GameError::OutOfBounds));
        assert_eq!(board.at(Coord::new(0, 3)), Err(GameError::OutOfBounds));
        assert_eq!(board.resolve_position(12), Err(GameError::OutOfBounds));
        assert_eq!(board.cell(Coord::new(9, 9)).err(), Some(GameError::OutOfBounds));
        assert_eq!(
            board.neighbor_cells(Coord::new(9, 9)).err(),
            Some(GameError::OutOfBounds)
        );
    }

    #[test]
    fn update_numbers_counts_neighbor_mines() {
        let board = board_with_mines(4, 3, &[(0, 0), (2, 1)]);

        assert_eq!(board[Coord::new(1, 0)].adjacent_mines(), 2);
        assert_eq!(board[Coord::new(1, 1)].adjacent_mines(), 2);
        assert_eq!(board[Coord::new(3, 2)].adjacent_mines(), 1);
        assert_eq!(board[Coord::new(0, 2)].adjacent_mines(), 0);
        assert_eq!(board.mine_count(), 2);
    }

    #[test]
    fn update_numbers_is_idempotent() {
        let mut board = board_with_mines(3, 3, &[(1, 1)]);
        let before = board.clone();

        board.update_numbers();

        assert_eq!(board, before);
        assert!(board.cells().filter(|c| !c.is_mine()).all(|c| c.adjacent_mines() == 1));
    }

    #[test]
    fn place_mine_rejects_duplicates() {
        let mut board = Board::new(2, 2);

        assert!(board.place_mine(Coord::new(1, 1)));
        assert!(!board.place_mine(Coord::new(1, 1)));
        assert_eq!(board.mine_count(), 1);
    }

    #[test]
    fn neighbor_cells_reports_border_sizes() {
        let board = Board::new(3, 3);

        assert_eq!(board.neighbor_cells(Coord::new(0, 0)).unwrap().len(), 3);
        assert_eq!(board.neighbor_cells(Coord::new(1, 0)).unwrap().len(), 5);
        assert_eq!(board.neighbor_cells(Coord::new(1, 1)).unwrap().len(), 8);
    }

    #[test]
    fn flag_and_reveal_bookkeeping() {
        let mut board = board_with_mines(2, 2, &[(0, 0)]);

        assert!(board.set_flag(Coord::new(0, 0), true));
        assert!(!board.set_flag(Coord::new(0, 0), true));
        assert_eq!(board.flag_count(), 1);

        assert!(board.reveal(Coord::new(1, 1)));
        assert!(!board.reveal(Coord::new(1, 1)));
        assert!(!board.set_flag(Coord::new(1, 1), true));
        assert_eq!(board.revealed_safe_count(), 1);
        assert!(!board.all_safe_revealed());

        board.reveal(Coord::new(1, 0));
        board.reveal(Coord::new(0, 1));
        assert!(board.all_safe_revealed());
    }

    #[test]
    fn show_all_mines_reveals_only_mines() {
        let mut board = board_with_mines(3, 1, &[(0, 0), (2, 0)]);
        board.set_flag(Coord::new(2, 0), true);

        assert_eq!(board.show_all_mines(), 2);
        assert_eq!(board.show_all_mines(), 0);
        assert!(board[Coord::new(0, 0)].is_revealed());
        assert!(board[Coord::new(2, 0)].is_revealed());
        assert!(!board[Coord::new(1, 0)].is_revealed());
        assert_eq!(board.revealed_safe_count(), 0);
    }

    #[test]
    fn serializes_cells_flat_in_index_order() {
        let mut board = board_with_mines(3, 2, &[(2, 0)]);
        board.reveal(Coord::new(0, 1));
        board.set_flag(Coord::new(2, 0), true);

        let json = serde_json::to_value(&board).unwrap();
        let cells = json["cells"].as_array().unwrap();

        assert_eq!(json["width"], 3);
        assert_eq!(json["height"], 2);
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[2]["mine"], true);
        assert_eq!(cells[3]["position"]["j"], 1);
        assert!(json.get("revealedSafe").is_none());
        assert!(json.get("flagCount").is_none());
        assert!(json.get("v").is_none());

        let restored: Board = serde_json::from_value(json).unwrap();
        assert_eq!(restored, board);
        assert_eq!(restored.mine_count(), 1);
        assert_eq!(restored.revealed_safe_count(), 1);
        assert_eq!(restored.flag_count(), 1);
    }

    #[test]
    fn deserializing_rejects_mismatched_cells() {
        let mut json = serde_json::to_value(Board::new(2, 2)).unwrap();
        json["width"] = 3.into();
        assert!(serde_json::from_value::<Board>(json).is_err());

        let mut json = serde_json::to_value(Board::new(2, 2)).unwrap();
        let cells = json["cells"].as_array_mut().unwrap();
        cells.swap(0, 1);
        assert!(serde_json::from_value::<Board>(json).is_err());
    }

    #[test]
    fn mine_count_tracks_placement() {
        let mut board = Board::new(3, 3);
        assert_eq!(board.mine_count(), 0);

        board.place_mine(Coord::new(0, 0));
        board.place_mine(Coord::new(2, 2));
        board.place_mine(Coord::new(2, 2));

        assert_eq!(board.mine_count(), 2);
        assert_eq!(board.count_cells(Cell::is_mine), 2);
    }
}
