use serde::{Deserialize, Serialize};

use crate::Coord;

/// One square of the board.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    position: Coord,
    revealed: bool,
    mine: bool,
    flagged: bool,
    adjacent_mines: u8,
}

impl Cell {
    pub const fn new(position: Coord) -> Self {
        Self {
            position,
            revealed: false,
            mine: false,
            flagged: false,
            adjacent_mines: 0,
        }
    }

    pub const fn position(&self) -> Coord {
        self.position
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_mine(&self) -> bool {
        self.mine
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// Neighboring mine count, only meaningful for cells without a mine.
    pub const fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    /// Neither revealed nor flagged.
    pub const fn is_hidden(&self) -> bool {
        !self.revealed && !self.flagged
    }

    pub(crate) fn set_revealed(&mut self) {
        self.revealed = true;
    }

    pub(crate) fn set_mine(&mut self) {
        self.mine = true;
    }

    pub(crate) fn set_flagged(&mut self, flagged: bool) {
        self.flagged = flagged;
    }

    pub(crate) fn set_adjacent_mines(&mut self, count: u8) {
        self.adjacent_mines = count;
    }
}
