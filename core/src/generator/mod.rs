use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Strategy deciding where mines go once the first cell is revealed.
pub trait MineGenerator {
    /// Places `mines` mines on a fresh `board`. `trigger` is the first revealed cell.
    fn place_mines(&mut self, board: &mut Board, mines: CellCount, trigger: Coord) -> Result<()>;
}

impl<G: MineGenerator + ?Sized> MineGenerator for &mut G {
    fn place_mines(&mut self, board: &mut Board, mines: CellCount, trigger: Coord) -> Result<()> {
        (**self).place_mines(board, mines, trigger)
    }
}
