use super::*;

/// Places a predetermined layout, used to replay known boards.
///
/// The layout is taken as-is, so it may put a mine under the trigger cell.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedMineGenerator {
    mines: Vec<Coord>,
}

impl FixedMineGenerator {
    pub fn new(mines: impl IntoIterator<Item = Coord>) -> Self {
        Self {
            mines: mines.into_iter().collect(),
        }
    }

    pub fn from_pairs(pairs: &[(Axis, Axis)]) -> Self {
        Self::new(pairs.iter().copied().map(Coord::from))
    }

    pub fn mines(&self) -> &[Coord] {
        &self.mines
    }
}

impl MineGenerator for FixedMineGenerator {
    fn place_mines(&mut self, board: &mut Board, mines: CellCount, trigger: Coord) -> Result<()> {
        board.validate_coords(trigger)?;
        for &coords in &self.mines {
            board.validate_coords(coords)?;
        }

        let mut placed: CellCount = 0;
        for &coords in &self.mines {
            if board.place_mine(coords) {
                placed += 1;
            }
        }
        if placed != mines {
            return Err(GameError::InvalidConfiguration(ConfigIssue::LayoutMismatch {
                expected: mines,
                actual: placed,
            }));
        }
        Ok(())
    }
}
