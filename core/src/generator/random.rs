use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Uniform placement by rejection sampling that never puts a mine on the trigger cell.
#[derive(Clone, Debug)]
pub struct RandomMineGenerator {
    rng: SmallRng,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }
}

impl Default for RandomMineGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl MineGenerator for RandomMineGenerator {
    fn place_mines(&mut self, board: &mut Board, mines: CellCount, trigger: Coord) -> Result<()> {
        let trigger = board.validate_coords(trigger)?;
        let free_cells = board
            .total_cells()
            .saturating_sub(board.mine_count())
            .saturating_sub(1);
        if mines > free_cells {
            return Err(GameError::InvalidConfiguration(ConfigIssue::TooManyMines {
                mines,
                cells: board.total_cells(),
            }));
        }

        let (width, height) = (board.width(), board.height());
        let mut attempts: u64 = 0;
        for _ in 0..mines {
            loop {
                attempts += 1;
                let coords = Coord::new(
                    self.rng.random_range(0..width),
                    self.rng.random_range(0..height),
                );
                if coords != trigger && board.place_mine(coords) {
                    break;
                }
            }
        }
        log::debug!(
            "Placed {} mines around trigger {} in {} attempts",
            mines,
            trigger,
            attempts
        );
        Ok(())
    }
}
