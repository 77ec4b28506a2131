use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod board;
mod cell;
mod engine;
mod error;
mod generator;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: Axis,
    pub height: Axis,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(width: Axis, height: Axis, mines: CellCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    pub fn new(width: Axis, height: Axis, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(width, height, mines);
        config.validate()?;
        Ok(config)
    }

    /// Checks the board is non-empty and leaves room for a mine-free first reveal.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GameError::InvalidConfiguration(ConfigIssue::EmptyBoard));
        }
        let cells = self.total_cells();
        if self.mines >= cells {
            return Err(GameError::InvalidConfiguration(ConfigIssue::TooManyMines {
                mines: self.mines,
                cells,
            }));
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MarkOutcome {
    #[default]
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RevealOutcome {
    #[default]
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Merges outcomes of a batch of reveals, the most severe one wins.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// What a chord did: the reveal half and the flag half run independently.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ChordOutcome {
    pub revealed: RevealOutcome,
    pub flagged: MarkOutcome,
}

impl ChordOutcome {
    pub const fn has_update(self) -> bool {
        self.revealed.has_update() || self.flagged.has_update()
    }
}
