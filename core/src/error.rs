use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates are outside the board")]
    OutOfBounds,
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(ConfigIssue),
    #[error("Board cells do not match its dimensions")]
    InvalidBoardShape,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

/// Reason a [`GameConfig`](crate::GameConfig) was rejected.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("board must be at least 1x1")]
    EmptyBoard,
    #[error("{mines} mines do not fit on {cells} cells with a safe first reveal")]
    TooManyMines { mines: u32, cells: u32 },
    #[error("layout holds {actual} mines but {expected} were requested")]
    LayoutMismatch { expected: u32, actual: u32 },
}

pub type Result<T> = core::result::Result<T, GameError>;
