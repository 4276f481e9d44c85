use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Game has not been started yet")]
    NotStarted,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Invalid board size")]
    InvalidSize,
    #[error("Board contents are not a valid position")]
    InvalidBoard,
    #[error("No card with that id")]
    InvalidCard,
    #[error("No player with that id")]
    InvalidPlayer,
    #[error("Player count out of range")]
    InvalidPlayerCount,
    #[error("Word catalog is empty")]
    EmptyWordCatalog,
    #[error("Could not place every mine outside the safe zone")]
    PlacementExhausted,
}

pub type Result<T> = core::result::Result<T, GameError>;
