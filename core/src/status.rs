use serde::{Deserialize, Serialize};

/// Lifecycle shared by every engine. Each game only visits a subset:
///
/// - minesweeper, 2048: Waiting -> Playing -> Won | Lost
/// - gobang, puzzle: Waiting -> Playing -> Won
/// - memory: Waiting -> Preview -> Playing -> Won
/// - undercover, jump: Waiting -> Playing -> Ended
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Nothing set up, or just reset
    #[default]
    Waiting,
    /// Cards shown face-up before play begins
    Preview,
    /// Moves are accepted
    Playing,
    Won,
    Lost,
    /// Game over without a single winning player
    Ended,
}

impl GameStatus {
    pub const fn is_waiting(self) -> bool {
        matches!(self, Self::Waiting)
    }

    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost | Self::Ended)
    }
}
