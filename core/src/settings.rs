use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::*;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid settings: {0}")]
    Invalid(#[from] GameError),
}

/// Player-facing options for every engine. Missing keys fall back to their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub minesweeper: Difficulty,
    pub puzzle_size: Coord,
    pub memory: MemoryDifficulty,
    pub undercover_players: usize,
    /// Fixes every engine's randomness when set.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            minesweeper: Difficulty::default(),
            puzzle_size: DEFAULT_PUZZLE_SIZE,
            memory: MemoryDifficulty::default(),
            undercover_players: MIN_PLAYERS,
            seed: None,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> core::result::Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> core::result::Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.puzzle_size < 2 {
            return Err(GameError::InvalidSize);
        }
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.undercover_players) {
            return Err(GameError::InvalidPlayerCount);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let settings = Settings::from_json("{}").unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.minesweeper, Difficulty::Easy);
        assert_eq!(settings.puzzle_size, 3);
        assert_eq!(settings.undercover_players, 3);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn partial_settings() {
        let settings =
            Settings::from_json(r#"{"minesweeper": "hard", "memory": "medium", "seed": 7}"#)
                .unwrap();

        assert_eq!(settings.minesweeper, Difficulty::Hard);
        assert_eq!(settings.memory, MemoryDifficulty::Medium);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.puzzle_size, 3);
    }

    #[test]
    fn json_round_trip() {
        let settings = Settings {
            puzzle_size: 4,
            undercover_players: 8,
            seed: Some(99),
            ..Settings::default()
        };

        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(SettingsError::Parse(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"minesweeper": "nightmare"}"#),
            Err(SettingsError::Parse(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"puzzle_size": 1}"#),
            Err(SettingsError::Invalid(GameError::InvalidSize))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"undercover_players": 12}"#),
            Err(SettingsError::Invalid(GameError::InvalidPlayerCount))
        ));
    }

    #[test]
    fn engines_follow_settings() {
        let settings = Settings {
            minesweeper: Difficulty::Medium,
            puzzle_size: 4,
            memory: MemoryDifficulty::Hard,
            seed: Some(5),
            ..Settings::default()
        };

        let minesweeper = MinesweeperEngine::from_settings(&settings);
        assert_eq!(minesweeper.difficulty(), Some(Difficulty::Medium));

        let puzzle = PuzzleEngine::from_settings(&settings).unwrap();
        assert_eq!(puzzle.size(), 4);

        let memory = MemoryEngine::from_settings(&settings);
        assert_eq!(memory.difficulty(), MemoryDifficulty::Hard);
    }
}
