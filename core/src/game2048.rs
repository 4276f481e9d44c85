use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

pub const GRID_SIZE: usize = 4;

pub const WIN_TILE: u32 = 2048;

/// Largest tile a board may hold; merging two of them still fits in a `u32`.
pub const MAX_TILE: u32 = 1 << 30;

/// Chance that a spawned tile is a 2 rather than a 4.
const TWO_PROBABILITY: f64 = 0.9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Cells of lane `lane`, ordered from the edge tiles move towards.
    fn lane(self, lane: usize) -> [[usize; 2]; GRID_SIZE] {
        core::array::from_fn(|i| {
            let far = GRID_SIZE - 1 - i;
            match self {
                Self::Left => [lane, i],
                Self::Right => [lane, far],
                Self::Up => [i, lane],
                Self::Down => [far, lane],
            }
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShiftOutcome {
    NoChange,
    Moved,
    Won,
    Lost,
}

impl ShiftOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Compress+merge of one lane towards index 0. Each tile merges at most once.
///
/// Returns the new lane, zero padded to the input length, and the points gained. Tiles must
/// not exceed [`MAX_TILE`].
pub fn merge_line(line: &[u32]) -> (Vec<u32>, u32) {
    let mut merged = Vec::with_capacity(line.len());
    let mut gained: u32 = 0;
    let mut tiles = line.iter().copied().filter(|&v| v != 0).peekable();

    while let Some(value) = tiles.next() {
        if tiles.peek() == Some(&value) {
            tiles.next();
            merged.push(value * 2);
            gained = gained.saturating_add(value * 2);
        } else {
            merged.push(value);
        }
    }
    merged.resize(line.len(), 0);
    (merged, gained)
}

#[derive(Clone, Debug)]
pub struct Game2048Engine {
    board: Array2<u32>,
    score: u32,
    best_score: u32,
    status: GameStatus,
    rng: GameRng,
}

impl Game2048Engine {
    pub fn new() -> Self {
        Self::with_rng(GameRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(GameRng::new(seed))
    }

    pub fn with_rng(rng: GameRng) -> Self {
        Self {
            board: Array2::zeros((GRID_SIZE, GRID_SIZE)),
            score: 0,
            best_score: 0,
            status: GameStatus::Waiting,
            rng,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_rng(GameRng::from_seed_opt(settings.seed))
    }

    /// Resumes play on a given board. Every tile must be zero or a power of two from 2 up to
    /// [`MAX_TILE`].
    pub fn from_board(rows: [[u32; GRID_SIZE]; GRID_SIZE], rng: GameRng) -> Result<Self> {
        if rows
            .iter()
            .flatten()
            .any(|&v| v != 0 && (v == 1 || v > MAX_TILE || !v.is_power_of_two()))
        {
            return Err(GameError::InvalidBoard);
        }

        let mut engine = Self::with_rng(rng);
        engine.board = Array2::from_shape_fn((GRID_SIZE, GRID_SIZE), |(row, col)| rows[row][col]);
        engine.status = GameStatus::Playing;
        Ok(engine)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn board(&self) -> &Array2<u32> {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn max_tile(&self) -> u32 {
        self.board.iter().copied().max().unwrap_or(0)
    }

    pub fn init(&mut self) {
        self.board.fill(0);
        self.spawn_tile();
        self.spawn_tile();
        self.score = 0;
        self.status = GameStatus::Playing;
        log::debug!("2048 started");
    }

    /// Best score survives a reset.
    pub fn reset(&mut self) {
        self.board.fill(0);
        self.score = 0;
        self.status = GameStatus::Waiting;
    }

    pub fn shift(&mut self, direction: Direction) -> Result<ShiftOutcome> {
        match self.status {
            GameStatus::Waiting => return Err(GameError::NotStarted),
            GameStatus::Playing => {}
            _ => return Ok(ShiftOutcome::NoChange),
        }

        let mut moved = false;
        for lane in 0..GRID_SIZE {
            let cells = direction.lane(lane);
            let line: Vec<u32> = cells.iter().map(|&idx| self.board[idx]).collect();
            let (merged, gained) = merge_line(&line);
            if merged != line {
                moved = true;
                for (&idx, value) in cells.iter().zip(merged) {
                    self.board[idx] = value;
                }
            }
            self.score = self.score.saturating_add(gained);
        }

        if !moved {
            return Ok(ShiftOutcome::NoChange);
        }

        self.spawn_tile();
        Ok(self.check_terminal())
    }

    /// Whether any direction would change the board.
    pub fn can_move(&self) -> bool {
        self.board.iter().any(|&v| v == 0) || self.has_adjacent_pair()
    }

    fn has_adjacent_pair(&self) -> bool {
        self.board.indexed_iter().any(|((row, col), &value)| {
            (row + 1 < GRID_SIZE && self.board[[row + 1, col]] == value)
                || (col + 1 < GRID_SIZE && self.board[[row, col + 1]] == value)
        })
    }

    fn check_terminal(&mut self) -> ShiftOutcome {
        let outcome = if self.board.iter().any(|&v| v >= WIN_TILE) {
            self.status = GameStatus::Won;
            ShiftOutcome::Won
        } else if !self.can_move() {
            self.status = GameStatus::Lost;
            ShiftOutcome::Lost
        } else {
            return ShiftOutcome::Moved;
        };

        self.best_score = self.best_score.max(self.score);
        log::debug!("2048 ended: {:?} with score {}", self.status, self.score);
        outcome
    }

    fn spawn_tile(&mut self) {
        let empty: Vec<[usize; 2]> = self
            .board
            .indexed_iter()
            .filter(|&(_, &v)| v == 0)
            .map(|((row, col), _)| [row, col])
            .collect();
        let Some(&idx) = self.rng.choose(&empty) else {
            return;
        };
        let value = if self.rng.chance(TWO_PROBABILITY) { 2 } else { 4 };
        self.board[idx] = value;
        log::trace!("Spawned {} at {:?}", value, idx);
    }
}

impl Default for Game2048Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession for Game2048Engine {
    fn status(&self) -> GameStatus {
        self.status
    }

    fn reset(&mut self) {
        Game2048Engine::reset(self)
    }
}
