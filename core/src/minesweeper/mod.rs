use hashbrown::HashSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::*;
pub use generator::*;

mod generator;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn config(self) -> BoardConfig {
        match self {
            Self::Easy => BoardConfig::new_unchecked(9, 9, 10),
            Self::Medium => BoardConfig::new_unchecked(16, 16, 40),
            Self::Hard => BoardConfig::new_unchecked(30, 16, 99),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    rows: Coord,
    cols: Coord,
    mines: CellCount,
}

impl BoardConfig {
    const fn new_unchecked(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    /// A board needs at least one cell and at least one cell without a mine.
    pub fn new(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidSize);
        }
        if mines >= mult(rows, cols) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(rows, cols, mines))
    }

    pub const fn rows(&self) -> Coord {
        self.rows
    }

    pub const fn cols(&self) -> Coord {
        self.cols
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
    pub neighbor_mines: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
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

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
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

/// Minesweeper board with mines laid out on the first reveal.
#[derive(Debug)]
pub struct MinesweeperEngine {
    config: BoardConfig,
    difficulty: Option<Difficulty>,
    board: Array2<Cell>,
    status: GameStatus,
    revealed_count: CellCount,
    flagged_count: CellCount,
    triggered_mine: Option<Coord2>,
    generator: Box<dyn MinefieldGenerator>,
}

impl MinesweeperEngine {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_rng(difficulty, GameRng::from_entropy())
    }

    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_rng(difficulty, GameRng::new(seed))
    }

    pub fn with_rng(difficulty: Difficulty, rng: GameRng) -> Self {
        let mut engine =
            Self::with_generator(difficulty.config(), RandomMinefieldGenerator::new(rng));
        engine.difficulty = Some(difficulty);
        engine
    }

    pub fn with_generator(
        config: BoardConfig,
        generator: impl MinefieldGenerator + 'static,
    ) -> Self {
        Self {
            config,
            difficulty: None,
            board: Array2::default(config.size().to_nd_index()),
            status: GameStatus::Waiting,
            revealed_count: 0,
            flagged_count: 0,
            triggered_mine: None,
            generator: Box::new(generator),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_rng(settings.minesweeper, GameRng::from_seed_opt(settings.seed))
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_finished()
    }

    /// `None` when a custom board is in use.
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn board(&self) -> &Array2<Cell> {
        &self.board
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.board.get(coords.to_nd_index()).copied()
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    /// How many mines have not been flagged yet, negative when over-flagged
    pub fn remaining_mines(&self) -> isize {
        (self.config.mines() as isize) - (self.flagged_count as isize)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.config = difficulty.config();
        self.difficulty = Some(difficulty);
        self.reset();
    }

    pub fn set_config(&mut self, config: BoardConfig) {
        self.config = config;
        self.difficulty = None;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.board = Array2::default(self.config.size().to_nd_index());
        self.status = GameStatus::Waiting;
        self.revealed_count = 0;
        self.flagged_count = 0;
        self.triggered_mine = None;
    }

    /// Lays out the mines around a first click at `coords` and starts play. Does nothing once
    /// the mines are in place.
    pub fn start(&mut self, coords: Coord2) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        if !self.status.is_waiting() {
            return Ok(());
        }

        let mines = self.generator.generate(self.config, coords)?;
        self.check_layout(&mines, coords)?;

        self.board = Array2::from_shape_fn(mines.dim(), |(row, col)| {
            let pos = (row as Coord, col as Coord);
            Cell {
                is_mine: mines[[row, col]],
                neighbor_mines: mines
                    .iter_neighbors(pos)
                    .filter(|&n| mines[n.to_nd_index()])
                    .count() as u8,
                ..Cell::default()
            }
        });
        self.status = GameStatus::Playing;
        log::debug!(
            "Minesweeper started at {:?} on {}x{} with {} mines",
            coords,
            self.config.rows(),
            self.config.cols(),
            self.config.mines()
        );
        Ok(())
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;

        if self.status.is_finished() {
            return Ok(RevealOutcome::NoChange);
        }
        self.start(coords)?;

        let cell = self.board[coords.to_nd_index()];
        if cell.is_revealed || cell.is_flagged {
            return Ok(RevealOutcome::NoChange);
        }

        if cell.is_mine {
            self.triggered_mine = Some(coords);
            self.end_game(false);
            return Ok(RevealOutcome::HitMine);
        }

        self.flood_reveal(coords);

        if self.revealed_count == self.config.safe_cells() {
            self.end_game(true);
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;

        if !self.status.is_playing() {
            return Ok(MarkOutcome::NoChange);
        }

        let cell = &mut self.board[coords.to_nd_index()];
        if cell.is_revealed {
            return Ok(MarkOutcome::NoChange);
        }

        cell.is_flagged = !cell.is_flagged;
        if cell.is_flagged {
            self.flagged_count += 1;
        } else {
            self.flagged_count -= 1;
        }
        Ok(MarkOutcome::Changed)
    }

    /// Opens `start` and, through zero cells, everything reachable from it.
    fn flood_reveal(&mut self, start: Coord2) {
        let mut visited = HashSet::new();
        let mut to_visit = VecDeque::from([start]);

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            let cell = &mut self.board[visit_coords.to_nd_index()];
            if cell.is_revealed || cell.is_flagged || cell.is_mine {
                continue;
            }

            cell.is_revealed = true;
            self.revealed_count += 1;
            log::trace!(
                "Opened cell at {:?}, neighbor mines: {}",
                visit_coords,
                cell.neighbor_mines
            );

            if cell.neighbor_mines == 0 {
                to_visit.extend(
                    self.board
                        .iter_neighbors(visit_coords)
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.status.is_finished() {
            return;
        }

        for cell in self.board.iter_mut().filter(|cell| cell.is_mine) {
            if won {
                cell.is_flagged = true;
            } else {
                cell.is_revealed = true;
            }
        }

        if won {
            self.status = GameStatus::Won;
            self.flagged_count = self.config.mines();
            self.triggered_mine = None;
        } else {
            self.status = GameStatus::Lost;
        }
        log::debug!("Minesweeper ended: {:?}", self.status);
    }

    fn check_layout(&self, mines: &Array2<bool>, safe: Coord2) -> Result<()> {
        if mines.dim() != (usize::from(self.config.rows()), usize::from(self.config.cols())) {
            return Err(GameError::InvalidBoard);
        }
        let mut count: CellCount = 0;
        for ((row, col), &is_mine) in mines.indexed_iter() {
            if !is_mine {
                continue;
            }
            if in_safe_zone((row as Coord, col as Coord), safe) {
                return Err(GameError::InvalidBoard);
            }
            count += 1;
        }
        if count != self.config.mines() {
            return Err(GameError::InvalidBoard);
        }
        Ok(())
    }

    fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.config.rows() && coords.1 < self.config.cols() {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }
}

impl GameSession for MinesweeperEngine {
    fn status(&self) -> GameStatus {
        self.status
    }

    fn reset(&mut self) {
        MinesweeperEngine::reset(self)
    }
}
