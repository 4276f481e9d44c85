use ndarray::Array2;

use crate::*;

/// Produces the mine mask for a board once the first cell has been chosen.
///
/// Implementations must leave `safe` and its eight neighbours free and place exactly
/// `config.mines()` mines; the engine rejects layouts that break either rule.
pub trait MinefieldGenerator: core::fmt::Debug {
    fn generate(&mut self, config: BoardConfig, safe: Coord2) -> Result<Array2<bool>>;
}

/// Whether `coords` lies in the 3x3 block centred on `safe`.
pub fn in_safe_zone(coords: Coord2, safe: Coord2) -> bool {
    coords.0.abs_diff(safe.0) <= 1 && coords.1.abs_diff(safe.1) <= 1
}

fn safe_zone_cells(config: BoardConfig, safe: Coord2) -> CellCount {
    let rows = (safe.0.saturating_sub(1)..=safe.0.saturating_add(1))
        .filter(|&row| row < config.rows())
        .count();
    let cols = (safe.1.saturating_sub(1)..=safe.1.saturating_add(1))
        .filter(|&col| col < config.cols())
        .count();
    (rows * cols) as CellCount
}

/// Rejection sampling with an attempt cap. When the cap runs out the remaining mines go to the
/// first free cells in row-major order, so the requested count is always met.
#[derive(Clone, Debug)]
pub struct RandomMinefieldGenerator {
    rng: GameRng,
    max_attempts: u32,
}

impl RandomMinefieldGenerator {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

    pub fn new(rng: GameRng) -> Self {
        Self {
            rng,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(rng: GameRng, max_attempts: u32) -> Self {
        Self { rng, max_attempts }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(&mut self, config: BoardConfig, safe: Coord2) -> Result<Array2<bool>> {
        let free_cells = config.total_cells() - safe_zone_cells(config, safe);
        if config.mines() > free_cells {
            log::warn!(
                "Cannot keep start cell clear, requested {} mines but only {} cells are free",
                config.mines(),
                free_cells
            );
            return Err(GameError::TooManyMines);
        }

        let (rows, cols) = (config.rows(), config.cols());
        let mut mines: Array2<bool> = Array2::default((rows, cols).to_nd_index());
        let mut mines_placed: CellCount = 0;
        let mut attempts = 0;

        while mines_placed < config.mines() && attempts < self.max_attempts {
            attempts += 1;
            let coords = (
                self.rng.index(0..rows.into()) as Coord,
                self.rng.index(0..cols.into()) as Coord,
            );
            if in_safe_zone(coords, safe) || mines[coords.to_nd_index()] {
                continue;
            }
            mines[coords.to_nd_index()] = true;
            mines_placed += 1;
        }

        if mines_placed < config.mines() {
            log::warn!(
                "Mine placement hit the cap of {} attempts with {}/{} placed, filling the rest in order",
                self.max_attempts,
                mines_placed,
                config.mines()
            );
            for ((row, col), is_mine) in mines.indexed_iter_mut() {
                if mines_placed == config.mines() {
                    break;
                }
                if *is_mine || in_safe_zone((row as Coord, col as Coord), safe) {
                    continue;
                }
                *is_mine = true;
                mines_placed += 1;
            }
        }

        if mines_placed != config.mines() {
            return Err(GameError::PlacementExhausted);
        }
        Ok(mines)
    }
}

/// Places mines at fixed coordinates, for replays and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedMinefieldGenerator {
    mines: Vec<Coord2>,
}

impl FixedMinefieldGenerator {
    pub fn new(mines: impl Into<Vec<Coord2>>) -> Self {
        Self {
            mines: mines.into(),
        }
    }
}

impl MinefieldGenerator for FixedMinefieldGenerator {
    fn generate(&mut self, config: BoardConfig, _safe: Coord2) -> Result<Array2<bool>> {
        let mut mask: Array2<bool> = Array2::default((config.rows(), config.cols()).to_nd_index());

        for &coords in &self.mines {
            if coords.0 >= config.rows() || coords.1 >= config.cols() {
                return Err(GameError::InvalidCoords);
            }
            mask[coords.to_nd_index()] = true;
        }

        Ok(mask)
    }
}
