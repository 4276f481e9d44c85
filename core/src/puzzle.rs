use ndarray::Array2;

use crate::*;

pub const DEFAULT_PUZZLE_SIZE: Coord = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlideOutcome {
    NoChange,
    Moved,
    Solved,
}

impl SlideOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Sliding tile puzzle. Tiles are `1..size²` with `0` as the blank.
#[derive(Clone, Debug)]
pub struct PuzzleEngine {
    size: Coord,
    board: Array2<u16>,
    moves: u32,
    status: GameStatus,
    rng: GameRng,
}

impl PuzzleEngine {
    pub fn new(size: Coord) -> Result<Self> {
        Self::with_rng(size, GameRng::from_entropy())
    }

    pub fn with_seed(size: Coord, seed: u64) -> Result<Self> {
        Self::with_rng(size, GameRng::new(seed))
    }

    pub fn with_rng(size: Coord, rng: GameRng) -> Result<Self> {
        Ok(Self {
            size: validate_size(size)?,
            board: Array2::zeros((0, 0)),
            moves: 0,
            status: GameStatus::Waiting,
            rng,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::with_rng(settings.puzzle_size, GameRng::from_seed_opt(settings.seed))
    }

    /// Starts from a given row-major layout, which must be a permutation of `0..size²`.
    pub fn from_tiles(size: Coord, tiles: &[u16], rng: GameRng) -> Result<Self> {
        let mut engine = Self::with_rng(size, rng)?;
        let side = usize::from(size);

        let mut seen = vec![false; side * side];
        for &tile in tiles {
            match seen.get_mut(usize::from(tile)) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(GameError::InvalidBoard),
            }
        }
        if tiles.len() != side * side {
            return Err(GameError::InvalidBoard);
        }

        engine.board = Array2::from_shape_vec((side, side), tiles.to_vec())
            .map_err(|_| GameError::InvalidBoard)?;
        engine.status = if engine.is_solved() {
            GameStatus::Won
        } else {
            GameStatus::Playing
        };
        Ok(engine)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn size(&self) -> Coord {
        self.size
    }

    /// Empty until the first `init`.
    pub fn board(&self) -> &Array2<u16> {
        &self.board
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn blank(&self) -> Option<Coord2> {
        self.board
            .indexed_iter()
            .find(|&(_, &tile)| tile == 0)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    /// Shuffles a fresh board. Any permutation may come out, including unsolvable ones.
    pub fn init(&mut self) {
        let side = usize::from(self.size);
        let last = (side * side) as u16;
        let mut tiles: Vec<u16> = (1..last).chain([0]).collect();
        self.rng.shuffle(&mut tiles);

        self.board = Array2::from_shape_fn((side, side), |(row, col)| tiles[row * side + col]);
        self.moves = 0;
        self.status = GameStatus::Playing;
        log::debug!("Puzzle {}x{} shuffled: {:?}", side, side, self.board.as_slice());
    }

    pub fn set_size(&mut self, size: Coord) -> Result<()> {
        self.size = validate_size(size)?;
        self.init();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.board = Array2::zeros((0, 0));
        self.moves = 0;
        self.status = GameStatus::Waiting;
    }

    /// Slides the tile at `(row, col)` into the blank when they share an edge.
    pub fn slide(&mut self, row: Coord, col: Coord) -> Result<SlideOutcome> {
        match self.status {
            GameStatus::Waiting => return Err(GameError::NotStarted),
            GameStatus::Playing => {}
            _ => return Ok(SlideOutcome::NoChange),
        }
        if row >= self.size || col >= self.size {
            return Err(GameError::InvalidCoords);
        }

        let tile = (row, col);
        let Some(blank) = self
            .board
            .iter_orthogonal(tile)
            .find(|pos| self.board[pos.to_nd_index()] == 0)
        else {
            return Ok(SlideOutcome::NoChange);
        };

        self.board.swap(tile.to_nd_index(), blank.to_nd_index());
        self.moves += 1;

        if self.is_solved() {
            self.status = GameStatus::Won;
            log::debug!("Puzzle solved in {} moves", self.moves);
            Ok(SlideOutcome::Solved)
        } else {
            Ok(SlideOutcome::Moved)
        }
    }

    /// Whether the board reads `1, 2, …, size² - 1, 0` row by row.
    pub fn is_solved(&self) -> bool {
        let total = self.board.len();
        total > 0
            && self.board.iter().enumerate().all(|(i, &tile)| {
                if i + 1 == total {
                    tile == 0
                } else {
                    usize::from(tile) == i + 1
                }
            })
    }

    /// Inversion-parity test for whether the current layout can reach the solved one.
    pub fn is_solvable(&self) -> bool {
        let tiles: Vec<u16> = self.board.iter().copied().filter(|&t| t != 0).collect();
        let inversions = tiles
            .iter()
            .enumerate()
            .map(|(i, a)| tiles[i + 1..].iter().filter(|&b| b < a).count())
            .sum::<usize>();

        let side = usize::from(self.size);
        if side % 2 == 1 {
            inversions % 2 == 0
        } else {
            let Some((blank_row, _)) = self.blank() else {
                return false;
            };
            let row_from_bottom = side - usize::from(blank_row);
            (inversions + row_from_bottom) % 2 == 1
        }
    }
}

fn validate_size(size: Coord) -> Result<Coord> {
    if size < 2 {
        Err(GameError::InvalidSize)
    } else {
        Ok(size)
    }
}

impl GameSession for PuzzleEngine {
    fn status(&self) -> GameStatus {
        self.status
    }

    fn reset(&mut self) {
        PuzzleEngine::reset(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: Coord, tiles: &[u16]) -> PuzzleEngine {
        PuzzleEngine::from_tiles(size, tiles, GameRng::new(0)).unwrap()
    }

    fn is_permutation(engine: &PuzzleEngine) -> bool {
        let mut tiles: Vec<u16> = engine.board().iter().copied().collect();
        tiles.sort_unstable();
        tiles == (0..tiles.len() as u16).collect::<Vec<_>>()
    }

    #[test]
    fn init_produces_permutation() {
        let mut engine = PuzzleEngine::with_seed(4, 12).unwrap();

        engine.init();

        assert_eq!(engine.status(), GameStatus::Playing);
        assert_eq!(engine.board().dim(), (4, 4));
        assert!(is_permutation(&engine));
        assert_eq!(engine.moves(), 0);
    }

    #[test]
    fn last_slide_solves() {
        let mut engine = board(3, &[1, 2, 3, 4, 5, 6, 7, 0, 8]);

        assert_eq!(engine.slide(2, 2).unwrap(), SlideOutcome::Solved);
        assert_eq!(engine.status(), GameStatus::Won);
        assert_eq!(engine.moves(), 1);
        assert_eq!(engine.blank(), Some((2, 2)));
        assert_eq!(engine.slide(2, 1).unwrap(), SlideOutcome::NoChange);
    }

    #[test]
    fn non_adjacent_slide_leaves_board() {
        let mut engine = board(3, &[1, 2, 3, 4, 0, 5, 7, 8, 6]);
        let before = engine.board().clone();

        assert_eq!(engine.slide(0, 0).unwrap(), SlideOutcome::NoChange);
        assert_eq!(engine.slide(1, 1).unwrap(), SlideOutcome::NoChange);
        assert_eq!(engine.board(), &before);
        assert_eq!(engine.moves(), 0);
    }

    #[test]
    fn legal_slides_keep_permutation() {
        let mut engine = PuzzleEngine::with_seed(3, 99).unwrap();
        engine.init();
        let mut rng = GameRng::new(4);

        for _ in 0..200 {
            if engine.status() != GameStatus::Playing {
                break;
            }
            let (row, col) = engine.blank().unwrap();
            let neighbors: Vec<_> = engine.board().iter_orthogonal((row, col)).collect();
            let &(r, c) = rng.choose(&neighbors).unwrap();
            assert!(engine.slide(r, c).unwrap().has_update());
            assert!(is_permutation(&engine));
        }
    }

    #[test]
    fn solved_layout_detection() {
        assert!(board(2, &[1, 2, 3, 0]).is_solved());
        assert!(!board(2, &[0, 1, 2, 3]).is_solved());
        assert!(!board(2, &[1, 2, 0, 3]).is_solved());
    }

    #[test]
    fn solvability_parity() {
        assert!(board(3, &[1, 2, 3, 4, 5, 6, 0, 7, 8]).is_solvable());
        assert!(!board(3, &[2, 1, 3, 4, 5, 6, 7, 8, 0]).is_solvable());
        assert!(board(4, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 0, 15]).is_solvable());
        assert!(!board(4, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 15, 14, 0]).is_solvable());
    }

    #[test]
    fn invalid_layouts_and_sizes() {
        let rng = GameRng::new(0);
        assert_eq!(
            PuzzleEngine::from_tiles(2, &[1, 1, 2, 0], rng.clone()).err(),
            Some(GameError::InvalidBoard)
        );
        assert_eq!(
            PuzzleEngine::from_tiles(2, &[1, 2, 0], rng.clone()).err(),
            Some(GameError::InvalidBoard)
        );
        assert_eq!(PuzzleEngine::new(1).err(), Some(GameError::InvalidSize));
    }

    #[test]
    fn slide_before_init_and_reset() {
        let mut engine = PuzzleEngine::with_seed(3, 1).unwrap();
        assert_eq!(engine.slide(0, 0), Err(GameError::NotStarted));

        engine.set_size(5).unwrap();
        assert_eq!(engine.board().dim(), (5, 5));
        assert_eq!(engine.slide(5, 0), Err(GameError::InvalidCoords));

        engine.reset();
        assert_eq!(engine.status(), GameStatus::Waiting);
        assert_eq!(engine.board().len(), 0);
        assert_eq!(engine.size(), 5);
    }
}
