use core::time::Duration;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

pub const GOBANG_SIZE: Coord = 15;

/// Stones in a row needed to win.
pub const WIN_LENGTH: usize = 5;

/// Directions checked for a line, each walked both ways from the placed stone.
const AXES: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stone {
    #[default]
    Empty,
    Black,
    White,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub const fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    pub const fn stone(self) -> Stone {
        match self {
            Self::Black => Stone::Black,
            Self::White => Stone::White,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaceOutcome {
    NoChange,
    Placed,
    Won,
}

impl PlaceOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Two-player five-in-a-row on a 15x15 board. Positions are `(x, y)`: column then row.
#[derive(Clone, Debug)]
pub struct GobangEngine {
    board: Array2<Stone>,
    current_player: Player,
    winner: Option<Player>,
    status: GameStatus,
    black_time: Duration,
    white_time: Duration,
    last_move_at: Option<Instant>,
    last_move: Option<Coord2>,
    move_count: u16,
}

impl GobangEngine {
    pub fn new() -> Self {
        Self {
            board: Array2::default((GOBANG_SIZE, GOBANG_SIZE).to_nd_index()),
            current_player: Player::Black,
            winner: None,
            status: GameStatus::Waiting,
            black_time: Duration::ZERO,
            white_time: Duration::ZERO,
            last_move_at: None,
            last_move: None,
            move_count: 0,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn board(&self) -> &Array2<Stone> {
        &self.board
    }

    pub fn stone_at(&self, x: Coord, y: Coord) -> Option<Stone> {
        self.board.get((y, x).to_nd_index()).copied()
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Time accumulated on `player`'s clock as of their last move.
    pub fn elapsed(&self, player: Player) -> Duration {
        match player {
            Player::Black => self.black_time,
            Player::White => self.white_time,
        }
    }

    pub fn move_count(&self) -> u16 {
        self.move_count
    }

    /// `(x, y)` of the most recent stone.
    pub fn last_move(&self) -> Option<Coord2> {
        self.last_move
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        *self = Self::new();
        self.status = GameStatus::Playing;
        self.last_move_at = Some(now);
        log::debug!("Gobang started");
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn place(&mut self, x: Coord, y: Coord) -> Result<PlaceOutcome> {
        self.place_at(x, y, Instant::now())
    }

    pub fn place_at(&mut self, x: Coord, y: Coord, now: Instant) -> Result<PlaceOutcome> {
        if x >= GOBANG_SIZE || y >= GOBANG_SIZE {
            return Err(GameError::InvalidCoords);
        }
        match self.status {
            GameStatus::Waiting => return Err(GameError::NotStarted),
            GameStatus::Playing => {}
            _ => return Ok(PlaceOutcome::NoChange),
        }

        let index = (y, x).to_nd_index();
        if self.board[index] != Stone::Empty {
            return Ok(PlaceOutcome::NoChange);
        }

        self.charge_clock(now);
        let mover = self.current_player;
        self.board[index] = mover.stone();
        self.last_move = Some((x, y));
        self.move_count += 1;

        if self.longest_line((y, x), mover.stone()) >= WIN_LENGTH {
            self.winner = Some(mover);
            self.status = GameStatus::Won;
            log::debug!("Gobang won by {:?} after {} moves", mover, self.move_count);
            return Ok(PlaceOutcome::Won);
        }

        self.current_player = mover.opponent();
        Ok(PlaceOutcome::Placed)
    }

    /// Adds the time since the previous move to the player about to move.
    fn charge_clock(&mut self, now: Instant) {
        let since = self
            .last_move_at
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        match self.current_player {
            Player::Black => self.black_time += since,
            Player::White => self.white_time += since,
        }
        self.last_move_at = Some(now);
    }

    /// Longest run of `stone` through `origin` (row, col) over the four axes.
    fn longest_line(&self, origin: Coord2, stone: Stone) -> usize {
        let bounds = grid_size(&self.board);
        AXES.iter()
            .map(|&(dr, dc)| {
                1 + [(dr, dc), (-dr, -dc)]
                    .into_iter()
                    .map(|delta| {
                        let mut count = 0;
                        let mut pos = origin;
                        while let Some(next) = apply_delta(pos, delta, bounds) {
                            if self.board[next.to_nd_index()] != stone {
                                break;
                            }
                            count += 1;
                            pos = next;
                        }
                        count
                    })
                    .sum::<usize>()
            })
            .max()
            .unwrap_or(1)
    }
}

impl Default for GobangEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession for GobangEngine {
    fn status(&self) -> GameStatus {
        self.status
    }

    fn reset(&mut self) {
        GobangEngine::reset(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> (GobangEngine, Instant) {
        let t0 = Instant::now();
        let mut engine = GobangEngine::new();
        engine.start_at(t0);
        (engine, t0)
    }

    /// Plays black at `blacks` and white at `whites`, alternating.
    fn play(
        engine: &mut GobangEngine,
        blacks: &[Coord2],
        whites: &[Coord2],
        at: Instant,
    ) -> PlaceOutcome {
        let mut last = PlaceOutcome::NoChange;
        for (i, &(x, y)) in blacks.iter().enumerate() {
            last = engine.place_at(x, y, at).unwrap();
            if let Some(&(wx, wy)) = whites.get(i) {
                if last == PlaceOutcome::Placed {
                    last = engine.place_at(wx, wy, at).unwrap();
                }
            }
        }
        last
    }

    #[test]
    fn horizontal_five_wins_for_black() {
        let (mut engine, t0) = started();

        let outcome = play(
            &mut engine,
            &[(7, 7), (8, 7), (9, 7), (10, 7), (11, 7)],
            &[(0, 0), (0, 1), (0, 2), (0, 3)],
            t0,
        );

        assert_eq!(outcome, PlaceOutcome::Won);
        assert_eq!(engine.status(), GameStatus::Won);
        assert_eq!(engine.winner(), Some(Player::Black));
        assert_eq!(engine.current_player(), Player::Black);
    }

    #[test]
    fn anti_diagonal_five_wins_for_white() {
        let (mut engine, t0) = started();

        let outcome = play(
            &mut engine,
            &[(0, 0), (2, 0), (4, 0), (6, 0), (8, 0)],
            &[(14, 0), (13, 1), (11, 3), (10, 4), (12, 2)],
            t0,
        );

        assert_eq!(outcome, PlaceOutcome::Won);
        assert_eq!(engine.winner(), Some(Player::White));
    }

    #[test]
    fn vertical_five_wins_for_black() {
        let (mut engine, t0) = started();

        let outcome = play(
            &mut engine,
            &[(4, 2), (4, 3), (4, 4), (4, 5), (4, 6)],
            &[(10, 0), (12, 0), (10, 14), (12, 14)],
            t0,
        );

        assert_eq!(outcome, PlaceOutcome::Won);
        assert_eq!(engine.winner(), Some(Player::Black));
        assert_eq!(engine.last_move(), Some((4, 6)));
    }

    #[test]
    fn main_diagonal_five_wins_for_white() {
        let (mut engine, t0) = started();

        let outcome = play(
            &mut engine,
            &[(0, 14), (2, 14), (4, 14), (6, 14), (8, 14)],
            &[(1, 1), (2, 2), (4, 4), (5, 5), (3, 3)],
            t0,
        );

        assert_eq!(outcome, PlaceOutcome::Won);
        assert_eq!(engine.status(), GameStatus::Won);
        assert_eq!(engine.winner(), Some(Player::White));
        assert_eq!(engine.move_count(), 10);
    }

    #[test]
    fn four_is_not_enough_and_gap_breaks_line() {
        let (mut engine, t0) = started();

        let outcome = play(
            &mut engine,
            &[(3, 3), (3, 4), (3, 5), (3, 6), (3, 8)],
            &[(9, 9), (9, 10), (9, 11), (10, 0)],
            t0,
        );

        assert_eq!(outcome, PlaceOutcome::Placed);
        assert_eq!(engine.status(), GameStatus::Playing);
        assert_eq!(engine.current_player(), Player::White);
    }

    #[test]
    fn occupied_cell_is_rejected() {
        let (mut engine, t0) = started();
        engine.place_at(7, 7, t0).unwrap();
        let before = engine.board().clone();

        assert_eq!(engine.place_at(7, 7, t0).unwrap(), PlaceOutcome::NoChange);
        assert_eq!(engine.board(), &before);
        assert_eq!(engine.current_player(), Player::White);
        assert_eq!(engine.move_count(), 1);
    }

    #[test]
    fn clocks_charge_the_mover() {
        let (mut engine, t0) = started();

        engine.place_at(7, 7, t0 + Duration::from_secs(3)).unwrap();
        engine.place_at(8, 8, t0 + Duration::from_secs(5)).unwrap();
        engine.place_at(9, 9, t0 + Duration::from_secs(9)).unwrap();

        assert_eq!(engine.elapsed(Player::Black), Duration::from_secs(7));
        assert_eq!(engine.elapsed(Player::White), Duration::from_secs(2));
        assert_eq!(engine.last_move(), Some((9, 9)));
    }

    #[test]
    fn place_before_start_is_an_error() {
        let mut engine = GobangEngine::new();

        assert_eq!(engine.place(0, 0), Err(GameError::NotStarted));
        let (mut engine, _) = started();
        assert_eq!(engine.place(15, 0), Err(GameError::InvalidCoords));
    }

    #[test]
    fn no_moves_after_win_and_reset_clears() {
        let (mut engine, t0) = started();
        play(
            &mut engine,
            &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)],
            &[(5, 5), (5, 6), (5, 7), (5, 8)],
            t0,
        );

        assert_eq!(engine.place_at(14, 14, t0).unwrap(), PlaceOutcome::NoChange);

        engine.reset();
        assert_eq!(engine.status(), GameStatus::Waiting);
        assert!(engine.board().iter().all(|&s| s == Stone::Empty));
        assert_eq!(engine.winner(), None);
        assert_eq!(engine.elapsed(Player::Black), Duration::ZERO);
    }
}
