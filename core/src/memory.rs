use core::time::Duration;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

pub const MISMATCH_DELAY: Duration = Duration::from_millis(1000);

const SYMBOLS: [&str; 30] = [
    "🐼", "🦊", "🦁", "🐯", "🐨", "🐮", //
    "🍎", "🍌", "🍇", "🍉", "🍓", "🍑", //
    "⚽", "🏀", "🎾", "⚾", "🎱", "🏓", //
    "🌞", "🌙", "⭐", "☁️", "🌈", "❄️", //
    "🎸", "🎹", "🎺", "🎻", "🥁", "🎷", //
];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryDifficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl MemoryDifficulty {
    pub const fn card_count(self) -> usize {
        match self {
            Self::Easy => 12,
            Self::Medium => 20,
            Self::Hard => 30,
        }
    }

    /// How long all cards stay face-up before play starts.
    pub const fn preview_delay(self) -> Duration {
        match self {
            Self::Easy => Duration::from_millis(3000),
            Self::Medium => Duration::from_millis(5000),
            Self::Hard => Duration::from_millis(7000),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: usize,
    /// Index into the symbol deck; two cards share each value.
    pub value: u8,
    pub is_flipped: bool,
    pub is_matched: bool,
}

impl Card {
    pub fn symbol(&self) -> &'static str {
        SYMBOLS[usize::from(self.value) % SYMBOLS.len()]
    }
}

/// Delayed transitions a memory game schedules for itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MemoryTimer {
    EndPreview,
    FlipBack(usize, usize),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    NoChange,
    Flipped,
    Matched,
    /// The pair will turn back over once the mismatch timer fires.
    Mismatched,
    Won,
}

impl FlipOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Clone, Debug)]
pub struct MemoryEngine {
    cards: Vec<Card>,
    moves: u32,
    status: GameStatus,
    difficulty: MemoryDifficulty,
    face_up: SmallVec<[usize; 2]>,
    timer: TimerSlot<MemoryTimer>,
    rng: GameRng,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::with_rng(GameRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(GameRng::new(seed))
    }

    pub fn with_rng(rng: GameRng) -> Self {
        Self {
            cards: Vec::new(),
            moves: 0,
            status: GameStatus::Waiting,
            difficulty: MemoryDifficulty::default(),
            face_up: SmallVec::new(),
            timer: TimerSlot::new(),
            rng,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut engine = Self::with_rng(GameRng::from_seed_opt(settings.seed));
        engine.difficulty = settings.memory;
        engine
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn difficulty(&self) -> MemoryDifficulty {
        self.difficulty
    }

    /// Ids of face-up cards waiting to be matched.
    pub fn face_up(&self) -> &[usize] {
        &self.face_up
    }

    /// Token and remaining delay of the scheduled transition, for shells with their own clock.
    pub fn pending_timer(&self) -> Option<(TimerToken, Duration)> {
        self.timer.pending()
    }

    /// Chooses the difficulty [`MemoryEngine::restart`] deals at. [`MemoryEngine::init`] takes
    /// its own and overrides this one.
    pub fn set_difficulty(&mut self, difficulty: MemoryDifficulty) {
        self.difficulty = difficulty;
    }

    /// Deals a fresh face-up board and schedules the end of the preview.
    pub fn init(&mut self, difficulty: MemoryDifficulty) {
        self.timer.cancel();
        self.difficulty = difficulty;

        let pairs = (difficulty.card_count() / 2) as u8;
        let mut values: Vec<u8> = (0..pairs).chain(0..pairs).collect();
        self.rng.shuffle(&mut values);

        self.cards = values
            .into_iter()
            .enumerate()
            .map(|(id, value)| Card {
                id,
                value,
                is_flipped: true,
                is_matched: false,
            })
            .collect();
        self.moves = 0;
        self.face_up.clear();
        self.status = GameStatus::Preview;
        self.timer
            .schedule(difficulty.preview_delay(), MemoryTimer::EndPreview);
        log::debug!("Memory dealt {} cards ({:?})", self.cards.len(), difficulty);
    }

    /// Deals again at the current difficulty.
    pub fn restart(&mut self) {
        self.init(self.difficulty);
    }

    pub fn reset(&mut self) {
        self.timer.cancel();
        self.cards.clear();
        self.moves = 0;
        self.face_up.clear();
        self.status = GameStatus::Waiting;
    }

    pub fn flip(&mut self, card_id: usize) -> Result<FlipOutcome> {
        if self.status.is_waiting() {
            return Err(GameError::NotStarted);
        }
        let card = *self.cards.get(card_id).ok_or(GameError::InvalidCard)?;

        if !self.status.is_playing()
            || self.face_up.len() >= 2
            || card.is_matched
            || card.is_flipped
        {
            return Ok(FlipOutcome::NoChange);
        }

        self.cards[card_id].is_flipped = true;
        self.face_up.push(card_id);

        let &[first, second] = self.face_up.as_slice() else {
            return Ok(FlipOutcome::Flipped);
        };
        self.moves += 1;

        if self.cards[first].value != self.cards[second].value {
            self.timer
                .schedule(MISMATCH_DELAY, MemoryTimer::FlipBack(first, second));
            return Ok(FlipOutcome::Mismatched);
        }

        self.cards[first].is_matched = true;
        self.cards[second].is_matched = true;
        self.face_up.clear();

        if self.cards.iter().all(|card| card.is_matched) {
            self.status = GameStatus::Won;
            log::debug!("Memory won in {} moves", self.moves);
            Ok(FlipOutcome::Won)
        } else {
            Ok(FlipOutcome::Matched)
        }
    }

    /// Moves the engine's clock forward, applying the pending transition if it comes due.
    pub fn advance(&mut self, elapsed: Duration) -> Option<MemoryTimer> {
        let action = self.timer.advance(elapsed)?;
        self.apply(action);
        Some(action)
    }

    /// Applies the transition scheduled under `token`. Tokens from before the last
    /// `init`/`reset` are ignored.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        match self.timer.fire(token) {
            Some(action) => {
                self.apply(action);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, action: MemoryTimer) {
        log::trace!("Memory timer fired: {:?}", action);
        match action {
            MemoryTimer::EndPreview => {
                for card in &mut self.cards {
                    card.is_flipped = false;
                }
                self.status = GameStatus::Playing;
            }
            MemoryTimer::FlipBack(first, second) => {
                for id in [first, second] {
                    if let Some(card) = self.cards.get_mut(id) {
                        card.is_flipped = card.is_matched;
                    }
                }
                self.face_up.clear();
            }
        }
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession for MemoryEngine {
    fn status(&self) -> GameStatus {
        self.status
    }

    fn reset(&mut self) {
        MemoryEngine::reset(self)
    }

    fn is_in_progress(&self) -> bool {
        matches!(self.status, GameStatus::Preview | GameStatus::Playing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(difficulty: MemoryDifficulty) -> MemoryEngine {
        let mut engine = MemoryEngine::with_seed(17);
        engine.init(difficulty);
        engine.advance(difficulty.preview_delay());
        engine
    }

    /// Ids of the two cards holding `value`.
    fn pair_of(engine: &MemoryEngine, value: u8) -> (usize, usize) {
        let ids: Vec<_> = engine
            .cards()
            .iter()
            .filter(|c| c.value == value)
            .map(|c| c.id)
            .collect();
        (ids[0], ids[1])
    }

    #[test]
    fn deals_pairs_face_up_in_preview() {
        let mut engine = MemoryEngine::with_seed(2);

        engine.init(MemoryDifficulty::Hard);

        assert_eq!(engine.status(), GameStatus::Preview);
        assert_eq!(engine.cards().len(), 30);
        assert!(engine.cards().iter().all(|c| c.is_flipped && !c.is_matched));
        for value in 0..15 {
            assert_eq!(engine.cards().iter().filter(|c| c.value == value).count(), 2);
        }
        assert_eq!(engine.flip(0).unwrap(), FlipOutcome::NoChange);
    }

    #[test]
    fn preview_ends_after_delay() {
        let mut engine = MemoryEngine::with_seed(5);
        engine.init(MemoryDifficulty::Medium);

        assert_eq!(engine.advance(Duration::from_millis(4999)), None);
        assert_eq!(engine.status(), GameStatus::Preview);
        assert_eq!(
            engine.advance(Duration::from_millis(1)),
            Some(MemoryTimer::EndPreview)
        );
        assert_eq!(engine.status(), GameStatus::Playing);
        assert!(engine.cards().iter().all(|c| !c.is_flipped));
    }

    #[test]
    fn equal_pair_stays_matched() {
        let mut engine = playing(MemoryDifficulty::Easy);
        let (a, b) = pair_of(&engine, 0);

        assert_eq!(engine.flip(a).unwrap(), FlipOutcome::Flipped);
        assert_eq!(engine.flip(b).unwrap(), FlipOutcome::Matched);

        assert!(engine.cards()[a].is_matched && engine.cards()[b].is_matched);
        assert!(engine.face_up().is_empty());
        assert_eq!(engine.moves(), 1);
        assert_eq!(engine.flip(a).unwrap(), FlipOutcome::NoChange);
        assert_eq!(engine.advance(Duration::from_secs(10)), None);
        assert!(engine.cards()[a].is_flipped);
    }

    #[test]
    fn mismatch_turns_back_after_delay() {
        let mut engine = playing(MemoryDifficulty::Easy);
        let (a, _) = pair_of(&engine, 0);
        let (b, c) = pair_of(&engine, 1);

        engine.flip(a).unwrap();
        assert_eq!(engine.flip(b).unwrap(), FlipOutcome::Mismatched);
        assert_eq!(engine.flip(c).unwrap(), FlipOutcome::NoChange);

        assert_eq!(engine.advance(Duration::from_millis(999)), None);
        assert!(engine.cards()[a].is_flipped);
        assert_eq!(
            engine.advance(Duration::from_millis(1)),
            Some(MemoryTimer::FlipBack(a, b))
        );

        assert!(!engine.cards()[a].is_flipped && !engine.cards()[b].is_flipped);
        assert!(engine.face_up().is_empty());
        assert_eq!(engine.flip(c).unwrap(), FlipOutcome::Flipped);
    }

    #[test]
    fn matching_everything_wins() {
        let mut engine = playing(MemoryDifficulty::Easy);

        let mut last = FlipOutcome::NoChange;
        for value in 0..6 {
            let (a, b) = pair_of(&engine, value);
            engine.flip(a).unwrap();
            last = engine.flip(b).unwrap();
        }

        assert_eq!(last, FlipOutcome::Won);
        assert_eq!(engine.status(), GameStatus::Won);
        assert_eq!(engine.moves(), 6);
    }

    #[test]
    fn stale_timer_cannot_touch_new_game() {
        let mut engine = MemoryEngine::with_seed(9);
        engine.init(MemoryDifficulty::Easy);
        let (old_token, _) = engine.pending_timer().unwrap();

        engine.reset();
        assert_eq!(engine.pending_timer(), None);
        engine.init(MemoryDifficulty::Hard);

        assert!(!engine.fire(old_token));
        assert_eq!(engine.status(), GameStatus::Preview);
        assert!(engine.cards().iter().all(|c| c.is_flipped));

        let (token, delay) = engine.pending_timer().unwrap();
        assert_eq!(delay, MemoryDifficulty::Hard.preview_delay());
        assert!(engine.fire(token));
        assert_eq!(engine.status(), GameStatus::Playing);
    }

    #[test]
    fn invalid_flips() {
        let mut engine = MemoryEngine::with_seed(1);
        assert_eq!(engine.flip(0), Err(GameError::NotStarted));

        let mut engine = playing(MemoryDifficulty::Easy);
        assert_eq!(engine.flip(12), Err(GameError::InvalidCard));
    }

    #[test]
    fn preview_counts_as_in_progress() {
        let mut engine = MemoryEngine::with_seed(6);
        assert!(!engine.is_in_progress());

        engine.init(MemoryDifficulty::Easy);
        assert!(engine.is_in_progress());
        assert_eq!(engine.confirm_exit(|| true), ExitDecision::Leave);
        assert_eq!(engine.status(), GameStatus::Waiting);
        assert_eq!(engine.pending_timer(), None);
    }

    #[test]
    fn restart_uses_chosen_difficulty() {
        let mut engine = MemoryEngine::with_seed(4);
        engine.set_difficulty(MemoryDifficulty::Medium);

        engine.restart();

        assert_eq!(engine.cards().len(), 20);
        assert!(!engine.cards()[0].symbol().is_empty());

        engine.init(MemoryDifficulty::Easy);
        assert_eq!(engine.difficulty(), MemoryDifficulty::Easy);
        engine.restart();
        assert_eq!(engine.cards().len(), 12);
    }
}
