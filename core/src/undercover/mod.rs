use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;
pub use words::*;

mod words;

pub const MIN_PLAYERS: usize = 3;
pub const MAX_PLAYERS: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: usize,
    pub word: String,
    pub is_undercover: bool,
    pub is_eliminated: bool,
    pub viewed: bool,
    pub votes: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Civilians,
    Undercover,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    NoChange,
    /// Vote recorded, nobody eliminated yet.
    Counted,
    Eliminated(usize),
    GameOver(Faction),
}

impl VoteOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Pass-and-play "who is the undercover" word game.
#[derive(Clone, Debug)]
pub struct UndercoverEngine {
    catalog: Vec<WordPair>,
    players: Vec<Participant>,
    word_pair: Option<WordPair>,
    viewing: Option<usize>,
    voting_round: u32,
    player_count: usize,
    status: GameStatus,
    rng: GameRng,
}

impl UndercoverEngine {
    pub fn new() -> Self {
        Self::with_rng(GameRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(GameRng::new(seed))
    }

    pub fn with_rng(rng: GameRng) -> Self {
        Self::with_catalog(builtin_catalog(), rng)
    }

    pub fn with_catalog(catalog: Vec<WordPair>, rng: GameRng) -> Self {
        Self {
            catalog,
            players: Vec::new(),
            word_pair: None,
            viewing: None,
            voting_round: 0,
            player_count: MIN_PLAYERS,
            status: GameStatus::Waiting,
            rng,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut engine = Self::with_rng(GameRng::from_seed_opt(settings.seed));
        engine.player_count = settings.undercover_players;
        engine
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn players(&self) -> &[Participant] {
        &self.players
    }

    pub fn remaining_players(&self) -> impl Iterator<Item = &Participant> {
        self.players.iter().filter(|p| !p.is_eliminated)
    }

    pub fn word_pair(&self) -> Option<&WordPair> {
        self.word_pair.as_ref()
    }

    pub fn voting_round(&self) -> u32 {
        self.voting_round
    }

    /// The player whose card is currently turned up.
    pub fn viewing(&self) -> Option<&Participant> {
        self.viewing.and_then(|id| self.players.get(id))
    }

    /// Table size used by [`restart`](UndercoverEngine::restart).
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn all_viewed(&self) -> bool {
        self.players.iter().all(|p| p.viewed)
    }

    pub fn is_game_over(&self) -> bool {
        if self.players.is_empty() {
            return false;
        }
        let (undercover, civilians) = self.faction_counts();
        undercover == civilians || undercover == 0
    }

    /// Only decided once the game is over.
    pub fn winner(&self) -> Option<Faction> {
        if !self.is_game_over() {
            return None;
        }
        let (undercover, _) = self.faction_counts();
        Some(if undercover == 0 {
            Faction::Civilians
        } else {
            Faction::Undercover
        })
    }

    pub fn start(&mut self, player_count: usize) -> Result<()> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
            return Err(GameError::InvalidPlayerCount);
        }
        let pair = self
            .rng
            .choose(&self.catalog)
            .cloned()
            .ok_or(GameError::EmptyWordCatalog)?;
        let undercover_id = self.rng.index(0..player_count);

        self.players = (0..player_count)
            .map(|id| {
                let is_undercover = id == undercover_id;
                Participant {
                    id,
                    word: if is_undercover {
                        pair.undercover.clone()
                    } else {
                        pair.common.clone()
                    },
                    is_undercover,
                    is_eliminated: false,
                    viewed: false,
                    votes: 0,
                }
            })
            .collect();
        self.word_pair = Some(pair);
        self.viewing = None;
        self.voting_round = 0;
        self.player_count = player_count;
        self.status = GameStatus::Playing;
        log::debug!("Undercover started with {} players", player_count);
        Ok(())
    }

    /// Deals a new round to the same table.
    pub fn restart(&mut self) -> Result<()> {
        self.start(self.player_count)
    }

    pub fn reset(&mut self) {
        self.players.clear();
        self.word_pair = None;
        self.viewing = None;
        self.voting_round = 0;
        self.status = GameStatus::Waiting;
    }

    pub fn view_card(&mut self, id: usize) -> Result<()> {
        self.check_player(id)?;
        self.viewing = Some(id);
        Ok(())
    }

    pub fn hide_card(&mut self) {
        self.viewing = None;
    }

    pub fn mark_viewed(&mut self, id: usize) -> Result<()> {
        self.check_player(id)?;
        self.players[id].viewed = true;
        Ok(())
    }

    /// Records one vote against `id`. A sole leader holding at least half the remaining
    /// players' worth of votes is eliminated and the tally starts over.
    pub fn vote(&mut self, id: usize) -> Result<VoteOutcome> {
        self.check_player(id)?;
        if !self.status.is_playing() || self.players[id].is_eliminated {
            return Ok(VoteOutcome::NoChange);
        }

        self.players[id].votes += 1;

        let remaining = self.remaining_players().count();
        let max_votes = self.remaining_players().map(|p| p.votes).max().unwrap_or(0);
        let leaders: SmallVec<[usize; 2]> = self
            .remaining_players()
            .filter(|p| p.votes == max_votes)
            .map(|p| p.id)
            .take(2)
            .collect();
        let &[leader] = leaders.as_slice() else {
            return Ok(VoteOutcome::Counted);
        };
        if (max_votes as usize) * 2 < remaining {
            return Ok(VoteOutcome::Counted);
        }

        self.players[leader].is_eliminated = true;
        self.voting_round += 1;
        for player in &mut self.players {
            player.votes = 0;
        }
        log::debug!(
            "Round {}: player {} eliminated (undercover: {})",
            self.voting_round,
            leader,
            self.players[leader].is_undercover
        );

        match self.winner() {
            Some(winner) => {
                self.status = GameStatus::Ended;
                log::debug!("Undercover over, {:?} win", winner);
                Ok(VoteOutcome::GameOver(winner))
            }
            None => Ok(VoteOutcome::Eliminated(leader)),
        }
    }

    fn faction_counts(&self) -> (usize, usize) {
        let (undercover, civilians): (Vec<&Participant>, Vec<&Participant>) =
            self.remaining_players().partition(|p| p.is_undercover);
        (undercover.len(), civilians.len())
    }

    fn check_player(&self, id: usize) -> Result<()> {
        if self.status.is_waiting() {
            return Err(GameError::NotStarted);
        }
        if id >= self.players.len() {
            return Err(GameError::InvalidPlayer);
        }
        Ok(())
    }
}

impl Default for UndercoverEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession for UndercoverEngine {
    fn status(&self) -> GameStatus {
        self.status
    }

    fn reset(&mut self) {
        UndercoverEngine::reset(self)
    }
}
