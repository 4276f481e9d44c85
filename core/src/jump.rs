use serde::{Deserialize, Serialize};

use crate::*;

const START_PLATFORM: Platform = Platform {
    x: 50.0,
    width: 80.0,
    distance: 150.0,
};
const FIRST_NEXT_X: f64 = 200.0;
/// Where the character stands, measured from a platform's left edge.
const STANDING_OFFSET: f64 = 40.0;

/// Horizontal travel per unit of power.
const POWER_SCALE: f64 = 2.0;
/// Frames a jump's travel is spread over.
const FRAMES_PER_JUMP: f64 = 30.0;
const ARC_PERIOD: f64 = 50.0;
const ARC_HEIGHT: f64 = 100.0;
/// Highest point above ground that still counts as landed.
const LANDING_TOLERANCE: f64 = 10.0;
/// Flights that take longer than this fall short.
pub const MAX_FLIGHT_STEPS: u32 = 100_000;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f64,
    pub width: f64,
    /// Gap from this platform's left edge to the next one's.
    pub distance: f64,
}

impl Platform {
    pub fn contains(&self, x: f64) -> bool {
        x >= self.x && x <= self.x + self.width
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub x: f64,
    pub y: f64,
    pub jumping: bool,
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Flight {
    step: f64,
    steps: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JumpOutcome {
    NoChange,
    InFlight,
    Landed,
    Missed,
}

impl JumpOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Platform hopping: charge a jump, clear the gap, land on the next platform.
#[derive(Clone, Debug)]
pub struct JumpEngine {
    score: u32,
    best_score: u32,
    status: GameStatus,
    current: Platform,
    next: Platform,
    character: Character,
    flight: Option<Flight>,
    rng: GameRng,
}

impl JumpEngine {
    pub fn new() -> Self {
        Self::with_rng(GameRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(GameRng::new(seed))
    }

    pub fn with_rng(rng: GameRng) -> Self {
        Self {
            score: 0,
            best_score: 0,
            status: GameStatus::Waiting,
            current: START_PLATFORM,
            next: Platform {
                x: FIRST_NEXT_X,
                ..START_PLATFORM
            },
            character: standing_on(&START_PLATFORM),
            flight: None,
            rng,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_rng(GameRng::from_seed_opt(settings.seed))
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn current_platform(&self) -> Platform {
        self.current
    }

    pub fn next_platform(&self) -> Platform {
        self.next
    }

    pub fn character(&self) -> Character {
        self.character
    }

    pub fn init(&mut self) {
        self.score = 0;
        self.status = GameStatus::Playing;
        self.current = START_PLATFORM;
        self.next = Platform {
            x: FIRST_NEXT_X,
            ..self.random_platform()
        };
        self.character = standing_on(&self.current);
        self.flight = None;
        log::debug!("Jump started, next platform {:?}", self.next);
    }

    /// Best score survives a reset.
    pub fn reset(&mut self) {
        let best_score = self.best_score;
        *self = Self::with_rng(self.rng.clone());
        self.best_score = best_score;
    }

    /// Jumps with `power` and resolves the landing right away.
    pub fn jump(&mut self, power: f64) -> Result<JumpOutcome> {
        let mut outcome = self.launch(power)?;
        while outcome == JumpOutcome::InFlight {
            outcome = self.step()?;
        }
        Ok(outcome)
    }

    /// Leaves the platform without resolving, for shells that draw each frame with [`step`].
    ///
    /// [`step`]: JumpEngine::step
    pub fn launch(&mut self, power: f64) -> Result<JumpOutcome> {
        match self.status {
            GameStatus::Waiting => return Err(GameError::NotStarted),
            GameStatus::Playing => {}
            _ => return Ok(JumpOutcome::NoChange),
        }
        if self.character.jumping || !power.is_finite() || power <= 0.0 {
            return Ok(JumpOutcome::NoChange);
        }

        self.character.jumping = true;
        self.flight = Some(Flight {
            step: power * POWER_SCALE / FRAMES_PER_JUMP,
            steps: 0,
        });
        Ok(JumpOutcome::InFlight)
    }

    /// Advances a flight by one frame; the frame that reaches the next platform's near edge
    /// decides the landing.
    pub fn step(&mut self) -> Result<JumpOutcome> {
        if self.status.is_waiting() {
            return Err(GameError::NotStarted);
        }
        let Some(flight) = self.flight.as_mut() else {
            return Ok(JumpOutcome::NoChange);
        };

        flight.steps += 1;
        self.character.x += flight.step;
        self.character.y = arc_height(self.character.x - self.current.x);
        log::trace!("Jump frame at ({:.1}, {:.1})", self.character.x, self.character.y);

        if self.character.x >= self.next.x {
            self.flight = None;
            Ok(self.resolve_landing())
        } else if flight.steps >= MAX_FLIGHT_STEPS {
            self.flight = None;
            Ok(self.miss())
        } else {
            Ok(JumpOutcome::InFlight)
        }
    }

    fn resolve_landing(&mut self) -> JumpOutcome {
        let Character { x, y, .. } = self.character;
        if !self.next.contains(x) || y > LANDING_TOLERANCE {
            return self.miss();
        }

        self.score += 1;
        self.best_score = self.best_score.max(self.score);
        self.current = self.next;
        self.next = Platform {
            x: self.current.x + self.current.distance,
            ..self.random_platform()
        };
        self.character = standing_on(&self.current);
        log::debug!("Landed at x={:.1}, score {}", x, self.score);
        JumpOutcome::Landed
    }

    fn miss(&mut self) -> JumpOutcome {
        self.character.jumping = false;
        self.status = GameStatus::Ended;
        log::debug!(
            "Missed at ({:.1}, {:.1}), final score {}",
            self.character.x,
            self.character.y,
            self.score
        );
        JumpOutcome::Missed
    }

    fn random_platform(&mut self) -> Platform {
        Platform {
            x: 0.0,
            width: f64::from(self.rng.range_u32(60..100)),
            distance: f64::from(self.rng.range_u32(100..200)),
        }
    }
}

fn standing_on(platform: &Platform) -> Character {
    Character {
        x: platform.x + STANDING_OFFSET,
        y: 0.0,
        jumping: false,
    }
}

/// Height of the jump arc `travelled` units past the take-off platform's left edge.
fn arc_height(travelled: f64) -> f64 {
    (travelled / ARC_PERIOD).sin() * ARC_HEIGHT
}

impl Default for JumpEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession for JumpEngine {
    fn status(&self) -> GameStatus {
        self.status
    }

    fn reset(&mut self) {
        JumpEngine::reset(self)
    }
}
