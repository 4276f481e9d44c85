use crate::*;

/// What the shell should do after asking to leave a game screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitDecision {
    Leave,
    Stay,
}

/// Surface every engine exposes to the navigation layer.
pub trait GameSession {
    fn status(&self) -> GameStatus;

    fn reset(&mut self);

    /// Leaving while this holds needs the player's confirmation.
    fn is_in_progress(&self) -> bool {
        self.status().is_playing()
    }

    /// Exit guard: `confirm` is only consulted while a game is in progress. Confirming resets
    /// the engine, declining leaves it untouched.
    fn confirm_exit(&mut self, confirm: impl FnOnce() -> bool) -> ExitDecision
    where
        Self: Sized,
    {
        if !self.is_in_progress() {
            return ExitDecision::Leave;
        }

        if confirm() {
            log::debug!("Exit confirmed, resetting game in {:?}", self.status());
            self.reset();
            ExitDecision::Leave
        } else {
            ExitDecision::Stay
        }
    }
}
