use core::time::Duration;
use serde::{Deserialize, Serialize};

/// Identifies one scheduled callback. Tokens are never reused within a slot, so a token handed
/// out before a reset can never fire against the game that replaced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken(u64);

#[derive(Clone, Debug, PartialEq)]
struct PendingTimer<A> {
    token: TimerToken,
    remaining: Duration,
    action: A,
}

/// Holds at most one pending delayed action for an engine.
///
/// The slot keeps logical time only: the owner either advances it with [`TimerSlot::advance`] or
/// fires a token directly with [`TimerSlot::fire`] when its own scheduler says so.
#[derive(Clone, Debug, PartialEq)]
pub struct TimerSlot<A> {
    next_token: u64,
    pending: Option<PendingTimer<A>>,
}

impl<A> TimerSlot<A> {
    pub const fn new() -> Self {
        Self {
            next_token: 0,
            pending: None,
        }
    }

    /// Replaces whatever was pending.
    pub fn schedule(&mut self, delay: Duration, action: A) -> TimerToken {
        self.cancel();
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.pending = Some(PendingTimer {
            token,
            remaining: delay,
            action,
        });
        token
    }

    pub fn cancel(&mut self) -> bool {
        if let Some(pending) = self.pending.take() {
            log::trace!("Cancelled timer {:?}", pending.token);
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Token and remaining delay of the pending action.
    pub fn pending(&self) -> Option<(TimerToken, Duration)> {
        self.pending.as_ref().map(|p| (p.token, p.remaining))
    }

    /// Moves logical time forward, returning the action once its delay has fully elapsed.
    pub fn advance(&mut self, elapsed: Duration) -> Option<A> {
        let pending = self.pending.as_mut()?;
        pending.remaining = pending.remaining.saturating_sub(elapsed);
        if pending.remaining.is_zero() {
            self.pending.take().map(|p| p.action)
        } else {
            None
        }
    }

    /// Takes the action if `token` is the one still pending; stale tokens yield `None`.
    pub fn fire(&mut self, token: TimerToken) -> Option<A> {
        match &self.pending {
            Some(pending) if pending.token == token => self.pending.take().map(|p| p.action),
            _ => None,
        }
    }
}

impl<A> Default for TimerSlot<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_fires_after_full_delay() {
        let mut slot = TimerSlot::new();
        slot.schedule(Duration::from_millis(100), "flip");

        assert_eq!(slot.advance(Duration::from_millis(60)), None);
        assert_eq!(slot.pending().map(|p| p.1), Some(Duration::from_millis(40)));
        assert_eq!(slot.advance(Duration::from_millis(40)), Some("flip"));
        assert!(!slot.is_pending());
    }

    #[test]
    fn rescheduling_invalidates_old_token() {
        let mut slot = TimerSlot::new();
        let old = slot.schedule(Duration::from_millis(10), 1);
        let new = slot.schedule(Duration::from_millis(10), 2);

        assert_ne!(old, new);
        assert_eq!(slot.fire(old), None);
        assert_eq!(slot.fire(new), Some(2));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut slot = TimerSlot::new();
        let token = slot.schedule(Duration::ZERO, ());

        assert!(slot.cancel());
        assert_eq!(slot.fire(token), None);
        assert_eq!(slot.advance(Duration::from_secs(1)), None);
    }
}
