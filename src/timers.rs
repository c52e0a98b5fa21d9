//! Hint timers.
//!
//! A hint starts two clocks: how long its highlight stays on screen and how long the player has to
//! wait before asking again. Both are plain state advanced by [`HintClock::tick`] with the time
//! elapsed since the previous tick, so the session never depends on a wall clock.

use std::time::Duration;

use crate::difficulty::HINT_DURATION;

/// What changed during a call to [`HintClock::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The cooldown dropped by at least one whole second.
    pub cooldown_changed: bool,
    /// The hint highlight ran out and should be cleared.
    pub hint_expired: bool,
}

impl TickOutcome {
    /// Returns whether anything observable changed.
    #[must_use]
    pub const fn changed(self) -> bool {
        self.cooldown_changed || self.hint_expired
    }
}

/// Cooldown and display timers of the hint feature.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HintClock {
    /// Whole seconds left before another hint may be requested.
    cooldown: u32,
    /// Time accumulated towards the next cooldown second.
    carry: Duration,
    /// Time left before the highlight is cleared, while a hint is shown.
    display: Option<Duration>,
}

impl HintClock {
    /// Builds an idle clock.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cooldown: 0,
            carry: Duration::ZERO,
            display: None,
        }
    }

    /// Starts both timers for a freshly shown hint.
    pub fn start(&mut self, cooldown_secs: u32) {
        self.cooldown = cooldown_secs;
        self.carry = Duration::ZERO;
        self.display = Some(HINT_DURATION);
    }

    /// Returns whether a new hint may be shown: no cooldown left and no hint on screen.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.cooldown == 0 && self.display.is_none()
    }

    /// Returns the remaining cooldown in whole seconds.
    #[must_use]
    pub const fn cooldown_secs(&self) -> u32 {
        self.cooldown
    }

    /// Returns whether a hint is currently on screen.
    #[must_use]
    pub const fn hint_active(&self) -> bool {
        self.display.is_some()
    }

    /// Advances both timers by `elapsed`.
    ///
    /// The cooldown drops once per whole second accumulated across ticks, so many short ticks
    /// add up the same way as one long tick.
    pub fn tick(&mut self, elapsed: Duration) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if self.cooldown > 0 {
            self.carry = self.carry.saturating_add(elapsed);
            let whole = u32::try_from(self.carry.as_secs()).unwrap_or(u32::MAX);
            if whole > 0 {
                let dropped = whole.min(self.cooldown);
                self.cooldown -= dropped;
                self.carry = self
                    .carry
                    .saturating_sub(Duration::from_secs(u64::from(whole)));
                outcome.cooldown_changed = true;
            }
            if self.cooldown == 0 {
                self.carry = Duration::ZERO;
            }
        }

        if let Some(remaining) = self.display {
            let remaining = remaining.saturating_sub(elapsed);
            if remaining.is_zero() {
                self.display = None;
                outcome.hint_expired = true;
            } else {
                self.display = Some(remaining);
            }
        }

        outcome
    }

    /// Cancels both timers.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
