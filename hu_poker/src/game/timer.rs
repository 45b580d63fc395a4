//! Turn countdown.
//!
//! The timer doesn't own a clock. Whoever drives it calls [`TurnTimer::tick`]
//! once per tick period with the epoch it was handed by
//! [`TurnTimer::start`]. Ticks from a canceled or replaced countdown carry an
//! old epoch and are ignored, so at most one countdown is ever live.

use super::constants::{DEFAULT_TURN_TICKS, TURN_WARNINGS};

/// Identifies one countdown.
pub type Epoch = u64;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TimerState {
    #[default]
    Idle,
    Running {
        epoch: Epoch,
        remaining: u32,
    },
    Expired,
}

/// What the reducer wants done with the timer after an event.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TimerCommand {
    #[default]
    Keep,
    Start,
    Cancel,
}

/// Result of a single accepted tick.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimerUpdate {
    pub epoch: Epoch,
    pub remaining: u32,
    /// Set when `remaining` just crossed one of the warning marks.
    pub warning: Option<u32>,
    pub expired: bool,
}

#[derive(Debug)]
pub struct TurnTimer {
    duration: u32,
    state: TimerState,
    last_epoch: Epoch,
    /// Number of warning marks still ahead of the countdown.
    warnings_left: usize,
}

impl TurnTimer {
    /// A timer whose countdowns last `duration` ticks (at least one).
    pub fn new(duration: u32) -> Self {
        Self {
            duration: duration.max(1),
            state: TimerState::Idle,
            last_epoch: 0,
            warnings_left: 0,
        }
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    pub fn remaining(&self) -> Option<u32> {
        match self.state {
            TimerState::Running { remaining, .. } => Some(remaining),
            _ => None,
        }
    }

    /// Start a fresh countdown, replacing any running one.
    pub fn start(&mut self) -> Epoch {
        self.last_epoch += 1;
        self.state = TimerState::Running {
            epoch: self.last_epoch,
            remaining: self.duration,
        };
        self.warnings_left = TURN_WARNINGS
            .iter()
            .filter(|mark| **mark < self.duration)
            .count();
        self.last_epoch
    }

    /// Stop the running countdown, if any. Returns whether one was running.
    /// An expired timer also goes back to idle.
    pub fn cancel(&mut self) -> bool {
        let was_running = self.is_running();
        self.state = TimerState::Idle;
        self.warnings_left = 0;
        was_running
    }

    /// Advance the countdown by one tick. Ticks that don't belong to the
    /// running countdown return `None` and change nothing.
    pub fn tick(&mut self, epoch: Epoch) -> Option<TimerUpdate> {
        let TimerState::Running {
            epoch: running,
            remaining,
        } = self.state
        else {
            return None;
        };
        if running != epoch {
            return None;
        }

        let remaining = remaining.saturating_sub(1);
        let mut warning = None;
        while self.warnings_left > 0 && remaining <= TURN_WARNINGS[self.warnings_left - 1] {
            warning = Some(TURN_WARNINGS[self.warnings_left - 1]);
            self.warnings_left -= 1;
        }

        let expired = remaining == 0;
        self.state = if expired {
            TimerState::Expired
        } else {
            TimerState::Running { epoch, remaining }
        };

        Some(TimerUpdate {
            epoch,
            remaining,
            warning,
            expired,
        })
    }
}

impl Default for TurnTimer {
    fn default() -> Self {
        Self::new(DEFAULT_TURN_TICKS)
    }
}
