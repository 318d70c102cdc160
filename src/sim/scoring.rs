//! Scoring policies
//!
//! Two mutually exclusive ways of keeping score, chosen per session:
//! - `Cumulative`: every tile crossed adds a step to a counter persisted
//!   across sessions; being trapped or shot costs a fixed penalty.
//! - `Countdown`: each session starts with a step budget derived from the
//!   start/goal distance; running out loses the session.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::manhattan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScoringPolicy {
    #[default]
    Cumulative,
    Countdown,
}

/// Session score under a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub policy: ScoringPolicy,
    /// Steps done (cumulative) or steps left (countdown)
    pub value: u32,
}

/// Countdown budget: 1.5x the Manhattan distance (rounded up) plus slack
pub fn step_budget(start: IVec2, goal: IVec2, slack: u32) -> u32 {
    let distance = manhattan(start, goal);
    (distance * 3).div_ceil(2) + slack
}

impl Score {
    pub fn cumulative(steps_done: u32) -> Self {
        Self {
            policy: ScoringPolicy::Cumulative,
            value: steps_done,
        }
    }

    pub fn countdown(budget: u32) -> Self {
        Self {
            policy: ScoringPolicy::Countdown,
            value: budget,
        }
    }

    /// Record one tile crossing. Returns true if a countdown budget is now spent.
    pub fn record_step(&mut self) -> bool {
        match self.policy {
            ScoringPolicy::Cumulative => {
                self.value = self.value.saturating_add(1);
                false
            }
            ScoringPolicy::Countdown => {
                self.value = self.value.saturating_sub(1);
                self.value == 0
            }
        }
    }

    /// Failure penalty, floored at zero. Countdown budgets are not penalized.
    pub fn apply_penalty(&mut self, penalty: u32) {
        if self.policy == ScoringPolicy::Cumulative {
            self.value = self.value.saturating_sub(penalty);
        }
    }

    /// Score carried into a new session: cumulative keeps counting,
    /// countdown gets a fresh budget.
    pub fn for_new_session(self, budget: u32) -> Self {
        match self.policy {
            ScoringPolicy::Cumulative => self,
            ScoringPolicy::Countdown => Self::countdown(budget),
        }
    }
}
