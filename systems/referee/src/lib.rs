#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides whether the current level has been won or lost.

use graph_chase_core::{EnemyView, Event, PlayerSnapshot};

/// Result of the level as judged by the referee.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The player lives and enemies remain.
    #[default]
    InProgress,
    /// Every enemy died while the player was alive.
    Won,
    /// An enemy caught the player.
    Lost,
}

impl Outcome {
    /// Reports whether the level reached a final outcome.
    #[must_use]
    pub const fn is_decided(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Referee that turns world events and snapshots into a sticky [`Outcome`].
#[derive(Clone, Debug, Default)]
pub struct Referee {
    outcome: Outcome,
}

impl Referee {
    /// Creates a referee for a level that has not been decided yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            outcome: Outcome::InProgress,
        }
    }

    /// Outcome decided so far.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Consumes the events of one step together with the resulting state.
    ///
    /// A decision is kept until a `LevelConfigured` event starts a new level.
    /// Catching the player wins over clearing the board within the same step.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: &PlayerSnapshot,
        enemies: &EnemyView,
    ) -> Outcome {
        for event in events {
            match event {
                Event::LevelConfigured { .. } => self.outcome = Outcome::InProgress,
                Event::PlayerCaught { .. } if !self.outcome.is_decided() => {
                    self.outcome = Outcome::Lost;
                }
                _ => {}
            }
        }

        if self.outcome.is_decided() {
            return self.outcome;
        }

        if !player.alive {
            self.outcome = Outcome::Lost;
        } else if enemies.is_empty() {
            self.outcome = Outcome::Won;
        }
        self.outcome
    }
}
