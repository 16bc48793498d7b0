//! Voting round state machine
//!
//! A round is either collecting votes (hidden) or revealed. Both
//! transitions are idempotent so that replayed or reordered broadcasts
//! cannot push clients apart.

use crate::models::Vote;

/// Round phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Collecting,
    Revealed,
}

/// What a reset changed locally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetOutcome {
    pub phase_changed: bool,
    pub vote_cleared: bool,
}

/// Room-wide phase plus this client's own vote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Round {
    phase: Phase,
    vote: Option<Vote>,
}

impl Round {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_revealed(&self) -> bool {
        self.phase == Phase::Revealed
    }

    pub fn vote(&self) -> Option<&Vote> {
        self.vote.as_ref()
    }

    /// Set or clear the own vote. Legal in any phase.
    pub fn cast(&mut self, vote: Option<Vote>) -> bool {
        if self.vote == vote {
            return false;
        }
        self.vote = vote;
        true
    }

    /// `Collecting -> Revealed`; returns false when already revealed
    pub fn reveal(&mut self) -> bool {
        if self.phase == Phase::Revealed {
            return false;
        }
        self.phase = Phase::Revealed;
        true
    }

    /// `Revealed -> Collecting`, always clearing the own vote
    pub fn reset(&mut self) -> ResetOutcome {
        let phase_changed = self.phase == Phase::Revealed;
        self.phase = Phase::Collecting;
        let vote_cleared = self.vote.take().is_some();
        ResetOutcome {
            phase_changed,
            vote_cleared,
        }
    }
}
