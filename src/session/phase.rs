//! The session phase machine.
//!
//! A session is always in exactly one phase, and [`Phase::accepts_clicks`]
//! is the single gate for new input - no scattered lock flags. At most one
//! macro-sequence (wildcard flow, success flow, mismatch flow, hint reveal)
//! is in flight at a time.

use serde::{Deserialize, Serialize};

/// Where the session is in its click/choreography cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Opening deal (or continue-resume window); input disabled.
    #[default]
    Dealing,
    /// No card pending; clicks open a first card.
    Idle,
    /// One card open, waiting for its partner.
    AwaitingSecond { first: usize },
    /// Wildcard reshuffle-and-regenerate sequence in flight.
    WildcardFlow,
    /// Merge choreography in flight.
    SuccessFlow,
    /// Mismatch hide sequence in flight.
    MismatchFlow,
    /// A show-one hint is holding a card revealed.
    ShowOneReveal,
    /// A show-all hint is holding the deck revealed.
    ShowAllReveal,
    /// Terminal loss; only continue/retry leave this phase.
    Lost,
}

impl Phase {
    /// Can a tile click start something right now?
    #[must_use]
    pub const fn accepts_clicks(self) -> bool {
        matches!(self, Phase::Idle | Phase::AwaitingSecond { .. })
    }

    /// The index of the card waiting for a partner, if any.
    #[must_use]
    pub const fn opened(self) -> Option<usize> {
        match self {
            Phase::AwaitingSecond { first } => Some(first),
            _ => None,
        }
    }
}
