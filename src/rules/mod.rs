//! Pure match resolution for a pair of opened cards.
//!
//! Resolution never touches session state: it looks at two card values and
//! the session's maximum merge value and answers with a merge result or a
//! mismatch. Opening a Wildcard never reaches this table - the session
//! routes it to the dedicated reshuffle flow before a partner is chosen.

use serde::{Deserialize, Serialize};

use crate::deck::{Card, CardValue};

/// Outcome of comparing two opened cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// The pair merges into this value.
    Merge(u32),
    /// The pair does not match.
    Mismatch,
}

impl MatchOutcome {
    /// The merge value, if the pair matched.
    #[must_use]
    pub const fn merge_value(self) -> Option<u32> {
        match self {
            MatchOutcome::Merge(value) => Some(value),
            MatchOutcome::Mismatch => None,
        }
    }
}

/// Resolve an ordered pair of opened cards.
///
/// | first        | second       | result       |
/// |--------------|--------------|--------------|
/// | Joker        | number       | number × 2   |
/// | number       | Joker        | number × 2   |
/// | Joker        | Joker        | max × 2      |
/// | Joker        | Wildcard     | max × 2      |
/// | Wildcard     | Joker        | max × 2      |
/// | equal numbers| equal numbers| value × 2    |
/// | anything else|              | mismatch     |
///
/// A Wildcard paired with a number mismatches, but the case is unreachable
/// in play: a Wildcard click always takes the dedicated flow instead of
/// waiting as the first card.
#[must_use]
pub fn resolve_pair(first: &Card, second: &Card, max: u32) -> MatchOutcome {
    match (first.value, second.value) {
        (CardValue::Joker, CardValue::Number(n)) | (CardValue::Number(n), CardValue::Joker) => {
            MatchOutcome::Merge(n * 2)
        }
        (CardValue::Joker, CardValue::Joker)
        | (CardValue::Joker, CardValue::Wildcard)
        | (CardValue::Wildcard, CardValue::Joker) => MatchOutcome::Merge(max * 2),
        (CardValue::Number(a), CardValue::Number(b)) if a == b => MatchOutcome::Merge(a * 2),
        _ => MatchOutcome::Mismatch,
    }
}
