//! Card data: face values and the per-card state machine.
//!
//! A card's value is numeric or one of the two specials:
//! - **Wildcard** ("X"): never pairs; opening it triggers the
//!   reshuffle-and-regenerate flow.
//! - **Joker** ("J"): pairs with any numeric card, doubling it.
//!
//! Numeric values only ever equal the initial value or a previously
//! produced merge result, so they grow by doubling.
//!
//! Card state transitions are strictly linear: `Shown`/`Hidden` flip freely,
//! a merged-away slot goes `Loading → Removing → fresh Shown`. Cards in
//! `Loading` or `Removing` ignore clicks and are skipped by bulk operations.

use serde::{Deserialize, Serialize};

/// Face value of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardValue {
    Number(u32),
    Wildcard,
    Joker,
}

impl CardValue {
    /// Is this a Wildcard or Joker?
    #[must_use]
    pub const fn is_special(self) -> bool {
        matches!(self, CardValue::Wildcard | CardValue::Joker)
    }

    /// The numeric value, if any.
    #[must_use]
    pub const fn as_number(self) -> Option<u32> {
        match self {
            CardValue::Number(n) => Some(n),
            _ => None,
        }
    }
}

impl std::fmt::Display for CardValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardValue::Number(n) => write!(f, "{n}"),
            CardValue::Wildcard => write!(f, "X"),
            CardValue::Joker => write!(f, "J"),
        }
    }
}

/// Visual/lifecycle state of a card slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardState {
    Shown,
    #[default]
    Hidden,
    /// First card of a resolved pair, waiting to be removed.
    Loading,
    /// Slot being cleared before a fresh card is generated into it.
    Removing,
}

impl CardState {
    /// Busy cards (mid-removal) ignore clicks and bulk hide/show.
    #[must_use]
    pub const fn is_busy(self) -> bool {
        matches!(self, CardState::Loading | CardState::Removing)
    }
}

/// A single card slot on the board.
///
/// Position in the deck is the card's only identity; nothing persists
/// across a regeneration of the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub value: CardValue,
    pub state: CardState,
    /// Seconds added to the Flash countdown when this card merges.
    /// Only ever present on numeric cards.
    pub time_bonus: Option<u32>,
}

impl Card {
    /// A face-up card with the given value and no time bonus.
    #[must_use]
    pub const fn shown(value: CardValue) -> Self {
        Self {
            value,
            state: CardState::Shown,
            time_bonus: None,
        }
    }

    /// A face-down card with the given value and no time bonus.
    #[must_use]
    pub const fn hidden(value: CardValue) -> Self {
        Self {
            value,
            state: CardState::Hidden,
            time_bonus: None,
        }
    }

    /// Attach a time bonus.
    #[must_use]
    pub const fn with_time_bonus(mut self, seconds: u32) -> Self {
        self.time_bonus = Some(seconds);
        self
    }
}
