//! The deck: an ordered board of card slots.
//!
//! ## Snapshot model
//!
//! The deck stores its cards in an [`im::Vector`], so cloning a deck is an
//! O(1) structural share. The session hands clones to observers instead of
//! aliases; a renderer can hold a snapshot across frames while choreography
//! keeps mutating the live deck.
//!
//! ## Bulk operations
//!
//! `show_all` / `hide_all` / `show_at` / `hide_at` skip busy cards
//! (`Loading`/`Removing`) - a slot that is mid-removal keeps its state until
//! the regeneration step replaces it.

pub mod card;
pub mod generator;

pub use card::{Card, CardState, CardValue};
pub use generator::{generate_card, generate_solvable, generate_value, has_solution};

use serde::{Deserialize, Serialize};

use crate::core::GameRng;

/// Ordered collection of `grid_size²` card slots.
///
/// Position is the sole identity of a card; no card persists identity
/// across a regeneration of its slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: im::Vector<Card>,
    grid_size: usize,
}

impl Deck {
    /// A fresh board: `grid_size²` face-up cards all holding `init_value`.
    #[must_use]
    pub fn filled(grid_size: usize, init_value: u32) -> Self {
        assert!(grid_size > 0, "grid must have at least one card");
        let cards = (0..grid_size * grid_size)
            .map(|_| Card::shown(CardValue::Number(init_value)))
            .collect();
        Self { cards, grid_size }
    }

    /// Build a deck from explicit cards. The length must be a perfect
    /// square (boards are always `n × n`).
    #[must_use]
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let cards: im::Vector<Card> = cards.into_iter().collect();
        let grid_size = (cards.len() as f64).sqrt() as usize;
        assert_eq!(
            grid_size * grid_size,
            cards.len(),
            "deck length must be a perfect square"
        );
        Self { cards, grid_size }
    }

    /// Grid edge length.
    #[must_use]
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Number of card slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True if the deck holds no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The card at `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    /// Iterate over all slots in board order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Replace the card at `index` wholesale.
    pub fn put(&mut self, index: usize, card: Card) {
        if index < self.cards.len() {
            self.cards.set(index, card);
        }
    }

    /// Drive the state of the slot at `index` (no busy check - this is the
    /// choreography's own transition, not a click).
    pub fn set_state(&mut self, index: usize, state: CardState) {
        if let Some(card) = self.cards.get_mut(index) {
            card.state = state;
        }
    }

    /// Reveal one card, unless it is busy.
    pub fn show_at(&mut self, index: usize) {
        if let Some(card) = self.cards.get_mut(index) {
            if !card.state.is_busy() {
                card.state = CardState::Shown;
            }
        }
    }

    /// Hide one card, unless it is busy.
    pub fn hide_at(&mut self, index: usize) {
        if let Some(card) = self.cards.get_mut(index) {
            if !card.state.is_busy() {
                card.state = CardState::Hidden;
            }
        }
    }

    /// Reveal every non-busy card.
    pub fn show_all(&mut self) {
        for card in self.cards.iter_mut() {
            if !card.state.is_busy() {
                card.state = CardState::Shown;
            }
        }
    }

    /// Hide every non-busy card.
    pub fn hide_all(&mut self) {
        for card in self.cards.iter_mut() {
            if !card.state.is_busy() {
                card.state = CardState::Hidden;
            }
        }
    }

    /// Uniform random permutation of the whole board around one protected
    /// slot: every other card is shuffled, then the protected card is
    /// reinserted at a uniformly random position. Returns the protected
    /// card's new index.
    ///
    /// The value multiset is always preserved.
    pub fn shuffle_except(&mut self, protected: usize, rng: &mut GameRng) -> usize {
        assert!(protected < self.cards.len(), "protected index out of range");
        if self.cards.len() < 2 {
            return protected;
        }

        let mut cards: Vec<Card> = self.cards.iter().copied().collect();
        let protected_card = cards.remove(protected);
        rng.shuffle(&mut cards);

        let new_index = rng.gen_range_usize(0..cards.len() + 1);
        cards.insert(new_index, protected_card);

        self.cards = cards.into_iter().collect();
        new_index
    }
}
