//! Card value generation and the solvability guarantee.
//!
//! ## Weighted draw
//!
//! `generate_value` rolls 15% Wildcard, 15% Joker, 40% `max/2`, 30% `max/4`
//! (numeric arms floor at 2; the quarter arm falls back to `max/2` until
//! `max ≥ 8`).
//!
//! ## Solvability
//!
//! A deck is solvable when a special card is present or some numeric value
//! appears at least twice. `generate_solvable` never publishes a card that
//! would leave the board unsolvable: if the candidate fails the probe, it is
//! replaced by a duplicate of a numeric value already on the board, which
//! forces a pair. Generation therefore cannot fail - this is a construction
//! invariant, not a handled runtime error.

use rustc_hash::FxHashSet;

use super::card::{Card, CardValue};
use super::Deck;
use crate::core::GameRng;

/// Draw weights: Wildcard, Joker, `max/2`, `max/4`.
const VALUE_WEIGHTS: [f32; 4] = [0.15, 0.15, 0.40, 0.30];

/// Chance that a freshly generated numeric card carries a time bonus
/// (Flash mode only).
const TIME_BONUS_CHANCE: f64 = 0.45;

/// Time bonus magnitudes, in seconds.
const TIME_BONUS_SECONDS: [u32; 3] = [2, 5, 10];

/// Draw a new card value from the weighted distribution.
///
/// `max` is the largest merge value seen this session; numeric arms never
/// go below 2.
#[must_use]
pub fn generate_value(max: u32, rng: &mut GameRng) -> CardValue {
    let half = (max / 2).max(2);
    let quarter = (max / 4).max(2);

    match rng.choose_weighted(&VALUE_WEIGHTS).unwrap_or(2) {
        0 => CardValue::Wildcard,
        1 => CardValue::Joker,
        2 => CardValue::Number(half),
        _ if max >= 8 => CardValue::Number(quarter),
        _ => CardValue::Number(half),
    }
}

/// Draw a complete face-up card, rolling a time bonus for numeric cards in
/// Flash mode.
#[must_use]
pub fn generate_card(max: u32, flash: bool, rng: &mut GameRng) -> Card {
    let value = generate_value(max, rng);
    let card = Card::shown(value);

    if flash && !value.is_special() && rng.gen_bool(TIME_BONUS_CHANCE) {
        let seconds = *rng.choose(&TIME_BONUS_SECONDS).unwrap_or(&TIME_BONUS_SECONDS[0]);
        return card.with_time_bonus(seconds);
    }

    card
}

/// True iff the deck holds at least one resolvable match: a special card,
/// or two cards sharing a numeric value.
#[must_use]
pub fn has_solution(deck: &Deck) -> bool {
    let mut seen = FxHashSet::default();

    for card in deck.iter() {
        match card.value {
            CardValue::Wildcard | CardValue::Joker => return true,
            CardValue::Number(n) => {
                if !seen.insert(n) {
                    return true;
                }
            }
        }
    }

    false
}

/// Draw a card destined for `target` that keeps the deck solvable.
///
/// The candidate is placed on a probe copy of the deck; if the probe fails
/// [`has_solution`], the candidate is discarded and replaced by a duplicate
/// of a numeric value drawn from the *other* slots, which guarantees a
/// pair. The time bonus is re-rolled independently with the same chance.
#[must_use]
pub fn generate_solvable(
    max: u32,
    deck: &Deck,
    target: usize,
    flash: bool,
    rng: &mut GameRng,
) -> Card {
    let candidate = generate_card(max, flash, rng);

    let mut probe = deck.clone();
    probe.put(target, candidate);
    if has_solution(&probe) {
        return candidate;
    }

    // Force a pair. The slot being replaced is excluded: duplicating its
    // outgoing value would not leave two copies on the board.
    let numeric: Vec<u32> = deck
        .iter()
        .enumerate()
        .filter(|&(index, _)| index != target)
        .filter_map(|(_, card)| card.value.as_number())
        .collect();
    let value = rng.choose(&numeric).copied().unwrap_or(2);

    let card = Card::shown(CardValue::Number(value));
    if flash && rng.gen_bool(TIME_BONUS_CHANCE) {
        let seconds = *rng.choose(&TIME_BONUS_SECONDS).unwrap_or(&TIME_BONUS_SECONDS[0]);
        return card.with_time_bonus(seconds);
    }

    card
}
