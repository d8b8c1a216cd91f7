//! Exhaustive match-resolution table tests.
//!
//! Every ordered pair over {number, Wildcard, Joker} is pinned here,
//! including the cases that are unreachable in play.

use flip_engine::{resolve_pair, Card, CardValue, MatchOutcome};

const MAX: u32 = 64;

fn card(value: CardValue) -> Card {
    Card::hidden(value)
}

fn resolve(a: CardValue, b: CardValue) -> MatchOutcome {
    resolve_pair(&card(a), &card(b), MAX)
}

// =============================================================================
// Joker Cases
// =============================================================================

#[test]
fn test_joker_then_number_doubles_the_number() {
    assert_eq!(
        resolve(CardValue::Joker, CardValue::Number(8)),
        MatchOutcome::Merge(16)
    );
}

#[test]
fn test_number_then_joker_doubles_the_number() {
    assert_eq!(
        resolve(CardValue::Number(32), CardValue::Joker),
        MatchOutcome::Merge(64)
    );
}

#[test]
fn test_joker_joker_doubles_max() {
    assert_eq!(
        resolve(CardValue::Joker, CardValue::Joker),
        MatchOutcome::Merge(MAX * 2)
    );
}

#[test]
fn test_joker_wildcard_both_orders_double_max() {
    assert_eq!(
        resolve(CardValue::Joker, CardValue::Wildcard),
        MatchOutcome::Merge(MAX * 2)
    );
    assert_eq!(
        resolve(CardValue::Wildcard, CardValue::Joker),
        MatchOutcome::Merge(MAX * 2)
    );
}

// =============================================================================
// Numeric Cases
// =============================================================================

#[test]
fn test_equal_numbers_double_the_shared_value() {
    for value in [2u32, 4, 8, 16, 32, 64, 128, 256, 512, 1024] {
        assert_eq!(
            resolve(CardValue::Number(value), CardValue::Number(value)),
            MatchOutcome::Merge(value * 2)
        );
    }
}

#[test]
fn test_unequal_numbers_mismatch_both_orders() {
    assert_eq!(
        resolve(CardValue::Number(2), CardValue::Number(4)),
        MatchOutcome::Mismatch
    );
    assert_eq!(
        resolve(CardValue::Number(4), CardValue::Number(2)),
        MatchOutcome::Mismatch
    );
}

// =============================================================================
// Wildcard Cases (unreachable in play, pinned anyway)
// =============================================================================

#[test]
fn test_wildcard_with_number_mismatches() {
    assert_eq!(
        resolve(CardValue::Wildcard, CardValue::Number(8)),
        MatchOutcome::Mismatch
    );
    assert_eq!(
        resolve(CardValue::Number(8), CardValue::Wildcard),
        MatchOutcome::Mismatch
    );
}

#[test]
fn test_wildcard_wildcard_mismatches() {
    assert_eq!(
        resolve(CardValue::Wildcard, CardValue::Wildcard),
        MatchOutcome::Mismatch
    );
}

// =============================================================================
// Purity
// =============================================================================

#[test]
fn test_resolution_ignores_card_state_and_bonus() {
    let shown = Card::shown(CardValue::Number(8)).with_time_bonus(10);
    let hidden = Card::hidden(CardValue::Number(8));

    assert_eq!(resolve_pair(&shown, &hidden, MAX), MatchOutcome::Merge(16));
}

#[test]
fn test_max_only_affects_special_pairs() {
    let eight = card(CardValue::Number(8));

    assert_eq!(resolve_pair(&eight, &eight, 2), MatchOutcome::Merge(16));
    assert_eq!(resolve_pair(&eight, &eight, 4096), MatchOutcome::Merge(16));

    let joker = card(CardValue::Joker);
    assert_eq!(resolve_pair(&joker, &joker, 2), MatchOutcome::Merge(4));
    assert_eq!(
        resolve_pair(&joker, &joker, 4096),
        MatchOutcome::Merge(8192)
    );
}
