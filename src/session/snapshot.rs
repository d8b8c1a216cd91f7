//! Observer snapshots.
//!
//! A snapshot is everything a renderer needs for one frame, published by
//! value. The deck inside is an `im` structural share, so taking one is
//! cheap and the renderer can never race a choreography step.

use serde::{Deserialize, Serialize};

use crate::core::{Difficulty, Mode};
use crate::deck::Deck;
use crate::session::Phase;

/// A point-in-time view of a session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub deck: Deck,
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub phase: Phase,
    pub score: u32,
    pub best_score: u32,
    pub new_best: bool,
    /// Hearts remaining (Simple mode).
    pub hearts: u32,
    /// Countdown seconds remaining (Flash mode).
    pub seconds_left: u32,
    pub max_value: u32,
    pub lost: bool,
    /// Has the opening deal completed (input been enabled) this run?
    pub dealt: bool,
    pub show_all_confirm: bool,
    pub show_one_armed: bool,
    pub notice: Option<String>,
    pub share_label: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Card, CardValue};

    #[test]
    fn test_snapshot_serde_round_trip() {
        let snapshot = SessionSnapshot {
            deck: Deck::from_cards(vec![
                Card::hidden(CardValue::Number(2)),
                Card::hidden(CardValue::Joker),
                Card::shown(CardValue::Number(4)).with_time_bonus(5),
                Card::hidden(CardValue::Wildcard),
            ]),
            mode: Mode::Flash,
            difficulty: Difficulty::Easy,
            phase: Phase::AwaitingSecond { first: 2 },
            score: 24,
            best_score: 128,
            new_best: false,
            hearts: 0,
            seconds_left: 42,
            max_value: 8,
            lost: false,
            dealt: true,
            show_all_confirm: false,
            show_one_armed: true,
            notice: Some("Choose a card, or tap again to cancel".into()),
            share_label: "Share your score".into(),
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: SessionSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(back.deck, snapshot.deck);
        assert_eq!(back.phase, snapshot.phase);
        assert_eq!(back.seconds_left, 42);
        assert_eq!(back.notice.as_deref(), snapshot.notice.as_deref());
    }
}
