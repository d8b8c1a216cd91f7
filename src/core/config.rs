//! Engine configuration types.
//!
//! Hosts configure the engine at session start by providing:
//! - `DelayTable`: every choreography step delay, in milliseconds
//! - `InitTable`: initial hearts, initial card value, Flash countdown start
//! - `Difficulty`: grid size selection
//!
//! The engine never hardcodes a timing constant - the defaults here are the
//! shipped product values, and every one of them is tunable.

use serde::{Deserialize, Serialize};

/// Session variant.
///
/// `Simple` plays against a small pool of hearts; `Flash` plays against a
/// one-second countdown that successful merges can extend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Simple,
    Flash,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Simple => write!(f, "simple"),
            Mode::Flash => write!(f, "flash"),
        }
    }
}

/// Board difficulty. Selects the grid edge length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Grid edge length for this difficulty.
    #[must_use]
    pub const fn grid_size(self) -> usize {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium => 4,
            Difficulty::Hard => 5,
        }
    }

    /// Total cards on the board (`grid_size²`).
    #[must_use]
    pub const fn card_count(self) -> usize {
        self.grid_size() * self.grid_size()
    }
}

/// Per-step choreography delays, in milliseconds.
///
/// Field names follow the product's tuning sheet; each is the wait before
/// one specific step of a reveal/merge/regenerate sequence fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayTable {
    /// How long a hint (show-one or show-all) keeps cards revealed.
    pub show_all_diamonds: u64,
    /// Wait before a merged-away card is marked `Removing`.
    pub remove_card_on_success: u64,
    /// Extra wait before the wildcard reshuffle permutes the deck.
    pub show_all_shuffle: u64,
    /// Wait between removal and the regenerated replacement appearing.
    pub generate_card_on_success: u64,
    /// Wait before the deck hides again at the end of the wildcard flow.
    pub hide_all_shuffle: u64,
    /// Wait before a successful pair hides again.
    pub hide_on_success: u64,
    /// Wait before a mismatched pair hides again.
    pub hide_on_error: u64,
    /// Per-card stagger of the opening deal reveal.
    pub first_show_delay: u64,
    /// Base wait before the opening deal hides the deck.
    pub first_hide_all: u64,
    /// Wait before play resumes after a continue.
    pub continue_resume: u64,
    /// Wait before a lost deck is revealed face-up.
    pub lose_reveal: u64,
    /// Auto-dismiss window for insufficient-resource notices.
    pub notice: u64,
}

impl Default for DelayTable {
    fn default() -> Self {
        Self {
            show_all_diamonds: 2000,
            remove_card_on_success: 500,
            show_all_shuffle: 400,
            generate_card_on_success: 300,
            hide_all_shuffle: 300,
            hide_on_success: 350,
            hide_on_error: 900,
            first_show_delay: 40,
            first_hide_all: 300,
            continue_resume: 700,
            lose_reveal: 100,
            notice: 2000,
        }
    }
}

/// Initial session values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitTable {
    /// Hearts at the start of a Simple run.
    pub hearts: u32,
    /// Value every card holds after a deal.
    pub init_value: u32,
    /// Seconds on the Flash countdown at the start of a run.
    pub flash_seconds: u32,
}

impl Default for InitTable {
    fn default() -> Self {
        Self {
            hearts: 3,
            init_value: 2,
            flash_seconds: 60,
        }
    }
}

/// Complete engine configuration.
///
/// ```
/// use flip_engine::core::EngineConfig;
///
/// let config = EngineConfig::default().with_flash_seconds(90);
/// assert_eq!(config.init.flash_seconds, 90);
/// assert_eq!(config.delays.hide_on_error, 900);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub delays: DelayTable,
    pub init: InitTable,
}

impl EngineConfig {
    /// Replace the delay table.
    #[must_use]
    pub fn with_delays(mut self, delays: DelayTable) -> Self {
        self.delays = delays;
        self
    }

    /// Set the initial heart count for Simple runs.
    #[must_use]
    pub fn with_hearts(mut self, hearts: u32) -> Self {
        assert!(hearts > 0, "Simple mode needs at least one heart");
        self.init.hearts = hearts;
        self
    }

    /// Set the Flash countdown start, in seconds.
    #[must_use]
    pub fn with_flash_seconds(mut self, seconds: u32) -> Self {
        assert!(seconds > 0, "Flash mode needs a positive countdown");
        self.init.flash_seconds = seconds;
        self
    }

    /// How long the opening deal stays revealed for the given difficulty:
    /// `first_hide_all + card_count × first_show_delay`.
    #[must_use]
    pub fn deal_reveal_ms(&self, difficulty: Difficulty) -> u64 {
        self.delays.first_hide_all + difficulty.card_count() as u64 * self.delays.first_show_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_sizes() {
        assert_eq!(Difficulty::Easy.grid_size(), 3);
        assert_eq!(Difficulty::Medium.grid_size(), 4);
        assert_eq!(Difficulty::Hard.grid_size(), 5);
        assert_eq!(Difficulty::Hard.card_count(), 25);
    }

    #[test]
    fn test_default_matches_product_constants() {
        let config = EngineConfig::default();

        assert_eq!(config.delays.show_all_diamonds, 2000);
        assert_eq!(config.delays.remove_card_on_success, 500);
        assert_eq!(config.delays.show_all_shuffle, 400);
        assert_eq!(config.delays.generate_card_on_success, 300);
        assert_eq!(config.delays.hide_all_shuffle, 300);
        assert_eq!(config.delays.hide_on_success, 350);
        assert_eq!(config.delays.hide_on_error, 900);
        assert_eq!(config.delays.first_show_delay, 40);
        assert_eq!(config.delays.first_hide_all, 300);
        assert_eq!(config.init.hearts, 3);
        assert_eq!(config.init.init_value, 2);
        assert_eq!(config.init.flash_seconds, 60);
    }

    #[test]
    fn test_deal_reveal_ms() {
        let config = EngineConfig::default();

        // 300 + 16 * 40
        assert_eq!(config.deal_reveal_ms(Difficulty::Medium), 940);
        // 300 + 9 * 40
        assert_eq!(config.deal_reveal_ms(Difficulty::Easy), 660);
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::default().with_hearts(5).with_flash_seconds(30);

        assert_eq!(config.init.hearts, 5);
        assert_eq!(config.init.flash_seconds, 30);
    }

    #[test]
    #[should_panic(expected = "at least one heart")]
    fn test_zero_hearts_rejected() {
        let _ = EngineConfig::default().with_hearts(0);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::Simple.to_string(), "simple");
        assert_eq!(Mode::Flash.to_string(), "flash");
    }
}
