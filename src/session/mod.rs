//! The match engine session.
//!
//! A [`Session`] owns one run of the game: the deck, the phase machine, the
//! scheduled choreography steps, the score tracker, the mode state (hearts
//! or countdown), the hint gate, and the injected host capabilities.
//!
//! ## Driving a session
//!
//! The host feeds input (`click`, hint requests, `continue_run`, `retry`)
//! and pumps time with [`Session::advance`] against a logical clock - the
//! engine never reads a wall clock. Observation is pull-based: accessors
//! and [`Session::snapshot`] hand out values (the deck is an `im`
//! structural share), never aliases into live state.
//!
//! ```
//! use flip_engine::core::{Difficulty, Mode};
//! use flip_engine::session::Session;
//!
//! let mut session = Session::new(Mode::Simple, Difficulty::Medium, 42);
//!
//! // The opening deal shows every card, then hides them and enables input.
//! session.advance(940);
//! session.click(0);
//! session.click(1);
//! session.advance(3000);
//! assert_eq!(session.score(), 4);
//! ```

pub mod phase;
pub mod score;
pub mod snapshot;
mod tasks;

pub use phase::Phase;
pub use score::ScoreTracker;
pub use snapshot::SessionSnapshot;

use tracing::{debug, trace, warn};

use crate::core::{Difficulty, EngineConfig, GameRng, Mode};
use crate::deck::{generate_solvable, Card, CardState, CardValue, Deck};
use crate::host::{Collaborators, Cue, ResourceKind};
use crate::rules::{resolve_pair, MatchOutcome};
use tasks::{Step, TaskId, TaskQueue};

/// One run of the match game.
pub struct Session {
    config: EngineConfig,
    mode: Mode,
    difficulty: Difficulty,
    collab: Collaborators,

    deck: Deck,
    rng: GameRng,
    phase: Phase,
    tasks: TaskQueue,
    now_ms: u64,

    score: ScoreTracker,
    max_value: u32,
    hearts: u32,
    seconds_left: u32,
    tick_acc_ms: u64,

    dealt: bool,
    lost: bool,

    /// Tracked slot of the wildcard across its reshuffle.
    wildcard_slot: Option<usize>,
    /// Phase to restore when a hint reveal window closes.
    resume_phase: Option<Phase>,
    show_one_armed: bool,
    show_all_confirm: bool,
    notice: Option<String>,
    notice_task: Option<TaskId>,
}

impl Session {
    /// Start a session with default configuration and no-op/in-memory
    /// collaborators.
    #[must_use]
    pub fn new(mode: Mode, difficulty: Difficulty, seed: u64) -> Self {
        Self::with_collaborators(
            mode,
            difficulty,
            EngineConfig::default(),
            Collaborators::default(),
            seed,
        )
    }

    /// Start a session with explicit configuration and host capabilities.
    #[must_use]
    pub fn with_collaborators(
        mode: Mode,
        difficulty: Difficulty,
        config: EngineConfig,
        collab: Collaborators,
        seed: u64,
    ) -> Self {
        let stored_best = collab.scores.best(mode);
        let mut session = Self {
            config,
            mode,
            difficulty,
            collab,
            deck: Deck::filled(difficulty.grid_size(), config.init.init_value),
            rng: GameRng::new(seed),
            phase: Phase::Dealing,
            tasks: TaskQueue::default(),
            now_ms: 0,
            score: ScoreTracker::new(mode, stored_best),
            max_value: 1,
            hearts: config.init.hearts,
            seconds_left: config.init.flash_seconds,
            tick_acc_ms: 0,
            dealt: false,
            lost: false,
            wildcard_slot: None,
            resume_phase: None,
            show_one_armed: false,
            show_all_confirm: false,
            notice: None,
            notice_task: None,
        };
        session.start_deal();
        session
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// A tile click. Out-of-range indexes, busy cards, and clicks while a
    /// sequence is in flight are silently ignored.
    pub fn click(&mut self, index: usize) {
        self.collab.audio.play(Cue::Click);

        if self.lost || !self.phase.accepts_clicks() {
            return;
        }
        let Some(card) = self.deck.get(index).copied() else {
            return;
        };
        if card.state.is_busy() {
            return;
        }

        // A wildcard takes its dedicated flow no matter what else is going
        // on - it never pairs and never consumes an armed hint.
        if card.value == CardValue::Wildcard {
            self.start_wildcard_flow(index);
            return;
        }

        if self.show_one_armed {
            self.consume_show_one(index);
            return;
        }

        self.deck.show_at(index);

        match self.phase {
            Phase::Idle => {
                self.phase = Phase::AwaitingSecond { first: index };
            }
            Phase::AwaitingSecond { first } if first == index => {
                // Clicking the open card again changes nothing.
            }
            Phase::AwaitingSecond { first } => {
                self.resolve_second(first, index);
            }
            _ => {}
        }
    }

    /// Pump the logical clock. Fires every due choreography step, then the
    /// Flash countdown.
    pub fn advance(&mut self, elapsed_ms: u64) {
        self.now_ms += elapsed_ms;

        while let Some((id, step)) = self.tasks.pop_due(self.now_ms) {
            self.apply(id, step);
        }

        if self.mode == Mode::Flash && self.countdown_active() {
            self.tick_acc_ms += elapsed_ms;
            while self.tick_acc_ms >= 1000 && self.countdown_active() {
                self.tick_acc_ms -= 1000;
                self.seconds_left -= 1;
                if self.seconds_left == 0 {
                    self.lose_by_timeout();
                }
            }
        }
    }

    /// Arm or disarm the show-one hint. With an empty inventory this
    /// instead hands off to the rewarded-ad collaborator or raises a
    /// notice.
    pub fn toggle_show_one(&mut self) {
        if self.lost {
            return;
        }
        if self.collab.resources.count(ResourceKind::ShowOne) == 0 {
            self.handle_empty_inventory(ResourceKind::ShowOne);
            return;
        }

        self.show_one_armed = !self.show_one_armed;
        if self.show_one_armed {
            self.set_sticky_notice("Choose a card, or tap again to cancel");
        } else {
            self.clear_notice();
        }
    }

    /// Ask to reveal the whole deck. Raises the confirmation flag; the
    /// reveal happens on [`Session::confirm_show_all`]. With an empty
    /// inventory this hands off to the rewarded-ad collaborator or raises
    /// a notice.
    pub fn request_show_all(&mut self) {
        if self.lost || !self.phase.accepts_clicks() {
            return;
        }
        if self.collab.resources.count(ResourceKind::ShowAll) == 0 {
            self.handle_empty_inventory(ResourceKind::ShowAll);
            return;
        }
        self.show_all_confirm = true;
    }

    /// Confirm a pending show-all request: consume one unit and reveal the
    /// deck for the hint window.
    pub fn confirm_show_all(&mut self) {
        if !self.show_all_confirm || self.lost || !self.phase.accepts_clicks() {
            return;
        }
        self.show_all_confirm = false;
        if !self.collab.resources.spend(ResourceKind::ShowAll) {
            self.handle_empty_inventory(ResourceKind::ShowAll);
            return;
        }

        self.deck.show_all();
        self.resume_phase = Some(self.phase);
        self.phase = Phase::ShowAllReveal;
        let due = self.now_ms + self.config.delays.show_all_diamonds;
        self.tasks.schedule(due, Step::HideAfterShowAll);
    }

    /// Dismiss a pending show-all confirmation.
    pub fn cancel_show_all(&mut self) {
        self.show_all_confirm = false;
        self.clear_notice();
    }

    /// Spend one inventory heart to leave the Lost state (Simple mode
    /// only). Hearts reset to one, the deck hides, and play resumes after
    /// the configured delay. Returns `false` when a continue is not
    /// available.
    pub fn continue_run(&mut self) -> bool {
        if self.mode != Mode::Simple || !self.lost {
            return false;
        }
        if !self.collab.resources.spend(ResourceKind::Hearts) {
            return false;
        }

        debug!("continue: spending a heart");
        // The only steps that can be pending in Lost are the lose reveal
        // and a notice dismissal; both belong to the state being left.
        self.tasks.cancel_all();
        self.clear_notice();
        self.lost = false;
        self.hearts = 1;
        self.deck.hide_all();
        self.phase = Phase::Dealing;
        let due = self.now_ms + self.config.delays.continue_resume;
        self.tasks.schedule(due, Step::ResumePlay);
        true
    }

    /// Discard the run and deal a fresh deck. Cancels every pending
    /// choreography step; score and mode state reset, the stored best
    /// survives.
    pub fn retry(&mut self) {
        debug!(mode = %self.mode, cancelled = self.tasks.pending_len(), "retry");
        self.tasks.cancel_all();
        self.deck = Deck::filled(self.difficulty.grid_size(), self.config.init.init_value);
        self.score.reset();
        self.max_value = 1;
        self.hearts = self.config.init.hearts;
        self.seconds_left = self.config.init.flash_seconds;
        self.tick_acc_ms = 0;
        self.dealt = false;
        self.lost = false;
        self.wildcard_slot = None;
        self.resume_phase = None;
        self.show_one_armed = false;
        self.show_all_confirm = false;
        self.notice = None;
        self.notice_task = None;
        self.start_deal();
    }

    // ------------------------------------------------------------------
    // Choreography
    // ------------------------------------------------------------------

    fn start_deal(&mut self) {
        self.phase = Phase::Dealing;
        let due = self.now_ms + self.config.deal_reveal_ms(self.difficulty);
        self.tasks.schedule(due, Step::FinishDeal);
    }

    fn start_wildcard_flow(&mut self, index: usize) {
        debug!(index, "wildcard flow");
        self.phase = Phase::WildcardFlow;
        self.wildcard_slot = Some(index);
        self.deck.show_all();

        let d = &self.config.delays;
        let shuffle_at = d.remove_card_on_success + d.show_all_shuffle;
        let remove_at = shuffle_at + d.remove_card_on_success;
        let generate_at = remove_at + d.generate_card_on_success;
        let finish_at = generate_at + d.hide_all_shuffle + 500;

        self.tasks.schedule(self.now_ms + shuffle_at, Step::WildcardShuffle);
        self.tasks.schedule(self.now_ms + remove_at, Step::WildcardRemove);
        self.tasks
            .schedule(self.now_ms + generate_at, Step::WildcardRegenerate);
        self.tasks.schedule(self.now_ms + finish_at, Step::WildcardFinish);
    }

    fn resolve_second(&mut self, first: usize, second: usize) {
        let (Some(first_card), Some(second_card)) = (
            self.deck.get(first).copied(),
            self.deck.get(second).copied(),
        ) else {
            return;
        };

        match resolve_pair(&first_card, &second_card, self.max_value) {
            MatchOutcome::Merge(value) => {
                self.phase = Phase::SuccessFlow;
                self.deck.set_state(first, CardState::Loading);

                if self.mode == Mode::Flash {
                    let bonus = first_card.time_bonus.unwrap_or(0)
                        + second_card.time_bonus.unwrap_or(0);
                    if bonus > 0 {
                        self.seconds_left += bonus;
                        debug!(bonus, seconds_left = self.seconds_left, "time bonus");
                    }
                }

                self.collab.audio.play(Cue::Correct);
                if self.score.record_merge(value) {
                    self.collab.audio.play(Cue::Unlocked);
                    if let Err(error) = self
                        .collab
                        .scores
                        .write_best(self.mode, self.score.score())
                    {
                        warn!(%error, "best-score write-through failed");
                    }
                }
                if value > self.max_value {
                    self.max_value = value;
                }

                let d = &self.config.delays;
                self.tasks.schedule(
                    self.now_ms + d.remove_card_on_success,
                    Step::MergeWrite {
                        first,
                        second,
                        value,
                    },
                );
                self.tasks.schedule(
                    self.now_ms + d.remove_card_on_success + d.generate_card_on_success,
                    Step::RegenerateFirst { first },
                );
                let finish_at =
                    d.hide_on_success + d.remove_card_on_success + d.generate_card_on_success + 500;
                self.tasks
                    .schedule(self.now_ms + finish_at, Step::SuccessFinish { first, second });
            }
            MatchOutcome::Mismatch => {
                self.collab.audio.play(Cue::Mistake);
                match self.mode {
                    Mode::Simple => {
                        self.hearts = self.hearts.saturating_sub(1);
                        if self.hearts == 0 {
                            self.lose();
                        } else {
                            self.phase = Phase::MismatchFlow;
                            let due = self.now_ms + self.config.delays.hide_on_error + 500;
                            self.tasks.schedule(due, Step::MismatchHide);
                        }
                    }
                    Mode::Flash => {
                        self.phase = Phase::MismatchFlow;
                        let due =
                            self.now_ms + self.config.delays.hide_on_error.saturating_sub(50);
                        self.tasks.schedule(due, Step::MismatchHide);
                    }
                }
            }
        }
    }

    fn apply(&mut self, id: TaskId, step: Step) {
        trace!(?step, now_ms = self.now_ms, "step");
        match step {
            Step::FinishDeal => {
                self.deck.hide_all();
                self.dealt = true;
                self.tick_acc_ms = 0;
                self.phase = Phase::Idle;
                debug!("deal complete, input enabled");
            }
            Step::WildcardShuffle => {
                if let Some(slot) = self.wildcard_slot {
                    let new_slot = self.deck.shuffle_except(slot, &mut self.rng);
                    self.wildcard_slot = Some(new_slot);
                }
            }
            Step::WildcardRemove => {
                if let Some(slot) = self.wildcard_slot {
                    self.deck.set_state(slot, CardState::Removing);
                }
            }
            Step::WildcardRegenerate => {
                if let Some(slot) = self.wildcard_slot {
                    let card = generate_solvable(
                        self.max_value,
                        &self.deck,
                        slot,
                        self.mode == Mode::Flash,
                        &mut self.rng,
                    );
                    self.deck.put(slot, card);
                }
            }
            Step::WildcardFinish => {
                self.deck.hide_all();
                self.wildcard_slot = None;
                self.finish_to_idle();
            }
            Step::MergeWrite {
                first,
                second,
                value,
            } => {
                self.deck
                    .put(second, Card::shown(CardValue::Number(value)));
                self.deck.set_state(first, CardState::Removing);
            }
            Step::RegenerateFirst { first } => {
                let card = generate_solvable(
                    self.max_value,
                    &self.deck,
                    first,
                    self.mode == Mode::Flash,
                    &mut self.rng,
                );
                self.deck.put(first, card);
            }
            Step::SuccessFinish { first, second } => {
                self.deck.hide_at(second);
                self.deck.hide_at(first);
                self.finish_to_idle();
            }
            Step::MismatchHide => {
                self.deck.hide_all();
                self.finish_to_idle();
            }
            Step::LoseReveal => {
                self.deck.show_all();
                self.dealt = false;
            }
            Step::HideShownCard { index } => {
                self.deck.hide_at(index);
                self.finish_reveal();
            }
            Step::HideAfterShowAll => {
                self.deck.hide_all();
                self.finish_reveal();
            }
            Step::DismissNotice => {
                // Only the newest notice owns the dismissal.
                if self.notice_task == Some(id) {
                    self.notice = None;
                    self.notice_task = None;
                }
            }
            Step::ResumePlay => {
                self.dealt = true;
                self.tick_acc_ms = 0;
                self.phase = Phase::Idle;
            }
        }
    }

    /// End a macro-sequence: back to `Idle`, unless the countdown expired
    /// while the sequence was in flight.
    fn finish_to_idle(&mut self) {
        self.phase = if self.lost { Phase::Lost } else { Phase::Idle };
    }

    /// End a hint reveal window, restoring the interrupted phase.
    fn finish_reveal(&mut self) {
        let restored = self.resume_phase.take().unwrap_or(Phase::Idle);
        self.phase = if self.lost { Phase::Lost } else { restored };
    }

    fn consume_show_one(&mut self, index: usize) {
        self.show_one_armed = false;
        self.show_all_confirm = false;
        self.clear_notice();
        if !self.collab.resources.spend(ResourceKind::ShowOne) {
            return;
        }

        self.deck.show_at(index);
        self.resume_phase = Some(self.phase);
        self.phase = Phase::ShowOneReveal;
        let due = self.now_ms + self.config.delays.show_all_diamonds;
        self.tasks.schedule(due, Step::HideShownCard { index });
    }

    fn handle_empty_inventory(&mut self, kind: ResourceKind) {
        if self.collab.ads.ready() {
            if let Some(amount) = self.collab.ads.present(kind) {
                debug!(?kind, amount, "rewarded ad granted");
                self.collab.resources.grant(kind, amount);
            }
            return;
        }

        let label = match kind {
            ResourceKind::ShowAll => "Show All",
            ResourceKind::ShowOne => "Show One",
            ResourceKind::Hearts => "Hearts",
        };
        let id = {
            let due = self.now_ms + self.config.delays.notice;
            self.tasks.schedule(due, Step::DismissNotice)
        };
        self.notice = Some(format!("No \"{label}\" diamonds left :("));
        self.notice_task = Some(id);
    }

    fn set_sticky_notice(&mut self, content: &str) {
        self.notice = Some(content.to_string());
        self.notice_task = None;
    }

    fn clear_notice(&mut self) {
        self.notice = None;
        self.notice_task = None;
    }

    fn lose(&mut self) {
        debug!(score = self.score.score(), "lost");
        self.lost = true;
        self.phase = Phase::Lost;
        let due = self.now_ms + self.config.delays.lose_reveal;
        self.tasks.schedule(due, Step::LoseReveal);
    }

    fn lose_by_timeout(&mut self) {
        debug!(score = self.score.score(), "countdown expired");
        self.lost = true;
        self.dealt = false;
        if self.phase.accepts_clicks() {
            self.phase = Phase::Lost;
        }
        // An in-flight sequence finishes its deck work; finish_to_idle
        // lands it in Lost instead of Idle.
    }

    fn countdown_active(&self) -> bool {
        self.mode == Mode::Flash && self.dealt && !self.lost && self.seconds_left > 0
    }

    // ------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------

    /// A structural-share snapshot of the deck.
    #[must_use]
    pub fn deck(&self) -> Deck {
        self.deck.clone()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The card waiting for a partner, if any.
    #[must_use]
    pub fn opened(&self) -> Option<usize> {
        self.phase.opened()
    }

    /// Running score.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score.score()
    }

    /// Best score for this mode, including any best set this run.
    #[must_use]
    pub fn best_score(&self) -> u32 {
        self.score.best()
    }

    /// Did this run set a new best?
    #[must_use]
    pub fn is_new_best(&self) -> bool {
        self.score.is_new_best()
    }

    /// Largest merge value seen this run.
    #[must_use]
    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    /// Hearts remaining (Simple mode).
    #[must_use]
    pub fn hearts(&self) -> u32 {
        self.hearts
    }

    /// Countdown seconds remaining (Flash mode).
    #[must_use]
    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    /// Is the session in the terminal Lost state?
    #[must_use]
    pub fn is_lost(&self) -> bool {
        self.lost
    }

    /// Has the opening deal completed (input been enabled) this run?
    #[must_use]
    pub fn is_dealt(&self) -> bool {
        self.dealt
    }

    /// Is a show-all confirmation pending?
    #[must_use]
    pub fn show_all_confirm(&self) -> bool {
        self.show_all_confirm
    }

    /// Is the show-one hint armed?
    #[must_use]
    pub fn show_one_armed(&self) -> bool {
        self.show_one_armed
    }

    /// The transient notice, if one is up.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Label for the share affordance.
    #[must_use]
    pub fn share_label(&self) -> &'static str {
        self.score.share_label()
    }

    /// The share payload handed to the host's share facility.
    #[must_use]
    pub fn share_message(&self) -> String {
        self.score.share_message()
    }

    /// Session mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Session difficulty.
    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// The logical clock, in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// The RNG seed this session was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// A complete observer snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            deck: self.deck.clone(),
            mode: self.mode,
            difficulty: self.difficulty,
            phase: self.phase,
            score: self.score.score(),
            best_score: self.score.best(),
            new_best: self.score.is_new_best(),
            hearts: self.hearts,
            seconds_left: self.seconds_left,
            max_value: self.max_value,
            lost: self.lost,
            dealt: self.dealt,
            show_all_confirm: self.show_all_confirm,
            show_one_armed: self.show_one_armed,
            notice: self.notice.clone(),
            share_label: self.score.share_label().to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn inject_deck(&mut self, deck: Deck) {
        self.deck = deck;
    }

    #[cfg(test)]
    pub(crate) fn pending_steps(&self) -> usize {
        self.tasks.pending_len()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("mode", &self.mode)
            .field("difficulty", &self.difficulty)
            .field("phase", &self.phase)
            .field("score", &self.score.score())
            .field("now_ms", &self.now_ms)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryResources, RecordingAudio, ResourceStore};

    const DEAL_MS: u64 = 940; // medium: 300 + 16 * 40

    fn simple_session() -> Session {
        let mut session = Session::new(Mode::Simple, Difficulty::Medium, 42);
        session.advance(DEAL_MS);
        session
    }

    fn number_deck(values: &[u32]) -> Deck {
        Deck::from_cards(values.iter().map(|&v| Card::hidden(CardValue::Number(v))))
    }

    fn mismatch_deck() -> Deck {
        // 3x3, all values distinct except one guaranteed pair at 7 and 8.
        number_deck(&[2, 4, 8, 16, 32, 64, 128, 256, 256])
    }

    #[test]
    fn test_deal_blocks_input() {
        let mut session = Session::new(Mode::Simple, Difficulty::Medium, 42);

        assert_eq!(session.phase(), Phase::Dealing);
        session.click(0);
        assert_eq!(session.opened(), None);

        session.advance(DEAL_MS);
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.is_dealt());
        assert!(session.deck().iter().all(|c| c.state == CardState::Hidden));
    }

    #[test]
    fn test_first_click_opens_card() {
        let mut session = simple_session();

        session.click(5);

        assert_eq!(session.opened(), Some(5));
        assert_eq!(session.deck().get(5).unwrap().state, CardState::Shown);
    }

    #[test]
    fn test_clicking_open_card_again_is_ignored() {
        let mut session = simple_session();

        session.click(5);
        session.click(5);

        assert_eq!(session.opened(), Some(5));
        assert_eq!(session.phase(), Phase::AwaitingSecond { first: 5 });
    }

    #[test]
    fn test_out_of_range_click_is_ignored() {
        let mut session = simple_session();

        session.click(16);

        assert_eq!(session.opened(), None);
    }

    #[test]
    fn test_success_flow_step_by_step() {
        let mut session = simple_session();
        let audio = RecordingAudio::new();
        session.collab.audio = Box::new(audio.clone());

        session.click(0);
        session.click(1);

        // Immediate effects: loading, score, max.
        assert_eq!(session.phase(), Phase::SuccessFlow);
        assert_eq!(session.deck().get(0).unwrap().state, CardState::Loading);
        assert_eq!(session.score(), 4);
        assert_eq!(session.max_value(), 4);
        assert_eq!(audio.count(Cue::Correct), 1);

        // +500: merge value written, first removing.
        session.advance(500);
        let deck = session.deck();
        assert_eq!(deck.get(1).unwrap().value, CardValue::Number(4));
        assert_eq!(deck.get(0).unwrap().state, CardState::Removing);

        // +300: first regenerated, shown.
        session.advance(300);
        assert_eq!(session.deck().get(0).unwrap().state, CardState::Shown);

        // Finish fires at 350 + 500 + 300 + 500 after the click.
        session.advance(850);
        assert_eq!(session.phase(), Phase::Idle);
        let deck = session.deck();
        assert_eq!(deck.get(0).unwrap().state, CardState::Hidden);
        assert_eq!(deck.get(1).unwrap().state, CardState::Hidden);
        assert_eq!(session.opened(), None);
    }

    #[test]
    fn test_merge_clears_second_cards_time_bonus() {
        let mut session = Session::new(Mode::Flash, Difficulty::Easy, 42);
        session.advance(660);
        let mut deck = number_deck(&[2, 4, 8, 16, 32, 64, 128, 256, 256]);
        deck.put(7, Card::hidden(CardValue::Number(256)).with_time_bonus(5));
        session.inject_deck(deck);

        session.click(7);
        session.click(8);
        session.advance(500);

        let second = *session.deck().get(8).unwrap();
        assert_eq!(second.value, CardValue::Number(512));
        assert_eq!(second.time_bonus, None);
    }

    #[test]
    fn test_three_mismatches_lose_exactly_on_third() {
        let mut session = simple_session();
        assert_eq!(session.hearts(), 3);

        for round in 0..3 {
            session.inject_deck(mismatch_deck());
            session.click(0);
            session.click(1);

            if round < 2 {
                assert!(!session.is_lost(), "lost too early on round {round}");
                assert_eq!(session.phase(), Phase::MismatchFlow);
                // 900 + 500 hides the pair and unlocks.
                session.advance(1400);
                assert_eq!(session.phase(), Phase::Idle);
            }
        }

        assert!(session.is_lost());
        assert_eq!(session.hearts(), 0);
        assert_eq!(session.phase(), Phase::Lost);

        // Lose reveal fires shortly after.
        session.advance(100);
        assert!(session
            .deck()
            .iter()
            .all(|c| c.state == CardState::Shown));
        assert!(!session.is_dealt());

        // Input is frozen.
        session.click(2);
        assert_eq!(session.opened(), None);
    }

    #[test]
    fn test_mismatch_plays_mistake_cue() {
        let mut session = simple_session();
        let audio = RecordingAudio::new();
        session.collab.audio = Box::new(audio.clone());

        session.inject_deck(mismatch_deck());
        session.click(0);
        session.click(1);

        assert_eq!(audio.count(Cue::Mistake), 1);
    }

    #[test]
    fn test_flash_mismatch_costs_no_hearts() {
        let mut session = Session::new(Mode::Flash, Difficulty::Easy, 42);
        session.advance(660);
        let hearts_before = session.hearts();

        session.inject_deck(mismatch_deck());
        session.click(0);
        session.click(1);

        assert!(!session.is_lost());
        assert_eq!(session.hearts(), hearts_before);
        // Flash hides after hide_on_error - 50.
        session.advance(850);
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_flash_time_bonus_applies_before_next_tick() {
        let mut session = Session::new(Mode::Flash, Difficulty::Easy, 42);
        session.advance(660);
        assert_eq!(session.seconds_left(), 60);

        let mut deck = mismatch_deck();
        deck.put(7, Card::hidden(CardValue::Number(256)).with_time_bonus(5));
        session.inject_deck(deck);

        session.click(7);
        session.click(8);

        // Bonus lands synchronously with the merge.
        assert_eq!(session.seconds_left(), 65);
    }

    #[test]
    fn test_flash_countdown_reaches_lose() {
        let mut session = Session::new(Mode::Flash, Difficulty::Easy, 42);
        session.advance(660);

        for _ in 0..59 {
            session.advance(1000);
        }
        assert_eq!(session.seconds_left(), 1);
        assert!(!session.is_lost());

        session.advance(1000);

        assert_eq!(session.seconds_left(), 0);
        assert!(session.is_lost());
        assert_eq!(session.phase(), Phase::Lost);

        // The countdown halts: more time changes nothing.
        session.advance(5000);
        assert_eq!(session.seconds_left(), 0);
    }

    #[test]
    fn test_flash_countdown_does_not_run_before_deal() {
        let mut session = Session::new(Mode::Flash, Difficulty::Easy, 42);

        session.advance(500);
        assert_eq!(session.seconds_left(), 60);
    }

    #[test]
    fn test_flash_has_no_continue() {
        let mut session = Session::with_collaborators(
            Mode::Flash,
            Difficulty::Easy,
            EngineConfig::default(),
            Collaborators {
                resources: Box::new(MemoryResources::with_bag(0, 0, 5)),
                ..Collaborators::default()
            },
            42,
        );
        session.advance(660);
        for _ in 0..60 {
            session.advance(1000);
        }
        assert!(session.is_lost());

        assert!(!session.continue_run());
        assert!(session.is_lost());
    }

    #[test]
    fn test_continue_spends_heart_and_resumes() {
        let resources = MemoryResources::with_bag(3, 3, 2);
        let mut session = Session::with_collaborators(
            Mode::Simple,
            Difficulty::Medium,
            EngineConfig::default(),
            Collaborators {
                resources: Box::new(resources.clone()),
                ..Collaborators::default()
            },
            42,
        );
        session.advance(DEAL_MS);

        // Burn all three hearts.
        for _ in 0..3 {
            session.inject_deck(mismatch_deck());
            session.click(0);
            session.click(1);
            session.advance(1400);
        }
        assert!(session.is_lost());

        assert!(session.continue_run());

        assert_eq!(resources.count(ResourceKind::Hearts), 1);
        assert!(!session.is_lost());
        assert_eq!(session.hearts(), 1);
        // Deck hides before the resume window ends.
        assert!(session.deck().iter().all(|c| c.state == CardState::Hidden));
        assert_eq!(session.phase(), Phase::Dealing);

        session.advance(700);
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.is_dealt());
    }

    #[test]
    fn test_continue_without_hearts_fails() {
        let mut session = Session::with_collaborators(
            Mode::Simple,
            Difficulty::Medium,
            EngineConfig::default(),
            Collaborators {
                resources: Box::new(MemoryResources::with_bag(3, 3, 0)),
                ..Collaborators::default()
            },
            42,
        );
        session.advance(DEAL_MS);
        for _ in 0..3 {
            session.inject_deck(mismatch_deck());
            session.click(0);
            session.click(1);
            session.advance(1400);
        }
        assert!(session.is_lost());

        assert!(!session.continue_run());
        assert!(session.is_lost());
    }

    #[test]
    fn test_wildcard_flow_never_pairs() {
        let mut session = simple_session();
        session.click(0);

        let mut deck = session.deck();
        deck.put(3, Card::hidden(CardValue::Wildcard));
        session.inject_deck(deck);

        let values_before: Vec<_> = session.deck().iter().map(|c| c.value).collect();

        session.click(3);

        // No pairing with the open card; the dedicated flow took over.
        assert_eq!(session.phase(), Phase::WildcardFlow);
        assert_eq!(session.opened(), None);
        assert_eq!(session.score(), 0);
        assert!(session.deck().iter().all(|c| c.state == CardState::Shown));

        // Shuffle fires at 900, preserving the value multiset.
        session.advance(900);
        let mut before_sorted = values_before.clone();
        let mut after_sorted: Vec<_> = session.deck().iter().map(|c| c.value).collect();
        before_sorted.sort_by_key(|v| format!("{v}"));
        after_sorted.sort_by_key(|v| format!("{v}"));
        assert_eq!(before_sorted, after_sorted);

        // Removal, regeneration, then hide-and-unlock.
        session.advance(500);
        let shuffled: Vec<_> = session.deck().iter().map(|c| c.value).collect();
        assert_eq!(
            session
                .deck()
                .iter()
                .filter(|c| c.state == CardState::Removing)
                .count(),
            1
        );

        session.advance(300);
        session.advance(800);

        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.opened(), None);
        assert!(session.deck().iter().all(|c| c.state == CardState::Hidden));

        // At most the regenerated slot changed value relative to the
        // shuffled deck; every other card survived in place.
        let final_values: Vec<_> = session.deck().iter().map(|c| c.value).collect();
        let changed = shuffled
            .iter()
            .zip(final_values.iter())
            .filter(|(a, b)| a != b)
            .count();
        assert!(changed <= 1, "{changed} slots changed");
        assert_eq!(session.pending_steps(), 0);
    }

    #[test]
    fn test_wildcard_deck_stays_solvable() {
        use crate::deck::has_solution;

        let mut session = simple_session();
        let mut deck = mismatch_deck();
        deck.put(4, Card::hidden(CardValue::Wildcard));
        session.inject_deck(deck);

        session.click(4);
        session.advance(2500);

        assert_eq!(session.phase(), Phase::Idle);
        assert!(has_solution(&session.deck()));
    }

    #[test]
    fn test_retry_cancels_pending_steps_and_resets() {
        let mut session = simple_session();
        session.click(0);
        session.click(1);
        assert_eq!(session.score(), 4);
        assert!(session.pending_steps() > 0);

        session.retry();

        assert_eq!(session.pending_steps(), 1); // only the new deal
        assert_eq!(session.score(), 0);
        assert_eq!(session.max_value(), 1);
        assert_eq!(session.hearts(), 3);
        assert_eq!(session.phase(), Phase::Dealing);
        assert!(session
            .deck()
            .iter()
            .all(|c| c.value == CardValue::Number(2) && c.state == CardState::Shown));

        session.advance(DEAL_MS);
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_best_score_survives_retry() {
        let mut session = simple_session();
        session.click(0);
        session.click(1);
        assert!(session.is_new_best());
        assert_eq!(session.best_score(), 4);

        session.retry();

        assert_eq!(session.best_score(), 4);
        assert!(!session.is_new_best());
        assert_eq!(session.share_label(), "Share your score");
    }

    #[test]
    fn test_max_value_monotone_within_run() {
        let mut session = simple_session();
        session.click(0);
        session.click(1);
        assert_eq!(session.max_value(), 4);
        session.advance(1650);

        // A smaller merge cannot lower it.
        session.inject_deck(number_deck(&[2, 2, 8, 16, 32, 64, 128, 256, 512]));
        session.click(0);
        session.click(1);
        assert_eq!(session.max_value(), 4);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut session = simple_session();
        session.click(2);

        let snapshot = session.snapshot();

        assert_eq!(snapshot.phase, Phase::AwaitingSecond { first: 2 });
        assert_eq!(snapshot.mode, Mode::Simple);
        assert_eq!(snapshot.hearts, 3);
        assert!(!snapshot.lost);
        assert_eq!(snapshot.deck.get(2).unwrap().state, CardState::Shown);
    }
}
