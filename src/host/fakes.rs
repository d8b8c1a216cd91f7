//! In-memory and no-op capability implementations.
//!
//! These serve two audiences: hosts that don't care about a capability
//! (`NullAudio`, `NullAds`), and tests that need to observe what the
//! engine did (`RecordingAudio`, `ScriptedAds`, the memory stores). The
//! observable fakes keep their state behind `Arc<Mutex<_>>` so a cloned
//! handle kept by the test sees everything the session-owned copy records.

use std::sync::{Arc, Mutex};

use rustc_hash::FxHashMap;

use super::{AudioSink, CapabilityError, Cue, ResourceKind, ResourceStore, RewardedAds, ScoreStore};
use crate::core::Mode;

/// Discards every cue.
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: Cue) {}
}

/// Records every cue for later inspection.
#[derive(Clone, Default)]
pub struct RecordingAudio {
    cues: Arc<Mutex<Vec<Cue>>>,
}

impl RecordingAudio {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All cues played so far, in order.
    #[must_use]
    pub fn cues(&self) -> Vec<Cue> {
        self.cues.lock().expect("cue log poisoned").clone()
    }

    /// How many times `cue` was played.
    #[must_use]
    pub fn count(&self, cue: Cue) -> usize {
        self.cues().iter().filter(|&&c| c == cue).count()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: Cue) {
        self.cues.lock().expect("cue log poisoned").push(cue);
    }
}

/// In-memory per-mode best scores.
#[derive(Clone, Default)]
pub struct MemoryScores {
    best: Arc<Mutex<FxHashMap<Mode, u32>>>,
}

impl MemoryScores {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored best, as a returning player would have.
    #[must_use]
    pub fn with_best(self, mode: Mode, score: u32) -> Self {
        self.best.lock().expect("score store poisoned").insert(mode, score);
        self
    }
}

impl ScoreStore for MemoryScores {
    fn best(&self, mode: Mode) -> u32 {
        self.best
            .lock()
            .expect("score store poisoned")
            .get(&mode)
            .copied()
            .unwrap_or(0)
    }

    fn write_best(&mut self, mode: Mode, score: u32) -> Result<(), CapabilityError> {
        let mut best = self.best.lock().expect("score store poisoned");
        let entry = best.entry(mode).or_insert(0);
        // Bests only ever increase.
        if score > *entry {
            *entry = score;
        }
        Ok(())
    }
}

/// In-memory consumable inventory. Starts at the shipped bag: 3 show-all,
/// 3 show-one, 1 heart.
#[derive(Clone)]
pub struct MemoryResources {
    counts: Arc<Mutex<FxHashMap<ResourceKind, u32>>>,
}

impl Default for MemoryResources {
    fn default() -> Self {
        Self::with_bag(3, 3, 1)
    }
}

impl MemoryResources {
    /// An inventory with explicit starting counts.
    #[must_use]
    pub fn with_bag(show_all: u32, show_one: u32, hearts: u32) -> Self {
        let mut counts = FxHashMap::default();
        counts.insert(ResourceKind::ShowAll, show_all);
        counts.insert(ResourceKind::ShowOne, show_one);
        counts.insert(ResourceKind::Hearts, hearts);
        Self {
            counts: Arc::new(Mutex::new(counts)),
        }
    }

    /// An empty inventory.
    #[must_use]
    pub fn empty() -> Self {
        Self::with_bag(0, 0, 0)
    }
}

impl ResourceStore for MemoryResources {
    fn count(&self, kind: ResourceKind) -> u32 {
        self.counts
            .lock()
            .expect("inventory poisoned")
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }

    fn spend(&mut self, kind: ResourceKind) -> bool {
        let mut counts = self.counts.lock().expect("inventory poisoned");
        let count = counts.entry(kind).or_insert(0);
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }

    fn grant(&mut self, kind: ResourceKind, amount: u32) {
        let mut counts = self.counts.lock().expect("inventory poisoned");
        *counts.entry(kind).or_insert(0) += amount;
    }
}

/// No ad is ever ready.
pub struct NullAds;

impl RewardedAds for NullAds {
    fn ready(&self) -> bool {
        false
    }

    fn present(&mut self, _want: ResourceKind) -> Option<u32> {
        None
    }
}

/// Scriptable ad provider: always ready, grants a fixed amount, and
/// records what it was asked for.
#[derive(Clone)]
pub struct ScriptedAds {
    grant: Option<u32>,
    presented: Arc<Mutex<Vec<ResourceKind>>>,
}

impl ScriptedAds {
    /// An ad provider that grants `amount` units per presentation.
    #[must_use]
    pub fn granting(amount: u32) -> Self {
        Self {
            grant: Some(amount),
            presented: Arc::default(),
        }
    }

    /// An ad provider the user always dismisses.
    #[must_use]
    pub fn dismissed() -> Self {
        Self {
            grant: None,
            presented: Arc::default(),
        }
    }

    /// Every presentation request so far.
    #[must_use]
    pub fn presentations(&self) -> Vec<ResourceKind> {
        self.presented.lock().expect("ad log poisoned").clone()
    }
}

impl RewardedAds for ScriptedAds {
    fn ready(&self) -> bool {
        true
    }

    fn present(&mut self, want: ResourceKind) -> Option<u32> {
        self.presented.lock().expect("ad log poisoned").push(want);
        self.grant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ResourceStore;

    #[test]
    fn test_recording_audio_shares_log() {
        let audio = RecordingAudio::new();
        let mut handle = audio.clone();

        handle.play(Cue::Click);
        handle.play(Cue::Correct);

        assert_eq!(audio.cues(), vec![Cue::Click, Cue::Correct]);
        assert_eq!(audio.count(Cue::Click), 1);
    }

    #[test]
    fn test_memory_scores_only_increase() {
        let mut scores = MemoryScores::new().with_best(Mode::Simple, 100);

        scores.write_best(Mode::Simple, 50).unwrap();
        assert_eq!(scores.best(Mode::Simple), 100);

        scores.write_best(Mode::Simple, 150).unwrap();
        assert_eq!(scores.best(Mode::Simple), 150);

        assert_eq!(scores.best(Mode::Flash), 0);
    }

    #[test]
    fn test_memory_resources_spend_and_grant() {
        let mut bag = MemoryResources::with_bag(1, 0, 0);

        assert!(bag.spend(ResourceKind::ShowAll));
        assert!(!bag.spend(ResourceKind::ShowAll));
        assert!(!bag.spend(ResourceKind::ShowOne));

        bag.grant(ResourceKind::ShowOne, 2);
        assert_eq!(bag.count(ResourceKind::ShowOne), 2);
    }

    #[test]
    fn test_default_bag_matches_shipped_values() {
        let bag = MemoryResources::default();

        assert_eq!(bag.count(ResourceKind::ShowAll), 3);
        assert_eq!(bag.count(ResourceKind::ShowOne), 3);
        assert_eq!(bag.count(ResourceKind::Hearts), 1);
    }

    #[test]
    fn test_scripted_ads() {
        let mut ads = ScriptedAds::granting(1);
        assert!(ads.ready());
        assert_eq!(ads.present(ResourceKind::ShowOne), Some(1));
        assert_eq!(ads.presentations(), vec![ResourceKind::ShowOne]);

        let mut dismissed = ScriptedAds::dismissed();
        assert_eq!(dismissed.present(ResourceKind::ShowAll), None);
    }
}
