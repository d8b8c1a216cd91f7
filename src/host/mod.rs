//! Host capability interfaces.
//!
//! Everything outside the match engine - audio playback, persistent best
//! scores, the consumable inventory, rewarded ads - is reached through a
//! trait the host injects, never through a global. The engine calls out at
//! well-defined moments and treats every failure as soft: a store that
//! rejects a write is logged and play continues.
//!
//! [`Collaborators`] bundles one implementation of each capability.
//! `Collaborators::default()` wires the in-memory/no-op implementations
//! from [`fakes`], which is what tests (and hosts that don't care about a
//! given capability) use.

pub mod fakes;

pub use fakes::{MemoryResources, MemoryScores, NullAds, NullAudio, RecordingAudio, ScriptedAds};

use serde::{Deserialize, Serialize};

use crate::core::Mode;

/// Symbolic audio cue names the engine emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Any accepted or ignored tile click.
    Click,
    /// A successful merge.
    Correct,
    /// A mismatched pair.
    Mistake,
    /// A new best score.
    Unlocked,
}

impl std::fmt::Display for Cue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cue::Click => write!(f, "click"),
            Cue::Correct => write!(f, "correct"),
            Cue::Mistake => write!(f, "mistake"),
            Cue::Unlocked => write!(f, "unlocked"),
        }
    }
}

/// Consumable inventory kinds shared across sessions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Reveal the whole deck for a moment.
    ShowAll,
    /// Reveal a single chosen card for a moment.
    ShowOne,
    /// Extra lives spent by the Simple-mode continue.
    Hearts,
}

/// Soft failure from a host capability.
///
/// Nothing in the engine treats these as fatal; they are logged via
/// `tracing::warn!` and play continues.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("score store rejected write: {0}")]
    Store(String),
}

/// Audio cue playback.
pub trait AudioSink {
    fn play(&mut self, cue: Cue);
}

/// Persistent per-mode best scores.
///
/// The engine reads the best once at session start and writes through on
/// every new best during play.
pub trait ScoreStore {
    fn best(&self, mode: Mode) -> u32;

    fn write_best(&mut self, mode: Mode, score: u32) -> Result<(), CapabilityError>;
}

/// The shared consumable inventory.
pub trait ResourceStore {
    fn count(&self, kind: ResourceKind) -> u32;

    /// Consume one unit. Returns `false` (and changes nothing) when empty.
    fn spend(&mut self, kind: ResourceKind) -> bool;

    /// Credit `amount` units (rewarded-ad grants).
    fn grant(&mut self, kind: ResourceKind, amount: u32);
}

/// Rewarded-ad presentation.
pub trait RewardedAds {
    /// Is an ad loaded and ready to present?
    fn ready(&self) -> bool;

    /// Present an ad offering `want`. Returns the granted amount, or
    /// `None` when the user bailed out or the ad failed.
    fn present(&mut self, want: ResourceKind) -> Option<u32>;
}

/// One implementation of each host capability, injected at session start.
pub struct Collaborators {
    pub audio: Box<dyn AudioSink>,
    pub scores: Box<dyn ScoreStore>,
    pub resources: Box<dyn ResourceStore>,
    pub ads: Box<dyn RewardedAds>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            audio: Box::new(NullAudio),
            scores: Box::new(MemoryScores::default()),
            resources: Box::new(MemoryResources::default()),
            ads: Box::new(NullAds),
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
