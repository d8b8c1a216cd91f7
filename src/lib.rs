//! # flip-engine
//!
//! A timed card-matching puzzle engine: a grid of face-down cards holding
//! numeric or special values, merge-on-match rules, and continuous deck
//! regeneration under a solvability guarantee - the player is never left
//! without a possible match.
//!
//! ## Design Principles
//!
//! 1. **Headless**: No rendering, audio mixing, or persistence inside the
//!    engine. Hosts inject capability traits and observe via snapshots.
//!
//! 2. **Logical time**: Hosts pump [`session::Session::advance`]; the
//!    engine never reads a wall clock. Every delayed transition is an
//!    explicit scheduled step, cancelled wholesale on retry/teardown.
//!
//! 3. **Deterministic**: All randomness flows through a seedable ChaCha8
//!    stream, so complete sessions replay from a seed.
//!
//! ## Modules
//!
//! - `core`: Configuration (delays, difficulties, modes) and RNG
//! - `deck`: Cards, the persistent-vector deck, value generation and the
//!   solvability invariant
//! - `rules`: Pure match resolution for an opened pair
//! - `session`: The session state machine - phases, choreography, modes,
//!   hints, scoring
//! - `host`: Injected capability interfaces (audio, scores, resources,
//!   rewarded ads) and their in-memory implementations

pub mod core;
pub mod deck;
pub mod host;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use crate::core::{DelayTable, Difficulty, EngineConfig, GameRng, InitTable, Mode};

pub use crate::deck::{
    generate_card, generate_solvable, generate_value, has_solution, Card, CardState, CardValue,
    Deck,
};

pub use crate::rules::{resolve_pair, MatchOutcome};

pub use crate::session::{Phase, ScoreTracker, Session, SessionSnapshot};

pub use crate::host::{
    AudioSink, CapabilityError, Collaborators, Cue, ResourceKind, ResourceStore, RewardedAds,
    ScoreStore,
};
