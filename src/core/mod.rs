//! Core engine types: configuration and RNG.

pub mod config;
pub mod rng;

pub use config::{DelayTable, Difficulty, EngineConfig, InitTable, Mode};
pub use rng::GameRng;
