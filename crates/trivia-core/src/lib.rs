//! Trivia Core — shared model and collaborator ports.
//!
//! This crate defines the types every other crate speaks in (categories,
//! difficulties, counts, questions, game settings), the ports through which
//! the local store and the remote question service are reached, and the
//! clock/RNG/throttle abstractions that keep the rest deterministic under
//! test. It contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod model;
pub mod remote;
pub mod repository;
pub mod rng;
pub mod throttle;
