//! Open Trivia Database client.
//!
//! Implements `RemoteService` over the public HTTP API. Question pages are
//! requested base64-encoded and decoded here, so callers only ever see
//! plain text.

pub mod client;
pub mod error;
mod wire;

pub use client::OpenTdbClient;
pub use error::OpenTdbError;
