//! Shared test fakes for the trivia workspace.

mod clock;
mod remote;
mod rng;
mod store;

pub use clock::FixedClock;
pub use remote::{RemoteCall, ScriptedRemoteService};
pub use rng::{MockRng, SequenceRng};
pub use store::{FailingLocalStore, StaticLocalStore};
