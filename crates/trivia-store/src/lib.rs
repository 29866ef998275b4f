//! In-process question and game store.
//!
//! Implements the `LocalStore` read port plus the "save questions" and
//! "save game" write operations and the category table refresh.

pub mod memory_store;

pub use memory_store::MemoryStore;
