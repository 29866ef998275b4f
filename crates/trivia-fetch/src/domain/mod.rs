//! Domain layer for the Fetch context.

pub mod failure;
pub mod game;
