//! Route modules.

pub mod allocation;
pub mod games;
pub mod health;
pub mod inventory;
