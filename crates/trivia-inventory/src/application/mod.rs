//! Application services for the Question Inventory context.

pub mod refresh;
pub mod source;
