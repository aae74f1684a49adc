//! Command implementations

pub mod completions;
pub mod image;
pub mod packages;
pub mod search;
pub mod tag;
