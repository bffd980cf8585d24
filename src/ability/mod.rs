//! Ability paths and ability sets.
//!
//! This module provides the hierarchy algebra the engine decides over:
//! - Dot-separated ability paths (e.g. `user.update.self`)
//! - Right-to-left ancestor walks (an ancestor grants its whole subtree)
//! - Normalized distinct sets with hierarchical membership
//! - The decimal owner suffix used by the ownership special case

mod path;
mod set;

pub use path::{ancestors, is_blank, owner_suffix, parent, Ancestors};
pub use set::AbilitySet;

#[cfg(test)]
mod tests;
