//! Branching story data model and export format.
//!
//! This module handles:
//! - The card/choice graph structure and id assignment
//! - The draft (form) template and ending toggle semantics
//! - Serialization to the interchange JSON consumed by the players

pub mod export;
mod types;

pub use types::{Card, Choice, Draft, Story, default_options};
