//! Domain model for user-owned dictionaries.
//!
//! # Responsibility
//! - Define the canonical persisted shape used by service logic.
//!
//! # Invariants
//! - Every dictionary is identified by a stable `DictionaryId`.
//! - Every dictionary has exactly one owner.

pub mod dictionary;
