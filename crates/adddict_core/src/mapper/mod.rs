//! Entity/DTO conversions.
//!
//! # Invariants
//! - Mappers are pure: no persistence or logging side effects.

pub mod dictionary_mapper;
