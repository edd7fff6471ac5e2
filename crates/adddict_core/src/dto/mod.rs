//! Request and response value objects exchanged with service callers.
//!
//! # Responsibility
//! - Define immutable inputs validated before use.
//! - Define read-only projections returned to the request boundary.
//!
//! # Invariants
//! - DTOs are never persisted directly.
//! - Field names serialize as camelCase for the upstream boundary.

pub mod dictionary;
pub mod page;
