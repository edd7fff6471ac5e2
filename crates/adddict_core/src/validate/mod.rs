//! Request validation contracts.
//!
//! # Responsibility
//! - Reject malformed requests before any repository call.
//!
//! # Invariants
//! - Validators return an explicit `Result`; they never log or panic.

pub mod dictionary_validator;
