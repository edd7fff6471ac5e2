//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validator, repository and mapper calls into use-case APIs.
//! - Keep request boundaries decoupled from storage details.

pub mod dictionary_service;
