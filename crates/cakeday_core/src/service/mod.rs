//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and engine invocations into use-case
//!   level APIs.
//! - Keep UI layers decoupled from storage and projection details.

pub mod celebration_service;
pub mod directory_service;
