//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate the in-memory editor and repositories into use-case APIs.
//! - Keep UI layers decoupled from storage details.

pub mod media_service;
pub mod session;
