//! In-memory module editor core.
//!
//! # Responsibility
//! - Own the container/paragraph collections behind one mutation surface.
//! - Derive structure diagnostics and the assembled document on every change.
//! - Track the UI-facing editor state the core reads ids from.
//!
//! # Invariants
//! - Every paragraph belongs to exactly one bucket at all times.
//! - Derived content is never stale once a mutation returns.

pub mod analyzer;
pub mod assembler;
pub mod debounce;
pub mod error;
pub mod store;
pub mod text;
pub mod ui_state;
