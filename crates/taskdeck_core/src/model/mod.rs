//! Domain model for taskdeck.
//!
//! # Responsibility
//! - Define the canonical task record and its validated input forms.
//!
//! # Invariants
//! - Stored titles are never empty or whitespace-only.
//! - `status` is always one of the two enumerated values.

pub mod task;
