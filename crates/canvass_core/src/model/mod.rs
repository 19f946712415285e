//! Domain model for canvassing records.
//!
//! # Responsibility
//! - Define the canonical person record and its creation input shape.
//! - Own field validation rules and timestamp rendering.
//!
//! # Invariants
//! - Every persisted record is identified by a stable numeric `PersonId`.
//! - Name fields are never empty for a validated record.

pub mod person;
