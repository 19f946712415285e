//! CSV export entry points.
//!
//! # Responsibility
//! - Render record sets as downloadable CSV text.
//! - Keep escaping and filename rules inside core.

pub mod csv;
