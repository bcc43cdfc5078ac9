//! Domain model for priced timber sale quotes.
//!
//! # Responsibility
//! - Define canonical data structures used by pricing and persistence.
//!
//! # Invariants
//! - Every persisted quote is identified by a stable `QuoteId`.
//! - Derived figures are recomputed from inputs on every write.

pub mod quote;
