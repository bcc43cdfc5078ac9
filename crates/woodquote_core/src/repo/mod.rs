//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define CRUD contracts over the persisted quote collection.
//! - Isolate CSV table details from service orchestration.
//!
//! # Invariants
//! - Repository writes always recompute derived figures before persistence.
//! - Id-addressed APIs return semantic errors (`NotFound`); index-addressed
//!   APIs report out-of-range as a `false` no-op.

pub mod quote_repo;
