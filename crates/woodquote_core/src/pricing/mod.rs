//! Quote pricing.
//!
//! # Responsibility
//! - Map raw commercial inputs to derived financial figures.
//! - Classify margins into display bands.
//!
//! # Invariants
//! - Pricing is pure: no I/O, no shared state, no failure for finite inputs.

pub mod calculator;
