//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into caller-facing APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod quote_service;
