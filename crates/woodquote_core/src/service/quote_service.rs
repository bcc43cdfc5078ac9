//! Quote use-case service.
//!
//! # Responsibility
//! - Provide the caller-facing entry points for previewing and saving quotes.
//! - Validate drafts before they reach the repository.
//!
//! # Invariants
//! - Names are trimmed before persistence; blank names are rejected on create.
//! - Numeric inputs must be finite and non-negative on create and update.
//! - Previews use the same pricing constants as repository writes.

use crate::model::quote::{PriceBreakdown, PricingInputs, QuoteDraft, QuoteId, QuoteRecord};
use crate::pricing::calculator::{margin_band, MarginBand};
use crate::repo::quote_repo::{QuoteRepository, RepoResult};

/// Live pricing result shown before a quote is saved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotePreview {
    pub breakdown: PriceBreakdown,
    pub band: MarginBand,
}

impl QuotePreview {
    pub fn margin_percent(&self) -> f64 {
        self.breakdown.margin_percent()
    }
}

/// Use-case service wrapper for quote CRUD operations.
pub struct QuoteService<R: QuoteRepository> {
    repo: R,
}

impl<R: QuoteRepository> QuoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Prices `inputs` without touching storage.
    pub fn preview(&self, inputs: &PricingInputs) -> QuotePreview {
        let breakdown = self.repo.pricing().compute(inputs);
        QuotePreview {
            breakdown,
            band: margin_band(breakdown.margin_percent()),
        }
    }

    /// Validates and appends a new quote.
    ///
    /// # Contract
    /// - Rejects blank names and negative or non-finite inputs with
    ///   `RepoError::Validation`; nothing is written in that case.
    /// - Returns the persisted record, including its new id and timestamp.
    pub fn create_quote(&self, draft: &QuoteDraft) -> RepoResult<QuoteRecord> {
        let draft = normalized(draft);
        draft.validate()?;
        self.repo.append(&draft)
    }

    /// Replaces the quote at `index`. Returns `Ok(false)` when the index is stale.
    pub fn update_at(&self, index: usize, draft: &QuoteDraft) -> RepoResult<bool> {
        let draft = normalized(draft);
        draft.inputs.validate()?;
        self.repo.update_at(index, &draft)
    }

    /// Replaces the quote with stable id `id`.
    pub fn update_quote(&self, id: QuoteId, draft: &QuoteDraft) -> RepoResult<QuoteRecord> {
        let draft = normalized(draft);
        draft.inputs.validate()?;
        self.repo.update(id, &draft)
    }

    /// Deletes the quote at `index`. Returns `Ok(false)` when the index is stale.
    pub fn delete_at(&self, index: usize) -> RepoResult<bool> {
        self.repo.delete_at(index)
    }

    pub fn delete_quote(&self, id: QuoteId) -> RepoResult<()> {
        self.repo.delete(id)
    }

    pub fn get_quote(&self, id: QuoteId) -> RepoResult<Option<QuoteRecord>> {
        self.repo.get(id)
    }

    /// Lists all quotes in persisted order.
    pub fn list_quotes(&self) -> RepoResult<Vec<QuoteRecord>> {
        self.repo.load_all()
    }
}

fn normalized(draft: &QuoteDraft) -> QuoteDraft {
    QuoteDraft {
        name: draft.name.trim().to_string(),
        ..draft.clone()
    }
}
