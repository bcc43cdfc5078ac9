//! Core domain logic for woodquote.
//! Pricing of timber sale quotes and their flat-file persistence.

pub mod logging;
pub mod model;
pub mod pricing;
pub mod repo;
pub mod service;
pub mod table;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::quote::{
    PriceBreakdown, PricingInputs, ProductType, QuoteDraft, QuoteId, QuoteRecord,
    QuoteValidationError, Region, Unit,
};
pub use pricing::calculator::{compute, margin_band, MarginBand, PricingConfig};
pub use repo::quote_repo::{CsvQuoteRepository, QuoteRepository, RepoError, RepoResult};
pub use service::quote_service::{QuotePreview, QuoteService};
pub use table::{TableError, TableResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
