//! Quote repository contracts and CSV implementation.
//!
//! # Responsibility
//! - Provide CRUD over the persisted quote collection.
//! - Recompute derived figures on every write through the pricing calculator.
//!
//! # Invariants
//! - Every operation is a full read-modify-write of the backing table.
//! - Index-addressed mutations outside `[0, len)` are no-ops that leave the
//!   file untouched and report `false`.
//! - `timestamp` and `id` survive updates unchanged.
//! - The repository performs no draft validation; callers validate first.

use crate::model::quote::{now_timestamp, QuoteDraft, QuoteId, QuoteRecord, QuoteValidationError};
use crate::pricing::calculator::PricingConfig;
use crate::table::{read_table, write_table, TableError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for quote persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(QuoteValidationError),
    Table(TableError),
    NotFound(QuoteId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Table(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "quote not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Table(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<QuoteValidationError> for RepoError {
    fn from(value: QuoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<TableError> for RepoError {
    fn from(value: TableError) -> Self {
        Self::Table(value)
    }
}

/// Repository interface for quote CRUD operations.
pub trait QuoteRepository {
    /// Returns every record in persisted order.
    fn load_all(&self) -> RepoResult<Vec<QuoteRecord>>;
    /// Prices `draft`, stamps it with the current time and appends it.
    fn append(&self, draft: &QuoteDraft) -> RepoResult<QuoteRecord>;
    /// Replaces inputs at `index` and reprices. `Ok(false)` when out of range.
    fn update_at(&self, index: usize, draft: &QuoteDraft) -> RepoResult<bool>;
    /// Removes the record at `index`. `Ok(false)` when out of range.
    fn delete_at(&self, index: usize) -> RepoResult<bool>;
    /// `Ok(None)` when no record carries `id`.
    fn get(&self, id: QuoteId) -> RepoResult<Option<QuoteRecord>>;
    fn update(&self, id: QuoteId, draft: &QuoteDraft) -> RepoResult<QuoteRecord>;
    fn delete(&self, id: QuoteId) -> RepoResult<()>;
    /// Pricing constants applied on every write.
    fn pricing(&self) -> &PricingConfig;
}

/// CSV-file-backed quote repository.
///
/// The file location is owned by the instance; there is no process-wide path.
#[derive(Debug, Clone)]
pub struct CsvQuoteRepository {
    path: PathBuf,
    pricing: PricingConfig,
}

impl CsvQuoteRepository {
    /// Creates a repository over `path` with default pricing constants.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_pricing(path, PricingConfig::default())
    }

    pub fn with_pricing(path: impl Into<PathBuf>, pricing: PricingConfig) -> Self {
        Self {
            path: path.into(),
            pricing,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &[QuoteRecord]) -> RepoResult<()> {
        write_table(&self.path, records)?;
        Ok(())
    }

    fn reprice(&self, record: &mut QuoteRecord, draft: &QuoteDraft) {
        record.name = draft.name.clone();
        record.region = draft.region;
        record.inputs = draft.inputs.clone();
        record.breakdown = self.pricing.compute(&draft.inputs);
    }
}

impl QuoteRepository for CsvQuoteRepository {
    fn load_all(&self) -> RepoResult<Vec<QuoteRecord>> {
        Ok(read_table(&self.path)?)
    }

    fn append(&self, draft: &QuoteDraft) -> RepoResult<QuoteRecord> {
        let mut records = self.load_all()?;
        let record = QuoteRecord {
            id: Uuid::new_v4(),
            timestamp: now_timestamp(),
            name: draft.name.clone(),
            region: draft.region,
            inputs: draft.inputs.clone(),
            breakdown: self.pricing.compute(&draft.inputs),
        };
        records.push(record.clone());
        self.persist(&records)?;

        info!(
            "event=quote_append module=repo status=ok index={} rows={}",
            records.len() - 1,
            records.len()
        );
        Ok(record)
    }

    fn update_at(&self, index: usize, draft: &QuoteDraft) -> RepoResult<bool> {
        let mut records = self.load_all()?;
        if index >= records.len() {
            info!(
                "event=quote_update module=repo status=noop index={} rows={}",
                index,
                records.len()
            );
            return Ok(false);
        }
        self.reprice(&mut records[index], draft);
        self.persist(&records)?;

        info!("event=quote_update module=repo status=ok index={index}");
        Ok(true)
    }

    fn delete_at(&self, index: usize) -> RepoResult<bool> {
        let mut records = self.load_all()?;
        if index >= records.len() {
            info!(
                "event=quote_delete module=repo status=noop index={} rows={}",
                index,
                records.len()
            );
            return Ok(false);
        }
        records.remove(index);
        self.persist(&records)?;

        info!(
            "event=quote_delete module=repo status=ok index={} rows={}",
            index,
            records.len()
        );
        Ok(true)
    }

    fn get(&self, id: QuoteId) -> RepoResult<Option<QuoteRecord>> {
        Ok(self.load_all()?.into_iter().find(|record| record.id == id))
    }

    fn update(&self, id: QuoteId, draft: &QuoteDraft) -> RepoResult<QuoteRecord> {
        let mut records = self.load_all()?;
        let index = position_of(&records, id).ok_or(RepoError::NotFound(id))?;
        self.reprice(&mut records[index], draft);
        self.persist(&records)?;

        info!("event=quote_update module=repo status=ok index={index}");
        Ok(records.swap_remove(index))
    }

    fn delete(&self, id: QuoteId) -> RepoResult<()> {
        let mut records = self.load_all()?;
        let index = position_of(&records, id).ok_or(RepoError::NotFound(id))?;
        records.remove(index);
        self.persist(&records)?;

        info!(
            "event=quote_delete module=repo status=ok index={} rows={}",
            index,
            records.len()
        );
        Ok(())
    }

    fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }
}

fn position_of(records: &[QuoteRecord], id: QuoteId) -> Option<usize> {
    records.iter().position(|record| record.id == id)
}
