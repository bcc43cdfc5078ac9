//! Flat-file table storage for quote records.
//!
//! # Responsibility
//! - Read and write the whole quote table as one CSV file.
//! - Normalize older or drifted headers into the canonical schema on read.
//!
//! # Invariants
//! - Writes always emit the canonical header in canonical column order.
//! - A missing file reads as an empty table, never as an error.
//! - Cells that cannot be parsed degrade to defaults instead of failing the read.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod io;
pub mod schema;

pub use io::{read_table, write_table};

pub type TableResult<T> = Result<T, TableError>;

#[derive(Debug)]
pub enum TableError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl Display for TableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Csv(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for TableError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for TableError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}
