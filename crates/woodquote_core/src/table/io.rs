//! Whole-file CSV read and write for the quote table.
//!
//! # Responsibility
//! - Load every row of a table file into `QuoteRecord`s.
//! - Rewrite the table file from a full record collection.
//!
//! # Invariants
//! - Reads never create the file; a missing file is an empty table.
//! - Writes replace the whole file; there is no partial append path.
//! - No locking: concurrent writers race and the last rewrite wins.
//! - Cells that are not valid UTF-8 are read lossily instead of failing the load.
//! - Ids are unique per read; a repeated `id` cell is replaced by a
//!   position-derived id, which the next write persists.

use super::schema::{canonical_header, encode, legacy_id, ColumnMap};
use super::TableResult;
use crate::model::quote::QuoteRecord;
use csv::{ByteRecord, StringRecord};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

/// Reads all records from the table at `path`.
///
/// # Side effects
/// - Emits `table_read` logging events with row count and duration.
pub fn read_table(path: impl AsRef<Path>) -> TableResult<Vec<QuoteRecord>> {
    let path = path.as_ref();
    let started_at = Instant::now();

    if !path.exists() {
        info!("event=table_read module=table status=ok mode=missing rows=0 duration_ms=0");
        return Ok(Vec::new());
    }

    match read_rows(path) {
        Ok(records) => {
            info!(
                "event=table_read module=table status=ok mode=file rows={} duration_ms={}",
                records.len(),
                started_at.elapsed().as_millis()
            );
            Ok(records)
        }
        Err(err) => {
            error!(
                "event=table_read module=table status=error mode=file duration_ms={} error_code=table_read_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Replaces the table at `path` with `records`, header first.
///
/// # Side effects
/// - Creates or truncates the file.
/// - Emits `table_write` logging events with row count and duration.
pub fn write_table(path: impl AsRef<Path>, records: &[QuoteRecord]) -> TableResult<()> {
    let path = path.as_ref();
    let started_at = Instant::now();

    match write_rows(path, records) {
        Ok(()) => {
            info!(
                "event=table_write module=table status=ok rows={} duration_ms={}",
                records.len(),
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=table_write module=table status=error rows={} duration_ms={} error_code=table_write_failed error={}",
                records.len(),
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn read_rows(path: &Path) -> TableResult<Vec<QuoteRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let columns = ColumnMap::resolve(&lossy_record(reader.byte_headers()?));
    let missing = columns.missing();
    if !missing.is_empty() {
        debug!(
            "event=table_backfill module=table status=ok missing_columns={}",
            missing
                .iter()
                .map(|column| column.name())
                .collect::<Vec<_>>()
                .join("|")
        );
    }

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    for (position, row) in reader.byte_records().enumerate() {
        let mut record = columns.decode(&lossy_record(&row?), position);
        if !seen.insert(record.id) {
            warn!(
                "event=table_duplicate_id module=table status=reassigned position={position}"
            );
            record.id = legacy_id(position, &record.timestamp, &record.name);
            seen.insert(record.id);
        }
        records.push(record);
    }
    Ok(records)
}

fn lossy_record(row: &ByteRecord) -> StringRecord {
    row.iter()
        .map(|cell| String::from_utf8_lossy(cell).into_owned())
        .collect()
}

fn write_rows(path: &Path, records: &[QuoteRecord]) -> TableResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&canonical_header())?;
    for record in records {
        writer.write_record(&encode(record))?;
    }
    writer.flush()?;
    Ok(())
}
