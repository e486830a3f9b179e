//! # Dataset
//!
//! Reads the upstream price files into memory. Fetching prices from a market-data
//! provider is someone else's job; this crate only understands the CSV they leave
//! behind: a header row `Date,<ticker1>,<ticker2>,...` and one row per trading day.

use core_types::{index_by_date, PriceTable, RawTable, DEFAULT_DATE_FIELD};
use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;

pub mod error;

pub use error::DatasetError;

/// Reads a CSV price file into an un-indexed `RawTable`.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<RawTable, DatasetError> {
    let file = std::fs::File::open(path.as_ref())?;
    tracing::debug!(path = %path.as_ref().display(), "Reading price file.");
    read_csv_from(file)
}

/// Reads CSV price data from any reader into an un-indexed `RawTable`.
pub fn read_csv_from<R: Read>(reader: R) -> Result<RawTable, DatasetError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(DatasetError::MissingHeader);
    }

    let records = rdr
        .records()
        .map(|r| r.map(|record| record.iter().map(|f| f.to_string()).collect()))
        .collect::<Result<Vec<Vec<String>>, _>>()?;

    Ok(RawTable::new(headers, records)?)
}

/// Reads a CSV price file and indexes it by its `Date` column.
pub fn load_price_table<P: AsRef<Path>>(path: P) -> Result<PriceTable, DatasetError> {
    let raw = read_csv(path)?;
    let rows = raw.len();
    let table = index_by_date(raw, DEFAULT_DATE_FIELD)?;

    tracing::info!(rows, tickers = ?table.tickers(), "Loaded price table.");
    Ok(table)
}
