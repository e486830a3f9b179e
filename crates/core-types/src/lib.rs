//! # Core Types
//!
//! The shared data model for the price analytics workspace. Every other crate
//! speaks in terms of these types.
//!
//! - `RawTable`: the un-indexed table as it arrives from ingestion, all cells as text.
//! - `TimeFrame` / `PriceTable`: a date-indexed table of per-ticker numeric columns.
//! - `index_by_date`: the Time Indexer, turning a `RawTable` into a `PriceTable`.

pub mod error;
pub mod indexer;
pub mod raw;
pub mod table;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use indexer::{index_by_date, parse_price, parse_timestamp, DEFAULT_DATE_FIELD};
pub use raw::RawTable;
pub use table::{Column, PriceTable, TimeFrame};
