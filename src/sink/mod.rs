// src/sink/mod.rs
// =============================================================================
// Everything a processed listing leaves behind.
//
// Submodules:
// - backup: raw detail page, one text file per listing
// - document: downloaded attachments
// - accumulator: the in-memory result set of ListingRecords
// - export: the result set written out as one CSV table
// =============================================================================

mod accumulator;
mod backup;
mod document;
mod export;

pub use accumulator::{Accumulator, ResultTable};
pub use backup::BackupSink;
pub use document::DocumentStore;
pub use export::write_csv;
