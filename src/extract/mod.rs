// src/extract/mod.rs
// =============================================================================
// Turning markup into listing data.
//
// Submodules:
// - strategy: ordered selector lists ("try this template, then that one")
// - summary: one ListingSummary per container on a listing page
// - pagination: how many listing pages there really are
// - detail: the extended fields of one listing, plus its attachment
// =============================================================================

mod detail;
mod pagination;
mod strategy;
mod summary;

pub use detail::{DetailExtractor, DetailRequest};
pub use summary::{SummaryExtractor, SummaryFields};
