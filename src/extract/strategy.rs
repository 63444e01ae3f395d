// src/extract/strategy.rs
// =============================================================================
// Prioritized selector lists.
//
// The portal serves more than one template for the same information (the
// company name is a <b> on one template and a <div> on another). Instead of
// nesting "try this, on failure try that" we keep an ordered list of CSS
// selectors per field. The first selector that matches wins.
// =============================================================================

use crate::error::{CrawlError, CrawlResult, ListingError};
use scraper::{ElementRef, Selector};

pub fn compile(selector: &str) -> CrawlResult<Selector> {
    Selector::parse(selector).map_err(|e| CrawlError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Ordered selector candidates for one field.
#[derive(Debug, Clone)]
pub struct FieldStrategy {
    field: &'static str,
    candidates: Vec<Selector>,
}

impl FieldStrategy {
    pub fn new(field: &'static str, candidates: &[&str]) -> CrawlResult<Self> {
        let candidates = candidates
            .iter()
            .map(|s| compile(s))
            .collect::<CrawlResult<Vec<_>>>()?;
        Ok(Self { field, candidates })
    }

    // First element matched by the first selector that matches anything
    pub fn find<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.candidates
            .iter()
            .find_map(|selector| scope.select(selector).next())
    }

    pub fn find_all<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        self.candidates
            .iter()
            .map(|selector| scope.select(selector).collect::<Vec<_>>())
            .find(|found| !found.is_empty())
            .unwrap_or_default()
    }

    /// Like `find`, but an absent element is a listing failure.
    pub fn require<'a>(&self, scope: ElementRef<'a>) -> Result<ElementRef<'a>, ListingError> {
        self.find(scope)
            .ok_or(ListingError::MissingElement { field: self.field })
    }

    pub fn require_text(&self, scope: ElementRef<'_>) -> Result<String, ListingError> {
        self.require(scope).map(element_text)
    }
}

// Text content with whitespace runs collapsed to single spaces
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
