// src/extract/summary.rs
// =============================================================================
// The Listing-Summary Extractor.
//
// A listing page repeats one container per posting:
//
//   <div class="lists">
//     <a href="/job/123">
//       <div class="listsPosition">Engineer</div>
//       <div class="listsCity">Pristina</div>
//     </a>
//   </div>
//
// Every container becomes one SummaryCandidate. A candidate that is missing
// its link, title or city is an Err, and the controller skips it. One bad
// container never hides the others.
// =============================================================================

use super::pagination::Pagination;
use super::strategy::{compile, FieldStrategy};
use crate::error::{CrawlResult, ListingError};
use crate::model::{ListingSummary, SequenceId};
use scraper::{Html, Selector};
use url::Url;

// Fields of one container, before it has been given a sequence id.
// The controller assigns the id once the detail page has answered, so a
// detail fetch that is retried does not use up an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFields {
    pub link: String,
    pub title: String,
    pub city: String,
}

impl SummaryFields {
    pub fn with_id(self, sequence_id: SequenceId) -> ListingSummary {
        ListingSummary {
            link: self.link,
            title: self.title,
            city: self.city,
            sequence_id,
        }
    }
}

pub type SummaryCandidate = Result<SummaryFields, ListingError>;

/// Everything the controller needs from one listing page.
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub max_page: u32,
    pub candidates: Vec<SummaryCandidate>,
}

pub struct SummaryExtractor {
    container: Selector,
    link: FieldStrategy,
    title: FieldStrategy,
    city: FieldStrategy,
    pagination: Pagination,
}

impl SummaryExtractor {
    pub fn new() -> CrawlResult<Self> {
        Ok(Self {
            container: compile("div.lists")?,
            link: FieldStrategy::new("link", &["a[href]"])?,
            title: FieldStrategy::new("title", &["div.listsPosition"])?,
            city: FieldStrategy::new("city", &["div.listsCity"])?,
            pagination: Pagination::new()?,
        })
    }

    pub fn extract(&self, html: &str, page_url: &Url) -> ListingPage {
        let document = Html::parse_document(html);

        let candidates = document
            .select(&self.container)
            .map(|container| -> SummaryCandidate {
                let anchor = self.link.require(container)?;
                let href = anchor.value().attr("href").ok_or(ListingError::MissingAttribute {
                    field: "link",
                    attr: "href",
                })?;
                let link = resolve_url(page_url, href).ok_or_else(|| ListingError::InvalidLink {
                    link: href.to_string(),
                })?;

                Ok(SummaryFields {
                    link,
                    title: self.title.require_text(container)?,
                    city: self.city.require_text(container)?,
                })
            })
            .collect();

        ListingPage {
            max_page: self.pagination.max_page(&document),
            candidates,
        }
    }
}

// Resolves a possibly-relative href against the listing page URL
//
// Only http(s) targets are kept; a detail page behind mailto: or
// javascript: is not something we can fetch.
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    let url = match Url::parse(href) {
        Ok(url) => url,
        Err(_) => base.join(href).ok()?,
    };

    match url.scheme() {
        "http" | "https" => Some(url.to_string()),
        _ => None,
    }
}
