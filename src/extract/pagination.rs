// src/extract/pagination.rs
// Reads the highest page number a listing page links to.
// No pagination markup at all means the listing fits on a single page.

use super::strategy::{element_text, FieldStrategy};
use crate::error::CrawlResult;
use scraper::Html;

pub struct Pagination {
    links: FieldStrategy,
}

impl Pagination {
    pub fn new() -> CrawlResult<Self> {
        Ok(Self {
            links: FieldStrategy::new("pagination", &[".pagination a", ".paging a"])?,
        })
    }

    pub fn max_page(&self, document: &Html) -> u32 {
        self.links
            .find_all(document.root_element())
            .into_iter()
            .filter_map(|link| element_text(link).parse::<u32>().ok())
            .max()
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highest_numbered_link_wins() {
        let html = Html::parse_document(
            r#"<ul class="pagination"><a>1</a><a>2</a><a>7</a><a>Next</a></ul>"#,
        );
        assert_eq!(Pagination::new().unwrap().max_page(&html), 7);
    }

    #[test]
    fn test_no_pagination_is_single_page() {
        let html = Html::parse_document("<div class=\"lists\"></div>");
        assert_eq!(Pagination::new().unwrap().max_page(&html), 1);
    }
}
