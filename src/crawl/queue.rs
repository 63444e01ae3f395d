// src/crawl/queue.rs
// =============================================================================
// The list of listing pages still to visit, and how to address them.
//
// How it works:
// 1. The queue starts as [start_page, start_page + 1, ..., max_page - 1]
// 2. The controller always works on the front page
// 3. Once every listing on that page is handled, the page is removed
// 4. Nothing else ever changes the queue: no reordering, no re-insertion
//
// Because of (4), a traversal that is interrupted by a network failure can
// simply start again from the front. Completed pages are gone and are never
// fetched twice.
//
// Rust concepts:
// - VecDeque: efficient removal from the front
// - Url: building ?page=N URLs without string concatenation
// =============================================================================

use crate::error::CrawlResult;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageQueue {
    pages: VecDeque<u32>,
}

impl PageQueue {
    /// Pages `start..end` in ascending order.
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            pages: (start..end).collect(),
        }
    }

    // Restores an outstanding list, e.g. from a checkpoint
    pub fn from_pages(pages: impl IntoIterator<Item = u32>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
        }
    }

    /// The page the next traversal starts at.
    pub fn front(&self) -> Option<u32> {
        self.pages.front().copied()
    }

    /// Removes `page` once it has been fully processed.
    ///
    /// Only the front page can be completed; anything else is a no-op and
    /// returns false.
    pub fn complete(&mut self, page: u32) -> bool {
        if self.front() == Some(page) {
            self.pages.pop_front();
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.pages.iter().copied().collect()
    }
}

/// Turns a page index into the URL of that listing page.
#[derive(Debug, Clone)]
pub struct PageAddress {
    base: Url,
    // query parameter carrying the page number; None = every page is the base URL
    page_param: Option<String>,
}

impl PageAddress {
    pub fn new(base_url: &str, page_param: Option<String>) -> CrawlResult<Self> {
        Ok(Self {
            base: Url::parse(base_url)?,
            page_param,
        })
    }

    /// False when every page index maps to the same URL.
    pub fn is_paginated(&self) -> bool {
        self.page_param.is_some()
    }

    pub fn url_for(&self, page: u32) -> Url {
        let mut url = self.base.clone();
        if let Some(param) = &self.page_param {
            url.query_pairs_mut()
                .append_pair(param, &page.to_string());
        }
        url
    }
}
