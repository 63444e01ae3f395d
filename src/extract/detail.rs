// src/extract/detail.rs
// =============================================================================
// The Listing-Detail Extractor.
//
// A detail page has two regions we care about:
//
// - the "top info" block (containerRightAreaTopArea) with views, category,
//   days remaining and contract type, each in its own listingArea box
// - the description (containerLeftAreDescription), which sometimes embeds
//   an image or PDF of the full job advert
//
// Field policy:
// - views, category, days remaining, contract type, description and company
//   name are required. A missing one fails the listing.
// - days remaining that are not a number mean "expires today".
// - company name has two templates in the wild, tried in order.
// - the attachment is best-effort. Whatever goes wrong while locating or
//   downloading it, the listing simply has no document.
//
// Parsing is synchronous and finishes before the download is awaited, so
// no parsed document is ever held across an await point.
// =============================================================================

use super::strategy::{compile, FieldStrategy};
use crate::error::{CrawlResult, ListingError};
use crate::fetch::Fetcher;
use crate::model::{ListingDetail, SequenceId};
use crate::sink::DocumentStore;
use chrono::{Days, NaiveDate};
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

/// Fields read from the markup, before the attachment has been fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPage {
    pub company_name: String,
    pub expiration_date: NaiveDate,
    pub job_category: String,
    pub job_description: String,
    pub contract_type: String,
    pub view_count: u64,
    /// Raw src/href of the embedded attachment, if the markup has one
    pub attachment: Option<String>,
}

impl DetailPage {
    pub fn into_detail(self, has_document: bool) -> ListingDetail {
        ListingDetail {
            company_name: self.company_name,
            expiration_date: self.expiration_date,
            job_category: self.job_category,
            job_description: self.job_description,
            contract_type: self.contract_type,
            view_count: self.view_count,
            has_document,
        }
    }
}

// Which listing a detail page belongs to
#[derive(Debug, Clone, Copy)]
pub struct DetailRequest<'a> {
    pub page_url: &'a str,
    pub sequence_id: SequenceId,
    /// Capture date, the base for the expiration date
    pub today: NaiveDate,
}

pub struct DetailExtractor {
    top_info: FieldStrategy,
    views: FieldStrategy,
    category: FieldStrategy,
    days_remaining: FieldStrategy,
    contract: FieldStrategy,
    description: FieldStrategy,
    company: FieldStrategy,
    // (selector, attribute holding the URL), tried in order
    attachments: Vec<(Selector, &'static str)>,
}

impl DetailExtractor {
    pub fn new() -> CrawlResult<Self> {
        Ok(Self {
            top_info: FieldStrategy::new("top_info", &["div.containerRightAreaTopArea"])?,
            views: FieldStrategy::new(
                "views",
                &["div.listingArea.listingArea3.listingAreaTopComp b"],
            )?,
            category: FieldStrategy::new(
                "job_category",
                &["div.listingArea.listingArea1.listingArea3Cat b"],
            )?,
            days_remaining: FieldStrategy::new(
                "days_remaining",
                &["div.listingArea.listingArea2.listingArea3Exp b"],
            )?,
            contract: FieldStrategy::new(
                "type_of_contract",
                &["div.listingArea.listingArea3.listingArea3Orar b"],
            )?,
            description: FieldStrategy::new("job_description", &["div.containerLeftAreDescription"])?,
            company: FieldStrategy::new(
                "company_name",
                &[
                    "b.containerLeftAreaTopAreaRightTitleComp",
                    "div.containerLeftAreaTopAreaRightTitleComp.containerLeftAreaTopAreaRightTitleCompT",
                ],
            )?,
            attachments: vec![
                (compile("div.containerLeftAreDescription p img")?, "src"),
                (compile("div.containerLeftAreDescription a[href$='.pdf']")?, "href"),
            ],
        })
    }

    /// Reads every field from the markup. No network access.
    pub fn parse(&self, html: &str, today: NaiveDate) -> Result<DetailPage, ListingError> {
        let document = Html::parse_document(html);
        let root = document.root_element();

        let top = self.top_info.require(root)?;
        let views_text = self.views.require_text(top)?;
        let view_count = parse_count(&views_text).ok_or(ListingError::InvalidField {
            field: "views",
            value: views_text,
        })?;
        let days_text = self.days_remaining.require_text(top)?;

        Ok(DetailPage {
            company_name: self.company.require_text(root)?,
            expiration_date: expiration_date(&days_text, today),
            job_category: self.category.require_text(top)?,
            job_description: self.description.require_text(root)?,
            contract_type: self.contract.require_text(top)?,
            view_count,
            attachment: self.attachment_link(&document),
        })
    }

    /// Parses the page, then downloads the attachment if it has one.
    pub async fn extract<F>(
        &self,
        html: &str,
        request: DetailRequest<'_>,
        fetcher: &F,
        documents: &DocumentStore,
    ) -> Result<ListingDetail, ListingError>
    where
        F: Fetcher + ?Sized,
    {
        let page = self.parse(html, request.today)?;

        let has_document = match page.attachment.as_deref() {
            Some(link) => download_attachment(fetcher, documents, link, request).await,
            None => false,
        };

        Ok(page.into_detail(has_document))
    }

    fn attachment_link(&self, document: &Html) -> Option<String> {
        let root = document.root_element();
        for (selector, attr) in &self.attachments {
            if let Some(element) = root.select(selector).next() {
                match element.value().attr(attr) {
                    Some(link) if !link.trim().is_empty() => return Some(link.trim().to_string()),
                    _ => debug!(attr, "attachment element without a usable link"),
                }
            }
        }
        None
    }
}

// Fetch and store one attachment; true only when the file was written
async fn download_attachment<F>(
    fetcher: &F,
    documents: &DocumentStore,
    link: &str,
    request: DetailRequest<'_>,
) -> bool
where
    F: Fetcher + ?Sized,
{
    let sequence_id = request.sequence_id;
    let url = match attachment_url(request.page_url, link) {
        Some(url) => url,
        None => {
            warn!(%sequence_id, link, "could not read attachment link, skipping");
            return false;
        }
    };

    if !matches!(url.scheme(), "http" | "https") {
        warn!(%sequence_id, scheme = url.scheme(), "unsupported attachment scheme, skipping");
        return false;
    }

    let response = match fetcher.fetch_document(&url).await {
        Ok(response) => response,
        Err(e) => {
            debug!(%sequence_id, error = %e, "attachment download failed");
            return false;
        }
    };

    if !response.is_success() {
        debug!(%sequence_id, status = response.status, "attachment not available");
        return false;
    }

    match documents
        .save(sequence_id, &document_extension(&url), &response.bytes)
        .await
    {
        Ok(path) => {
            debug!(%sequence_id, path = %path.display(), "attachment saved");
            true
        }
        Err(e) => {
            warn!(%sequence_id, error = %e, "could not write attachment");
            false
        }
    }
}

fn attachment_url(page_url: &str, link: &str) -> Option<Url> {
    match Url::parse(link) {
        Ok(url) => Some(url),
        Err(_) => Url::parse(page_url).ok()?.join(link).ok(),
    }
}

// Extension from the last path segment, "bin" when there is none
fn document_extension(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "bin".to_string())
}

// "1.234" or "1 234" -> 1234
fn parse_count(text: &str) -> Option<u64> {
    let digits: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.' && *c != ',')
        .collect();
    digits.parse().ok()
}

// "5 ditë" -> today + 5; anything that does not start with a number -> today
fn expiration_date(days_text: &str, today: NaiveDate) -> NaiveDate {
    let shifted = match leading_integer(days_text) {
        Some(days) if days >= 0 => today.checked_add_days(Days::new(days.unsigned_abs())),
        Some(days) => today.checked_sub_days(Days::new(days.unsigned_abs())),
        None => Some(today),
    };
    shifted.unwrap_or(today)
}

fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    let end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text[..end].parse().ok()
}
