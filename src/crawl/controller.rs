// src/crawl/controller.rs
// =============================================================================
// The Run Controller.
//
// How a run goes:
// 1. Each outer iteration bumps the repeat counter. Once it reaches the
//    repeat ceiling the run stops and returns what it has (not an error).
// 2. A traversal walks the outstanding page queue front to back. For every
//    page: fetch it, discover the real last page, handle each listing
//    container, then remove the page from the queue. Without a page
//    parameter every page index is the same URL, so the base page is the
//    only page and its pagination links are not followed.
// 3. Each listing: fetch its detail page, take the next sequence id,
//    extract the detail fields (which may download an attachment), back up
//    the raw page, append the record.
// 4. The run is done when the last page is reached or the queue is empty.
//
// Failure handling:
// - A transport failure on any page fetch ends the current traversal. The
//   controller backs off (random jitter + repeat counter, in seconds) and
//   starts a new outer iteration on the same, partly consumed queue.
// - A malformed listing is skipped and counted; the page carries on.
// - A backup that cannot be written ends the run with an error. The error
//   still carries the records captured so far, and the checkpoint is saved.
//
// Everything is awaited in sequence. There is exactly one request in
// flight at any time, preceded by a fixed politeness delay.
// =============================================================================

use super::checkpoint::CheckpointFile;
use super::queue::{PageAddress, PageQueue};
use super::state::RunState;
use crate::error::{CrawlError, CrawlResult, ListingError};
use crate::extract::{DetailExtractor, DetailRequest, SummaryExtractor, SummaryFields};
use crate::fetch::{FetchError, Fetcher};
use crate::model::{file_stamp, ListingRecord};
use crate::sink::{BackupSink, DocumentStore, ResultTable};
use chrono::Local;
use serde::Serialize;
use std::ops::RangeInclusive;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    FirstRun,
    Retrying,
    Done,
}

// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Last page reached or queue exhausted
    Completed,
    /// Repeat ceiling hit; the result is partial
    RepeatLimit,
    /// A fatal error stopped the run; the result is partial
    Aborted,
}

/// Delays between requests and before retries.
#[derive(Debug, Clone)]
pub struct Politeness {
    pub request_delay: Duration,
    /// Random part of the backoff, in whole seconds
    pub backoff_jitter_secs: RangeInclusive<u64>,
}

impl Default for Politeness {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_secs(1),
            backoff_jitter_secs: 2..=5,
        }
    }
}

impl Politeness {
    pub fn backoff(&self, repeats: u32) -> Duration {
        let jitter = fastrand::u64(self.backoff_jitter_secs.clone());
        Duration::from_secs(jitter + u64::from(repeats))
    }
}

/// Where a run writes its side effects.
#[derive(Debug, Clone)]
pub struct RunSinks {
    pub backups: BackupSink,
    pub documents: DocumentStore,
    pub checkpoint: Option<CheckpointFile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_stamp: String,
    pub termination: Termination,
    pub phase: RunPhase,
    pub records: usize,
    pub skipped: u64,
    pub repeats: u32,
    pub retries: u32,
    pub pages_completed: u32,
    pub pages_outstanding: Vec<u32>,
    pub backoff_secs: Vec<u64>,
}

#[derive(Debug)]
pub struct RunOutcome {
    pub table: ResultTable,
    pub report: RunReport,
}

/// A run that stopped on a fatal error, with what it captured before that.
#[derive(Error, Debug)]
#[error("run aborted after {} records", .partial.report.records)]
pub struct RunFailure {
    #[source]
    pub source: CrawlError,
    pub partial: Box<RunOutcome>,
}

// Why a traversal stopped early
enum Interrupt {
    Transport(FetchError),
    Fatal(CrawlError),
}

impl From<CrawlError> for Interrupt {
    fn from(error: CrawlError) -> Self {
        Interrupt::Fatal(error)
    }
}

pub struct RunController<F> {
    fetcher: F,
    address: PageAddress,
    max_page: u32,
    run_stamp: String,
    sinks: RunSinks,
    politeness: Politeness,
    summary: SummaryExtractor,
    detail: DetailExtractor,
}

impl<F: Fetcher> RunController<F> {
    /// `max_page` is the exclusive end of the initial page list.
    pub fn new(
        fetcher: F,
        address: PageAddress,
        max_page: u32,
        run_stamp: impl Into<String>,
        sinks: RunSinks,
        politeness: Politeness,
    ) -> CrawlResult<Self> {
        Ok(Self {
            fetcher,
            address,
            max_page,
            run_stamp: run_stamp.into(),
            sinks,
            politeness,
            summary: SummaryExtractor::new()?,
            detail: DetailExtractor::new()?,
        })
    }

    #[cfg(test)]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fresh run over pages `start_page..max_page`.
    pub async fn run(&self, start_page: u32, max_repeats: u32) -> Result<RunOutcome, RunFailure> {
        let state = RunState::new(PageQueue::new(start_page, self.max_page));
        self.resume(state, max_repeats).await
    }

    /// Continues from an existing state, e.g. one restored from a checkpoint.
    pub async fn resume(
        &self,
        mut state: RunState,
        max_repeats: u32,
    ) -> Result<RunOutcome, RunFailure> {
        let mut phase = RunPhase::FirstRun;
        let mut termination = Termination::RepeatLimit;
        let mut backoff_secs = Vec::new();

        if state.reached_last_page || state.queue.is_empty() {
            info!("Nothing left to crawl");
            phase = RunPhase::Done;
            termination = Termination::Completed;
        }

        while phase != RunPhase::Done {
            state.repeats += 1;
            if state.repeats >= max_repeats {
                warn!(
                    repeats = state.repeats,
                    outstanding = state.queue.len(),
                    "Repeat limit reached, returning partial result"
                );
                phase = RunPhase::Done;
                break;
            }

            info!(iteration = state.repeats, ?phase, "Running iteration of parser");
            match self.traverse(&mut state).await {
                Ok(()) => {
                    phase = RunPhase::Done;
                    termination = Termination::Completed;
                }
                Err(Interrupt::Transport(error)) => {
                    let wait = self.politeness.backoff(state.repeats);
                    warn!(
                        error = %error,
                        wait_secs = wait.as_secs(),
                        "Connection was interrupted, waiting before continuing"
                    );
                    state.retries += 1;
                    backoff_secs.push(wait.as_secs());
                    tokio::time::sleep(wait).await;
                    phase = RunPhase::Retrying;
                }
                Err(Interrupt::Fatal(source)) => {
                    if let Err(error) = self.save_checkpoint(&state) {
                        warn!(error = %error, "Could not save checkpoint");
                    }
                    return Err(self.abort(source, state, phase, backoff_secs));
                }
            }
        }

        if let Err(source) = self.save_checkpoint(&state) {
            return Err(self.abort(source, state, phase, backoff_secs));
        }

        let outcome = self.outcome(state, termination, phase, backoff_secs);
        info!(
            records = outcome.report.records,
            skipped = outcome.report.skipped,
            retries = outcome.report.retries,
            "Run finished"
        );
        Ok(outcome)
    }

    fn abort(
        &self,
        source: CrawlError,
        state: RunState,
        phase: RunPhase,
        backoff_secs: Vec<u64>,
    ) -> RunFailure {
        warn!(error = %source, records = state.records(), "Run aborted");
        let partial = self.outcome(state, Termination::Aborted, phase, backoff_secs);
        RunFailure {
            source,
            partial: Box::new(partial),
        }
    }

    fn outcome(
        &self,
        state: RunState,
        termination: Termination,
        phase: RunPhase,
        backoff_secs: Vec<u64>,
    ) -> RunOutcome {
        let report = RunReport {
            run_stamp: self.run_stamp.clone(),
            termination,
            phase,
            records: state.records(),
            skipped: state.skipped,
            repeats: state.repeats,
            retries: state.retries,
            pages_completed: state.pages_completed,
            pages_outstanding: state.queue.to_vec(),
            backoff_secs,
        };
        RunOutcome {
            table: state.accumulator.finalize(),
            report,
        }
    }

    // One pass over the outstanding pages, starting at the front
    async fn traverse(&self, state: &mut RunState) -> Result<(), Interrupt> {
        while let Some(page) = state.queue.front() {
            let url = self.address.url_for(page);
            self.pause().await;
            let html = self
                .fetcher
                .fetch_page(url.as_str())
                .await
                .map_err(Interrupt::Transport)?;

            let listing = self.summary.extract(&html, &url);
            let already_handled = state.handled_on(page);
            info!(
                page,
                max_page = listing.max_page,
                containers = listing.candidates.len(),
                already_handled,
                "Reading page"
            );

            for candidate in listing.candidates.into_iter().skip(already_handled) {
                match candidate {
                    Ok(fields) => self.process_listing(fields, state).await?,
                    Err(reason) => {
                        let sequence_id = state.ids.next_id();
                        state.skip(sequence_id, &reason);
                    }
                }
                state.mark_handled(page);
            }

            state.complete_page(page);
            self.save_checkpoint(state)?;

            let last_page = if self.address.is_paginated() {
                listing.max_page
            } else {
                1
            };
            if page >= last_page {
                debug!(page, "Reached the last page");
                state.reached_last_page = true;
                return Ok(());
            }
        }
        Ok(())
    }

    // The sequence id is taken only after the detail page answered. From
    // there on nothing can interrupt the listing except a fatal error.
    async fn process_listing(
        &self,
        fields: SummaryFields,
        state: &mut RunState,
    ) -> Result<(), Interrupt> {
        let captured_at = Local::now();

        self.pause().await;
        let fetched = match self.fetcher.fetch_page(&fields.link).await {
            Err(error) if error.is_transient() => return Err(Interrupt::Transport(error)),
            other => other,
        };

        let summary = fields.with_id(state.ids.next_id());
        let sequence_id = summary.sequence_id;
        let html = match fetched {
            Ok(html) => html,
            Err(error) => {
                let reason = ListingError::DetailUnavailable {
                    reason: error.to_string(),
                };
                state.skip(sequence_id, &reason);
                return Ok(());
            }
        };

        let request = DetailRequest {
            page_url: &summary.link,
            sequence_id,
            today: captured_at.date_naive(),
        };
        let detail = match self
            .detail
            .extract(&html, request, &self.fetcher, &self.sinks.documents)
            .await
        {
            Ok(detail) => detail,
            Err(reason) => {
                state.skip(sequence_id, &reason);
                return Ok(());
            }
        };

        self.sinks
            .backups
            .persist(&html, &self.run_stamp, &file_stamp(&captured_at), sequence_id)
            .await?;

        let record = ListingRecord::new(captured_at, summary, detail);
        debug!(
            sequence_id = %record.sequence_id(),
            title = %record.summary.title,
            has_document = record.detail.has_document,
            "Listing captured"
        );
        state.accumulator.append(record);
        Ok(())
    }

    async fn pause(&self) {
        if !self.politeness.request_delay.is_zero() {
            tokio::time::sleep(self.politeness.request_delay).await;
        }
    }

    fn save_checkpoint(&self, state: &RunState) -> CrawlResult<()> {
        match &self.sinks.checkpoint {
            Some(file) => file.save(&state.to_checkpoint(&self.run_stamp)),
            None => Ok(()),
        }
    }
}
