// src/crawl/state.rs
// =============================================================================
// RunState: everything one run owns while it is in progress.
//
// - the outstanding page queue
// - repeat, retry and skip counters
// - the sequence id counter
// - the accumulated records
// - a cursor on the page currently being worked on
//
// The cursor counts how many containers of the front page were already
// handled (turned into a record or skipped). When a network failure
// interrupts the page and the traversal restarts on it, those containers
// are passed over instead of being processed a second time.
//
// The cursor, the records and the id counter all travel in the checkpoint.
// The saved id is the one after the last HANDLED container, so a container
// interrupted by a fatal error gets the same id again after a resume.
// =============================================================================

use super::checkpoint::Checkpoint;
use super::queue::PageQueue;
use crate::error::ListingError;
use crate::model::{SequenceCounter, SequenceId};
use crate::sink::Accumulator;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    pub page: u32,
    pub handled: usize,
}

#[derive(Debug)]
pub struct RunState {
    pub(crate) queue: PageQueue,
    pub(crate) repeats: u32,
    pub(crate) retries: u32,
    pub(crate) skipped: u64,
    pub(crate) pages_completed: u32,
    pub(crate) reached_last_page: bool,
    pub(crate) ids: SequenceCounter,
    pub(crate) accumulator: Accumulator,
    cursor: Option<PageCursor>,
    // ids.peek() as of the last handled container
    handled_next_id: u64,
}

impl RunState {
    pub fn new(queue: PageQueue) -> Self {
        let ids = SequenceCounter::default();
        Self {
            handled_next_id: ids.peek(),
            queue,
            repeats: 0,
            retries: 0,
            skipped: 0,
            pages_completed: 0,
            reached_last_page: false,
            ids,
            accumulator: Accumulator::new(),
            cursor: None,
        }
    }

    pub fn from_checkpoint(checkpoint: &Checkpoint) -> Self {
        Self {
            skipped: checkpoint.skipped,
            reached_last_page: checkpoint.finished,
            ids: SequenceCounter::starting_at(checkpoint.next_sequence_id),
            handled_next_id: checkpoint.next_sequence_id,
            accumulator: Accumulator::from_records(checkpoint.records.clone()),
            cursor: checkpoint.cursor,
            ..Self::new(PageQueue::from_pages(checkpoint.outstanding.iter().copied()))
        }
    }

    pub fn to_checkpoint(&self, run_stamp: &str) -> Checkpoint {
        Checkpoint {
            run_stamp: run_stamp.to_string(),
            outstanding: self.queue.to_vec(),
            next_sequence_id: self.handled_next_id,
            skipped: self.skipped,
            cursor: self.cursor,
            records: self.accumulator.records().to_vec(),
            finished: self.reached_last_page || self.queue.is_empty(),
        }
    }

    pub fn records(&self) -> usize {
        self.accumulator.len()
    }

    // Containers of `page` already handled in an earlier, interrupted traversal
    pub(crate) fn handled_on(&self, page: u32) -> usize {
        match self.cursor {
            Some(cursor) if cursor.page == page => cursor.handled,
            _ => 0,
        }
    }

    pub(crate) fn mark_handled(&mut self, page: u32) {
        let handled = self.handled_on(page) + 1;
        self.cursor = Some(PageCursor { page, handled });
        self.handled_next_id = self.ids.peek();
    }

    pub(crate) fn skip(&mut self, sequence_id: SequenceId, reason: &ListingError) {
        self.skipped += 1;
        warn!(
            %sequence_id,
            reason = %reason,
            skipped = self.skipped,
            "Encountered problem, skipping container"
        );
    }

    pub(crate) fn complete_page(&mut self, page: u32) {
        if self.queue.complete(page) {
            self.pages_completed += 1;
        }
        self.cursor = None;
    }
}
