// src/crawl/mod.rs
// =============================================================================
// The Run Controller and the state it owns.
//
// Submodules:
// - queue: outstanding listing pages and their URLs
// - state: RunState (counters, cursor, accumulated records)
// - checkpoint: RunState on disk, for resuming in a later process
// - controller: the retry loop that drives everything
// =============================================================================

mod checkpoint;
mod controller;
mod queue;
mod state;

pub use checkpoint::{Checkpoint, CheckpointFile};
pub use controller::{Politeness, RunController, RunReport, RunSinks, Termination};
pub use queue::PageAddress;
pub use state::RunState;
