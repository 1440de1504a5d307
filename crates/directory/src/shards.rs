//! Shard-by-shard candidate enumeration.
//!
//! The player base is split into 26 shards, one per leading name letter.
//! [`ShardIterator`] walks them in order, listing each shard once and
//! handing out bounded batches so a scheduling tick never does unbounded
//! work. The shard index only ever moves forward.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::debug;

use crate::traits::PlayerDirectory;

/// The shard order: one leading letter each.
pub const SHARD_LETTERS: [char; 26] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// One batch of candidates pulled from the iterator.
#[derive(Debug)]
pub struct Batch {
    pub names: Vec<String>,
    /// Whether this batch drained the shard it was pulled from.
    pub shard_exhausted: bool,
}

/// Enumerates candidate record names shard-by-shard.
///
/// Each shard is listed exactly once, when the iterator first reaches it,
/// so every candidate is evaluated at most once per session even if files
/// appear mid-run.
pub struct ShardIterator {
    directory: Arc<dyn PlayerDirectory>,
    shard: usize,
    pending: VecDeque<String>,
    primed: bool,
    finished: bool,
}

impl ShardIterator {
    pub fn new(directory: Arc<dyn PlayerDirectory>) -> Self {
        Self {
            directory,
            shard: 0,
            pending: VecDeque::new(),
            primed: false,
            finished: false,
        }
    }

    /// Index of the shard currently being drained (monotonic, 0..=25).
    pub fn shard_index(&self) -> usize {
        self.shard
    }

    /// Letter of the current shard.
    pub fn shard_letter(&self) -> char {
        SHARD_LETTERS[self.shard.min(SHARD_LETTERS.len() - 1)]
    }

    /// Whether the last shard has been drained.
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Pull up to `max` candidate names from the current shard.
    ///
    /// When the returned batch exhausts the shard the iterator advances to
    /// the next one; after the last shard [`finished`](Self::finished)
    /// becomes true and further calls return empty exhausted batches.
    pub fn next_batch(&mut self, max: usize) -> Batch {
        if self.finished {
            return Batch {
                names: Vec::new(),
                shard_exhausted: true,
            };
        }

        if !self.primed {
            let letter = self.shard_letter();
            let listed = self.directory.list_shard(letter);
            debug!(shard = %letter, candidates = listed.len(), "listed shard");
            self.pending = listed.into();
            self.primed = true;
        }

        let take = max.min(self.pending.len());
        let names: Vec<String> = self.pending.drain(..take).collect();
        let shard_exhausted = self.pending.is_empty();

        if shard_exhausted {
            if self.shard + 1 == SHARD_LETTERS.len() {
                self.finished = true;
            } else {
                self.shard += 1;
                self.primed = false;
            }
        }

        Batch {
            names,
            shard_exhausted,
        }
    }
}
