//! Filtered history traversal.
//!
//! Commits come out newest first by author timestamp; each reachable commit
//! is visited once. A commit is reported when it *touches* the filter: the
//! entry at the filtered path differs from the entry at that path in every
//! parent. Trees are content-addressed, so comparing the entry at a directory
//! path covers every path beneath it.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use revfs_core::id::ObjectId;
use revfs_core::types::{Commit, FileMode};

use crate::{RevStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryFilter {
    /// Every commit.
    All,
    /// Commits that changed the entry at exactly this path.
    Path(String),
    /// Commits that changed anything under this directory path.
    Prefix(String),
}

impl HistoryFilter {
    fn segments(&self) -> Option<Vec<String>> {
        match self {
            HistoryFilter::All => None,
            HistoryFilter::Path(p) | HistoryFilter::Prefix(p) => Some(
                p.split('/')
                    .filter(|s| !s.is_empty() && *s != ".")
                    .map(str::to_string)
                    .collect(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub id: ObjectId,
    pub author: String,
    pub timestamp_ms: u64,
    pub message: String,
}

impl CommitInfo {
    fn new(id: ObjectId, commit: &Commit) -> Self {
        Self {
            id,
            author: commit.author.clone(),
            timestamp_ms: commit.timestamp_ms,
            message: commit.message.clone(),
        }
    }
}

struct Pending {
    timestamp_ms: u64,
    seq: u64,
    id: ObjectId,
    commit: Commit,
}

impl Pending {
    fn key(&self) -> (u64, Reverse<u64>) {
        (self.timestamp_ms, Reverse(self.seq))
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Lazy, single-use history walk. Stops after the first error.
pub struct HistoryIter<'a> {
    store: &'a RevStore,
    segments: Option<Vec<String>>,
    start: Option<ObjectId>,
    queue: BinaryHeap<Pending>,
    seen: HashSet<ObjectId>,
    seq: u64,
    done: bool,
}

impl<'a> HistoryIter<'a> {
    pub(crate) fn new(store: &'a RevStore, from: ObjectId, filter: HistoryFilter) -> Self {
        tracing::debug!(from = %from.short_hex(), ?filter, "starting history walk");
        Self {
            store,
            segments: filter.segments(),
            start: Some(from),
            queue: BinaryHeap::new(),
            seen: HashSet::new(),
            seq: 0,
            done: false,
        }
    }

    fn enqueue(&mut self, id: ObjectId, commit: Commit) {
        if self.seen.insert(id) {
            self.seq += 1;
            self.queue.push(Pending {
                timestamp_ms: commit.timestamp_ms,
                seq: self.seq,
                id,
                commit,
            });
        }
    }

    fn step(&mut self) -> Result<Option<CommitInfo>, StoreError> {
        if let Some(start) = self.start.take() {
            let commit = self.store.load_commit(&start)?;
            self.enqueue(start, commit);
        }

        while let Some(Pending { id, commit, .. }) = self.queue.pop() {
            let mut parents = Vec::with_capacity(commit.parents.len());
            for parent_id in &commit.parents {
                parents.push(self.store.load_commit(parent_id)?);
            }

            let touched = self.touches(&commit, &parents)?;

            for (parent_id, parent) in commit.parents.iter().zip(parents) {
                self.enqueue(*parent_id, parent);
            }

            if touched {
                return Ok(Some(CommitInfo::new(id, &commit)));
            }
        }
        Ok(None)
    }

    fn touches(&self, commit: &Commit, parents: &[Commit]) -> Result<bool, StoreError> {
        let Some(segments) = &self.segments else {
            return Ok(true);
        };
        let here = entry_at(self.store, &commit.tree, segments)?;
        if parents.is_empty() {
            return Ok(here.is_some());
        }
        for parent in parents {
            if entry_at(self.store, &parent.tree, segments)? == here {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Iterator for HistoryIter<'_> {
    type Item = Result<CommitInfo, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(info)) => Some(Ok(info)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Object id and mode of the entry at `segments` below `tree`, if any.
fn entry_at(
    store: &RevStore,
    tree: &ObjectId,
    segments: &[String],
) -> Result<Option<(ObjectId, FileMode)>, StoreError> {
    let mut current = (*tree, FileMode::Directory);
    for segment in segments {
        if current.1 != FileMode::Directory {
            return Ok(None);
        }
        let tree = store.load_tree(&current.0)?;
        match tree.entry(segment) {
            Some(entry) => current = (entry.object_id, entry.mode),
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}
