//! In-memory collaborators for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::Cursor;

use revfs_core::id::ObjectId;
use revfs_core::types::{Commit, FileMode, TreeEntry};
use revfs_store::{CommitInfo, HistoryFilter, StoreError};

use crate::graph::{BlobStream, CommitStream, HistoryWalk, NodeKind, ObjectGraph};

enum FakeObject {
    Blob(Vec<u8>),
    Tree(Vec<TreeEntry>),
    Commit(Commit),
}

enum Script {
    Latest(ObjectId),
    Empty,
    Broken,
}

/// Object graph whose history answers every query with one scripted commit,
/// recording each filter it was asked about.
pub struct FakeGraph {
    objects: HashMap<ObjectId, FakeObject>,
    refs: HashMap<String, ObjectId>,
    next_id: u64,
    script: Script,
    blob_opens: Cell<usize>,
    walks: RefCell<Vec<HistoryFilter>>,
}

impl FakeGraph {
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            refs: HashMap::new(),
            next_id: 0,
            script: Script::Empty,
            blob_opens: Cell::new(0),
            walks: RefCell::new(Vec::new()),
        }
    }

    fn insert(&mut self, object: FakeObject) -> ObjectId {
        self.next_id += 1;
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&self.next_id.to_le_bytes());
        let id = ObjectId::from_bytes(bytes);
        self.objects.insert(id, object);
        id
    }

    pub fn blob(&mut self, data: &str) -> ObjectId {
        self.insert(FakeObject::Blob(data.as_bytes().to_vec()))
    }

    pub fn tree(&mut self, entries: Vec<(&str, FileMode, ObjectId)>) -> ObjectId {
        let entries = entries
            .into_iter()
            .map(|(name, mode, object_id)| TreeEntry {
                name: name.to_string(),
                mode,
                object_id,
            })
            .collect();
        self.insert(FakeObject::Tree(entries))
    }

    pub fn commit(&mut self, parents: Vec<ObjectId>, tree: ObjectId, timestamp_ms: u64) -> ObjectId {
        self.insert(FakeObject::Commit(Commit {
            parents,
            tree,
            author: "fake".to_string(),
            timestamp_ms,
            message: String::new(),
        }))
    }

    pub fn set_ref(&mut self, name: &str, target: ObjectId) {
        self.refs.insert(name.to_string(), target);
    }

    pub fn every_filter_touched_by(&mut self, commit: ObjectId) {
        self.script = Script::Latest(commit);
    }

    pub fn clear_history(&mut self) {
        self.script = Script::Empty;
    }

    pub fn break_history(&mut self) {
        self.script = Script::Broken;
    }

    pub fn blob_opens(&self) -> usize {
        self.blob_opens.get()
    }

    pub fn walks(&self) -> Vec<HistoryFilter> {
        self.walks.borrow().clone()
    }

    fn get(&self, id: &ObjectId) -> Result<&FakeObject, StoreError> {
        self.objects.get(id).ok_or(StoreError::ObjectNotFound(*id))
    }
}

fn kind_name(object: &FakeObject) -> &'static str {
    match object {
        FakeObject::Blob(_) => "blob",
        FakeObject::Tree(_) => "tree",
        FakeObject::Commit(_) => "commit",
    }
}

fn unexpected(id: &ObjectId, expected: &'static str, object: &FakeObject) -> StoreError {
    StoreError::UnexpectedObject {
        id: *id,
        expected,
        actual: kind_name(object),
    }
}

impl ObjectGraph for FakeGraph {
    fn resolve_revision(&self, revision: &str) -> Result<ObjectId, StoreError> {
        self.refs
            .get(revision)
            .copied()
            .ok_or_else(|| StoreError::RevisionNotFound(revision.to_string()))
    }

    fn load_commit(&self, id: &ObjectId) -> Result<Commit, StoreError> {
        match self.get(id)? {
            FakeObject::Commit(commit) => Ok(commit.clone()),
            other => Err(unexpected(id, "commit", other)),
        }
    }

    fn stat_node(&self, id: &ObjectId) -> Result<NodeKind, StoreError> {
        Ok(match self.get(id)? {
            FakeObject::Tree(_) => NodeKind::Directory,
            FakeObject::Blob(data) => NodeKind::File {
                size: data.len() as u64,
            },
            other => NodeKind::Unsupported(kind_name(other)),
        })
    }

    fn read_dir(&self, id: &ObjectId) -> Result<Vec<TreeEntry>, StoreError> {
        match self.get(id)? {
            FakeObject::Tree(entries) => Ok(entries.clone()),
            other => Err(unexpected(id, "tree", other)),
        }
    }

    fn open_blob(&self, id: &ObjectId) -> Result<BlobStream, StoreError> {
        match self.get(id)? {
            FakeObject::Blob(data) => {
                self.blob_opens.set(self.blob_opens.get() + 1);
                Ok(Box::new(Cursor::new(data.clone())))
            }
            other => Err(unexpected(id, "blob", other)),
        }
    }
}

impl HistoryWalk for FakeGraph {
    fn walk(&self, from: &ObjectId, filter: HistoryFilter) -> CommitStream<'_> {
        self.walks.borrow_mut().push(filter);
        let item = match &self.script {
            Script::Latest(id) => Some(self.load_commit(id).map(|commit| CommitInfo {
                id: *id,
                author: commit.author,
                timestamp_ms: commit.timestamp_ms,
                message: commit.message,
            })),
            Script::Empty => None,
            Script::Broken => Some(Err(StoreError::ObjectNotFound(*from))),
        };
        Box::new(item.into_iter())
    }
}
