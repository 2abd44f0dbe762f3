use std::collections::BTreeMap;
use std::io::Read;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use revfs_core::id::ObjectId;
use revfs_core::object::Object;
use revfs_core::types::{Blob, Commit, FileMode, Tree, TreeEntry};
use revfs_store::RevStore;
use revfs_view::{Intent, Snapshot, Stat, ViewError};

fn make_test_store() -> (tempfile::TempDir, RevStore) {
    let tmp = tempfile::tempdir().unwrap();
    let store = RevStore::init(tmp.path()).unwrap();
    (tmp, store)
}

fn at(ms: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_millis(ms)
}

enum Node {
    File(Vec<u8>),
    Dir(BTreeMap<String, Node>),
}

/// Store a tree built from `(path, content)` pairs. Directories come out in
/// name order.
fn store_tree(store: &RevStore, files: &[(&str, &str)]) -> ObjectId {
    let mut root = BTreeMap::new();
    for (path, content) in files {
        let mut dir = &mut root;
        let mut segments: Vec<&str> = path.split('/').collect();
        let name = segments.pop().unwrap();
        for segment in segments {
            let node = dir
                .entry(segment.to_string())
                .or_insert_with(|| Node::Dir(BTreeMap::new()));
            dir = match node {
                Node::Dir(children) => children,
                Node::File(_) => panic!("{path} is below a file"),
            };
        }
        dir.insert(name.to_string(), Node::File(content.as_bytes().to_vec()));
    }
    store_dir(store, root)
}

fn store_dir(store: &RevStore, dir: BTreeMap<String, Node>) -> ObjectId {
    let entries = dir
        .into_iter()
        .map(|(name, node)| {
            let (mode, object_id) = match node {
                Node::File(data) => (
                    FileMode::Regular,
                    store.store_object(&Object::Blob(Blob::new(data))).unwrap(),
                ),
                Node::Dir(children) => (FileMode::Directory, store_dir(store, children)),
            };
            TreeEntry {
                name,
                mode,
                object_id,
            }
        })
        .collect();
    store.store_object(&Object::Tree(Tree::new(entries))).unwrap()
}

fn commit(store: &RevStore, parents: Vec<ObjectId>, tree: ObjectId, timestamp_ms: u64) -> ObjectId {
    store
        .store_object(&Object::Commit(Commit {
            parents,
            tree,
            author: "tester".to_string(),
            timestamp_ms,
            message: format!("commit at {timestamp_ms}"),
        }))
        .unwrap()
}

const C1: u64 = 1_700_000_000_000;
const C2: u64 = 1_700_000_100_000;
const C3: u64 = 1_700_000_200_000;

/// C1 adds everything, C2 edits `src/a.go`, C3 edits `docs/readme.md`.
fn three_commits(store: &RevStore) -> [ObjectId; 3] {
    let c1 = commit(
        store,
        vec![],
        store_tree(
            store,
            &[("docs/readme.md", "v1\n"), ("src/a.go", "package a\n"), ("src/b.go", "package b\n")],
        ),
        C1,
    );
    let c2 = commit(
        store,
        vec![c1],
        store_tree(
            store,
            &[("docs/readme.md", "v1\n"), ("src/a.go", "package a // v2\n"), ("src/b.go", "package b\n")],
        ),
        C2,
    );
    let c3 = commit(
        store,
        vec![c2],
        store_tree(
            store,
            &[("docs/readme.md", "v3\n"), ("src/a.go", "package a // v2\n"), ("src/b.go", "package b\n")],
        ),
        C3,
    );
    store.set_ref("heads/main", &c3).unwrap();
    [c1, c2, c3]
}

#[test]
fn mod_times_follow_the_newest_touching_commit() {
    let (_tmp, store) = make_test_store();
    let [c1, c2, c3] = three_commits(&store);
    let snap = Snapshot::resolve(&store, "main").unwrap();

    assert_eq!(snap.stat("docs/readme.md").unwrap().mod_time(), at(C3));
    assert_eq!(snap.stat("docs").unwrap().mod_time(), at(C3));
    assert_eq!(snap.stat(".").unwrap().mod_time(), at(C3));
    assert_eq!(snap.stat("src").unwrap().mod_time(), at(C2));
    assert_eq!(snap.stat("src/a.go").unwrap().last_commit(), &c2);
    assert_eq!(snap.stat("src/b.go").unwrap().last_commit(), &c1);

    let older = Snapshot::resolve(&store, "main~1").unwrap();
    assert_eq!(older.commit_id(), &c2);
    assert_eq!(older.stat("docs").unwrap().mod_time(), at(C1));
    assert_eq!(older.stat(".").unwrap().last_commit(), &c2);
    assert_ne!(older.stat(".").unwrap().last_commit(), &c3);
}

#[test]
fn single_commit_root_time() {
    let (_tmp, store) = make_test_store();
    let c1 = commit(&store, vec![], store_tree(&store, &[("a.txt", "a")]), C1);
    store.set_ref("tags/only", &c1).unwrap();

    let snap = Snapshot::resolve(&store, "only").unwrap();
    let root = snap.stat("").unwrap();
    assert_eq!(root.mod_time(), at(C1));
    assert_eq!(root.name(), ".");
    assert!(root.is_dir());
}

#[test]
fn resolution_is_deterministic() {
    let (_tmp, store) = make_test_store();
    let [_, _, c3] = three_commits(&store);
    store.set_ref("tags/v3", &c3).unwrap();

    for rev in [
        "main",
        "heads/main",
        "v3",
        "HEAD",
        c3.to_hex().as_str(),
        &c3.to_hex()[..12],
        c3.to_string().as_str(),
    ] {
        for _ in 0..2 {
            let snap = Snapshot::resolve(&store, rev).unwrap();
            assert_eq!(snap.commit_id(), &c3, "{rev}");
        }
    }
    assert!(matches!(
        Snapshot::resolve(&store, "no-such-branch"),
        Err(ViewError::RevisionNotFound(_))
    ));
}

#[test]
fn revisions_naming_trees_or_blobs_are_not_found() {
    let (_tmp, store) = make_test_store();
    let [c1, _, _] = three_commits(&store);
    let tree = store.load_commit(&c1).unwrap().tree;
    let blob = store.store_object(&Object::Blob(Blob::new(b"loose".to_vec()))).unwrap();
    store.set_ref("tags/tree-only", &tree).unwrap();

    for rev in [tree.to_hex(), blob.to_hex(), "tree-only".to_string()] {
        assert!(
            matches!(
                Snapshot::resolve(&store, &rev),
                Err(ViewError::RevisionNotFound(ref r)) if *r == rev
            ),
            "{rev}"
        );
    }
}

#[test]
fn directories_have_zero_size_and_files_read_exactly_size_bytes() {
    let (_tmp, store) = make_test_store();
    let big = "0123456789abcdef".repeat(512);
    let c1 = commit(
        &store,
        vec![],
        store_tree(&store, &[("data/big.txt", big.as_str()), ("data/empty", ""), ("small.txt", "hi")]),
        C1,
    );
    store.set_ref("heads/main", &c1).unwrap();
    let snap = Snapshot::resolve(&store, "main").unwrap();

    for path in [".", "data"] {
        let info = snap.stat(path).unwrap();
        assert!(info.is_dir());
        assert_eq!(info.size(), 0);
        assert!(info.mode().is_dir());
    }

    for (path, expected) in [("data/big.txt", big.as_str()), ("data/empty", ""), ("small.txt", "hi")] {
        let info = snap.stat(path).unwrap();
        assert!(!info.is_dir());
        assert_eq!(info.size(), expected.len() as u64);

        let mut handle = snap.open(path).unwrap();
        let mut content = Vec::new();
        handle.read_to_end(&mut content).unwrap();
        assert_eq!(content.len() as u64, info.size());
        assert_eq!(content, expected.as_bytes());
        handle.close();
    }
}

#[test]
fn paginated_listing_in_stored_order() {
    let (_tmp, store) = make_test_store();
    three_commits(&store);
    let snap = Snapshot::resolve(&store, "main").unwrap();

    let mut dir = snap.open("src").unwrap();
    let first = dir.read_entries(1).unwrap().unwrap();
    let rest = dir.read_entries(-1).unwrap().unwrap();
    let names: Vec<_> = first.iter().chain(&rest).map(|i| i.name().to_string()).collect();
    assert_eq!(names, ["a.go", "b.go"]);
    assert!(dir.read_entries(1).unwrap().is_none());
    assert!(dir.read_entries(-1).unwrap().is_none());
    dir.close();

    let listed: Vec<_> = snap.read_dir(".").unwrap().into_iter().map(|i| i.name().to_string()).collect();
    assert_eq!(listed, ["docs", "src"]);
}

#[test]
fn listing_and_stat_agree() {
    let (_tmp, store) = make_test_store();
    three_commits(&store);
    let snap = Snapshot::resolve(&store, "main").unwrap();

    for listed in snap.read_dir("src").unwrap() {
        let stat = snap.stat(listed.path()).unwrap();
        assert_eq!(listed, stat);

        let Ok(entry) = snap.open_with(listed.path(), Intent::ForRead) else {
            panic!("{} should open", listed.path());
        };
        assert_eq!(entry.stat(), &stat);
    }
}

#[test]
fn missing_paths_are_not_exist() {
    let (_tmp, store) = make_test_store();
    three_commits(&store);
    let snap = Snapshot::resolve(&store, "main").unwrap();

    let err = snap.open("missing/path").unwrap_err();
    assert!(err.is_not_exist());
    assert_eq!(std::io::Error::from(err).kind(), std::io::ErrorKind::NotFound);
    assert!(snap.stat("docs/readme.md/deeper").unwrap_err().is_not_exist());

    for root in [".", "", "/"] {
        assert!(snap.open(root).is_ok());
    }
}

#[test]
fn merge_uses_first_touching_commit_in_walk_order() {
    let (_tmp, store) = make_test_store();
    let base = commit(&store, vec![], store_tree(&store, &[("docs/a.md", "a0"), ("src/x.go", "x0")]), C1);
    let docs_side = commit(&store, vec![base], store_tree(&store, &[("docs/a.md", "a1"), ("src/x.go", "x0")]), C2);
    let src_side = commit(&store, vec![base], store_tree(&store, &[("docs/a.md", "a0"), ("src/x.go", "x1")]), C3);
    let merge = commit(
        &store,
        vec![src_side, docs_side],
        store_tree(&store, &[("docs/a.md", "a1"), ("src/x.go", "x1")]),
        C3 + 1_000,
    );
    store.set_ref("heads/main", &merge).unwrap();
    let snap = Snapshot::resolve(&store, "main").unwrap();

    assert_eq!(snap.stat("docs/a.md").unwrap().last_commit(), &docs_side);
    assert_eq!(snap.stat("src").unwrap().last_commit(), &src_side);
    assert_eq!(snap.stat(".").unwrap().last_commit(), &merge);
}

#[test]
fn unrepresentable_entries_fail_alone() {
    let (_tmp, store) = make_test_store();
    let blob = store.store_object(&Object::Blob(Blob::new(b"ok".to_vec()))).unwrap();
    let root = store
        .store_object(&Object::Tree(Tree::new(vec![
            TreeEntry {
                name: "vendor".to_string(),
                mode: FileMode::Submodule,
                object_id: blob,
            },
            TreeEntry {
                name: "ok.txt".to_string(),
                mode: FileMode::Regular,
                object_id: blob,
            },
        ])))
        .unwrap();
    let c1 = commit(&store, vec![], root, C1);
    store.set_ref("heads/main", &c1).unwrap();
    let snap = Snapshot::resolve(&store, "main").unwrap();

    assert!(matches!(
        snap.stat("vendor"),
        Err(ViewError::UnsupportedModeTranslation { .. })
    ));
    assert_eq!(snap.read_file("ok.txt").unwrap(), b"ok");
    assert!(snap.read_dir(".").is_err());
}

#[test]
fn snapshots_are_shareable_across_threads() {
    let (_tmp, store) = make_test_store();
    three_commits(&store);
    let snap = Arc::new(Snapshot::resolve(Arc::new(store), "main").unwrap());

    let handles: Vec<_> = ["docs/readme.md", "src/a.go", "src/b.go", "docs"]
        .into_iter()
        .map(|path| {
            let snap = Arc::clone(&snap);
            std::thread::spawn(move || snap.stat(path).unwrap().mod_time())
        })
        .collect();
    let times: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(times, [at(C3), at(C2), at(C1), at(C3)]);
}
