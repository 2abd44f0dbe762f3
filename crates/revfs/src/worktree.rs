use std::collections::BTreeMap;
use std::path::Path;

use revfs_core::id::ObjectId;
use revfs_core::object::Object;
use revfs_core::types::{Blob, FileMode, Tree, TreeEntry};
use revfs_store::RevStore;

use crate::ignore::IgnoreRules;

/// Store every non-ignored file under `root` and return the root tree id.
pub fn scan_worktree(store: &RevStore, root: &Path, ignore: &IgnoreRules) -> anyhow::Result<ObjectId> {
    scan_dir(store, root, root, ignore)
}

fn scan_dir(store: &RevStore, dir: &Path, repo_root: &Path, ignore: &IgnoreRules) -> anyhow::Result<ObjectId> {
    let mut entries: BTreeMap<String, TreeEntry> = BTreeMap::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            tracing::warn!(path = %path.display(), "skipping non-UTF-8 file name");
            continue;
        };
        let rel_path = path
            .strip_prefix(repo_root)?
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if ignore.is_ignored(&rel_path) {
            tracing::debug!(path = %rel_path, "ignored");
            continue;
        }

        let ft = entry.file_type()?;
        let (mode, object_id) = if ft.is_symlink() {
            let target = std::fs::read_link(&path)?;
            let blob = Blob::new(target.to_string_lossy().into_owned().into_bytes());
            (FileMode::Symlink, store.store_object(&Object::Blob(blob))?)
        } else if ft.is_dir() {
            (FileMode::Directory, scan_dir(store, &path, repo_root, ignore)?)
        } else if ft.is_file() {
            let blob = Blob::new(std::fs::read(&path)?);
            (detect_file_mode(&path), store.store_object(&Object::Blob(blob))?)
        } else {
            continue;
        };

        entries.insert(
            name.clone(),
            TreeEntry {
                name,
                mode,
                object_id,
            },
        );
    }

    let tree = Tree::new(entries.into_values().collect());
    Ok(store.store_object(&Object::Tree(tree))?)
}

fn detect_file_mode(path: &Path) -> FileMode {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(meta) = std::fs::metadata(path) {
            if meta.permissions().mode() & 0o111 != 0 {
                return FileMode::Executable;
            }
        }
    }
    #[cfg(not(unix))]
    let _ = path;
    FileMode::Regular
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (tempfile::TempDir, RevStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = RevStore::init(tmp.path()).unwrap();
        (tmp, store)
    }

    #[test]
    fn scans_nested_directories_in_name_order() {
        let (tmp, store) = setup();
        std::fs::create_dir_all(tmp.path().join("src")).unwrap();
        std::fs::write(tmp.path().join("src/b.go"), "package b\n").unwrap();
        std::fs::write(tmp.path().join("src/a.go"), "package a\n").unwrap();
        std::fs::write(tmp.path().join("README.md"), "hi\n").unwrap();

        let ignore = IgnoreRules::parse("").unwrap();
        let root = scan_worktree(&store, tmp.path(), &ignore).unwrap();
        let tree = store.load_tree(&root).unwrap();
        let names: Vec<_> = tree.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["README.md", "src"]);

        let src = store.load_tree(&tree.entry("src").unwrap().object_id).unwrap();
        let names: Vec<_> = src.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.go", "b.go"]);
    }

    #[test]
    fn respects_ignore_rules() {
        let (tmp, store) = setup();
        std::fs::create_dir_all(tmp.path().join("target/debug")).unwrap();
        std::fs::write(tmp.path().join("target/debug/out"), "bin").unwrap();
        std::fs::write(tmp.path().join("keep.txt"), "keep").unwrap();

        let ignore = IgnoreRules::parse("target/\n").unwrap();
        let root = scan_worktree(&store, tmp.path(), &ignore).unwrap();
        let tree = store.load_tree(&root).unwrap();
        let names: Vec<_> = tree.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["keep.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn records_executable_and_symlink_modes() {
        use std::os::unix::fs::PermissionsExt;

        let (tmp, store) = setup();
        let script = tmp.path().join("run.sh");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        std::os::unix::fs::symlink("run.sh", tmp.path().join("link")).unwrap();

        let ignore = IgnoreRules::parse("").unwrap();
        let root = scan_worktree(&store, tmp.path(), &ignore).unwrap();
        let tree = store.load_tree(&root).unwrap();
        assert_eq!(tree.entry("run.sh").unwrap().mode, FileMode::Executable);
        let link = tree.entry("link").unwrap();
        assert_eq!(link.mode, FileMode::Symlink);
        let mut target = Vec::new();
        std::io::Read::read_to_end(&mut store.open_blob(&link.object_id).unwrap(), &mut target).unwrap();
        assert_eq!(target, b"run.sh");
    }
}
