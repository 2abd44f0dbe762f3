use std::path::{Path, PathBuf};

use revfs_core::id::ObjectId;

use crate::layout::RepoLayout;
use crate::StoreError;

fn ref_path(layout: &RepoLayout, name: &str) -> Result<PathBuf, StoreError> {
    let bad = name.is_empty()
        || name.starts_with('/')
        || name.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad {
        return Err(StoreError::RefNotFound(name.to_string()));
    }
    Ok(layout.refs_dir().join(name))
}

pub fn write_ref(layout: &RepoLayout, name: &str, target: &ObjectId) -> Result<(), StoreError> {
    let path = ref_path(layout, name)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, format!("{}\n", target.to_hex()))?;
    Ok(())
}

pub fn read_ref(layout: &RepoLayout, name: &str) -> Result<Option<ObjectId>, StoreError> {
    let path = match ref_path(layout, name) {
        Ok(path) => path,
        Err(_) => return Ok(None),
    };
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)?;
    let id = ObjectId::from_hex(content.trim())?;
    Ok(Some(id))
}

pub fn delete_ref(layout: &RepoLayout, name: &str) -> Result<(), StoreError> {
    let path = ref_path(layout, name)?;
    if path.exists() {
        std::fs::remove_file(&path)?;
    }
    Ok(())
}

pub fn list_refs(layout: &RepoLayout, prefix: &str) -> Result<Vec<(String, ObjectId)>, StoreError> {
    let base = layout.refs_dir().join(prefix);
    if !base.exists() {
        return Ok(Vec::new());
    }

    let mut results = Vec::new();
    collect_refs(&base, &layout.refs_dir(), &mut results)?;
    results.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(results)
}

fn collect_refs(
    dir: &Path,
    refs_root: &Path,
    results: &mut Vec<(String, ObjectId)>,
) -> Result<(), StoreError> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_refs(&path, refs_root, results)?;
        } else if path.is_file() {
            let content = std::fs::read_to_string(&path)?;
            let Ok(id) = ObjectId::from_hex(content.trim()) else {
                continue;
            };
            if let Ok(rel) = path.strip_prefix(refs_root) {
                let name = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                results.push((name, id));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use revfs_core::hash::content_hash;
    use revfs_core::object::TypeTag;

    fn layout() -> (tempfile::TempDir, RepoLayout) {
        let tmp = tempfile::tempdir().unwrap();
        let layout = RepoLayout::new(tmp.path());
        layout.create_dirs().unwrap();
        (tmp, layout)
    }

    #[test]
    fn ref_roundtrip() {
        let (_tmp, layout) = layout();
        let id = content_hash(TypeTag::Commit, b"test");
        write_ref(&layout, "heads/main", &id).unwrap();

        let read_back = read_ref(&layout, "heads/main").unwrap();
        assert_eq!(read_back, Some(id));
    }

    #[test]
    fn list_refs_finds_all_sorted() {
        let (_tmp, layout) = layout();
        let id1 = content_hash(TypeTag::Commit, b"a");
        let id2 = content_hash(TypeTag::Commit, b"b");
        write_ref(&layout, "heads/main", &id1).unwrap();
        write_ref(&layout, "heads/dev", &id2).unwrap();
        write_ref(&layout, "tags/v1", &id2).unwrap();

        let refs = list_refs(&layout, "heads").unwrap();
        let names: Vec<_> = refs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["heads/dev", "heads/main"]);
    }

    #[test]
    fn escaping_names_are_not_refs() {
        let (_tmp, layout) = layout();
        let id = content_hash(TypeTag::Commit, b"x");
        assert!(write_ref(&layout, "../HEAD", &id).is_err());
        assert_eq!(read_ref(&layout, "heads/../../HEAD").unwrap(), None);
        assert_eq!(read_ref(&layout, "heads").unwrap(), None);
    }

    #[test]
    fn delete_removes_ref() {
        let (_tmp, layout) = layout();
        let id = content_hash(TypeTag::Commit, b"gone");
        write_ref(&layout, "tags/old", &id).unwrap();
        delete_ref(&layout, "tags/old").unwrap();
        assert_eq!(read_ref(&layout, "tags/old").unwrap(), None);
    }
}
