use std::io::Read;
use std::path::PathBuf;

use revfs_core::cof::MAX_HEADER_LEN;
use revfs_core::id::ObjectId;

use crate::layout::RepoLayout;
use crate::StoreError;

pub fn loose_object_path(layout: &RepoLayout, id: &ObjectId) -> PathBuf {
    let dir = layout.objects_dir().join(id.shard_prefix());
    dir.join(id.shard_suffix())
}

pub fn write_loose_object(
    layout: &RepoLayout,
    id: &ObjectId,
    data: &[u8],
) -> Result<(), StoreError> {
    let path = loose_object_path(layout, id);

    if path.exists() {
        return Ok(());
    }

    let dir = layout.objects_dir().join(id.shard_prefix());
    std::fs::create_dir_all(&dir)?;

    // Atomic write: temp file + rename
    let temp = tempfile::NamedTempFile::new_in(&dir)?;
    std::fs::write(temp.path(), data)?;
    temp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

    Ok(())
}

pub fn read_loose_object(layout: &RepoLayout, id: &ObjectId) -> Result<Vec<u8>, StoreError> {
    let path = loose_object_path(layout, id);
    if !path.exists() {
        return Err(StoreError::ObjectNotFound(*id));
    }
    let data = std::fs::read(&path)?;
    Ok(data)
}

/// Read at most the container header of a loose object.
pub fn read_loose_header(layout: &RepoLayout, id: &ObjectId) -> Result<Vec<u8>, StoreError> {
    let path = loose_object_path(layout, id);
    if !path.exists() {
        return Err(StoreError::ObjectNotFound(*id));
    }
    let file = std::fs::File::open(&path)?;
    let mut buf = Vec::with_capacity(MAX_HEADER_LEN);
    file.take(MAX_HEADER_LEN as u64).read_to_end(&mut buf)?;
    Ok(buf)
}

pub fn list_loose_object_ids(layout: &RepoLayout) -> Result<Vec<ObjectId>, StoreError> {
    let objects_dir = layout.objects_dir();
    if !objects_dir.exists() {
        return Ok(Vec::new());
    }
    let mut ids = Vec::new();
    for shard_entry in std::fs::read_dir(&objects_dir)? {
        let shard_entry = shard_entry?;
        let shard_path = shard_entry.path();
        if !shard_path.is_dir() {
            continue;
        }
        let shard_name = shard_entry.file_name();
        let shard_str = shard_name.to_string_lossy();
        for obj_entry in std::fs::read_dir(&shard_path)? {
            let obj_entry = obj_entry?;
            let obj_name = obj_entry.file_name();
            let obj_str = obj_name.to_string_lossy();
            let hex = format!("{}{}", shard_str, obj_str);
            // temp files from interrupted writes do not parse
            if let Ok(id) = ObjectId::from_hex(&hex) {
                ids.push(id);
            }
        }
    }
    Ok(ids)
}
