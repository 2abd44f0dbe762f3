use revfs_core::id::ObjectId;

use crate::layout::RepoLayout;
use crate::refs;
use crate::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    Symbolic { ref_name: String },
    Detached { target: ObjectId },
}

/// Read HEAD. A repository without a HEAD file points at
/// `heads/<default_branch>`.
pub fn read_head(layout: &RepoLayout, default_branch: &str) -> Result<HeadState, StoreError> {
    let path = layout.head_file();
    if !path.exists() {
        return Ok(HeadState::Symbolic {
            ref_name: format!("heads/{default_branch}"),
        });
    }
    let content = std::fs::read_to_string(&path)?;
    let trimmed = content.trim();
    if let Some(ref_name) = trimmed.strip_prefix("ref: ") {
        Ok(HeadState::Symbolic {
            ref_name: ref_name.to_string(),
        })
    } else {
        let id = ObjectId::from_hex(trimmed)?;
        Ok(HeadState::Detached { target: id })
    }
}

pub fn write_head(layout: &RepoLayout, state: &HeadState) -> Result<(), StoreError> {
    let content = match state {
        HeadState::Symbolic { ref_name } => format!("ref: {}\n", ref_name),
        HeadState::Detached { target } => format!("{}\n", target.to_hex()),
    };
    std::fs::write(layout.head_file(), content)?;
    Ok(())
}

pub fn resolve_head(
    layout: &RepoLayout,
    default_branch: &str,
) -> Result<Option<ObjectId>, StoreError> {
    match read_head(layout, default_branch)? {
        HeadState::Symbolic { ref_name } => refs::read_ref(layout, &ref_name),
        HeadState::Detached { target } => Ok(Some(target)),
    }
}
