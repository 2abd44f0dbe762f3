//! Revision expressions.
//!
//! A base (`HEAD`, a ref name, a branch or tag short name, a full or
//! abbreviated hex id, or an `rfs_` display id) optionally followed by any
//! chain of `~N` (N-th first-parent ancestor) and `^N` (N-th parent)
//! suffixes. A bare `~` or `^` means 1.

use revfs_core::id::ObjectId;
use revfs_core::object::TypeTag;

use crate::{RevStore, StoreError};

/// Shortest accepted abbreviated hex id.
pub const MIN_PREFIX_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Ancestor(usize),
    Parent(usize),
}

pub fn resolve_revision(store: &RevStore, rev: &str) -> Result<ObjectId, StoreError> {
    let not_found = || StoreError::RevisionNotFound(rev.to_string());

    let split = rev.find(['~', '^']).unwrap_or(rev.len());
    let (base, suffix) = rev.split_at(split);
    if base.is_empty() {
        return Err(not_found());
    }
    let steps = parse_steps(suffix).ok_or_else(not_found)?;

    let mut id = resolve_base(store, base)?.ok_or_else(not_found)?;
    tracing::debug!(rev, base, commit = %id.short_hex(), "resolved revision base");

    let stat = store.stat_object(&id)?;
    if stat.type_tag != TypeTag::Commit {
        return Err(StoreError::UnexpectedObject {
            id,
            expected: TypeTag::Commit.name(),
            actual: stat.type_tag.name(),
        });
    }

    for step in steps {
        id = match step {
            Step::Ancestor(n) => {
                let mut current = id;
                for _ in 0..n {
                    let commit = store.load_commit(&current)?;
                    current = *commit.first_parent().ok_or_else(not_found)?;
                }
                current
            }
            Step::Parent(0) => id,
            Step::Parent(n) => {
                let commit = store.load_commit(&id)?;
                *commit.parents.get(n - 1).ok_or_else(not_found)?
            }
        };
    }

    Ok(id)
}

fn parse_steps(mut suffix: &str) -> Option<Vec<Step>> {
    let mut steps = Vec::new();
    while let Some(op) = suffix.chars().next() {
        suffix = &suffix[op.len_utf8()..];
        let digits = suffix
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(suffix.len());
        let n = if digits == 0 {
            1
        } else {
            suffix[..digits].parse().ok()?
        };
        suffix = &suffix[digits..];
        steps.push(match op {
            '~' => Step::Ancestor(n),
            '^' => Step::Parent(n),
            _ => return None,
        });
    }
    Some(steps)
}

fn resolve_base(store: &RevStore, base: &str) -> Result<Option<ObjectId>, StoreError> {
    if base == "HEAD" || base == "@" {
        return store.resolve_head();
    }

    if base.contains('/') {
        if let Some(id) = store.get_ref(base)? {
            return Ok(Some(id));
        }
    }
    for namespace in ["heads", "tags"] {
        if let Some(id) = store.get_ref(&format!("{namespace}/{base}"))? {
            return Ok(Some(id));
        }
    }

    if let Ok(id) = ObjectId::from_hex(base) {
        return Ok(store.has_object(&id).then_some(id));
    }
    if let Ok(id) = ObjectId::from_display(base) {
        return Ok(store.has_object(&id).then_some(id));
    }

    if base.len() >= MIN_PREFIX_LEN && base.chars().all(|c| c.is_ascii_hexdigit()) {
        return resolve_prefix(store, &base.to_ascii_lowercase());
    }

    Ok(None)
}

/// Abbreviated ids only ever name commits.
fn resolve_prefix(store: &RevStore, prefix: &str) -> Result<Option<ObjectId>, StoreError> {
    let mut matches = Vec::new();
    for id in crate::loose::list_loose_object_ids(store.layout())? {
        if id.to_hex().starts_with(prefix)
            && store.stat_object(&id)?.type_tag == TypeTag::Commit
        {
            matches.push(id);
        }
    }
    match matches.len() {
        0 => Ok(None),
        1 => Ok(Some(matches[0])),
        count => Err(StoreError::AmbiguousRevision {
            prefix: prefix.to_string(),
            count,
        }),
    }
}
