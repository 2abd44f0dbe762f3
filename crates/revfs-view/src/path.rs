use std::fmt;

use crate::ViewError;

/// A normalized slash-separated path inside a snapshot.
///
/// `""`, `"."` and `"/"` all name the root. Empty and `.` segments are
/// dropped; `..` is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SnapPath {
    segments: Vec<String>,
}

impl SnapPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(raw: &str) -> Result<Self, ViewError> {
        let mut segments = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" | "." => {}
                ".." => return Err(ViewError::InvalidPath(raw.to_string())),
                s => segments.push(s.to_string()),
            }
        }
        Ok(Self { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Last segment, or `"."` for the root.
    pub fn name(&self) -> &str {
        self.segments.last().map_or(".", String::as_str)
    }

    pub fn join(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }
}

impl fmt::Display for SnapPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str(".")
        } else {
            f.write_str(&self.segments.join("/"))
        }
    }
}
