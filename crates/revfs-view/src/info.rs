use std::fmt;
use std::time::SystemTime;

use revfs_core::id::ObjectId;
use revfs_core::types::FileMode;

/// Platform-neutral file mode bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FsMode(u32);

impl FsMode {
    pub const DIR: u32 = 1 << 31;
    pub const SYMLINK: u32 = 1 << 27;
    pub const PERM: u32 = 0o777;

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Filesystem mode for a stored entry mode; `None` when there is no equivalent.
    pub fn translate(mode: FileMode) -> Option<Self> {
        match mode {
            FileMode::Directory => Some(Self(Self::DIR | 0o755)),
            FileMode::Regular => Some(Self(0o644)),
            FileMode::Executable => Some(Self(0o755)),
            FileMode::Symlink => Some(Self(Self::SYMLINK | 0o777)),
            FileMode::Submodule => None,
        }
    }

    pub fn is_dir(self) -> bool {
        self.0 & Self::DIR != 0
    }

    pub fn is_symlink(self) -> bool {
        self.0 & Self::SYMLINK != 0
    }

    pub fn perm(self) -> u32 {
        self.0 & Self::PERM
    }
}

impl fmt::Display for FsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_dir() {
            'd'
        } else if self.is_symlink() {
            'L'
        } else {
            '-'
        };
        let mut out = String::with_capacity(10);
        out.push(kind);
        for shift in [6, 3, 0] {
            let bits = (self.perm() >> shift) & 0o7;
            out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
            out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
            out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
        }
        f.write_str(&out)
    }
}

/// Stat-level description of one entry in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) size: u64,
    pub(crate) mode: FsMode,
    pub(crate) mod_time: SystemTime,
    pub(crate) last_commit: ObjectId,
}

impl FileInfo {
    /// Base name; `"."` for the snapshot root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full logical path inside the snapshot.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Byte length for files, always 0 for directories.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn mode(&self) -> FsMode {
        self.mode
    }

    pub fn mod_time(&self) -> SystemTime {
        self.mod_time
    }

    pub fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }

    /// Newest commit that touched this entry.
    pub fn last_commit(&self) -> &ObjectId {
        &self.last_commit
    }
}

/// Anything that can describe itself like a file.
pub trait Stat {
    fn stat(&self) -> &FileInfo;
}

impl Stat for FileInfo {
    fn stat(&self) -> &FileInfo {
        self
    }
}
