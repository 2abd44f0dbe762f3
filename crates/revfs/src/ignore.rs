use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

pub const IGNORE_FILE: &str = ".revfsignore";

const ALWAYS_IGNORED: &[&str] = &[".revfs", ".revfs/**", ".git", ".git/**"];

pub struct IgnoreRules {
    globs: GlobSet,
}

impl IgnoreRules {
    /// Built-in rules plus the patterns in `<root>/.revfsignore`, if present.
    pub fn load(repo_root: &Path) -> anyhow::Result<Self> {
        let ignore_path = repo_root.join(IGNORE_FILE);
        let content = if ignore_path.exists() {
            std::fs::read_to_string(&ignore_path)?
        } else {
            String::new()
        };
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in ALWAYS_IGNORED {
            builder.add(Glob::new(pattern)?);
        }

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            // "target/" covers the directory and everything below it.
            if let Some(dir) = line.strip_suffix('/') {
                builder.add(Glob::new(dir)?);
                builder.add(Glob::new(&format!("{dir}/**"))?);
            } else {
                builder.add(Glob::new(line)?);
            }
        }

        Ok(Self {
            globs: builder.build()?,
        })
    }

    pub fn is_ignored(&self, rel_path: &str) -> bool {
        self.globs.is_match(rel_path)
    }
}
