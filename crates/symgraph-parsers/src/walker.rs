//! File discovery. Grounded on the teacher's `keel-parsers/src/walker.rs`:
//! a gitignore-aware `ignore::WalkBuilder` with a project-local ignore
//! filename. The teacher's monorepo package-layout matching has no
//! counterpart in this system and is not reproduced.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use symgraph_core::model::Language;

use crate::treesitter::detect_language;

#[derive(Debug, Clone)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub language: Language,
}

pub struct FileWalker {
    root: PathBuf,
}

impl FileWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn walk(&self) -> Vec<WalkEntry> {
        let mut entries = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(true)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .add_custom_ignore_filename(".symgraphignore")
            .build();

        for result in walker {
            let Ok(entry) = result else { continue };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.path();
            if let Some(language) = detect_language(path) {
                entries.push(WalkEntry {
                    path: path.to_path_buf(),
                    language,
                });
            }
        }
        entries
    }
}

pub fn is_within(root: &Path, path: &Path) -> bool {
    path.starts_with(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn walks_supported_files_and_skips_others() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.kt"), "class A").unwrap();
        fs::write(dir.path().join("b.txt"), "not code").unwrap();
        let entries = FileWalker::new(dir.path()).walk();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].language, Language::Kotlin);
    }
}
