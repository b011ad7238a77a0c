//! Module-Path Inferrer (spec §4.2): derives a hierarchical module path
//! from a file path for languages without explicit package declarations,
//! by stripping configured source-root prefixes.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ModulePathOptions {
    pub project_root: PathBuf,
    pub source_roots: Vec<String>,
    pub separator: char,
    pub include_file_name: bool,
}

impl Default for ModulePathOptions {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            source_roots: vec!["src".into(), "lib".into(), "app".into()],
            separator: '/',
            include_file_name: false,
        }
    }
}

fn normalized_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| c.as_os_str().to_str().map(|s| s.to_string()))
        .collect()
}

/// `inferModulePath`. Returns `None` when the file lies outside
/// `project_root`, or sits directly at a source root with
/// `include_file_name` off.
pub fn infer_module_path(file_path: &Path, options: &ModulePathOptions) -> Option<String> {
    let relative = file_path.strip_prefix(&options.project_root).ok()?;
    let mut components = normalized_components(relative);
    if components.is_empty() {
        return None;
    }

    // Strip one leading source-root segment, if present — platform-neutral
    // since components are already split on any separator.
    if let Some(first) = components.first() {
        if options.source_roots.iter().any(|root| root == first) {
            components.remove(0);
        }
    }

    if components.is_empty() {
        return None;
    }

    let file_name = components.pop().unwrap();
    let stem = if options.include_file_name {
        // Multi-dot extensions are retained as part of the stem.
        Some(file_name)
    } else {
        None
    };

    if components.is_empty() && stem.is_none() {
        return None;
    }

    let mut segments = components;
    if let Some(stem) = stem {
        segments.push(stem);
    }
    if segments.is_empty() {
        return None;
    }

    Some(segments.join(&options.separator.to_string()))
}

/// `collectModulePaths`: materializes every module path plus all of its
/// ancestor prefixes, so the writer can build the `Module→Module` tree.
pub fn collect_module_paths(
    files: &[PathBuf],
    options: &ModulePathOptions,
) -> BTreeSet<String> {
    let mut paths = BTreeSet::new();
    for file in files {
        if let Some(path) = infer_module_path(file, options) {
            let segments: Vec<&str> = path.split(options.separator).collect();
            for end in 1..=segments.len() {
                paths.insert(segments[..end].join(&options.separator.to_string()));
            }
        }
    }
    paths
}

/// `buildModuleHierarchy`: parent (`None` for top-level) -> children.
pub fn build_module_hierarchy(paths: &BTreeSet<String>) -> BTreeMap<Option<String>, Vec<String>> {
    let mut tree: BTreeMap<Option<String>, Vec<String>> = BTreeMap::new();
    for path in paths {
        let parent = path.rsplit_once('/').map(|(parent, _)| parent.to_string());
        tree.entry(parent).or_default().push(path.clone());
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(root: &str) -> ModulePathOptions {
        ModulePathOptions {
            project_root: PathBuf::from(root),
            ..Default::default()
        }
    }

    #[test]
    fn strips_source_root_prefix() {
        let options = opts("/repo");
        let path = infer_module_path(Path::new("/repo/src/auth/login.ts"), &options);
        assert_eq!(path, Some("auth".to_string()));
    }

    #[test]
    fn file_directly_at_source_root_has_no_module_path() {
        let options = opts("/repo");
        let path = infer_module_path(Path::new("/repo/src/login.ts"), &options);
        assert_eq!(path, None);
    }

    #[test]
    fn outside_project_root_is_none() {
        let options = opts("/repo");
        let path = infer_module_path(Path::new("/other/src/auth/login.ts"), &options);
        assert_eq!(path, None);
    }

    #[test]
    fn collects_all_ancestor_prefixes() {
        let options = opts("/repo");
        let files = vec![PathBuf::from("/repo/src/auth/session/token.ts")];
        let paths = collect_module_paths(&files, &options);
        assert!(paths.contains("auth"));
        assert!(paths.contains("auth/session"));
    }
}
