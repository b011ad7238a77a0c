//! Indexer configuration, loaded the way the teacher's `KeelConfig` loads
//! `.keel/keel.json`: a missing file falls back to documented defaults, a
//! malformed one warns on stderr and falls back too (spec §6's config
//! surface, plus the `databasePath` field spec §9 of SPEC_FULL.md adds).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_batch_size() -> usize {
    100
}

fn default_true() -> bool {
    true
}

fn default_source_roots() -> Vec<String> {
    vec!["src".to_string(), "lib".to_string(), "app".to_string()]
}

fn default_database_path() -> String {
    "symgraph.sqlite".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndexerConfig {
    pub project_path: String,
    pub project_name: Option<String>,
    pub clear_before: bool,
    pub ensure_schema: bool,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_true")]
    pub analyze_domains: bool,
    pub domains_config_path: Option<String>,
    #[serde(default = "default_source_roots")]
    pub source_roots: Vec<String>,
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            project_path: ".".to_string(),
            project_name: None,
            clear_before: false,
            ensure_schema: true,
            batch_size: default_batch_size(),
            analyze_domains: true,
            domains_config_path: None,
            source_roots: default_source_roots(),
            database_path: default_database_path(),
        }
    }
}

impl IndexerConfig {
    /// Read `<project_dir>/.symgraph/symgraph.json`. Missing file or a
    /// parse failure both fall back to [`IndexerConfig::default`]; only the
    /// parse-failure case warns, matching `KeelConfig::load`.
    pub fn load(project_dir: &Path) -> Self {
        let path = project_dir.join(".symgraph").join("symgraph.json");
        let Ok(contents) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "symgraph: warning: failed to parse {}: {e}, using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    pub fn project_root(&self) -> PathBuf {
        PathBuf::from(&self.project_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = IndexerConfig::load(dir.path());
        assert_eq!(config.batch_size, 100);
        assert!(config.analyze_domains);
    }

    #[test]
    fn malformed_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".symgraph")).unwrap();
        let mut f = std::fs::File::create(dir.path().join(".symgraph/symgraph.json")).unwrap();
        write!(f, "{{ not json").unwrap();
        let config = IndexerConfig::load(dir.path());
        assert_eq!(config.batch_size, 100);
    }

    #[test]
    fn well_formed_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".symgraph")).unwrap();
        std::fs::write(
            dir.path().join(".symgraph/symgraph.json"),
            r#"{"projectPath": "/repo", "batchSize": 250}"#,
        )
        .unwrap();
        let config = IndexerConfig::load(dir.path());
        assert_eq!(config.project_path, "/repo");
        assert_eq!(config.batch_size, 250);
        assert!(config.analyze_domains);
    }
}
