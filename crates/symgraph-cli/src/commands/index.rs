//! `symgraph index` — the one command this binary offers, wiring
//! `parse_project` -> `resolve_project` -> the graph writer into a single
//! pass (SPEC_FULL.md §2/§9). Modeled on the teacher's per-command `run`
//! functions (`keel-cli/src/commands/*.rs`): a free function taking already
//!-parsed CLI arguments, returning a process exit code.

use std::path::{Path, PathBuf};

use symgraph_core::config::IndexerConfig;
use symgraph_core::domain::DomainsConfig;
use symgraph_core::stats::resolution_stats;
use symgraph_graph::store::GraphStore;
use symgraph_parsers::module_path::ModulePathOptions;

#[allow(clippy::too_many_arguments)]
pub fn run(
    path: PathBuf,
    name: Option<String>,
    database: Option<String>,
    clear: bool,
    no_domains: bool,
    domains_config_path: Option<PathBuf>,
    batch_size: Option<usize>,
    json: bool,
) -> i32 {
    let project_root = match path.canonicalize() {
        Ok(root) => root,
        Err(e) => {
            eprintln!("symgraph: error: cannot read project path {}: {e}", path.display());
            return 1;
        }
    };

    let mut config = IndexerConfig::load(&project_root);
    config.project_path = project_root.to_string_lossy().to_string();
    if let Some(database) = database {
        config.database_path = database;
    }
    if clear {
        config.clear_before = true;
    }
    if no_domains {
        config.analyze_domains = false;
    }
    if let Some(domains_config_path) = &domains_config_path {
        config.domains_config_path = Some(domains_config_path.to_string_lossy().to_string());
    }
    if let Some(batch_size) = batch_size {
        config.batch_size = batch_size;
    }

    let project_name = name.or_else(|| config.project_name.clone()).unwrap_or_else(|| {
        project_root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| config.project_path.clone())
    });

    let domains_config = if config.analyze_domains {
        match load_domains_config(&project_root, config.domains_config_path.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("symgraph: error: {e}");
                return 1;
            }
        }
    } else {
        None
    };

    let parse_results = symgraph_parsers::parse_project(&project_root);
    let mut files = Vec::with_capacity(parse_results.len());
    let mut parse_errors = Vec::new();
    for (file_path, result) in parse_results {
        match result {
            Ok(parsed) => files.push(parsed),
            Err(e) => parse_errors.push(symgraph_core::error::IndexError::new(file_path, e.to_string())),
        }
    }
    let files_seen = files.len() as u64;

    let module_options = ModulePathOptions {
        project_root: project_root.clone(),
        source_roots: config.source_roots.clone(),
        ..ModulePathOptions::default()
    };

    let total_calls: u64 = files.iter().map(|f| count_calls(f) as u64).sum();
    let resolution = symgraph_resolve::resolve_project(files, &module_options, domains_config.as_ref());
    let stats = resolution_stats(total_calls, &resolution.resolved_files);

    let batch = symgraph_graph::project(&config.project_path, &project_name, &resolution, &module_options);

    let database_path = if Path::new(&config.database_path).is_absolute() {
        config.database_path.clone()
    } else {
        project_root.join(&config.database_path).to_string_lossy().to_string()
    };

    let mut store = match GraphStore::open(&database_path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("symgraph: error: failed to open database {database_path}: {e}");
            return 1;
        }
    };

    if config.clear_before {
        if let Err(e) = store.clear_all() {
            eprintln!("symgraph: error: failed to clear database: {e}");
            return 1;
        }
    } else if let Err(e) = store.clear_scoped(&config.project_path) {
        eprintln!("symgraph: error: failed to clear existing project scope: {e}");
        return 1;
    }

    let mut write_result = match store.write_batch(batch, config.batch_size) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("symgraph: error: write pass failed: {e}");
            return 1;
        }
    };
    write_result.files_processed = files_seen;
    write_result.errors.splice(0..0, parse_errors);

    if json {
        let summary = serde_json::json!({
            "filesProcessed": write_result.files_processed,
            "nodesWritten": write_result.nodes_written,
            "edgesWritten": write_result.edges_written,
            "errors": write_result.errors,
            "resolution": {
                "totalCalls": stats.total_calls,
                "resolvedCalls": stats.resolved_calls,
                "unresolvedCalls": stats.unresolved_calls,
                "resolutionRate": stats.resolution_rate,
            },
            "domains": resolution.domains.len(),
        });
        println!("{}", serde_json::to_string_pretty(&summary).unwrap_or_default());
    } else {
        println!(
            "symgraph: indexed {} files, {} nodes, {} edges ({} domains)",
            write_result.files_processed,
            write_result.nodes_written,
            write_result.edges_written,
            resolution.domains.len(),
        );
        println!(
            "symgraph: resolved {}/{} calls ({:.1}%)",
            stats.resolved_calls,
            stats.total_calls,
            stats.resolution_rate * 100.0,
        );
        for error in &write_result.errors {
            eprintln!("symgraph: warning: {}: {}", error.file_path, error.message);
        }
    }

    if write_result.errors.is_empty() {
        0
    } else {
        1
    }
}

fn count_calls(file: &symgraph_core::model::ParsedFile) -> usize {
    fn in_class(class: &symgraph_core::model::ParsedClass) -> usize {
        let mut count: usize = class.functions.iter().map(|f| f.calls.len()).sum();
        count += class.nested_classes.iter().map(in_class).sum::<usize>();
        if let Some(companion) = &class.companion {
            count += companion.functions.iter().map(|f| f.calls.len()).sum::<usize>();
        }
        count
    }
    let mut count: usize = file.functions.iter().map(|f| f.calls.len()).sum();
    count += file.classes.iter().map(in_class).sum::<usize>();
    count += file.object_expressions.iter().map(|o| o.functions.iter().map(|f| f.calls.len()).sum::<usize>()).sum::<usize>();
    count
}

/// Reads a standalone domains config file from `--domains-config` or the
/// config file's `domainsConfigPath`, falling back to
/// `<project>/.symgraph/domains.json` when neither names one.
///
/// An explicitly-requested config path that is missing or malformed is a
/// fatal configuration error raised before the pass begins (spec §7:
/// "Configuration error (missing project path, unreadable domain config):
/// fatal; raised before any pass begins", reaffirmed in SPEC_FULL.md §6).
/// The auto-discovered default path is best-effort: a project with no
/// `.symgraph/domains.json` simply runs without domain analysis.
fn load_domains_config(project_root: &Path, configured_path: Option<&str>) -> Result<Option<DomainsConfig>, String> {
    match configured_path {
        Some(path) => {
            let path = PathBuf::from(path);
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| format!("cannot read domains config {}: {e}", path.display()))?;
            let config = serde_json::from_str(&contents)
                .map_err(|e| format!("failed to parse domains config {}: {e}", path.display()))?;
            Ok(Some(config))
        }
        None => {
            let path = project_root.join(".symgraph").join("domains.json");
            let Ok(contents) = std::fs::read_to_string(&path) else {
                return Ok(None);
            };
            match serde_json::from_str(&contents) {
                Ok(config) => Ok(Some(config)),
                Err(e) => {
                    eprintln!("symgraph: warning: failed to parse domains config {}: {e}", path.display());
                    Ok(None)
                }
            }
        }
    }
}
