//! Cross-file resolution: symbol table, import-resolution maps, the
//! symbol resolver and the domain analyzer (spec §4.4-§4.8), wired into
//! one per-project pass.

pub mod domain_analyzer;
pub mod import_map;
pub mod resolver;
pub mod symbol_table;

use symgraph_core::domain::{Domain, DomainDependency, DomainsConfig};
use symgraph_core::model::ParsedFile;
use symgraph_core::resolved::{ResolvedCall, ResolvedFile};
use symgraph_core::symbol::SymbolTable;
use symgraph_parsers::module_path::ModulePathOptions;
use symgraph_parsers::stdlib::CompositeProvider;

/// Everything produced by a full resolution pass over one project: the
/// global table, each file's resolved calls, and (when a domains config
/// was supplied) the domain/dependency records.
pub struct ProjectResolution {
    pub table: SymbolTable,
    pub resolved_files: Vec<ResolvedFile>,
    pub domains: Vec<Domain>,
    pub dependencies: Vec<DomainDependency>,
}

/// Run symbol-table construction, per-file import resolution and call
/// resolution, and (optionally) domain analysis over every parsed file in
/// a project (spec §4: the pipeline's stages 3 through 7).
///
/// The resolver stage is pure per file once the table is frozen, so it
/// runs on the same rayon worker pool the frontends parse on (spec §5).
pub fn resolve_project(
    files: Vec<ParsedFile>,
    module_path_options: &ModulePathOptions,
    domains_config: Option<&DomainsConfig>,
) -> ProjectResolution {
    use rayon::prelude::*;

    let table = symbol_table::build(&files);
    let index = resolver::ResolverIndex::build(&files);

    let resolved_files: Vec<ResolvedFile> = files
        .into_par_iter()
        .map(|file| {
            let stdlib = CompositeProvider::for_language(file.language);
            let import_map = import_map::build(&file, module_path_options);
            let resolved_calls = resolver::resolve_file(&file, &table, &stdlib, &index, &import_map);
            ResolvedFile { parsed: file, resolved_calls }
        })
        .collect();

    let all_calls: Vec<ResolvedCall> = resolved_files
        .iter()
        .flat_map(|rf| rf.resolved_calls.iter().cloned())
        .collect();

    let (domains, dependencies) = match domains_config {
        Some(config) => domain_analyzer::analyze(config, &table, &all_calls),
        None => (Vec::new(), Vec::new()),
    };

    ProjectResolution { table, resolved_files, domains, dependencies }
}
