//! Language frontends, module-path inference, stdlib providers and file
//! discovery for the symgraph indexing pipeline (spec §4.1-§4.3).

pub mod ecmascript;
pub mod java;
pub mod kotlin;
pub mod module_path;
pub mod queries;
pub mod stdlib;
pub mod treesitter;
pub mod walker;

use symgraph_core::error::ParseError;
use symgraph_core::model::{Language, ParsedFile};
use treesitter::Extractor;

/// Parse one file with the frontend matching its language. Each frontend
/// owns its own `Extractor`-driven query and assembly pass; this just
/// dispatches (spec §4.1: "each frontend is independent but all emit the
/// same model").
pub fn parse_file(path: &str, source: &str, language: Language) -> Result<ParsedFile, ParseError> {
    let mut extractor = Extractor::new();
    match language {
        Language::Kotlin => kotlin::parse(&mut extractor, path, source),
        Language::Java => java::parse(&mut extractor, path, source),
        Language::TypeScript | Language::JavaScript => {
            ecmascript::parse(&mut extractor, path, source, language)
        }
    }
}

/// Parse every file the walker finds under `root`, in parallel (spec §5:
/// "frontends may parse files on a worker pool... each call is pure").
pub fn parse_project(root: &std::path::Path) -> Vec<(String, Result<ParsedFile, ParseError>)> {
    use rayon::prelude::*;

    let entries = walker::FileWalker::new(root).walk();
    entries
        .into_par_iter()
        .map(|entry| {
            let path_str = entry.path.to_string_lossy().to_string();
            let result = std::fs::read_to_string(&entry.path)
                .map_err(|e| ParseError::ParseFailed {
                    path: path_str.clone(),
                    reason: e.to_string(),
                })
                .and_then(|source| parse_file(&path_str, &source, entry.language));
            (path_str, result)
        })
        .collect()
}
