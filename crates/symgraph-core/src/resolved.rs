//! Per-file resolution context and the output of the resolver stage
//! (spec §3: `ResolutionContext`, `ResolvedCall`, `ResolvedFile`).

use crate::model::{Language, ParsedFile, SourceLocation};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ResolutionContext {
    pub file_path: String,
    pub language: Language,
    /// simpleName -> FQN, from the import-resolution-map builder (§4.5).
    pub imports: HashMap<String, String>,
    /// namespace/wildcard prefixes in scope, including language-default
    /// imports contributed by the stdlib provider registry.
    pub wildcard_prefixes: Vec<String>,
    pub current_class_fqn: Option<String>,
    pub current_function_fqn: Option<String>,
    /// localName -> declared type, seeded from function parameters and
    /// extended with enclosing-class property types during resolution.
    pub local_variables: HashMap<String, String>,
    pub package: Option<String>,
}

impl ResolutionContext {
    pub fn for_file(file: &ParsedFile, imports: HashMap<String, String>, wildcard_prefixes: Vec<String>) -> Self {
        Self {
            file_path: file.file_path.clone(),
            language: file.language,
            imports,
            wildcard_prefixes,
            current_class_fqn: None,
            current_function_fqn: None,
            local_variables: HashMap::new(),
            package: file.package.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedCall {
    pub caller_fqn: String,
    pub callee_fqn: String,
    pub location: SourceLocation,
}

#[derive(Debug, Clone)]
pub struct ResolvedFile {
    pub parsed: ParsedFile,
    pub resolved_calls: Vec<ResolvedCall>,
}
