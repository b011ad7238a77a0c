//! Shared AST-visitation utility layer (spec §4.1: "share a common
//! AST-visitation utility layer"). Grounded on the teacher's
//! `keel-parsers/src/treesitter/mod.rs`: one `tree_sitter::Parser` wrapper
//! that compiles a per-language `Query`, walks matches with a
//! `QueryCursor` via `streaming_iterator::StreamingIterator`, and hands
//! back captures bucketed by name. Each language frontend owns turning
//! those buckets into the uniform `ParsedFile` model; this layer never
//! knows about Kotlin/Java/TypeScript/JavaScript specifically.

use std::collections::HashMap;
use streaming_iterator::StreamingIterator;
use symgraph_core::model::Language;
use tree_sitter::{Parser, Query, QueryCursor};

#[derive(Debug, Clone)]
pub struct Capture {
    pub name: String,
    pub text: String,
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

/// One matched query pattern, with every capture it produced. Frontends
/// key off `captures_by_name` to pull e.g. `def.function.name` alongside
/// `def.function.body` from the same match.
#[derive(Debug, Clone, Default)]
pub struct MatchBucket {
    pub captures_by_name: HashMap<String, Capture>,
}

impl MatchBucket {
    pub fn get(&self, name: &str) -> Option<&Capture> {
        self.captures_by_name.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).map(|c| c.text.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("failed to set grammar: {0}")]
    Grammar(String),
    #[error("invalid query: {0}")]
    Query(String),
    #[error("parse failed for {0}")]
    ParseFailed(String),
}

fn ts_language(language: Language) -> tree_sitter::Language {
    match language {
        Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        Language::Java => tree_sitter_java::LANGUAGE.into(),
        Language::Kotlin => tree_sitter_kotlin_ng::LANGUAGE.into(),
    }
}

pub struct Extractor {
    parser: Parser,
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    /// Run `query_source` over `source`, returning one [`MatchBucket`] per
    /// query match. Parse failures are partial, not fatal: a `None` tree
    /// from tree-sitter (e.g. unsupported encoding) is the only unrecoverable
    /// case, matching spec §4.1's "partial trees are allowed".
    pub fn extract(
        &mut self,
        language: Language,
        path: &str,
        source: &str,
        query_source: &str,
    ) -> Result<Vec<MatchBucket>, ExtractError> {
        let lang = ts_language(language);
        self.parser
            .set_language(&lang)
            .map_err(|e| ExtractError::Grammar(e.to_string()))?;

        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ExtractError::ParseFailed(path.to_string()))?;

        let query =
            Query::new(&lang, query_source).map_err(|e| ExtractError::Query(e.to_string()))?;

        let mut cursor = QueryCursor::new();
        let names = query.capture_names();
        let mut buckets = Vec::new();
        let mut matches = cursor.matches(&query, tree.root_node(), source.as_bytes());
        while let Some(m) = matches.next() {
            let mut bucket = MatchBucket::default();
            for capture in m.captures {
                let name = names[capture.index as usize].to_string();
                let node = capture.node;
                let text = node
                    .utf8_text(source.as_bytes())
                    .unwrap_or_default()
                    .to_string();
                let start = node.start_position();
                let end = node.end_position();
                bucket.captures_by_name.insert(
                    name.clone(),
                    Capture {
                        name,
                        text,
                        start_line: start.row as u32 + 1,
                        start_col: start.column as u32,
                        end_line: end.row as u32 + 1,
                        end_col: end.column as u32,
                    },
                );
            }
            buckets.push(bucket);
        }
        Ok(buckets)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of the smallest `(start_line, end_line)` range (inclusive) that
/// contains `line`. Frontends use this to assign a function/property to
/// its nearest enclosing class body, and a call site to its nearest
/// enclosing function body, without re-walking the tree a second time.
pub fn smallest_containing_range(ranges: &[(u32, u32)], line: u32) -> Option<usize> {
    ranges
        .iter()
        .enumerate()
        .filter(|(_, (start, end))| *start <= line && line <= *end)
        .min_by_key(|(_, (start, end))| end - start)
        .map(|(index, _)| index)
}

/// Map a file extension to the language frontend that owns it. Thin
/// wrapper kept here (rather than only on `Language`) so the walker can
/// depend on this module alone.
pub fn detect_language(path: &std::path::Path) -> Option<Language> {
    let ext = path.extension()?.to_str()?;
    Language::from_extension(ext)
}
