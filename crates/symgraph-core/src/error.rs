//! Error taxonomy. Mirrors spec §7: per-file parse/write failures collect
//! into a pass's error list rather than aborting it; only schema-ensure and
//! configuration failures are fatal and propagate to the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SymgraphError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("schema setup failed: {0}")]
    SchemaMigration(String),

    #[error("node hash collision on fqn {fqn}: {existing_path} vs {new_path}")]
    HashCollision {
        fqn: String,
        existing_path: String,
        new_path: String,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

/// A single file-scoped failure recorded during a parse or write pass.
/// Per spec §7 these accumulate in `WriteResult.errors`; the pass continues.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct IndexError {
    pub file_path: String,
    pub message: String,
}

impl IndexError {
    pub fn new(file_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unsupported language for {path}")]
    UnsupportedLanguage { path: String },
    #[error("failed to load grammar for {path}: {reason}")]
    Language { path: String, reason: String },
    #[error("invalid tree-sitter query for {language}: {reason}")]
    Query { language: String, reason: String },
    #[error("failed to parse {path}: {reason}")]
    ParseFailed { path: String, reason: String },
}
