//! Shared types for the symgraph indexing pipeline: the uniform parse model,
//! the symbol table, resolved-call records, domain records, the error
//! taxonomy, content hashing and configuration loading.

pub mod config;
pub mod domain;
pub mod error;
pub mod hash;
pub mod model;
pub mod resolved;
pub mod stats;
pub mod symbol;

pub use config::IndexerConfig;
pub use error::{IndexError, SymgraphError};
pub use model::*;
pub use resolved::{ResolutionContext, ResolvedCall, ResolvedFile};
pub use symbol::{Symbol, SymbolKind, SymbolTable};
