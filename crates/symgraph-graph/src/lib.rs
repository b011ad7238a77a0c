//! Idempotent, batched projection of a resolved project onto a property
//! graph, and the SQLite-backed store that persists it (spec §4.7, §6).
//!
//! [`project::project`] is the pure half: it turns a
//! [`symgraph_resolve::ProjectResolution`] into a [`types::GraphBatch`]
//! without touching a database. [`store::GraphStore`] is the IO half: it
//! owns the connection and applies batches with the upsert semantics spec
//! §4.7 describes ("MERGE ... ON CREATE / ON MATCH" expressed as
//! `INSERT ... ON CONFLICT DO UPDATE`), grounded on the teacher's
//! `keel-core::sqlite::SqliteStore`.

pub mod batch;
pub mod project;
pub mod store;
pub mod types;

/// Derive a node's deterministic id from its graph key (an FQN for most
/// labels; see [`types::NodeLabel::key_column`]). SQLite's `INTEGER PRIMARY
/// KEY` column is a signed 64-bit int, so the `u64` hash is reinterpreted
/// as `i64` rather than narrowed — every bit pattern round-trips, only the
/// textual sign differs, and nothing here ever compares ids across that
/// boundary (spec §3: "node identity is a deterministic function of its
/// key, independent of insertion order").
pub fn hash_key(key: &str) -> i64 {
    symgraph_core::hash::fqn_hash(key) as i64
}

pub use project::project;
pub use store::GraphStore;
pub use types::{EdgeKind, EdgeRecord, GraphBatch, NodeLabel, NodeRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_key_is_deterministic() {
        assert_eq!(hash_key("pkg.Foo"), hash_key("pkg.Foo"));
        assert_ne!(hash_key("pkg.Foo"), hash_key("pkg.Bar"));
    }
}
