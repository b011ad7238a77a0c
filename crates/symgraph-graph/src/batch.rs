//! Pure batch-accumulator functions (spec §9, "Batched upserts": "Model
//! batches as pure functions from `(previous accumulator, batch) -> next
//! accumulator`, isolating IO in the writer's submit step"). None of this
//! module touches the database — it only shapes the data the writer later
//! submits, which is what makes it trivial to test without a connection.

use crate::types::{EdgeRecord, NodeRecord};
use std::collections::HashMap;

/// Fold a stream of `CALLS` edges into per-(source,target) counts. The
/// writer's `ON CONFLICT` clause does the same fold again across passes
/// (spec §4.7: "`CALLS.count` incremented on duplicate emit"); this
/// function is the in-memory version that collapses duplicates *within*
/// one pass before they ever reach a statement, and the corresponding
/// `record` call is commutative across batches (spec §5: "call-count
/// increments... are commutative across batches").
pub fn accumulate_call_counts(edges: &[EdgeRecord]) -> HashMap<(i64, i64), u64> {
    let mut counts = HashMap::new();
    for edge in edges {
        if matches!(edge.kind, crate::types::EdgeKind::Calls) {
            *counts.entry((edge.source_id, edge.target_id)).or_insert(0u64) += 1;
        }
    }
    counts
}

/// Split a node list into chunks no larger than `size`, the shape the
/// writer's `UNWIND`-equivalent (one parameterized statement per chunk)
/// consumes (spec §4.7: "chunked to a configurable batch size").
pub fn chunk_nodes(nodes: &[NodeRecord], size: usize) -> Vec<&[NodeRecord]> {
    if size == 0 {
        return vec![nodes];
    }
    nodes.chunks(size.max(1)).collect()
}

pub fn chunk_edges(edges: &[EdgeRecord], size: usize) -> Vec<&[EdgeRecord]> {
    if size == 0 {
        return vec![edges];
    }
    edges.chunks(size.max(1)).collect()
}

/// Deduplicate nodes by id, last-write-wins — mirrors the symbol table's
/// own FQN collision policy ([`symgraph_core::symbol::SymbolTable::insert`])
/// so a node projected twice within one pass (e.g. a stdlib synthetic
/// symbol referenced from several call sites) doesn't produce two upsert
/// statements for the same id.
pub fn dedupe_nodes(nodes: Vec<NodeRecord>) -> Vec<NodeRecord> {
    let mut by_id: HashMap<i64, NodeRecord> = HashMap::new();
    for node in nodes {
        by_id.insert(node.id, node);
    }
    let mut out: Vec<NodeRecord> = by_id.into_values().collect();
    out.sort_by_key(|n| n.id);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EdgeKind;

    #[test]
    fn call_counts_collapse_duplicate_edges() {
        let edges = vec![
            EdgeRecord::simple(1, 2, EdgeKind::Calls),
            EdgeRecord::simple(1, 2, EdgeKind::Calls),
            EdgeRecord::simple(1, 3, EdgeKind::Calls),
        ];
        let counts = accumulate_call_counts(&edges);
        assert_eq!(counts[&(1, 2)], 2);
        assert_eq!(counts[&(1, 3)], 1);
    }

    #[test]
    fn chunking_respects_batch_size() {
        let nodes: Vec<NodeRecord> = (0..250)
            .map(|i| NodeRecord {
                id: i,
                label: crate::types::NodeLabel::Function,
                key: format!("f{i}"),
                name: format!("f{i}"),
                file_path: None,
                visibility: None,
                extra: serde_json::json!({}),
            })
            .collect();
        let chunks = chunk_nodes(&nodes, 100);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 100);
        assert_eq!(chunks[2].len(), 50);
    }

    #[test]
    fn dedupe_keeps_last_writer() {
        let mut a = NodeRecord {
            id: 1,
            label: crate::types::NodeLabel::Function,
            key: "x".into(),
            name: "old".into(),
            file_path: None,
            visibility: None,
            extra: serde_json::json!({}),
        };
        let mut b = a.clone();
        b.name = "new".into();
        a.id = 1;
        b.id = 1;
        let deduped = dedupe_nodes(vec![a, b]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].name, "new");
    }
}
