//! SQLite-backed property graph store (spec §4.7, §6). Grounded on the
//! teacher's `keel-core::sqlite::SqliteGraphStore`: same `open`/`in_memory`
//! pair, same `execute_batch` schema block plus a `*_meta` version row, same
//! per-batch `conn.transaction()` wrapping, same hash-collision check before
//! an `INSERT OR REPLACE`. Differs where the teacher's content-hash nodes
//! became FQN-hash nodes and the teacher's four fixed node kinds became the
//! fourteen labels `types::NodeLabel` enumerates, and where `CALLS` needs an
//! idempotent running count instead of a plain replace.

use rusqlite::{params, Connection, OptionalExtension};

use symgraph_core::error::{IndexError, SymgraphError};

use crate::batch::{chunk_edges, chunk_nodes, dedupe_nodes};
use crate::types::{EdgeKind, EdgeRecord, GraphBatch, NodeLabel, NodeRecord};

const SCHEMA_VERSION: u32 = 1;

/// `rusqlite::Error` is foreign and so is `SymgraphError` from this crate's
/// perspective — the orphan rule rules out a blanket `From` impl, so every
/// call site maps explicitly instead.
fn db_err(e: rusqlite::Error) -> SymgraphError {
    SymgraphError::Database(e.to_string())
}

/// Outcome of one write pass (spec §7: "a successful pass reports counts of
/// nodes created/updated, relationships created, files processed, and a
/// list of per-file errors without aborting the pass").
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct WriteResult {
    pub nodes_written: u64,
    pub edges_written: u64,
    pub files_processed: u64,
    pub errors: Vec<IndexError>,
}

impl WriteResult {
    fn merge(&mut self, other: WriteResult) {
        self.nodes_written += other.nodes_written;
        self.edges_written += other.edges_written;
        self.files_processed += other.files_processed;
        self.errors.extend(other.errors);
    }
}

pub struct GraphStore {
    conn: Connection,
}

impl GraphStore {
    /// Open or create a graph database at the given path.
    pub fn open(path: &str) -> Result<Self, SymgraphError> {
        let conn = Connection::open(path).map_err(|e| SymgraphError::Database(e.to_string()))?;
        let store = GraphStore { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// An in-memory database, used by this crate's own tests and by any
    /// caller running a dry pass.
    pub fn in_memory() -> Result<Self, SymgraphError> {
        let conn = Connection::open_in_memory().map_err(|e| SymgraphError::Database(e.to_string()))?;
        let store = GraphStore { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    pub fn ensure_schema(&self) -> Result<(), SymgraphError> {
        self.conn
            .execute_batch(
                "
                CREATE TABLE IF NOT EXISTS symgraph_meta (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS nodes (
                    id INTEGER PRIMARY KEY,
                    label TEXT NOT NULL,
                    key TEXT NOT NULL,
                    name TEXT NOT NULL,
                    file_path TEXT,
                    visibility TEXT,
                    extra TEXT NOT NULL DEFAULT '{}',
                    created_at TEXT NOT NULL DEFAULT (datetime('now')),
                    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                    UNIQUE (label, key)
                );
                CREATE INDEX IF NOT EXISTS idx_nodes_file_path ON nodes(file_path);
                CREATE INDEX IF NOT EXISTS idx_nodes_name ON nodes(name);
                CREATE INDEX IF NOT EXISTS idx_nodes_visibility ON nodes(visibility);
                CREATE INDEX IF NOT EXISTS idx_nodes_label ON nodes(label);

                CREATE TABLE IF NOT EXISTS edges (
                    source_id INTEGER NOT NULL REFERENCES nodes(id) ON DELETE CASCADE,
                    target_id INTEGER NOT NULL REFERENCES nodes(id) ON DELETE CASCADE,
                    kind TEXT NOT NULL,
                    context TEXT,
                    position INTEGER,
                    weight INTEGER,
                    count INTEGER,
                    PRIMARY KEY (source_id, target_id, kind)
                );
                CREATE INDEX IF NOT EXISTS idx_edges_source ON edges(source_id);
                CREATE INDEX IF NOT EXISTS idx_edges_target ON edges(target_id);
                CREATE INDEX IF NOT EXISTS idx_edges_kind ON edges(kind);
                ",
            )
            .map_err(|e| SymgraphError::SchemaMigration(e.to_string()))?;

        self.conn
            .execute(
                "INSERT OR IGNORE INTO symgraph_meta (key, value) VALUES ('schema_version', ?1)",
                params![SCHEMA_VERSION.to_string()],
            )
            .map_err(|e| SymgraphError::SchemaMigration(e.to_string()))?;
        Ok(())
    }

    pub fn schema_version(&self) -> Result<u32, SymgraphError> {
        let version: String = self
            .conn
            .query_row("SELECT value FROM symgraph_meta WHERE key = 'schema_version'", [], |row| row.get(0))
            .map_err(db_err)?;
        version
            .parse()
            .map_err(|e| SymgraphError::Internal(format!("invalid schema version: {e}")))
    }

    /// Delete every node (and, via `ON DELETE CASCADE`, every edge touching
    /// one) whose `file_path` falls under `project_root`, then the project
    /// node itself and any `Package`/`Module`/`Domain` node directly attached
    /// to it — the scoped clear spec §4.7 calls for on a targeted re-index:
    /// "deletes every node whose `filePath` has the project root as a
    /// prefix, and then deletes the project node and any directly attached
    /// `Package`, `Module`, `Domain` nodes."
    pub fn clear_scoped(&mut self, project_root: &str) -> Result<u64, SymgraphError> {
        let pattern = format!("{}%", project_root.trim_end_matches('/'));
        let mut count = self
            .conn
            .execute("DELETE FROM nodes WHERE file_path LIKE ?1", params![pattern])
            .map_err(db_err)?;

        let project_id: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM nodes WHERE label = 'Project' AND key = ?1",
                params![project_root],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)?;

        if let Some(project_id) = project_id {
            count += self
                .conn
                .execute(
                    "DELETE FROM nodes WHERE label IN ('Package', 'Module', 'Domain')
                     AND id IN (SELECT target_id FROM edges WHERE source_id = ?1)",
                    params![project_id],
                )
                .map_err(db_err)?;
            count += self
                .conn
                .execute("DELETE FROM nodes WHERE id = ?1", params![project_id])
                .map_err(db_err)?;
        }

        Ok(count as u64)
    }

    /// Deletes the whole graph, for a full re-index (spec §4.7).
    pub fn clear_all(&mut self) -> Result<(), SymgraphError> {
        self.conn
            .execute_batch("DELETE FROM edges; DELETE FROM nodes;")
            .map_err(db_err)?;
        Ok(())
    }

    /// Write one project pass's batch, chunked per `batch_size` (spec §4.7:
    /// "chunked to a configurable batch size", §9: "batches are pure
    /// accumulator steps"). Nodes are deduplicated by id before the first
    /// chunk so a node projected twice in one pass never produces two
    /// statements for the same row.
    pub fn write_batch(&mut self, batch: GraphBatch, batch_size: usize) -> Result<WriteResult, SymgraphError> {
        let nodes = dedupe_nodes(batch.nodes);
        let mut result = WriteResult::default();

        for chunk in chunk_nodes(&nodes, batch_size) {
            result.merge(self.write_node_chunk(chunk)?);
        }
        for chunk in chunk_edges(&batch.edges, batch_size) {
            result.merge(self.write_edge_chunk(chunk)?);
        }
        Ok(result)
    }

    fn write_node_chunk(&mut self, nodes: &[NodeRecord]) -> Result<WriteResult, SymgraphError> {
        let tx = self.conn.transaction().map_err(db_err)?;
        let mut written = 0u64;
        let mut errors = Vec::new();

        for node in nodes {
            let existing_key: Option<String> = tx
                .query_row("SELECT key FROM nodes WHERE id = ?1", params![node.id], |row| row.get(0))
                .optional()
                .map_err(db_err)?;
            if let Some(existing_key) = &existing_key {
                if existing_key != &node.key {
                    errors.push(IndexError::new(
                        node.file_path.clone().unwrap_or_default(),
                        format!(
                            "node id collision: {} and {} both hash to {}",
                            existing_key, node.key, node.id
                        ),
                    ));
                    continue;
                }
            }

            tx.execute(
                "INSERT INTO nodes (id, label, key, name, file_path, visibility, extra)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO UPDATE SET
                    label = excluded.label,
                    key = excluded.key,
                    name = excluded.name,
                    file_path = excluded.file_path,
                    visibility = excluded.visibility,
                    extra = excluded.extra,
                    updated_at = datetime('now')",
                params![
                    node.id,
                    node.label.as_str(),
                    node.key,
                    node.name,
                    node.file_path,
                    node.visibility,
                    node.extra.to_string(),
                ],
            )
            .map_err(db_err)?;
            written += 1;
        }

        tx.commit().map_err(db_err)?;
        Ok(WriteResult { nodes_written: written, edges_written: 0, files_processed: 0, errors })
    }

    fn write_edge_chunk(&mut self, edges: &[EdgeRecord]) -> Result<WriteResult, SymgraphError> {
        let tx = self.conn.transaction().map_err(db_err)?;
        let mut written = 0u64;
        let mut errors = Vec::new();

        for edge in edges {
            let endpoints_exist: bool = tx
                .query_row(
                    "SELECT (SELECT COUNT(*) FROM nodes WHERE id = ?1) + (SELECT COUNT(*) FROM nodes WHERE id = ?2)",
                    params![edge.source_id, edge.target_id],
                    |row| row.get::<_, i64>(0),
                )
                .map(|count| count == 2)
                .map_err(db_err)?;
            if !endpoints_exist {
                errors.push(IndexError::new(
                    String::new(),
                    format!("skipped {} edge: missing endpoint ({} -> {})", edge.kind.as_str(), edge.source_id, edge.target_id),
                ));
                continue;
            }

            if matches!(edge.kind, EdgeKind::Calls) {
                tx.execute(
                    "INSERT INTO edges (source_id, target_id, kind, context, position, weight, count)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                     ON CONFLICT(source_id, target_id, kind) DO UPDATE SET
                        count = COALESCE(edges.count, 0) + excluded.count",
                    params![
                        edge.source_id,
                        edge.target_id,
                        edge.kind.as_str(),
                        edge.context,
                        edge.position,
                        edge.weight,
                        edge.count.unwrap_or(1),
                    ],
                )
                .map_err(db_err)?;
            } else {
                tx.execute(
                    "INSERT INTO edges (source_id, target_id, kind, context, position, weight, count)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                     ON CONFLICT(source_id, target_id, kind) DO UPDATE SET
                        context = excluded.context,
                        position = excluded.position,
                        weight = excluded.weight",
                    params![
                        edge.source_id,
                        edge.target_id,
                        edge.kind.as_str(),
                        edge.context,
                        edge.position,
                        edge.weight,
                        edge.count,
                    ],
                )
                .map_err(db_err)?;
            }
            written += 1;
        }

        tx.commit().map_err(db_err)?;
        Ok(WriteResult { nodes_written: 0, edges_written: written, files_processed: 0, errors })
    }

    pub fn node_count(&self) -> Result<u64, SymgraphError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM nodes", [], |row| row.get::<_, i64>(0))
            .map_err(db_err)? as u64)
    }

    pub fn edge_count(&self) -> Result<u64, SymgraphError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM edges", [], |row| row.get::<_, i64>(0))
            .map_err(db_err)? as u64)
    }

    pub fn find_node_by_key(&self, label: NodeLabel, key: &str) -> Result<Option<i64>, SymgraphError> {
        self.conn
            .query_row(
                "SELECT id FROM nodes WHERE label = ?1 AND key = ?2",
                params![label.as_str(), key],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(id: i64, label: NodeLabel, key: &str) -> NodeRecord {
        NodeRecord {
            id,
            label,
            key: key.to_string(),
            name: key.to_string(),
            file_path: Some("/repo/src/f.kt".to_string()),
            visibility: Some("Public".to_string()),
            extra: json!({}),
        }
    }

    #[test]
    fn schema_version_is_set_on_open() {
        let store = GraphStore::in_memory().unwrap();
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn write_batch_persists_nodes_and_edges() {
        let mut store = GraphStore::in_memory().unwrap();
        let a = node(1, NodeLabel::Class, "pkg.A");
        let b = node(2, NodeLabel::Class, "pkg.B");
        let batch = GraphBatch {
            nodes: vec![a, b],
            edges: vec![EdgeRecord::simple(1, 2, EdgeKind::Extends)],
        };
        let result = store.write_batch(batch, 100).unwrap();
        assert_eq!(result.nodes_written, 2);
        assert_eq!(result.edges_written, 1);
        assert_eq!(store.node_count().unwrap(), 2);
        assert_eq!(store.edge_count().unwrap(), 1);
    }

    #[test]
    fn rewriting_same_node_does_not_duplicate() {
        let mut store = GraphStore::in_memory().unwrap();
        let a = node(1, NodeLabel::Class, "pkg.A");
        store.write_batch(GraphBatch { nodes: vec![a.clone()], edges: vec![] }, 100).unwrap();
        store.write_batch(GraphBatch { nodes: vec![a], edges: vec![] }, 100).unwrap();
        assert_eq!(store.node_count().unwrap(), 1);
    }

    #[test]
    fn calls_edge_count_accumulates_across_passes() {
        let mut store = GraphStore::in_memory().unwrap();
        let a = node(1, NodeLabel::Function, "pkg.a");
        let b = node(2, NodeLabel::Function, "pkg.b");
        let edge = EdgeRecord { count: Some(1), ..EdgeRecord::simple(1, 2, EdgeKind::Calls) };
        store.write_batch(GraphBatch { nodes: vec![a.clone(), b.clone()], edges: vec![edge.clone()] }, 100).unwrap();
        store.write_batch(GraphBatch { nodes: vec![a, b], edges: vec![edge] }, 100).unwrap();

        let count: i64 = store
            .conn
            .query_row("SELECT count FROM edges WHERE source_id = 1 AND target_id = 2", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn edge_with_missing_endpoint_is_skipped_not_fatal() {
        let mut store = GraphStore::in_memory().unwrap();
        let a = node(1, NodeLabel::Class, "pkg.A");
        let batch = GraphBatch {
            nodes: vec![a],
            edges: vec![EdgeRecord::simple(1, 999, EdgeKind::Extends)],
        };
        let result = store.write_batch(batch, 100).unwrap();
        assert_eq!(result.edges_written, 0);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn node_id_collision_between_different_keys_is_reported() {
        let mut store = GraphStore::in_memory().unwrap();
        let a = node(1, NodeLabel::Class, "pkg.A");
        let mut a_renamed = node(1, NodeLabel::Class, "pkg.ADifferentFqn");
        a_renamed.id = 1;
        store.write_batch(GraphBatch { nodes: vec![a], edges: vec![] }, 100).unwrap();
        let result = store.write_batch(GraphBatch { nodes: vec![a_renamed], edges: vec![] }, 100).unwrap();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(store.node_count().unwrap(), 1);
    }

    #[test]
    fn clear_scoped_removes_only_matching_file_paths() {
        let mut store = GraphStore::in_memory().unwrap();
        let mut in_scope = node(1, NodeLabel::Class, "pkg.A");
        in_scope.file_path = Some("/repo/src/a.kt".to_string());
        let mut out_of_scope = node(2, NodeLabel::Class, "pkg.B");
        out_of_scope.file_path = Some("/other/src/b.kt".to_string());
        store.write_batch(GraphBatch { nodes: vec![in_scope, out_of_scope], edges: vec![] }, 100).unwrap();

        let removed = store.clear_scoped("/repo").unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.node_count().unwrap(), 1);
    }

    /// Spec §4.7: a scoped clear also deletes the project node and any
    /// `Package`/`Module`/`Domain` node directly attached to it, so a
    /// re-index of a different project leaves no trace behind (spec §8
    /// scenario 6: "cross-project isolation on scoped clear").
    #[test]
    fn clear_scoped_removes_project_and_attached_package_module_domain() {
        let mut store = GraphStore::in_memory().unwrap();
        let project = NodeRecord {
            id: crate::hash_key("/repo"),
            label: NodeLabel::Project,
            key: "/repo".to_string(),
            name: "demo".to_string(),
            file_path: None,
            visibility: None,
            extra: json!({}),
        };
        let package = NodeRecord {
            id: crate::hash_key("pkg"),
            label: NodeLabel::Package,
            key: "pkg".to_string(),
            name: "pkg".to_string(),
            file_path: None,
            visibility: None,
            extra: json!({}),
        };
        let module = NodeRecord {
            id: crate::hash_key("src/mod"),
            label: NodeLabel::Module,
            key: "src/mod".to_string(),
            name: "mod".to_string(),
            file_path: None,
            visibility: None,
            extra: json!({}),
        };
        let domain = NodeRecord {
            id: crate::hash_key("billing-domain"),
            label: NodeLabel::Domain,
            key: "billing-domain".to_string(),
            name: "billing-domain".to_string(),
            file_path: None,
            visibility: None,
            extra: json!({}),
        };
        let mut class_a = node(100, NodeLabel::Class, "pkg.A");
        class_a.file_path = Some("/repo/src/a.kt".to_string());

        let batch = GraphBatch {
            nodes: vec![project.clone(), package.clone(), module.clone(), domain.clone(), class_a],
            edges: vec![
                EdgeRecord::simple(project.id, package.id, EdgeKind::Contains),
                EdgeRecord::simple(project.id, module.id, EdgeKind::Contains),
                EdgeRecord::simple(project.id, domain.id, EdgeKind::HasDomain),
            ],
        };
        store.write_batch(batch, 100).unwrap();
        assert_eq!(store.node_count().unwrap(), 5);

        store.clear_scoped("/repo").unwrap();
        assert_eq!(store.node_count().unwrap(), 0);
    }
}
