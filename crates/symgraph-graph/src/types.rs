//! The graph schema (spec §4.7): node labels, edge kinds, and the pure
//! record shapes the projector builds before the writer's IO layer submits
//! them. `extra` carries the label-specific fields the teacher's
//! `ModuleProfile` would have stored as dedicated columns — here folded
//! into one JSON blob per node, matching the teacher's own use of
//! `serde_json` for its list-valued columns (`sqlite.rs::module_profiles`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeLabel {
    Project,
    Package,
    Module,
    Class,
    Interface,
    Object,
    Function,
    Property,
    Parameter,
    Annotation,
    TypeAlias,
    Constructor,
    Reexport,
    Domain,
}

impl NodeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeLabel::Project => "Project",
            NodeLabel::Package => "Package",
            NodeLabel::Module => "Module",
            NodeLabel::Class => "Class",
            NodeLabel::Interface => "Interface",
            NodeLabel::Object => "Object",
            NodeLabel::Function => "Function",
            NodeLabel::Property => "Property",
            NodeLabel::Parameter => "Parameter",
            NodeLabel::Annotation => "Annotation",
            NodeLabel::TypeAlias => "TypeAlias",
            NodeLabel::Constructor => "Constructor",
            NodeLabel::Reexport => "Reexport",
            NodeLabel::Domain => "Domain",
        }
    }

    /// The uniqueness-constraint column for this label (spec §4.7/§6).
    pub fn key_column(&self) -> &'static str {
        match self {
            NodeLabel::Project => "path",
            NodeLabel::Package => "name",
            NodeLabel::Module => "path",
            NodeLabel::Annotation => "name",
            NodeLabel::Domain => "name",
            _ => "fqn",
        }
    }
}

/// One node awaiting upsert. `key` is whatever `label.key_column()` names
/// (an FQN for most code-level labels, a bare name for `Package`/
/// `Annotation`/`Domain`, a path for `Project`/`Module`). `id` is the
/// deterministic node id derived from `key` via [`crate::hash_key`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: i64,
    pub label: NodeLabel,
    pub key: String,
    pub name: String,
    pub file_path: Option<String>,
    pub visibility: Option<String>,
    pub extra: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    Contains,
    Declares,
    Extends,
    Implements,
    Calls,
    Uses,
    Returns,
    HasParameter,
    AnnotatedWith,
    HasDomain,
    Owns,
    DependsOn,
    Reexports,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Contains => "CONTAINS",
            EdgeKind::Declares => "DECLARES",
            EdgeKind::Extends => "EXTENDS",
            EdgeKind::Implements => "IMPLEMENTS",
            EdgeKind::Calls => "CALLS",
            EdgeKind::Uses => "USES",
            EdgeKind::Returns => "RETURNS",
            EdgeKind::HasParameter => "HAS_PARAMETER",
            EdgeKind::AnnotatedWith => "ANNOTATED_WITH",
            EdgeKind::HasDomain => "HAS_DOMAIN",
            EdgeKind::Owns => "OWNS",
            EdgeKind::DependsOn => "DEPENDS_ON",
            EdgeKind::Reexports => "REEXPORTS",
        }
    }

    /// `CALLS`/`USES`/`RETURNS` are the bulk relationship kinds spec §4.7
    /// says to chunk into batches; the rest are written inline with their
    /// owning nodes since they're emitted at a fraction of the volume.
    pub fn is_bulk(&self) -> bool {
        matches!(self, EdgeKind::Calls | EdgeKind::Uses | EdgeKind::Returns)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source_id: i64,
    pub target_id: i64,
    pub kind: EdgeKind,
    /// `USES` context: `"parameter"` or `"receiver"`.
    pub context: Option<String>,
    /// `HAS_PARAMETER` position (0-based).
    pub position: Option<u32>,
    /// `DEPENDS_ON` weight.
    pub weight: Option<u64>,
    /// `CALLS` multiplicity contributed by this pass; the writer adds it
    /// to whatever count already exists on `ON MATCH` (spec §4.7).
    pub count: Option<u64>,
}

impl EdgeRecord {
    pub fn simple(source_id: i64, target_id: i64, kind: EdgeKind) -> Self {
        Self { source_id, target_id, kind, context: None, position: None, weight: None, count: None }
    }
}

/// Everything the projector produces for one project pass, ready for the
/// writer's batched submit step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphBatch {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}
