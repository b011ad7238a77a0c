//! Projects a resolved project onto the node/edge records spec §4.7
//! describes, as a pure function of the resolver's output — the writer's
//! IO layer (`store.rs`) only ever sees the records this module builds,
//! never the `ParsedFile`/`SymbolTable` shapes directly.

use std::collections::{BTreeSet, HashSet};

use serde_json::json;
use symgraph_core::domain::{Domain, DomainDependency};
use symgraph_core::model::*;
use symgraph_core::symbol::SymbolTable;
use symgraph_parsers::module_path::{
    build_module_hierarchy, collect_module_paths, infer_module_path, ModulePathOptions,
};
use symgraph_parsers::stdlib::is_primitive_type;
use symgraph_resolve::resolver::normalize_type;
use symgraph_resolve::ProjectResolution;

use crate::hash_key;
use crate::types::{EdgeKind, EdgeRecord, GraphBatch, NodeLabel, NodeRecord};

fn compose_fqn(parent: Option<&str>, simple_name: &str) -> String {
    match parent {
        Some(parent) if !parent.is_empty() => format!("{parent}.{simple_name}"),
        _ => simple_name.to_string(),
    }
}

fn visibility_str(v: Visibility) -> &'static str {
    match v {
        Visibility::Public => "Public",
        Visibility::Private => "Private",
        Visibility::Protected => "Protected",
        Visibility::Internal => "Internal",
    }
}

struct Ctx<'a> {
    table: &'a SymbolTable,
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
    known_annotations: HashSet<String>,
}

impl<'a> Ctx<'a> {
    fn push_node(&mut self, node: NodeRecord) -> i64 {
        let id = node.id;
        self.nodes.push(node);
        id
    }

    fn annotate(&mut self, owner_id: i64, name: &str) {
        if self.known_annotations.insert(name.to_string()) {
            self.nodes.push(NodeRecord {
                id: hash_key(name),
                label: NodeLabel::Annotation,
                key: name.to_string(),
                name: name.to_string(),
                file_path: None,
                visibility: None,
                extra: json!({}),
            });
        }
        self.edges.push(EdgeRecord::simple(owner_id, hash_key(name), EdgeKind::AnnotatedWith));
    }

    /// Binds a possibly-unqualified type name to a known type symbol's FQN
    /// (spec §4.7, "Relationship-resolution policy at write time"): try the
    /// target FQN first (same-package qualification, or already-qualified),
    /// then fall back to a unique simple-name match. Returns `None` when
    /// unresolvable or when the name is a built-in primitive (filtered
    /// upstream of any `USES`/`EXTENDS`/`IMPLEMENTS`/`RETURNS` edge).
    fn bind_type(&self, package: Option<&str>, raw: &str) -> Option<String> {
        let type_name = normalize_type(raw);
        if type_name.is_empty() || is_primitive_type(&type_name) {
            return None;
        }
        if let Some(pkg) = package {
            let candidate = format!("{pkg}.{type_name}");
            if let Some(sym) = self.table.get_by_fqn(&candidate) {
                if sym.is_type() {
                    return Some(candidate);
                }
            }
        }
        if let Some(sym) = self.table.get_by_fqn(&type_name) {
            if sym.is_type() {
                return Some(type_name);
            }
        }
        let matches: Vec<_> = self.table.by_name(&type_name).into_iter().filter(|s| s.is_type()).collect();
        if matches.len() == 1 {
            return Some(matches[0].fqn.clone());
        }
        None
    }
}

fn project_parameter(ctx: &mut Ctx, owner_fqn: &str, position: usize, param: &ParsedParameter) -> i64 {
    let key = format!("{owner_fqn}#param.{position}.{}", param.name);
    ctx.push_node(NodeRecord {
        id: hash_key(&key),
        label: NodeLabel::Parameter,
        key,
        name: param.name.clone(),
        file_path: None,
        visibility: None,
        extra: json!({
            "type": param.param_type,
            "hasDefault": param.has_default,
            "isNoinline": param.is_noinline,
            "isCrossinline": param.is_crossinline,
        }),
    })
}

fn project_function(
    ctx: &mut Ctx,
    file: &ParsedFile,
    package: Option<&str>,
    parent_fqn: Option<&str>,
    function: &ParsedFunction,
) -> i64 {
    let fqn = compose_fqn(parent_fqn, &function.name);
    let id = ctx.push_node(NodeRecord {
        id: hash_key(&fqn),
        label: NodeLabel::Function,
        key: fqn.clone(),
        name: function.name.clone(),
        file_path: Some(file.file_path.clone()),
        visibility: Some(visibility_str(function.visibility).to_string()),
        extra: json!({
            "isAbstract": function.modifiers.is_abstract,
            "isSuspend": function.modifiers.is_suspend,
            "isInline": function.modifiers.is_inline,
            "isInfix": function.modifiers.is_infix,
            "isOperator": function.modifiers.is_operator,
            "isExtension": function.modifiers.is_extension,
            "receiverType": function.receiver_type,
            "returnType": function.return_type,
        }),
    });

    for annotation in &function.annotations {
        ctx.annotate(id, annotation);
    }

    for (position, param) in function.parameters.iter().enumerate() {
        let pid = project_parameter(ctx, &fqn, position, param);
        ctx.edges.push(EdgeRecord {
            source_id: id,
            target_id: pid,
            kind: EdgeKind::HasParameter,
            context: None,
            position: Some(position as u32),
            weight: None,
            count: None,
        });
        if let Some(param_type) = &param.param_type {
            if let Some(target) = ctx.bind_type(package, param_type) {
                ctx.edges.push(EdgeRecord {
                    source_id: id,
                    target_id: hash_key(&target),
                    kind: EdgeKind::Uses,
                    context: Some("parameter".to_string()),
                    position: None,
                    weight: None,
                    count: None,
                });
            }
        }
    }

    if let Some(receiver_type) = &function.receiver_type {
        if let Some(target) = ctx.bind_type(package, receiver_type) {
            ctx.edges.push(EdgeRecord {
                source_id: id,
                target_id: hash_key(&target),
                kind: EdgeKind::Uses,
                context: Some("receiver".to_string()),
                position: None,
                weight: None,
                count: None,
            });
        }
    }

    if let Some(return_type) = &function.return_type {
        if let Some(target) = ctx.bind_type(package, return_type) {
            ctx.edges.push(EdgeRecord::simple(id, hash_key(&target), EdgeKind::Returns));
        }
    }

    id
}

fn project_property(
    ctx: &mut Ctx,
    file: &ParsedFile,
    parent_fqn: Option<&str>,
    property: &ParsedProperty,
) -> i64 {
    let fqn = compose_fqn(parent_fqn, &property.name);
    let id = ctx.push_node(NodeRecord {
        id: hash_key(&fqn),
        label: NodeLabel::Property,
        key: fqn,
        name: property.name.clone(),
        file_path: Some(file.file_path.clone()),
        visibility: Some(visibility_str(property.visibility).to_string()),
        extra: json!({
            "declaredType": property.declared_type,
            "isImmutable": property.is_immutable,
        }),
    });
    for annotation in &property.annotations {
        ctx.annotate(id, annotation);
    }
    id
}

fn project_type_alias(
    ctx: &mut Ctx,
    file: &ParsedFile,
    package: Option<&str>,
    alias: &ParsedTypeAlias,
) -> i64 {
    let fqn = compose_fqn(package, &alias.name);
    ctx.push_node(NodeRecord {
        id: hash_key(&fqn),
        label: NodeLabel::TypeAlias,
        key: fqn,
        name: alias.name.clone(),
        file_path: Some(file.file_path.clone()),
        visibility: Some(visibility_str(alias.visibility).to_string()),
        extra: json!({ "aliasedType": alias.aliased_type }),
    })
}

fn project_class(
    ctx: &mut Ctx,
    file: &ParsedFile,
    package: Option<&str>,
    parent_fqn: Option<&str>,
    class: &ParsedClass,
) -> i64 {
    let fqn = compose_fqn(parent_fqn, &class.name);
    let label = match class.kind {
        ClassKind::Interface => NodeLabel::Interface,
        ClassKind::Object => NodeLabel::Object,
        ClassKind::Class | ClassKind::Enum | ClassKind::Annotation => NodeLabel::Class,
    };
    let id = ctx.push_node(NodeRecord {
        id: hash_key(&fqn),
        label,
        key: fqn.clone(),
        name: class.name.clone(),
        file_path: Some(file.file_path.clone()),
        visibility: Some(visibility_str(class.visibility).to_string()),
        extra: json!({
            "isAbstract": class.modifiers.is_abstract,
            "isData": class.modifiers.is_data,
            "isSealed": class.modifiers.is_sealed,
            "isEnum": class.kind == ClassKind::Enum,
            "isAnnotationClass": class.kind == ClassKind::Annotation,
        }),
    });

    for annotation in &class.annotations {
        ctx.annotate(id, annotation);
    }

    if let Some(super_name) = &class.superclass {
        if let Some(target) = ctx.bind_type(package, super_name) {
            ctx.edges.push(EdgeRecord::simple(id, hash_key(&target), EdgeKind::Extends));
        }
    }
    for interface_name in &class.interfaces {
        if let Some(target) = ctx.bind_type(package, interface_name) {
            let kind = if label == NodeLabel::Interface { EdgeKind::Extends } else { EdgeKind::Implements };
            ctx.edges.push(EdgeRecord::simple(id, hash_key(&target), kind));
        }
    }

    for property in &class.properties {
        let pid = project_property(ctx, file, Some(&fqn), property);
        ctx.edges.push(EdgeRecord::simple(id, pid, EdgeKind::Declares));
    }
    for function in &class.functions {
        let fid = project_function(ctx, file, package, Some(&fqn), function);
        ctx.edges.push(EdgeRecord::simple(id, fid, EdgeKind::Declares));
    }
    for nested in &class.nested_classes {
        let nid = project_class(ctx, file, package, Some(&fqn), nested);
        ctx.edges.push(EdgeRecord::simple(id, nid, EdgeKind::Declares));
    }
    if let Some(companion) = &class.companion {
        let companion_name = class.companion_name.as_deref().unwrap_or("Companion");
        let companion_fqn = format!("{fqn}.{companion_name}");
        let cid = ctx.push_node(NodeRecord {
            id: hash_key(&companion_fqn),
            label: NodeLabel::Object,
            key: companion_fqn.clone(),
            name: companion_name.to_string(),
            file_path: Some(file.file_path.clone()),
            visibility: Some("Public".to_string()),
            extra: json!({ "isCompanion": true }),
        });
        ctx.edges.push(EdgeRecord::simple(id, cid, EdgeKind::Declares));
        for property in &companion.properties {
            let pid = project_property(ctx, file, Some(&companion_fqn), property);
            ctx.edges.push(EdgeRecord::simple(cid, pid, EdgeKind::Declares));
        }
        for function in &companion.functions {
            let fid = project_function(ctx, file, package, Some(&companion_fqn), function);
            ctx.edges.push(EdgeRecord::simple(cid, fid, EdgeKind::Declares));
        }
    }
    for (index, params) in class.secondary_constructors.iter().enumerate() {
        let ctor_fqn = format!("{fqn}.<init>#{index}");
        let ctor_id = ctx.push_node(NodeRecord {
            id: hash_key(&ctor_fqn),
            label: NodeLabel::Constructor,
            key: ctor_fqn.clone(),
            name: "<init>".to_string(),
            file_path: Some(file.file_path.clone()),
            visibility: Some("Public".to_string()),
            extra: json!({ "index": index }),
        });
        ctx.edges.push(EdgeRecord::simple(id, ctor_id, EdgeKind::Declares));
        for (position, param) in params.iter().enumerate() {
            let pid = project_parameter(ctx, &ctor_fqn, position, param);
            ctx.edges.push(EdgeRecord {
                source_id: ctor_id,
                target_id: pid,
                kind: EdgeKind::HasParameter,
                context: None,
                position: Some(position as u32),
                weight: None,
                count: None,
            });
        }
    }

    id
}

fn project_object_expression(
    ctx: &mut Ctx,
    file: &ParsedFile,
    package: Option<&str>,
    object_expr: &ParsedObjectExpression,
) -> i64 {
    let enclosing = package.unwrap_or("");
    let fqn = object_expr.anonymous_fqn(enclosing);
    let id = ctx.push_node(NodeRecord {
        id: hash_key(&fqn),
        label: NodeLabel::Object,
        key: fqn.clone(),
        name: "<anonymous>".to_string(),
        file_path: Some(file.file_path.clone()),
        visibility: Some("Public".to_string()),
        extra: json!({}),
    });
    for super_type in &object_expr.super_types {
        if let Some(target) = ctx.bind_type(package, super_type) {
            ctx.edges.push(EdgeRecord::simple(id, hash_key(&target), EdgeKind::Implements));
        }
    }
    for property in &object_expr.properties {
        let pid = project_property(ctx, file, Some(&fqn), property);
        ctx.edges.push(EdgeRecord::simple(id, pid, EdgeKind::Declares));
    }
    for function in &object_expr.functions {
        let fid = project_function(ctx, file, package, Some(&fqn), function);
        ctx.edges.push(EdgeRecord::simple(id, fid, EdgeKind::Declares));
    }
    id
}

/// The container (`Package` or `Module`) a file's top-level declarations
/// attach to, or `None` when the file floats (spec §8 boundary behaviors).
fn container_id(file_path: &str, package: Option<&str>, module_options: &ModulePathOptions) -> Option<i64> {
    if let Some(package) = package {
        return Some(hash_key(package));
    }
    let path = std::path::Path::new(file_path);
    infer_module_path(path, module_options).map(|m| hash_key(&m))
}

/// Project a fully resolved project onto the node/edge records the writer
/// will upsert (spec §4.7). Pure: no I/O, no database handle.
pub fn project(
    project_path: &str,
    project_name: &str,
    resolution: &ProjectResolution,
    module_options: &ModulePathOptions,
) -> GraphBatch {
    let mut ctx = Ctx {
        table: &resolution.table,
        nodes: Vec::new(),
        edges: Vec::new(),
        known_annotations: HashSet::new(),
    };

    let project_id = ctx.push_node(NodeRecord {
        id: hash_key(project_path),
        label: NodeLabel::Project,
        key: project_path.to_string(),
        name: project_name.to_string(),
        file_path: None,
        visibility: None,
        extra: json!({}),
    });

    // Package nodes, one per distinct package declared by any file.
    let mut emitted_packages: HashSet<String> = HashSet::new();
    for rf in &resolution.resolved_files {
        if let Some(pkg) = &rf.parsed.package {
            if emitted_packages.insert(pkg.clone()) {
                let id = ctx.push_node(NodeRecord {
                    id: hash_key(pkg),
                    label: NodeLabel::Package,
                    key: pkg.clone(),
                    name: pkg.clone(),
                    file_path: None,
                    visibility: None,
                    extra: json!({}),
                });
                ctx.edges.push(EdgeRecord::simple(project_id, id, EdgeKind::Contains));
            }
        }
    }

    // Module hierarchy, for files with no explicit package (spec §4.2).
    let package_free_paths: Vec<std::path::PathBuf> = resolution
        .resolved_files
        .iter()
        .filter(|rf| rf.parsed.package.is_none())
        .map(|rf| std::path::PathBuf::from(&rf.parsed.file_path))
        .collect();
    let module_paths: BTreeSet<String> = collect_module_paths(&package_free_paths, module_options);
    for path in &module_paths {
        ctx.push_node(NodeRecord {
            id: hash_key(path),
            label: NodeLabel::Module,
            key: path.clone(),
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            file_path: None,
            visibility: None,
            extra: json!({}),
        });
    }
    let hierarchy = build_module_hierarchy(&module_paths);
    for (parent, children) in &hierarchy {
        for child in children {
            let child_id = hash_key(child);
            match parent {
                Some(parent) => {
                    ctx.edges.push(EdgeRecord::simple(hash_key(parent), child_id, EdgeKind::Contains));
                }
                None => {
                    ctx.edges.push(EdgeRecord::simple(project_id, child_id, EdgeKind::Contains));
                }
            }
        }
    }

    // Per-file declarations.
    for rf in &resolution.resolved_files {
        let file = &rf.parsed;
        let package = file.package.as_deref();
        let container = container_id(&file.file_path, package, module_options);

        for class in &file.classes {
            let id = project_class(&mut ctx, file, package, package, class);
            if let Some(container) = container {
                ctx.edges.push(EdgeRecord::simple(container, id, EdgeKind::Contains));
            }
        }
        for function in &file.functions {
            let id = project_function(&mut ctx, file, package, package, function);
            if let Some(container) = container {
                ctx.edges.push(EdgeRecord::simple(container, id, EdgeKind::Contains));
            }
        }
        for property in &file.properties {
            let id = project_property(&mut ctx, file, package, property);
            if let Some(container) = container {
                ctx.edges.push(EdgeRecord::simple(container, id, EdgeKind::Contains));
            }
        }
        for alias in &file.type_aliases {
            let id = project_type_alias(&mut ctx, file, package, alias);
            if let Some(container) = container {
                ctx.edges.push(EdgeRecord::simple(container, id, EdgeKind::Contains));
            }
        }
        for decl in &file.destructuring_declarations {
            for name in &decl.component_names {
                if name == "_" {
                    continue;
                }
                let fqn = compose_fqn(package, name);
                let id = ctx.push_node(NodeRecord {
                    id: hash_key(&fqn),
                    label: NodeLabel::Property,
                    key: fqn,
                    name: name.clone(),
                    file_path: Some(file.file_path.clone()),
                    visibility: Some("Public".to_string()),
                    extra: json!({ "isImmutable": decl.is_immutable, "destructured": true }),
                });
                if let Some(container) = container {
                    ctx.edges.push(EdgeRecord::simple(container, id, EdgeKind::Contains));
                }
            }
        }
        for object_expr in &file.object_expressions {
            project_object_expression(&mut ctx, file, package, object_expr);
        }
        for reexport in &file.reexports {
            let key = format!("{}#{}", file.file_path, reexport.location.line_start);
            let id = ctx.push_node(NodeRecord {
                id: hash_key(&key),
                label: NodeLabel::Reexport,
                key,
                name: reexport.exported_name.clone().unwrap_or_else(|| reexport.source_specifier.clone()),
                file_path: Some(file.file_path.clone()),
                visibility: None,
                extra: json!({
                    "sourceSpecifier": reexport.source_specifier,
                    "originalName": reexport.original_name,
                    "isNamespace": reexport.is_namespace,
                    "isWildcard": reexport.is_wildcard,
                    "isTypeOnly": reexport.is_type_only,
                }),
            });
            if let Some(container) = container {
                ctx.edges.push(EdgeRecord::simple(container, id, EdgeKind::Reexports));
            }
        }
    }

    // CALLS edges, one per distinct (caller, callee) pair, folded to a
    // per-pass count (spec §4.7: "count property incremented on duplicate
    // emit"). Any callee the project's own table doesn't know about came
    // from a stdlib provider lookup and needs a synthetic Function node so
    // the writer's invariant ("callee node exists and has label Function")
    // holds (spec §8).
    let mut call_counts: std::collections::HashMap<(String, String), u64> = std::collections::HashMap::new();
    for rf in &resolution.resolved_files {
        for call in &rf.resolved_calls {
            *call_counts.entry((call.caller_fqn.clone(), call.callee_fqn.clone())).or_insert(0) += 1;
        }
    }
    let mut stdlib_fqns: HashSet<String> = HashSet::new();
    for ((caller, callee), count) in &call_counts {
        if resolution.table.get_by_fqn(callee).is_none() {
            stdlib_fqns.insert(callee.clone());
        }
        ctx.edges.push(EdgeRecord {
            source_id: hash_key(caller),
            target_id: hash_key(callee),
            kind: EdgeKind::Calls,
            context: None,
            position: None,
            weight: None,
            count: Some(*count),
        });
    }
    for fqn in stdlib_fqns {
        let name = fqn.rsplit('.').next().unwrap_or(&fqn).to_string();
        ctx.push_node(NodeRecord {
            id: hash_key(&fqn),
            label: NodeLabel::Function,
            key: fqn,
            name,
            file_path: Some("<stdlib>".to_string()),
            visibility: Some("Public".to_string()),
            extra: json!({ "stdlib": true }),
        });
    }

    // Domains (spec §4.8).
    for domain in &resolution.domains {
        project_domain(&mut ctx, project_id, domain);
    }
    for dependency in &resolution.dependencies {
        project_dependency(&mut ctx, dependency);
    }

    GraphBatch { nodes: ctx.nodes, edges: ctx.edges }
}

fn project_domain(ctx: &mut Ctx, project_id: i64, domain: &Domain) {
    let id = ctx.push_node(NodeRecord {
        id: hash_key(&domain.name),
        label: NodeLabel::Domain,
        key: domain.name.clone(),
        name: domain.name.clone(),
        file_path: None,
        visibility: None,
        extra: json!({ "description": domain.description, "patterns": domain.patterns }),
    });
    ctx.edges.push(EdgeRecord::simple(project_id, id, EdgeKind::HasDomain));
    for package in &domain.matched_packages {
        ctx.edges.push(EdgeRecord::simple(id, hash_key(package), EdgeKind::Owns));
    }
}

fn project_dependency(ctx: &mut Ctx, dependency: &DomainDependency) {
    ctx.edges.push(EdgeRecord {
        source_id: hash_key(&dependency.from_domain),
        target_id: hash_key(&dependency.to_domain),
        kind: EdgeKind::DependsOn,
        context: None,
        position: None,
        weight: Some(dependency.weight),
        count: None,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use symgraph_core::domain::DomainsConfig;
    use symgraph_parsers::module_path::ModulePathOptions;

    fn opts() -> ModulePathOptions {
        ModulePathOptions { project_root: std::path::PathBuf::from("/repo"), ..Default::default() }
    }

    fn method(name: &str, calls: Vec<ParsedCall>) -> ParsedFunction {
        ParsedFunction {
            name: name.to_string(),
            visibility: Visibility::Public,
            parameters: vec![ParsedParameter {
                name: "id".to_string(),
                param_type: Some("String".to_string()),
                has_default: false,
                function_type: None,
                is_noinline: false,
                is_crossinline: false,
            }],
            return_type: None,
            receiver_type: None,
            modifiers: FunctionModifiers::default(),
            type_parameters: Vec::new(),
            annotations: Vec::new(),
            calls,
            location: SourceLocation::point("f.kt", 2, 0),
        }
    }

    fn class(name: &str, functions: Vec<ParsedFunction>, superclass: Option<&str>) -> ParsedClass {
        ParsedClass {
            name: name.to_string(),
            kind: ClassKind::Class,
            visibility: Visibility::Public,
            modifiers: ClassModifiers::default(),
            superclass: superclass.map(|s| s.to_string()),
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
            annotations: Vec::new(),
            properties: Vec::new(),
            functions,
            nested_classes: Vec::new(),
            companion: None,
            companion_name: None,
            secondary_constructors: Vec::new(),
            location: SourceLocation::point("f.kt", 1, 0),
        }
    }

    #[test]
    fn class_and_function_nodes_project_with_contains_and_declares() {
        let mut file = ParsedFile::new("/repo/src/pkg/f.kt", Language::Kotlin);
        file.package = Some("pkg".to_string());
        file.classes.push(class("UserService", vec![method("getUser", vec![])], None));

        let resolution = symgraph_resolve::resolve_project(vec![file], &opts(), None);
        let batch = project("/repo", "demo", &resolution, &opts());

        let class_node = batch.nodes.iter().find(|n| n.key == "pkg.UserService").unwrap();
        assert_eq!(class_node.label, NodeLabel::Class);
        let function_node = batch.nodes.iter().find(|n| n.key == "pkg.UserService.getUser").unwrap();
        assert_eq!(function_node.label, NodeLabel::Function);

        assert!(batch.edges.iter().any(|e| e.kind == EdgeKind::Declares
            && e.source_id == class_node.id
            && e.target_id == function_node.id));
        let package_node = batch.nodes.iter().find(|n| n.key == "pkg").unwrap();
        assert!(batch.edges.iter().any(|e| e.kind == EdgeKind::Contains
            && e.source_id == package_node.id
            && e.target_id == class_node.id));
    }

    #[test]
    fn calls_edge_folds_to_a_single_count() {
        let mut file = ParsedFile::new("/repo/src/pkg/f.kt", Language::Kotlin);
        file.package = Some("pkg".to_string());
        let call = ParsedCall {
            callee_name: "getUser".to_string(),
            receiver_expr: None,
            receiver_type: None,
            argument_count: 0,
            argument_type_hints: Vec::new(),
            location: SourceLocation::point("f.kt", 3, 0),
        };
        file.classes.push(class("UserService", vec![
            method("getUser", vec![]),
            method("caller", vec![call.clone(), call]),
        ], None));

        let resolution = symgraph_resolve::resolve_project(vec![file], &opts(), None);
        let batch = project("/repo", "demo", &resolution, &opts());

        let calls_edges: Vec<_> = batch.edges.iter().filter(|e| e.kind == EdgeKind::Calls).collect();
        assert_eq!(calls_edges.len(), 1);
        assert_eq!(calls_edges[0].count, Some(2));
    }

    #[test]
    fn extends_edge_binds_same_package_superclass() {
        let mut file = ParsedFile::new("/repo/src/pkg/f.kt", Language::Kotlin);
        file.package = Some("pkg".to_string());
        file.classes.push(class("Base", vec![], None));
        file.classes.push(class("Child", vec![], Some("Base")));

        let resolution = symgraph_resolve::resolve_project(vec![file], &opts(), None);
        let batch = project("/repo", "demo", &resolution, &opts());

        let base = batch.nodes.iter().find(|n| n.key == "pkg.Base").unwrap();
        let child = batch.nodes.iter().find(|n| n.key == "pkg.Child").unwrap();
        assert!(batch.edges.iter().any(|e| e.kind == EdgeKind::Extends && e.source_id == child.id && e.target_id == base.id));
    }

    #[test]
    fn primitive_parameter_type_produces_no_uses_edge() {
        let mut file = ParsedFile::new("/repo/src/pkg/f.kt", Language::Kotlin);
        file.package = Some("pkg".to_string());
        file.functions.push(method("identify", vec![]));

        let resolution = symgraph_resolve::resolve_project(vec![file], &opts(), None);
        let batch = project("/repo", "demo", &resolution, &opts());
        assert!(!batch.edges.iter().any(|e| e.kind == EdgeKind::Uses));
    }

    #[test]
    fn domain_matches_produce_owns_and_has_domain_edges() {
        let mut file = ParsedFile::new("/repo/src/billing/f.kt", Language::Kotlin);
        file.package = Some("billing".to_string());
        file.classes.push(class("Invoice", vec![], None));

        let config = DomainsConfig {
            domains: vec![symgraph_core::domain::DomainPattern {
                name: "billing-domain".to_string(),
                description: None,
                patterns: vec!["billing".to_string()],
            }],
        };
        let resolution = symgraph_resolve::resolve_project(vec![file], &opts(), Some(&config));
        let batch = project("/repo", "demo", &resolution, &opts());

        let domain_node = batch.nodes.iter().find(|n| n.label == NodeLabel::Domain).unwrap();
        assert!(batch.edges.iter().any(|e| e.kind == EdgeKind::Owns && e.source_id == domain_node.id));
        assert!(batch.edges.iter().any(|e| e.kind == EdgeKind::HasDomain && e.target_id == domain_node.id));
    }

    #[test]
    fn file_without_package_or_module_path_floats() {
        let file = ParsedFile::new("/repo/src/f.ts", Language::TypeScript);
        let resolution = symgraph_resolve::resolve_project(vec![file], &opts(), None);
        let batch = project("/repo", "demo", &resolution, &opts());
        // Only the Project node — nothing to contain, nothing floats into an edge.
        assert_eq!(batch.nodes.len(), 1);
        assert!(batch.edges.is_empty());
    }
}
