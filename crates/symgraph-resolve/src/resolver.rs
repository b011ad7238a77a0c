//! Symbol Resolver (spec §4.6): the ten-step priority ladder, type-alias
//! expansion, overload discrimination, constructor-call and
//! companion-object handling.

use std::collections::HashMap;
use symgraph_core::model::*;
use symgraph_core::resolved::{ResolutionContext, ResolvedCall};
use symgraph_core::symbol::{SymbolKind, SymbolTable};
use symgraph_parsers::stdlib::CompositeProvider;

/// Strip generics (`<…>`), a trailing `?`, and surrounding whitespace —
/// the resolver's shared type-string normalization (spec §4.6, "Normalization
/// helpers").
pub fn normalize_type(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_generics = match trimmed.find('<') {
        Some(idx) => &trimmed[..idx],
        None => trimmed,
    };
    without_generics.trim().trim_end_matches('?').trim().to_string()
}

#[derive(Debug, Clone)]
struct OverloadCandidate {
    param_count: usize,
    param_types: Vec<Option<String>>,
}

/// Auxiliary indices the resolver needs that the `SymbolTable` alone
/// doesn't carry: type-alias targets, extension-function receiver types,
/// and overload candidate lists keyed by the (shared) FQN overloaded
/// functions resolve to.
#[derive(Debug, Default)]
pub struct ResolverIndex {
    type_alias_targets: HashMap<String, String>,
    extension_functions: HashMap<String, Vec<(Option<String>, String)>>,
    overloads: HashMap<String, Vec<OverloadCandidate>>,
}

fn walk_class_for_index(
    class: &ParsedClass,
    package: Option<&str>,
    parent_fqn: Option<&str>,
    index: &mut ResolverIndex,
) {
    let fqn = match parent_fqn {
        Some(p) if !p.is_empty() => format!("{p}.{}", class.name),
        _ => class.name.clone(),
    };
    for function in &class.functions {
        record_function(function, Some(&fqn), index);
    }
    for nested in &class.nested_classes {
        walk_class_for_index(nested, package, Some(&fqn), index);
    }
    if let Some(companion) = &class.companion {
        let companion_name = class.companion_name.as_deref().unwrap_or("Companion");
        let companion_fqn = format!("{fqn}.{companion_name}");
        for function in &companion.functions {
            record_function(function, Some(&companion_fqn), index);
        }
    }
}

fn record_function(function: &ParsedFunction, parent_fqn: Option<&str>, index: &mut ResolverIndex) {
    let fqn = match parent_fqn {
        Some(p) if !p.is_empty() => format!("{p}.{}", function.name),
        _ => function.name.clone(),
    };
    index.overloads.entry(fqn.clone()).or_default().push(OverloadCandidate {
        param_count: function.parameters.len(),
        param_types: function
            .parameters
            .iter()
            .map(|p| p.param_type.as_deref().map(normalize_type))
            .collect(),
    });
    if function.modifiers.is_extension {
        index
            .extension_functions
            .entry(function.name.clone())
            .or_default()
            .push((function.receiver_type.as_deref().map(normalize_type), fqn));
    }
}

impl ResolverIndex {
    pub fn build(files: &[ParsedFile]) -> Self {
        let mut index = Self::default();
        for file in files {
            let package = file.package.as_deref();
            for class in &file.classes {
                walk_class_for_index(class, package, package, &mut index);
            }
            for function in &file.functions {
                record_function(function, package, &mut index);
            }
            for alias in &file.type_aliases {
                let fqn = match package {
                    Some(p) if !p.is_empty() => format!("{p}.{}", alias.name),
                    _ => alias.name.clone(),
                };
                index
                    .type_alias_targets
                    .insert(fqn, normalize_type(&alias.aliased_type));
            }
        }
        index
    }

    /// True when the shared FQN multiple overloads resolve to still has an
    /// unresolved tie after argument-count/type discrimination (spec §7:
    /// "Ambiguous resolution... not an error", recorded for diagnostics).
    pub fn is_ambiguous(&self, fqn: &str, call: &ParsedCall) -> bool {
        let Some(candidates) = self.overloads.get(fqn) else { return false };
        if candidates.len() <= 1 {
            return false;
        }
        let by_count: Vec<&OverloadCandidate> = candidates
            .iter()
            .filter(|c| c.param_count == call.argument_count)
            .collect();
        let pool: Vec<&OverloadCandidate> = if by_count.is_empty() {
            candidates.iter().collect()
        } else {
            by_count
        };
        if pool.len() <= 1 {
            return false;
        }
        let exact: Vec<&&OverloadCandidate> = pool
            .iter()
            .filter(|c| types_match_exactly(&c.param_types, &call.argument_type_hints))
            .collect();
        exact.len() > 1
    }
}

fn types_match_exactly(declared: &[Option<String>], hints: &[Option<String>]) -> bool {
    if declared.len() != hints.len() {
        return false;
    }
    declared.iter().zip(hints.iter()).all(|(d, h)| match (d, h) {
        (Some(d), Some(h)) => d == h,
        _ => false,
    })
}

/// `resolve_type_name`: a possibly-unqualified type string to its FQN,
/// preferring same-package, then a unique simple-name match, falling back
/// to treating the string as already qualified.
fn resolve_type_name(table: &SymbolTable, package: Option<&str>, type_name: &str) -> String {
    let type_name = normalize_type(type_name);
    if let Some(package) = package {
        let candidate = format!("{package}.{type_name}");
        if table.get_by_fqn(&candidate).is_some() {
            return candidate;
        }
    }
    let matches = table.by_name(&type_name);
    let type_matches: Vec<_> = matches.iter().filter(|s| s.is_type()).collect();
    if type_matches.len() == 1 {
        return type_matches[0].fqn.clone();
    }
    type_name
}

/// `T.method`, walking `T`'s hierarchy on a miss, with one level of
/// type-alias expansion (spec §4.6 "Type-alias expansion").
fn lookup_method_on_type(
    table: &SymbolTable,
    index: &ResolverIndex,
    package: Option<&str>,
    type_name: &str,
    method: &str,
) -> Option<String> {
    let resolved_type = resolve_type_name(table, package, type_name);
    let direct = format!("{resolved_type}.{method}");
    if table.get_by_fqn(&direct).is_some() {
        return Some(direct);
    }
    for parent in table.walk_hierarchy(&resolved_type) {
        let candidate = format!("{parent}.{method}");
        if table.get_by_fqn(&candidate).is_some() {
            return Some(candidate);
        }
    }
    if let Some(symbol) = table.get_by_fqn(&resolved_type) {
        if symbol.kind == SymbolKind::TypeAlias {
            if let Some(underlying) = index.type_alias_targets.get(&resolved_type) {
                return lookup_method_on_type(table, index, package, underlying, method);
            }
        }
    }
    None
}

/// `Type.method()`, trying the companion before giving up (spec §4.6
/// "Companion-object calls").
fn lookup_static_or_companion(table: &SymbolTable, receiver_fqn: &str, method: &str) -> Option<String> {
    let direct = format!("{receiver_fqn}.{method}");
    if table.get_by_fqn(&direct).is_some() {
        return Some(direct);
    }
    table
        .all_symbols()
        .find(|s| s.parent_fqn.as_deref() == Some(receiver_fqn) && s.kind == SymbolKind::Object)
        .map(|companion| format!("{}.{method}", companion.fqn))
        .filter(|candidate| table.get_by_fqn(candidate).is_some())
}

/// Rewrite a bare-name resolution to its constructor FQN when the callee
/// name is capitalized and the resolved symbol is a type, not a function
/// (spec §4.6 "Constructor calls").
fn maybe_constructor_call(table: &SymbolTable, callee_name: &str, resolved_fqn: &str) -> String {
    let looks_like_constructor = callee_name.chars().next().is_some_and(|c| c.is_uppercase());
    if !looks_like_constructor {
        return resolved_fqn.to_string();
    }
    match table.get_by_fqn(resolved_fqn) {
        Some(symbol) if symbol.is_type() => format!("{resolved_fqn}.<init>"),
        _ => resolved_fqn.to_string(),
    }
}

/// Apply the ten-step ladder to one call site. Returns `None` when every
/// step misses (spec §4.6: "unresolvable calls are dropped silently").
pub fn resolve_call(
    call: &ParsedCall,
    context: &ResolutionContext,
    table: &SymbolTable,
    index: &ResolverIndex,
    stdlib: &CompositeProvider,
) -> Option<String> {
    let package = context.package.as_deref();

    // Step 1: explicit receiver type.
    if let Some(receiver_type) = &call.receiver_type {
        if let Some(found) = lookup_method_on_type(table, index, package, receiver_type, &call.callee_name) {
            return Some(found);
        }
    }

    // Step 2: typed local receiver (parameter or enclosing-class property).
    if let Some(receiver_expr) = &call.receiver_expr {
        let local_name = receiver_expr.trim_start_matches("this.");
        if let Some(declared_type) = context.local_variables.get(local_name) {
            if let Some(found) = lookup_method_on_type(table, index, package, declared_type, &call.callee_name) {
                return Some(found);
            }
        }
    }

    // Step 3: receiver as a qualified/resolvable name (class or object).
    if let Some(receiver_expr) = &call.receiver_expr {
        let receiver_fqn = context
            .imports
            .get(receiver_expr.as_str())
            .cloned()
            .or_else(|| package.map(|p| format!("{p}.{receiver_expr}")));
        if let Some(receiver_fqn) = receiver_fqn {
            if let Some(symbol) = table.get_by_fqn(&receiver_fqn) {
                if symbol.is_type() {
                    if let Some(found) = lookup_static_or_companion(table, &receiver_fqn, &call.callee_name) {
                        return Some(found);
                    }
                }
            }
        }
    }

    // No-receiver ladder steps (4, 5, 6, 7, 8 stdlib-function form, 10)
    // all resolve a bare name; constructor rewriting applies uniformly to
    // whichever one succeeds.
    if call.receiver_expr.is_none() {
        // Step 4: same class.
        if let Some(class_fqn) = &context.current_class_fqn {
            let direct = format!("{class_fqn}.{}", call.callee_name);
            if table.get_by_fqn(&direct).is_some() {
                return Some(maybe_constructor_call(table, &call.callee_name, &direct));
            }
            for parent in table.walk_hierarchy(class_fqn) {
                let candidate = format!("{parent}.{}", call.callee_name);
                if table.get_by_fqn(&candidate).is_some() {
                    return Some(maybe_constructor_call(table, &call.callee_name, &candidate));
                }
            }
        }

        // Step 5: imports.
        if let Some(fqn) = context.imports.get(&call.callee_name) {
            return Some(maybe_constructor_call(table, &call.callee_name, fqn));
        }

        // Step 6: same package.
        if let Some(package) = package {
            let candidate = format!("{package}.{}", call.callee_name);
            if table.get_by_fqn(&candidate).is_some() {
                return Some(maybe_constructor_call(table, &call.callee_name, &candidate));
            }
        }

        // Step 7: wildcard imports and language-default imports.
        let mut wildcards = context.wildcard_prefixes.clone();
        wildcards.extend(stdlib.default_wildcard_imports().into_iter().map(|s| s.to_string()));
        for prefix in &wildcards {
            let candidate = format!("{prefix}.{}", call.callee_name);
            if table.get_by_fqn(&candidate).is_some() {
                return Some(maybe_constructor_call(table, &call.callee_name, &candidate));
            }
        }

        // Step 8: stdlib function lookup (no receiver form).
        if let Some(symbol) = stdlib.lookup_function(&call.callee_name) {
            return Some(symbol.fqn);
        }

        // Step 10: unique top-level function.
        let candidates = table.functions_by_name(&call.callee_name);
        if candidates.len() == 1 {
            return Some(candidates[0].fqn.clone());
        }
    } else {
        // Step 8 (receiver form): stdlib static/instance method lookup.
        let receiver_type = call
            .receiver_type
            .clone()
            .or_else(|| call.receiver_expr.as_deref().and_then(|r| context.local_variables.get(r).cloned()));
        if let Some(receiver_type) = receiver_type {
            if let Some(symbol) = stdlib.lookup_static_method(&format!("{}.{}", normalize_type(&receiver_type), call.callee_name)) {
                return Some(symbol.fqn);
            }
        }

        // Step 9: extension functions.
        if let Some(candidates) = index.extension_functions.get(&call.callee_name) {
            if !candidates.is_empty() {
                let inferred = call.receiver_type.as_deref().map(normalize_type);
                if let Some(inferred) = &inferred {
                    if let Some((_, fqn)) = candidates.iter().find(|(rt, _)| rt.as_deref() == Some(inferred.as_str())) {
                        return Some(fqn.clone());
                    }
                    let loose = inferred.trim_end_matches('?');
                    if let Some((_, fqn)) = candidates
                        .iter()
                        .find(|(rt, _)| rt.as_deref().map(|r| r.trim_end_matches('?')) == Some(loose))
                    {
                        return Some(fqn.clone());
                    }
                } else {
                    return Some(candidates[0].1.clone());
                }
            }
        }
    }

    None
}

/// Resolve every call site in every function of one file, in source order
/// (spec §4.6's outer loop; §5 notes this stage is pure per file once the
/// table is frozen).
pub fn resolve_file(
    file: &ParsedFile,
    table: &SymbolTable,
    stdlib: &CompositeProvider,
    index: &ResolverIndex,
    import_map: &crate::import_map::ImportMap,
) -> Vec<ResolvedCall> {
    let mut resolved = Vec::new();
    let package = file.package.clone();

    let mut resolve_function = |function: &ParsedFunction,
                                 class_fqn: Option<&str>,
                                 class_properties: &[ParsedProperty],
                                 resolved: &mut Vec<ResolvedCall>| {
        let caller_fqn = match class_fqn {
            Some(class_fqn) => format!("{class_fqn}.{}", function.name),
            None => match &package {
                Some(p) => format!("{p}.{}", function.name),
                None => function.name.clone(),
            },
        };

        let mut local_variables: HashMap<String, String> = HashMap::new();
        for property in class_properties {
            if let Some(ty) = &property.declared_type {
                local_variables.insert(property.name.clone(), ty.clone());
            }
        }
        for param in &function.parameters {
            if let Some(ty) = &param.param_type {
                local_variables.insert(param.name.clone(), ty.clone());
            }
        }

        let context = ResolutionContext {
            file_path: file.file_path.clone(),
            language: file.language,
            imports: import_map.simple_name_to_fqn.clone(),
            wildcard_prefixes: import_map.wildcard_prefixes.clone(),
            current_class_fqn: class_fqn.map(|s| s.to_string()),
            current_function_fqn: Some(caller_fqn.clone()),
            local_variables,
            package: package.clone(),
        };

        for call in &function.calls {
            if let Some(callee_fqn) = resolve_call(call, &context, table, index, stdlib) {
                resolved.push(ResolvedCall {
                    caller_fqn: caller_fqn.clone(),
                    callee_fqn,
                    location: call.location.clone(),
                });
            }
        }
    };

    for function in &file.functions {
        resolve_function(function, None, &[], &mut resolved);
    }
    for class in &file.classes {
        let class_fqn = match &package {
            Some(p) => format!("{p}.{}", class.name),
            None => class.name.clone(),
        };
        for function in &class.functions {
            resolve_function(function, Some(&class_fqn), &class.properties, &mut resolved);
        }
        if let Some(companion) = &class.companion {
            let companion_name = class.companion_name.as_deref().unwrap_or("Companion");
            let companion_fqn = format!("{class_fqn}.{companion_name}");
            for function in &companion.functions {
                resolve_function(function, Some(&companion_fqn), &companion.properties, &mut resolved);
            }
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import_map::ImportMap;
    use crate::symbol_table;
    use symgraph_parsers::stdlib::CompositeProvider;

    fn parameter(name: &str, ty: &str) -> ParsedParameter {
        ParsedParameter {
            name: name.to_string(),
            param_type: Some(ty.to_string()),
            has_default: false,
            function_type: None,
            is_noinline: false,
            is_crossinline: false,
        }
    }

    fn method(name: &str, params: Vec<ParsedParameter>, calls: Vec<ParsedCall>) -> ParsedFunction {
        ParsedFunction {
            name: name.to_string(),
            visibility: Visibility::Public,
            parameters: params,
            return_type: None,
            receiver_type: None,
            modifiers: FunctionModifiers::default(),
            type_parameters: Vec::new(),
            annotations: Vec::new(),
            calls,
            location: SourceLocation::point("f.kt", 1, 0),
        }
    }

    fn class(name: &str, functions: Vec<ParsedFunction>, properties: Vec<ParsedProperty>) -> ParsedClass {
        ParsedClass {
            name: name.to_string(),
            kind: ClassKind::Class,
            visibility: Visibility::Public,
            modifiers: ClassModifiers::default(),
            superclass: None,
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
            annotations: Vec::new(),
            properties,
            functions,
            nested_classes: Vec::new(),
            companion: None,
            companion_name: None,
            secondary_constructors: Vec::new(),
            location: SourceLocation::point("f.kt", 1, 0),
        }
    }

    fn property(name: &str, ty: &str) -> ParsedProperty {
        ParsedProperty {
            name: name.to_string(),
            visibility: Visibility::Public,
            declared_type: Some(ty.to_string()),
            is_immutable: true,
            initializer: None,
            annotations: Vec::new(),
            location: SourceLocation::point("f.kt", 1, 0),
        }
    }

    fn call(callee: &str, receiver: Option<&str>) -> ParsedCall {
        ParsedCall {
            callee_name: callee.to_string(),
            receiver_expr: receiver.map(|s| s.to_string()),
            receiver_type: None,
            argument_count: 1,
            argument_type_hints: Vec::new(),
            location: SourceLocation::point("f.kt", 3, 0),
        }
    }

    /// Scenario 1: receiver-typed method call (spec §8 scenario 1).
    #[test]
    fn receiver_typed_method_call_resolves() {
        let mut file = ParsedFile::new("f.kt", Language::Kotlin);
        file.package = Some("pkg".to_string());
        file.classes.push(class(
            "UserRepository",
            vec![method("findById", vec![parameter("id", "String")], vec![])],
            vec![],
        ));
        file.classes.push(class(
            "UserService",
            vec![method(
                "getUser",
                vec![parameter("id", "String")],
                vec![call("findById", Some("repository"))],
            )],
            vec![property("repository", "UserRepository")],
        ));

        let table = symbol_table::build(std::slice::from_ref(&file));
        let index = ResolverIndex::build(std::slice::from_ref(&file));
        let stdlib = CompositeProvider::for_language(Language::Kotlin);
        let import_map = ImportMap::default();

        let resolved = resolve_file(&file, &table, &stdlib, &index, &import_map);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].caller_fqn, "pkg.UserService.getUser");
        assert_eq!(resolved[0].callee_fqn, "pkg.UserRepository.findById");
    }

    /// Scenario 3: hierarchy inheritance (spec §8 scenario 3).
    #[test]
    fn hierarchy_walk_finds_inherited_method() {
        let mut file = ParsedFile::new("f.kt", Language::Kotlin);
        file.package = Some("pkg".to_string());
        let mut base = class("BaseService", vec![method("log", vec![parameter("m", "String")], vec![])], vec![]);
        base.modifiers.is_abstract = true;
        file.classes.push(base);
        let mut child = class(
            "UserService",
            vec![method("process", vec![], vec![call("log", None)])],
            vec![],
        );
        child.superclass = Some("BaseService".to_string());
        file.classes.push(child);

        let table = symbol_table::build(std::slice::from_ref(&file));
        let index = ResolverIndex::build(std::slice::from_ref(&file));
        let stdlib = CompositeProvider::for_language(Language::Kotlin);
        let import_map = ImportMap::default();

        let resolved = resolve_file(&file, &table, &stdlib, &index, &import_map);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].callee_fqn, "pkg.BaseService.log");
    }

    /// Scenario 5: constructor vs. function disambiguation (spec §8 scenario 5).
    #[test]
    fn constructor_and_function_disambiguate_by_case() {
        let mut file = ParsedFile::new("f.kt", Language::Kotlin);
        file.package = Some("pkg".to_string());
        file.classes.push(class("User", vec![], vec![]));
        file.functions.push(method("user", vec![], vec![]));
        file.functions.push(method(
            "caller",
            vec![],
            vec![call("User", None), call("user", None)],
        ));

        let table = symbol_table::build(std::slice::from_ref(&file));
        let index = ResolverIndex::build(std::slice::from_ref(&file));
        let stdlib = CompositeProvider::for_language(Language::Kotlin);
        let import_map = ImportMap::default();

        let resolved = resolve_file(&file, &table, &stdlib, &index, &import_map);
        assert_eq!(resolved.len(), 2);
        assert!(resolved.iter().any(|c| c.callee_fqn == "pkg.User.<init>"));
        assert!(resolved.iter().any(|c| c.callee_fqn == "pkg.user"));
    }
}
