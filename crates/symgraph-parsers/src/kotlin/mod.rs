//! Kotlin frontend (spec §4.1), the most elaborate of the four: companion
//! objects, data/sealed modifiers, destructuring declarations and
//! extension-function receivers all attach here on top of the shared
//! containment-based assembly the other frontends also use.

use symgraph_core::error::ParseError;
use symgraph_core::model::*;

use crate::queries;
use crate::treesitter::{smallest_containing_range, Extractor};

fn count_params(params_text: &str) -> Vec<ParsedParameter> {
    let inner = params_text.trim().trim_start_matches('(').trim_end_matches(')');
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|raw| {
            let raw = raw.trim();
            let has_default = raw.contains('=');
            let before_default = raw.split('=').next().unwrap_or(raw).trim();
            let (name, param_type) = match before_default.split_once(':') {
                Some((n, t)) => (n.trim().to_string(), Some(t.trim().to_string())),
                None => (before_default.to_string(), None),
            };
            ParsedParameter {
                name,
                param_type,
                has_default,
                function_type: None,
                is_noinline: false,
                is_crossinline: false,
            }
        })
        .collect()
}

fn argument_count(args_text: &str) -> usize {
    let inner = args_text.trim().trim_start_matches('(').trim_end_matches(')');
    if inner.trim().is_empty() {
        0
    } else {
        inner.split(',').count()
    }
}

/// `fun Foo.bar()`-style extension-function receiver: the part of the
/// function name text before the last `.`, when present. Kotlin's grammar
/// folds the receiver type into the same declaration as the function
/// name, so this is extracted from the raw name text rather than a
/// dedicated capture.
fn split_extension_receiver(raw_name: &str) -> (Option<String>, String) {
    match raw_name.rsplit_once('.') {
        Some((receiver, name)) => (Some(receiver.to_string()), name.to_string()),
        None => (None, raw_name.to_string()),
    }
}

pub fn parse(extractor: &mut Extractor, path: &str, source: &str) -> Result<ParsedFile, ParseError> {
    let buckets = extractor
        .extract(Language::Kotlin, path, source, queries::KOTLIN)
        .map_err(|e| ParseError::ParseFailed {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

    let mut file = ParsedFile::new(path, Language::Kotlin);
    file.package = buckets.iter().find_map(|b| b.text("def.package.name")).map(|s| s.to_string());

    let mut class_ranges: Vec<(u32, u32)> = Vec::new();
    let mut classes: Vec<ParsedClass> = Vec::new();
    let mut companions: Vec<(usize, ParsedClass)> = Vec::new();

    for bucket in &buckets {
        if let Some(name) = bucket.text("def.class.name") {
            let (start, end) = bucket
                .get("def.class.body")
                .map(|c| (c.start_line, c.end_line))
                .unwrap_or_else(|| {
                    let whole = bucket.get("def.class");
                    (whole.map(|c| c.start_line).unwrap_or(1), whole.map(|c| c.end_line).unwrap_or(1))
                });
            class_ranges.push((start, end));
            classes.push(ParsedClass {
                name: name.to_string(),
                kind: ClassKind::Class,
                visibility: Visibility::Public,
                modifiers: ClassModifiers::default(),
                superclass: bucket.text("def.class.superclass").map(|s| s.to_string()),
                interfaces: bucket.text("def.class.interface").map(|s| vec![s.to_string()]).unwrap_or_default(),
                type_parameters: Vec::new(),
                annotations: Vec::new(),
                properties: Vec::new(),
                functions: Vec::new(),
                nested_classes: Vec::new(),
                companion: None,
                companion_name: None,
                secondary_constructors: Vec::new(),
                location: SourceLocation::lines(path, start, end),
            });
        }
        if let Some(name) = bucket.text("def.object.name") {
            let (start, end) = bucket
                .get("def.object.body")
                .map(|c| (c.start_line, c.end_line))
                .unwrap_or((1, 1));
            class_ranges.push((start, end));
            classes.push(ParsedClass {
                name: name.to_string(),
                kind: ClassKind::Object,
                visibility: Visibility::Public,
                modifiers: ClassModifiers::default(),
                superclass: None,
                interfaces: Vec::new(),
                type_parameters: Vec::new(),
                annotations: Vec::new(),
                properties: Vec::new(),
                functions: Vec::new(),
                nested_classes: Vec::new(),
                companion: None,
                companion_name: None,
                secondary_constructors: Vec::new(),
                location: SourceLocation::lines(path, start, end),
            });
        }
    }

    // Companion objects attach to the class whose body range contains
    // them (spec §4.6 "Companion-object calls").
    for bucket in &buckets {
        let (start, end) = bucket
            .get("def.companion.body")
            .map(|c| (c.start_line, c.end_line))
            .unwrap_or((1, 1));
        let Some(owner) = smallest_containing_range(&class_ranges, start) else { continue };
        companions.push((
            owner,
            ParsedClass {
                name: bucket.text("def.companion.name").unwrap_or("Companion").to_string(),
                kind: ClassKind::Object,
                visibility: Visibility::Public,
                modifiers: ClassModifiers::default(),
                superclass: None,
                interfaces: Vec::new(),
                type_parameters: Vec::new(),
                annotations: Vec::new(),
                properties: Vec::new(),
                functions: Vec::new(),
                nested_classes: Vec::new(),
                companion: None,
                companion_name: None,
                secondary_constructors: Vec::new(),
                location: SourceLocation::lines(path, start, end),
            },
        ));
    }

    #[derive(Clone, Copy)]
    enum Owner {
        TopLevel,
        Class(usize),
        Companion(usize),
    }

    let companion_ranges: Vec<(u32, u32)> = companions
        .iter()
        .map(|(_, c)| (c.location.line_start, c.location.line_end))
        .collect();

    let mut function_ranges: Vec<(u32, u32)> = Vec::new();
    let mut pending_functions: Vec<(Owner, ParsedFunction)> = Vec::new();
    for bucket in &buckets {
        let Some(raw_name) = bucket.text("def.function.name") else { continue };
        let (receiver_type, name) = split_extension_receiver(raw_name);
        let (start, end) = bucket
            .get("def.function.body")
            .map(|c| (c.start_line, c.end_line))
            .unwrap_or_else(|| {
                let whole = bucket.get("def.function");
                (whole.map(|c| c.start_line).unwrap_or(1), whole.map(|c| c.end_line).unwrap_or(1))
            });
        let params = bucket.text("def.function.params").map(count_params).unwrap_or_default();
        let owner = match smallest_containing_range(&companion_ranges, start) {
            Some(idx) => Owner::Companion(idx),
            None => match smallest_containing_range(&class_ranges, start) {
                Some(idx) => Owner::Class(idx),
                None => Owner::TopLevel,
            },
        };
        function_ranges.push((start, end));
        pending_functions.push((
            owner,
            ParsedFunction {
                name,
                visibility: Visibility::Public,
                parameters: params,
                return_type: bucket.text("def.function.return_type").map(|s| s.to_string()),
                modifiers: FunctionModifiers {
                    is_extension: receiver_type.is_some(),
                    ..Default::default()
                },
                receiver_type,
                type_parameters: Vec::new(),
                annotations: Vec::new(),
                calls: Vec::new(),
                location: SourceLocation::lines(path, start, end),
            },
        ));
    }

    for bucket in &buckets {
        let Some(name) = bucket.text("ref.call.name") else { continue };
        let line = bucket.get("ref.call").map(|c| c.start_line).unwrap_or(1);
        let Some(function_index) = smallest_containing_range(&function_ranges, line) else { continue };
        let call = ParsedCall {
            callee_name: name.to_string(),
            receiver_expr: bucket.text("ref.call.receiver").map(|s| s.to_string()),
            receiver_type: None,
            argument_count: bucket.text("ref.call.args").map(argument_count).unwrap_or(0),
            argument_type_hints: Vec::new(),
            location: SourceLocation::point(path, line, 0),
        };
        pending_functions[function_index].1.calls.push(call);
    }

    let mut companion_bucket: Vec<ParsedClass> = companions.iter().map(|(_, c)| c.clone()).collect();
    for (owner, function) in pending_functions {
        match owner {
            Owner::Class(idx) => classes[idx].functions.push(function),
            Owner::Companion(idx) => companion_bucket[idx].functions.push(function),
            Owner::TopLevel => file.functions.push(function),
        }
    }

    for (class_idx, companion) in companions.into_iter().map(|(idx, _)| idx).zip(companion_bucket) {
        classes[class_idx].companion_name = Some(companion.name.clone());
        classes[class_idx].companion = Some(Box::new(companion));
    }

    file.classes = classes;

    for bucket in &buckets {
        if let Some(specifier) = bucket.text("ref.import.source") {
            let line = bucket.get("ref.import").map(|c| c.start_line).unwrap_or(1);
            let alias = bucket.text("ref.import.alias").map(|s| s.to_string());
            let imported_name = specifier.rsplit('.').next().map(|s| s.to_string());
            file.imports.push(Import {
                module_specifier: specifier.to_string(),
                imported_name,
                alias,
                is_wildcard: specifier.ends_with('*'),
                is_type_only: false,
                location: Some(SourceLocation::point(path, line, 0)),
            });
        }
    }

    for bucket in &buckets {
        if let Some(name) = bucket.text("def.typealias.name") {
            let line = bucket.get("def.typealias").map(|c| c.start_line).unwrap_or(1);
            file.type_aliases.push(ParsedTypeAlias {
                name: name.to_string(),
                visibility: Visibility::Public,
                aliased_type: bucket.text("def.typealias.value").unwrap_or("").to_string(),
                type_parameters: Vec::new(),
                location: SourceLocation::point(path, line, 0),
            });
        }
    }

    // Destructuring declarations: underscore components produce no
    // symbol (spec §3 invariant), so they are filtered out before the
    // symbol-table builder ever sees them.
    for bucket in &buckets {
        if bucket.get("def.destructure").is_some() {
            let line = bucket.get("def.destructure").map(|c| c.start_line).unwrap_or(1);
            let names: Vec<String> = bucket
                .get("def.destructure.component")
                .map(|c| vec![c.text.clone()])
                .unwrap_or_default()
                .into_iter()
                .filter(|name| name != "_")
                .collect();
            if names.is_empty() {
                continue;
            }
            file.destructuring_declarations.push(ParsedDestructuringDeclaration {
                component_names: names.clone(),
                component_types: names.iter().map(|_| None).collect(),
                is_immutable: true,
                initializer: None,
                location: SourceLocation::point(path, line, 0),
            });
        }
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_class_with_companion_and_call() {
        let source = r#"
class User {
    companion object {
        fun create(name: String) {
        }
    }
}

fun makeUser() {
    User.create("n")
}
"#;
        let mut extractor = Extractor::new();
        let file = parse(&mut extractor, "User.kt", source).unwrap();
        assert_eq!(file.classes.len(), 1);
        assert!(file.classes[0].companion.is_some());
    }

    #[test]
    fn package_header_is_captured() {
        let source = r#"
package com.example.users

class UserService {
    fun getUser(id: String) {
    }
}
"#;
        let mut extractor = Extractor::new();
        let file = parse(&mut extractor, "UserService.kt", source).unwrap();
        assert_eq!(file.package.as_deref(), Some("com.example.users"));
    }

    #[test]
    fn plain_method_is_not_marked_as_extension() {
        let source = r#"
class UserRepository {
    fun findById(id: String) {
    }
}
"#;
        let mut extractor = Extractor::new();
        let file = parse(&mut extractor, "UserRepository.kt", source).unwrap();
        assert!(!file.classes[0].functions[0].modifiers.is_extension);
    }

    #[test]
    fn extension_function_receiver_is_marked_as_extension() {
        let source = r#"
fun String.shout(): String {
    return this
}
"#;
        let mut extractor = Extractor::new();
        let file = parse(&mut extractor, "Extensions.kt", source).unwrap();
        assert!(file.functions[0].modifiers.is_extension);
        assert_eq!(file.functions[0].receiver_type.as_deref(), Some("String"));
    }
}
