//! Shared TypeScript/JavaScript frontend (spec §4.1). JavaScript is run as
//! the untyped subset of the TypeScript grammar's capture set — the same
//! assembly pass handles both, driven off whichever `.scm` file matches
//! the file's language.

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
        .map(|raw| {
            let raw = raw.trim();
            let has_default = raw.contains('=');
            let before_default = raw.split('=').next().unwrap_or(raw).trim();
            let (name, param_type) = match before_default.split_once(':') {
                Some((n, t)) => (n.trim().trim_end_matches('?').to_string(), Some(t.trim().to_string())),
                None => (before_default.trim_end_matches('?').to_string(), None),
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

pub fn parse(extractor: &mut Extractor, path: &str, source: &str, language: Language) -> Result<ParsedFile, ParseError> {
    let query = queries::query_for_language(language);
    let buckets = extractor
        .extract(language, path, source, query)
        .map_err(|e| ParseError::ParseFailed {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

    let mut file = ParsedFile::new(path, language);

    // Pass 1: class/interface bodies, to use as containers.
    let mut class_ranges: Vec<(u32, u32)> = Vec::new();
    let mut classes: Vec<ParsedClass> = Vec::new();
    for bucket in &buckets {
        if let Some(name) = bucket.text("def.class.name") {
            let body = bucket.get("def.class.body");
            let (start, end) = body
                .map(|c| (c.start_line, c.end_line))
                .unwrap_or_else(|| (bucket.get("def.class").map(|c| c.start_line).unwrap_or(1), bucket.get("def.class").map(|c| c.end_line).unwrap_or(1)));
            class_ranges.push((start, end));
            classes.push(ParsedClass {
                name: name.to_string(),
                kind: ClassKind::Class,
                visibility: Visibility::Public,
                modifiers: ClassModifiers::default(),
                superclass: bucket.text("def.class.superclass").map(|s| s.to_string()),
                interfaces: bucket
                    .text("def.class.interface")
                    .map(|s| vec![s.to_string()])
                    .unwrap_or_default(),
                type_parameters: Vec::new(),
                annotations: Vec::new(),
                properties: Vec::new(),
                functions: Vec::new(),
                nested_classes: Vec::new(),
                companion: None,
                companion_name: None,
                secondary_constructors: Vec::new(),
                location: bucket
                    .get("def.class")
                    .map(|c| SourceLocation {
                        file_path: path.to_string(),
                        line_start: c.start_line,
                        col_start: c.start_col,
                        line_end: c.end_line,
                        col_end: c.end_col,
                    })
                    .unwrap_or_else(|| SourceLocation::point(path, start, 0)),
            });
        }
        if let Some(name) = bucket.text("def.interface.name") {
            let body = bucket.get("def.interface.body");
            let (start, end) = body
                .map(|c| (c.start_line, c.end_line))
                .unwrap_or((1, 1));
            class_ranges.push((start, end));
            classes.push(ParsedClass {
                name: name.to_string(),
                kind: ClassKind::Interface,
                visibility: Visibility::Public,
                modifiers: ClassModifiers::default(),
                superclass: None,
                interfaces: bucket
                    .text("def.interface.extends")
                    .map(|s| vec![s.to_string()])
                    .unwrap_or_default(),
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

    // Pass 2: functions, bucketed into the class they fall inside (by body
    // containment), or kept top-level.
    let mut function_ranges: Vec<(u32, u32)> = Vec::new();
    let mut pending_functions: Vec<(Option<usize>, ParsedFunction)> = Vec::new();
    for bucket in &buckets {
        let Some(name) = bucket.text("def.function.name") else { continue };
        let body = bucket.get("def.function.body");
        let (start, end) = body
            .map(|c| (c.start_line, c.end_line))
            .unwrap_or_else(|| {
                let whole = bucket.get("def.function");
                (
                    whole.map(|c| c.start_line).unwrap_or(1),
                    whole.map(|c| c.end_line).unwrap_or(1),
                )
            });
        let params = bucket
            .text("def.function.params")
            .map(count_params)
            .unwrap_or_default();
        let owner = smallest_containing_range(&class_ranges, start);
        function_ranges.push((start, end));
        pending_functions.push((
            owner,
            ParsedFunction {
                name: name.to_string(),
                visibility: Visibility::Public,
                parameters: params,
                return_type: None,
                receiver_type: None,
                modifiers: FunctionModifiers::default(),
                type_parameters: Vec::new(),
                annotations: Vec::new(),
                calls: Vec::new(),
                location: SourceLocation::lines(path, start, end),
            },
        ));
    }

    // Pass 3: call sites, assigned to the smallest enclosing function body.
    for bucket in &buckets {
        let Some(name) = bucket.text("ref.call.name") else { continue };
        let line = bucket
            .get("ref.call")
            .map(|c| c.start_line)
            .unwrap_or(1);
        let Some(function_index) = smallest_containing_range(&function_ranges, line) else {
            continue;
        };
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

    for (owner, function) in pending_functions {
        match owner {
            Some(idx) => classes[idx].functions.push(function),
            None => file.functions.push(function),
        }
    }
    file.classes = classes;

    // Pass 4: type aliases (TypeScript only; absent capture on JS query).
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

    // Pass 5: imports.
    for bucket in &buckets {
        if let Some(source_literal) = bucket.text("ref.import.source") {
            let specifier = source_literal.trim_matches(|c| c == '"' || c == '\'').to_string();
            let is_relative = specifier.starts_with('.');
            let line = bucket.get("ref.import").map(|c| c.start_line).unwrap_or(1);
            if let Some(name) = bucket.text("ref.import.name") {
                file.imports.push(Import {
                    module_specifier: specifier.clone(),
                    imported_name: Some(name.to_string()),
                    alias: bucket.text("ref.import.alias").map(|s| s.to_string()),
                    is_wildcard: false,
                    is_type_only: false,
                    location: Some(SourceLocation::point(path, line, 0)),
                });
            } else if let Some(default_name) = bucket.text("ref.import.default_name") {
                file.imports.push(Import {
                    module_specifier: specifier.clone(),
                    imported_name: Some(default_name.to_string()),
                    alias: None,
                    is_wildcard: false,
                    is_type_only: false,
                    location: Some(SourceLocation::point(path, line, 0)),
                });
            } else if let Some(namespace) = bucket.text("ref.import.namespace") {
                file.imports.push(Import {
                    module_specifier: specifier,
                    imported_name: None,
                    alias: Some(namespace.to_string()),
                    is_wildcard: true,
                    is_type_only: false,
                    location: Some(SourceLocation::point(path, line, 0)),
                });
            } else {
                file.imports.push(Import {
                    module_specifier: specifier,
                    imported_name: None,
                    alias: None,
                    is_wildcard: false,
                    is_type_only: false,
                    location: Some(SourceLocation::point(path, line, 0)),
                });
            }
        }
    }

    // Pass 6: re-exports (TypeScript query only).
    for bucket in &buckets {
        if let Some(name) = bucket.text("ref.reexport.name") {
            let line = bucket.get("ref.reexport").map(|c| c.start_line).unwrap_or(1);
            file.reexports.push(Reexport {
                source_specifier: bucket.text("ref.reexport.source").unwrap_or("").to_string(),
                original_name: Some(name.to_string()),
                exported_name: bucket.text("ref.reexport.alias").map(|s| s.to_string()).or(Some(name.to_string())),
                is_namespace: false,
                is_wildcard: false,
                is_type_only: false,
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
    fn parses_class_with_method_and_call() {
        let source = r#"
class UserService {
  getUser(id) {
    this.repository.findById(id);
  }
}
"#;
        let mut extractor = Extractor::new();
        let file = parse(&mut extractor, "UserService.js", source, Language::JavaScript).unwrap();
        assert_eq!(file.classes.len(), 1);
        assert_eq!(file.classes[0].name, "UserService");
        assert_eq!(file.classes[0].functions.len(), 1);
        assert_eq!(file.classes[0].functions[0].name, "getUser");
    }
}
