//! Java frontend (spec §4.1). Shares the containment-based assembly
//! approach with the ecmascript frontend but additionally captures
//! enum/annotation declarations and `new Foo(...)` constructor calls.

use symgraph_core::error::ParseError;
use symgraph_core::model::*;

use crate::queries;
use crate::treesitter::{smallest_containing_range, Extractor};

fn count_params(params_text: &str) -> Vec<ParsedParameter> {
    let inner = params_text
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')');
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner
        .split(',')
        .map(|raw| {
            let raw = raw.trim();
            let mut parts = raw.rsplitn(2, char::is_whitespace);
            let name = parts.next().unwrap_or(raw).trim().to_string();
            let param_type = parts.next().map(|t| t.trim().to_string());
            ParsedParameter {
                name,
                param_type,
                has_default: false,
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

pub fn parse(extractor: &mut Extractor, path: &str, source: &str) -> Result<ParsedFile, ParseError> {
    let buckets = extractor
        .extract(Language::Java, path, source, queries::JAVA)
        .map_err(|e| ParseError::ParseFailed {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

    let mut file = ParsedFile::new(path, Language::Java);
    file.package = buckets.iter().find_map(|b| b.text("def.package.name")).map(|s| s.to_string());

    let mut class_ranges: Vec<(u32, u32)> = Vec::new();
    let mut classes: Vec<ParsedClass> = Vec::new();

    for bucket in &buckets {
        let (name, kind, body_capture, extra_interfaces_capture, super_capture) =
            if let Some(name) = bucket.text("def.class.name") {
                (name, ClassKind::Class, "def.class.body", "def.class.interface", Some("def.class.superclass"))
            } else if let Some(name) = bucket.text("def.interface.name") {
                (name, ClassKind::Interface, "def.interface.body", "def.interface.extends", None)
            } else if let Some(name) = bucket.text("def.enum.name") {
                (name, ClassKind::Enum, "def.enum.body", "", None)
            } else if let Some(name) = bucket.text("def.annotation.name") {
                (name, ClassKind::Annotation, "", "", None)
            } else {
                continue;
            };

        let (start, end) = bucket
            .get(body_capture)
            .map(|c| (c.start_line, c.end_line))
            .unwrap_or((1, 1));
        class_ranges.push((start, end));
        classes.push(ParsedClass {
            name: name.to_string(),
            kind,
            visibility: Visibility::Public,
            modifiers: ClassModifiers::default(),
            superclass: super_capture.and_then(|c| bucket.text(c)).map(|s| s.to_string()),
            interfaces: bucket
                .text(extra_interfaces_capture)
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

    let mut function_ranges: Vec<(u32, u32)> = Vec::new();
    let mut pending_functions: Vec<(Option<usize>, ParsedFunction)> = Vec::new();
    for bucket in &buckets {
        let Some(name) = bucket.text("def.function.name") else { continue };
        let (start, end) = bucket
            .get("def.function.body")
            .map(|c| (c.start_line, c.end_line))
            .unwrap_or_else(|| {
                let whole = bucket.get("def.function");
                (whole.map(|c| c.start_line).unwrap_or(1), whole.map(|c| c.end_line).unwrap_or(1))
            });
        let params = bucket.text("def.function.params").map(count_params).unwrap_or_default();
        let owner = smallest_containing_range(&class_ranges, start);
        function_ranges.push((start, end));
        pending_functions.push((
            owner,
            ParsedFunction {
                name: name.to_string(),
                visibility: Visibility::Public,
                parameters: params,
                return_type: bucket.text("def.function.return_type").map(|s| s.to_string()),
                receiver_type: None,
                modifiers: FunctionModifiers::default(),
                type_parameters: Vec::new(),
                annotations: Vec::new(),
                calls: Vec::new(),
                location: SourceLocation::lines(path, start, end),
            },
        ));
    }

    // `object_creation_expression` (`new Foo(...)`) shares the same
    // `ref.call.name`/`ref.call.args` captures as a plain method call in
    // java.scm, so constructor calls need no special handling here — the
    // resolver's constructor-vs-function step (spec §4.6) tells them apart
    // by the callee's upper-case first letter.
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

    for (owner, function) in pending_functions {
        match owner {
            Some(idx) => classes[idx].functions.push(function),
            None => file.functions.push(function),
        }
    }
    file.classes = classes;

    for bucket in &buckets {
        if let Some(specifier) = bucket.text("ref.import.source") {
            let line = bucket.get("ref.import").map(|c| c.start_line).unwrap_or(1);
            file.imports.push(Import {
                module_specifier: specifier.to_string(),
                imported_name: specifier.rsplit('.').next().map(|s| s.to_string()),
                alias: None,
                is_wildcard: specifier.ends_with('*'),
                is_type_only: false,
                location: Some(SourceLocation::point(path, line, 0)),
            });
        }
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_class_method_and_call() {
        let source = r#"
class UserService {
    UserRepository repository;
    void getUser(String id) {
        repository.findById(id);
    }
}
"#;
        let mut extractor = Extractor::new();
        let file = parse(&mut extractor, "UserService.java", source).unwrap();
        assert_eq!(file.classes.len(), 1);
        assert_eq!(file.classes[0].functions.len(), 1);
        assert_eq!(file.classes[0].functions[0].calls.len(), 1);
        assert_eq!(file.classes[0].functions[0].calls[0].callee_name, "findById");
    }

    #[test]
    fn package_declaration_is_captured() {
        let source = r#"
package com.example.users;

class UserService {
}
"#;
        let mut extractor = Extractor::new();
        let file = parse(&mut extractor, "UserService.java", source).unwrap();
        assert_eq!(file.package.as_deref(), Some("com.example.users"));
    }

    #[test]
    fn single_segment_package_declaration_is_captured() {
        let source = r#"
package users;

class UserService {
}
"#;
        let mut extractor = Extractor::new();
        let file = parse(&mut extractor, "UserService.java", source).unwrap();
        assert_eq!(file.package.as_deref(), Some("users"));
    }
}
