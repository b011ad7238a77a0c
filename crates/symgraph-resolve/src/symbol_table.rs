//! Symbol Table Builder (spec §4.4): indexes every declaration across all
//! `ParsedFile`s into the four maps plus the type-hierarchy map.

use std::collections::HashMap;
use symgraph_core::model::*;
use symgraph_core::symbol::{Symbol, SymbolKind, SymbolTable};

fn compose_fqn(parent: Option<&str>, simple_name: &str) -> String {
    match parent {
        Some(parent) if !parent.is_empty() => format!("{parent}.{simple_name}"),
        _ => simple_name.to_string(),
    }
}

fn class_symbol_kind(kind: ClassKind) -> SymbolKind {
    match kind {
        ClassKind::Class => SymbolKind::Class,
        ClassKind::Interface => SymbolKind::Interface,
        ClassKind::Object => SymbolKind::Object,
        ClassKind::Enum => SymbolKind::Enum,
        ClassKind::Annotation => SymbolKind::Annotation,
    }
}

fn insert_class(
    table: &mut SymbolTable,
    class: &ParsedClass,
    file: &ParsedFile,
    parent_fqn: Option<&str>,
    declaring_type_fqn: Option<&str>,
) {
    let fqn = compose_fqn(parent_fqn, &class.name);
    table.insert(Symbol {
        simple_name: class.name.clone(),
        fqn: fqn.clone(),
        kind: class_symbol_kind(class.kind),
        file_path: file.file_path.clone(),
        location: class.location.clone(),
        visibility: class.visibility,
        parent_fqn: parent_fqn.map(|s| s.to_string()),
        declaring_type_fqn: declaring_type_fqn.map(|s| s.to_string()),
        package: file.package.clone(),
    });

    for property in &class.properties {
        insert_property(table, property, file, Some(&fqn), Some(&fqn));
    }
    for function in &class.functions {
        insert_function(table, function, file, Some(&fqn), Some(&fqn));
    }
    for nested in &class.nested_classes {
        insert_class(table, nested, file, Some(&fqn), None);
    }
    if let Some(companion) = &class.companion {
        let companion_name = class.companion_name.as_deref().unwrap_or("Companion");
        let companion_fqn = format!("{fqn}.{companion_name}");
        table.insert(Symbol {
            simple_name: companion_name.to_string(),
            fqn: companion_fqn.clone(),
            kind: SymbolKind::Object,
            file_path: file.file_path.clone(),
            location: companion.location.clone(),
            visibility: Visibility::Public,
            parent_fqn: Some(fqn.clone()),
            declaring_type_fqn: Some(fqn.clone()),
            package: file.package.clone(),
        });
        for function in &companion.functions {
            insert_function(table, function, file, Some(&companion_fqn), Some(&companion_fqn));
        }
        for property in &companion.properties {
            insert_property(table, property, file, Some(&companion_fqn), Some(&companion_fqn));
        }
    }
}

fn insert_function(
    table: &mut SymbolTable,
    function: &ParsedFunction,
    file: &ParsedFile,
    parent_fqn: Option<&str>,
    declaring_type_fqn: Option<&str>,
) {
    let fqn = compose_fqn(parent_fqn, &function.name);
    table.insert(Symbol {
        simple_name: function.name.clone(),
        fqn,
        kind: SymbolKind::Function,
        file_path: file.file_path.clone(),
        location: function.location.clone(),
        visibility: function.visibility,
        parent_fqn: parent_fqn.map(|s| s.to_string()),
        declaring_type_fqn: declaring_type_fqn.map(|s| s.to_string()),
        package: file.package.clone(),
    });
}

fn insert_property(
    table: &mut SymbolTable,
    property: &ParsedProperty,
    file: &ParsedFile,
    parent_fqn: Option<&str>,
    declaring_type_fqn: Option<&str>,
) {
    let fqn = compose_fqn(parent_fqn, &property.name);
    table.insert(Symbol {
        simple_name: property.name.clone(),
        fqn,
        kind: SymbolKind::Property,
        file_path: file.file_path.clone(),
        location: property.location.clone(),
        visibility: property.visibility,
        parent_fqn: parent_fqn.map(|s| s.to_string()),
        declaring_type_fqn: declaring_type_fqn.map(|s| s.to_string()),
        package: file.package.clone(),
    });
}

/// Build the global table from every parsed file (spec §4.4 algorithm,
/// steps 1-5; step 6, type-hierarchy resolution, is [`resolve_hierarchy`]).
pub fn build(files: &[ParsedFile]) -> SymbolTable {
    let mut table = SymbolTable::new();

    for file in files {
        let package = file.package.as_deref();

        for class in &file.classes {
            insert_class(&mut table, class, file, package, None);
        }
        for function in &file.functions {
            insert_function(&mut table, function, file, package, None);
        }
        for property in &file.properties {
            insert_property(&mut table, property, file, package, None);
        }
        for alias in &file.type_aliases {
            let fqn = compose_fqn(package, &alias.name);
            table.insert(Symbol {
                simple_name: alias.name.clone(),
                fqn,
                kind: SymbolKind::TypeAlias,
                file_path: file.file_path.clone(),
                location: alias.location.clone(),
                visibility: alias.visibility,
                parent_fqn: package.map(|s| s.to_string()),
                declaring_type_fqn: None,
                package: file.package.clone(),
            });
        }

        // Destructuring: underscore components produce no symbol (spec §3).
        for decl in &file.destructuring_declarations {
            for name in &decl.component_names {
                if name == "_" {
                    continue;
                }
                let fqn = compose_fqn(package, name);
                table.insert(Symbol {
                    simple_name: name.clone(),
                    fqn,
                    kind: SymbolKind::Property,
                    file_path: file.file_path.clone(),
                    location: decl.location.clone(),
                    visibility: Visibility::Public,
                    parent_fqn: package.map(|s| s.to_string()),
                    declaring_type_fqn: None,
                    package: file.package.clone(),
                });
            }
        }

        // Anonymous object expressions: `<enclosing-package>.<anonymous>@line`.
        for object_expr in &file.object_expressions {
            let enclosing = package.unwrap_or("");
            let fqn = object_expr.anonymous_fqn(enclosing);
            table.insert(Symbol {
                simple_name: "<anonymous>".to_string(),
                fqn: fqn.clone(),
                kind: SymbolKind::Object,
                file_path: file.file_path.clone(),
                location: object_expr.location.clone(),
                visibility: Visibility::Public,
                parent_fqn: package.map(|s| s.to_string()),
                declaring_type_fqn: None,
                package: file.package.clone(),
            });
            for function in &object_expr.functions {
                insert_function(&mut table, function, file, Some(&fqn), Some(&fqn));
            }
            for property in &object_expr.properties {
                insert_property(&mut table, property, file, Some(&fqn), Some(&fqn));
            }
        }
    }

    resolve_hierarchy(&mut table, files);
    table
}

/// Step 6: for each class with declared super types, resolve each name
/// against the table (same-package first, then unique simple name), and
/// record the result — resolved or not — in `type_hierarchy`.
fn resolve_hierarchy(table: &mut SymbolTable, files: &[ParsedFile]) {
    let mut edges: Vec<(String, String)> = Vec::new();

    fn collect(class: &ParsedClass, package: Option<&str>, parent_fqn: Option<&str>, edges: &mut Vec<(String, String)>) {
        let fqn = compose_fqn(parent_fqn, &class.name);
        for super_name in class.superclass.iter().chain(class.interfaces.iter()) {
            edges.push((fqn.clone(), super_name.clone()));
        }
        for nested in &class.nested_classes {
            collect(nested, package, Some(&fqn), edges);
        }
    }

    for file in files {
        let package = file.package.as_deref();
        for class in &file.classes {
            collect(class, package, package, &mut edges);
        }
    }

    let by_name: HashMap<String, Vec<String>> = {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for symbol in table.all_symbols() {
            if symbol.is_type() {
                map.entry(symbol.simple_name.clone()).or_default().push(symbol.fqn.clone());
            }
        }
        map
    };

    for (child_fqn, super_name) in edges {
        let package_prefix = child_fqn.rsplit_once('.').map(|(pkg, _)| pkg.to_string());
        let resolved = package_prefix
            .as_ref()
            .map(|pkg| format!("{pkg}.{super_name}"))
            .filter(|candidate| table.get_by_fqn(candidate).is_some())
            .or_else(|| {
                by_name
                    .get(&super_name)
                    .filter(|fqns| fqns.len() == 1)
                    .map(|fqns| fqns[0].clone())
            })
            .unwrap_or(super_name);
        table.record_hierarchy(child_fqn, resolved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(name: &str) -> ParsedFunction {
        ParsedFunction {
            name: name.to_string(),
            visibility: Visibility::Public,
            parameters: Vec::new(),
            return_type: None,
            receiver_type: None,
            modifiers: FunctionModifiers::default(),
            type_parameters: Vec::new(),
            annotations: Vec::new(),
            calls: Vec::new(),
            location: SourceLocation::point("f.kt", 2, 0),
        }
    }

    #[test]
    fn nested_class_fqn_begins_with_parent_fqn() {
        let mut file = ParsedFile::new("f.kt", Language::Kotlin);
        file.package = Some("com.example".to_string());
        let mut outer = ParsedClass {
            name: "Outer".to_string(),
            kind: ClassKind::Class,
            visibility: Visibility::Public,
            modifiers: ClassModifiers::default(),
            superclass: None,
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
            annotations: Vec::new(),
            properties: Vec::new(),
            functions: vec![function("doWork")],
            nested_classes: Vec::new(),
            companion: None,
            companion_name: None,
            secondary_constructors: Vec::new(),
            location: SourceLocation::point("f.kt", 1, 0),
        };
        outer.nested_classes.push(ParsedClass {
            name: "Inner".to_string(),
            ..outer.clone()
        });
        file.classes.push(outer);

        let table = build(std::slice::from_ref(&file));
        let inner = table.get_by_fqn("com.example.Outer.Inner").unwrap();
        assert!(inner.fqn.starts_with("com.example.Outer."));
        let method = table.get_by_fqn("com.example.Outer.doWork").unwrap();
        assert_eq!(method.kind, SymbolKind::Function);
    }

    #[test]
    fn hierarchy_prefers_same_package_resolution() {
        let mut file = ParsedFile::new("f.kt", Language::Kotlin);
        file.package = Some("com.example".to_string());
        file.classes.push(ParsedClass {
            name: "Base".to_string(),
            kind: ClassKind::Class,
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
            location: SourceLocation::point("f.kt", 1, 0),
        });
        file.classes.push(ParsedClass {
            name: "Child".to_string(),
            kind: ClassKind::Class,
            visibility: Visibility::Public,
            modifiers: ClassModifiers::default(),
            superclass: Some("Base".to_string()),
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
            annotations: Vec::new(),
            properties: Vec::new(),
            functions: Vec::new(),
            nested_classes: Vec::new(),
            companion: None,
            companion_name: None,
            secondary_constructors: Vec::new(),
            location: SourceLocation::point("f.kt", 5, 0),
        });

        let table = build(std::slice::from_ref(&file));
        let parents = table.direct_parents("com.example.Child");
        assert_eq!(parents, &["com.example.Base".to_string()]);
    }
}
