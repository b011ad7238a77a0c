//! Standard-Library Provider Registry (spec §4.3): synthetic symbols for
//! names with no definition in the indexed sources. Providers are plain
//! data structures combined by a composite, first-match-wins provider —
//! per DESIGN.md/spec §9, "no inheritance tree; providers are data, not
//! classes."

mod ecmascript_stdlib;
mod jvm_common;
mod kotlin_stdlib;

use symgraph_core::model::{SourceLocation, Visibility};
use symgraph_core::model::Language;
use symgraph_core::symbol::{Symbol, SymbolKind};

const STDLIB_FILE: &str = "<stdlib>";

/// Built-in primitive type names filtered out of any relationship that
/// would otherwise create a `USES` edge (spec §4.3).
pub const PRIMITIVE_TYPES: &[&str] = &[
    "Int", "Long", "Short", "Byte", "Double", "Float", "Boolean", "Char", "String", "Unit", "Any",
    "int", "long", "short", "byte", "double", "float", "boolean", "char", "void", "Object",
    "number", "string", "boolean", "undefined", "null", "void", "any", "unknown", "never",
];

pub fn is_primitive_type(name: &str) -> bool {
    PRIMITIVE_TYPES.contains(&name)
}

fn synthetic_function(name: &str) -> Symbol {
    Symbol {
        simple_name: name.to_string(),
        fqn: format!("stdlib.{name}"),
        kind: SymbolKind::Function,
        file_path: STDLIB_FILE.to_string(),
        location: SourceLocation::point(STDLIB_FILE, 0, 0),
        visibility: Visibility::Public,
        parent_fqn: None,
        declaring_type_fqn: None,
        package: None,
    }
}

fn synthetic_class(name: &str) -> Symbol {
    Symbol {
        simple_name: name.to_string(),
        fqn: format!("stdlib.{name}"),
        kind: SymbolKind::Class,
        file_path: STDLIB_FILE.to_string(),
        location: SourceLocation::point(STDLIB_FILE, 0, 0),
        visibility: Visibility::Public,
        parent_fqn: None,
        declaring_type_fqn: None,
        package: None,
    }
}

fn synthetic_method(owner: &str, name: &str) -> Symbol {
    Symbol {
        simple_name: name.to_string(),
        fqn: format!("stdlib.{owner}.{name}"),
        kind: SymbolKind::Function,
        file_path: STDLIB_FILE.to_string(),
        location: SourceLocation::point(STDLIB_FILE, 0, 0),
        visibility: Visibility::Public,
        parent_fqn: None,
        declaring_type_fqn: Some(format!("stdlib.{owner}")),
        package: None,
    }
}

/// Contract every stdlib provider satisfies (spec §4.3).
pub trait StdlibProvider: Send + Sync {
    fn languages(&self) -> &[Language];
    fn default_wildcard_imports(&self) -> &[&str];
    fn lookup_function(&self, name: &str) -> Option<Symbol>;
    fn lookup_class(&self, name: &str) -> Option<Symbol>;
    /// `lookup_static_method("Type.method")`.
    fn lookup_static_method(&self, qualified: &str) -> Option<Symbol>;
    fn is_known_symbol(&self, name: &str) -> bool {
        self.lookup_function(name).is_some() || self.lookup_class(name).is_some()
    }
}

/// Combines providers in order; the first to resolve wins.
pub struct CompositeProvider {
    providers: Vec<Box<dyn StdlibProvider>>,
}

impl CompositeProvider {
    pub fn new(providers: Vec<Box<dyn StdlibProvider>>) -> Self {
        Self { providers }
    }

    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Kotlin => Self::new(vec![
                Box::new(kotlin_stdlib::KotlinStdlib::new()),
                Box::new(jvm_common::JvmCommon::new()),
            ]),
            Language::Java => Self::new(vec![Box::new(jvm_common::JvmCommon::new())]),
            Language::TypeScript | Language::JavaScript => {
                Self::new(vec![Box::new(ecmascript_stdlib::EcmaScriptStdlib::new())])
            }
        }
    }

    pub fn default_wildcard_imports(&self) -> Vec<&str> {
        self.providers
            .iter()
            .flat_map(|p| p.default_wildcard_imports().iter().copied())
            .collect()
    }

    pub fn lookup_function(&self, name: &str) -> Option<Symbol> {
        self.providers.iter().find_map(|p| p.lookup_function(name))
    }

    pub fn lookup_class(&self, name: &str) -> Option<Symbol> {
        self.providers.iter().find_map(|p| p.lookup_class(name))
    }

    pub fn lookup_static_method(&self, qualified: &str) -> Option<Symbol> {
        self.providers
            .iter()
            .find_map(|p| p.lookup_static_method(qualified))
    }

    pub fn is_known_symbol(&self, name: &str) -> bool {
        self.providers.iter().any(|p| p.is_known_symbol(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kotlin_composite_falls_back_to_jvm_common() {
        let composite = CompositeProvider::for_language(Language::Kotlin);
        assert!(composite.lookup_function("println").is_some());
        assert!(composite.lookup_class("String").is_some());
    }

    #[test]
    fn primitive_filter_covers_both_jvm_and_ecmascript_families() {
        assert!(is_primitive_type("Int"));
        assert!(is_primitive_type("string"));
        assert!(!is_primitive_type("UserService"));
    }
}
