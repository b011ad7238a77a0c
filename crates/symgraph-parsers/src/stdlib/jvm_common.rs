//! Shared JVM stdlib (`java.lang`, `java.util`, collections) layered
//! beneath both the Kotlin and Java frontends (spec §4.3: "a JVM language
//! combines its own stdlib with the shared JVM stdlib").

use super::{synthetic_class, synthetic_function, synthetic_method, StdlibProvider};
use symgraph_core::model::Language;
use symgraph_core::symbol::Symbol;

const CLASSES: &[&str] = &[
    "String", "Object", "Integer", "Long", "Double", "Float", "Boolean", "Character", "List",
    "ArrayList", "Map", "HashMap", "Set", "HashSet", "Collection", "Iterable", "Iterator",
    "Optional", "Exception", "RuntimeException", "Thread", "Comparable", "Runnable",
];

const FUNCTIONS: &[&str] = &["println", "print"];

const STATIC_METHODS: &[(&str, &str)] = &[
    ("String", "valueOf"),
    ("String", "format"),
    ("Integer", "parseInt"),
    ("Integer", "valueOf"),
    ("List", "of"),
    ("Map", "of"),
    ("Collections", "emptyList"),
    ("Arrays", "asList"),
];

const INSTANCE_METHODS: &[(&str, &str)] = &[
    ("List", "add"),
    ("List", "get"),
    ("List", "size"),
    ("List", "isEmpty"),
    ("Map", "get"),
    ("Map", "put"),
    ("Map", "containsKey"),
    ("String", "length"),
    ("String", "substring"),
    ("String", "equals"),
    ("String", "toUpperCase"),
    ("Object", "equals"),
    ("Object", "hashCode"),
    ("Object", "toString"),
];

pub struct JvmCommon;

impl JvmCommon {
    pub fn new() -> Self {
        Self
    }
}

impl StdlibProvider for JvmCommon {
    fn languages(&self) -> &[Language] {
        &[Language::Kotlin, Language::Java]
    }

    fn default_wildcard_imports(&self) -> &[&str] {
        &["java.lang"]
    }

    fn lookup_function(&self, name: &str) -> Option<Symbol> {
        FUNCTIONS.contains(&name).then(|| synthetic_function(name))
    }

    fn lookup_class(&self, name: &str) -> Option<Symbol> {
        CLASSES.contains(&name).then(|| synthetic_class(name))
    }

    fn lookup_static_method(&self, qualified: &str) -> Option<Symbol> {
        let (owner, method) = qualified.split_once('.')?;
        STATIC_METHODS
            .iter()
            .chain(INSTANCE_METHODS.iter())
            .find(|(o, m)| *o == owner && *m == method)
            .map(|(owner, method)| synthetic_method(owner, method))
    }
}
