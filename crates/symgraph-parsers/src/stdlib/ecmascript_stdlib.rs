//! Shared TypeScript/JavaScript stdlib: `lib.es` globals plus the common
//! built-in object methods (Array/String/Object/Promise).

use super::{synthetic_class, synthetic_function, synthetic_method, StdlibProvider};
use symgraph_core::model::Language;
use symgraph_core::symbol::Symbol;

const FUNCTIONS: &[&str] = &[
    "console", "parseInt", "parseFloat", "isNaN", "setTimeout", "setInterval", "fetch",
    "encodeURIComponent", "decodeURIComponent",
];

const CLASSES: &[&str] = &[
    "Array", "String", "Object", "Number", "Boolean", "Promise", "Map", "Set", "Error", "Date",
    "RegExp", "Symbol",
];

const INSTANCE_METHODS: &[(&str, &str)] = &[
    ("Array", "map"),
    ("Array", "filter"),
    ("Array", "forEach"),
    ("Array", "reduce"),
    ("Array", "push"),
    ("Array", "find"),
    ("Array", "includes"),
    ("String", "split"),
    ("String", "slice"),
    ("String", "trim"),
    ("String", "toUpperCase"),
    ("Object", "keys"),
    ("Object", "values"),
    ("Object", "entries"),
    ("Promise", "then"),
    ("Promise", "catch"),
    ("Map", "get"),
    ("Map", "set"),
    ("Map", "has"),
];

pub struct EcmaScriptStdlib;

impl EcmaScriptStdlib {
    pub fn new() -> Self {
        Self
    }
}

impl StdlibProvider for EcmaScriptStdlib {
    fn languages(&self) -> &[Language] {
        &[Language::TypeScript, Language::JavaScript]
    }

    fn default_wildcard_imports(&self) -> &[&str] {
        &[]
    }

    fn lookup_function(&self, name: &str) -> Option<Symbol> {
        FUNCTIONS.contains(&name).then(|| synthetic_function(name))
    }

    fn lookup_class(&self, name: &str) -> Option<Symbol> {
        CLASSES.contains(&name).then(|| synthetic_class(name))
    }

    fn lookup_static_method(&self, qualified: &str) -> Option<Symbol> {
        let (owner, method) = qualified.split_once('.')?;
        INSTANCE_METHODS
            .iter()
            .find(|(o, m)| *o == owner && *m == method)
            .map(|(owner, method)| synthetic_method(owner, method))
    }
}
