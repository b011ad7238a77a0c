//! Kotlin's own stdlib layer: top-level functions and the scope/collection
//! extension functions (`let`, `also`, `apply`, `run`, `map`, `filter`...)
//! that sit above `jvm_common` in the composite provider for Kotlin.

use super::{synthetic_class, synthetic_function, synthetic_method, StdlibProvider};
use symgraph_core::model::Language;
use symgraph_core::symbol::Symbol;

const FUNCTIONS: &[&str] = &[
    "println", "print", "listOf", "mapOf", "setOf", "mutableListOf", "mutableMapOf", "arrayOf",
    "require", "check", "error", "TODO",
];

const CLASSES: &[&str] = &[
    "List", "MutableList", "Map", "MutableMap", "Set", "MutableSet", "Sequence", "Pair", "Triple",
    "Unit", "Nothing", "Result",
];

// Extension functions available on any receiver (scope functions) plus the
// collection-extension family; modeled as static methods on a synthetic
// `Any`/`Iterable` owner so the resolver's stdlib step can find them via
// `lookup_static_method("<receiverType>.<name>")` regardless of the
// concrete receiver type.
const EXTENSION_METHODS: &[&str] = &[
    "let", "also", "apply", "run", "with", "map", "filter", "forEach", "fold", "reduce",
    "firstOrNull", "find", "sortedBy", "groupBy", "toList", "toMutableList",
];

pub struct KotlinStdlib;

impl KotlinStdlib {
    pub fn new() -> Self {
        Self
    }
}

impl StdlibProvider for KotlinStdlib {
    fn languages(&self) -> &[Language] {
        &[Language::Kotlin]
    }

    fn default_wildcard_imports(&self) -> &[&str] {
        &["kotlin", "kotlin.collections", "kotlin.text"]
    }

    fn lookup_function(&self, name: &str) -> Option<Symbol> {
        FUNCTIONS.contains(&name).then(|| synthetic_function(name))
    }

    fn lookup_class(&self, name: &str) -> Option<Symbol> {
        CLASSES.contains(&name).then(|| synthetic_class(name))
    }

    fn lookup_static_method(&self, qualified: &str) -> Option<Symbol> {
        let (owner, method) = qualified.split_once('.')?;
        EXTENSION_METHODS
            .contains(&method)
            .then(|| synthetic_method(owner, method))
    }
}
