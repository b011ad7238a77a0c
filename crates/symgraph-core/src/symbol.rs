//! The global symbol model: a tagged sum of symbol kinds with a common
//! header, and the four-map-plus-hierarchy `SymbolTable` spec §3/§4.4
//! describe. Modeled as a tagged sum rather than trait objects per
//! DESIGN.md's "polymorphic symbols" note — the resolver never needs
//! dynamic dispatch on the hot path, only a match on `kind`.

use crate::model::{SourceLocation, Visibility};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Class,
    Interface,
    Object,
    Enum,
    Annotation,
    Function,
    Property,
    TypeAlias,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub simple_name: String,
    pub fqn: String,
    pub kind: SymbolKind,
    pub file_path: String,
    pub location: SourceLocation,
    pub visibility: Visibility,
    pub parent_fqn: Option<String>,
    pub declaring_type_fqn: Option<String>,
    pub package: Option<String>,
}

impl Symbol {
    pub fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function)
    }

    pub fn is_type(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::Class | SymbolKind::Interface | SymbolKind::Object | SymbolKind::Enum
        )
    }
}

/// Global index over every `Symbol` discovered in a full-project pass.
/// Immutable once built (spec §5: "after construction... safely shared
/// across resolver workers").
#[derive(Debug, Default)]
pub struct SymbolTable {
    by_fqn: HashMap<String, Symbol>,
    by_name: HashMap<String, Vec<String>>,
    functions_by_name: HashMap<String, Vec<String>>,
    by_package: HashMap<String, Vec<String>>,
    /// childFqn -> declared parent names (resolved where possible, else
    /// retained verbatim per spec §4.4 step 6).
    type_hierarchy: HashMap<String, Vec<String>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a symbol. Collision policy is last-writer-wins (spec §9,
    /// "Collision policy in byFqn"): the newer symbol replaces the older
    /// one in `by_fqn`, but both remain reachable via `by_name`.
    pub fn insert(&mut self, symbol: Symbol) {
        let fqn = symbol.fqn.clone();
        let simple_name = symbol.simple_name.clone();
        let package = symbol.package.clone();
        let is_function = symbol.is_function();

        self.by_name
            .entry(simple_name.clone())
            .or_default()
            .push(fqn.clone());
        if is_function {
            self.functions_by_name
                .entry(simple_name)
                .or_default()
                .push(fqn.clone());
        }
        if let Some(pkg) = package {
            self.by_package.entry(pkg).or_default().push(fqn.clone());
        }
        self.by_fqn.insert(fqn, symbol);
    }

    pub fn record_hierarchy(&mut self, child_fqn: impl Into<String>, parent: impl Into<String>) {
        self.type_hierarchy
            .entry(child_fqn.into())
            .or_default()
            .push(parent.into());
    }

    pub fn get_by_fqn(&self, fqn: &str) -> Option<&Symbol> {
        self.by_fqn.get(fqn)
    }

    pub fn by_name(&self, name: &str) -> Vec<&Symbol> {
        self.by_name
            .get(name)
            .map(|fqns| fqns.iter().filter_map(|f| self.by_fqn.get(f)).collect())
            .unwrap_or_default()
    }

    pub fn functions_by_name(&self, name: &str) -> Vec<&Symbol> {
        self.functions_by_name
            .get(name)
            .map(|fqns| fqns.iter().filter_map(|f| self.by_fqn.get(f)).collect())
            .unwrap_or_default()
    }

    pub fn by_package(&self, package: &str) -> Vec<&Symbol> {
        self.by_package
            .get(package)
            .map(|fqns| fqns.iter().filter_map(|f| self.by_fqn.get(f)).collect())
            .unwrap_or_default()
    }

    pub fn direct_parents(&self, class_fqn: &str) -> &[String] {
        self.type_hierarchy
            .get(class_fqn)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Depth-first walk of the type hierarchy starting at `class_fqn`,
    /// guarding against cycles with a visited set (spec §3 invariant:
    /// "Type hierarchy is acyclic after resolution; cycles... tolerated
    /// without infinite recursion").
    pub fn walk_hierarchy(&self, class_fqn: &str) -> Vec<String> {
        let mut visited = std::collections::HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![class_fqn.to_string()];
        while let Some(current) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            if current != class_fqn {
                order.push(current.clone());
            }
            for parent in self.direct_parents(&current) {
                if !visited.contains(parent) {
                    stack.push(parent.clone());
                }
            }
        }
        order
    }

    pub fn all_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.by_fqn.values()
    }

    pub fn len(&self) -> usize {
        self.by_fqn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_fqn.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(fqn: &str, simple: &str, kind: SymbolKind, package: Option<&str>) -> Symbol {
        Symbol {
            simple_name: simple.to_string(),
            fqn: fqn.to_string(),
            kind,
            file_path: "f.kt".to_string(),
            location: SourceLocation::point("f.kt", 1, 0),
            visibility: Visibility::Public,
            parent_fqn: None,
            declaring_type_fqn: None,
            package: package.map(|s| s.to_string()),
        }
    }

    #[test]
    fn last_writer_wins_on_fqn_collision() {
        let mut table = SymbolTable::new();
        table.insert(sym("pkg.Foo", "Foo", SymbolKind::Class, Some("pkg")));
        table.insert(sym("pkg.Foo", "Foo", SymbolKind::Interface, Some("pkg")));
        assert_eq!(table.get_by_fqn("pkg.Foo").unwrap().kind, SymbolKind::Interface);
    }

    #[test]
    fn hierarchy_walk_terminates_on_cycle() {
        let mut table = SymbolTable::new();
        table.record_hierarchy("A", "B");
        table.record_hierarchy("B", "A");
        let walked = table.walk_hierarchy("A");
        assert!(walked.contains(&"B".to_string()));
        assert_eq!(walked.len(), 1);
    }
}
