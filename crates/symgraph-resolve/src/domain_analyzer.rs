//! Domain Analyzer (spec §4.8): matches packages against configured glob
//! patterns to form domains, then folds the resolved call graph into
//! weighted inter-domain dependencies.

use globset::Glob;
use std::collections::{HashMap, HashSet};
use symgraph_core::domain::{Domain, DomainDependency, DomainDependencyAccumulator, DomainsConfig};
use symgraph_core::resolved::ResolvedCall;
use symgraph_core::symbol::SymbolTable;

/// Step 1: match every observed package against each domain's patterns, in
/// configured order, first match wins. A package matching no domain's
/// patterns is left out of every `Domain.matched_packages` and contributes
/// no dependency edges.
pub fn build_domains(config: &DomainsConfig, packages: &HashSet<String>) -> Vec<Domain> {
    let mut domains: Vec<Domain> = config
        .domains
        .iter()
        .map(|pattern| Domain {
            name: pattern.name.clone(),
            description: pattern.description.clone(),
            patterns: pattern.patterns.clone(),
            matched_packages: Vec::new(),
        })
        .collect();

    let matchers: Vec<Vec<globset::GlobMatcher>> = config
        .domains
        .iter()
        .map(|pattern| {
            pattern
                .patterns
                .iter()
                .filter_map(|p| Glob::new(p).ok())
                .map(|g| g.compile_matcher())
                .collect()
        })
        .collect();

    let mut sorted_packages: Vec<&String> = packages.iter().collect();
    sorted_packages.sort();

    for package in sorted_packages {
        for (domain_idx, patterns) in matchers.iter().enumerate() {
            if patterns.iter().any(|m| m.is_match(package)) {
                domains[domain_idx].matched_packages.push(package.clone());
                break;
            }
        }
    }

    domains
}

fn package_for_fqn(table: &SymbolTable, fqn: &str) -> Option<String> {
    table.get_by_fqn(fqn).and_then(|s| s.package.clone())
}

fn domain_for_package<'a>(domains: &'a [Domain], package: &str) -> Option<&'a str> {
    domains
        .iter()
        .find(|d| d.matched_packages.iter().any(|p| p == package))
        .map(|d| d.name.as_str())
}

/// Step 2: fold every resolved call into the accumulator, recording one
/// weighted edge per distinct (caller-domain, callee-domain) pair. Calls
/// whose caller or callee package doesn't match any configured domain are
/// skipped, and self-edges within a domain are never recorded.
pub fn accumulate_dependencies(
    table: &SymbolTable,
    domains: &[Domain],
    resolved_calls: &[ResolvedCall],
) -> Vec<DomainDependency> {
    let mut accumulator = DomainDependencyAccumulator::new();

    for call in resolved_calls {
        let Some(caller_package) = package_for_fqn(table, &call.caller_fqn) else { continue };
        let Some(callee_package) = package_for_fqn(table, &call.callee_fqn) else { continue };
        let Some(from_domain) = domain_for_package(domains, &caller_package) else { continue };
        let Some(to_domain) = domain_for_package(domains, &callee_package) else { continue };
        accumulator.record(from_domain, to_domain);
    }

    accumulator.into_dependencies()
}

/// Run the full domain-analysis pass over one project: build domains from
/// every package the symbol table knows about, then fold every resolved
/// call across every file into inter-domain dependency weights.
pub fn analyze(
    config: &DomainsConfig,
    table: &SymbolTable,
    resolved_calls: &[ResolvedCall],
) -> (Vec<Domain>, Vec<DomainDependency>) {
    let packages: HashSet<String> = table.all_symbols().filter_map(|s| s.package.clone()).collect();
    let domains = build_domains(config, &packages);
    let dependencies = accumulate_dependencies(table, &domains, resolved_calls);
    (domains, dependencies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use symgraph_core::domain::DomainPattern;
    use symgraph_core::model::*;
    use symgraph_core::symbol::{Symbol, SymbolKind};

    fn symbol(fqn: &str, package: &str) -> Symbol {
        Symbol {
            simple_name: fqn.rsplit('.').next().unwrap().to_string(),
            fqn: fqn.to_string(),
            kind: SymbolKind::Function,
            file_path: "f.kt".to_string(),
            location: SourceLocation::point("f.kt", 1, 0),
            visibility: Visibility::Public,
            parent_fqn: None,
            declaring_type_fqn: None,
            package: Some(package.to_string()),
        }
    }

    #[test]
    fn packages_match_first_domain_by_configured_order() {
        let config = DomainsConfig {
            domains: vec![
                DomainPattern {
                    name: "billing".to_string(),
                    description: None,
                    patterns: vec!["com.example.billing.*".to_string()],
                },
                DomainPattern {
                    name: "everything".to_string(),
                    description: None,
                    patterns: vec!["com.example.*".to_string()],
                },
            ],
        };
        let mut packages = HashSet::new();
        packages.insert("com.example.billing.invoices".to_string());
        packages.insert("com.example.auth".to_string());

        let domains = build_domains(&config, &packages);
        assert_eq!(domains[0].matched_packages, vec!["com.example.billing.invoices".to_string()]);
        assert_eq!(domains[1].matched_packages, vec!["com.example.auth".to_string()]);
    }

    #[test]
    fn cross_domain_call_accumulates_weight_and_skips_self_edges() {
        let config = DomainsConfig {
            domains: vec![
                DomainPattern {
                    name: "billing".to_string(),
                    description: None,
                    patterns: vec!["billing.*".to_string()],
                },
                DomainPattern {
                    name: "auth".to_string(),
                    description: None,
                    patterns: vec!["auth.*".to_string()],
                },
            ],
        };

        let mut table = SymbolTable::new();
        table.insert(symbol("billing.invoices.Invoice.total", "billing.invoices"));
        table.insert(symbol("auth.session.Session.current", "auth.session"));
        table.insert(symbol("billing.invoices.Invoice.other", "billing.invoices"));

        let calls = vec![
            ResolvedCall {
                caller_fqn: "billing.invoices.Invoice.total".to_string(),
                callee_fqn: "auth.session.Session.current".to_string(),
                location: SourceLocation::point("f.kt", 1, 0),
            },
            ResolvedCall {
                caller_fqn: "billing.invoices.Invoice.total".to_string(),
                callee_fqn: "billing.invoices.Invoice.other".to_string(),
                location: SourceLocation::point("f.kt", 2, 0),
            },
        ];

        let (domains, dependencies) = analyze(&config, &table, &calls);
        assert_eq!(domains.len(), 2);
        assert_eq!(dependencies.len(), 1);
        assert_eq!(dependencies[0].from_domain, "billing");
        assert_eq!(dependencies[0].to_domain, "auth");
        assert_eq!(dependencies[0].weight, 1);
    }
}
