//! Domain records produced by the domain-analysis pass (spec §3, §4.8).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainPattern {
    pub name: String,
    pub description: Option<String>,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainsConfig {
    pub domains: Vec<DomainPattern>,
}

#[derive(Debug, Clone, Default)]
pub struct Domain {
    pub name: String,
    pub description: Option<String>,
    pub patterns: Vec<String>,
    pub matched_packages: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DomainDependency {
    pub from_domain: String,
    pub to_domain: String,
    pub weight: u64,
}

/// Accumulator for inter-domain weights keyed by domain name pair, folded
/// over the resolved call graph by the domain analyzer (spec §4.8 step 2).
#[derive(Debug, Default)]
pub struct DomainDependencyAccumulator {
    weights: HashMap<(String, String), u64>,
}

impl DomainDependencyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, from_domain: &str, to_domain: &str) {
        if from_domain == to_domain {
            return;
        }
        *self
            .weights
            .entry((from_domain.to_string(), to_domain.to_string()))
            .or_insert(0) += 1;
    }

    pub fn into_dependencies(self) -> Vec<DomainDependency> {
        self.weights
            .into_iter()
            .map(|((from_domain, to_domain), weight)| DomainDependency {
                from_domain,
                to_domain,
                weight,
            })
            .collect()
    }
}
