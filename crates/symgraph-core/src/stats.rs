//! Resolution statistics contract (spec §8): `getResolutionStats`.

use crate::resolved::ResolvedFile;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionStats {
    pub total_calls: u64,
    pub resolved_calls: u64,
    pub unresolved_calls: u64,
    pub resolution_rate: f64,
}

/// `totalCalls` is every `ParsedCall` seen across the pass; `resolvedCalls`
/// is how many produced a `ResolvedCall`. Callers pass the original call
/// count alongside the resolved files since unresolved calls are dropped
/// silently and leave no trace to recount from `resolved_files` alone.
pub fn resolution_stats(total_calls: u64, resolved_files: &[ResolvedFile]) -> ResolutionStats {
    let resolved_calls: u64 = resolved_files
        .iter()
        .map(|f| f.resolved_calls.len() as u64)
        .sum();
    let unresolved_calls = total_calls.saturating_sub(resolved_calls);
    let resolution_rate = if total_calls == 0 {
        1.0
    } else {
        resolved_calls as f64 / total_calls as f64
    };
    ResolutionStats {
        total_calls,
        resolved_calls,
        unresolved_calls,
        resolution_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Language, ParsedFile};

    #[test]
    fn empty_pass_has_full_resolution_rate() {
        let stats = resolution_stats(0, &[]);
        assert_eq!(stats.resolution_rate, 1.0);
        assert_eq!(stats.resolved_calls + stats.unresolved_calls, stats.total_calls);
    }

    #[test]
    fn partial_resolution_rate() {
        let resolved = ResolvedFile {
            parsed: ParsedFile::new("f.kt", Language::Kotlin),
            resolved_calls: vec![],
        };
        let stats = resolution_stats(4, std::slice::from_ref(&resolved));
        assert_eq!(stats.resolved_calls, 0);
        assert_eq!(stats.unresolved_calls, 4);
        assert_eq!(stats.resolution_rate, 0.0);
    }
}
