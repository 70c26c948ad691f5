// 🔍 Deduplication Engine - first write wins
// Contracts arrive from several overlapping exports; only the first
// occurrence of each (candidate_id, accepted_date) is kept.

use std::collections::HashSet;
use std::hash::Hash;

// ============================================================================
// CONTRACT KEY
// ============================================================================

/// Identity of a contract row across export files
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractKey {
    pub candidate_id: String,
    /// Normalized accepted date; may be empty
    pub accepted_date: String,
}

impl ContractKey {
    pub fn new(candidate_id: &str, accepted_date: &str) -> Self {
        ContractKey {
            candidate_id: candidate_id.to_string(),
            accepted_date: accepted_date.to_string(),
        }
    }
}

impl std::fmt::Display for ContractKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} @ {}", self.candidate_id, self.accepted_date)
    }
}

// ============================================================================
// DEDUPLICATION ENGINE
// ============================================================================

#[derive(Debug, Clone)]
pub struct DeduplicationEngine<K: Eq + Hash> {
    seen: HashSet<K>,
    /// Keys admitted on first sight
    pub admitted: usize,
    /// Later occurrences that were dropped
    pub duplicates: usize,
}

impl<K: Eq + Hash> DeduplicationEngine<K> {
    pub fn new() -> Self {
        DeduplicationEngine {
            seen: HashSet::new(),
            admitted: 0,
            duplicates: 0,
        }
    }

    /// Returns `true` the first time a key is offered, `false` afterwards
    pub fn admit(&mut self, key: K) -> bool {
        if self.seen.insert(key) {
            self.admitted += 1;
            true
        } else {
            self.duplicates += 1;
            false
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.seen.contains(key)
    }
}

impl<K: Eq + Hash> Default for DeduplicationEngine<K> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins() {
        let mut engine = DeduplicationEngine::new();

        assert!(engine.admit(ContractKey::new("12345678", "2026-01-10")));
        assert!(!engine.admit(ContractKey::new("12345678", "2026-01-10")));

        assert_eq!(engine.admitted, 1);
        assert_eq!(engine.duplicates, 1);
    }

    #[test]
    fn test_same_candidate_different_date_is_distinct() {
        let mut engine = DeduplicationEngine::new();

        assert!(engine.admit(ContractKey::new("12345678", "2026-01-10")));
        assert!(engine.admit(ContractKey::new("12345678", "2026-02-01")));
        assert!(engine.admit(ContractKey::new("12345678", "")));
        assert_eq!(engine.admitted, 3);
        assert_eq!(engine.duplicates, 0);
    }

    #[test]
    fn test_empty_date_deduplicates_too() {
        let mut engine = DeduplicationEngine::new();

        assert!(engine.admit(ContractKey::new("87654321", "")));
        assert!(!engine.admit(ContractKey::new("87654321", "")));
        assert!(engine.contains(&ContractKey::new("87654321", "")));
    }

    #[test]
    fn test_contract_key_display() {
        let key = ContractKey::new("12345678", "2026-01-10");
        assert_eq!(key.to_string(), "12345678 @ 2026-01-10");
    }
}
