//! Safety flags for committed entries.
//!
//! Both checks are heuristics over source data, not clinical rules.

use std::collections::HashSet;

use crate::models::StructuredEntry;
use crate::parser::{ParsedStrength, PediatricRule};
use crate::suggest::normalize_name;

/// Whether `entry`'s interaction list names any entry in `others`.
///
/// Only `entry`'s own list is consulted. Names compare case- and
/// whitespace-insensitively.
pub fn has_interaction<'a, I>(entry: &StructuredEntry, others: I) -> bool
where
    I: IntoIterator<Item = &'a StructuredEntry>,
{
    if entry.interactions.is_empty() {
        return false;
    }
    let present: HashSet<String> = others
        .into_iter()
        .map(|e| normalize_name(&e.name))
        .collect();
    entry
        .interactions
        .iter()
        .any(|name| present.contains(&normalize_name(name)))
}

/// Per-entry safety flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFlags {
    pub id: String,
    pub pediatric: bool,
    pub interaction: bool,
}

/// Applies the pediatric rule and interaction check.
#[derive(Debug, Clone, Default)]
pub struct SafetyClassifier {
    rule: PediatricRule,
}

impl SafetyClassifier {
    pub fn new(rule: PediatricRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> &PediatricRule {
        &self.rule
    }

    pub fn is_pediatric(&self, strength: &ParsedStrength) -> bool {
        self.rule.applies(strength)
    }

    /// Set the pediatric flag of a freshly parsed entry from its strength.
    pub fn classify(&self, entry: &mut StructuredEntry) -> bool {
        entry.reclassify(&self.rule)
    }

    /// Flags for every entry, each checked against all the others.
    pub fn flags(&self, entries: &[StructuredEntry]) -> Vec<EntryFlags> {
        entries
            .iter()
            .map(|entry| EntryFlags {
                id: entry.id.clone(),
                pediatric: entry.is_pediatric(),
                interaction: has_interaction(entry, entries.iter().filter(|o| o.id != entry.id)),
            })
            .collect()
    }
}
