//! Committed order entries.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::parser::{parse_strength, Frequency, ParsedStrength, PediatricRule};

/// A committed medicine order.
///
/// Entries are only built by [`crate::parser::EntryParser`]. The pediatric
/// flag is computed from strength and cannot be set directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructuredEntry {
    /// Opaque unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Strength exactly as entered or taken from the seed (e.g. "650 mg")
    pub strength: String,
    /// Numeric dose extracted from `strength`
    pub dose: ParsedStrength,
    /// Canonical dosing schedule
    pub frequency: Frequency,
    pub duration: String,
    pub timing: String,
    pub generic: String,
    pub route: String,
    /// Free-text instruction
    pub notes: String,
    /// Interaction names snapshotted from the seed at commit time
    pub interactions: Vec<String>,
    /// Commit timestamp (RFC 3339, UTC)
    pub committed_at: String,
    pediatric: bool,
}

/// Field values gathered by the parser before an entry is created.
#[derive(Debug, Clone, Default)]
pub(crate) struct EntryFields {
    pub name: String,
    pub strength: String,
    pub frequency: Frequency,
    pub duration: String,
    pub timing: String,
    pub generic: String,
    pub route: String,
    pub notes: String,
    pub interactions: Vec<String>,
}

impl StructuredEntry {
    pub(crate) fn from_fields(fields: EntryFields, rule: &PediatricRule) -> Self {
        let dose = parse_strength(&fields.strength);
        let pediatric = rule.applies(&dose);
        Self {
            id: Uuid::new_v4().to_string(),
            name: fields.name,
            strength: fields.strength,
            dose,
            frequency: fields.frequency,
            duration: fields.duration,
            timing: fields.timing,
            generic: fields.generic,
            route: fields.route,
            notes: fields.notes,
            interactions: fields.interactions,
            committed_at: chrono::Utc::now().to_rfc3339(),
            pediatric,
        }
    }

    /// Whether the strength at classification time fell under the pediatric rule.
    pub fn is_pediatric(&self) -> bool {
        self.pediatric
    }

    /// Replace the strength text. The pediatric flag is left as it was.
    pub(crate) fn set_strength(&mut self, strength: &str) {
        self.strength = strength.trim().to_string();
        self.dose = parse_strength(&self.strength);
    }

    /// Recompute the pediatric flag from the current strength.
    pub(crate) fn reclassify(&mut self, rule: &PediatricRule) -> bool {
        self.pediatric = rule.applies(&self.dose);
        self.pediatric
    }

    /// One-line summary of the non-empty detail fields.
    pub fn summary(&self) -> String {
        [
            ("Strength", self.strength.as_str()),
            ("Freq", self.frequency.as_str()),
            ("Duration", self.duration.as_str()),
            ("When", self.timing.as_str()),
            ("Instruction", self.notes.as_str()),
        ]
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(label, value)| format!("{}: {}", label, value.trim()))
        .collect::<Vec<_>>()
        .join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(strength: &str) -> StructuredEntry {
        StructuredEntry::from_fields(
            EntryFields {
                name: "Paracetamol".into(),
                strength: strength.into(),
                frequency: Frequency::normalize("bd"),
                ..Default::default()
            },
            &PediatricRule::default(),
        )
    }

    #[test]
    fn test_pediatric_computed_on_creation() {
        assert!(entry("250mg").is_pediatric());
        assert!(!entry("650 mg").is_pediatric());
        assert!(!entry("").is_pediatric());
    }

    #[test]
    fn test_strength_edit_keeps_flag_until_reclassified() {
        let mut e = entry("650 mg");
        e.set_strength("125 mg");

        assert_eq!(e.dose.value, Some(125.0));
        assert!(!e.is_pediatric());

        assert!(e.reclassify(&PediatricRule::default()));
        assert!(e.is_pediatric());
    }

    #[test]
    fn test_summary_skips_empty_fields() {
        let mut e = entry("650 mg");
        e.timing = "After food".into();

        assert_eq!(e.summary(), "Strength: 650 mg | Freq: 1-0-1 | When: After food");
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(entry("650 mg").id, entry("650 mg").id);
    }
}
