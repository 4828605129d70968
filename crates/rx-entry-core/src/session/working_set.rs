//! Ordered, name-unique collection of committed entries.

use thiserror::Error;
use tracing::debug;

use crate::models::StructuredEntry;
use crate::parser::{Frequency, PediatricRule};
use crate::safety::has_interaction;
use crate::suggest::normalize_name;

/// Working-set errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkingSetError {
    #[error("Entry not found: {0}")]
    NotFound(String),
}

pub type WorkingSetResult<T> = Result<T, WorkingSetError>;

/// Result of inserting an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    Added { id: String },
    /// An entry with the same normalized name already exists
    Duplicate { existing_id: String },
}

/// A field of an entry that can be edited after commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableField {
    Strength,
    Frequency,
    Duration,
    Timing,
    Notes,
    Route,
    Generic,
}

/// Committed entries for one section, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct WorkingSet {
    entries: Vec<StructuredEntry>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` unless its name is already present.
    pub fn insert(&mut self, entry: StructuredEntry) -> Insertion {
        if let Some(existing) = self.find_by_name(&entry.name) {
            debug!(name = %entry.name, "ignoring duplicate entry");
            return Insertion::Duplicate {
                existing_id: existing.id.clone(),
            };
        }
        self.force_insert(entry)
    }

    /// Append `entry` even if its name is already present.
    pub fn force_insert(&mut self, entry: StructuredEntry) -> Insertion {
        let id = entry.id.clone();
        self.entries.push(entry);
        Insertion::Added { id }
    }

    pub fn remove(&mut self, id: &str) -> WorkingSetResult<StructuredEntry> {
        let index = self.position(id)?;
        Ok(self.entries.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&StructuredEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&StructuredEntry> {
        let key = normalize_name(name);
        self.entries.iter().find(|e| normalize_name(&e.name) == key)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.find_by_name(name).is_some()
    }

    /// Edit one field. Frequency is re-normalized; strength edits leave the
    /// pediatric flag alone (see [`WorkingSet::reclassify_pediatric`]).
    pub fn update(&mut self, id: &str, field: EditableField, value: &str) -> WorkingSetResult<()> {
        let entry = self.get_mut(id)?;
        let value = value.trim().to_string();
        match field {
            EditableField::Strength => entry.set_strength(&value),
            EditableField::Frequency => entry.frequency = Frequency::normalize(&value),
            EditableField::Duration => entry.duration = value,
            EditableField::Timing => entry.timing = value,
            EditableField::Notes => entry.notes = value,
            EditableField::Route => entry.route = value,
            EditableField::Generic => entry.generic = value,
        }
        Ok(())
    }

    /// Recompute the pediatric flag of one entry from its current strength.
    pub fn reclassify_pediatric(&mut self, id: &str, rule: &PediatricRule) -> WorkingSetResult<bool> {
        Ok(self.get_mut(id)?.reclassify(rule))
    }

    /// Whether the entry interacts with any other entry in the set.
    pub fn has_interaction(&self, id: &str) -> WorkingSetResult<bool> {
        let index = self.position(id)?;
        let entry = &self.entries[index];
        Ok(has_interaction(
            entry,
            self.entries
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, e)| e),
        ))
    }

    pub fn iter(&self) -> impl Iterator<Item = &StructuredEntry> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[StructuredEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, id: &str) -> WorkingSetResult<usize> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| WorkingSetError::NotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: &str) -> WorkingSetResult<&mut StructuredEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| WorkingSetError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{EntryParser, NoSeeds};

    fn entry(text: &str) -> StructuredEntry {
        EntryParser::default().parse(text, None, &NoSeeds).unwrap()
    }

    fn added_id(insertion: Insertion) -> String {
        match insertion {
            Insertion::Added { id } => id,
            Insertion::Duplicate { .. } => panic!("expected insertion"),
        }
    }

    #[test]
    fn test_insert_preserves_order() {
        let mut set = WorkingSet::new();
        set.insert(entry("Paracetamol"));
        set.insert(entry("Amoxicillin"));

        let names: Vec<&str> = set.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Paracetamol", "Amoxicillin"]);
    }

    #[test]
    fn test_duplicate_name_ignored() {
        let mut set = WorkingSet::new();
        let id = added_id(set.insert(entry("Paracetamol")));

        let result = set.insert(entry("  paracetamol "));

        assert_eq!(result, Insertion::Duplicate { existing_id: id });
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_force_insert_allows_duplicate() {
        let mut set = WorkingSet::new();
        set.insert(entry("Paracetamol"));
        set.force_insert(entry("Paracetamol"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut set = WorkingSet::new();
        let id = added_id(set.insert(entry("Paracetamol")));

        assert_eq!(set.remove(&id).unwrap().name, "Paracetamol");
        assert!(set.is_empty());
        assert_eq!(set.remove(&id), Err(WorkingSetError::NotFound(id)));
    }

    #[test]
    fn test_update_frequency_normalized() {
        let mut set = WorkingSet::new();
        let id = added_id(set.insert(entry("Paracetamol")));

        set.update(&id, EditableField::Frequency, "tds").unwrap();
        assert_eq!(set.get(&id).unwrap().frequency.as_str(), "1-1-1");

        set.update(&id, EditableField::Frequency, "nonsense").unwrap();
        assert_eq!(set.get(&id).unwrap().frequency.as_str(), "1-0-1");
    }

    #[test]
    fn test_update_strength_requires_reclassify() {
        let mut set = WorkingSet::new();
        let id = added_id(set.insert(entry("Paracetamol • 650 mg")));

        set.update(&id, EditableField::Strength, "250 mg").unwrap();
        let e = set.get(&id).unwrap();
        assert_eq!(e.strength, "250 mg");
        assert!(!e.is_pediatric());

        assert!(set.reclassify_pediatric(&id, &PediatricRule::default()).unwrap());
        assert!(set.get(&id).unwrap().is_pediatric());
    }

    #[test]
    fn test_update_unknown_id() {
        let mut set = WorkingSet::new();
        assert!(matches!(
            set.update("missing", EditableField::Notes, "x"),
            Err(WorkingSetError::NotFound(_))
        ));
    }

    #[test]
    fn test_has_interaction() {
        let mut set = WorkingSet::new();
        let mut para = entry("Paracetamol");
        para.interactions = vec!["Ibuprofen".into()];
        let para_id = added_id(set.insert(para));
        let ibu_id = added_id(set.insert(entry("Ibuprofen")));

        assert!(set.has_interaction(&para_id).unwrap());
        assert!(!set.has_interaction(&ibu_id).unwrap());

        set.remove(&ibu_id).unwrap();
        assert!(!set.has_interaction(&para_id).unwrap());
    }
}
