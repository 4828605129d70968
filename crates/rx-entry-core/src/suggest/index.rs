//! Name-keyed candidate lookup.

use std::collections::HashMap;

use crate::models::CandidateRecord;
use crate::parser::SeedSource;

/// Lookup key for names: trimmed and lower-cased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Case/whitespace-insensitive prefix test.
pub fn starts_with_smart(full: &str, query: &str) -> bool {
    normalize_name(full).starts_with(&normalize_name(query))
}

/// Drop later records whose normalized name was already seen, and records
/// with a blank name. Source order is kept.
pub fn dedupe_by_name<I>(records: I) -> Vec<CandidateRecord>
where
    I: IntoIterator<Item = CandidateRecord>,
{
    let mut seen = std::collections::HashSet::new();
    records
        .into_iter()
        .filter(|r| {
            let key = normalize_name(&r.name);
            !key.is_empty() && seen.insert(key)
        })
        .collect()
}

/// Deduplicated local candidates with exact-name lookup.
///
/// Candidate sets are small, so prefix queries are a linear scan in source
/// order.
#[derive(Debug, Clone, Default)]
pub struct CandidateIndex {
    records: Vec<CandidateRecord>,
    by_name: HashMap<String, usize>,
}

impl CandidateIndex {
    /// Build an index, keeping the first record for each name.
    pub fn new<I>(records: I) -> Self
    where
        I: IntoIterator<Item = CandidateRecord>,
    {
        let records = dedupe_by_name(records);
        let by_name = records
            .iter()
            .enumerate()
            .map(|(i, r)| (normalize_name(&r.name), i))
            .collect();
        Self { records, by_name }
    }

    /// Build an index from a JSON array of candidates.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let records: Vec<CandidateRecord> = serde_json::from_str(json)?;
        Ok(Self::new(records))
    }

    /// Exact lookup by normalized name.
    pub fn get(&self, name: &str) -> Option<&CandidateRecord> {
        self.by_name
            .get(&normalize_name(name))
            .map(|&i| &self.records[i])
    }

    /// First record (in source order) whose name starts with `query`.
    pub fn first_prefix_match(&self, query: &str) -> Option<&CandidateRecord> {
        self.prefix_matches(query).next()
    }

    /// All records whose name starts with `query`, in source order.
    pub fn prefix_matches(&self, query: &str) -> impl Iterator<Item = &CandidateRecord> + '_ {
        let prefix = normalize_name(query);
        self.records
            .iter()
            .filter(move |r| normalize_name(&r.name).starts_with(&prefix))
    }

    pub fn records(&self) -> &[CandidateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SeedSource for CandidateIndex {
    fn seed_for(&self, name: &str) -> Option<&CandidateRecord> {
        self.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, strength: &str) -> CandidateRecord {
        let mut r = CandidateRecord::new(name);
        r.strength = vec![strength.into()];
        r
    }

    #[test]
    fn test_starts_with_smart() {
        assert!(starts_with_smart("Paracetamol", "para"));
        assert!(starts_with_smart("  Paracetamol", " PARA "));
        assert!(starts_with_smart("Paracetamol", ""));
        assert!(!starts_with_smart("Paracetamol", "cet"));
    }

    #[test]
    fn test_prefix_match_with_temporary_query() {
        let index = CandidateIndex::new(vec![record("Paracetamol", "650mg")]);
        let found = index.first_prefix_match(&format!("{}a", "Par"));
        assert_eq!(found.map(|r| r.name.as_str()), Some("Paracetamol"));

        let matches: Vec<_> = index.prefix_matches(&String::from(" PARA ")).collect();
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let index = CandidateIndex::new(vec![
            record("Paracetamol", "500mg"),
            record("paracetamol ", "650mg"),
            record("Pantoprazole", "40mg"),
            record("  ", "1mg"),
        ]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.records()[0].strength, vec!["500mg".to_string()]);
        assert_eq!(index.records()[1].name, "Pantoprazole");
    }

    #[test]
    fn test_exact_lookup_normalized() {
        let index = CandidateIndex::new(vec![record("Paracetamol", "500mg")]);

        assert!(index.get("PARACETAMOL").is_some());
        assert!(index.get(" paracetamol ").is_some());
        assert!(index.get("para").is_none());
    }

    #[test]
    fn test_prefix_match_source_order() {
        let index = CandidateIndex::new(vec![
            record("Pantoprazole", "40mg"),
            record("Paracetamol", "500mg"),
        ]);

        assert_eq!(index.first_prefix_match("pa").unwrap().name, "Pantoprazole");
        assert_eq!(index.first_prefix_match("par").unwrap().name, "Paracetamol");
        assert!(index.first_prefix_match("ibu").is_none());
        assert_eq!(index.prefix_matches("pa").count(), 2);
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"id":"1","name":"Paracetamol","strength":"500","unit":"mg","frequency":"1-1-1"},
            {"id":"2","name":"Amoxicillin","strength":["250 mg"],"interactions":["Methotrexate"]}
        ]"#;
        let index = CandidateIndex::from_json(json).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("amoxicillin").unwrap().interactions, vec!["Methotrexate".to_string()]);
        assert_eq!(index.get("paracetamol").unwrap().strength_text(), "500 mg");
    }
}
