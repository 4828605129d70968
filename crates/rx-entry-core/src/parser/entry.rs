//! Free text → structured entry.
//!
//! Three input shapes are recognised, in priority order:
//! 1. the exact text of an accepted hint (fields come from the hint's seed),
//! 2. separator-delimited text (`name • strength • frequency • …`),
//! 3. a plain name (everything else comes from the seed lookup).

use tracing::debug;

use crate::models::{CandidateRecord, EntryFields, StructuredEntry};

use super::{resolve_frequency, ParseError, ParseResult, PediatricRule};

/// Glyph separating segments inside a single entry field.
pub const SEPARATOR: char = '•';

/// Joiner used when composing hint text.
pub const HINT_JOINER: &str = " • ";

/// Something that can supply a seed candidate by exact (normalized) name.
pub trait SeedSource {
    fn seed_for(&self, name: &str) -> Option<&CandidateRecord>;
}

/// Seed source with no candidates.
pub struct NoSeeds;

impl SeedSource for NoSeeds {
    fn seed_for(&self, _name: &str) -> Option<&CandidateRecord> {
        None
    }
}

impl SeedSource for [CandidateRecord] {
    fn seed_for(&self, name: &str) -> Option<&CandidateRecord> {
        let key = crate::suggest::normalize_name(name);
        self.iter()
            .find(|c| crate::suggest::normalize_name(&c.name) == key)
    }
}

/// A ghost hint and the candidate it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Hint {
    pub text: String,
    pub seed: CandidateRecord,
}

impl Hint {
    /// Build hint text from a candidate's non-empty fields.
    pub fn for_candidate(seed: CandidateRecord) -> Self {
        let strength = seed.strength_text();
        let text = [
            seed.name.as_str(),
            strength.as_str(),
            seed.frequency.as_str(),
            seed.duration.as_str(),
            seed.timing.as_str(),
            seed.notes.as_str(),
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(HINT_JOINER);

        Self { text, seed }
    }
}

/// Parser for entry-field text.
#[derive(Debug, Clone, Default)]
pub struct EntryParser {
    pediatric: PediatricRule,
}

impl EntryParser {
    pub fn new(pediatric: PediatricRule) -> Self {
        Self { pediatric }
    }

    pub fn pediatric_rule(&self) -> &PediatricRule {
        &self.pediatric
    }

    /// Parse `raw` into an entry.
    ///
    /// `hint` is the hint the user accepted, if any; it is only used when
    /// `raw` is exactly its text. Fails with [`ParseError::MissingName`] when
    /// no name can be derived.
    pub fn parse<S>(&self, raw: &str, hint: Option<&Hint>, seeds: &S) -> ParseResult<StructuredEntry>
    where
        S: SeedSource + ?Sized,
    {
        let text = raw.trim();
        if text.is_empty() {
            debug!("rejecting empty entry text");
            return Err(ParseError::MissingName);
        }

        let fields = match hint {
            Some(hint) if hint.text == text => self.from_seed(&hint.seed)?,
            _ if text.contains(SEPARATOR) => self.from_delimited(text, seeds)?,
            _ => self.from_name(text, seeds),
        };

        Ok(StructuredEntry::from_fields(fields, &self.pediatric))
    }

    fn from_seed(&self, seed: &CandidateRecord) -> ParseResult<EntryFields> {
        let name = seed.name.trim();
        if name.is_empty() {
            return Err(ParseError::MissingName);
        }
        let strength = seed.strength_text();
        let frequency = resolve_frequency(
            &format!("{} {} {}", name, strength, seed.frequency),
            &seed.frequency,
        );

        Ok(EntryFields {
            name: name.to_string(),
            strength,
            frequency,
            duration: seed.duration.trim().to_string(),
            timing: seed.timing.trim().to_string(),
            generic: seed.generic.trim().to_string(),
            route: seed.route.trim().to_string(),
            notes: seed.notes.trim().to_string(),
            interactions: seed.interactions.clone(),
        })
    }

    fn from_delimited<S>(&self, text: &str, seeds: &S) -> ParseResult<EntryFields>
    where
        S: SeedSource + ?Sized,
    {
        let parts: Vec<&str> = text.split(SEPARATOR).map(str::trim).collect();
        let name = parts.first().copied().unwrap_or_default();
        if name.is_empty() {
            debug!(text, "rejecting delimited entry without a name");
            return Err(ParseError::MissingName);
        }

        let seed = seeds.seed_for(name);
        // typed part wins; a blank or missing part falls back to the seed
        let part_or = |index: usize, fallback: Option<String>| -> String {
            parts
                .get(index)
                .filter(|p| !p.is_empty())
                .map(|p| p.to_string())
                .or(fallback)
                .unwrap_or_default()
        };

        let strength = part_or(1, seed.map(CandidateRecord::strength_text));
        let frequency_text = part_or(2, seed.map(|s| s.frequency.trim().to_string()));
        let frequency = resolve_frequency(
            &format!("{} {} {}", name, strength, frequency_text),
            &frequency_text,
        );

        Ok(EntryFields {
            name: name.to_string(),
            strength,
            frequency,
            duration: part_or(3, seed.map(|s| s.duration.trim().to_string())),
            timing: part_or(4, seed.map(|s| s.timing.trim().to_string())),
            generic: seed.map(|s| s.generic.trim().to_string()).unwrap_or_default(),
            route: seed.map(|s| s.route.trim().to_string()).unwrap_or_default(),
            notes: part_or(5, seed.map(|s| s.notes.trim().to_string())),
            interactions: seed.map(|s| s.interactions.clone()).unwrap_or_default(),
        })
    }

    fn from_name<S>(&self, name: &str, seeds: &S) -> EntryFields
    where
        S: SeedSource + ?Sized,
    {
        let Some(seed) = seeds.seed_for(name) else {
            return EntryFields {
                name: name.to_string(),
                frequency: resolve_frequency(name, ""),
                ..EntryFields::default()
            };
        };

        let strength = seed.strength_text();
        let frequency = resolve_frequency(
            &format!("{} {} {}", name, strength, seed.frequency),
            &seed.frequency,
        );

        EntryFields {
            name: name.to_string(),
            strength,
            frequency,
            duration: seed.duration.trim().to_string(),
            timing: seed.timing.trim().to_string(),
            generic: seed.generic.trim().to_string(),
            route: seed.route.trim().to_string(),
            notes: seed.notes.trim().to_string(),
            interactions: seed.interactions.clone(),
        }
    }
}
