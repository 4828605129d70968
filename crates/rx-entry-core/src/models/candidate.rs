//! Reference candidates used as autocomplete sources and parse seeds.

use serde::{Deserialize, Deserializer, Serialize};

/// A known medicine or test that can complete a query or seed missing fields.
///
/// Every optional field defaults to empty; an empty string means "not known".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CandidateRecord {
    /// Source identifier, opaque to the engine
    pub id: String,
    /// Display name, also the lookup key
    pub name: String,
    /// Strength text; the source may send a single string or a list
    #[serde(deserialize_with = "one_or_many")]
    pub strength: Vec<String>,
    /// Unit for a bare numeric strength (e.g. "mg")
    pub unit: String,
    /// Default dosing schedule, possibly shorthand ("bd", "101")
    pub frequency: String,
    /// Default duration (e.g. "5 days")
    pub duration: String,
    /// Default timing relative to meals (e.g. "After food")
    #[serde(alias = "when")]
    pub timing: String,
    /// Salt / generic name
    #[serde(alias = "salt")]
    pub generic: String,
    /// Route of administration
    pub route: String,
    /// Free-text instruction carried into the hint
    pub notes: String,
    /// Names of other candidates this one conflicts with
    pub interactions: Vec<String>,
}

impl CandidateRecord {
    /// Create a candidate with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Strength as display text.
    ///
    /// Parts are joined with spaces. A bare number picks up the record's
    /// unit, so `"500"` with unit `mg` renders as `"500 mg"`.
    pub fn strength_text(&self) -> String {
        let joined = self
            .strength
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let unit = self.unit.trim();
        if !unit.is_empty() && joined.parse::<f64>().is_ok() {
            format!("{} {}", joined, unit)
        } else {
            joined
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(match value {
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
        None => Vec::new(),
    })
}
