//! Dose strength extraction and the pediatric heuristic.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// number, optional space, optional unit letters or % (650mg, 0.5 g, 5 ml, 2%)
static STRENGTH_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*([a-z%]+)?").unwrap());

/// Unit the pediatric heuristic applies to.
pub const PEDIATRIC_UNIT: &str = "mg";

/// Doses strictly below this many `mg` are flagged pediatric.
pub const PEDIATRIC_THRESHOLD: f64 = 300.0;

/// Numeric dose pulled out of strength text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParsedStrength {
    /// First number found, if any
    pub value: Option<f64>,
    /// Lower-cased unit following the number; empty if none
    pub unit: String,
}

/// Parse the first `<number>[unit]` token out of free text.
pub fn parse_strength(text: &str) -> ParsedStrength {
    let lower = text.trim().to_lowercase();

    let Some(caps) = STRENGTH_TOKEN.captures(&lower) else {
        return ParsedStrength::default();
    };

    let value = caps
        .get(1)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite());
    let unit = caps
        .get(2)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    ParsedStrength { value, unit }
}

/// Parse strength given as several parts, joined with spaces first.
pub fn parse_strength_parts<S: AsRef<str>>(parts: &[S]) -> ParsedStrength {
    let joined = parts
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join(" ");
    parse_strength(&joined)
}

/// Heuristic pediatric-dose rule: unit matches exactly and value is below the
/// threshold. Not a clinical dosing rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PediatricRule {
    pub unit: String,
    pub threshold: f64,
}

impl Default for PediatricRule {
    fn default() -> Self {
        Self {
            unit: PEDIATRIC_UNIT.to_string(),
            threshold: PEDIATRIC_THRESHOLD,
        }
    }
}

impl PediatricRule {
    pub fn new(unit: &str, threshold: f64) -> Self {
        Self {
            unit: unit.trim().to_lowercase(),
            threshold,
        }
    }

    /// Whether an already-parsed strength falls under the rule.
    pub fn applies(&self, strength: &ParsedStrength) -> bool {
        match strength.value {
            Some(value) => strength.unit == self.unit && value < self.threshold,
            None => false,
        }
    }

    /// Parse `text` and test it against the rule.
    pub fn is_pediatric(&self, text: &str) -> bool {
        self.applies(&parse_strength(text))
    }
}

/// Pediatric test with the default `mg` / 300 rule.
pub fn is_pediatric_from_strength(text: &str) -> bool {
    PediatricRule::default().is_pediatric(text)
}
