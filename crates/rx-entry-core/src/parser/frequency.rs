//! Dosing-schedule canonicalization.
//!
//! Every schedule is reduced to a three-slot `m-a-n` code where each slot is
//! `0` or `1` (morning, afternoon, night). Shorthand codes, bare digit triples
//! and already-dashed codes are accepted; anything else falls back to
//! [`DEFAULT_FREQUENCY`].

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Schedule used when the input cannot be interpreted.
pub const DEFAULT_FREQUENCY: &str = "1-0-1";

static DASHED_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d-\d-\d").unwrap());
static DIGIT_TRIPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:101|010|011)\b").unwrap());
static SHORTHAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:bd|tds|od|hs)\b").unwrap());

/// A canonical three-slot schedule.
///
/// The only constructors go through [`normalize_frequency`], so a value of
/// this type is always well formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Frequency(String);

impl Frequency {
    /// Normalize arbitrary text into a canonical schedule.
    pub fn normalize(input: &str) -> Self {
        Frequency(normalize_frequency(input))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Slots as booleans (morning, afternoon, night).
    pub fn slots(&self) -> [bool; 3] {
        let mut slots = [false; 3];
        for (slot, c) in slots.iter_mut().zip(self.0.chars().filter(|c| *c != '-')) {
            *slot = c == '1';
        }
        slots
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency(DEFAULT_FREQUENCY.to_string())
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Frequency {
    fn from(value: String) -> Self {
        Frequency::normalize(&value)
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.0
    }
}

/// Canonicalize a schedule. Total: never fails, always returns `d-d-d`.
pub fn normalize_frequency(input: &str) -> String {
    let v = input.trim().to_lowercase();

    if let Some(code) = expand_shorthand(&v) {
        return code.to_string();
    }

    let chars: Vec<char> = v.chars().collect();

    // "101" -> "1-0-1"
    if chars.len() == 3 && chars.iter().all(|c| is_slot(*c)) {
        return format!("{}-{}-{}", chars[0], chars[1], chars[2]);
    }

    // "0-1-0" passes through
    if chars.len() == 5
        && chars[1] == '-'
        && chars[3] == '-'
        && [chars[0], chars[2], chars[4]].iter().all(|c| is_slot(*c))
    {
        return v;
    }

    DEFAULT_FREQUENCY.to_string()
}

/// Find a schedule literal inside free text.
///
/// Tries a dashed code, then a digit triple, then a shorthand code. Input is
/// matched case-insensitively.
pub fn extract_frequency(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    [&*DASHED_CODE, &*DIGIT_TRIPLE, &*SHORTHAND]
        .iter()
        .find_map(|re| re.find(&lower).map(|m| m.as_str().to_string()))
}

/// Extract a schedule from `text`, falling back to `fallback`, then normalize.
pub fn resolve_frequency(text: &str, fallback: &str) -> Frequency {
    match extract_frequency(text) {
        Some(found) => Frequency::normalize(&found),
        None => Frequency::normalize(fallback),
    }
}

fn expand_shorthand(code: &str) -> Option<&'static str> {
    match code {
        "bd" => Some("1-0-1"),
        "tds" => Some("1-1-1"),
        "od" => Some("1-0-0"),
        "hs" => Some("0-0-1"),
        _ => None,
    }
}

fn is_slot(c: char) -> bool {
    c == '0' || c == '1'
}
