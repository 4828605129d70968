//! Lab test orders.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder shown for a blank test detail.
pub const BLANK_DETAIL: &str = "--";

/// Urgency of a lab test.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum TestPriority {
    Immediate,
    #[default]
    Routine,
}

impl TestPriority {
    /// Map free text to a priority. Anything unrecognised is routine.
    pub fn parse(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "immediate" | "urgent" | "stat" => TestPriority::Immediate,
            _ => TestPriority::Routine,
        }
    }
}

/// A lab test order, staged or committed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestOrder {
    pub id: String,
    pub name: String,
    pub priority: TestPriority,
    /// When to collect
    pub when: String,
    pub sample_type: String,
    pub location: String,
    pub notes: String,
    /// Whether the notes editor is open
    pub show_notes: bool,
}

impl TestOrder {
    /// Create an order with blank details.
    pub fn new(name: &str) -> Self {
        Self::normalized(name, "", "", "", "")
    }

    /// Create an order, trimming the name and filling blank details.
    pub fn normalized(
        name: &str,
        priority: &str,
        when: &str,
        sample_type: &str,
        location: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            priority: TestPriority::parse(priority),
            when: detail_or_blank(when),
            sample_type: detail_or_blank(sample_type),
            location: detail_or_blank(location),
            notes: String::new(),
            show_notes: false,
        }
    }
}

fn detail_or_blank(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        BLANK_DETAIL.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parse() {
        assert_eq!(TestPriority::parse("STAT"), TestPriority::Immediate);
        assert_eq!(TestPriority::parse(" urgent "), TestPriority::Immediate);
        assert_eq!(TestPriority::parse("Immediate"), TestPriority::Immediate);
        assert_eq!(TestPriority::parse("routine"), TestPriority::Routine);
        assert_eq!(TestPriority::parse("whenever"), TestPriority::Routine);
        assert_eq!(TestPriority::parse(""), TestPriority::Routine);
    }

    #[test]
    fn test_normalized_defaults() {
        let order = TestOrder::normalized("  Complete Blood Count ", "stat", "", "Blood", "  ");

        assert_eq!(order.name, "Complete Blood Count");
        assert_eq!(order.priority, TestPriority::Immediate);
        assert_eq!(order.when, BLANK_DETAIL);
        assert_eq!(order.sample_type, "Blood");
        assert_eq!(order.location, BLANK_DETAIL);
        assert!(order.notes.is_empty());
        assert!(!order.show_notes);
    }
}
