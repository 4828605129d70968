//! Golden tests for the entry parser and normalizers.
//!
//! Each case pins the structured entry produced for a known input line.

use rx_entry_core::parser::{normalize_frequency, parse_strength, EntryParser, NoSeeds};
use rx_entry_core::suggest::CandidateIndex;

const CATALOG: &str = r#"[
    {"id":"p1","name":"Paracetamol","strength":"650 mg","frequency":"bd","duration":"5 days","when":"After food","salt":"Acetaminophen","route":"Oral"},
    {"id":"a1","name":"Amoxicillin","strength":["250 mg","500 mg"],"frequency":"tds","duration":"7 days"},
    {"id":"m1","name":"Metformin","strength":"500","unit":"mg","frequency":"1-0-1","notes":"With meals"},
    {"id":"c1","name":"Cetirizine","strength":"10 mg","frequency":"hs"}
]"#;

/// Test case for one parsed line.
struct GoldenCase {
    id: &'static str,
    input: &'static str,
    expected_name: &'static str,
    expected_strength: &'static str,
    expected_frequency: &'static str,
    expected_duration: &'static str,
    expected_timing: &'static str,
    expected_notes: &'static str,
    expected_pediatric: bool,
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "plain-name-seeded",
            input: "Paracetamol",
            expected_name: "Paracetamol",
            expected_strength: "650 mg",
            expected_frequency: "1-0-1",
            expected_duration: "5 days",
            expected_timing: "After food",
            expected_notes: "",
            expected_pediatric: false,
        },
        GoldenCase {
            id: "plain-name-unknown",
            input: "Zincovit",
            expected_name: "Zincovit",
            expected_strength: "",
            expected_frequency: "1-0-1",
            expected_duration: "",
            expected_timing: "",
            expected_notes: "",
            expected_pediatric: false,
        },
        GoldenCase {
            id: "delimited-full",
            input: "Paracetamol • 250 mg • tds • 3 days • Before food • Crush tablet",
            expected_name: "Paracetamol",
            expected_strength: "250 mg",
            expected_frequency: "1-1-1",
            expected_duration: "3 days",
            expected_timing: "Before food",
            expected_notes: "Crush tablet",
            expected_pediatric: true,
        },
        GoldenCase {
            id: "delimited-blank-parts-fall-back",
            input: "Paracetamol •  • od",
            expected_name: "Paracetamol",
            expected_strength: "650 mg",
            expected_frequency: "1-0-0",
            expected_duration: "5 days",
            expected_timing: "After food",
            expected_notes: "",
            expected_pediatric: false,
        },
        GoldenCase {
            id: "delimited-digit-triple",
            input: "Cetirizine•5mg•011",
            expected_name: "Cetirizine",
            expected_strength: "5mg",
            expected_frequency: "0-1-1",
            expected_duration: "",
            expected_timing: "",
            expected_notes: "",
            expected_pediatric: true,
        },
        GoldenCase {
            id: "multi-strength-seed",
            input: "amoxicillin",
            expected_name: "amoxicillin",
            expected_strength: "250 mg 500 mg",
            expected_frequency: "1-1-1",
            expected_duration: "7 days",
            expected_timing: "",
            expected_notes: "",
            expected_pediatric: true,
        },
        GoldenCase {
            id: "bare-number-strength-gets-unit",
            input: "Metformin",
            expected_name: "Metformin",
            expected_strength: "500 mg",
            expected_frequency: "1-0-1",
            expected_duration: "",
            expected_timing: "",
            expected_notes: "With meals",
            expected_pediatric: false,
        },
        GoldenCase {
            id: "unrecognized-frequency-defaults",
            input: "Cetirizine • 10 mg • 2-2-2",
            expected_name: "Cetirizine",
            expected_strength: "10 mg",
            expected_frequency: "1-0-1",
            expected_duration: "",
            expected_timing: "",
            expected_notes: "",
            expected_pediatric: true,
        },
    ]
}

#[test]
fn test_golden_cases() {
    let seeds = CandidateIndex::from_json(CATALOG).unwrap();
    let parser = EntryParser::default();

    for case in get_golden_cases() {
        let entry = parser.parse(case.input, None, &seeds).unwrap();

        assert_eq!(entry.name, case.expected_name, "Case {}: name mismatch", case.id);
        assert_eq!(
            entry.strength, case.expected_strength,
            "Case {}: strength mismatch", case.id
        );
        assert_eq!(
            entry.frequency.as_str(), case.expected_frequency,
            "Case {}: frequency mismatch", case.id
        );
        assert_eq!(
            entry.duration, case.expected_duration,
            "Case {}: duration mismatch", case.id
        );
        assert_eq!(entry.timing, case.expected_timing, "Case {}: timing mismatch", case.id);
        assert_eq!(entry.notes, case.expected_notes, "Case {}: notes mismatch", case.id);
        assert_eq!(
            entry.is_pediatric(), case.expected_pediatric,
            "Case {}: pediatric mismatch", case.id
        );
    }
}

#[test]
fn test_rejects_nameless_input() {
    let parser = EntryParser::default();

    for input in ["", "   ", "• 650 mg • bd", "  •  "] {
        assert!(
            parser.parse(input, None, &NoSeeds).is_err(),
            "Input {:?} should be rejected",
            input
        );
    }
}

#[test]
fn test_all_frequency_normalizations() {
    let frequency_tests = vec![
        ("bd", "1-0-1"),
        ("BD", "1-0-1"),
        ("tds", "1-1-1"),
        ("od", "1-0-0"),
        ("hs", "0-0-1"),
        (" hs ", "0-0-1"),
        ("101", "1-0-1"),
        ("010", "0-1-0"),
        ("110", "1-1-0"),
        ("0-1-0", "0-1-0"),
        ("1-1-1", "1-1-1"),
        ("", "1-0-1"),
        ("qid", "1-0-1"),
        ("2-0-1", "1-0-1"),
        ("1010", "1-0-1"),
    ];

    for (input, expected) in frequency_tests {
        let result = normalize_frequency(input);
        assert_eq!(
            result, expected,
            "Frequency {:?} should normalize to {}, got {}",
            input, expected, result
        );
    }
}

#[test]
fn test_all_strength_parses() {
    let strength_tests = vec![
        ("650 mg", Some(650.0), "mg"),
        ("650mg", Some(650.0), "mg"),
        ("0.5 G", Some(0.5), "g"),
        ("5 ml", Some(5.0), "ml"),
        ("2%", Some(2.0), "%"),
        ("250", Some(250.0), ""),
        ("Tab 40 mg", Some(40.0), "mg"),
        ("as directed", None, ""),
        ("", None, ""),
    ];

    for (input, expected_value, expected_unit) in strength_tests {
        let parsed = parse_strength(input);
        assert_eq!(
            parsed.value, expected_value,
            "Strength {:?} value should be {:?}, got {:?}",
            input, expected_value, parsed.value
        );
        assert_eq!(
            parsed.unit, expected_unit,
            "Strength {:?} unit should be {}, got {}",
            input, expected_unit, parsed.unit
        );
    }
}
