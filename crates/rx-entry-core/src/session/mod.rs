//! Entry-field sessions: keystrokes in, display effects and commits out.

mod lab_board;
mod working_set;

pub use lab_board::*;
pub use working_set::*;

use std::time::Instant;

use tracing::debug;

use crate::config::{ConfigResult, EngineConfig};
use crate::parser::{EntryParser, Hint, SEPARATOR};
use crate::safety::{EntryFlags, SafetyClassifier};
use crate::segments::{move_segment, Direction, SegmentRange};
use crate::suggest::{CandidateIndex, QueryEffect, RemoteRequest, RemoteResponse, SuggestionEngine};

/// Keys the field reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    ArrowRight,
    Enter,
    Other,
}

/// A key press with modifier and caret position (in characters).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
    pub cursor: usize,
}

impl KeyPress {
    pub fn new(key: Key, cursor: usize) -> Self {
        Self {
            key,
            shift: false,
            cursor,
        }
    }

    pub fn shifted(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// Outcome of a commit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Added { id: String },
    /// Same name already committed; input cleared, nothing added
    Duplicate { existing_id: String },
    /// No name could be derived; input kept
    Rejected,
}

/// What the host should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not handled; let the widget process the key normally
    Ignored,
    /// Replace the input text with the hint
    HintAccepted { text: String },
    /// Select this range in the input
    Select(SegmentRange),
    Committed(CommitOutcome),
}

/// Status line for the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    Searching,
    HintAvailable,
    NeedMoreInput,
}

/// One smart entry field and the working set it commits into.
#[derive(Debug, Clone)]
pub struct EntryField {
    engine: SuggestionEngine,
    parser: EntryParser,
    classifier: SafetyClassifier,
    entries: WorkingSet,
    accepted: Option<Hint>,
    disabled: bool,
}

impl EntryField {
    pub fn new(config: &EngineConfig, local: CandidateIndex) -> ConfigResult<Self> {
        Ok(Self {
            engine: SuggestionEngine::new(config, local)?,
            parser: EntryParser::new(config.pediatric_rule()),
            classifier: SafetyClassifier::new(config.pediatric_rule()),
            entries: WorkingSet::new(),
            accepted: None,
            disabled: false,
        })
    }

    pub fn engine(&self) -> &SuggestionEngine {
        &self.engine
    }

    pub fn entries(&self) -> &WorkingSet {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut WorkingSet {
        &mut self.entries
    }

    pub fn parser(&self) -> &EntryParser {
        &self.parser
    }

    pub fn classifier(&self) -> &SafetyClassifier {
        &self.classifier
    }

    /// Pediatric and interaction flags for every committed entry.
    pub fn flags(&self) -> Vec<EntryFlags> {
        self.classifier.flags(self.entries.as_slice())
    }

    /// Recompute one entry's pediatric flag after a strength edit.
    pub fn reclassify(&mut self, id: &str) -> WorkingSetResult<bool> {
        self.entries.reclassify_pediatric(id, self.classifier.rule())
    }

    pub fn set_local(&mut self, local: CandidateIndex) {
        self.engine.set_local(local);
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn query(&self) -> &str {
        self.engine.query()
    }

    /// The input text changed.
    pub fn set_query(&mut self, query: &str, now: Instant) -> QueryEffect {
        if self.disabled {
            return QueryEffect::Unchanged;
        }
        if self.accepted.as_ref().is_some_and(|h| h.text != query) {
            self.accepted = None;
        }
        self.engine.set_query(query, now)
    }

    pub fn poll(&mut self, now: Instant) -> Option<RemoteRequest> {
        self.engine.poll(now)
    }

    pub fn complete(&mut self, response: RemoteResponse) -> bool {
        self.engine.complete(response)
    }

    pub fn hint_text(&self) -> String {
        self.engine.hint_text()
    }

    pub fn ghost_suffix(&self) -> String {
        self.engine.ghost_suffix()
    }

    pub fn status(&self) -> FieldStatus {
        if self.engine.is_searching() {
            FieldStatus::Searching
        } else if self.engine.hint_record().is_some() {
            FieldStatus::HintAvailable
        } else {
            FieldStatus::NeedMoreInput
        }
    }

    /// Handle a key press.
    ///
    /// Tab / ArrowRight accept a hint; Tab with the separator present moves
    /// between segments (Shift+Tab backwards); Enter commits.
    pub fn press_key(&mut self, press: KeyPress, now: Instant) -> KeyOutcome {
        if self.disabled {
            return KeyOutcome::Ignored;
        }

        if matches!(press.key, Key::Tab | Key::ArrowRight) {
            if let Some(hint) = self.engine.hint() {
                let text = hint.text.clone();
                self.engine.set_query(&text, now);
                self.accepted = Some(hint);
                return KeyOutcome::HintAccepted { text };
            }
        }

        match press.key {
            Key::Tab if self.engine.query().contains(SEPARATOR) => {
                let direction = if press.shift {
                    Direction::Prev
                } else {
                    Direction::Next
                };
                match move_segment(self.engine.query(), press.cursor, direction) {
                    Some(range) => KeyOutcome::Select(range),
                    None => KeyOutcome::Ignored,
                }
            }
            Key::Enter => KeyOutcome::Committed(self.commit()),
            _ => KeyOutcome::Ignored,
        }
    }

    /// Parse the current text and add it to the working set.
    pub fn commit(&mut self) -> CommitOutcome {
        if self.disabled {
            return CommitOutcome::Rejected;
        }

        let parsed = self
            .parser
            .parse(self.engine.query(), self.accepted.as_ref(), &self.engine);
        let mut entry = match parsed {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "commit rejected");
                return CommitOutcome::Rejected;
            }
        };

        self.classifier.classify(&mut entry);

        let outcome = match self.entries.insert(entry) {
            Insertion::Added { id } => CommitOutcome::Added { id },
            Insertion::Duplicate { existing_id } => CommitOutcome::Duplicate { existing_id },
        };
        self.engine.clear();
        self.accepted = None;
        outcome
    }

    /// Remove a committed entry.
    pub fn remove(&mut self, id: &str) -> WorkingSetResult<()> {
        if self.disabled {
            return Ok(());
        }
        self.entries.remove(id).map(|_| ())
    }
}
