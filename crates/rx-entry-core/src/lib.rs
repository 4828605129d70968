//! Rx-Entry Core Library
//!
//! Structured clinical order entry through a single smart text field.
//!
//! # Architecture
//!
//! ```text
//! keystrokes ──► SuggestionEngine ──► ghost hint / segment selection ──► host
//!                  │          ▲
//!        local     │          │ token-checked completion
//!      CandidateIndex     RemoteSearch (debounced, async)
//!                  │
//!             Enter (commit)
//!                  │
//!                  ▼
//!   EntryParser (frequency normalizer + strength parser + seed fallback)
//!                  │
//!                  ▼
//!   StructuredEntry ──► pediatric flag ──► WorkingSet ──► interaction flags
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (CandidateRecord, StructuredEntry, TestOrder)
//! - [`parser`]: Frequency normalizer, strength parser, entry parser
//! - [`suggest`]: Candidate index, remote search, suggestion engine
//! - [`segments`]: Segment navigation inside a delimited field
//! - [`safety`]: Pediatric and interaction flags
//! - [`session`]: Entry field state machine, working set, lab order board
//! - [`config`]: Engine tunables

pub mod config;
pub mod models;
pub mod parser;
pub mod safety;
pub mod segments;
pub mod session;
pub mod suggest;

// Re-export commonly used types
pub use config::{ConfigError, EngineConfig};
pub use models::{CandidateRecord, StructuredEntry, TestOrder, TestPriority};
pub use parser::{EntryParser, Frequency, Hint, ParseError, ParsedStrength, PediatricRule};
pub use safety::{has_interaction, EntryFlags, SafetyClassifier};
pub use segments::{move_segment, segment_ranges, Direction, SegmentRange};
pub use session::{
    CommitOutcome, EditableField, EntryField, Key, KeyOutcome, KeyPress, TestOrderBoard,
    WorkingSet,
};
pub use suggest::{CandidateIndex, RemoteRequest, RemoteResponse, RemoteSearch, SuggestionEngine};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};
use std::time::Instant;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum RxEntryError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Lock error: {0}")]
    LockError(String),
}

impl From<config::ConfigError> for RxEntryError {
    fn from(e: config::ConfigError) -> Self {
        RxEntryError::ConfigError(e.to_string())
    }
}

impl From<session::WorkingSetError> for RxEntryError {
    fn from(e: session::WorkingSetError) -> Self {
        match e {
            session::WorkingSetError::NotFound(id) => RxEntryError::NotFound(id),
        }
    }
}

impl From<parser::ParseError> for RxEntryError {
    fn from(e: parser::ParseError) -> Self {
        RxEntryError::InvalidInput(e.to_string())
    }
}

impl From<serde_json::Error> for RxEntryError {
    fn from(e: serde_json::Error) -> Self {
        RxEntryError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for RxEntryError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        RxEntryError::LockError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Free Functions (exported to FFI)
// =========================================================================

/// Canonicalize a dosing schedule to `d-d-d`.
#[uniffi::export]
pub fn normalize_frequency(input: String) -> String {
    parser::normalize_frequency(&input)
}

/// Pediatric check with the default rule.
#[uniffi::export]
pub fn is_pediatric_strength(strength: String) -> bool {
    parser::is_pediatric_from_strength(&strength)
}

/// Range to select when moving between segments of `value`.
#[uniffi::export]
pub fn segment_selection(
    value: String,
    cursor: u32,
    direction: FfiDirection,
) -> Result<Option<FfiSelection>, RxEntryError> {
    segments::move_segment(&value, from_ffi_offset(cursor)?, direction.into())
        .map(FfiSelection::try_from)
        .transpose()
}

/// Open an entry session. `config_json` overrides any subset of the defaults.
#[uniffi::export]
pub fn open_session(config_json: Option<String>) -> Result<Arc<RxEntrySession>, RxEntryError> {
    let config = match config_json {
        Some(json) => EngineConfig::from_json(&json)?,
        None => EngineConfig::default(),
    };
    let field = EntryField::new(&config, CandidateIndex::default())?;
    Ok(Arc::new(RxEntrySession {
        field: Mutex::new(field),
        debounce_ms: config.debounce_ms,
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe entry field for FFI.
///
/// The host owns timers and the network: after `set_query` returns a delay it
/// calls `poll_remote` once that delay has passed, runs any returned request,
/// and reports back through `complete_remote` / `fail_remote`.
#[derive(uniffi::Object)]
pub struct RxEntrySession {
    field: Mutex<EntryField>,
    debounce_ms: u64,
}

#[uniffi::export]
impl RxEntrySession {
    // =========================================================================
    // Candidates
    // =========================================================================

    /// Replace local candidates from a JSON array. Returns the deduplicated count.
    pub fn load_candidates_json(&self, json: String) -> Result<u32, RxEntryError> {
        let index = CandidateIndex::from_json(&json)?;
        let count = to_ffi_count(index.len())?;
        self.field.lock()?.set_local(index);
        Ok(count)
    }

    /// Replace local candidates.
    pub fn set_candidates(&self, candidates: Vec<FfiCandidate>) -> Result<u32, RxEntryError> {
        let index = CandidateIndex::new(candidates.into_iter().map(CandidateRecord::from));
        let count = to_ffi_count(index.len())?;
        self.field.lock()?.set_local(index);
        Ok(count)
    }

    // =========================================================================
    // Query & Suggestions
    // =========================================================================

    /// Record new input text. Returns the delay in ms before `poll_remote`
    /// should be called, or `None` if no remote search is pending.
    pub fn set_query(&self, query: String) -> Result<Option<u64>, RxEntryError> {
        let mut field = self.field.lock()?;
        let effect = field.set_query(&query, Instant::now());
        Ok(match effect {
            suggest::QueryEffect::Debounced { .. } => Some(self.debounce_ms),
            _ => None,
        })
    }

    /// Issue the pending remote search if its debounce has elapsed.
    pub fn poll_remote(&self) -> Result<Option<FfiRemoteRequest>, RxEntryError> {
        let mut field = self.field.lock()?;
        Ok(field.poll(Instant::now()).map(|r| r.into()))
    }

    /// Report remote results. Returns false if the request was superseded.
    pub fn complete_remote(
        &self,
        token: u64,
        results: Vec<FfiCandidate>,
    ) -> Result<bool, RxEntryError> {
        let mut field = self.field.lock()?;
        Ok(field.complete(RemoteResponse {
            token,
            outcome: Ok(results.into_iter().map(CandidateRecord::from).collect()),
        }))
    }

    /// Report a failed remote search. Returns false if the request was superseded.
    pub fn fail_remote(&self, token: u64, reason: String) -> Result<bool, RxEntryError> {
        let mut field = self.field.lock()?;
        Ok(field.complete(RemoteResponse {
            token,
            outcome: Err(suggest::RemoteSearchError::Transport(reason)),
        }))
    }

    pub fn hint_text(&self) -> Result<String, RxEntryError> {
        Ok(self.field.lock()?.hint_text())
    }

    pub fn ghost_suffix(&self) -> Result<String, RxEntryError> {
        Ok(self.field.lock()?.ghost_suffix())
    }

    /// Candidates matching the current query, local first.
    pub fn suggestions(&self) -> Result<Vec<FfiCandidate>, RxEntryError> {
        let field = self.field.lock()?;
        Ok(field
            .engine()
            .suggestions()
            .into_iter()
            .map(|c| c.into())
            .collect())
    }

    // =========================================================================
    // Keys & Commit
    // =========================================================================

    pub fn press_key(
        &self,
        key: FfiKey,
        shift: bool,
        cursor: u32,
    ) -> Result<FfiKeyOutcome, RxEntryError> {
        let mut field = self.field.lock()?;
        let press = KeyPress {
            key: key.into(),
            shift,
            cursor: from_ffi_offset(cursor)?,
        };
        FfiKeyOutcome::try_from(field.press_key(press, Instant::now()))
    }

    pub fn set_disabled(&self, disabled: bool) -> Result<(), RxEntryError> {
        self.field.lock()?.set_disabled(disabled);
        Ok(())
    }

    // =========================================================================
    // Working Set
    // =========================================================================

    /// Committed entries with their current safety flags.
    pub fn entries(&self) -> Result<Vec<FfiEntry>, RxEntryError> {
        let field = self.field.lock()?;
        let flags = field.flags();
        Ok(field
            .entries()
            .iter()
            .zip(flags)
            .map(|(entry, flags)| FfiEntry::from_entry(entry, &flags))
            .collect())
    }

    pub fn update_entry(
        &self,
        id: String,
        field: FfiEditableField,
        value: String,
    ) -> Result<(), RxEntryError> {
        let mut guard = self.field.lock()?;
        guard.entries_mut().update(&id, field.into(), &value)?;
        Ok(())
    }

    /// Recompute the pediatric flag after a strength edit.
    pub fn reclassify_entry(&self, id: String) -> Result<bool, RxEntryError> {
        Ok(self.field.lock()?.reclassify(&id)?)
    }

    pub fn remove_entry(&self, id: String) -> Result<(), RxEntryError> {
        self.field.lock()?.remove(&id)?;
        Ok(())
    }
}

fn to_ffi_offset(offset: usize) -> Result<u32, RxEntryError> {
    u32::try_from(offset)
        .map_err(|_| RxEntryError::InvalidInput(format!("offset {} exceeds u32", offset)))
}

fn from_ffi_offset(offset: u32) -> Result<usize, RxEntryError> {
    usize::try_from(offset)
        .map_err(|_| RxEntryError::InvalidInput(format!("offset {} exceeds usize", offset)))
}

fn to_ffi_count(count: usize) -> Result<u32, RxEntryError> {
    u32::try_from(count)
        .map_err(|_| RxEntryError::InvalidInput(format!("count {} exceeds u32", count)))
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe candidate.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCandidate {
    pub id: String,
    pub name: String,
    pub strength: Vec<String>,
    pub unit: String,
    pub frequency: String,
    pub duration: String,
    pub timing: String,
    pub generic: String,
    pub route: String,
    pub notes: String,
    pub interactions: Vec<String>,
}

impl From<FfiCandidate> for CandidateRecord {
    fn from(c: FfiCandidate) -> Self {
        CandidateRecord {
            id: c.id,
            name: c.name,
            strength: c.strength,
            unit: c.unit,
            frequency: c.frequency,
            duration: c.duration,
            timing: c.timing,
            generic: c.generic,
            route: c.route,
            notes: c.notes,
            interactions: c.interactions,
        }
    }
}

impl From<CandidateRecord> for FfiCandidate {
    fn from(c: CandidateRecord) -> Self {
        Self {
            id: c.id,
            name: c.name,
            strength: c.strength,
            unit: c.unit,
            frequency: c.frequency,
            duration: c.duration,
            timing: c.timing,
            generic: c.generic,
            route: c.route,
            notes: c.notes,
            interactions: c.interactions,
        }
    }
}

/// FFI-safe committed entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiEntry {
    pub id: String,
    pub name: String,
    pub strength: String,
    pub dose_value: Option<f64>,
    pub dose_unit: String,
    pub frequency: String,
    pub duration: String,
    pub timing: String,
    pub generic: String,
    pub route: String,
    pub notes: String,
    pub pediatric: bool,
    pub interaction: bool,
    pub summary: String,
    pub committed_at: String,
}

impl FfiEntry {
    fn from_entry(entry: &StructuredEntry, flags: &safety::EntryFlags) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            strength: entry.strength.clone(),
            dose_value: entry.dose.value,
            dose_unit: entry.dose.unit.clone(),
            frequency: entry.frequency.to_string(),
            duration: entry.duration.clone(),
            timing: entry.timing.clone(),
            generic: entry.generic.clone(),
            route: entry.route.clone(),
            notes: entry.notes.clone(),
            pediatric: flags.pediatric,
            interaction: flags.interaction,
            summary: entry.summary(),
            committed_at: entry.committed_at.clone(),
        }
    }
}

/// FFI-safe selection range (character offsets).
#[derive(Debug, Clone, Copy, uniffi::Record)]
pub struct FfiSelection {
    pub start: u32,
    pub end: u32,
}

impl TryFrom<SegmentRange> for FfiSelection {
    type Error = RxEntryError;

    fn try_from(r: SegmentRange) -> Result<Self, Self::Error> {
        Ok(Self {
            start: to_ffi_offset(r.start)?,
            end: to_ffi_offset(r.end)?,
        })
    }
}

/// FFI-safe remote search request.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRemoteRequest {
    pub token: u64,
    pub query: String,
}

impl From<RemoteRequest> for FfiRemoteRequest {
    fn from(r: RemoteRequest) -> Self {
        Self {
            token: r.token,
            query: r.query,
        }
    }
}

#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiDirection {
    Next,
    Prev,
}

impl From<FfiDirection> for Direction {
    fn from(d: FfiDirection) -> Self {
        match d {
            FfiDirection::Next => Direction::Next,
            FfiDirection::Prev => Direction::Prev,
        }
    }
}

#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiKey {
    Tab,
    ArrowRight,
    Enter,
    Other,
}

impl From<FfiKey> for Key {
    fn from(k: FfiKey) -> Self {
        match k {
            FfiKey::Tab => Key::Tab,
            FfiKey::ArrowRight => Key::ArrowRight,
            FfiKey::Enter => Key::Enter,
            FfiKey::Other => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiEditableField {
    Strength,
    Frequency,
    Duration,
    Timing,
    Notes,
    Route,
    Generic,
}

impl From<FfiEditableField> for EditableField {
    fn from(f: FfiEditableField) -> Self {
        match f {
            FfiEditableField::Strength => EditableField::Strength,
            FfiEditableField::Frequency => EditableField::Frequency,
            FfiEditableField::Duration => EditableField::Duration,
            FfiEditableField::Timing => EditableField::Timing,
            FfiEditableField::Notes => EditableField::Notes,
            FfiEditableField::Route => EditableField::Route,
            FfiEditableField::Generic => EditableField::Generic,
        }
    }
}

/// FFI-safe key handling result.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiKeyOutcome {
    Ignored,
    HintAccepted { text: String },
    Select { start: u32, end: u32 },
    Added { id: String },
    Duplicate { existing_id: String },
    Rejected,
}

impl TryFrom<KeyOutcome> for FfiKeyOutcome {
    type Error = RxEntryError;

    fn try_from(outcome: KeyOutcome) -> Result<Self, Self::Error> {
        Ok(match outcome {
            KeyOutcome::Ignored => FfiKeyOutcome::Ignored,
            KeyOutcome::HintAccepted { text } => FfiKeyOutcome::HintAccepted { text },
            KeyOutcome::Select(range) => {
                let selection = FfiSelection::try_from(range)?;
                FfiKeyOutcome::Select {
                    start: selection.start,
                    end: selection.end,
                }
            }
            KeyOutcome::Committed(CommitOutcome::Added { id }) => FfiKeyOutcome::Added { id },
            KeyOutcome::Committed(CommitOutcome::Duplicate { existing_id }) => {
                FfiKeyOutcome::Duplicate { existing_id }
            }
            KeyOutcome::Committed(CommitOutcome::Rejected) => FfiKeyOutcome::Rejected,
        })
    }
}
