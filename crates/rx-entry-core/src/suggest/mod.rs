//! Suggestion engine for one entry field.
//!
//! Local candidates are queried synchronously on every keystroke. Remote
//! search is debounced: each query change re-arms a single deadline, and when
//! the host polls past it a [`RemoteRequest`] with a fresh token is issued.
//! A completion is applied only if its token is still current; any query
//! change after issue supersedes it.
//!
//! The engine never reads the clock or spawns work itself. Hosts pass `now`
//! in and run requests however they like ([`SearchDispatcher`] does it on
//! tokio).

mod index;
mod remote;

pub use index::*;
pub use remote::*;

use std::time::{Duration, Instant};

use regex::Regex;
use tracing::{debug, warn};

use crate::config::{ConfigResult, EngineConfig};
use crate::models::CandidateRecord;
use crate::parser::{Hint, SeedSource};

/// What a query change did to the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryEffect {
    /// Same text as before; nothing changed
    Unchanged,
    /// Too short for remote search; remote results cleared
    TooShort,
    /// Already past the name stage; remote results cleared
    LocalOnly,
    /// Remote search will be issued at `due` unless superseded
    Debounced { due: Instant },
}

/// Transient per-query state.
#[derive(Debug, Clone, Default)]
pub struct SuggestionState {
    /// Query as typed
    pub query: String,
    /// Remote results for the current token, deduplicated and capped
    pub remote: Vec<CandidateRecord>,
    /// Last issued or invalidated token
    pub token: u64,
    /// Token of the request still awaiting a current completion
    pub in_flight: Option<u64>,
}

#[derive(Debug, Clone)]
struct PendingSearch {
    query: String,
    due: Instant,
}

/// Merges local and remote candidates and derives the ghost hint.
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    local: CandidateIndex,
    state: SuggestionState,
    pending: Option<PendingSearch>,
    extras: Regex,
    min_query_len: usize,
    debounce: Duration,
    remote_cap: usize,
}

impl SuggestionEngine {
    pub fn new(config: &EngineConfig, local: CandidateIndex) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            local,
            state: SuggestionState::default(),
            pending: None,
            extras: config.extras_regex()?,
            min_query_len: config.min_query_len,
            debounce: config.debounce(),
            remote_cap: config.remote_cap,
        })
    }

    /// Replace the local candidate list.
    pub fn set_local(&mut self, local: CandidateIndex) {
        self.local = local;
    }

    pub fn local(&self) -> &CandidateIndex {
        &self.local
    }

    pub fn state(&self) -> &SuggestionState {
        &self.state
    }

    pub fn query(&self) -> &str {
        &self.state.query
    }

    /// Whether the query already contains units, schedule codes or the separator.
    pub fn looks_like_extras(&self, query: &str) -> bool {
        self.extras.is_match(query)
    }

    /// Record a new query.
    pub fn set_query(&mut self, query: &str, now: Instant) -> QueryEffect {
        if query == self.state.query {
            return QueryEffect::Unchanged;
        }
        self.state.query = query.to_string();
        self.supersede();

        let normalized = normalize_name(query);
        if normalized.chars().count() < self.min_query_len {
            self.state.remote.clear();
            return QueryEffect::TooShort;
        }
        if self.looks_like_extras(query) {
            debug!(query, "skipping remote search for query with extras");
            self.state.remote.clear();
            return QueryEffect::LocalOnly;
        }

        let due = now + self.debounce;
        self.pending = Some(PendingSearch {
            query: normalized,
            due,
        });
        QueryEffect::Debounced { due }
    }

    /// Reset to an empty query.
    pub fn clear(&mut self) {
        self.state.query.clear();
        self.state.remote.clear();
        self.supersede();
    }

    /// When the pending debounce fires, if one is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Issue the pending search if its debounce has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<RemoteRequest> {
        if self.pending.as_ref()?.due > now {
            return None;
        }
        let pending = self.pending.take()?;

        self.state.token += 1;
        self.state.in_flight = Some(self.state.token);
        debug!(token = self.state.token, query = %pending.query, "issuing remote search");

        Some(RemoteRequest {
            token: self.state.token,
            query: pending.query,
        })
    }

    /// Apply a completion. Returns false if it was stale and dropped.
    pub fn complete(&mut self, response: RemoteResponse) -> bool {
        if self.state.in_flight != Some(response.token) {
            debug!(
                token = response.token,
                current = self.state.token,
                "dropping stale remote response"
            );
            return false;
        }
        self.state.in_flight = None;

        match response.outcome {
            Ok(records) => {
                self.state.remote = dedupe_by_name(records)
                    .into_iter()
                    .take(self.remote_cap)
                    .collect();
            }
            Err(e) => {
                warn!(token = response.token, error = %e, "remote search failed, using local candidates only");
                self.state.remote.clear();
            }
        }
        true
    }

    /// A remote search is in flight.
    pub fn is_searching(&self) -> bool {
        self.state.in_flight.is_some()
    }

    pub fn remote_results(&self) -> &[CandidateRecord] {
        &self.state.remote
    }

    /// Candidates matching the query: local prefix matches, then remote
    /// results, deduplicated and capped.
    pub fn suggestions(&self) -> Vec<CandidateRecord> {
        let q = self.state.query.trim();
        if q.is_empty() {
            return Vec::new();
        }
        let merged = self
            .local
            .prefix_matches(q)
            .chain(self.state.remote.iter())
            .cloned();
        dedupe_by_name(merged)
            .into_iter()
            .take(self.remote_cap)
            .collect()
    }

    /// First candidate whose name starts with the query: local, then remote.
    pub fn hint_record(&self) -> Option<&CandidateRecord> {
        let q = self.state.query.trim();
        if q.is_empty() {
            return None;
        }
        self.local
            .first_prefix_match(q)
            .or_else(|| self.state.remote.iter().find(|r| starts_with_smart(&r.name, q)))
    }

    pub fn hint(&self) -> Option<Hint> {
        self.hint_record().cloned().map(Hint::for_candidate)
    }

    /// Full hint text, or empty.
    pub fn hint_text(&self) -> String {
        self.hint().map(|h| h.text).unwrap_or_default()
    }

    /// The part of the hint past what has been typed, or empty.
    pub fn ghost_suffix(&self) -> String {
        let hint = self.hint_text();
        let query = &self.state.query;
        if hint.is_empty() || !starts_with_smart(&hint, query) {
            return String::new();
        }
        hint.chars().skip(query.chars().count()).collect()
    }

    // Drop any pending debounce and invalidate the in-flight token.
    fn supersede(&mut self) {
        self.pending = None;
        if self.state.in_flight.take().is_some() {
            self.state.token += 1;
        }
    }
}

impl SeedSource for SuggestionEngine {
    fn seed_for(&self, name: &str) -> Option<&CandidateRecord> {
        let key = normalize_name(name);
        self.local.get(&key).or_else(|| {
            self.state
                .remote
                .iter()
                .find(|r| normalize_name(&r.name) == key)
        })
    }
}
